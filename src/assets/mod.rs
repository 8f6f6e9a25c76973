// ──────────────────────────────────────────────────────────────────────────
// assets
//
//  *   Walls.txt / Props.txt / QuestionPos.txt  ──╮
//  *   maze.ron (MazeConfig)                      │   --->  world::Maze + Scenario
//  *   Wall<c> / Prop<c> / QuestionMark /         │          + populated ImageBank
//      Answer<A-D> and config-named images        │          + Skins
//                                                 ╯
// ──────────────────────────────────────────────────────────────────────────

mod images;
mod map_text;

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use thiserror::Error;

pub use images::{IMAGE_EXTENSIONS, demo_skins, find_image, load_image};
pub use map_text::{MAP_WIDTHS, MapTextError, parse_map_text};

use crate::world::{
    AngleTable, AnswerSlot, BackgroundChange, ConfigError, Destination, Gradient, GridError,
    ImageBank, ImageError, ImageId, Maze, MazeConfig, NO_IMAGE, QuestionTag, Scenario, Skins,
    TileGrid, grid::base36_code,
};

pub const WALLS_FILE: &str = "Walls.txt";
pub const PROPS_FILE: &str = "Props.txt";
pub const QUESTIONS_FILE: &str = "QuestionPos.txt";
pub const CONFIG_FILE: &str = "maze.ron";

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    MapText(#[from] MapTextError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Everything needed to run one maze.
#[derive(Debug)]
pub struct LoadedMaze {
    pub maze: Maze,
    pub bank: ImageBank,
    pub skins: Skins,
    pub scenario: Scenario,
}

/*====================================================================*/
/*                       Public API                                   */
/*====================================================================*/

/// Load a maze directory.  The wall map and `maze.ron` are required;
/// prop and question maps are optional.  Missing tile images are logged:
/// walls fall back to the bank's checkerboard, props and quiz markers
/// are left undrawn.
pub fn load_maze_dir(dir: &Path, tables: &AngleTable) -> Result<LoadedMaze, LoadError> {
    /*----- 1. Grids -------------------------------------------------------*/
    let walls = read_map(dir, WALLS_FILE)?;
    let props = read_optional_map(dir, PROPS_FILE)?;
    let questions = read_optional_map(dir, QUESTIONS_FILE)?;

    /*----- 2. Config and the images it names ------------------------------*/
    let config_path = dir.join(CONFIG_FILE);
    let config = MazeConfig::from_ron(&read_text(&config_path)?)?;

    let mut bank = ImageBank::default();
    for file in config.image_files() {
        let img = load_image(&dir.join(file), file)?;
        bank.insert(file, img)?;
    }
    let scenario = config.resolve(tables, walls.width(), walls.height(), &bank)?;

    /*----- 3. Tile skins --------------------------------------------------*/
    let mut skins = Skins::default();
    for code in codes_in(&walls) {
        let id = match load_tile_image(dir, &format!("Wall{}", code as char), &mut bank)? {
            Some(id) => id,
            None => NO_IMAGE,
        };
        skins.set_wall(code, id);
    }
    if let Some(props) = &props {
        for code in codes_in(props) {
            if let Some(id) = load_tile_image(dir, &format!("Prop{}", code as char), &mut bank)? {
                skins.set_prop(code, id);
            }
        }
    }
    if questions.is_some() {
        let tags = std::iter::once((QuestionTag::Mark, "QuestionMark".to_string())).chain(
            AnswerSlot::ALL
                .into_iter()
                .map(|s| (QuestionTag::Answer(s), format!("Answer{}", s.as_char()))),
        );
        for (tag, stem) in tags {
            if let Some(id) = load_tile_image(dir, &stem, &mut bank)? {
                skins.set_question(tag, id);
            }
        }
    }

    let maze = Maze::new(walls, props, questions, scenario.questions.clone())?;
    log::debug!(
        "loaded maze `{}`: {}×{} tiles, {} images, {} destinations, {} traps",
        dir.display(),
        maze.width(),
        maze.height(),
        bank.len(),
        scenario.destinations().len(),
        scenario.traps.len()
    );

    Ok(LoadedMaze {
        maze,
        bank,
        skins,
        scenario,
    })
}

/// The built-in demo: [`Maze::demo`] with procedural skins and a start
/// near the top-left corner facing east.
pub fn demo() -> Result<LoadedMaze, LoadError> {
    let maze = Maze::demo();
    let mut bank = ImageBank::default();
    let skins = demo_skins(&mut bank)?;
    let mut scenario = Scenario::start_only(Destination {
        pos: Vec2::new(80.0, 224.0),
        angle: 0,
        use_existing_angle: false,
        background: BackgroundChange::Gradient(Gradient::default()),
        landscape: None,
    });
    scenario.questions = maze.book().clone();
    Ok(LoadedMaze {
        maze,
        bank,
        skins,
        scenario,
    })
}

/*====================================================================*/
/*                       Helpers                                      */
/*====================================================================*/

fn read_text(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_map(dir: &Path, file: &str) -> Result<TileGrid, LoadError> {
    let text = read_text(&dir.join(file))?;
    Ok(parse_map_text(&text, file)?)
}

fn read_optional_map(dir: &Path, file: &str) -> Result<Option<TileGrid>, LoadError> {
    if dir.join(file).is_file() {
        read_map(dir, file).map(Some)
    } else {
        log::debug!("no {file} in `{}`", dir.display());
        Ok(None)
    }
}

/// Tile codes `1 ..= highest` of a layer, the images it may ask for.
fn codes_in(grid: &TileGrid) -> impl Iterator<Item = u8> {
    (1..=grid.highest_code_value()).filter_map(base36_code)
}

/// Load `stem` with any known extension into the bank.  `None` (and a
/// warning) if no such file exists.
fn load_tile_image(
    dir: &Path,
    stem: &str,
    bank: &mut ImageBank,
) -> Result<Option<ImageId>, LoadError> {
    let Some(path) = find_image(dir, stem) else {
        log::warn!("no image for `{stem}` in `{}`", dir.display());
        return Ok(None);
    };
    let img = load_image(&path, stem)?;
    Ok(Some(bank.insert(stem, img)?))
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::image::rgba;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32, px: [u8; 4]) {
        image::RgbaImage::from_pixel(w, h, image::Rgba(px))
            .save(dir.join(name))
            .unwrap();
    }

    fn room(border: char) -> String {
        let edge = border.to_string().repeat(16);
        let inner = format!("{border}{}{border}", "0".repeat(14));
        format!("// test room\n{edge}\n{inner}\n{inner}\n{inner}\n{edge}\n")
    }

    const CONFIG: &str = r#"
        MazeConfig(
            version: Some("1.3"),
            destinations: [
                (x_tile: 1, y_tile: 1, x_offset: 32, y_offset: 32, angle: Some(90)),
                (x_tile: 5, y_tile: 3, background: File("night.png")),
            ],
            traps: [
                (left_tile: 3, right_tile: 3, top_tile: 1, bottom_tile: 3,
                 right_offset: 63, bottom_offset: 63, goto: Some(1)),
            ],
            questions: [
                (id: '1', text: "Which way?", answers: ("up", "down", "left", "right"),
                 offsets: ((0, -1), (0, 1), (-1, 0), (1, 0))),
            ],
        )
    "#;

    fn maze_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path();
        fs::write(p.join(WALLS_FILE), room('2')).unwrap();
        let mut props = "0".repeat(16);
        props.replace_range(6..7, "1");
        let empty = "0".repeat(16);
        fs::write(
            p.join(PROPS_FILE),
            format!("{empty}\n{props}\n{empty}\n{empty}\n{empty}\n"),
        )
        .unwrap();
        let mut marks = "0".repeat(16);
        marks.replace_range(8..9, "1");
        fs::write(
            p.join(QUESTIONS_FILE),
            format!("{empty}\n{empty}\n{marks}\n{empty}\n{empty}\n"),
        )
        .unwrap();
        fs::write(p.join(CONFIG_FILE), CONFIG).unwrap();

        write_png(p, "Wall2.png", 64, 64, [200, 0, 0, 255]);
        write_png(p, "Prop1.png", 64, 64, [0, 0, 200, 255]);
        write_png(p, "QuestionMark.png", 64, 64, [255, 255, 0, 255]);
        write_png(p, "night.png", 320, 200, [0, 0, 30, 255]);
        dir
    }

    #[test]
    fn loads_a_complete_maze_directory() {
        let dir = maze_dir();
        let tables = AngleTable::new(320);
        let m = load_maze_dir(dir.path(), &tables).unwrap();

        assert_eq!((m.maze.width(), m.maze.height()), (16, 5));
        assert!(m.maze.is_wall(m.maze.to_index(0, 0).unwrap()));
        assert!(m.maze.is_prop(m.maze.to_index(6, 1).unwrap()));
        assert_eq!(m.maze.markers().position_of(b'1'), m.maze.to_index(8, 2));
        assert_eq!(m.maze.book().len(), 1);

        // wall '2' has an image; the unused code '1' falls back to the checker
        let wall2 = m.bank.image(m.skins.wall(b'2').unwrap()).unwrap();
        assert_eq!(wall2.pixel(5, 5), Some(rgba(200, 0, 0, 255)));
        assert_eq!(m.skins.wall(b'1'), Some(NO_IMAGE));

        assert!(m.skins.prop(b'1').is_some());
        assert!(m.skins.question(QuestionTag::Mark).is_some());
        assert_eq!(m.skins.question(QuestionTag::Answer(AnswerSlot::A)), None);

        let start = m.scenario.start();
        assert_eq!(start.pos, Vec2::new(96.0, 96.0));
        assert_eq!(start.angle, tables.arcs().a90);
        assert_eq!(
            m.scenario.destination(1).unwrap().background,
            BackgroundChange::Image(m.bank.id("night.png").unwrap())
        );
        assert_eq!(m.scenario.traps[0].destination, Some(1));
    }

    #[test]
    fn prop_and_question_maps_are_optional() {
        let dir = maze_dir();
        fs::remove_file(dir.path().join(PROPS_FILE)).unwrap();
        fs::remove_file(dir.path().join(QUESTIONS_FILE)).unwrap();
        let m = load_maze_dir(dir.path(), &AngleTable::new(320)).unwrap();
        assert!(!m.maze.is_prop(m.maze.to_index(6, 1).unwrap()));
        assert_eq!(m.skins.prop(b'1'), None);
        assert_eq!(m.skins.question(QuestionTag::Mark), None);
    }

    #[test]
    fn load_errors_name_what_failed() {
        let dir = maze_dir();
        fs::remove_file(dir.path().join("night.png")).unwrap();
        let err = load_maze_dir(dir.path(), &AngleTable::new(320)).unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
        assert!(err.to_string().contains("night.png"));

        let dir = maze_dir();
        let ragged = format!("{}\n{}\n", "0".repeat(16), "0".repeat(17));
        fs::write(dir.path().join(PROPS_FILE), ragged).unwrap();
        let err = load_maze_dir(dir.path(), &AngleTable::new(320)).unwrap_err();
        assert!(matches!(err, LoadError::MapText(MapTextError::Ragged { .. })));

        let dir = maze_dir();
        fs::remove_file(dir.path().join(CONFIG_FILE)).unwrap();
        let err = load_maze_dir(dir.path(), &AngleTable::new(320)).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn mismatched_layers_are_rejected() {
        let dir = maze_dir();
        let wide = "0".repeat(32);
        fs::write(dir.path().join(PROPS_FILE), format!("{wide}\n").repeat(5)).unwrap();
        let err = load_maze_dir(dir.path(), &AngleTable::new(320)).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Grid(GridError::ShapeMismatch { layer: "prop", .. })
        ));
    }

    #[test]
    fn demo_is_ready_to_run() {
        let d = demo().unwrap();
        assert!(d.maze.walls().tile_at(d.scenario.start().pos).is_some());
        assert!(d.maze.is_open(d.scenario.start().pos));
        assert_eq!(d.scenario.questions.len(), d.maze.book().len());
        assert!(d.skins.wall(b'1').is_some());
    }
}
