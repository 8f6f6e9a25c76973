//! Aerial (top-down) maze viewer.
//!
//! ```bash
//! cargo run --release --bin aerial_view -- [maze_dir]
//! ```
//!
//! Shows the wall, prop and question layers from above with the player and
//! the ray fan the first-person view would cast.  Walk with the arrow keys;
//! the same collision, trap and quiz rules apply as in `maze_view`.

use clap::Parser;
use glam::Vec2;
use minifb::{Key, Window, WindowOptions};
use std::path::PathBuf;

use raymaze::{
    assets::{self, LoadedMaze},
    engine::{RayCaster, Sightings, ViewConfig},
    sim::{InputCmd, PlayerController},
    world::{AngleTable, Maze, MazeAngle, QuestionId, QuestionTag, TILE_SIZE},
};

const WINDOW: usize = 768;
/// Cast every n-th screen column.
const FAN_STEP: usize = 8;

const FLOOR: u32 = 0x00_202020;
const WALL: u32 = 0x00_B0B0B0;
const PROP: u32 = 0x00_40A040;
const MARK: u32 = 0x00_E0E040;
const ANSWER: u32 = 0x00_E07030;
const SEEN: u32 = 0x00_FF40FF;
const RAY: u32 = 0x00_3060FF;
const PLAYER: u32 = 0x00_FFFFFF;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Maze directory; the built-in demo when omitted
    #[arg(value_name = "DIR")]
    maze_dir: Option<PathBuf>,
}

/// Screen-space pixel sink with clipping.
struct Canvas {
    buf: Vec<u32>,
    w: usize,
    h: usize,
}

impl Canvas {
    fn new(w: usize, h: usize) -> Self {
        Self {
            buf: vec![0; w * h],
            w,
            h,
        }
    }

    fn plot(&mut self, x: i32, y: i32, colour: u32) {
        if (0..self.w as i32).contains(&x) && (0..self.h as i32).contains(&y) {
            self.buf[y as usize * self.w + x as usize] = colour;
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, size: i32, colour: u32) {
        for dy in 0..size {
            for dx in 0..size {
                self.plot(x + dx, y + dy, colour);
            }
        }
    }

    /// Integer Bresenham.
    fn line(&mut self, (mut x0, mut y0): (i32, i32), (x1, y1): (i32, i32), colour: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, colour);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

/// World units → canvas pixels.
struct MapView {
    cell: i32,
}

impl MapView {
    fn to_screen(&self, p: Vec2) -> (i32, i32) {
        let k = self.cell as f32 / TILE_SIZE as f32;
        ((p.x * k) as i32, (p.y * k) as i32)
    }
}

fn tile_colour(maze: &Maze, idx: usize, active: Option<QuestionId>) -> u32 {
    if maze.is_wall(idx) {
        return WALL;
    }
    if maze.is_prop(idx) {
        return PROP;
    }
    match maze.markers().visible_tag_at(idx, maze.book(), active) {
        Some(QuestionTag::Mark) => MARK,
        Some(QuestionTag::Answer(_)) => ANSWER,
        None => FLOOR,
    }
}

fn draw(
    canvas: &mut Canvas,
    view: &MapView,
    tables: &AngleTable,
    maze: &Maze,
    pos: Vec2,
    angle: MazeAngle,
    active: Option<QuestionId>,
) {
    canvas.buf.fill(0);

    // rays first so the sighted tiles are known when the tiles go down
    let caster = RayCaster::new(tables, maze, pos, active);
    let mut seen = Sightings::default();
    let mut ends = Vec::new();
    let arcs = tables.arcs();
    let mut cast_angle = tables.wrap(angle - arcs.a30);
    for col in 0..tables.plane_width() {
        if let Some(hit) = caster.cast(cast_angle, &mut seen)
            && col % FAN_STEP == 0
        {
            let end = if hit.is_horizontal() {
                Vec2::new(hit.intersection, hit.grid_line)
            } else {
                Vec2::new(hit.grid_line, hit.intersection)
            };
            ends.push(end);
        }
        cast_angle = tables.turn(cast_angle, 1);
    }

    for row in 0..maze.height() {
        for col in 0..maze.width() {
            let Some(idx) = maze.to_index(col as i32, row as i32) else {
                continue;
            };
            let colour = if seen.contains(idx) {
                SEEN
            } else {
                tile_colour(maze, idx, active)
            };
            // one-pixel grid gap between cells
            canvas.fill_rect(
                col as i32 * view.cell,
                row as i32 * view.cell,
                (view.cell - 1).max(1),
                colour,
            );
        }
    }

    let eye = view.to_screen(pos);
    for end in ends {
        canvas.line(eye, view.to_screen(end), RAY);
    }
    canvas.fill_rect(eye.0 - 2, eye.1 - 2, 5, PLAYER);
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let config = ViewConfig::default();
    let tables = AngleTable::new(config.width);
    let LoadedMaze { maze, scenario, .. } = match &opts.maze_dir {
        Some(dir) => assets::load_maze_dir(dir, &tables)?,
        None => assets::demo()?,
    };

    let cell = (WINDOW / maze.width().max(maze.height())).max(2) as i32;
    let view = MapView { cell };
    let mut canvas = Canvas::new(maze.width() * cell as usize, maze.height() * cell as usize);
    log::info!(
        "{}×{} maze at {cell} px per tile",
        maze.width(),
        maze.height()
    );

    let mut controller = PlayerController::new(&tables, scenario.start(), config.player_speed);

    let mut window = Window::new("Maze from above", canvas.w, canvas.h, WindowOptions::default())?;
    window.set_target_fps(30);
    while window.is_open() && !window.is_key_down(Key::Escape) {
        let mut cmd = InputCmd::default();
        if window.is_key_down(Key::Up) {
            cmd.forward += 1.0;
        }
        if window.is_key_down(Key::Down) {
            cmd.forward -= 1.0;
        }
        if window.is_key_down(Key::Left) {
            cmd.turn += 1.0;
        }
        if window.is_key_down(Key::Right) {
            cmd.turn -= 1.0;
        }
        for event in controller.apply(cmd, &maze, &scenario) {
            log::info!("{event:?}");
        }

        let player = controller.player();
        draw(
            &mut canvas,
            &view,
            &tables,
            &maze,
            player.pos,
            player.angle,
            controller.active_question(),
        );
        window.update_with_buffer(&canvas.buf, canvas.w, canvas.h)?;
    }
    Ok(())
}
