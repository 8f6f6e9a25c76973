//! Destinations, traps and questions of one maze.
//!
//! `maze.ron` is deserialised into [`MazeConfig`] (tile/degree based, as a
//! maze author writes it) and then [`MazeConfig::resolve`]d against the map
//! size, the angle tables and the image bank into the runtime records the
//! controller uses.

use glam::Vec2;
use serde::Deserialize;

use crate::world::angle::{AngleTable, MazeAngle};
use crate::world::backdrop::{Gradient, Landscape};
use crate::world::grid::{TILE_SIZE, base36_value};
use crate::world::image::{ImageBank, ImageId};
use crate::world::questions::{Question, QuestionBook};

/// Config format this build was written against.
pub const CONFIG_VERSION: &str = "1.3";

/// Degrees used when a destination leaves its angle out.
const DEFAULT_ANGLE_DEG: i32 = 45;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Syntax(#[from] ron::error::SpannedError),

    #[error("{field} in {section} must be in the range {low} to {high}, got {value}")]
    OutOfRange {
        section: String,
        field: &'static str,
        value: i64,
        low: i64,
        high: i64,
    },

    #[error("at least one destination is required for the starting position")]
    NoDestinations,

    #[error("image `{0}` is referenced by the config but was not loaded")]
    MissingImage(String),

    #[error("question id `{0}` is not a base-36 tile code")]
    BadQuestionId(char),
}

/*──────────────────────── file format ────────────────────────────*/

#[derive(Clone, Debug, Deserialize)]
pub struct MazeConfig {
    #[serde(default)]
    pub version: Option<String>,
    pub destinations: Vec<DestSpec>,
    #[serde(default)]
    pub traps: Vec<TrapSpec>,
    #[serde(default)]
    pub questions: Vec<QuestionSpec>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DestSpec {
    pub x_tile: i32,
    pub y_tile: i32,
    #[serde(default)]
    pub x_offset: i32,
    #[serde(default)]
    pub y_offset: i32,
    /// Degrees; `None` keeps the player's current facing.
    #[serde(default)]
    pub angle: Option<i32>,
    #[serde(default)]
    pub background: BackgroundSpec,
    #[serde(default)]
    pub landscape: Option<LandscapeSpec>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub enum BackgroundSpec {
    #[default]
    Keep,
    Gradient {
        sky: [i32; 3],
        sky_step: [i32; 3],
        ground: [i32; 3],
        ground_step: [i32; 3],
    },
    File(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct LandscapeSpec {
    pub file: String,
    #[serde(default)]
    pub offset_from_top: i32,
    /// Degrees.
    #[serde(default)]
    pub start_angle: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TrapSpec {
    pub left_tile: i32,
    pub right_tile: i32,
    pub top_tile: i32,
    pub bottom_tile: i32,
    #[serde(default)]
    pub left_offset: i32,
    #[serde(default)]
    pub right_offset: i32,
    #[serde(default)]
    pub top_offset: i32,
    #[serde(default)]
    pub bottom_offset: i32,
    /// Index into `destinations`.
    #[serde(default)]
    pub goto: Option<usize>,
    #[serde(default)]
    pub overlay: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuestionSpec {
    pub id: char,
    pub text: String,
    pub answers: [String; 4],
    /// `(dx, dy)` in tiles from the question mark, for answers A to D.
    pub offsets: [(i32, i32); 4],
}

/*──────────────────────── runtime records ────────────────────────*/

#[derive(Clone, Debug, PartialEq)]
pub enum BackgroundChange {
    Keep,
    Gradient(Gradient),
    Image(ImageId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Destination {
    pub pos: Vec2,
    pub angle: MazeAngle,
    pub use_existing_angle: bool,
    pub background: BackgroundChange,
    pub landscape: Option<Landscape>,
}

/// Rectangular trigger zone in world units, edges inclusive.
#[derive(Clone, Debug, PartialEq)]
pub struct Trap {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub destination: Option<usize>,
    pub overlay: Option<ImageId>,
}

impl Trap {
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// Everything `maze.ron` resolves to.  Destination 0 is the start; the
/// list is never empty.
#[derive(Clone, Debug)]
pub struct Scenario {
    destinations: Vec<Destination>,
    pub traps: Vec<Trap>,
    pub questions: QuestionBook,
}

impl Scenario {
    /// A single start destination and nothing else.
    pub fn start_only(start: Destination) -> Self {
        Self {
            destinations: vec![start],
            traps: Vec::new(),
            questions: QuestionBook::default(),
        }
    }

    #[inline]
    pub fn start(&self) -> &Destination {
        &self.destinations[0]
    }

    #[inline]
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    #[inline]
    pub fn destination(&self, index: usize) -> Option<&Destination> {
        self.destinations.get(index)
    }

    /// Append a teleport target; returns its index.
    pub fn push_destination(&mut self, dest: Destination) -> usize {
        self.destinations.push(dest);
        self.destinations.len() - 1
    }
}

/*──────────────────────── resolution ─────────────────────────────*/

struct Checker<'a> {
    section: &'a str,
}

impl Checker<'_> {
    fn range(&self, field: &'static str, value: i32, low: i32, high: i32) -> Result<i32, ConfigError> {
        if value < low || value > high {
            return Err(ConfigError::OutOfRange {
                section: self.section.to_string(),
                field,
                value: value.into(),
                low: low.into(),
                high: high.into(),
            });
        }
        Ok(value)
    }

    fn world(&self, field: &'static str, tile: i32, offset: i32, tiles: usize) -> Result<f32, ConfigError> {
        let tile = self.range(field, tile, 0, tiles as i32 - 1)?;
        let offset = self.range("tile offset", offset, 0, TILE_SIZE - 1)?;
        Ok((tile * TILE_SIZE + offset) as f32)
    }

    fn rgb(&self, field: &'static str, v: [i32; 3]) -> Result<[u8; 3], ConfigError> {
        let mut out = [0u8; 3];
        for (o, c) in out.iter_mut().zip(v) {
            *o = self.range(field, c, 0, 255)? as u8;
        }
        Ok(out)
    }

    fn step(&self, field: &'static str, v: [i32; 3]) -> Result<[i8; 3], ConfigError> {
        let mut out = [0i8; 3];
        for (o, c) in out.iter_mut().zip(v) {
            *o = self.range(field, c, -10, 10)? as i8;
        }
        Ok(out)
    }
}

fn image_id(bank: &ImageBank, name: &str) -> Result<ImageId, ConfigError> {
    bank.id(name)
        .ok_or_else(|| ConfigError::MissingImage(name.to_string()))
}

impl MazeConfig {
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Every image file the config refers to, in first-use order.
    pub fn image_files(&self) -> Vec<&str> {
        let named = self
            .destinations
            .iter()
            .flat_map(|d| {
                let bg = match &d.background {
                    BackgroundSpec::File(f) => Some(f.as_str()),
                    _ => None,
                };
                bg.into_iter()
                    .chain(d.landscape.as_ref().map(|l| l.file.as_str()))
            })
            .chain(self.traps.iter().filter_map(|t| t.overlay.as_deref()));

        let mut files: Vec<&str> = Vec::new();
        for f in named {
            if !files.contains(&f) {
                files.push(f);
            }
        }
        files
    }

    /// Range-check everything against a `map_w × map_h` maze and turn
    /// tiles/degrees/file names into world units/maze angles/image ids.
    pub fn resolve(
        &self,
        tables: &AngleTable,
        map_w: usize,
        map_h: usize,
        bank: &ImageBank,
    ) -> Result<Scenario, ConfigError> {
        match self.version.as_deref() {
            Some(CONFIG_VERSION) => {}
            found => log::warn!(
                "maze config may be out of date: expected version {CONFIG_VERSION}, found {found:?}"
            ),
        }
        if self.destinations.is_empty() {
            return Err(ConfigError::NoDestinations);
        }

        let destinations = self
            .destinations
            .iter()
            .enumerate()
            .map(|(i, d)| Self::resolve_dest(i, d, tables, map_w, map_h, bank))
            .collect::<Result<Vec<_>, _>>()?;

        let traps = self
            .traps
            .iter()
            .enumerate()
            .map(|(i, t)| Self::resolve_trap(i, t, map_w, map_h, destinations.len(), bank))
            .collect::<Result<Vec<_>, _>>()?;

        let questions = self
            .questions
            .iter()
            .map(|q| {
                let code = q.id.to_ascii_lowercase();
                match u8::try_from(code).ok().and_then(|c| base36_value(c).map(|v| (c, v))) {
                    Some((c, v)) if v > 0 => Ok(Question {
                        id: c,
                        text: q.text.clone(),
                        answers: q.answers.clone(),
                        answer_offsets: q.offsets,
                    }),
                    _ => Err(ConfigError::BadQuestionId(q.id)),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "maze config: {} destinations, {} traps, {} questions",
            destinations.len(),
            traps.len(),
            questions.len()
        );
        Ok(Scenario {
            destinations,
            traps,
            questions: QuestionBook::new(questions),
        })
    }

    fn resolve_dest(
        num: usize,
        d: &DestSpec,
        tables: &AngleTable,
        map_w: usize,
        map_h: usize,
        bank: &ImageBank,
    ) -> Result<Destination, ConfigError> {
        let section = format!("destination {num}");
        let ck = Checker { section: &section };

        let pos = Vec2::new(
            ck.world("x_tile", d.x_tile, d.x_offset, map_w)?,
            ck.world("y_tile", d.y_tile, d.y_offset, map_h)?,
        );
        let degrees = match d.angle {
            Some(a) => ck.range("angle", a, 0, 359)?,
            None => DEFAULT_ANGLE_DEG,
        };

        let background = match &d.background {
            // the start has nothing to keep
            BackgroundSpec::Keep if num == 0 => BackgroundChange::Gradient(Gradient::default()),
            BackgroundSpec::Keep => BackgroundChange::Keep,
            BackgroundSpec::Gradient {
                sky,
                sky_step,
                ground,
                ground_step,
            } => BackgroundChange::Gradient(Gradient {
                sky: ck.rgb("sky", *sky)?,
                sky_step: ck.step("sky_step", *sky_step)?,
                ground: ck.rgb("ground", *ground)?,
                ground_step: ck.step("ground_step", *ground_step)?,
            }),
            BackgroundSpec::File(f) => BackgroundChange::Image(image_id(bank, f)?),
        };

        let landscape = d
            .landscape
            .as_ref()
            .map(|l| -> Result<Landscape, ConfigError> {
                Ok(Landscape {
                    image: image_id(bank, &l.file)?,
                    offset_from_top: l.offset_from_top,
                    start_angle: tables
                        .degrees_to_units(ck.range("landscape start_angle", l.start_angle, 0, 359)?),
                })
            })
            .transpose()?;

        Ok(Destination {
            pos,
            angle: tables.degrees_to_units(degrees),
            use_existing_angle: d.angle.is_none(),
            background,
            landscape,
        })
    }

    fn resolve_trap(
        num: usize,
        t: &TrapSpec,
        map_w: usize,
        map_h: usize,
        dest_count: usize,
        bank: &ImageBank,
    ) -> Result<Trap, ConfigError> {
        let section = format!("trap {num}");
        let ck = Checker { section: &section };

        let destination = t
            .goto
            .map(|g| {
                let g = i32::try_from(g).unwrap_or(i32::MAX);
                ck.range("goto", g, 0, dest_count as i32 - 1).map(|g| g as usize)
            })
            .transpose()?;

        Ok(Trap {
            left: ck.world("left_tile", t.left_tile, t.left_offset, map_w)?,
            right: ck.world("right_tile", t.right_tile, t.right_offset, map_w)?,
            top: ck.world("top_tile", t.top_tile, t.top_offset, map_h)?,
            bottom: ck.world("bottom_tile", t.bottom_tile, t.bottom_offset, map_h)?,
            destination,
            overlay: t.overlay.as_deref().map(|o| image_id(bank, o)).transpose()?,
        })
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::image::Image;

    const RON: &str = r#"
        MazeConfig(
            version: Some("1.3"),
            destinations: [
                (x_tile: 2, y_tile: 3, x_offset: 32, y_offset: 32, angle: Some(0)),
                (
                    x_tile: 6, y_tile: 6,
                    background: File("night.png"),
                    landscape: Some((file: "hills.png", offset_from_top: 10, start_angle: 90)),
                ),
                (
                    x_tile: 1, y_tile: 1, angle: Some(180),
                    background: Gradient(
                        sky: (0, 0, 0), sky_step: (1, 1, 1),
                        ground: (10, 10, 10), ground_step: (-1, 0, 1),
                    ),
                ),
            ],
            traps: [
                (left_tile: 5, right_tile: 5, top_tile: 1, bottom_tile: 1,
                 right_offset: 63, bottom_offset: 63, goto: Some(1), overlay: Some("fog.png")),
                (left_tile: 1, right_tile: 2, top_tile: 6, bottom_tile: 6),
            ],
            questions: [
                (id: '1', text: "2 + 2 ?", answers: ("3", "4", "5", "22"),
                 offsets: ((-1, 0), (1, 0), (0, -1), (0, 1))),
            ],
        )
    "#;

    fn bank() -> ImageBank {
        let mut bank = ImageBank::default();
        for name in ["night.png", "hills.png", "fog.png"] {
            bank.insert(name, Image::filled(name, 4, 4, 0xFF00_0000)).unwrap();
        }
        bank
    }

    #[test]
    fn resolves_tiles_angles_and_images() {
        let t = AngleTable::new(320);
        let cfg = MazeConfig::from_ron(RON).unwrap();
        assert_eq!(cfg.image_files(), vec!["night.png", "hills.png", "fog.png"]);

        let bank = bank();
        let s = cfg.resolve(&t, 8, 8, &bank).unwrap();

        let start = s.start();
        assert_eq!(start.pos, Vec2::new(160.0, 224.0));
        assert_eq!(start.angle, 0);
        assert!(!start.use_existing_angle);
        assert_eq!(start.background, BackgroundChange::Gradient(Gradient::default()));

        let d1 = s.destination(1).unwrap();
        assert!(d1.use_existing_angle);
        assert_eq!(d1.angle, t.degrees_to_units(45));
        assert_eq!(d1.background, BackgroundChange::Image(bank.id("night.png").unwrap()));
        let land = d1.landscape.unwrap();
        assert_eq!(land.start_angle, t.arcs().a90);
        assert_eq!(land.offset_from_top, 10);

        let d2 = s.destination(2).unwrap();
        assert_eq!(d2.angle, t.arcs().a180);
        match &d2.background {
            BackgroundChange::Gradient(g) => assert_eq!(g.ground_step, [-1, 0, 1]),
            other => panic!("unexpected {other:?}"),
        }

        let trap = &s.traps[0];
        assert_eq!((trap.left, trap.right, trap.top, trap.bottom), (320.0, 383.0, 64.0, 127.0));
        assert_eq!(trap.destination, Some(1));
        assert_eq!(trap.overlay, bank.id("fog.png"));
        assert_eq!(s.traps[1].destination, None);

        assert_eq!(s.questions.get(b'1').unwrap().answers[1], "4");
    }

    #[test]
    fn trap_edges_are_inclusive() {
        let trap = Trap {
            left: 64.0,
            right: 127.0,
            top: 64.0,
            bottom: 127.0,
            destination: None,
            overlay: None,
        };
        assert!(trap.contains(Vec2::new(64.0, 64.0)));
        assert!(trap.contains(Vec2::new(127.0, 127.0)));
        assert!(!trap.contains(Vec2::new(127.5, 100.0)));
        assert!(!trap.contains(Vec2::new(100.0, 63.9)));
    }

    #[test]
    fn range_violations_are_reported() {
        let t = AngleTable::new(320);
        let bank = bank();

        let cfg = MazeConfig::from_ron("(destinations: [(x_tile: 8, y_tile: 0)])").unwrap();
        let err = cfg.resolve(&t, 8, 8, &bank).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "x_tile", value: 8, .. }));

        let cfg = MazeConfig::from_ron("(destinations: [(x_tile: 1, y_tile: 1, angle: Some(360))])")
            .unwrap();
        assert!(matches!(
            cfg.resolve(&t, 8, 8, &bank).unwrap_err(),
            ConfigError::OutOfRange { field: "angle", .. }
        ));

        let cfg = MazeConfig::from_ron(
            "(destinations: [(x_tile: 1, y_tile: 1)], traps: [(left_tile: 1, right_tile: 1, top_tile: 1, bottom_tile: 1, goto: Some(3))])",
        )
        .unwrap();
        assert!(matches!(
            cfg.resolve(&t, 8, 8, &bank).unwrap_err(),
            ConfigError::OutOfRange { field: "goto", value: 3, high: 0, .. }
        ));
    }

    #[test]
    fn structural_errors() {
        let t = AngleTable::new(320);
        let bank = ImageBank::default();

        let cfg = MazeConfig::from_ron("(destinations: [])").unwrap();
        assert!(matches!(cfg.resolve(&t, 8, 8, &bank), Err(ConfigError::NoDestinations)));

        let cfg = MazeConfig::from_ron(
            r#"(destinations: [(x_tile: 1, y_tile: 1, background: File("nope.png"))])"#,
        )
        .unwrap();
        assert!(matches!(
            cfg.resolve(&t, 8, 8, &bank),
            Err(ConfigError::MissingImage(name)) if name == "nope.png"
        ));

        assert!(matches!(
            MazeConfig::from_ron("(destinations: [(x_tile: 1"),
            Err(ConfigError::Syntax(_))
        ));
    }

    #[test]
    fn scenario_start_survives_added_destinations() {
        let here = |x: f32| Destination {
            pos: Vec2::new(x, 96.0),
            angle: 0,
            use_existing_angle: false,
            background: BackgroundChange::Keep,
            landscape: None,
        };
        let mut s = Scenario::start_only(here(96.0));
        assert_eq!(s.destinations().len(), 1);
        assert_eq!(s.push_destination(here(160.0)), 1);
        assert_eq!(s.start().pos.x, 96.0);
        assert_eq!(s.destination(1).map(|d| d.pos.x), Some(160.0));
        assert!(s.destination(2).is_none());
    }
}
