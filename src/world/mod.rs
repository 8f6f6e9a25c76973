pub mod angle;
pub mod backdrop;
pub mod config;
pub mod grid;
pub mod image;
pub mod maze;
pub mod questions;

pub use angle::{AngleTable, Arcs, MazeAngle};
pub use backdrop::{Background, Gradient, Landscape};
pub use config::{BackgroundChange, ConfigError, Destination, MazeConfig, Scenario, Trap};
pub use grid::{EMPTY, GridError, TILE_SHIFT, TILE_SIZE, TileCode, TileGrid, TileIndex};
pub use image::{Image, ImageBank, ImageError, ImageId, NO_IMAGE, Skins};
pub use maze::Maze;
pub use questions::{AnswerSlot, Question, QuestionBook, QuestionId, QuestionTag};
