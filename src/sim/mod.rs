mod collision;
mod controller;
mod input;
mod player;
mod traps;

pub use collision::{MoveKind, MoveResult, try_move};
pub use controller::{MoveEvent, MoveEvents, PlayerController};
pub use input::InputCmd;
pub use player::Player;
pub use traps::{TrapEffects, TrapEntry, TrapTracker};
