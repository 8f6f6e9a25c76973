pub mod caster;
#[allow(clippy::module_inception)]
pub mod engine;
pub mod hit;
pub mod projection;
pub mod types;

pub use caster::RayCaster;
pub use engine::Engine;
pub use hit::{Axis, ObjectHit, ObjectKind, Side, Sighting, Sightings, WallHit, closest};
pub use projection::{ObjectProjector, Slice, project_slice, wall_texture_column};
pub use types::{Screen, ViewConfig};
