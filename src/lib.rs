//! Ray casting maze engine.
//!
//! * `world`    – immutable maze data: angle tables, tile grids, images, config records.
//! * `engine`   – per-column ray search, object projection and the frame pipeline.
//! * `renderer` – pixel back-ends fed by the engine.
//! * `sim`      – player movement, collision and trap zones.
//! * `assets`   – turns a maze directory on disk into the in-memory structures above.

pub mod assets;
pub mod engine;
pub mod renderer;
pub mod sim;
pub mod world;
