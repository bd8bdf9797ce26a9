//! Building map parsing
//!
//! Deserializes traffic-editor building files far enough to reach the model
//! placements on each level. Everything else in the format (walls, vertices,
//! lifts, ...) is ignored.

pub mod map;

pub use map::{Building, Level, MapParser, ModelPlacement};
