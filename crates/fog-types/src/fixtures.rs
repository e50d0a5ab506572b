//! Sample data fixtures for testing.
//!
//! This module provides ready-made test data for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // fog-types = { path = "../fog-types", features = ["test-fixtures"] }
//!
//! use fog_types::fixtures;
//!
//! let save = fixtures::sample_save();
//! let objects = fixtures::sample_objects();
//! ```

use crate::{ObjectDescriptor, VisibilitySave};

/// Width and height of the square grid the samples are laid out on.
pub const SAMPLE_GRID_SIDE: u32 = 3;

/// Returns a sample save for a 3x3 grid.
///
/// Contains:
/// - a player caravan (obj 1) at the centre tile, illuminating the centre
///   and its four orthogonal neighbours, queued for re-reveal
/// - a founded player settlement (obj 2) on an explored corner
/// - an unfounded hostile settlement record (obj 3)
/// - two world features, the second already learned
pub fn sample_save() -> VisibilitySave {
    let json = include_str!("../tests/fixtures/sample_save.json");
    VisibilitySave::from_json(json).expect("Failed to parse sample_save.json")
}

/// Returns the host descriptors matching [`sample_save`].
///
/// Contains 5 objects:
/// - obj 1: player caravan at tile 4
/// - obj 2: player settlement at tile 0, no free colonists
/// - obj 3: hostile settlement at tile 8
/// - obj 4: allied caravan at tile 6
/// - obj 5: hostile warband at tile 2
pub fn sample_objects() -> Vec<ObjectDescriptor> {
    let json = include_str!("../tests/fixtures/sample_objects.json");
    serde_json::from_str(json).expect("Failed to parse sample_objects.json")
}
