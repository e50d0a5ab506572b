//! Shared data types for the world-map exploration engine.
//!
//! This crate contains pure data structures with no visibility logic.
//! It is a dependency for all other crates in the workspace.

pub mod ids;
pub mod object;
pub mod save;
pub mod state;
pub mod terrain;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export identifier types
pub use ids::{FactionId, ObjectId, TileId};

// Re-export object descriptor types
pub use object::{Allegiance, FactionRef, ObjectDescriptor, ObjectFlags, ObjectKind};

// Re-export terrain types
pub use terrain::{Hilliness, Terrain};

// Re-export severity and program state
pub use state::{ProgramState, Severity};

// Re-export save format
pub use save::{ObjectRecord, TileRecord, VisibilitySave, SAVE_FORMAT_VERSION};
