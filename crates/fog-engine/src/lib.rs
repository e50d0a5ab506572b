//! World-map exploration engine.
//!
//! Tracks which tiles of a world grid the player has explored and which are
//! currently in sight, derives that from the world objects acting as vision
//! sources, and tells a render sink which overlay tiles need redrawing.
//!
//! ```text
//! ┌──────────┐  object events   ┌────────────────────┐  FrameUpdate   ┌───────────┐
//! │   host   │ ───────────────▶ │ ExplorationManager │ ─────────────▶ │ LayerSink │
//! └──────────┘                  └────────────────────┘                └───────────┘
//!                                        │ ▲
//!                                  reveal│ │dirty
//!                                        ▼ │
//!                                 ┌─────────────────┐
//!                                 │ VisibilityState │
//!                                 └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`grid`]: Read-only tile graph access
//! - [`state`]: Per-tile and per-object visibility store
//! - [`reveal`]: Bounded flood-fill reveals and terrain sight rules
//! - [`classify`]: Which objects are vision sources and which are shown
//! - [`dirty`]: Overlay dirty tracking and severity
//! - [`mesh`]: Render sink contract and an incremental overlay mask
//! - [`features`]: Named world features learned through exploration
//! - [`knowledge`]: Settlement locations learned from maps and prisoners
//! - [`persist`]: Save and load
//! - [`manager`]: The coordinator hosts drive

pub mod classify;
pub mod config;
pub mod dirty;
pub mod error;
pub mod features;
pub mod grid;
pub mod knowledge;
pub mod manager;
pub mod mesh;
pub mod object;
pub mod persist;
pub mod reveal;
pub mod state;
pub mod tile;

// Re-export the coordinator
pub use manager::ExplorationManager;

// Re-export state types
pub use object::ObjectVisibility;
pub use state::VisibilityState;
pub use tile::TileVisibility;

// Re-export grid types
pub use grid::{TileGrid, WorldGrid};

// Re-export render types
pub use dirty::{DirtyBatch, DirtyTracker};
pub use mesh::{FrameUpdate, LayerSink, NullSink, OverlayMask, RecordingSink};

// Re-export reveal and classification entry points
pub use classify::{is_object_visible, is_trackable};
pub use reveal::{is_visible_beyond, neighbors_within, reveal_at, reveal_init, reveal_with_object};

// Re-export knowledge and feature types
pub use features::{FeatureLedger, WorldFeature};
pub use knowledge::{map_integrity, KnowledgeSource};

// Re-export persistence
pub use persist::{read_save, write_save};

// Re-export config and errors
pub use config::{default_config_toml, EngineConfig, FeatureConfig, FogSettings, RangeConfig, TimingConfig};
pub use error::{ConfigError, PersistError, VisibilityError};
