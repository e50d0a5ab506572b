//! Error types for the exploration engine.

use fog_types::{ObjectId, TileId};

/// Errors raised by visibility-state operations.
///
/// Most trigger paths treat bad input as a silent no-op; these errors are
/// reserved for contract violations such as a desynchronized tile count.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisibilityError {
    /// A tile index outside the grid fixed at initialization.
    #[error("invalid tile index {tile} (grid has {tile_count} tiles)")]
    InvalidTile {
        /// The offending tile.
        tile: TileId,
        /// Number of tiles in the grid.
        tile_count: usize,
    },

    /// An object the operation requires was never reported by the host.
    #[error("unknown world object {0}")]
    UnknownObject(ObjectId),
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Error writing TOML config
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors that can occur while saving or loading exploration state.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// IO error reading or writing a save file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed save JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The save was written for a different grid
    #[error("save has {found} tiles but the grid has {expected}")]
    TileCountMismatch {
        /// Tiles in the current grid.
        expected: usize,
        /// Tiles recorded in the save.
        found: usize,
    },
    /// The save references a tile outside the grid
    #[error(transparent)]
    Visibility(#[from] VisibilityError),
}
