//! Update Severity and Program State
//!
//! The severity ladder tells the render layer how much of the world overlay
//! needs rebuilding; the program state distinguishes world selection from play.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimal scope of mesh regeneration required.
///
/// Severity only ever rises within a frame; draining resets it to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Nothing to redraw
    #[default]
    None = 0,
    /// Only the fog overlay changed
    Fog = 1,
    /// Fog and unexplored-terrain overlays changed
    Full = 2,
    /// The ungenerated planet shell must be regenerated too
    Planet = 3,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::None => write!(f, "none"),
            Severity::Fog => write!(f, "fog"),
            Severity::Full => write!(f, "full"),
            Severity::Planet => write!(f, "planet"),
        }
    }
}

/// Host program phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgramState {
    /// World selection / scenario setup, before play starts
    #[default]
    Entry,
    /// A game is running
    Playing,
}
