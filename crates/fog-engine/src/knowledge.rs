//! Map knowledge sources.
//!
//! Reading a found map, recruiting a prisoner or interrogating one tells the
//! player where unknown settlements are. Each source picks settlements at
//! random and explores the area around them without granting vision.

use fog_types::{FactionId, ObjectDescriptor, ObjectId, ObjectKind};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::RangeConfig;

/// Where the player learned about settlement locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KnowledgeSource {
    /// A map item was read
    MapItem {
        /// Base reveal radius of the map
        size: u32,
        /// Maximum settlements the map points to
        locations: u32,
        hit_points: u32,
        max_hit_points: u32,
    },
    /// A prisoner from another faction was recruited
    Recruitment,
    /// A prisoner gave up one of their faction's settlements
    Interrogation { faction: FactionId },
}

impl KnowledgeSource {
    /// Maximum number of settlements this source reveals.
    pub fn max_locations(&self) -> usize {
        match self {
            KnowledgeSource::MapItem { locations, .. } => *locations as usize,
            KnowledgeSource::Recruitment | KnowledgeSource::Interrogation { .. } => 1,
        }
    }

    /// Radius explored around each revealed settlement.
    pub fn radius(&self, ranges: &RangeConfig) -> u32 {
        match self {
            KnowledgeSource::MapItem {
                size,
                hit_points,
                max_hit_points,
                ..
            } => size * map_integrity(*hit_points, *max_hit_points),
            KnowledgeSource::Recruitment => ranges.recruitment_range,
            KnowledgeSource::Interrogation { .. } => ranges.interrogation_range,
        }
    }

    /// Whether `desc` is a settlement this source can point to.
    ///
    /// `founded` is the object's current founded flag; known settlements are
    /// never picked.
    pub fn accepts(&self, desc: &ObjectDescriptor, founded: bool) -> bool {
        if founded || desc.kind != ObjectKind::Settlement || desc.tile.is_none() {
            return false;
        }
        match self {
            KnowledgeSource::Interrogation { faction } => desc.belongs_to(*faction),
            _ => true,
        }
    }
}

/// Condition of a map item: 1 when at least half intact, 0 when worn out.
///
/// The hit-point fraction is rounded half to even, so exactly half counts as
/// worn out.
pub fn map_integrity(hit_points: u32, max_hit_points: u32) -> u32 {
    if max_hit_points == 0 {
        return 0;
    }
    let fraction = f64::from(hit_points) / f64::from(max_hit_points);
    fraction.round_ties_even().max(0.0) as u32
}

/// Picks up to `count` candidates uniformly at random.
pub fn pick_locations<R: Rng + ?Sized>(candidates: &[ObjectId], count: usize, rng: &mut R) -> Vec<ObjectId> {
    candidates.choose_multiple(rng, count).copied().collect()
}
