//! World Object Descriptors
//!
//! The host's facts about a single world object, as far as exploration cares.
//! Descriptors replace runtime type inspection: everything the engine needs to
//! know about an object's class is carried as an explicit kind or flag.

use serde::{Deserialize, Serialize};

use crate::{FactionId, ObjectId, TileId};

/// What sort of world object this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// A travelling group of pawns
    Caravan,
    /// A remote base that is not a full settlement
    Outpost,
    /// An aircraft currently in flight over the world map
    AerialUnit,
    /// A faction settlement
    Settlement,
    /// A generic map-bearing site (camps, quest sites, ruins)
    Site,
    /// The marker left behind when a settlement is destroyed
    DestroyedSettlement,
    /// Anything else the host places on the world map
    #[default]
    Other,
}

impl ObjectKind {
    /// Returns true for kinds that can anchor a generated map.
    pub fn is_map_parent(self) -> bool {
        matches!(
            self,
            ObjectKind::Settlement
                | ObjectKind::Site
                | ObjectKind::DestroyedSettlement
                | ObjectKind::Outpost
        )
    }
}

/// How a faction stands relative to the player.
///
/// Non-player relations are ordered: `Hostile < Neutral < Ally`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Allegiance {
    Hostile,
    Neutral,
    Ally,
    /// The player's own faction
    Player,
}

impl Allegiance {
    /// Returns true for a non-player faction allied with the player.
    pub fn is_ally(self) -> bool {
        matches!(self, Allegiance::Ally)
    }
}

/// The faction owning an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionRef {
    pub id: FactionId,
    pub allegiance: Allegiance,
}

impl FactionRef {
    pub fn new(id: FactionId, allegiance: Allegiance) -> Self {
        Self { id, allegiance }
    }

    /// Returns true if this is the player faction.
    pub fn is_player(&self) -> bool {
        self.allegiance == Allegiance::Player
    }
}

/// Capability flags supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectFlags {
    /// Raiding party that stays hidden unless currently seen
    pub warband: bool,
    /// Drawn regardless of fog (externally managed orbital objects)
    pub always_visible: bool,
    /// Founded on sight even though it is not a map parent
    pub force_track: bool,
    /// Referenced by an active quest
    pub quest_tagged: bool,
    /// Adding this object scans the whole world
    pub satellite: bool,
}

/// Everything the engine knows about one host world object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    /// Host identity
    pub id: ObjectId,
    /// Current tile, or `None` when the object is not on the map
    pub tile: Option<TileId>,
    /// Owning faction, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<FactionRef>,
    /// Object class
    #[serde(default)]
    pub kind: ObjectKind,
    /// Whether the host considers the object worth tracking at all
    #[serde(default = "default_true")]
    pub has_name: bool,
    /// Free colonists on the anchored map; `None` when no map is generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_colonists: Option<u32>,
    /// Capability flags
    #[serde(default)]
    pub flags: ObjectFlags,
}

fn default_true() -> bool {
    true
}

impl ObjectDescriptor {
    /// Creates a named, unowned object of the given kind.
    pub fn new(id: ObjectId, kind: ObjectKind, tile: Option<TileId>) -> Self {
        Self {
            id,
            tile,
            faction: None,
            kind,
            has_name: true,
            free_colonists: None,
            flags: ObjectFlags::default(),
        }
    }

    pub fn with_faction(mut self, id: FactionId, allegiance: Allegiance) -> Self {
        self.faction = Some(FactionRef::new(id, allegiance));
        self
    }

    pub fn with_colonists(mut self, count: u32) -> Self {
        self.free_colonists = Some(count);
        self
    }

    pub fn with_flags(mut self, flags: ObjectFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn unnamed(mut self) -> Self {
        self.has_name = false;
        self
    }

    /// Returns true if the player faction owns this object.
    pub fn is_player_owned(&self) -> bool {
        self.faction.map(|f| f.is_player()).unwrap_or(false)
    }

    /// Returns true if a non-player faction allied with the player owns this object.
    pub fn is_ally(&self) -> bool {
        self.faction.map(|f| f.allegiance.is_ally()).unwrap_or(false)
    }

    /// Returns true if the given faction owns this object.
    pub fn belongs_to(&self, faction: FactionId) -> bool {
        self.faction.map(|f| f.id == faction).unwrap_or(false)
    }
}
