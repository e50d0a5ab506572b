//! Object trackability rules.
//!
//! Decides which world objects act as continuous vision sources and which
//! objects the player can see on the map.

use fog_types::{ObjectDescriptor, ObjectKind, ProgramState};

use crate::state::VisibilityState;

/// Whether an object qualifies as a followed vision source.
///
/// - player caravans, outposts and aerial units
/// - allied objects once play has started
/// - map parents with at least one free colonist
/// - destroyed settlement markers
pub fn is_trackable(desc: &ObjectDescriptor, program_state: ProgramState) -> bool {
    if desc.is_player_owned()
        && matches!(
            desc.kind,
            ObjectKind::Caravan | ObjectKind::Outpost | ObjectKind::AerialUnit
        )
    {
        return true;
    }

    if program_state == ProgramState::Playing && desc.is_ally() {
        return true;
    }

    if desc.kind.is_map_parent() {
        if desc.free_colonists.unwrap_or(0) > 0 {
            return true;
        }
        if desc.kind == ObjectKind::DestroyedSettlement {
            return true;
        }
    }

    false
}

/// Classifies `desc` and records the result as its followed flag.
///
/// Following founds the object; a negative result unfollows it but keeps it
/// founded.
pub fn classify(state: &mut VisibilityState, desc: &ObjectDescriptor) -> bool {
    let trackable = is_trackable(desc, state.program_state());
    state.follow(desc.id, trackable);
    trackable
}

/// Whether the object sits on a currently visible tile.
pub fn on_visible_tile(state: &VisibilityState, desc: &ObjectDescriptor) -> bool {
    desc.tile
        .and_then(|tile| state.tile(tile).ok())
        .map(|tile| tile.visible())
        .unwrap_or(false)
}

/// Whether the player can currently see the object on the map.
///
/// Warbands are only shown while in sight; every other founded object stays
/// on the map once known.
pub fn is_object_visible(state: &VisibilityState, desc: &ObjectDescriptor) -> bool {
    state.is_followed(desc.id)
        || on_visible_tile(state, desc)
        || desc.flags.always_visible
        || (!desc.flags.warband && state.is_founded(desc.id))
        || state.reveal_all()
}
