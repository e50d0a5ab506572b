//! Bounded flood-fill reveals.
//!
//! Every reveal walks the tile graph breadth-first from an origin, one ring
//! per round. A tile at hop distance `d` from the origin is visited in round
//! `d`, so a reveal of depth `N` touches exactly the tiles within `N` hops
//! (fewer when terrain stops a ring from expanding).
//!
//! | Entry point | Registers beholder | Sets explored | Sets visible | Terrain |
//! |-------------|--------------------|---------------|--------------|---------|
//! | [`reveal_with_object`] | yes | yes | yes | optional |
//! | [`reveal_at`] | no | yes | no | no |
//! | [`reveal_init`] | no | yes | yes | no |
//! | [`neighbors_within`] | no | no | no | no |

use fog_types::{ObjectId, TileId};
use std::collections::BTreeSet;

use crate::config::RangeConfig;
use crate::error::VisibilityError;
use crate::grid::WorldGrid;
use crate::state::VisibilityState;

/// Walks the rings around `origin` out to `depth` hops.
///
/// `visit` receives each tile once, with its ring index, and returns whether
/// the walk may continue outward through that tile. Tiles in the last ring are
/// never expanded.
fn walk_rings<G, F>(grid: &G, origin: TileId, depth: u32, mut visit: F) -> Result<(), VisibilityError>
where
    G: WorldGrid,
    F: FnMut(TileId, u32) -> Result<bool, VisibilityError>,
{
    let mut seen = BTreeSet::from([origin]);
    let mut frontier = vec![origin];
    let mut neighbors = Vec::new();

    for ring in 0..=depth {
        let mut next = Vec::new();
        for tile in frontier {
            let expand = visit(tile, ring)?;
            if !expand || ring == depth {
                continue;
            }
            neighbors.clear();
            grid.neighbors(tile, &mut neighbors);
            for &neighbor in &neighbors {
                if seen.insert(neighbor) {
                    next.push(neighbor);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }
    Ok(())
}

fn check_tile<G: WorldGrid>(grid: &G, tile: TileId) -> Result<(), VisibilityError> {
    if grid.contains(tile) {
        Ok(())
    } else {
        Err(VisibilityError::InvalidTile {
            tile,
            tile_count: grid.tile_count(),
        })
    }
}

/// Whether sight from `observer` passes through `target` with `range` left.
///
/// Higher ground blocks sight outright. Otherwise the elevation difference
/// plus the pollution and swampiness of both tiles is the range consumed, and
/// sight passes while some range remains.
pub fn is_visible_beyond<G: WorldGrid>(
    grid: &G,
    target: TileId,
    observer: TileId,
    range: f32,
    bonus: f32,
) -> bool {
    let target_terrain = grid.terrain(target);
    let observer_terrain = grid.terrain(observer);

    let elevation_diff = target_terrain.hilliness.level() - observer_terrain.hilliness.level();
    if elevation_diff > 0 {
        return false;
    }

    let required = elevation_diff as f32
        + (observer_terrain.pollution + target_terrain.pollution)
        + (observer_terrain.swampiness + target_terrain.swampiness);
    range + bonus - required > 0.0
}

/// Search depth for a reveal from `origin`, extended by the origin's height.
pub fn effective_depth<G: WorldGrid>(grid: &G, origin: TileId, max_range: u32, ranges: &RangeConfig) -> u32 {
    let vantage = grid.terrain(origin).hilliness.level() - ranges.hill_vantage_offset;
    max_range + vantage.max(0) as u32
}

/// Re-registers `object` as the vision source for every tile around `origin`.
///
/// Retracts the object's current vision first. Tiles are registered whether
/// or not sight passes through them; unless `ignore_terrain` is set, only
/// tiles that pass [`is_visible_beyond`] let the ring grow past them.
///
/// A `max_range` of zero leaves the state untouched. Returns the number of
/// tiles the object now lights.
pub fn reveal_with_object<G: WorldGrid>(
    state: &mut VisibilityState,
    grid: &G,
    ranges: &RangeConfig,
    object: ObjectId,
    origin: TileId,
    max_range: u32,
    ignore_terrain: bool,
) -> Result<usize, VisibilityError> {
    if max_range == 0 {
        return Ok(0);
    }
    check_tile(grid, origin)?;

    state.remove_vision(object);
    let depth = effective_depth(grid, origin, max_range, ranges);

    let mut lit = 0;
    walk_rings(grid, origin, depth, |tile, ring| {
        state.add_vision(tile, object)?;
        lit += 1;
        let remaining = (depth - ring) as f32;
        Ok(ignore_terrain || is_visible_beyond(grid, tile, origin, remaining, ranges.terrain_range_bonus))
    })?;
    Ok(lit)
}

/// Explores the tiles around `origin` and founds `object`, without lighting
/// anything.
///
/// Models map knowledge: the player learns where something is without gaining
/// a vision source. The object is founded even when `max_range` is zero.
pub fn reveal_at<G: WorldGrid>(
    state: &mut VisibilityState,
    grid: &G,
    object: ObjectId,
    origin: TileId,
    max_range: u32,
) -> Result<usize, VisibilityError> {
    check_tile(grid, origin)?;
    state.set_founded(object, true);
    if max_range == 0 {
        return Ok(0);
    }

    let mut explored = 0;
    walk_rings(grid, origin, max_range, |tile, _| {
        state.explore_tile(tile)?;
        explored += 1;
        Ok(true)
    })?;
    Ok(explored)
}

/// Explores and lights the tiles around `origin` without a beholder.
///
/// Returns the touched tiles so the caller can roll them back with
/// [`VisibilityState::reset_tile`].
pub fn reveal_init<G: WorldGrid>(
    state: &mut VisibilityState,
    grid: &G,
    origin: TileId,
    max_range: u32,
) -> Result<Vec<TileId>, VisibilityError> {
    if max_range == 0 {
        return Ok(Vec::new());
    }
    check_tile(grid, origin)?;

    let mut touched = Vec::new();
    walk_rings(grid, origin, max_range, |tile, _| {
        state.light_tile(tile)?;
        touched.push(tile);
        Ok(true)
    })?;
    Ok(touched)
}

/// Every tile within `range` hops of `tile`, the origin included.
pub fn neighbors_within<G: WorldGrid>(grid: &G, tile: TileId, range: u32) -> Result<Vec<TileId>, VisibilityError> {
    check_tile(grid, tile)?;
    let mut found = Vec::new();
    walk_rings(grid, tile, range, |tile, _| {
        found.push(tile);
        Ok(true)
    })?;
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileGrid;
    use fog_types::{Hilliness, Terrain};

    fn ranges() -> RangeConfig {
        RangeConfig::default()
    }

    fn lit_tiles(state: &VisibilityState, object: ObjectId) -> Vec<TileId> {
        state
            .object(object)
            .map(|o| o.illuminated().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_flat_terrain_passes() {
        let grid = TileGrid::line(3);
        assert!(is_visible_beyond(&grid, TileId(1), TileId(0), 1.0, 0.0));
        // Nothing left to spend
        assert!(!is_visible_beyond(&grid, TileId(1), TileId(0), 0.0, 0.0));
    }

    #[test]
    fn test_higher_ground_blocks() {
        let grid = TileGrid::line(3).with_terrain(TileId(1), Terrain::new(Hilliness::SmallHills, 0.0, 0.0));
        assert!(!is_visible_beyond(&grid, TileId(1), TileId(0), 10.0, 3.0));
    }

    #[test]
    fn test_downhill_extends_range() {
        let grid = TileGrid::line(2).with_terrain(TileId(0), Terrain::new(Hilliness::LargeHills, 0.0, 0.0));
        // Looking down three levels costs -3
        assert!(is_visible_beyond(&grid, TileId(1), TileId(0), -1.0, 0.0));
    }

    #[test]
    fn test_pollution_and_swamp_consume_range() {
        let grid = TileGrid::line(2)
            .with_terrain(TileId(0), Terrain::new(Hilliness::Undefined, 0.5, 0.0))
            .with_terrain(TileId(1), Terrain::new(Hilliness::Undefined, 0.5, 1.0));
        // Required: 0 + 1.0 + 1.0
        assert!(!is_visible_beyond(&grid, TileId(1), TileId(0), 2.0, 0.0));
        assert!(is_visible_beyond(&grid, TileId(1), TileId(0), 2.5, 0.0));
        assert!(is_visible_beyond(&grid, TileId(1), TileId(0), 2.0, 3.0));
    }

    #[test]
    fn test_effective_depth_from_hills() {
        let grid = TileGrid::line(2)
            .with_terrain(TileId(0), Terrain::new(Hilliness::Mountainous, 0.0, 0.0))
            .with_terrain(TileId(1), Terrain::flat());
        assert_eq!(effective_depth(&grid, TileId(0), 7, &ranges()), 10);
        assert_eq!(effective_depth(&grid, TileId(1), 7, &ranges()), 7);
    }

    #[test]
    fn test_reveal_with_object_on_line() {
        let grid = TileGrid::line(6);
        let mut state = VisibilityState::new(6);

        let lit = reveal_with_object(&mut state, &grid, &ranges(), ObjectId(1), TileId(1), 2, false).unwrap();

        assert_eq!(lit, 4);
        assert_eq!(
            lit_tiles(&state, ObjectId(1)),
            vec![TileId(0), TileId(1), TileId(2), TileId(3)]
        );
        assert!(!state.tile(TileId(4)).unwrap().explored());
    }

    #[test]
    fn test_reveal_retracts_previous_vision() {
        let grid = TileGrid::line(10);
        let mut state = VisibilityState::new(10);

        reveal_with_object(&mut state, &grid, &ranges(), ObjectId(1), TileId(0), 1, true).unwrap();
        reveal_with_object(&mut state, &grid, &ranges(), ObjectId(1), TileId(8), 1, true).unwrap();

        assert_eq!(lit_tiles(&state, ObjectId(1)), vec![TileId(7), TileId(8), TileId(9)]);
        assert!(!state.tile(TileId(0)).unwrap().visible());
        assert!(state.tile(TileId(0)).unwrap().explored());
    }

    #[test]
    fn test_zero_range_is_noop() {
        let grid = TileGrid::line(3);
        let mut state = VisibilityState::new(3);
        reveal_with_object(&mut state, &grid, &ranges(), ObjectId(1), TileId(0), 1, true).unwrap();
        state.dirty_mut().drain();

        let lit = reveal_with_object(&mut state, &grid, &ranges(), ObjectId(1), TileId(2), 0, true).unwrap();
        assert_eq!(lit, 0);
        // Previous vision kept
        assert_eq!(lit_tiles(&state, ObjectId(1)), vec![TileId(0), TileId(1)]);
        assert!(!state.dirty().has_dirty());
    }

    #[test]
    fn test_invalid_origin_is_error() {
        let grid = TileGrid::line(3);
        let mut state = VisibilityState::new(3);
        let result = reveal_with_object(&mut state, &grid, &ranges(), ObjectId(1), TileId(3), 2, false);
        assert!(matches!(result, Err(VisibilityError::InvalidTile { .. })));
    }

    #[test]
    fn test_hill_stops_ring_but_is_lit() {
        let grid = TileGrid::line(6).with_terrain(TileId(2), Terrain::new(Hilliness::SmallHills, 0.0, 0.0));
        let mut state = VisibilityState::new(6);

        reveal_with_object(&mut state, &grid, &ranges(), ObjectId(1), TileId(0), 5, false).unwrap();

        assert_eq!(lit_tiles(&state, ObjectId(1)), vec![TileId(0), TileId(1), TileId(2)]);
    }

    #[test]
    fn test_ignore_terrain_sees_past_hill() {
        let grid = TileGrid::line(6).with_terrain(TileId(2), Terrain::new(Hilliness::Mountainous, 0.0, 0.0));
        let mut state = VisibilityState::new(6);

        reveal_with_object(&mut state, &grid, &ranges(), ObjectId(1), TileId(0), 5, true).unwrap();

        assert_eq!(lit_tiles(&state, ObjectId(1)).len(), 6);
    }

    #[test]
    fn test_reveal_at_explores_only() {
        let grid = TileGrid::square(5, 5);
        let mut state = VisibilityState::new(25);

        let explored = reveal_at(&mut state, &grid, ObjectId(3), TileId(12), 1).unwrap();

        assert_eq!(explored, 5);
        assert!(state.is_founded(ObjectId(3)));
        for tile in [7, 11, 12, 13, 17] {
            let record = state.tile(TileId(tile)).unwrap();
            assert!(record.explored());
            assert!(!record.visible());
            assert_eq!(record.beholder_count(), 0);
        }
        assert!(!state.tile(TileId(6)).unwrap().explored());
    }

    #[test]
    fn test_reveal_at_zero_range_still_founds() {
        let grid = TileGrid::line(3);
        let mut state = VisibilityState::new(3);
        assert_eq!(reveal_at(&mut state, &grid, ObjectId(3), TileId(1), 0).unwrap(), 0);
        assert!(state.is_founded(ObjectId(3)));
        assert!(!state.tile(TileId(1)).unwrap().explored());
    }

    #[test]
    fn test_reveal_init_records_touched_tiles() {
        let grid = TileGrid::line(5);
        let mut state = VisibilityState::new(5);

        let mut touched = reveal_init(&mut state, &grid, TileId(2), 1).unwrap();
        touched.sort();
        assert_eq!(touched, vec![TileId(1), TileId(2), TileId(3)]);
        assert!(state.tile(TileId(1)).unwrap().visible());

        for tile in touched {
            state.reset_tile(tile).unwrap();
        }
        assert_eq!(state.explored_count(), 0);
    }

    #[test]
    fn test_neighbors_within() {
        let grid = TileGrid::square(5, 5);
        let mut found = neighbors_within(&grid, TileId(0), 2).unwrap();
        found.sort();
        assert_eq!(
            found,
            vec![TileId(0), TileId(1), TileId(2), TileId(5), TileId(6), TileId(10)]
        );
        assert_eq!(neighbors_within(&grid, TileId(0), 0).unwrap(), vec![TileId(0)]);
    }
}
