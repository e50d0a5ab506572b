//! World grid access.
//!
//! The host owns the tile graph; the engine reads it through [`WorldGrid`].
//! [`TileGrid`] is a plain in-memory implementation for hosts without a grid
//! of their own and for tests.

use fog_types::{Terrain, TileId};
use glam::Vec3;

/// Read-only view of the host's tile graph.
pub trait WorldGrid {
    /// Number of tiles; tile IDs are dense in `0..tile_count()`.
    fn tile_count(&self) -> usize;

    /// Appends the neighbours of `tile` to `out`.
    fn neighbors(&self, tile: TileId, out: &mut Vec<TileId>);

    /// Terrain attributes of `tile`.
    fn terrain(&self, tile: TileId) -> Terrain;

    /// World-space centre of `tile`, used to snap aerial units.
    fn tile_center(&self, tile: TileId) -> Vec3;

    /// Returns true if `tile` is inside the grid.
    fn contains(&self, tile: TileId) -> bool {
        tile.index() < self.tile_count()
    }
}

impl<G: WorldGrid + ?Sized> WorldGrid for &G {
    fn tile_count(&self) -> usize {
        (**self).tile_count()
    }

    fn neighbors(&self, tile: TileId, out: &mut Vec<TileId>) {
        (**self).neighbors(tile, out)
    }

    fn terrain(&self, tile: TileId) -> Terrain {
        (**self).terrain(tile)
    }

    fn tile_center(&self, tile: TileId) -> Vec3 {
        (**self).tile_center(tile)
    }
}

/// In-memory tile graph with adjacency lists.
#[derive(Debug, Clone, Default)]
pub struct TileGrid {
    adjacency: Vec<Vec<TileId>>,
    terrain: Vec<Terrain>,
    centers: Vec<Vec3>,
}

impl TileGrid {
    /// Builds a grid from per-tile adjacency, terrain and centres.
    ///
    /// Missing terrain or centre entries default to flat ground at the origin.
    pub fn from_parts(adjacency: Vec<Vec<TileId>>, terrain: Vec<Terrain>, centers: Vec<Vec3>) -> Self {
        let count = adjacency.len();
        let mut terrain = terrain;
        terrain.resize(count, Terrain::default());
        let mut centers = centers;
        centers.resize(count, Vec3::ZERO);
        Self {
            adjacency,
            terrain,
            centers,
        }
    }

    /// A `width` x `height` grid with 4-way adjacency and flat, clean terrain.
    ///
    /// Tile `(x, y)` has ID `y * width + x` and centre `(x, y, 0)`.
    pub fn square(width: u32, height: u32) -> Self {
        let mut adjacency = Vec::with_capacity((width * height) as usize);
        let mut centers = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let mut neighbors = Vec::with_capacity(4);
                if x > 0 {
                    neighbors.push(TileId(y * width + x - 1));
                }
                if x + 1 < width {
                    neighbors.push(TileId(y * width + x + 1));
                }
                if y > 0 {
                    neighbors.push(TileId((y - 1) * width + x));
                }
                if y + 1 < height {
                    neighbors.push(TileId((y + 1) * width + x));
                }
                adjacency.push(neighbors);
                centers.push(Vec3::new(x as f32, y as f32, 0.0));
            }
        }
        let terrain = vec![Terrain::default(); adjacency.len()];
        Self {
            adjacency,
            terrain,
            centers,
        }
    }

    /// A path of `length` tiles, each linked to the previous and next.
    pub fn line(length: u32) -> Self {
        Self::square(length, 1)
    }

    /// Replaces the terrain of one tile. Out-of-range tiles are ignored.
    pub fn set_terrain(&mut self, tile: TileId, terrain: Terrain) {
        if let Some(slot) = self.terrain.get_mut(tile.index()) {
            *slot = terrain;
        }
    }

    /// Replaces the terrain of one tile, builder style.
    pub fn with_terrain(mut self, tile: TileId, terrain: Terrain) -> Self {
        self.set_terrain(tile, terrain);
        self
    }
}

impl WorldGrid for TileGrid {
    fn tile_count(&self) -> usize {
        self.adjacency.len()
    }

    fn neighbors(&self, tile: TileId, out: &mut Vec<TileId>) {
        if let Some(list) = self.adjacency.get(tile.index()) {
            out.extend_from_slice(list);
        }
    }

    fn terrain(&self, tile: TileId) -> Terrain {
        self.terrain.get(tile.index()).copied().unwrap_or_default()
    }

    fn tile_center(&self, tile: TileId) -> Vec3 {
        self.centers.get(tile.index()).copied().unwrap_or(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fog_types::Hilliness;

    fn neighbors_of(grid: &impl WorldGrid, tile: u32) -> Vec<TileId> {
        let mut out = Vec::new();
        grid.neighbors(TileId(tile), &mut out);
        out.sort();
        out
    }

    #[test]
    fn test_square_grid_adjacency() {
        let grid = TileGrid::square(3, 3);
        assert_eq!(grid.tile_count(), 9);

        // Corner
        assert_eq!(neighbors_of(&grid, 0), vec![TileId(1), TileId(3)]);
        // Centre
        assert_eq!(
            neighbors_of(&grid, 4),
            vec![TileId(1), TileId(3), TileId(5), TileId(7)]
        );
        // Edge
        assert_eq!(neighbors_of(&grid, 7), vec![TileId(4), TileId(6), TileId(8)]);
    }

    #[test]
    fn test_line_grid() {
        let grid = TileGrid::line(4);
        assert_eq!(grid.tile_count(), 4);
        assert_eq!(neighbors_of(&grid, 0), vec![TileId(1)]);
        assert_eq!(neighbors_of(&grid, 2), vec![TileId(1), TileId(3)]);
    }

    #[test]
    fn test_terrain_override() {
        let grid = TileGrid::line(3).with_terrain(
            TileId(1),
            Terrain::new(Hilliness::Mountainous, 0.0, 0.0),
        );
        assert_eq!(grid.terrain(TileId(1)).hilliness, Hilliness::Mountainous);
        assert_eq!(grid.terrain(TileId(0)).hilliness, Hilliness::Undefined);
    }

    #[test]
    fn test_tile_centers() {
        let grid = TileGrid::square(4, 2);
        assert_eq!(grid.tile_center(TileId(6)), Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_contains_and_reference_impl() {
        let grid = TileGrid::square(2, 2);
        let by_ref = &grid;
        assert!(by_ref.contains(TileId(3)));
        assert!(!by_ref.contains(TileId(4)));
        assert_eq!(by_ref.tile_count(), 4);
    }

    #[test]
    fn test_from_parts_pads_missing_entries() {
        let grid = TileGrid::from_parts(
            vec![vec![TileId(1)], vec![TileId(0)]],
            vec![Terrain::flat()],
            Vec::new(),
        );
        assert_eq!(grid.tile_count(), 2);
        assert_eq!(grid.terrain(TileId(0)).hilliness, Hilliness::Flat);
        assert_eq!(grid.terrain(TileId(1)), Terrain::default());
        assert_eq!(grid.tile_center(TileId(1)), Vec3::ZERO);
    }
}
