//! Static tile board and spatial queries.
//!
//! The grid owns every tile of a loaded level and answers the lookups the
//! turn resolver needs. Tiles never change after load; a hole is simply a
//! tile with negative elevation.

use std::collections::BTreeMap;

use glam::Vec3;

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Coordinate, Facing};

/// Immutable descriptor for one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    coordinate: Coordinate,
    elevation: i32,
}

impl Tile {
    pub const fn new(coordinate: Coordinate, elevation: i32) -> Self {
        Self {
            coordinate,
            elevation,
        }
    }

    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub const fn elevation(&self) -> i32 {
        self.elevation
    }

    /// Negative elevation marks a pit the actor plunges into.
    pub const fn is_hole(&self) -> bool {
        self.elevation < 0
    }

    /// Canonical world anchor used as a movement start/end target.
    pub fn snap_position(&self) -> Vec3 {
        let base = self.coordinate.to_world();
        Vec3::new(
            base.x,
            self.elevation as f32 * GameConfig::ELEVATION_STEP,
            base.z,
        )
    }
}

/// Errors raised by grid queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("cells {origin} and {target} share none of the 8 grid axes")]
    NotAligned {
        origin: Coordinate,
        target: Coordinate,
    },
}

impl GameError for GridError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }
}

/// Flat registry owning every tile of a level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileGrid {
    tiles: BTreeMap<Coordinate, Tile>,
}

impl TileGrid {
    pub fn new(tiles: impl IntoIterator<Item = Tile>) -> Self {
        Self {
            tiles: tiles
                .into_iter()
                .map(|tile| (tile.coordinate(), tile))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Looks up the tile registered at `coordinate`. `None` means the cell
    /// is unwalkable / out of bounds; callers skip the action rather than
    /// proceed with a missing target.
    pub fn tile_at(&self, coordinate: Coordinate) -> Option<&Tile> {
        self.tiles.get(&coordinate)
    }

    /// Tile reached by stepping `distance` cells from `origin` along
    /// `facing`. `Facing::None` resolves back to the origin cell.
    pub fn tile_in_direction(
        &self,
        origin: Coordinate,
        facing: Facing,
        distance: i32,
    ) -> Option<&Tile> {
        self.tile_at(facing.step(origin, distance))
    }

    /// Ordered tiles strictly after `origin` up to and including `target`,
    /// stepping by the normalized direction. Cells with no registered tile
    /// are skipped (gaps). Fails when the pair is aligned on none of the 8
    /// grid axes.
    pub fn tiles_between(
        &self,
        origin: Coordinate,
        target: Coordinate,
    ) -> Result<Vec<&Tile>, GridError> {
        let dx = target.x - origin.x;
        let dy = target.y - origin.y;
        if dx == 0 && dy == 0 {
            return Ok(Vec::new());
        }
        if dx != 0 && dy != 0 && dx.abs() != dy.abs() {
            return Err(GridError::NotAligned { origin, target });
        }
        let steps = dx.abs().max(dy.abs());
        let (sx, sy) = (dx.signum(), dy.signum());
        let mut tiles = Vec::new();
        for i in 1..=steps {
            let cell = Coordinate::new(origin.x + sx * i, origin.y + sy * i);
            if let Some(tile) = self.tile_at(cell) {
                tiles.push(tile);
            }
        }
        Ok(tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_grid(width: i32, height: i32) -> TileGrid {
        let mut tiles = Vec::new();
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(Coordinate::new(x, y), 0));
            }
        }
        TileGrid::new(tiles)
    }

    #[test]
    fn tile_in_direction_applies_scaled_offsets() {
        let grid = flat_grid(3, 3);
        let north = grid
            .tile_in_direction(Coordinate::ORIGIN, Facing::North, 2)
            .unwrap();
        assert_eq!(north.coordinate(), Coordinate::new(0, 2));

        // South-west of the origin is off this grid.
        assert!(
            grid.tile_in_direction(Coordinate::ORIGIN, Facing::SouthWest, 1)
                .is_none()
        );
        let grid = TileGrid::new([Tile::new(Coordinate::new(-1, -1), 0)]);
        let sw = grid
            .tile_in_direction(Coordinate::ORIGIN, Facing::SouthWest, 1)
            .unwrap();
        assert_eq!(sw.coordinate(), Coordinate::new(-1, -1));
    }

    #[test]
    fn none_direction_resolves_to_origin() {
        let grid = flat_grid(2, 2);
        let tile = grid
            .tile_in_direction(Coordinate::new(1, 1), Facing::None, 3)
            .unwrap();
        assert_eq!(tile.coordinate(), Coordinate::new(1, 1));
    }

    #[test]
    fn tiles_between_walks_the_line_exclusive_inclusive() {
        let grid = flat_grid(4, 4);
        let path = grid
            .tiles_between(Coordinate::ORIGIN, Coordinate::new(0, 3))
            .unwrap();
        let cells: Vec<Coordinate> = path.iter().map(|t| t.coordinate()).collect();
        assert_eq!(
            cells,
            vec![
                Coordinate::new(0, 1),
                Coordinate::new(0, 2),
                Coordinate::new(0, 3)
            ]
        );

        let diagonal = grid
            .tiles_between(Coordinate::ORIGIN, Coordinate::new(3, 3))
            .unwrap();
        assert_eq!(diagonal.len(), 3);
    }

    #[test]
    fn tiles_between_rejects_misaligned_pairs() {
        let grid = flat_grid(4, 4);
        let err = grid
            .tiles_between(Coordinate::ORIGIN, Coordinate::new(1, 2))
            .unwrap_err();
        assert_eq!(
            err,
            GridError::NotAligned {
                origin: Coordinate::ORIGIN,
                target: Coordinate::new(1, 2)
            }
        );
    }

    #[test]
    fn snap_position_scales_elevation() {
        let tile = Tile::new(Coordinate::new(2, 3), 2);
        let snap = tile.snap_position();
        assert_eq!(snap.x, 2.0);
        assert_eq!(snap.y, 2.0 * GameConfig::ELEVATION_STEP);
        assert_eq!(snap.z, 3.0);
        assert!(Tile::new(Coordinate::ORIGIN, -1).is_hole());
        assert!(!tile.is_hole());
    }
}
