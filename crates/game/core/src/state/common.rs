use std::fmt;

use glam::Vec3;

use crate::config::GameConfig;

/// Unique identifier for a resolver-driven actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl ActorId {
    /// Reserved identifier for the live, input-driven player character.
    pub const PLAYER: Self = Self(0);

    /// Reserved identifier for the replay actor that re-executes a
    /// previously recorded action order.
    pub const GHOST: Self = Self(1);

    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }

    #[inline]
    pub const fn is_ghost(self) -> bool {
        self.0 == Self::GHOST.0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid cell expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Ground-level world anchor of this cell. The world is y-up; grid y
    /// runs along world z.
    pub fn to_world(self) -> Vec3 {
        Vec3::new(
            self.x as f32 * GameConfig::TILE_SIZE,
            0.0,
            self.y as f32 * GameConfig::TILE_SIZE,
        )
    }

    /// Grid cell under a world-space point.
    pub fn from_world(world: Vec3) -> Self {
        Self {
            x: (world.x / GameConfig::TILE_SIZE).round() as i32,
            y: (world.z / GameConfig::TILE_SIZE).round() as i32,
        }
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Eight compass directions plus a reserved "no direction" slot, encoded 0-8.
///
/// The encoding walks the 3x3 neighborhood row by row from the north-west
/// corner, so odd values are the cardinals and even values (except 4, the
/// center) the diagonals. The rotation table and the spring-jump diagonal
/// pick both index on this layout; the numbering must not change.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum Facing {
    NorthWest = 0,
    #[default]
    North = 1,
    NorthEast = 2,
    West = 3,
    /// Reserved "no direction" value; steps nowhere.
    None = 4,
    East = 5,
    SouthWest = 6,
    South = 7,
    SouthEast = 8,
}

impl Facing {
    /// Diagonal candidates for spring-assisted jumps.
    pub const DIAGONALS: [Facing; 4] = [
        Facing::NorthWest,
        Facing::NorthEast,
        Facing::SouthWest,
        Facing::SouthEast,
    ];

    pub const fn from_index(index: u8) -> Option<Facing> {
        match index {
            0 => Some(Facing::NorthWest),
            1 => Some(Facing::North),
            2 => Some(Facing::NorthEast),
            3 => Some(Facing::West),
            4 => Some(Facing::None),
            5 => Some(Facing::East),
            6 => Some(Facing::SouthWest),
            7 => Some(Facing::South),
            8 => Some(Facing::SouthEast),
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Unit grid offset (dx, dy) for one step in this direction.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Facing::NorthWest => (-1, 1),
            Facing::North => (0, 1),
            Facing::NorthEast => (1, 1),
            Facing::West => (-1, 0),
            Facing::None => (0, 0),
            Facing::East => (1, 0),
            Facing::SouthWest => (-1, -1),
            Facing::South => (0, -1),
            Facing::SouthEast => (1, -1),
        }
    }

    #[inline]
    pub const fn is_cardinal(self) -> bool {
        (self as u8) % 2 == 1
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Facing::NorthWest | Facing::NorthEast | Facing::SouthWest | Facing::SouthEast
        )
    }

    /// 90 degrees counter-clockwise over the fixed N-W-S-E cycle.
    /// Non-cardinal facings are left unchanged.
    pub const fn rotated_left(self) -> Facing {
        match self {
            Facing::North => Facing::West,
            Facing::West => Facing::South,
            Facing::South => Facing::East,
            Facing::East => Facing::North,
            other => other,
        }
    }

    /// 90 degrees clockwise over the fixed N-E-S-W cycle.
    /// Non-cardinal facings are left unchanged.
    pub const fn rotated_right(self) -> Facing {
        match self {
            Facing::North => Facing::East,
            Facing::East => Facing::South,
            Facing::South => Facing::West,
            Facing::West => Facing::North,
            other => other,
        }
    }

    /// Cell reached by walking `distance` steps from `origin`.
    pub const fn step(self, origin: Coordinate, distance: i32) -> Coordinate {
        let (dx, dy) = self.offset();
        Coordinate::new(origin.x + dx * distance, origin.y + dy * distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_encoding_matches_neighborhood_layout() {
        assert_eq!(Facing::from_index(0), Some(Facing::NorthWest));
        assert_eq!(Facing::from_index(4), Some(Facing::None));
        assert_eq!(Facing::from_index(8), Some(Facing::SouthEast));
        assert_eq!(Facing::from_index(9), None);

        // Odd indices are the cardinals, even ones the diagonals.
        for index in 0..=8u8 {
            let facing = Facing::from_index(index).unwrap();
            if index == 4 {
                assert!(!facing.is_cardinal() && !facing.is_diagonal());
            } else if index % 2 == 1 {
                assert!(facing.is_cardinal());
            } else {
                assert!(facing.is_diagonal());
            }
        }
    }

    #[test]
    fn rotation_cycles_through_cardinals() {
        assert_eq!(Facing::North.rotated_left(), Facing::West);
        assert_eq!(Facing::West.rotated_left(), Facing::South);
        assert_eq!(Facing::South.rotated_left(), Facing::East);
        assert_eq!(Facing::East.rotated_left(), Facing::North);
        assert_eq!(Facing::North.rotated_right(), Facing::East);
        assert_eq!(Facing::NorthWest.rotated_left(), Facing::NorthWest);
    }

    #[test]
    fn step_scales_the_unit_offset() {
        assert_eq!(
            Facing::North.step(Coordinate::ORIGIN, 2),
            Coordinate::new(0, 2)
        );
        assert_eq!(
            Facing::SouthWest.step(Coordinate::ORIGIN, 1),
            Coordinate::new(-1, -1)
        );
        assert_eq!(
            Facing::None.step(Coordinate::new(3, 3), 5),
            Coordinate::new(3, 3)
        );
    }

    #[test]
    fn world_round_trip() {
        let cell = Coordinate::new(-2, 7);
        assert_eq!(Coordinate::from_world(cell.to_world()), cell);
    }
}
