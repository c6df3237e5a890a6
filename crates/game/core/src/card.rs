//! Action cards.

use std::fmt;

/// The action a card performs when resolved.
///
/// Kind names round-trip through strings for the level authoring format
/// (`"move"`, `"turn_left"`, ...).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CardKind {
    /// Walk in the facing direction.
    Move,
    /// Arc through the air in the facing direction.
    Jump,
    TurnLeft,
    TurnRight,
    /// Hand-phase card; the resolver skips it.
    Clear,
    /// Hand-phase card; the resolver skips it.
    Switch,
    /// Do nothing for one action.
    Stall,
    /// Stand-in resolved to a concrete kind at commit time.
    Wild,
}

/// An action card: a kind plus a distance/magnitude parameter.
///
/// Cards are interchangeable value objects; per-instance identity for UI
/// bookkeeping is layered on externally and never reaches the resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub kind: CardKind,
    pub distance: i32,
}

impl Card {
    pub const fn new(kind: CardKind, distance: i32) -> Self {
        Self { kind, distance }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.distance)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn kind_names_round_trip() {
        assert_eq!(CardKind::TurnLeft.to_string(), "turn_left");
        assert_eq!(CardKind::from_str("turn_left").unwrap(), CardKind::TurnLeft);
        assert_eq!(CardKind::from_str("MOVE").unwrap(), CardKind::Move);
        assert!(CardKind::from_str("teleport").is_err());
    }

    #[test]
    fn cards_compare_by_value() {
        assert_eq!(
            Card::new(CardKind::Jump, 2),
            Card::new(CardKind::Jump, 2)
        );
        assert_ne!(Card::new(CardKind::Jump, 2), Card::new(CardKind::Jump, 1));
    }
}
