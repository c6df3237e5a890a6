//! Generic deck engine with physical-style shuffling.
//!
//! The shuffle deliberately composes riffle, overhand, and cut passes
//! instead of reaching for a uniform Fisher-Yates: the resulting order
//! statistics mimic hand-shuffled cards, and the riffle interleave is an
//! exact deterministic permutation so seeded tests reproduce it bit for
//! bit.

mod rng;
mod shuffle;

pub use rng::GameRng;

use crate::error::{ErrorSeverity, GameError};

/// Errors raised by deck mutators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeckError {
    #[error("index {index} is out of range for a deck of {len} cards")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("swap indices {a} and {b} are out of range for a deck of {len} cards")]
    SwapOutOfRange { a: usize, b: usize, len: usize },
}

impl GameError for DeckError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }
}

/// An ordered, mutable sequence of cards.
///
/// Generic over an opaque card type; the engine only moves values around
/// and never inspects them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deck<T> {
    cards: Vec<T>,
}

impl<T> Deck<T> {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<T>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[T] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cards.iter()
    }

    /// Draws the top card.
    pub fn deal(&mut self) -> Option<T> {
        self.remove_first()
    }

    /// Removes the top card; an empty deck is a quiet no-op.
    pub fn remove_first(&mut self) -> Option<T> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    /// Removes the bottom card; an empty deck is a quiet no-op.
    pub fn remove_last(&mut self) -> Option<T> {
        self.cards.pop()
    }

    pub fn remove_at(&mut self, index: usize) -> Result<T, DeckError> {
        if index >= self.cards.len() {
            return Err(DeckError::IndexOutOfRange {
                index,
                len: self.cards.len(),
            });
        }
        Ok(self.cards.remove(index))
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), DeckError> {
        let len = self.cards.len();
        if a >= len || b >= len {
            return Err(DeckError::SwapOutOfRange { a, b, len });
        }
        self.cards.swap(a, b);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Moves the first `index` cards to the back, preserving relative order
    /// within both halves.
    pub fn cut_at(&mut self, index: usize) -> Result<(), DeckError> {
        if index > self.cards.len() {
            return Err(DeckError::IndexOutOfRange {
                index,
                len: self.cards.len(),
            });
        }
        self.cards.rotate_left(index);
        Ok(())
    }
}

impl<T> From<Vec<T>> for Deck<T> {
    fn from(cards: Vec<T>) -> Self {
        Self::from_cards(cards)
    }
}

impl<T> FromIterator<T> for Deck<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cut_at_moves_front_to_back() {
        let mut deck = Deck::from_cards(vec!['A', 'B', 'C', 'D', 'E']);
        deck.cut_at(2).unwrap();
        assert_eq!(deck.cards(), &['C', 'D', 'E', 'A', 'B']);
    }

    #[test]
    fn empty_deck_removals_are_quiet() {
        let mut deck: Deck<u8> = Deck::new();
        assert_eq!(deck.remove_first(), None);
        assert_eq!(deck.remove_last(), None);
    }

    #[test]
    fn out_of_range_operations_are_reported() {
        let mut deck = Deck::from_cards(vec![1, 2, 3]);
        assert_eq!(
            deck.remove_at(3),
            Err(DeckError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            deck.swap(0, 5),
            Err(DeckError::SwapOutOfRange { a: 0, b: 5, len: 3 })
        );
        // Failed mutators leave the deck untouched.
        assert_eq!(deck.cards(), &[1, 2, 3]);
    }

    #[test]
    fn deal_drains_from_the_top() {
        let mut deck = Deck::from_cards(vec![10, 20, 30]);
        assert_eq!(deck.deal(), Some(10));
        assert_eq!(deck.deal(), Some(20));
        assert_eq!(deck.len(), 1);
    }
}
