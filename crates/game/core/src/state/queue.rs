use arrayvec::ArrayVec;

use crate::card::Card;
use crate::config::GameConfig;

type QueueSlots = ArrayVec<Card, { GameConfig::MAX_QUEUE_CARDS }>;

/// Ordered list of cards being played out this turn.
///
/// The resolver pops the head as each action begins; arriving on an active
/// obstacle may push a single captured card back to the front. Cleared when
/// a hole fall or spike contact ends the turn early.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionQueue {
    cards: QueueSlots,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the queued order. Returns how many trailing cards were
    /// dropped for exceeding the queue bound.
    pub fn replace(&mut self, cards: impl IntoIterator<Item = Card>) -> usize {
        self.cards.clear();
        let mut dropped = 0;
        for card in cards {
            if self.cards.try_push(card).is_err() {
                dropped += 1;
            }
        }
        dropped
    }

    pub fn pop_front(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    /// Front-inserts an injected obstacle card. Returns false when the
    /// queue is saturated and the card was dropped.
    pub fn push_front(&mut self, card: Card) -> bool {
        if self.cards.is_full() {
            return false;
        }
        self.cards.insert(0, card);
        true
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::card::CardKind;

    use super::*;

    #[test]
    fn pops_in_committed_order() {
        let mut queue = ActionQueue::new();
        queue.replace([
            Card::new(CardKind::Move, 1),
            Card::new(CardKind::TurnLeft, 0),
        ]);
        assert_eq!(queue.pop_front(), Some(Card::new(CardKind::Move, 1)));
        assert_eq!(queue.pop_front(), Some(Card::new(CardKind::TurnLeft, 0)));
        assert_eq!(queue.pop_front(), None);
    }

    #[test]
    fn push_front_takes_priority() {
        let mut queue = ActionQueue::new();
        queue.replace([Card::new(CardKind::Move, 1)]);
        assert!(queue.push_front(Card::new(CardKind::Jump, 1)));
        assert_eq!(queue.pop_front(), Some(Card::new(CardKind::Jump, 1)));
    }

    #[test]
    fn replace_reports_overflow() {
        let mut queue = ActionQueue::new();
        let cards = vec![Card::new(CardKind::Stall, 0); GameConfig::MAX_QUEUE_CARDS + 3];
        assert_eq!(queue.replace(cards), 3);
        assert_eq!(queue.len(), GameConfig::MAX_QUEUE_CARDS);
        assert!(!queue.push_front(Card::new(CardKind::Move, 1)));
    }
}
