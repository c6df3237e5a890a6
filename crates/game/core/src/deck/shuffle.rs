//! Physical shuffle passes: riffle, overhand, and cut.

use crate::config::GameConfig;

use super::{Deck, GameRng};

impl<T> Deck<T> {
    /// Runs the full physical shuffle: 10-15 macro passes, each a run of
    /// riffles, a run of overhands, and one cut. Decks of one card or fewer
    /// pass through unchanged.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        if self.cards.len() < 2 {
            return;
        }
        let macros = rng.range(
            GameConfig::MIN_MACRO_SHUFFLES,
            GameConfig::MAX_MACRO_SHUFFLES,
        );
        for _ in 0..macros {
            let riffles = rng.range(
                GameConfig::MIN_PASSES_PER_MACRO,
                GameConfig::MAX_PASSES_PER_MACRO,
            );
            for _ in 0..riffles {
                self.riffle_shuffle();
            }
            let overhands = rng.range(
                GameConfig::MIN_PASSES_PER_MACRO,
                GameConfig::MAX_PASSES_PER_MACRO,
            );
            for _ in 0..overhands {
                self.overhand_shuffle(rng);
            }
            self.cut(rng);
        }
    }

    /// Exact riffle interleave: the top half is the first floor(n/2) cards,
    /// the bottom half the rest; an odd deck's excess last card re-enters
    /// first; then bottom[i] lands before top[i], walking i from the middle
    /// down to zero.
    pub fn riffle_shuffle(&mut self) {
        let n = self.cards.len();
        if n < 2 {
            return;
        }
        let half = n / 2;
        let mut top = std::mem::take(&mut self.cards);
        let mut bottom = top.split_off(half);
        let mut out = Vec::with_capacity(n);
        if n % 2 == 1 {
            if let Some(excess) = bottom.pop() {
                out.push(excess);
            }
        }
        while let (Some(low), Some(high)) = (bottom.pop(), top.pop()) {
            out.push(low);
            out.push(high);
        }
        self.cards = out;
    }

    /// Overhand pass with a size-dependent policy: tiny decks get swaps or
    /// a reversed tail packet, larger decks the chunked peel below.
    pub fn overhand_shuffle(&mut self, rng: &mut GameRng) {
        match self.cards.len() {
            0 | 1 => {}
            2 => {
                let swaps = rng.range(1, 4);
                for _ in 0..swaps {
                    self.cards.swap(0, 1);
                }
            }
            3 => {
                let split = rng.range(1, 2) as usize;
                let tail = self.cards.split_off(split);
                self.cards.extend(tail.into_iter().rev());
            }
            _ => self.chunked_overhand(rng),
        }
    }

    /// Chunked overhand for decks of four or more cards: split off a packet
    /// at a size-dependent random index, then peel random-size chunks off
    /// its front, appending each to the deck reversed, until it empties.
    fn chunked_overhand(&mut self, rng: &mut GameRng) {
        let n = self.cards.len();
        let small = n < 16;
        let split = if n == 4 {
            1
        } else if n < 7 {
            rng.range(1, 2) as usize
        } else if n < 11 {
            rng.range(1, 3) as usize
        } else if n < 16 {
            rng.range(1, 4) as usize
        } else {
            rng.range(1, 5) as usize
        };
        let mut packet = self.cards.split_off(split);
        while !packet.is_empty() {
            let chunk_max = if small { 2 } else { 5 };
            let want = rng.range(1, chunk_max) as usize;
            let take = want.min(packet.len());
            let chunk: Vec<T> = packet.drain(..take).collect();
            self.cards.extend(chunk.into_iter().rev());
        }
    }

    /// Cuts at a random point; two-card decks swap, singletons pass through.
    pub fn cut(&mut self, rng: &mut GameRng) {
        match self.cards.len() {
            0 | 1 => {}
            2 => self.cards.swap(0, 1),
            n => {
                let index = rng.range(1, n as u32 - 2) as usize;
                self.cards.rotate_left(index);
            }
        }
    }
}
