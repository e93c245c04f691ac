//! 7-bag randomizer for piece generation
//!
//! All 7 pieces are shuffled and dealt out before the next bag is drawn,
//! so every run of 7 starting at a bag boundary holds each piece once.

use crate::tetromino::TetrominoType;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// The 7-bag piece randomizer, generic over its random source
#[derive(Debug, Clone)]
pub struct Bag<R = ChaCha8Rng> {
    /// Pieces not yet dealt, always at least one full bag
    queue: VecDeque<TetrominoType>,
    rng: R,
}

impl Bag<ChaCha8Rng> {
    /// Deterministic bag for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Bag<R> {
    /// Create a bag drawing from `rng`
    pub fn new(rng: R) -> Self {
        let mut bag = Self {
            queue: VecDeque::with_capacity(14),
            rng,
        };
        bag.refill();
        bag
    }

    /// Get the next piece
    pub fn next_piece(&mut self) -> TetrominoType {
        if self.queue.len() <= 7 {
            self.refill();
        }
        // The queue is never empty after a refill
        self.queue.pop_front().unwrap_or(TetrominoType::T)
    }

    /// Preview the next `count` pieces without removing them (at least 7 are always queued)
    pub fn preview(&self, count: usize) -> impl Iterator<Item = TetrominoType> + '_ {
        self.queue.iter().copied().take(count)
    }

    /// Append a freshly shuffled bag
    fn refill(&mut self) {
        let mut new_bag = TetrominoType::all();
        new_bag.shuffle(&mut self.rng);
        self.queue.extend(new_bag);
    }
}

impl<R: Rng> Iterator for Bag<R> {
    type Item = TetrominoType;

    fn next(&mut self) -> Option<TetrominoType> {
        Some(self.next_piece())
    }
}
