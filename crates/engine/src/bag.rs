use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shuffled bag of catalogue indices, drawn without replacement and
/// refilled with a fresh shuffle once empty.
///
/// The front `in_cycle` entries belong to the cycle being drawn. Anything
/// behind them is the next cycle, shuffled early so `peek` always answers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeBag {
    pending: VecDeque<usize>,
    in_cycle: usize,
    size: usize,
}

impl ShapeBag {
    pub fn new<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut bag = Self {
            pending: VecDeque::with_capacity(size),
            in_cycle: 0,
            size,
        };
        bag.refill(rng);
        bag.in_cycle = bag.pending.len();
        bag
    }

    /// Bag with a fixed draw order, refills still shuffle
    pub fn from_order(order: &[usize], size: usize) -> Self {
        let pending: VecDeque<usize> = order.iter().copied().filter(|&idx| idx < size).collect();
        Self {
            in_cycle: pending.len(),
            pending,
            size,
        }
    }

    fn refill<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut fresh: Vec<usize> = (0..self.size).collect();
        fresh.shuffle(rng);
        self.pending.extend(fresh);
    }

    /// Next index. The next cycle is shuffled in as soon as the current one
    /// hands out its last entry. `None` only for a zero-size bag.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.pending.is_empty() {
            self.refill(rng);
        }
        if self.in_cycle == 0 {
            self.in_cycle = self.pending.len();
        }
        let idx = self.pending.pop_front()?;
        self.in_cycle -= 1;
        if self.pending.is_empty() {
            self.refill(rng);
        }
        Some(idx)
    }

    pub fn peek(&self) -> Option<usize> {
        self.pending.front().copied()
    }

    /// Return a rejected draw to the end of the cycle it came from
    pub fn put_back(&mut self, idx: usize) {
        if idx < self.size {
            self.pending.insert(self.in_cycle, idx);
            self.in_cycle += 1;
        }
    }

    /// Entries left in the cycle being drawn
    pub fn remaining(&self) -> impl Iterator<Item = usize> + '_ {
        self.pending.iter().copied().take(self.in_cycle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of distinct shapes the bag cycles through
    pub fn size(&self) -> usize {
        self.size
    }
}
