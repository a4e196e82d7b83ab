//! Bounded history of completed rounds.

use aviator_types::game::CompletedRound;
use std::collections::VecDeque;

/// Ring buffer of completed rounds: oldest evicted first, insertion order
/// preserved.
pub struct RoundHistory {
    capacity: usize,
    rounds: VecDeque<CompletedRound>,
}

impl RoundHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            rounds: VecDeque::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, round: CompletedRound) {
        if self.rounds.len() == self.capacity {
            self.rounds.pop_front();
        }
        self.rounds.push_back(round);
    }

    /// All retained rounds, oldest first.
    pub fn list(&self) -> Vec<CompletedRound> {
        self.rounds.iter().cloned().collect()
    }

    /// The `n` most recent rounds, oldest of those first.
    pub fn latest(&self, n: usize) -> Vec<CompletedRound> {
        let skip = self.rounds.len().saturating_sub(n);
        self.rounds.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}
