//! Rolling Score Window Implementation

use std::collections::VecDeque;

use crate::{HistoryConfig, HistoryError};

/// Default window size (20 samples)
pub const DEFAULT_CAPACITY: usize = 20;

/// FIFO window of recent scores, oldest evicted first
#[derive(Debug, Clone)]
pub struct ScoreHistory {
    /// Scores, oldest at the front
    scores: VecDeque<f64>,
    /// Capacity of the window
    capacity: usize,
    /// Total scores pushed (for statistics)
    total_pushed: u64,
}

impl ScoreHistory {
    /// Create a new history with given capacity
    pub fn new(capacity: usize) -> Result<Self, HistoryError> {
        if capacity == 0 {
            return Err(HistoryError::ZeroCapacity);
        }

        Ok(Self {
            scores: VecDeque::with_capacity(capacity),
            capacity,
            total_pushed: 0,
        })
    }

    /// Create a history from configuration
    pub fn from_config(config: &HistoryConfig) -> Result<Self, HistoryError> {
        Self::new(config.capacity)
    }

    /// Create a history with default capacity (20 scores)
    pub fn with_default_capacity() -> Self {
        Self {
            scores: VecDeque::with_capacity(DEFAULT_CAPACITY),
            capacity: DEFAULT_CAPACITY,
            total_pushed: 0,
        }
    }

    /// Append a score, evicting the oldest if full
    pub fn push(&mut self, score: f64) {
        if self.scores.len() == self.capacity {
            self.scores.pop_front();
        }
        self.scores.push_back(score);
        self.total_pushed += 1;
    }

    /// Current scores, oldest to newest
    pub fn snapshot(&self) -> Vec<f64> {
        self.scores.iter().copied().collect()
    }

    /// Iterate oldest to newest without copying
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.scores.iter().copied()
    }

    /// Most recent score
    pub fn latest(&self) -> Option<f64> {
        self.scores.back().copied()
    }

    /// Mean of the window, for a smoothed display value
    pub fn mean(&self) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        Some(self.scores.iter().sum::<f64>() / self.scores.len() as f64)
    }

    /// Number of scores currently held
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Get the window capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get total scores pushed since creation
    pub fn total_pushed(&self) -> u64 {
        self.total_pushed
    }

    /// Clear the history
    pub fn clear(&mut self) {
        self.scores.clear();
    }
}

impl Default for ScoreHistory {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_and_snapshot() {
        let mut history = ScoreHistory::new(10).unwrap();
        for i in 0..5 {
            history.push(i as f64 / 10.0);
        }

        assert_eq!(history.len(), 5);
        assert_eq!(history.snapshot(), vec![0.0, 0.1, 0.2, 0.3, 0.4]);
        assert_eq!(history.latest(), Some(0.4));
    }

    #[test]
    fn test_keeps_last_twenty_of_twenty_five() {
        let mut history = ScoreHistory::with_default_capacity();
        for i in 0..25 {
            history.push(i as f64);
        }

        let expected: Vec<f64> = (5..25).map(|i| i as f64).collect();
        assert_eq!(history.len(), 20);
        assert_eq!(history.snapshot(), expected);
        assert_eq!(history.total_pushed(), 25);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(ScoreHistory::new(0).unwrap_err(), HistoryError::ZeroCapacity);
    }

    #[test]
    fn test_mean() {
        let mut history = ScoreHistory::new(4).unwrap();
        assert_eq!(history.mean(), None);

        for score in [1.0, 0.5, 0.5, 0.0] {
            history.push(score);
        }
        assert_eq!(history.mean(), Some(0.5));
    }

    #[test]
    fn test_clear_keeps_total() {
        let mut history = ScoreHistory::new(3).unwrap();
        history.push(1.0);
        history.push(1.0);
        history.clear();

        assert!(history.is_empty());
        assert_eq!(history.total_pushed(), 2);
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_capacity(
            capacity in 1usize..50,
            scores in proptest::collection::vec(0.0..=1.0f64, 0..200),
        ) {
            let mut history = ScoreHistory::new(capacity).unwrap();
            for &score in &scores {
                history.push(score);
                prop_assert!(history.len() <= capacity);
            }

            let tail: Vec<f64> = scores.iter().rev().take(capacity).rev().copied().collect();
            prop_assert_eq!(history.snapshot(), tail);
        }
    }
}
