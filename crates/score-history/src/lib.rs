//! Score History
//!
//! Provides a fixed-capacity FIFO window of recent attention scores for
//! display and smoothing.

mod buffer;

pub use buffer::{ScoreHistory, DEFAULT_CAPACITY};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// History error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("History capacity must be at least 1")]
    ZeroCapacity,
}

/// History configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of scores retained
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}
