//! Attention Estimation
//!
//! Real-time attention scoring for a single on-camera subject:
//! - Head pose (yaw, pitch) from face-mesh landmarks
//! - Eye closure via Eye Aspect Ratio
//! - Threshold-gated multiplicative score fusion

pub mod config;
pub mod pose;
pub mod sample;
pub mod scorer;
pub mod synthetic;

pub use config::ScoringConfig;
pub use pose::{estimate_head_pose, HeadPose};
pub use sample::{AttentionSample, AttentionState};
pub use scorer::AttentionScorer;
pub use synthetic::SyntheticFace;

use thiserror::Error;

/// Attention error types
#[derive(Error, Debug)]
pub enum AttentionError {
    #[error("Configuration error: {0}")]
    Config(String),
}
