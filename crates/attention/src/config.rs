//! Scoring configuration

use serde::{Deserialize, Serialize};

use crate::AttentionError;

/// Attention scoring policy.
///
/// Thresholds decide when a penalty applies; penalties are multiplicative
/// factors applied to a starting score of 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Yaw beyond which the subject is looking away (degrees)
    pub yaw_threshold_deg: f64,

    /// Pitch beyond which the subject is looking away (degrees)
    pub pitch_threshold_deg: f64,

    /// EAR below which eyes count as closed
    pub ear_threshold: f64,

    /// Score factor when looking away
    pub pose_penalty: f64,

    /// Score factor when eyes are closed
    pub ear_penalty: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            yaw_threshold_deg: 15.0,
            pitch_threshold_deg: 15.0,
            ear_threshold: 0.22,
            pose_penalty: 0.5,
            ear_penalty: 0.2,
        }
    }
}

impl ScoringConfig {
    /// Create strict config (tighter pose cone, harsher penalties)
    pub fn strict() -> Self {
        Self {
            yaw_threshold_deg: 10.0,
            pitch_threshold_deg: 10.0,
            pose_penalty: 0.3,
            ear_penalty: 0.1,
            ..Default::default()
        }
    }

    /// Create lenient config (wider pose cone)
    pub fn lenient() -> Self {
        Self {
            yaw_threshold_deg: 25.0,
            pitch_threshold_deg: 25.0,
            ear_threshold: 0.18,
            ..Default::default()
        }
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), AttentionError> {
        for (name, value) in [
            ("yaw_threshold_deg", self.yaw_threshold_deg),
            ("pitch_threshold_deg", self.pitch_threshold_deg),
            ("ear_threshold", self.ear_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AttentionError::Config(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in [
            ("pose_penalty", self.pose_penalty),
            ("ear_penalty", self.ear_penalty),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AttentionError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
