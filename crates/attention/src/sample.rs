//! Per-frame attention results

use serde::{Deserialize, Serialize};

/// Attention result for one processed frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttentionSample {
    /// Fused attention score in [0, 1]
    pub score: f64,

    /// Head yaw in degrees
    pub yaw: f64,

    /// Head pitch in degrees
    pub pitch: f64,

    /// Mean Eye Aspect Ratio of both eyes
    pub ear: f64,

    /// Whether a face was detected
    pub face_detected: bool,
}

/// Why a sample lost attention, if it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttentionState {
    /// Facing the camera with open eyes
    Attentive,
    /// Head turned or tilted beyond the pose thresholds
    LookingAway,
    /// Eyes closed or nearly closed
    EyesClosed,
    /// Both penalties apply
    LookingAwayEyesClosed,
    /// No trackable face
    NoFace,
}

impl AttentionSample {
    /// Sample produced when no face is present
    pub fn no_face() -> Self {
        Self::default()
    }
}

impl AttentionState {
    /// Short label for display
    pub fn label(&self) -> &'static str {
        match self {
            AttentionState::Attentive => "attentive",
            AttentionState::LookingAway => "looking away",
            AttentionState::EyesClosed => "eyes closed",
            AttentionState::LookingAwayEyesClosed => "looking away, eyes closed",
            AttentionState::NoFace => "no face",
        }
    }
}
