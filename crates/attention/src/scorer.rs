//! Attention score fusion

use face_landmarks::{eye_aspect_ratio, indices, LandmarkSet};

use crate::config::ScoringConfig;
use crate::pose::estimate_head_pose;
use crate::sample::{AttentionSample, AttentionState};

/// Fuses head pose and eye closure into a single [0, 1] score.
///
/// Stateless apart from its policy: identical landmarks always produce
/// identical samples.
#[derive(Debug, Clone, Default)]
pub struct AttentionScorer {
    config: ScoringConfig,
}

impl AttentionScorer {
    /// Create a scorer with the given policy
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Active policy
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one frame.
    ///
    /// A missing face (flag unset or no landmarks) yields an all-zero sample.
    pub fn compute(&self, landmarks: Option<&LandmarkSet>, face_detected: bool) -> AttentionSample {
        let landmarks = match landmarks {
            Some(set) if face_detected => set,
            _ => return AttentionSample::no_face(),
        };

        let pose = estimate_head_pose(landmarks);
        let left_ear = eye_aspect_ratio(landmarks, &indices::LEFT_EYE);
        let right_ear = eye_aspect_ratio(landmarks, &indices::RIGHT_EYE);
        let ear = (left_ear + right_ear) / 2.0;

        AttentionSample {
            score: self.score_from_components(pose.yaw, pose.pitch, ear),
            yaw: pose.yaw,
            pitch: pose.pitch,
            ear,
            face_detected: true,
        }
    }

    /// Apply the penalty rule to raw pose angles and EAR
    pub fn score_from_components(&self, yaw: f64, pitch: f64, ear: f64) -> f64 {
        let mut score = 1.0;

        if self.is_looking_away(yaw, pitch) {
            score *= self.config.pose_penalty;
        }
        if self.is_eyes_closed(ear) {
            score *= self.config.ear_penalty;
        }

        score.clamp(0.0, 1.0)
    }

    /// Which penalties a sample incurred
    pub fn classify(&self, sample: &AttentionSample) -> AttentionState {
        if !sample.face_detected {
            return AttentionState::NoFace;
        }

        match (
            self.is_looking_away(sample.yaw, sample.pitch),
            self.is_eyes_closed(sample.ear),
        ) {
            (false, false) => AttentionState::Attentive,
            (true, false) => AttentionState::LookingAway,
            (false, true) => AttentionState::EyesClosed,
            (true, true) => AttentionState::LookingAwayEyesClosed,
        }
    }

    fn is_looking_away(&self, yaw: f64, pitch: f64) -> bool {
        yaw.abs() > self.config.yaw_threshold_deg || pitch.abs() > self.config.pitch_threshold_deg
    }

    fn is_eyes_closed(&self, ear: f64) -> bool {
        ear < self.config.ear_threshold
    }
}
