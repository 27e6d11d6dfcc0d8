//! Head pose estimation from face-mesh landmarks
//!
//! A geometric approximation from four points (nose tip, chin, both outer
//! eye corners); no camera model or PnP solve is involved.

use face_landmarks::{distance, indices, LandmarkSet, EPSILON};
use serde::{Deserialize, Serialize};

/// Degrees per unit of nose offset from the eye midline, in face widths
pub const YAW_SCALE_DEG: f64 = 55.0;

/// Nose tip position along the eye-to-chin axis when facing the camera
pub const NEUTRAL_NOSE_RATIO: f64 = 0.46;

/// Degrees per unit of deviation from the neutral nose ratio
pub const PITCH_SCALE_DEG: f64 = 120.0;

/// Head pose (Euler angles)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadPose {
    /// Yaw (left-right rotation) in degrees
    pub yaw: f64,
    /// Pitch (up-down tilt) in degrees, positive when looking down
    pub pitch: f64,
    /// Roll (side tilt) in degrees; display only, never scored
    pub roll: f64,
}

/// Estimate head pose from a landmark set.
///
/// Degenerate geometry yields neutral angles rather than an error: a face
/// too small or edge-on gives zero yaw and pitch, and a collapsed eye-chin
/// span gives zero pitch.
pub fn estimate_head_pose(landmarks: &LandmarkSet) -> HeadPose {
    let nose = landmarks.at(indices::NOSE_TIP);
    let chin = landmarks.at(indices::CHIN);
    let left = landmarks.at(indices::LEFT_EYE_OUTER);
    let right = landmarks.at(indices::RIGHT_EYE_OUTER);

    let face_width = distance(&left, &right);
    if face_width < EPSILON {
        return HeadPose::default();
    }

    let eye_mid_x = (left.x + right.x) / 2.0;
    let eye_mid_y = (left.y + right.y) / 2.0;

    let yaw = ((nose.x - eye_mid_x) / face_width) * YAW_SCALE_DEG;
    let roll = (right.y - left.y).atan2(right.x - left.x).to_degrees();

    let eye_to_chin = chin.y - eye_mid_y;
    if eye_to_chin < EPSILON {
        return HeadPose { yaw, pitch: 0.0, roll };
    }

    let nose_ratio = (nose.y - eye_mid_y) / eye_to_chin;
    let pitch = (nose_ratio - NEUTRAL_NOSE_RATIO) * PITCH_SCALE_DEG;

    HeadPose { yaw, pitch, roll }
}
