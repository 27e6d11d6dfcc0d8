//! Synthetic face-mesh generation
//!
//! Builds full landmark sets that read back as a requested yaw, pitch, and
//! EAR under this crate's estimator. Used for scripted subjects and tests.

use face_landmarks::indices::{self, EyeContour, FACE_MESH_LEN};
use face_landmarks::{Landmark, LandmarkSet};

use crate::pose::{NEUTRAL_NOSE_RATIO, PITCH_SCALE_DEG, YAW_SCALE_DEG};

const CENTER_X: f64 = 0.5;
const EYE_Y: f64 = 0.4;
const FACE_WIDTH: f64 = 0.2;
const EYE_WIDTH: f64 = 0.06;
const EYE_TO_CHIN: f64 = 0.4;
const MOUTH_Y: f64 = 0.7;
const MOUTH_HALF_WIDTH: f64 = 0.05;

/// Largest yaw or pitch the builder will place
pub const MAX_ANGLE_DEG: f64 = 180.0;
/// Largest EAR the builder will place
pub const MAX_EAR: f64 = 2.0;

/// Builder for a synthetic frontal face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticFace {
    yaw: f64,
    pitch: f64,
    ear: f64,
}

impl Default for SyntheticFace {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            ear: 0.35,
        }
    }
}

impl SyntheticFace {
    /// Frontal face with open eyes
    pub fn new() -> Self {
        Self::default()
    }

    /// Target yaw in degrees, clamped to ±MAX_ANGLE_DEG; non-finite reads as 0
    pub fn yaw(mut self, yaw: f64) -> Self {
        self.yaw = finite_or(yaw, 0.0).clamp(-MAX_ANGLE_DEG, MAX_ANGLE_DEG);
        self
    }

    /// Target pitch in degrees, clamped to ±MAX_ANGLE_DEG; non-finite reads as 0
    pub fn pitch(mut self, pitch: f64) -> Self {
        self.pitch = finite_or(pitch, 0.0).clamp(-MAX_ANGLE_DEG, MAX_ANGLE_DEG);
        self
    }

    /// Target EAR for both eyes, clamped to [0, MAX_EAR]; non-finite reads as closed
    pub fn ear(mut self, ear: f64) -> Self {
        self.ear = finite_or(ear, 0.0).clamp(0.0, MAX_EAR);
        self
    }

    /// Generate the landmark set
    pub fn build(&self) -> LandmarkSet {
        let mut points = vec![Landmark::new(CENTER_X, 0.5); FACE_MESH_LEN];
        let mut place = |index: indices::LandmarkIndex, x: f64, y: f64| {
            points[index.get()] = Landmark::new(x, y);
        };

        let left_x = CENTER_X - FACE_WIDTH / 2.0;
        let right_x = CENTER_X + FACE_WIDTH / 2.0;

        let nose_x = CENTER_X + (self.yaw / YAW_SCALE_DEG) * FACE_WIDTH;
        let nose_ratio = self.pitch / PITCH_SCALE_DEG + NEUTRAL_NOSE_RATIO;
        let nose_y = EYE_Y + nose_ratio * EYE_TO_CHIN;

        place(indices::NOSE_TIP, nose_x, nose_y);
        place(indices::CHIN, CENTER_X, EYE_Y + EYE_TO_CHIN);
        place(indices::LEFT_MOUTH_CORNER, CENTER_X - MOUTH_HALF_WIDTH, MOUTH_Y);
        place(indices::RIGHT_MOUTH_CORNER, CENTER_X + MOUTH_HALF_WIDTH, MOUTH_Y);

        // Outer corners are p1 of the left contour and p4 of the right one
        place_eye(&mut place, &indices::LEFT_EYE, left_x, self.ear);
        place_eye(&mut place, &indices::RIGHT_EYE, right_x - EYE_WIDTH, self.ear);

        // Setters keep every coordinate finite and every consumed index is
        // placed within FACE_MESH_LEN
        match LandmarkSet::new(points) {
            Ok(set) => set,
            Err(e) => unreachable!("synthetic face is always valid: {}", e),
        }
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn place_eye(
    place: &mut impl FnMut(indices::LandmarkIndex, f64, f64),
    eye: &EyeContour,
    x0: f64,
    ear: f64,
) {
    let [p1, p2, p3, p4, p5, p6] = *eye;
    let half_lid = ear * EYE_WIDTH / 2.0;

    place(p1, x0, EYE_Y);
    place(p4, x0 + EYE_WIDTH, EYE_Y);
    place(p2, x0 + EYE_WIDTH / 3.0, EYE_Y - half_lid);
    place(p6, x0 + EYE_WIDTH / 3.0, EYE_Y + half_lid);
    place(p3, x0 + 2.0 * EYE_WIDTH / 3.0, EYE_Y - half_lid);
    place(p5, x0 + 2.0 * EYE_WIDTH / 3.0, EYE_Y + half_lid);
}
