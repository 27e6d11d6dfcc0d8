//! Point distance and Eye Aspect Ratio

use crate::{EyeContour, Landmark, LandmarkSet};

/// Threshold below which a distance is treated as degenerate
pub const EPSILON: f64 = 1e-6;

/// EAR returned when the eye's horizontal extent is degenerate.
/// Sits between typical open (~0.3+) and closed (<0.2) readings.
pub const DEGENERATE_EAR: f64 = 0.3;

/// Euclidean distance between two landmarks in normalized (x, y) space
pub fn distance(a: &Landmark, b: &Landmark) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Eye Aspect Ratio for one eye contour.
///
/// `EAR = (|p2-p6| + |p3-p5|) / (2 * |p1-p4|)`
pub fn eye_aspect_ratio(landmarks: &LandmarkSet, eye: &EyeContour) -> f64 {
    let [p1, p2, p3, p4, p5, p6] = eye.map(|i| landmarks.at(i));

    let horizontal = distance(&p1, &p4);
    if horizontal < EPSILON {
        return DEGENERATE_EAR;
    }

    (distance(&p2, &p6) + distance(&p3, &p5)) / (2.0 * horizontal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indices::{FACE_MESH_LEN, LEFT_EYE};
    use proptest::prelude::*;

    /// Place the left eye contour: corners `width` apart, both lid pairs
    /// `height` apart
    fn left_eye_set(width: f64, height: f64) -> LandmarkSet {
        let mut points = vec![Landmark::new(0.5, 0.5); FACE_MESH_LEN];
        let (x0, y0) = (0.3, 0.4);
        let [p1, p2, p3, p4, p5, p6] = LEFT_EYE.map(|i| i.get());

        points[p1] = Landmark::new(x0, y0);
        points[p4] = Landmark::new(x0 + width, y0);
        points[p2] = Landmark::new(x0 + width / 3.0, y0 - height / 2.0);
        points[p6] = Landmark::new(x0 + width / 3.0, y0 + height / 2.0);
        points[p3] = Landmark::new(x0 + 2.0 * width / 3.0, y0 - height / 2.0);
        points[p5] = Landmark::new(x0 + 2.0 * width / 3.0, y0 + height / 2.0);

        LandmarkSet::new(points).unwrap()
    }

    #[test]
    fn test_distance() {
        let a = Landmark::new(0.0, 0.0);
        let b = Landmark::new(0.3, 0.4);
        assert!((distance(&a, &b) - 0.5).abs() < 1e-12);
        assert_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn test_distance_ignores_depth() {
        let a = Landmark { x: 0.1, y: 0.1, z: Some(0.0) };
        let b = Landmark { x: 0.1, y: 0.1, z: Some(5.0) };
        assert_eq!(distance(&a, &b), 0.0);
    }

    #[test]
    fn test_open_eye_ear() {
        let set = left_eye_set(0.06, 0.021);
        let ear = eye_aspect_ratio(&set, &LEFT_EYE);
        assert!((ear - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_closed_eye_ear() {
        let set = left_eye_set(0.06, 0.0);
        assert_eq!(eye_aspect_ratio(&set, &LEFT_EYE), 0.0);
    }

    #[test]
    fn test_degenerate_eye_returns_fallback() {
        let set = left_eye_set(0.0, 0.02);
        assert_eq!(eye_aspect_ratio(&set, &LEFT_EYE), DEGENERATE_EAR);

        let set = left_eye_set(EPSILON / 2.0, 0.02);
        assert_eq!(eye_aspect_ratio(&set, &LEFT_EYE), DEGENERATE_EAR);
    }

    proptest! {
        #[test]
        fn prop_ear_finite_and_non_negative(
            width in EPSILON * 2.0..0.5f64,
            height in 0.0..0.5f64,
        ) {
            let ear = eye_aspect_ratio(&left_eye_set(width, height), &LEFT_EYE);
            prop_assert!(ear.is_finite());
            prop_assert!(ear >= 0.0);
        }

        #[test]
        fn prop_degenerate_width_always_fallback(
            width in 0.0..EPSILON * 0.9,
            height in 0.0..0.5f64,
        ) {
            let ear = eye_aspect_ratio(&left_eye_set(width, height), &LEFT_EYE);
            prop_assert_eq!(ear, DEGENERATE_EAR);
        }
    }
}
