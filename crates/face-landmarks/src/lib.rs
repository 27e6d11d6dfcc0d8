//! Face Landmarks
//!
//! Landmark data model consumed by the attention pipeline:
//! - Normalized landmark points and validated landmark sets
//! - Face-mesh index scheme for the points the pipeline reads
//! - Point distance and Eye Aspect Ratio (EAR)

pub mod geometry;
pub mod indices;

pub use geometry::{distance, eye_aspect_ratio, DEGENERATE_EAR, EPSILON};
pub use indices::{EyeContour, LandmarkIndex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Landmark error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Landmark set too short: {len} points, need at least {required}")]
    TooFewPoints { len: usize, required: usize },

    #[error("Landmark {index} has non-finite coordinates")]
    NonFinite { index: usize },
}

/// A single tracked facial point, normalized to [0, 1] relative to the frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Relative depth, when the extractor provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Landmark {
    /// Create a 2-D landmark
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Convert to pixel coordinates for a frame of the given size
    pub fn to_pixel(&self, width: u32, height: u32) -> (f64, f64) {
        (self.x * width as f64, self.y * height as f64)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Ordered landmark sequence for one face.
///
/// Construction guarantees that every [`LandmarkIndex`] constant resolves,
/// so lookups through [`LandmarkSet::at`] never fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    /// Validate and wrap an extractor's point list
    pub fn new(points: Vec<Landmark>) -> Result<Self, GeometryError> {
        if points.len() < indices::REQUIRED_LEN {
            return Err(GeometryError::TooFewPoints {
                len: points.len(),
                required: indices::REQUIRED_LEN,
            });
        }

        if let Some(index) = indices::CONSUMED
            .iter()
            .map(|i| i.get())
            .find(|&i| !points[i].is_finite())
        {
            return Err(GeometryError::NonFinite { index });
        }

        Ok(Self { points })
    }

    /// Look up one of the consumed landmarks
    pub fn at(&self, index: LandmarkIndex) -> Landmark {
        self.points[index.get()]
    }

    /// Look up any landmark by raw extractor index
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    /// Number of points in the set
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a validated set, kept for API symmetry
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in extractor order
    pub fn points(&self) -> &[Landmark] {
        &self.points
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkSet {
    type Error = GeometryError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<LandmarkSet> for Vec<Landmark> {
    fn from(set: LandmarkSet) -> Self {
        set.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_set() {
        let err = LandmarkSet::new(vec![Landmark::default(); 10]).unwrap_err();
        assert_eq!(
            err,
            GeometryError::TooFewPoints {
                len: 10,
                required: indices::REQUIRED_LEN
            }
        );
    }

    #[test]
    fn test_rejects_nan_in_consumed_point() {
        let mut points = vec![Landmark::new(0.5, 0.5); 468];
        points[indices::NOSE_TIP.get()].x = f64::NAN;

        let err = LandmarkSet::new(points).unwrap_err();
        assert_eq!(err, GeometryError::NonFinite { index: 1 });
    }

    #[test]
    fn test_ignores_nan_in_unused_point() {
        let mut points = vec![Landmark::new(0.5, 0.5); 468];
        points[400].y = f64::NAN;
        assert!(LandmarkSet::new(points).is_ok());
    }

    #[test]
    fn test_deserialize_from_point_list() {
        let points: Vec<serde_json::Value> = (0..468)
            .map(|i| serde_json::json!({ "x": 0.5, "y": i as f64 / 1000.0 }))
            .collect();
        let json = serde_json::Value::Array(points).to_string();

        let set: LandmarkSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set.len(), 468);
        assert_eq!(set.at(indices::CHIN).y, 0.152);
        assert_eq!(set.at(indices::CHIN).z, None);
    }

    #[test]
    fn test_to_pixel() {
        let lm = Landmark::new(0.25, 0.5);
        assert_eq!(lm.to_pixel(640, 480), (160.0, 240.0));
    }
}
