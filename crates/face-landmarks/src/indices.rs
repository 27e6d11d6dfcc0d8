//! Face-mesh index scheme (468-point MediaPipe layout)
//!
//! Only the subset read by the pipeline is named here. If the extractor's
//! schema changes these constants must change with it.

/// Index of a landmark the pipeline consumes.
///
/// Values only exist as the constants below, all of which are below
/// [`REQUIRED_LEN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LandmarkIndex(usize);

impl LandmarkIndex {
    const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw extractor index
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Six ordered eye-contour points: p1/p4 are the horizontal corners,
/// p2/p6 and p3/p5 the vertical lid pairs
pub type EyeContour = [LandmarkIndex; 6];

pub const NOSE_TIP: LandmarkIndex = LandmarkIndex::new(1);
pub const CHIN: LandmarkIndex = LandmarkIndex::new(152);
pub const LEFT_EYE_OUTER: LandmarkIndex = LandmarkIndex::new(33);
pub const RIGHT_EYE_OUTER: LandmarkIndex = LandmarkIndex::new(263);
pub const LEFT_MOUTH_CORNER: LandmarkIndex = LandmarkIndex::new(61);
pub const RIGHT_MOUTH_CORNER: LandmarkIndex = LandmarkIndex::new(291);

pub const LEFT_EYE: EyeContour = [
    LandmarkIndex::new(33),
    LandmarkIndex::new(160),
    LandmarkIndex::new(158),
    LandmarkIndex::new(133),
    LandmarkIndex::new(153),
    LandmarkIndex::new(144),
];

pub const RIGHT_EYE: EyeContour = [
    LandmarkIndex::new(362),
    LandmarkIndex::new(385),
    LandmarkIndex::new(387),
    LandmarkIndex::new(263),
    LandmarkIndex::new(373),
    LandmarkIndex::new(380),
];

/// Points used for head pose
pub const POSE_POINTS: [LandmarkIndex; 6] = [
    NOSE_TIP,
    CHIN,
    LEFT_EYE_OUTER,
    RIGHT_EYE_OUTER,
    LEFT_MOUTH_CORNER,
    RIGHT_MOUTH_CORNER,
];

/// Every index the pipeline reads
pub const CONSUMED: [LandmarkIndex; 18] = [
    NOSE_TIP,
    CHIN,
    LEFT_EYE_OUTER,
    RIGHT_EYE_OUTER,
    LEFT_MOUTH_CORNER,
    RIGHT_MOUTH_CORNER,
    LEFT_EYE[1],
    LEFT_EYE[2],
    LEFT_EYE[3],
    LEFT_EYE[4],
    LEFT_EYE[5],
    RIGHT_EYE[0],
    RIGHT_EYE[1],
    RIGHT_EYE[2],
    RIGHT_EYE[4],
    RIGHT_EYE[5],
    // 33 and 263 are shared between the pose points and the eye contours
    LEFT_EYE[0],
    RIGHT_EYE[3],
];

/// Minimum landmark count for a set to be usable
pub const REQUIRED_LEN: usize = max_index(&CONSUMED) + 1;

/// Point count of a full face mesh without iris refinement
pub const FACE_MESH_LEN: usize = 468;

const fn max_index(indices: &[LandmarkIndex]) -> usize {
    let mut max = 0;
    let mut i = 0;
    while i < indices.len() {
        if indices[i].0 > max {
            max = indices[i].0;
        }
        i += 1;
    }
    max
}

const _: () = assert!(REQUIRED_LEN <= FACE_MESH_LEN);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_len_covers_all_indices() {
        assert_eq!(REQUIRED_LEN, 388);
        for idx in LEFT_EYE.iter().chain(RIGHT_EYE.iter()).chain(POSE_POINTS.iter()) {
            assert!(idx.get() < REQUIRED_LEN);
        }
    }

    #[test]
    fn test_eye_contours_share_outer_corners() {
        assert_eq!(LEFT_EYE[0], LEFT_EYE_OUTER);
        assert_eq!(RIGHT_EYE[3], RIGHT_EYE_OUTER);
    }
}
