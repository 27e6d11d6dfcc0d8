//! Landmark extractor capability and built-in extractors

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use attention::SyntheticFace;
use camera_capture::VideoFrame;
use face_landmarks::LandmarkSet;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ExtractError;

/// Faces found in one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Landmark sets, one per face; only the first is used
    #[serde(default)]
    pub faces: Vec<LandmarkSet>,
}

impl ExtractionResult {
    /// Result with no face
    pub fn no_face() -> Self {
        Self::default()
    }

    /// Result with a single face
    pub fn single(face: LandmarkSet) -> Self {
        Self { faces: vec![face] }
    }

    pub fn face_detected(&self) -> bool {
        !self.faces.is_empty()
    }

    /// The tracked subject's landmarks
    pub fn primary(&self) -> Option<&LandmarkSet> {
        self.faces.first()
    }
}

/// Asynchronous frame → landmarks capability.
///
/// The frame loop awaits each call before pulling the next frame, so an
/// implementation never sees concurrent requests.
pub trait LandmarkExtractor: Send {
    fn extract(
        &mut self,
        frame: &VideoFrame,
    ) -> impl Future<Output = Result<ExtractionResult, ExtractError>> + Send;
}

/// Replays recorded extractor output, indexed by frame sequence number.
///
/// Recording format is JSON lines, one `ExtractionResult` per frame:
/// `{"faces": [[{"x": 0.5, "y": 0.4}, ...]]}`. Playback loops.
pub struct RecordedExtractor {
    frames: Vec<ExtractionResult>,
}

impl RecordedExtractor {
    /// Wrap already-loaded results
    pub fn new(frames: Vec<ExtractionResult>) -> Result<Self, ExtractError> {
        if frames.is_empty() {
            return Err(ExtractError::Recording("recording has no frames".to_string()));
        }
        Ok(Self { frames })
    }

    /// Parse a JSON-lines recording; blank lines are skipped
    pub fn parse(contents: &str) -> Result<Self, ExtractError> {
        let frames = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str::<ExtractionResult>(line).map_err(|e| {
                    ExtractError::RecordingLine {
                        line: i + 1,
                        reason: e.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(frames)
    }

    /// Load a JSON-lines recording from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ExtractError::Recording(format!("{}: {}", path.display(), e)))?;
        let extractor = Self::parse(&contents)?;
        info!(
            "Loaded landmark recording {} ({} frames)",
            path.display(),
            extractor.len()
        );
        Ok(extractor)
    }

    /// Number of recorded frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl LandmarkExtractor for RecordedExtractor {
    async fn extract(&mut self, frame: &VideoFrame) -> Result<ExtractionResult, ExtractError> {
        let index = (frame.sequence % self.frames.len() as u64) as usize;
        Ok(self.frames[index].clone())
    }
}

/// One phase of a scripted subject
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptPhase {
    /// Number of frames the phase lasts
    pub frames: u64,
    /// Face to present, or `None` for an empty frame
    pub face: Option<SyntheticFace>,
}

impl ScriptPhase {
    pub fn face(frames: u64, face: SyntheticFace) -> Self {
        Self {
            frames,
            face: Some(face),
        }
    }

    pub fn absent(frames: u64) -> Self {
        Self { frames, face: None }
    }
}

/// Synthetic subject cycling through scripted phases by frame sequence
pub struct ScriptedExtractor {
    phases: Vec<(ScriptPhase, Option<LandmarkSet>)>,
    cycle_len: u64,
    latency: Duration,
}

impl ScriptedExtractor {
    /// Build from phases; zero-length phases are dropped
    pub fn new(phases: Vec<ScriptPhase>, latency: Duration) -> Result<Self, ExtractError> {
        let phases = phases.into_iter().filter(|p| p.frames > 0).collect();
        let extractor = Self::with_phases(phases, latency);
        if extractor.cycle_len == 0 {
            return Err(ExtractError::Failed("script has no frames".to_string()));
        }
        Ok(extractor)
    }

    /// Attentive, looking away, eyes closed, then absent (at ~30 fps)
    pub fn demo(latency: Duration) -> Self {
        let phases = vec![
            ScriptPhase::face(90, SyntheticFace::new()),
            ScriptPhase::face(60, SyntheticFace::new().yaw(30.0)),
            ScriptPhase::face(60, SyntheticFace::new().ear(0.1)),
            ScriptPhase::face(30, SyntheticFace::new().yaw(-25.0).ear(0.1)),
            ScriptPhase::absent(30),
        ];
        Self::with_phases(phases, latency)
    }

    fn with_phases(phases: Vec<ScriptPhase>, latency: Duration) -> Self {
        let phases: Vec<_> = phases
            .into_iter()
            .map(|p| {
                let set = p.face.map(|f| f.build());
                (p, set)
            })
            .collect();
        let cycle_len = phases.iter().map(|(p, _)| p.frames).sum();
        Self {
            phases,
            cycle_len,
            latency,
        }
    }

    fn result_for(&self, sequence: u64) -> ExtractionResult {
        let mut offset = sequence % self.cycle_len;
        for (phase, set) in &self.phases {
            if offset < phase.frames {
                return set.clone().map(ExtractionResult::single).unwrap_or_default();
            }
            offset -= phase.frames;
        }
        ExtractionResult::no_face()
    }
}

impl LandmarkExtractor for ScriptedExtractor {
    async fn extract(&mut self, frame: &VideoFrame) -> Result<ExtractionResult, ExtractError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.result_for(frame.sequence))
    }
}
