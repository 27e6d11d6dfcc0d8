//! Presentation sink

use attention::{AttentionSample, AttentionState};
use score_emitter::SendOutcome;
use tracing::{debug, info};

/// Canvas resolution, kept in step with the source's native resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

/// Everything a renderer needs for one processed frame
#[derive(Debug)]
pub struct FrameView<'a> {
    /// Sample for this frame
    pub sample: &'a AttentionSample,
    /// Which penalties applied
    pub state: AttentionState,
    /// Recent scores, oldest first
    pub history: &'a [f64],
    /// Mean of the history window
    pub smoothed: Option<f64>,
    /// Canvas resolution
    pub canvas: CanvasSize,
    /// Pose and eye landmarks in canvas pixels, empty without a face
    pub overlay: &'a [(f64, f64)],
    /// What the emitter did with this frame's score
    pub emission: &'a SendOutcome,
}

/// Consumer of per-frame results
pub trait PresentationSink: Send {
    fn present(&mut self, view: &FrameView<'_>);
}

/// Sink that reports frames through `tracing`.
///
/// Every frame is logged at debug level; attention state changes at info.
#[derive(Debug, Default)]
pub struct TracingSink {
    last_state: Option<AttentionState>,
    frames: u64,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl PresentationSink for TracingSink {
    fn present(&mut self, view: &FrameView<'_>) {
        self.frames += 1;
        let sample = view.sample;

        debug!(
            "score={:.2} yaw={:.1} pitch={:.1} ear={:.2} face={} canvas={}x{}",
            sample.score,
            sample.yaw,
            sample.pitch,
            sample.ear,
            sample.face_detected,
            view.canvas.width,
            view.canvas.height
        );

        if self.last_state != Some(view.state) {
            info!(
                "Attention: {} (score {:.2}, smoothed {:.2})",
                view.state.label(),
                sample.score,
                view.smoothed.unwrap_or(sample.score)
            );
            self.last_state = Some(view.state);
        }
    }
}
