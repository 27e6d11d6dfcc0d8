//! Frame-loop driver
//!
//! Started once and never restarted. The loop reads whichever source the
//! [`FrameSlot`] holds on each tick, so swapping cameras never re-registers
//! anything here.

use std::future::Future;
use std::time::Duration;

use camera_capture::{FramePoll, FrameSlot, VideoFrame};
use chrono::Utc;
use face_landmarks::indices;
use score_emitter::Transport;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::extractor::{ExtractionResult, LandmarkExtractor};
use crate::presentation::{CanvasSize, FrameView, PresentationSink};
use crate::session::{AttentionSession, FrameReport};

/// Frame-loop configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameLoopConfig {
    /// Delay between ticks (milliseconds), roughly one display frame
    pub tick_interval_ms: u64,
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16,
        }
    }
}

/// Loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No source has been installed yet
    Idle,
    /// Pulling frames every tick
    Running,
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Still waiting for the first source
    Idle,
    /// Source absent, paused, ended, or without a new frame
    Skipped(FramePoll),
    /// Reading from the source failed
    CaptureFailed,
    /// The extractor failed; treated as no result for this tick
    ExtractorFailed,
    /// A result went through scoring, history, emission, and presentation
    Processed(FrameReport),
}

/// Pulls frames, awaits the extractor, and feeds the session
pub struct FrameLoop<E, T, P> {
    slot: FrameSlot,
    extractor: E,
    session: AttentionSession<T>,
    sink: P,
    tick_interval: Duration,
    state: LoopState,
    canvas: Option<CanvasSize>,
}

impl<E, T, P> FrameLoop<E, T, P>
where
    E: LandmarkExtractor,
    T: Transport,
    P: PresentationSink,
{
    /// Create an idle loop over a source slot
    pub fn new(
        slot: FrameSlot,
        extractor: E,
        session: AttentionSession<T>,
        sink: P,
        config: &FrameLoopConfig,
    ) -> Self {
        Self {
            slot,
            extractor,
            session,
            sink,
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            state: LoopState::Idle,
            canvas: None,
        }
    }

    /// Run one iteration
    pub async fn tick(&mut self) -> TickOutcome {
        if self.state == LoopState::Idle {
            if !self.slot.is_installed().await {
                return TickOutcome::Idle;
            }
            info!("Frame source available, frame loop running");
            self.state = LoopState::Running;
        }

        let frame = match self.slot.poll_frame().await {
            Ok(FramePoll::Frame(frame)) => frame,
            Ok(other) => return TickOutcome::Skipped(other),
            Err(e) => {
                warn!("Frame capture failed: {}", e);
                return TickOutcome::CaptureFailed;
            }
        };

        let result = match self.extractor.extract(&frame).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Landmark extraction failed on frame {}: {}", frame.sequence, e);
                metrics::counter!("attention_extractor_errors_total").increment(1);
                return TickOutcome::ExtractorFailed;
            }
        };

        let canvas = self.sync_canvas(&frame);
        let report = self.session.process(&result, Utc::now());

        metrics::counter!("attention_frames_processed_total").increment(1);
        if !report.sample.face_detected {
            metrics::counter!("attention_faces_missing_total").increment(1);
        }
        metrics::gauge!("attention_score").set(report.sample.score);

        let history = self.session.history().snapshot();
        let overlay = overlay_points(&result, canvas);
        self.sink.present(&FrameView {
            sample: &report.sample,
            state: report.state,
            history: &history,
            smoothed: self.session.history().mean(),
            canvas,
            overlay: &overlay,
            emission: &report.emission,
        });

        TickOutcome::Processed(report)
    }

    /// Tick until `shutdown` resolves.
    ///
    /// Waits without polling while idle, then ticks at the configured
    /// interval indefinitely.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!("Frame loop started (tick {}ms)", self.tick_interval.as_millis());

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = self.step() => {}
            }
        }

        info!(
            "Frame loop stopped after {} frames ({} scores sent)",
            self.session.frames_processed(),
            self.session.emitter().sent_count()
        );
    }

    async fn step(&mut self) {
        if self.state == LoopState::Idle {
            self.slot.wait_for_source().await;
        }
        self.tick().await;
        tokio::time::sleep(self.tick_interval).await;
    }

    fn sync_canvas(&mut self, frame: &VideoFrame) -> CanvasSize {
        let native = CanvasSize {
            width: frame.width,
            height: frame.height,
        };
        if self.canvas != Some(native) {
            debug!("Canvas resized to {}x{}", native.width, native.height);
            self.canvas = Some(native);
        }
        native
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn canvas(&self) -> Option<CanvasSize> {
        self.canvas
    }

    pub fn session(&self) -> &AttentionSession<T> {
        &self.session
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    /// Handle for installing or swapping sources while the loop runs
    pub fn slot(&self) -> &FrameSlot {
        &self.slot
    }
}

/// Pose points and eye contours of the primary face, in canvas pixels
fn overlay_points(result: &ExtractionResult, canvas: CanvasSize) -> Vec<(f64, f64)> {
    let Some(face) = result.primary() else {
        return Vec::new();
    };

    indices::POSE_POINTS
        .iter()
        .chain(indices::LEFT_EYE.iter())
        .chain(indices::RIGHT_EYE.iter())
        .map(|&i| face.at(i).to_pixel(canvas.width, canvas.height))
        .collect()
}
