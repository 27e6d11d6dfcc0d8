//! Frame sources and the swappable source slot
//!
//! The slot is the only thing a processing loop holds on to. Changing
//! camera replaces the slot's content; the loop keeps running and simply
//! reads from whichever source is installed on its next tick.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::info;

use crate::{CameraConfig, CaptureError, VideoFrame};

/// Playback state of a frame source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// Producing frames
    Active,
    /// Temporarily not producing frames
    Paused,
    /// Will never produce another frame
    Ended,
}

/// Producer of video frames
pub trait FrameSource: Send {
    /// Human-readable device label
    fn label(&self) -> &str;

    /// Current playback state
    fn state(&self) -> SourceState;

    /// Read the current frame, or `None` if no new frame is available yet
    fn read_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError>;
}

/// Outcome of polling the slot for a frame
#[derive(Debug, Clone, PartialEq)]
pub enum FramePoll {
    /// A frame is ready for processing
    Frame(VideoFrame),
    /// Source active but no new frame yet
    NotReady,
    /// Source paused
    Paused,
    /// Source ended
    Ended,
    /// No source installed
    NoSource,
}

struct SlotInner {
    source: Mutex<Option<Box<dyn FrameSource>>>,
    generation: watch::Sender<u64>,
}

/// Shared, swappable holder for the current frame source
#[derive(Clone)]
pub struct FrameSlot {
    inner: Arc<SlotInner>,
}

impl FrameSlot {
    /// Create an empty slot
    pub fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            inner: Arc::new(SlotInner {
                source: Mutex::new(None),
                generation,
            }),
        }
    }

    /// Install a source, returning the one it replaces
    pub async fn install(&self, source: Box<dyn FrameSource>) -> Option<Box<dyn FrameSource>> {
        info!("Installing frame source: {}", source.label());
        let previous = self.inner.source.lock().await.replace(source);
        self.inner.generation.send_modify(|g| *g += 1);
        previous
    }

    /// Remove the current source
    pub async fn remove(&self) -> Option<Box<dyn FrameSource>> {
        let previous = self.inner.source.lock().await.take();
        if let Some(source) = &previous {
            info!("Removed frame source: {}", source.label());
            self.inner.generation.send_modify(|g| *g += 1);
        }
        previous
    }

    /// Whether a source is installed
    pub async fn is_installed(&self) -> bool {
        self.inner.source.lock().await.is_some()
    }

    /// Label of the installed source
    pub async fn current_label(&self) -> Option<String> {
        self.inner
            .source
            .lock()
            .await
            .as_ref()
            .map(|s| s.label().to_string())
    }

    /// Number of install/remove operations so far
    pub fn generation(&self) -> u64 {
        *self.inner.generation.borrow()
    }

    /// Wait until a source is installed
    pub async fn wait_for_source(&self) {
        let mut changes = self.inner.generation.subscribe();
        loop {
            if self.is_installed().await {
                return;
            }
            // The sender lives in `inner`, so this only fails if the slot is gone
            if changes.changed().await.is_err() {
                return;
            }
        }
    }

    /// Read a frame from the installed source if it is active
    pub async fn poll_frame(&self) -> Result<FramePoll, CaptureError> {
        let mut guard = self.inner.source.lock().await;
        let Some(source) = guard.as_mut() else {
            return Ok(FramePoll::NoSource);
        };

        match source.state() {
            SourceState::Paused => Ok(FramePoll::Paused),
            SourceState::Ended => Ok(FramePoll::Ended),
            SourceState::Active => Ok(source
                .read_frame()?
                .map_or(FramePoll::NotReady, FramePoll::Frame)),
        }
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Source producing pixel-less frames at a fixed resolution.
///
/// Pairs with extractors that derive landmarks from the frame sequence
/// number (recordings, scripted subjects) rather than from pixels.
pub struct BlankFrameSource {
    label: String,
    width: u32,
    height: u32,
    max_frames: Option<u64>,
    frame_period_ns: u64,
    sequence: u64,
}

impl BlankFrameSource {
    /// Create a source from capture configuration
    pub fn new(label: impl Into<String>, config: &CameraConfig) -> Result<Self, CaptureError> {
        config.validate()?;
        Ok(Self {
            label: label.into(),
            width: config.width,
            height: config.height,
            max_frames: config.max_frames,
            frame_period_ns: config.frame_period_ns(),
            sequence: 0,
        })
    }

    /// Frames produced so far
    pub fn frames_produced(&self) -> u64 {
        self.sequence
    }
}

impl FrameSource for BlankFrameSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn state(&self) -> SourceState {
        match self.max_frames {
            Some(max) if self.sequence >= max => SourceState::Ended,
            _ => SourceState::Active,
        }
    }

    fn read_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError> {
        if self.state() == SourceState::Ended {
            return Ok(None);
        }

        // Stamped on the nominal frame clock
        let timestamp_ns = self.sequence.saturating_mul(self.frame_period_ns);
        let frame = VideoFrame::blank(self.width, self.height, timestamp_ns, self.sequence);
        self.sequence += 1;
        Ok(Some(frame))
    }
}
