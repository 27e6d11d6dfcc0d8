//! Attention Pipeline
//!
//! Drives frames from the current source through landmark extraction,
//! attention scoring, score history, throttled emission, and presentation.
//! One extraction is in flight at a time and every frame is fully processed
//! before the next is pulled.

pub mod extractor;
pub mod frame_loop;
pub mod presentation;
pub mod session;

pub use extractor::{
    ExtractionResult, LandmarkExtractor, RecordedExtractor, ScriptPhase, ScriptedExtractor,
};
pub use frame_loop::{FrameLoop, FrameLoopConfig, LoopState, TickOutcome};
pub use presentation::{CanvasSize, FrameView, PresentationSink, TracingSink};
pub use session::{AttentionSession, FrameReport, SessionConfig};

use thiserror::Error;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid scoring policy: {0}")]
    Scoring(#[from] attention::AttentionError),

    #[error("Invalid history settings: {0}")]
    History(#[from] score_history::HistoryError),

    #[error("Invalid emitter settings: {0}")]
    Emitter(#[from] score_emitter::EmitterError),
}

/// Landmark extractor error types
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Extraction failed: {0}")]
    Failed(String),

    #[error("Recording error: {0}")]
    Recording(String),

    #[error("Recording line {line}: {reason}")]
    RecordingLine { line: usize, reason: String },
}
