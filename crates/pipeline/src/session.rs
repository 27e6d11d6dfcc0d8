//! Attention session context
//!
//! Owns all mutable pipeline state (history, emission state) for one
//! subject. Constructed at startup and dropped at shutdown; only the frame
//! loop touches it, so no locking is involved.

use attention::{AttentionSample, AttentionScorer, AttentionState, ScoringConfig};
use chrono::{DateTime, Utc};
use score_emitter::{EmitterConfig, RateLimitedEmitter, SendOutcome, Transport};
use score_history::{HistoryConfig, ScoreHistory};
use serde::{Deserialize, Serialize};

use crate::extractor::ExtractionResult;
use crate::PipelineError;

/// Session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub scoring: ScoringConfig,
    pub history: HistoryConfig,
    pub emitter: EmitterConfig,
}

/// Outcome of processing one extraction result
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub sample: AttentionSample,
    pub state: AttentionState,
    pub emission: SendOutcome,
}

/// Scorer, history, and emitter for one subject
pub struct AttentionSession<T> {
    scorer: AttentionScorer,
    history: ScoreHistory,
    emitter: RateLimitedEmitter<T>,
    frames_processed: u64,
}

impl<T: Transport> AttentionSession<T> {
    /// Create a session, validating the configuration
    pub fn new(config: &SessionConfig, transport: T) -> Result<Self, PipelineError> {
        config.scoring.validate()?;
        config.emitter.validate()?;

        Ok(Self {
            scorer: AttentionScorer::new(config.scoring.clone()),
            history: ScoreHistory::from_config(&config.history)?,
            emitter: RateLimitedEmitter::new(transport, &config.emitter)?,
            frames_processed: 0,
        })
    }

    /// Score a result, record it, and offer it for emission
    pub fn process(&mut self, result: &ExtractionResult, now: DateTime<Utc>) -> FrameReport {
        let sample = self.scorer.compute(result.primary(), result.face_detected());
        let state = self.scorer.classify(&sample);

        self.history.push(sample.score);
        let emission = self.emitter.maybe_send(sample.score, now);
        self.frames_processed += 1;

        FrameReport {
            sample,
            state,
            emission,
        }
    }

    pub fn history(&self) -> &ScoreHistory {
        &self.history
    }

    pub fn emitter(&self) -> &RateLimitedEmitter<T> {
        &self.emitter
    }

    pub fn scorer(&self) -> &AttentionScorer {
        &self.scorer
    }

    /// Results processed since the session started
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}
