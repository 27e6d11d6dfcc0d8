//! Score Emission
//!
//! Outbound delivery of attention scores with:
//! - Wall-clock send throttling
//! - Connection-state guard (skip while the channel is closed)
//! - JSON wire messages
//! - MQTT and in-process channel transports

mod emitter;
mod message;
pub mod mqtt;
mod transport;

pub use emitter::{EmitterConfig, RateLimitedEmitter, SendOutcome, MAX_SEND_INTERVAL_MS};
pub use message::ScoreMessage;
pub use mqtt::{MqttConfig, MqttTransport};
pub use transport::{ChannelTransport, Transport};

use thiserror::Error;

/// Transport error types
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Channel closed")]
    Closed,

    #[error("Send queue full")]
    Full,

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Emitter configuration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EmitterError {
    #[error("Send interval of {0} ms is out of range")]
    IntervalOutOfRange(u64),
}
