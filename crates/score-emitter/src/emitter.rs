//! Rate-limited score emitter

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::message::ScoreMessage;
use crate::transport::Transport;
use crate::EmitterError;

/// Largest accepted send interval (one day)
pub const MAX_SEND_INTERVAL_MS: u64 = 24 * 60 * 60 * 1000;

/// Emitter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Minimum wall-clock interval between sends (milliseconds)
    pub send_interval_ms: u64,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            send_interval_ms: 500,
        }
    }
}

impl EmitterConfig {
    /// Check the interval fits the wall-clock arithmetic
    pub fn validate(&self) -> Result<(), EmitterError> {
        self.interval().map(|_| ())
    }

    /// Send interval as a signed duration
    pub fn interval(&self) -> Result<Duration, EmitterError> {
        if self.send_interval_ms > MAX_SEND_INTERVAL_MS {
            return Err(EmitterError::IntervalOutOfRange(self.send_interval_ms));
        }
        i64::try_from(self.send_interval_ms)
            .ok()
            .and_then(Duration::try_milliseconds)
            .ok_or(EmitterError::IntervalOutOfRange(self.send_interval_ms))
    }
}

/// Result of one emission attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Message handed to the transport
    Sent(ScoreMessage),
    /// Too soon after the previous send
    Throttled,
    /// Transport has no open channel
    Disconnected,
    /// Transport rejected the message; not retried
    Failed,
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent(_))
    }
}

/// Throttles outbound score messages to a fixed minimum interval.
///
/// Emission state is only mutated by a successful send. Nothing is queued:
/// a skipped score is simply dropped.
pub struct RateLimitedEmitter<T> {
    transport: T,
    interval: Duration,
    last_sent_at: Option<DateTime<Utc>>,
    sent_count: u64,
}

impl<T: Transport> RateLimitedEmitter<T> {
    /// Create an emitter over a transport, rejecting out-of-range intervals
    pub fn new(transport: T, config: &EmitterConfig) -> Result<Self, EmitterError> {
        Ok(Self {
            transport,
            interval: config.interval()?,
            last_sent_at: None,
            sent_count: 0,
        })
    }

    /// Send `score` if the channel is open and the interval has elapsed
    pub fn maybe_send(&mut self, score: f64, now: DateTime<Utc>) -> SendOutcome {
        if !self.transport.is_open() {
            return SendOutcome::Disconnected;
        }

        if let Some(last) = self.last_sent_at {
            let elapsed = now - last;
            // A clock stepping backwards counts as elapsed so sends resume
            if elapsed >= Duration::zero() && elapsed < self.interval {
                return SendOutcome::Throttled;
            }
        }

        let message = ScoreMessage::new(score, now);
        let payload = match message.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize score message: {}", e);
                return SendOutcome::Failed;
            }
        };

        if let Err(e) = self.transport.send(payload) {
            debug!("Score send skipped: {}", e);
            return SendOutcome::Failed;
        }

        self.last_sent_at = Some(now);
        self.sent_count += 1;
        metrics::counter!("attention_scores_sent_total").increment(1);
        debug!("Sent score {:.4} (total: {})", message.score, self.sent_count);

        SendOutcome::Sent(message)
    }

    /// Number of successful sends
    pub fn sent_count(&self) -> u64 {
        self.sent_count
    }

    /// Time of the last successful send
    pub fn last_sent_at(&self) -> Option<DateTime<Utc>> {
        self.last_sent_at
    }

    /// Whether the transport currently has an open channel
    pub fn is_connected(&self) -> bool {
        self.transport.is_open()
    }

    /// Borrow the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransportError;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct MockTransport {
        open: Arc<AtomicBool>,
        fail: Arc<AtomicBool>,
        sends: Arc<AtomicUsize>,
    }

    impl MockTransport {
        fn open() -> Self {
            let mock = Self::default();
            mock.open.store(true, Ordering::SeqCst);
            mock
        }
    }

    impl Transport for MockTransport {
        fn is_open(&self) -> bool {
            self.open.load(Ordering::SeqCst)
        }

        fn send(&self, _payload: String) -> Result<(), TransportError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(TransportError::Closed);
            }
            self.sends.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn emitter(mock: MockTransport) -> RateLimitedEmitter<MockTransport> {
        RateLimitedEmitter::new(mock, &EmitterConfig::default()).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    fn ms(n: i64) -> Duration {
        Duration::milliseconds(n)
    }

    #[test]
    fn test_calls_100ms_apart_send_once() {
        let mock = MockTransport::open();
        let mut emitter = emitter(mock.clone());

        assert!(emitter.maybe_send(0.8, t0()).is_sent());
        assert_eq!(emitter.maybe_send(0.8, t0() + ms(100)), SendOutcome::Throttled);

        assert_eq!(mock.sends.load(Ordering::SeqCst), 1);
        assert_eq!(emitter.sent_count(), 1);
    }

    #[test]
    fn test_calls_600ms_apart_send_twice() {
        let mock = MockTransport::open();
        let mut emitter = emitter(mock.clone());

        assert!(emitter.maybe_send(0.8, t0()).is_sent());
        assert!(emitter.maybe_send(0.7, t0() + ms(600)).is_sent());

        assert_eq!(mock.sends.load(Ordering::SeqCst), 2);
        assert_eq!(emitter.last_sent_at(), Some(t0() + ms(600)));
    }

    #[test]
    fn test_exact_interval_sends() {
        let mut emitter = emitter(MockTransport::open());
        emitter.maybe_send(1.0, t0());
        assert!(emitter.maybe_send(1.0, t0() + ms(500)).is_sent());
    }

    #[test]
    fn test_disconnected_never_sends() {
        let mock = MockTransport::default();
        let mut emitter = emitter(mock.clone());

        for i in 0..5 {
            assert_eq!(
                emitter.maybe_send(1.0, t0() + ms(i * 1000)),
                SendOutcome::Disconnected
            );
        }
        assert_eq!(mock.sends.load(Ordering::SeqCst), 0);
        assert_eq!(emitter.sent_count(), 0);
        assert_eq!(emitter.last_sent_at(), None);
    }

    #[test]
    fn test_failed_send_does_not_update_state() {
        let mock = MockTransport::open();
        mock.fail.store(true, Ordering::SeqCst);
        let mut emitter = emitter(mock.clone());

        assert_eq!(emitter.maybe_send(1.0, t0()), SendOutcome::Failed);
        assert_eq!(emitter.sent_count(), 0);

        // Next qualifying frame goes through once the transport recovers
        mock.fail.store(false, Ordering::SeqCst);
        assert!(emitter.maybe_send(1.0, t0() + ms(10)).is_sent());
    }

    #[test]
    fn test_reconnect_resumes_sending() {
        let mock = MockTransport::open();
        let mut emitter = emitter(mock.clone());

        assert!(emitter.maybe_send(1.0, t0()).is_sent());
        mock.open.store(false, Ordering::SeqCst);
        assert_eq!(emitter.maybe_send(1.0, t0() + ms(700)), SendOutcome::Disconnected);
        mock.open.store(true, Ordering::SeqCst);
        assert!(emitter.maybe_send(1.0, t0() + ms(800)).is_sent());
        assert_eq!(emitter.sent_count(), 2);
    }

    #[test]
    fn test_clock_stepping_back_allows_send() {
        let mut emitter = emitter(MockTransport::open());
        emitter.maybe_send(1.0, t0());
        assert!(emitter.maybe_send(1.0, t0() - ms(5000)).is_sent());
    }

    #[test]
    fn test_sent_message_is_rounded() {
        let mut emitter = emitter(MockTransport::open());
        match emitter.maybe_send(0.333333, t0()) {
            SendOutcome::Sent(message) => {
                assert_eq!(message.score, 0.3333);
                assert_eq!(message.timestamp, "2026-01-01T12:00:00.000Z");
            }
            other => panic!("expected send, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_interval() {
        let config = EmitterConfig {
            send_interval_ms: 50,
        };
        let mut emitter = RateLimitedEmitter::new(MockTransport::open(), &config).unwrap();
        emitter.maybe_send(1.0, t0());
        assert!(emitter.maybe_send(1.0, t0() + ms(60)).is_sent());
    }

    #[test]
    fn test_oversized_interval_rejected() {
        let config = EmitterConfig {
            send_interval_ms: u64::MAX,
        };
        assert_eq!(
            config.validate(),
            Err(EmitterError::IntervalOutOfRange(u64::MAX))
        );
        assert!(RateLimitedEmitter::new(MockTransport::open(), &config).is_err());

        let config = EmitterConfig {
            send_interval_ms: MAX_SEND_INTERVAL_MS + 1,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_longest_interval_still_throttles() {
        let config = EmitterConfig {
            send_interval_ms: MAX_SEND_INTERVAL_MS,
        };
        let mut emitter = RateLimitedEmitter::new(MockTransport::open(), &config).unwrap();
        assert!(emitter.maybe_send(1.0, t0()).is_sent());
        assert_eq!(emitter.maybe_send(1.0, t0() + ms(1)), SendOutcome::Throttled);
    }
}
