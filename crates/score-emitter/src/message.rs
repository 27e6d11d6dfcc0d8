//! Outbound wire message

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::TransportError;

/// One score delivery: exactly `score` and `timestamp` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMessage {
    /// Score rounded to 4 decimal places
    pub score: f64,
    /// ISO-8601 UTC timestamp with millisecond precision
    pub timestamp: String,
}

impl ScoreMessage {
    /// Build a message for a score observed at `now`
    pub fn new(score: f64, now: DateTime<Utc>) -> Self {
        Self {
            score: round_to(score, 4),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Serialize to the JSON payload
    pub fn to_json(&self) -> Result<String, TransportError> {
        serde_json::to_string(self).map_err(|e| TransportError::Serialization(e.to_string()))
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_payload_shape() {
        let now = Utc.with_ymd_and_hms(2026, 2, 23, 20, 25, 0).unwrap();
        let json = ScoreMessage::new(0.123456, now).to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["score"], 0.1235);
        assert_eq!(object["timestamp"], "2026-02-23T20:25:00.000Z");
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to(1.0, 4), 1.0);
        assert_eq!(round_to(0.99999, 4), 1.0);
        assert_eq!(round_to(0.10004, 4), 0.1);
    }
}
