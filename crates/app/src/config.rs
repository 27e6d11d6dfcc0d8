//! Application configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then
//! `ATTENTION__SECTION__KEY` environment variables.

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use attention::ScoringConfig;
use camera_capture::{CameraConfig, CameraDevice, SelectionConfig};
use pipeline::{FrameLoopConfig, SessionConfig};
use score_emitter::{EmitterConfig, MqttConfig};
use score_history::HistoryConfig;
use serde::{Deserialize, Serialize};

/// Default config file name (extension resolved by the loader)
pub const DEFAULT_CONFIG_NAME: &str = "attention";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Where score messages go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Publish to an MQTT broker
    #[default]
    Mqtt,
    /// Log each payload locally
    Log,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSection {
    pub kind: TransportKind,
    pub mqtt: MqttConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSection {
    /// Prometheus listen address, e.g. "0.0.0.0:9000"; disabled when unset
    pub listen: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// JSON-lines landmark recording; the scripted demo subject is used when unset
    pub recording: Option<PathBuf>,
    /// Simulated extractor latency for the scripted subject (milliseconds)
    pub extract_latency_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSection {
    pub capture: CameraConfig,
    /// Enumerated device labels, in platform order
    pub devices: Vec<String>,
    pub selection: SelectionConfig,
}

impl CameraSection {
    pub fn devices(&self) -> Vec<CameraDevice> {
        self.devices
            .iter()
            .enumerate()
            .map(|(i, label)| CameraDevice::new(i, label.clone()))
            .collect()
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Subject identifier used in the publish topic; random when unset
    pub subject_id: Option<String>,
    pub log_format: LogFormat,
    pub scoring: ScoringConfig,
    pub history: HistoryConfig,
    pub emitter: EmitterConfig,
    pub frame_loop: FrameLoopConfig,
    pub transport: TransportSection,
    pub metrics: MetricsSection,
    pub input: InputSection,
    pub camera: CameraSection,
}

impl AppConfig {
    /// Load from `path` (or `attention.*` in the working directory if present)
    /// and the environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::with_name(path),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let config: AppConfig = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("ATTENTION")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Check values the loader cannot
    pub fn validate(&self) -> Result<()> {
        self.scoring
            .validate()
            .context("Invalid scoring configuration")?;
        ensure!(self.history.capacity > 0, "history.capacity must be at least 1");
        self.emitter
            .validate()
            .context("Invalid emitter configuration")?;
        ensure!(
            self.frame_loop.tick_interval_ms > 0,
            "frame_loop.tick_interval_ms must be at least 1"
        );
        self.camera
            .capture
            .validate()
            .context("Invalid camera configuration")?;
        if let Some(subject) = &self.subject_id {
            ensure!(
                !subject.is_empty() && !subject.contains(['/', '+', '#']),
                "subject_id must be non-empty and free of MQTT topic characters"
            );
        }
        Ok(())
    }

    /// Session settings for the pipeline
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            scoring: self.scoring.clone(),
            history: self.history.clone(),
            emitter: self.emitter.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.emitter.send_interval_ms, 500);
        assert_eq!(config.history.capacity, 20);
        assert_eq!(config.transport.kind, TransportKind::Mqtt);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_rejects_bad_subject() {
        let config = AppConfig {
            subject_id: Some("class/1".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_send_interval() {
        let mut config = AppConfig::default();
        config.emitter.send_interval_ms = u64::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_fps() {
        let mut config = AppConfig::default();
        config.camera.capture.fps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_tick() {
        let mut config = AppConfig::default();
        config.frame_loop.tick_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_file_and_environment() {
        let path = std::env::temp_dir().join(format!("attention-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
subject_id = "student_test"
log_format = "json"

[scoring]
ear_threshold = 0.25

[transport]
kind = "log"

[camera]
devices = ["Integrated Camera", "USB Webcam"]
"#,
        )
        .unwrap();

        std::env::set_var("ATTENTION__EMITTER__SEND_INTERVAL_MS", "250");
        let loaded = AppConfig::load(path.to_str());
        std::env::remove_var("ATTENTION__EMITTER__SEND_INTERVAL_MS");
        std::fs::remove_file(&path).unwrap();

        let config = loaded.unwrap();
        assert_eq!(config.subject_id.as_deref(), Some("student_test"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.scoring.ear_threshold, 0.25);
        assert_eq!(config.scoring.yaw_threshold_deg, 15.0);
        assert_eq!(config.transport.kind, TransportKind::Log);
        assert_eq!(config.emitter.send_interval_ms, 250);
        assert_eq!(config.camera.devices().len(), 2);
        assert_eq!(config.session().scoring.ear_threshold, 0.25);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(AppConfig::load(Some("/nonexistent/attention.toml")).is_err());
    }
}
