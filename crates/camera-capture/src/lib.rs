//! Camera Capture Library
//!
//! Frame acquisition side of the attention pipeline:
//! - Video frame model
//! - Frame sources and a swappable source slot
//! - External-vs-built-in camera pre-selection

pub mod frame;
pub mod select;
pub mod source;

pub use frame::VideoFrame;
pub use select::{select_preferred_camera, CameraDevice, SelectionConfig};
pub use source::{BlankFrameSource, FramePoll, FrameSlot, FrameSource, SourceState};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Invalid capture configuration: {0}")]
    InvalidConfig(String),

    /// Reading from an installed source failed
    #[error("Streaming error: {0}")]
    Stream(String),
}

/// Capture configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Nominal frame rate, used to stamp frames
    pub fps: u32,
    /// Stop after this many frames (unbounded when unset)
    pub max_frames: Option<u64>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 30,
            max_frames: None,
        }
    }
}

impl CameraConfig {
    /// Reject zero resolution or frame rate
    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.width == 0 || self.height == 0 {
            return Err(CaptureError::InvalidConfig(format!(
                "resolution {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(CaptureError::InvalidConfig("fps must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Nominal time between frames (nanoseconds)
    pub fn frame_period_ns(&self) -> u64 {
        1_000_000_000 / u64::from(self.fps.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CameraConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_period_ns(), 33_333_333);
    }

    #[test]
    fn test_invalid_config() {
        let zero_width = CameraConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_width.validate(),
            Err(CaptureError::InvalidConfig(_))
        ));

        let zero_fps = CameraConfig {
            fps: 0,
            ..Default::default()
        };
        assert!(zero_fps.validate().is_err());
    }
}
