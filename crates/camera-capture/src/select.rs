//! Camera pre-selection
//!
//! Label matching is platform-dependent and unreliable; the result is a
//! default the user can override, not a classification.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// An enumerated video input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraDevice {
    /// Enumeration order
    pub index: usize,
    /// Device label, empty when the platform withholds it
    pub label: String,
}

impl CameraDevice {
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
        }
    }
}

/// Keywords used to classify device labels (case-insensitive)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Labels suggesting an external camera
    pub external_keywords: Vec<String>,
    /// Labels suggesting a built-in camera
    pub builtin_keywords: Vec<String>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            external_keywords: vec!["usb".into(), "external".into(), "webcam".into()],
            builtin_keywords: vec![
                "integrated".into(),
                "built-in".into(),
                "facetime".into(),
                "internal".into(),
            ],
        }
    }
}

fn matches_any(label: &str, keywords: &[String]) -> bool {
    let label = label.to_lowercase();
    keywords.iter().any(|k| label.contains(&k.to_lowercase()))
}

/// Pick the camera to open by default.
///
/// In order: the first label matching an external keyword; with no labels at
/// all, the second device (index 0 is assumed built-in); the first labelled
/// device not matching a built-in keyword; otherwise the first device.
pub fn select_preferred_camera<'a>(
    devices: &'a [CameraDevice],
    config: &SelectionConfig,
) -> Option<&'a CameraDevice> {
    if let Some(device) = devices
        .iter()
        .find(|d| matches_any(&d.label, &config.external_keywords))
    {
        debug!("Selected external camera by label: {}", device.label);
        return Some(device);
    }

    if devices.len() > 1 && devices.iter().all(|d| d.label.trim().is_empty()) {
        debug!("No camera labels available, assuming index 0 is built-in");
        return devices.get(1);
    }

    devices
        .iter()
        .find(|d| !d.label.trim().is_empty() && !matches_any(&d.label, &config.builtin_keywords))
        .or_else(|| devices.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices(labels: &[&str]) -> Vec<CameraDevice> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| CameraDevice::new(i, *l))
            .collect()
    }

    fn pick(labels: &[&str]) -> Option<usize> {
        select_preferred_camera(&devices(labels), &SelectionConfig::default()).map(|d| d.index)
    }

    #[test]
    fn test_prefers_external_keyword() {
        assert_eq!(pick(&["Integrated Camera", "Logitech USB Camera"]), Some(1));
        assert_eq!(pick(&["HD WEBCAM", "FaceTime HD Camera"]), Some(0));
    }

    #[test]
    fn test_unlabelled_assumes_first_is_builtin() {
        assert_eq!(pick(&["", ""]), Some(1));
        assert_eq!(pick(&[""]), Some(0));
    }

    #[test]
    fn test_skips_builtin_labels() {
        assert_eq!(pick(&["FaceTime HD Camera", "Elgato Facecam"]), Some(1));
    }

    #[test]
    fn test_falls_back_to_first() {
        assert_eq!(pick(&["Integrated Camera"]), Some(0));
        assert_eq!(pick(&[]), None);
    }

    #[test]
    fn test_custom_keywords() {
        let config = SelectionConfig {
            external_keywords: vec!["capture".into()],
            builtin_keywords: vec![],
        };
        let list = devices(&["Front", "Capture Card"]);
        assert_eq!(select_preferred_camera(&list, &config).map(|d| d.index), Some(1));
    }
}
