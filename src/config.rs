use crate::capture_session::session::SessionPreset;
use crate::device_camera::interface::StillEncoding;
use crate::preview::fit::FitMode;
use chrono::Offset;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub bundle_dir: PathBuf,
    pub name: String,
    pub extension: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            bundle_dir: PathBuf::from("resources"),
            name: "ImageClassifier".to_string(),
            extension: "labels".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Console,
    Gui,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub session_preset: SessionPreset,
    pub still_encoding: StillEncoding,
    pub fit_mode: FitMode,
    pub top_label_count: usize,
    pub preview_frame_interval: Duration,
    pub logger_timezone: chrono::FixedOffset,
    pub display: DisplayKind,
    /// `None` runs the capture-only screen.
    pub classifier: Option<ModelConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_preset: SessionPreset::Medium,
            still_encoding: StillEncoding::Jpeg,
            fit_mode: FitMode::Aspect,
            top_label_count: 2,
            preview_frame_interval: Duration::from_millis(33),
            logger_timezone: chrono::Utc.fix(),
            display: DisplayKind::Console,
            classifier: Some(ModelConfig::default()),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `CAPTURE_CLASSIFY_*` overrides read through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(display) = lookup("CAPTURE_CLASSIFY_DISPLAY") {
            match display.trim().to_lowercase().as_str() {
                "gui" => self.display = DisplayKind::Gui,
                "console" => self.display = DisplayKind::Console,
                _ => {}
            }
        }

        if let Some(preset) = lookup("CAPTURE_CLASSIFY_PRESET") {
            match preset.trim().to_lowercase().as_str() {
                "low" => self.session_preset = SessionPreset::Low,
                "medium" => self.session_preset = SessionPreset::Medium,
                "high" => self.session_preset = SessionPreset::High,
                "photo" => self.session_preset = SessionPreset::Photo,
                _ => {}
            }
        }

        if let Some(encoding) = lookup("CAPTURE_CLASSIFY_ENCODING") {
            match encoding.trim().to_lowercase().as_str() {
                "jpeg" | "jpg" => self.still_encoding = StillEncoding::Jpeg,
                "png" => self.still_encoding = StillEncoding::Png,
                _ => {}
            }
        }

        if let Some(dir) = lookup("CAPTURE_CLASSIFY_MODEL_DIR") {
            if let Some(model) = self.classifier.as_mut() {
                model.bundle_dir = PathBuf::from(dir);
            }
        }

        if let Some(flag) = lookup("CAPTURE_CLASSIFY_CAPTURE_ONLY") {
            if matches!(flag.trim(), "1" | "true" | "yes") {
                self.classifier = None;
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, DisplayKind};
    use crate::capture_session::session::SessionPreset;
    use crate::device_camera::interface::StillEncoding;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_run_classifier_screen() {
        let config = Config::default();

        assert_eq!(config.top_label_count, 2);
        assert_eq!(config.display, DisplayKind::Console);
        assert!(config.classifier.is_some());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(lookup_from(&[
            ("CAPTURE_CLASSIFY_DISPLAY", "GUI"),
            ("CAPTURE_CLASSIFY_MODEL_DIR", "/opt/models"),
        ]));

        assert_eq!(config.display, DisplayKind::Gui);
        assert_eq!(
            config.classifier.map(|m| m.bundle_dir),
            Some(PathBuf::from("/opt/models"))
        );
    }

    #[test]
    fn test_preset_and_encoding_overrides() {
        let config = Config::default().with_overrides(lookup_from(&[
            ("CAPTURE_CLASSIFY_PRESET", "Photo"),
            ("CAPTURE_CLASSIFY_ENCODING", "png"),
        ]));

        assert_eq!(config.session_preset, SessionPreset::Photo);
        assert_eq!(config.still_encoding, StillEncoding::Png);

        let config = Config::default().with_overrides(lookup_from(&[
            ("CAPTURE_CLASSIFY_PRESET", " high "),
            ("CAPTURE_CLASSIFY_ENCODING", "webp"),
        ]));

        assert_eq!(config.session_preset, SessionPreset::High);
        assert_eq!(config.still_encoding, StillEncoding::Jpeg);
    }

    #[test]
    fn test_capture_only_override_drops_classifier() {
        let config = Config::default()
            .with_overrides(lookup_from(&[("CAPTURE_CLASSIFY_CAPTURE_ONLY", "1")]));

        assert!(config.classifier.is_none());
    }

    #[test]
    fn test_unknown_display_is_ignored() {
        let config =
            Config::default().with_overrides(lookup_from(&[("CAPTURE_CLASSIFY_DISPLAY", "lcd")]));

        assert_eq!(config.display, DisplayKind::Console);
    }
}
