use crate::error::{CaptureError, ConfigError, InferenceError, SessionError};
use crate::inference::ranking::ClassificationResult;
use crate::presenter::label::format_top_labels;
use crate::still_capture::controller::CapturedImage;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Status {
    #[default]
    Idle,
    Starting,
    Live,
    Capturing,
    Classifying,
    Stopped,
    /// Setup failed; capture stays off for the lifetime of the screen.
    Disabled(String),
}

impl Status {
    pub fn text(&self) -> String {
        match self {
            Status::Idle => "Idle".to_string(),
            Status::Starting => "Starting camera...".to_string(),
            Status::Live => "Live".to_string(),
            Status::Capturing => "Capturing...".to_string(),
            Status::Classifying => "Classifying...".to_string(),
            Status::Stopped => "Stopped".to_string(),
            Status::Disabled(reason) => format!("Camera unavailable: {}", reason),
        }
    }
}

/// User-visible state of the screen.
///
/// Captures and classifications update disjoint fields, so their completions
/// may arrive in either order and may be delivered twice without changing
/// the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Presenter {
    image: Option<CapturedImage>,
    label: Option<String>,
    status: Status,
    session_error: Option<String>,
    capture_error: Option<CaptureError>,
    inference_error: Option<InferenceError>,
    notice: Option<String>,
    top_label_count: usize,
}

impl Presenter {
    pub fn new(top_label_count: usize) -> Self {
        Self {
            image: None,
            label: None,
            status: Status::Idle,
            session_error: None,
            capture_error: None,
            inference_error: None,
            notice: None,
            top_label_count,
        }
    }

    pub fn image(&self) -> Option<&CapturedImage> {
        self.image.as_ref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn capture_enabled(&self) -> bool {
        matches!(self.status, Status::Live | Status::Classifying)
    }

    pub fn on_capture(&mut self, image: CapturedImage) {
        self.image = Some(image);
        self.capture_error = None;
    }

    pub fn on_capture_failed(&mut self, error: CaptureError) {
        self.capture_error = Some(error);
    }

    pub fn on_classification(&mut self, result: &Result<ClassificationResult, InferenceError>) {
        match result {
            Ok(result) => {
                self.label = Some(format_top_labels(result, self.top_label_count));
                self.inference_error = None;
            }
            Err(error) => {
                self.label = None;
                self.inference_error = Some(error.clone());
            }
        }
    }

    pub fn on_session_error(&mut self, error: &SessionError) {
        self.session_error = Some(error.to_string());
    }

    pub fn clear_session_error(&mut self) {
        self.session_error = None;
    }

    pub fn disable(&mut self, error: &ConfigError) {
        self.status = Status::Disabled(error.to_string());
    }

    /// No-op once disabled.
    pub fn set_status(&mut self, status: Status) {
        if !matches!(self.status, Status::Disabled(_)) {
            self.status = status;
        }
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// The most relevant error, if any.
    pub fn error_text(&self) -> Option<String> {
        if let Some(e) = &self.session_error {
            return Some(e.clone());
        }
        if let Some(e) = &self.capture_error {
            return Some(e.to_string());
        }
        self.inference_error.as_ref().map(|e| e.to_string())
    }

    /// Status line shown under the preview.
    pub fn status_line(&self) -> String {
        let mut line = self.status.text();
        if let Some(error) = self.error_text() {
            line = format!("{} ({})", line, error);
        }
        if let Some(notice) = &self.notice {
            line = format!("{} | {}", line, notice);
        }
        line
    }
}
