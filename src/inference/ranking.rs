use crate::error::InferenceError;
use crate::image_classifier::interface::Classification;

/// Engine output ranked by descending confidence. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    entries: Vec<Classification>,
}

impl ClassificationResult {
    /// Sorts descending by confidence. Equal confidences keep engine order
    /// and NaN ranks last.
    pub fn rank(mut raw: Vec<Classification>) -> Result<Self, InferenceError> {
        if raw.is_empty() {
            return Err(InferenceError::NoResult);
        }

        let key = |c: &Classification| {
            if c.confidence.is_nan() {
                f32::NEG_INFINITY
            } else {
                c.confidence
            }
        };
        raw.sort_by(|a, b| key(b).total_cmp(&key(a)));

        Ok(Self { entries: raw })
    }

    pub fn entries(&self) -> &[Classification] {
        &self.entries
    }

    /// The first `n` entries, or all of them when fewer are available.
    pub fn top(&self, n: usize) -> &[Classification] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
