use crate::inference::ranking::ClassificationResult;

/// `"dog - 0.83 / cat - 0.11"` for the top `count` entries.
pub fn format_top_labels(result: &ClassificationResult, count: usize) -> String {
    result
        .top(count)
        .iter()
        .map(|c| format!("{} - {:.2}", c.label, c.confidence))
        .collect::<Vec<_>>()
        .join(" / ")
}
