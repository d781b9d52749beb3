// ============================================================
// Layer 3 - Label Handling
// ============================================================
// Datasets from different sources name the target column
// differently. The first candidate (in list order) that is a
// column of the CSV is taken as the label.
//
// Labels are binarised with a threshold at zero, so both
// {0, 1} and the UCI {-1, 1} encodings map onto
//   0 = legitimate, 1 = phishing

use crate::domain::error::PipelineError;

/// Column names accepted as the label, in priority order.
pub const LABEL_CANDIDATES: [&str; 6] = ["label", "class", "target", "phishing", "Label", "Class"];

/// Class id of a legitimate page.
pub const LEGITIMATE: u8 = 0;

/// Class id of a phishing page.
pub const PHISHING: u8 = 1;

/// Find the label column among `columns`.
///
/// Returns the index into `columns` of the first entry of
/// [`LABEL_CANDIDATES`] that is present.
pub fn resolve_label_column(columns: &[String]) -> Result<usize, PipelineError> {
    LABEL_CANDIDATES
        .iter()
        .find_map(|candidate| columns.iter().position(|c| c == candidate))
        .ok_or_else(|| PipelineError::LabelColumnNotFound {
            available: columns.to_vec(),
        })
}

/// Coerce a raw label value to {0, 1}. Missing values count as legitimate.
pub fn binarize(value: Option<f64>) -> u8 {
    match value {
        Some(v) if v > 0.0 => PHISHING,
        _ => LEGITIMATE,
    }
}
