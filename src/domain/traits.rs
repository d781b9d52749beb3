// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The application layer talks to these traits, never to the
// concrete CSV reader or the Burn-backed model.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::table::CsvTable;

// ─── TableSource ──────────────────────────────────────────────────────────────
/// Any component that can produce a raw table of features.
///
/// Implementations:
///   - CsvLoader → reads a CSV file from disk
pub trait TableSource {
    /// Load the whole table into memory.
    fn load(&self) -> Result<CsvTable>;
}

// ─── PhishingScorer ───────────────────────────────────────────────────────────
/// Any component that turns unscaled feature rows into
/// phishing probabilities in [0, 1].
///
/// Implementations:
///   - Inferencer → scales with the stored scaler and runs the network
pub trait PhishingScorer {
    /// Feature names the scorer expects, in column order.
    fn feature_names(&self) -> &[String];

    /// One probability per input row.
    fn score(&self, rows: &[Vec<f32>]) -> Result<Vec<f32>>;
}
