// ============================================================
// Layer 3 - Pipeline Errors
// ============================================================
// Only two conditions are checked explicitly and reported with
// a dedicated diagnostic: the dataset file is missing, or no
// label column can be found. Everything else travels as an
// anyhow::Error with context attached where it happened.

use std::path::PathBuf;

/// Fatal, user-facing failures of the training pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The input CSV does not exist.
    #[error(
        "dataset '{}' not found\n\n\
         Download a dataset from:\n  \
         https://www.kaggle.com/datasets/shashwatwork/web-page-phishing-detection-dataset\n\
         Or use the UCI dataset:\n  \
         https://archive.ics.uci.edu/ml/datasets/phishing+websites",
        path.display()
    )]
    DatasetNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// None of the label candidates is a column of the CSV.
    #[error("could not find label column! Available columns: {available:?}")]
    LabelColumnNotFound {
        /// Every header in the CSV, in file order.
        available: Vec<String>,
    },
}
