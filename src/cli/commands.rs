// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `predict`
// and all their configurable flags.
//
// Every flag has a default, so `phishguard-trainer train` with
// no flags reads phishing_dataset.csv and writes model_tfjs/.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::predict_use_case::PredictConfig;
use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the phishing classifier and export it for TensorFlow.js
    Train(TrainArgs),

    /// Score a feature CSV with a trained model
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file with numeric feature columns and a label column
    #[arg(long, default_value = "phishing_dataset.csv")]
    pub dataset: String,

    /// Where model.json, the weight shard and feature_info.json go
    #[arg(long, default_value = "model_tfjs")]
    pub output_dir: String,

    /// Directory for checkpoints, run config and metrics.csv
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Maximum number of passes over the training data
    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Epochs without validation improvement before stopping
    #[arg(long, default_value_t = 10)]
    pub patience: usize,

    /// Share of rows held out for the final test
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Share of the training rows (taken from the end) used for validation
    #[arg(long, default_value_t = 0.2)]
    pub validation_fraction: f64,

    /// Seed for the split and weight initialisation
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            dataset_path:        a.dataset,
            output_dir:          a.output_dir,
            checkpoint_dir:      a.checkpoint_dir,
            epochs:              a.epochs,
            batch_size:          a.batch_size,
            lr:                  a.lr,
            patience:            a.patience,
            test_fraction:       a.test_fraction,
            validation_fraction: a.validation_fraction,
            seed:                a.seed,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// CSV file with the same feature columns used for training
    #[arg(long)]
    pub input: String,

    /// Directory holding feature_info.json
    #[arg(long, default_value = "model_tfjs")]
    pub model_dir: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Optional CSV to write row,probability,prediction to
    #[arg(long)]
    pub output: Option<String>,
}

impl From<PredictArgs> for PredictConfig {
    fn from(a: PredictArgs) -> Self {
        PredictConfig {
            model_dir:      a.model_dir,
            checkpoint_dir: a.checkpoint_dir,
            input:          a.input,
            output:         a.output,
        }
    }
}
