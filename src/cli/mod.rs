// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application);
// this layer only routes and prints reports.
//
// Two commands are supported:
//   1. `train`   - trains, evaluates and exports the classifier
//   2. `predict` - scores a feature CSV with a trained model
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs};

use crate::application::predict_use_case::PredictionReport;
use crate::application::train_use_case::{TrainConfig, TrainReport};

const RULE: &str = "============================================================";

#[derive(Parser, Debug)]
#[command(
    name = "phishguard-trainer",
    version = "0.1.0",
    about = "Train a phishing classifier on a feature CSV and export it for TensorFlow.js."
)]
pub struct Cli {
    /// The subcommand to run (train or predict); defaults to train
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Some(Commands::Train(args))   => run_train(args.into()),
            Some(Commands::Predict(args)) => run_predict(args),
            None                          => run_train(TrainConfig::default()),
        }
    }
}

fn run_train(config: TrainConfig) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    println!("{RULE}");
    println!("PhishGuard - Model Training");
    println!("{RULE}");

    tracing::info!("Training on: {}", config.dataset_path);
    let report = TrainUseCase::new(config).execute()?;
    print_train_report(&report);
    Ok(())
}

fn print_train_report(r: &TrainReport) {
    let m = &r.test_metrics;

    println!(
        "\nDataset: {} features, {} legitimate / {} phishing rows ({} train, {} test)",
        r.feature_count, r.legitimate_count, r.phishing_count, r.train_samples, r.test_samples
    );
    println!("Training finished after {} epochs (best epoch {})", r.epochs_run, r.best_epoch);
    if r.stopped_early {
        println!("Stopped early; best weights restored.");
    }

    println!("\nModel Performance:");
    println!("  Accuracy:  {:.2}%", m.accuracy * 100.0);
    println!("  Precision: {:.2}%", m.precision * 100.0);
    println!("  Recall:    {:.2}%", m.recall * 100.0);
    println!("  F1-Score:  {:.2}", m.f1);
    println!("  Confusion: TP={} FP={} TN={} FN={}", m.tp, m.fp, m.tn, m.fn_count);

    if !r.sample_predictions.is_empty() {
        println!("\nSample Predictions:");
        for (i, s) in r.sample_predictions.iter().enumerate() {
            let mark = if s.is_correct() { "✓" } else { "✗" };
            println!("  Sample {}: Predicted={:.3}, Actual={} {}", i + 1, s.probability, s.actual, mark);
        }
    }

    println!("\n{RULE}");
    println!("Training complete!");
    println!("{RULE}");
    println!("\nFiles created:");
    println!("  - {}", r.export.model_json.display());
    println!("  - {} ({} weights)", r.export.weights.display(), r.export.weight_count);
    println!("  - {}", r.feature_info_path.display());
    println!("\nNext steps:");
    println!("  1. Copy the exported directory into the browser extension");
    println!("  2. Load it with tf.loadLayersModel('model.json')");
    println!("  3. Scale inputs with scaler_mean / scaler_scale from feature_info.json");
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    tracing::info!("Scoring rows from: {}", args.input);
    let report = PredictUseCase::new(args.into())?.run()?;
    print_predict_report(&report);
    Ok(())
}

fn print_predict_report(r: &PredictionReport) {
    for p in &r.predictions {
        let verdict = if p.is_phishing { "PHISHING" } else { "legitimate" };
        match p.actual {
            Some(actual) => println!("row {:>5}: {:.4} {:<10} (actual {})", p.row, p.probability, verdict, actual),
            None         => println!("row {:>5}: {:.4} {}", p.row, p.probability, verdict),
        }
    }
    println!(
        "\n{} of {} rows flagged as phishing",
        r.phishing_count(),
        r.predictions.len()
    );

    if let Some(m) = &r.metrics {
        println!("\nAgainst labels in the input:");
        println!("  Accuracy:  {:.2}%", m.accuracy * 100.0);
        println!("  Precision: {:.2}%", m.precision * 100.0);
        println!("  Recall:    {:.2}%", m.recall * 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation_parses_without_subcommand() {
        let cli = Cli::try_parse_from(["phishguard-trainer"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["phishguard-trainer", "serve"]).is_err());
    }
}
