// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Runs the full training pipeline in order:
//
//   Step 1: Load the CSV                    (Layer 4 - data)
//   Step 2: Resolve label, clean features   (Layer 4 - data)
//   Step 3: Stratified split + scaling      (Layer 4 - data)
//   Step 4: Build the network               (Layer 5 - ml)
//   Step 5: Train with early stopping       (Layer 5 - ml)
//   Step 6: Evaluate on the test partition  (Layer 5 - ml)
//   Step 7: Export for TensorFlow.js        (Layer 6 - infra)
//
// Reference: Burn Book §5 (Training)

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::{PhishingDataset, PhishingSample},
    loader::CsvLoader,
    preprocessor::Preprocessor,
    scaler::StandardScaler,
    splitter::{split_tail, stratified_split},
};
use crate::domain::traits::TableSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    feature_info::FeatureInfo,
    metrics::MetricsLogger,
    tfjs_export::{ExportSummary, TfjsExporter},
};
use crate::ml::{
    evaluator::{evaluate, is_phishing, ClassificationMetrics},
    model::{LayerSummary, PhishingNet, PhishingNetConfig},
    trainer::run_training,
    InnerBackend, InnerDevice,
};

/// How many test rows are echoed back after evaluation.
const SAMPLE_PREDICTIONS: usize = 10;

// ─── Training Configuration ──────────────────────────────────────────────────
// All knobs of a training run. Saved next to the checkpoints so a
// run can be traced back to the settings that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset_path:        String,
    pub output_dir:          String,
    pub checkpoint_dir:      String,
    pub epochs:              usize,
    pub batch_size:          usize,
    pub lr:                  f64,
    pub patience:            usize,
    pub test_fraction:       f64,
    pub validation_fraction: f64,
    pub seed:                u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset_path:        "phishing_dataset.csv".to_string(),
            output_dir:          "model_tfjs".to_string(),
            checkpoint_dir:      "checkpoints".to_string(),
            epochs:              100,
            batch_size:          32,
            lr:                  1e-3,
            patience:            10,
            test_fraction:       0.2,
            validation_fraction: 0.2,
            seed:                42,
        }
    }
}

impl TrainConfig {
    fn validate(&self) -> Result<()> {
        ensure!(self.epochs > 0, "epochs must be at least 1");
        ensure!(self.batch_size > 0, "batch size must be at least 1");
        ensure!(self.lr > 0.0, "learning rate must be positive");
        ensure!(
            (0.0..1.0).contains(&self.test_fraction),
            "test fraction must be in [0, 1), got {}",
            self.test_fraction
        );
        ensure!(
            (0.0..1.0).contains(&self.validation_fraction),
            "validation fraction must be in [0, 1), got {}",
            self.validation_fraction
        );
        Ok(())
    }
}

/// One of the test rows shown after evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePrediction {
    pub probability: f32,
    pub actual:      u8,
}

impl SamplePrediction {
    pub fn is_correct(&self) -> bool {
        is_phishing(self.probability) == (self.actual == 1)
    }
}

/// Everything the CLI reports once training has finished.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub feature_count:      usize,
    pub legitimate_count:   usize,
    pub phishing_count:     usize,
    pub train_samples:      usize,
    pub test_samples:       usize,
    pub epochs_run:         usize,
    pub best_epoch:         usize,
    pub stopped_early:      bool,
    pub test_metrics:       ClassificationMetrics,
    pub sample_predictions: Vec<SamplePrediction>,
    pub export:             ExportSummary,
    pub feature_info_path:  std::path::PathBuf,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load dataset ──────────────────────────────────────────────
        tracing::info!("[1/7] Loading dataset from '{}'", cfg.dataset_path);
        let raw = CsvLoader::new(&cfg.dataset_path).load()?;
        ensure!(!raw.is_empty(), "dataset '{}' has no rows", cfg.dataset_path);

        // ── Step 2: Preprocess ────────────────────────────────────────────────
        tracing::info!("[2/7] Preprocessing data");
        let table = Preprocessor::new().prepare(&raw)?;

        let (legitimate_count, phishing_count) = table.class_counts();
        tracing::info!("Features: {} columns", table.feature_count());
        tracing::info!("Legitimate samples: {}", legitimate_count);
        tracing::info!("Phishing samples: {}", phishing_count);

        let feature_names = table.feature_names.clone();
        let samples: Vec<PhishingSample> = table
            .rows
            .into_iter()
            .zip(table.labels)
            .map(|(features, label)| PhishingSample::new(features, label))
            .collect();

        // ── Step 3: Split and scale ───────────────────────────────────────────
        // The scaler sees the training partition only; the test
        // partition is transformed with the training statistics.
        tracing::info!("[3/7] Splitting dataset");
        let (train, test) = stratified_split(samples, cfg.test_fraction, cfg.seed, |s| s.label);
        tracing::info!("Training samples: {}", train.len());
        tracing::info!("Testing samples: {}", test.len());
        if test.is_empty() {
            tracing::warn!("Test partition is empty; reported metrics will be zero");
        }

        let train_features: Vec<Vec<f32>> = train.iter().map(|s| s.features.clone()).collect();
        let scaler       = StandardScaler::fit(&train_features)?;
        let train_scaled = PhishingDataset::scaled(&train, &scaler);
        let test_dataset = PhishingDataset::scaled(&test, &scaler);

        // Validation rows are the tail of the scaled training partition
        let (fit_samples, val_samples) =
            split_tail(train_scaled.samples().to_vec(), cfg.validation_fraction);
        tracing::debug!("Fit on {} rows, validate on {}", fit_samples.len(), val_samples.len());

        // ── Step 4: Build model ───────────────────────────────────────────────
        tracing::info!("[4/7] Building neural network");
        let device    = InnerDevice::default();
        let model_cfg = PhishingNetConfig::new(feature_names.len());
        log_summary(&model_cfg, &model_cfg.init::<InnerBackend>(&device));

        let ckpt_manager   = CheckpointManager::new(&cfg.checkpoint_dir);
        let metrics_logger = MetricsLogger::new(&cfg.checkpoint_dir)?;
        ckpt_manager.save_config(cfg)?;
        ckpt_manager.save_model_config(&model_cfg)?;

        // ── Step 5: Train ─────────────────────────────────────────────────────
        tracing::info!("[5/7] Training model");
        let outcome = run_training(
            cfg,
            &model_cfg,
            PhishingDataset::new(fit_samples),
            PhishingDataset::new(val_samples),
            &ckpt_manager,
            &metrics_logger,
        )?;

        // ── Step 6: Evaluate ──────────────────────────────────────────────────
        tracing::info!("[6/7] Evaluating model");
        let (test_metrics, probabilities) =
            evaluate(&outcome.model, test_dataset.samples(), cfg.batch_size, &device);
        tracing::info!("Test set: {}", test_metrics);

        let sample_predictions = probabilities
            .iter()
            .zip(test_dataset.samples())
            .take(SAMPLE_PREDICTIONS)
            .map(|(&probability, s)| SamplePrediction { probability, actual: s.label })
            .collect();

        // ── Step 7: Export ────────────────────────────────────────────────────
        tracing::info!("[7/7] Converting to TensorFlow.js format");
        let export = TfjsExporter::new(&cfg.output_dir).export(&outcome.model)?;
        let feature_info_path = FeatureInfo::new(feature_names.clone(), &scaler, &test_metrics)
            .save(&cfg.output_dir)?;
        tracing::info!("Feature info saved to '{}'", feature_info_path.display());

        Ok(TrainReport {
            feature_count: feature_names.len(),
            legitimate_count,
            phishing_count,
            train_samples: train.len(),
            test_samples: test.len(),
            epochs_run: outcome.history.len(),
            best_epoch: outcome.best_epoch,
            stopped_early: outcome.stopped_early,
            test_metrics,
            sample_predictions,
            export,
            feature_info_path,
        })
    }
}

fn log_summary<B: burn::prelude::Backend>(cfg: &PhishingNetConfig, model: &PhishingNet<B>) {
    let layers: Vec<LayerSummary> = model.summary();
    for layer in &layers {
        tracing::info!("  {:<10} {:?} params={}", layer.name, layer.kind, layer.params);
    }
    tracing::info!("  Total params: {}", cfg.param_count());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::predict_use_case::{PredictConfig, PredictUseCase};
    use crate::domain::error::PipelineError;
    use crate::infra::tfjs_export::{MODEL_JSON_FILE, WEIGHTS_FILE};
    use std::fmt::Write as _;
    use std::fs;
    use std::path::Path;

    /// Three features; the first two carry the label, the third is noise.
    fn write_dataset(path: &Path, rows: usize) {
        let mut csv = String::from("url_length,num_dots,noise,label\n");
        for i in 0..rows {
            let phishing = i % 3 == 0;
            let jitter   = ((i * 7919) % 13) as f32 / 13.0;
            let (a, b)   = if phishing { (80.0 + 10.0 * jitter, 5.0) } else { (20.0 + 10.0 * jitter, 1.0) };
            // a few gaps exercise zero-filling
            let noise = if i % 17 == 0 { String::new() } else { format!("{:.3}", jitter) };
            writeln!(csv, "{a},{b},{noise},{}", if phishing { 1 } else { -1 }).unwrap();
        }
        fs::write(path, csv).unwrap();
    }

    fn config_in(dir: &Path) -> TrainConfig {
        TrainConfig {
            dataset_path:   dir.join("phishing.csv").to_string_lossy().into_owned(),
            output_dir:     dir.join("model_tfjs").to_string_lossy().into_owned(),
            checkpoint_dir: dir.join("checkpoints").to_string_lossy().into_owned(),
            epochs:         30,
            lr:             1e-2,
            patience:       5,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_pipeline_trains_exports_and_predicts() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path());
        write_dataset(Path::new(&cfg.dataset_path), 300);

        let report = TrainUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(report.feature_count, 3);
        assert_eq!((report.legitimate_count, report.phishing_count), (200, 100));
        assert_eq!(report.train_samples + report.test_samples, 300);
        assert_eq!(report.test_samples, 60);
        assert!(report.test_metrics.accuracy > 0.9, "{}", report.test_metrics);
        assert_eq!(report.sample_predictions.len(), 10);

        let out = Path::new(&cfg.output_dir);
        assert!(out.join(MODEL_JSON_FILE).exists());
        assert!(out.join(WEIGHTS_FILE).exists());
        let info = FeatureInfo::load(out).unwrap();
        assert_eq!(info.feature_names, vec!["url_length", "num_dots", "noise"]);
        assert_eq!(info.feature_count, 3);
        assert!((info.performance.accuracy - report.test_metrics.accuracy).abs() < 1e-12);

        // The checkpoint reloads into a model that scores like the exported one
        let predict = PredictUseCase::new(PredictConfig {
            model_dir:      cfg.output_dir.clone(),
            checkpoint_dir: cfg.checkpoint_dir.clone(),
            input:          cfg.dataset_path.clone(),
            output:         None,
        })
        .unwrap();
        let result = predict.run().unwrap();
        assert_eq!(result.predictions.len(), 300);
        assert!(result.metrics.unwrap().accuracy > 0.9);
    }

    #[test]
    fn test_missing_dataset_is_checked_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrainUseCase::new(config_in(dir.path())).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::DatasetNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_label_is_checked_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path());
        fs::write(&cfg.dataset_path, "a,b,status\n1,2,1\n").unwrap();
        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::LabelColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_sample_prediction_correctness() {
        assert!(SamplePrediction { probability: 0.9, actual: 1 }.is_correct());
        assert!(SamplePrediction { probability: 0.2, actual: 0 }.is_correct());
        assert!(!SamplePrediction { probability: 0.5, actual: 1 }.is_correct());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = TrainConfig { batch_size: 0, ..TrainConfig::default() };
        assert!(TrainUseCase::new(cfg).execute().is_err());
        let cfg = TrainConfig { test_fraction: 1.0, ..TrainConfig::default() };
        assert!(TrainUseCase::new(cfg).execute().is_err());
    }
}
