// ============================================================
// Layer 2 - PredictUseCase
// ============================================================
// Scores a feature CSV with a trained model:
//
//   1. Load feature_info.json (feature order + scaler)
//   2. Rebuild the network from the best checkpoint
//   3. Read the input CSV and select the feature columns by name
//   4. Score every row
//   5. If the input carries a label column, report metrics
//   6. Optionally write row,probability,prediction to a CSV
//
// The scorer sits behind the PhishingScorer trait so the flow
// can be exercised without a trained checkpoint.

use anyhow::{ensure, Context, Result};
use std::path::Path;

use crate::data::{loader::CsvLoader, preprocessor::Preprocessor};
use crate::domain::label::{LEGITIMATE, PHISHING};
use crate::domain::traits::{PhishingScorer, TableSource};
use crate::infra::{checkpoint::CheckpointManager, feature_info::FeatureInfo};
use crate::ml::evaluator::{compute_metrics, is_phishing, ClassificationMetrics};
use crate::ml::inferencer::Inferencer;

#[derive(Debug, Clone)]
pub struct PredictConfig {
    pub model_dir:      String,
    pub checkpoint_dir: String,
    pub input:          String,
    pub output:         Option<String>,
}

/// Verdict for one input row.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub row:         usize,
    pub probability: f32,
    pub is_phishing: bool,
    pub actual:      Option<u8>,
}

#[derive(Debug, Clone)]
pub struct PredictionReport {
    pub predictions: Vec<Prediction>,
    /// Present only when the input had a resolvable label column.
    pub metrics:     Option<ClassificationMetrics>,
}

impl PredictionReport {
    pub fn phishing_count(&self) -> usize {
        self.predictions.iter().filter(|p| p.is_phishing).count()
    }
}

pub struct PredictUseCase {
    config: PredictConfig,
    scorer: Box<dyn PhishingScorer>,
}

impl PredictUseCase {
    /// Load the scaler and the checkpointed network from disk.
    pub fn new(config: PredictConfig) -> Result<Self> {
        let info = FeatureInfo::load(&config.model_dir)?;
        tracing::info!(
            "Loaded feature info: {} features, trained on {}",
            info.feature_count,
            info.trained_on
        );
        let ckpt_manager = CheckpointManager::new(&config.checkpoint_dir);
        let inferencer   = Inferencer::from_artifacts(&ckpt_manager, &info)?;
        Ok(Self::with_scorer(config, Box::new(inferencer)))
    }

    pub fn with_scorer(config: PredictConfig, scorer: Box<dyn PhishingScorer>) -> Self {
        Self { config, scorer }
    }

    pub fn run(&self) -> Result<PredictionReport> {
        let table        = CsvLoader::new(&self.config.input).load()?;
        let preprocessor = Preprocessor::new();

        let rows   = preprocessor.project(&table, self.scorer.feature_names())?;
        let labels = preprocessor.labels(&table)?;
        tracing::info!("Scoring {} rows from '{}'", rows.len(), self.config.input);

        let probabilities = self.scorer.score(&rows)?;
        ensure!(
            probabilities.len() == rows.len(),
            "scorer returned {} probabilities for {} rows",
            probabilities.len(),
            rows.len()
        );

        let predictions = probabilities
            .iter()
            .enumerate()
            .map(|(row, &probability)| Prediction {
                row,
                probability,
                is_phishing: is_phishing(probability),
                actual: labels.as_ref().map(|l| l[row]),
            })
            .collect();

        let metrics = labels.map(|l| compute_metrics(&probabilities, &l));

        let report = PredictionReport { predictions, metrics };
        if let Some(path) = &self.config.output {
            write_predictions(path, &report)?;
            tracing::info!("Predictions written to '{}'", path);
        }
        Ok(report)
    }
}

fn write_predictions(path: impl AsRef<Path>, report: &PredictionReport) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create '{}'", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;
    writer.write_record(["row", "probability", "prediction"])?;
    for p in &report.predictions {
        let verdict = if p.is_phishing { PHISHING } else { LEGITIMATE };
        writer.write_record([
            p.row.to_string(),
            format!("{:.6}", p.probability),
            verdict.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Scores each row by its first feature, clamped into [0, 1].
    struct FirstColumnScorer {
        names: Vec<String>,
    }

    impl PhishingScorer for FirstColumnScorer {
        fn feature_names(&self) -> &[String] {
            &self.names
        }

        fn score(&self, rows: &[Vec<f32>]) -> Result<Vec<f32>> {
            Ok(rows.iter().map(|r| r[0].clamp(0.0, 1.0)).collect())
        }
    }

    fn use_case(dir: &Path, input: &str, output: Option<String>) -> PredictUseCase {
        let path = dir.join("input.csv");
        fs::write(&path, input).unwrap();
        let config = PredictConfig {
            model_dir:      dir.to_string_lossy().into_owned(),
            checkpoint_dir: dir.to_string_lossy().into_owned(),
            input:          path.to_string_lossy().into_owned(),
            output,
        };
        let scorer = FirstColumnScorer { names: vec!["score".into(), "other".into()] };
        PredictUseCase::with_scorer(config, Box::new(scorer))
    }

    #[test]
    fn test_predictions_follow_feature_names_not_column_order() {
        let dir    = tempfile::tempdir().unwrap();
        let report = use_case(dir.path(), "other,score\n5,0.9\n5,0.1\n5,\n", None).run().unwrap();

        let probs: Vec<f32> = report.predictions.iter().map(|p| p.probability).collect();
        assert_eq!(probs, vec![0.9, 0.1, 0.0]);
        assert_eq!(report.phishing_count(), 1);
        assert!(report.metrics.is_none());
        assert!(report.predictions.iter().all(|p| p.actual.is_none()));
    }

    #[test]
    fn test_metrics_reported_when_labels_present() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "score,other,label\n0.9,0,1\n0.8,0,0\n0.2,0,0\n0.1,0,1\n";
        let report = use_case(dir.path(), csv, None).run().unwrap();

        let m = report.metrics.unwrap();
        assert_eq!((m.tp, m.fp, m.tn, m.fn_count), (1, 1, 1, 1));
        assert!((m.accuracy - 0.5).abs() < 1e-9);
        assert_eq!(report.predictions[0].actual, Some(1));
    }

    #[test]
    fn test_missing_feature_column_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(use_case(dir.path(), "score\n0.5\n", None).run().is_err());
    }

    #[test]
    fn test_writes_prediction_csv() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out").join("predictions.csv");
        use_case(
            dir.path(),
            "score,other\n0.75,1\n0.25,1\n",
            Some(out.to_string_lossy().into_owned()),
        )
        .run()
        .unwrap();

        let written = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines, vec!["row,probability,prediction", "0,0.750000,1", "1,0.250000,0"]);
    }

    #[test]
    fn test_missing_model_dir_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = PredictConfig {
            model_dir:      dir.path().join("nope").to_string_lossy().into_owned(),
            checkpoint_dir: dir.path().to_string_lossy().into_owned(),
            input:          "unused.csv".into(),
            output:         None,
        };
        assert!(PredictUseCase::new(config).is_err());
    }
}
