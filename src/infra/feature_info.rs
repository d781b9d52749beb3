// ============================================================
// Layer 6 - Feature Info
// ============================================================
// feature_info.json travels with the TensorFlow.js model. The
// extension needs it to build the input vector in the right
// order and to standardise it with the training statistics:
//
//   {
//     "feature_names": [...],
//     "feature_count": 30,
//     "scaler_mean":   [...],
//     "scaler_scale":  [...],
//     "model_version": "1.0",
//     "trained_on":    "2026-10-18 14:03:27.512345",
//     "performance":   { "accuracy": .., "precision": .., "recall": .. }
//   }

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::data::scaler::StandardScaler;
use crate::ml::evaluator::ClassificationMetrics;

pub const FEATURE_INFO_FILE: &str = "feature_info.json";
pub const MODEL_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub accuracy:  f64,
    pub precision: f64,
    pub recall:    f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureInfo {
    pub feature_names: Vec<String>,
    pub feature_count: usize,
    pub scaler_mean:   Vec<f64>,
    pub scaler_scale:  Vec<f64>,
    pub model_version: String,
    pub trained_on:    String,
    pub performance:   Performance,
}

impl FeatureInfo {
    pub fn new(
        feature_names: Vec<String>,
        scaler:        &StandardScaler,
        metrics:       &ClassificationMetrics,
    ) -> Self {
        Self {
            feature_count: feature_names.len(),
            feature_names,
            scaler_mean:   scaler.mean().to_vec(),
            scaler_scale:  scaler.scale().to_vec(),
            model_version: MODEL_VERSION.to_string(),
            trained_on:    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            performance:   Performance {
                accuracy:  metrics.accuracy,
                precision: metrics.precision,
                recall:    metrics.recall,
            },
        }
    }

    /// Rebuild the scaler the model was trained with.
    pub fn scaler(&self) -> Result<StandardScaler> {
        ensure!(
            self.scaler_mean.len() == self.feature_count,
            "feature_info lists {} features but {} scaler means",
            self.feature_count,
            self.scaler_mean.len()
        );
        StandardScaler::from_parts(self.scaler_mean.clone(), self.scaler_scale.clone())
    }

    /// Write `feature_info.json` into `dir`.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;
        let path = dir.join(FEATURE_INFO_FILE);
        fs::write(&path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        Ok(path)
    }

    /// Read `feature_info.json` from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(FEATURE_INFO_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'. Have you run 'train' first?", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info() -> FeatureInfo {
        let scaler  = StandardScaler::fit(&[vec![0.0, 1.0], vec![2.0, 1.0]]).unwrap();
        let metrics = ClassificationMetrics {
            accuracy: 0.95, precision: 0.9, recall: 0.8, ..Default::default()
        };
        FeatureInfo::new(vec!["url_length".into(), "has_ip".into()], &scaler, &metrics)
    }

    #[test]
    fn test_fields() {
        let info = sample_info();
        assert_eq!(info.feature_count, 2);
        assert_eq!(info.scaler_mean, vec![1.0, 1.0]);
        assert_eq!(info.scaler_scale, vec![1.0, 1.0]);
        assert_eq!(info.model_version, "1.0");
        assert_eq!(info.performance.recall, 0.8);
        // YYYY-MM-DD HH:MM:SS.ffffff
        assert_eq!(info.trained_on.len(), 26);
    }

    #[test]
    fn test_json_layout() {
        let dir  = tempfile::tempdir().unwrap();
        let path = sample_info().save(dir.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        for key in [
            "feature_names", "feature_count", "scaler_mean", "scaler_scale",
            "model_version", "trained_on", "performance",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["performance"]["accuracy"], 0.95);
        assert_eq!(json["feature_names"][1], "has_ip");
    }

    #[test]
    fn test_load_and_rebuild_scaler() {
        let dir  = tempfile::tempdir().unwrap();
        let info = sample_info();
        info.save(dir.path()).unwrap();
        let loaded = FeatureInfo::load(dir.path()).unwrap();
        assert_eq!(loaded, info);
        assert_eq!(loaded.scaler().unwrap().transform_row(&[2.0, 1.0]), vec![1.0, 0.0]);
    }
}
