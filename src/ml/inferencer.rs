// ============================================================
// Layer 5 - Inferencer
// ============================================================
// Rebuilds the trained network from the checkpoint directory
// and pairs it with the scaler stored in feature_info.json, so
// raw (unscaled) feature rows can be scored exactly the way the
// browser extension would score them.

use anyhow::{ensure, Result};

use crate::data::dataset::PhishingSample;
use crate::data::scaler::StandardScaler;
use crate::domain::traits::PhishingScorer;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::feature_info::FeatureInfo;
use crate::ml::evaluator::predict_probabilities;
use crate::ml::model::PhishingNet;
use crate::ml::{InnerBackend, InnerDevice};

const INFER_BATCH_SIZE: usize = 256;

pub struct Inferencer {
    model:         PhishingNet<InnerBackend>,
    scaler:        StandardScaler,
    feature_names: Vec<String>,
    device:        InnerDevice,
}

impl Inferencer {
    pub fn from_artifacts(ckpt_manager: &CheckpointManager, info: &FeatureInfo) -> Result<Self> {
        let device    = InnerDevice::default();
        let model_cfg = ckpt_manager.load_model_config()?;
        ensure!(
            model_cfg.num_features == info.feature_count,
            "checkpoint expects {} features but feature_info lists {}",
            model_cfg.num_features,
            info.feature_count
        );

        let model: PhishingNet<InnerBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint");

        Ok(Self::new(model, info.scaler()?, info.feature_names.clone()))
    }

    pub fn new(model: PhishingNet<InnerBackend>, scaler: StandardScaler, feature_names: Vec<String>) -> Self {
        Self { model, scaler, feature_names, device: InnerDevice::default() }
    }
}

impl PhishingScorer for Inferencer {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn score(&self, rows: &[Vec<f32>]) -> Result<Vec<f32>> {
        let width = self.feature_names.len();
        let samples = rows
            .iter()
            .enumerate()
            .map(|(i, row)| -> Result<PhishingSample> {
                ensure!(row.len() == width, "row {i} has {} features, expected {width}", row.len());
                // the label is unused for scoring
                Ok(PhishingSample::new(self.scaler.transform_row(row), 0))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(predict_probabilities(&self.model, &samples, INFER_BATCH_SIZE, &self.device))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::PhishingNetConfig;

    #[test]
    fn test_score_applies_scaler_before_model() {
        let device = InnerDevice::default();
        let model: PhishingNet<InnerBackend> = PhishingNetConfig::new(2).init(&device);
        let scaler = StandardScaler::from_parts(vec![10.0, -5.0], vec![2.0, 4.0]).unwrap();
        let names  = vec!["a".to_string(), "b".to_string()];

        let direct = predict_probabilities(
            &model,
            &[PhishingSample::new(vec![0.0, 0.0], 0)],
            1,
            &device,
        );
        let inferencer = Inferencer::new(model, scaler, names);
        // (10, -5) scales to the origin
        let scored = inferencer.score(&[vec![10.0, -5.0]]).unwrap();
        assert!((scored[0] - direct[0]).abs() < 1e-6);
    }

    #[test]
    fn test_wrong_width_is_error() {
        let device = InnerDevice::default();
        let model: PhishingNet<InnerBackend> = PhishingNetConfig::new(2).init(&device);
        let scaler = StandardScaler::from_parts(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
        let inferencer = Inferencer::new(model, scaler, vec!["a".into(), "b".into()]);
        assert!(inferencer.score(&[vec![1.0]]).is_err());
    }
}
