// ============================================================
// Layer 6 - Checkpoint Manager
// ============================================================
// Saves and restores PhishingNet weights with Burn's recorder.
//
// File layout:
//   checkpoints/
//     model_epoch_3.mpk.gz   ← weights of an epoch that improved val loss
//     model_epoch_7.mpk.gz
//     best_epoch.json        ← number of the best epoch so far
//     train_config.json      ← run configuration (serde)
//     model_config.json      ← network configuration (burn Config)
//     metrics.csv            ← see infra::metrics
//
// Records are stored at full precision so a reloaded model
// scores exactly like the exported TensorFlow.js weights.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{anyhow, Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::{PhishingNet, PhishingNetConfig};

// CompactRecorder's format at full precision, so a reloaded model
// scores exactly like the exported f32 weights.
type CheckpointRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

const BEST_EPOCH_FILE:   &str = "best_epoch.json";
const TRAIN_CONFIG_FILE: &str = "train_config.json";
const MODEL_CONFIG_FILE: &str = "model_config.json";

/// Manages saving and loading of model checkpoints.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        // A failure here resurfaces on the first write with a better message
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Save the weights of `epoch` and mark it as the best epoch.
    pub fn save_model<B: Backend>(&self, model: &PhishingNet<B>, epoch: usize) -> Result<()> {
        // Recorder appends the .mpk.gz extension
        let path = self.dir.join(format!("model_epoch_{epoch}"));

        CheckpointRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        let best_path = self.dir.join(BEST_EPOCH_FILE);
        fs::write(&best_path, serde_json::to_string(&epoch)?)
            .with_context(|| format!("Failed to write '{}'", best_path.display()))?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Load the best saved weights into `model`, which must have the
    /// architecture the checkpoint was written with.
    pub fn load_model<B: Backend>(
        &self,
        model:  PhishingNet<B>,
        device: &B::Device,
    ) -> Result<PhishingNet<B>> {
        let epoch = self.best_epoch()?;
        let path  = self.dir.join(format!("model_epoch_{epoch}"));

        tracing::info!("Loading checkpoint from epoch {}", epoch);

        let record = CheckpointRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display())
            })?;

        Ok(model.load_record(record))
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(TRAIN_CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn save_model_config(&self, cfg: &PhishingNetConfig) -> Result<()> {
        let path = self.dir.join(MODEL_CONFIG_FILE);
        cfg.save(&path)
            .with_context(|| format!("Cannot write model config to '{}'", path.display()))
    }

    pub fn load_model_config(&self) -> Result<PhishingNetConfig> {
        let path = self.dir.join(MODEL_CONFIG_FILE);
        PhishingNetConfig::load(&path).map_err(|e| {
            anyhow!(
                "Cannot read model config from '{}': {:?}. \
                 Make sure you have run 'train' before 'predict'.",
                path.display(),
                e
            )
        })
    }

    fn best_epoch(&self) -> Result<usize> {
        let path = self.dir.join(BEST_EPOCH_FILE);
        let s = fs::read_to_string(&path)
            .with_context(|| format!("Cannot find '{}'. Have you run 'train' first?", path.display()))?;
        Ok(serde_json::from_str::<usize>(&s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_model_roundtrip_keeps_best_epoch_weights() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path());
        let device = Default::default();
        let cfg    = PhishingNetConfig::new(3);

        let first:  PhishingNet<NdArray> = cfg.init(&device);
        let second: PhishingNet<NdArray> = cfg.init(&device);
        ckpt.save_model(&first, 1).unwrap();
        ckpt.save_model(&second, 4).unwrap();
        assert!(dir.path().join("model_epoch_1.mpk.gz").exists());
        assert!(dir.path().join("model_epoch_4.mpk.gz").exists());

        let loaded = ckpt.load_model(cfg.init::<NdArray>(&device), &device).unwrap();
        let expected: Vec<f32> = second.dense_1.weight.val().into_data().iter::<f32>().collect();
        let actual:   Vec<f32> = loaded.dense_1.weight.val().into_data().iter::<f32>().collect();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_configs_roundtrip() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());

        let train = TrainConfig { epochs: 7, ..TrainConfig::default() };
        ckpt.save_config(&train).unwrap();
        let json = fs::read_to_string(dir.path().join(TRAIN_CONFIG_FILE)).unwrap();
        let saved: TrainConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(saved.epochs, 7);

        ckpt.save_model_config(&PhishingNetConfig::new(12)).unwrap();
        let model_cfg = ckpt.load_model_config().unwrap();
        assert_eq!(model_cfg.num_features, 12);
        assert_eq!(model_cfg.hidden_1, 64);
    }

    #[test]
    fn test_load_without_training_fails() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        let cfg  = PhishingNetConfig::new(3);
        assert!(ckpt.load_model(cfg.init::<NdArray>(&Default::default()), &Default::default()).is_err());
        assert!(ckpt.load_model_config().is_err());
    }
}
