use burn::data::dataset::Dataset;

use crate::data::scaler::StandardScaler;

/// One row of features with its binary label (1 = phishing).
#[derive(Debug, Clone, PartialEq)]
pub struct PhishingSample {
    pub features: Vec<f32>,
    pub label:    u8,
}

impl PhishingSample {
    pub fn new(features: Vec<f32>, label: u8) -> Self {
        Self { features, label }
    }
}

pub struct PhishingDataset {
    samples: Vec<PhishingSample>,
}

impl PhishingDataset {
    pub fn new(samples: Vec<PhishingSample>) -> Self { Self { samples } }

    /// Standardise every sample with `scaler` (fitted elsewhere).
    pub fn scaled(samples: &[PhishingSample], scaler: &StandardScaler) -> Self {
        Self::new(
            samples
                .iter()
                .map(|s| PhishingSample::new(scaler.transform_row(&s.features), s.label))
                .collect(),
        )
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    pub fn samples(&self) -> &[PhishingSample] { &self.samples }
}

impl Dataset<PhishingSample> for PhishingDataset {
    fn get(&self, index: usize) -> Option<PhishingSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
