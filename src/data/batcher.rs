// ============================================================
// Layer 4 - Phishing Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec<PhishingSample>
// into tensors:
//
//   Input:  N samples, each with F features
//   Output: features [N, F] (float), targets [N, 1] (int)
//
// Targets keep the [N, 1] shape of the network output so the
// binary cross-entropy loss can compare them element-wise.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::PhishingSample;

#[derive(Debug, Clone)]
pub struct PhishingBatch<B: Backend> {
    /// Scaled features - shape: [batch_size, num_features]
    pub features: Tensor<B, 2>,

    /// Labels - shape: [batch_size, 1], values in {0, 1}
    pub targets: Tensor<B, 2, Int>,
}

/// Holds the target device so tensors are created on the correct GPU/CPU.
#[derive(Clone, Debug)]
pub struct PhishingBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> PhishingBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<PhishingSample, PhishingBatch<B>> for PhishingBatcher<B> {
    fn batch(&self, items: Vec<PhishingSample>) -> PhishingBatch<B> {
        let batch_size   = items.len();
        let num_features = items.first().map(|s| s.features.len()).unwrap_or(0);

        let features_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let labels: Vec<i64> = items.iter().map(|s| s.label as i64).collect();

        let features = Tensor::<B, 2>::from_data(
            TensorData::new(features_flat, [batch_size, num_features]),
            &self.device,
        );
        let targets = Tensor::<B, 2, Int>::from_data(
            TensorData::new(labels, [batch_size, 1]),
            &self.device,
        );

        PhishingBatch { features, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let batcher = PhishingBatcher::<NdArray>::new(Default::default());
        let batch = batcher.batch(vec![
            PhishingSample::new(vec![1.0, 2.0, 3.0], 0),
            PhishingSample::new(vec![4.0, 5.0, 6.0], 1),
        ]);
        assert_eq!(batch.features.dims(), [2, 3]);
        assert_eq!(batch.targets.dims(), [2, 1]);

        let values: Vec<f32> = batch.features.into_data().iter::<f32>().collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let labels: Vec<i64> = batch.targets.into_data().iter::<i64>().collect();
        assert_eq!(labels, vec![0, 1]);
    }
}
