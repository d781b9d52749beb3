// ============================================================
// Layer 5 - Evaluator
// ============================================================
// Scores a held-out set and reduces the predictions to the
// numbers reported after training and stored in
// feature_info.json.
//
// A probability strictly above the threshold (0.5) counts as a
// phishing prediction. Loss is binary cross-entropy on the
// probabilities, clipped to [1e-7, 1 - 1e-7] like Keras does.

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::batcher::PhishingBatcher;
use crate::data::dataset::PhishingSample;
use crate::ml::model::PhishingNet;

pub const DECISION_THRESHOLD: f32 = 0.5;

const PROB_EPSILON: f64 = 1e-7;

/// Confusion-matrix derived metrics. Class 1 (phishing) is positive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationMetrics {
    pub loss:      f64,
    pub accuracy:  f64,
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    pub tp:        usize,
    pub fp:        usize,
    pub tn:        usize,
    pub fn_count:  usize,
}

impl ClassificationMetrics {
    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_count
    }
}

impl std::fmt::Display for ClassificationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "loss={:.4} acc={:.4} prec={:.4} rec={:.4} f1={:.4} (tp={} fp={} tn={} fn={})",
            self.loss,
            self.accuracy,
            self.precision,
            self.recall,
            self.f1,
            self.tp,
            self.fp,
            self.tn,
            self.fn_count,
        )
    }
}

/// Predicted class for a probability.
pub fn is_phishing(probability: f32) -> bool {
    probability > DECISION_THRESHOLD
}

/// Compute metrics from probabilities and ground-truth labels.
pub fn compute_metrics(probabilities: &[f32], labels: &[u8]) -> ClassificationMetrics {
    debug_assert_eq!(probabilities.len(), labels.len());

    let mut m = ClassificationMetrics::default();
    for (&p, &label) in probabilities.iter().zip(labels) {
        match (is_phishing(p), label == 1) {
            (true, true)   => m.tp += 1,
            (true, false)  => m.fp += 1,
            (false, false) => m.tn += 1,
            (false, true)  => m.fn_count += 1,
        }
    }

    let total = m.total();
    m.loss = binary_cross_entropy(probabilities, labels);
    m.accuracy  = ratio(m.tp + m.tn, total);
    m.precision = ratio(m.tp, m.tp + m.fp);
    m.recall    = ratio(m.tp, m.tp + m.fn_count);
    m.f1 = if m.precision + m.recall > 0.0 {
        2.0 * m.precision * m.recall / (m.precision + m.recall)
    } else {
        0.0
    };
    m
}

/// Mean binary cross-entropy of probabilities against {0, 1} labels.
pub fn binary_cross_entropy(probabilities: &[f32], labels: &[u8]) -> f64 {
    if probabilities.is_empty() {
        return 0.0;
    }
    let sum: f64 = probabilities
        .iter()
        .zip(labels)
        .map(|(&p, &y)| {
            let p = (p as f64).clamp(PROB_EPSILON, 1.0 - PROB_EPSILON);
            if y == 1 { -p.ln() } else { -(1.0 - p).ln() }
        })
        .sum();
    sum / probabilities.len() as f64
}

fn ratio(num: usize, den: usize) -> f64 {
    if den > 0 { num as f64 / den as f64 } else { 0.0 }
}

/// Run `model` over already-scaled samples in batches, keeping input order.
pub fn predict_probabilities<B: Backend>(
    model:      &PhishingNet<B>,
    samples:    &[PhishingSample],
    batch_size: usize,
    device:     &B::Device,
) -> Vec<f32> {
    let batcher = PhishingBatcher::<B>::new(device.clone());
    let mut out = Vec::with_capacity(samples.len());

    for chunk in samples.chunks(batch_size.max(1)) {
        let batch = batcher.batch(chunk.to_vec());
        let probs = model.forward(batch.features);
        out.extend(probs.into_data().iter::<f32>());
    }
    out
}

/// Score `samples` and return (metrics, probabilities in sample order).
pub fn evaluate<B: Backend>(
    model:      &PhishingNet<B>,
    samples:    &[PhishingSample],
    batch_size: usize,
    device:     &B::Device,
) -> (ClassificationMetrics, Vec<f32>) {
    let probabilities = predict_probabilities(model, samples, batch_size, device);
    let labels: Vec<u8> = samples.iter().map(|s| s.label).collect();
    let metrics = compute_metrics(&probabilities, &labels);
    tracing::debug!("Evaluated {} samples: {}", samples.len(), metrics);
    (metrics, probabilities)
}
