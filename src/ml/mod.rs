// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// All Burn-specific model code lives here.
//
//   model.rs          - the dense phishing classifier
//                       64 → 32 → 16 → 1, ReLU, dropout after the
//                       first two layers, sigmoid output
//
//   early_stopping.rs - patience counter on validation loss
//
//   trainer.rs        - the training loop: Adam, binary
//                       cross-entropy, per-epoch validation,
//                       checkpointing, restoring the best weights
//
//   evaluator.rs      - test-set loss, accuracy, precision, recall
//
//   inferencer.rs     - loads a checkpoint and scores raw rows
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// Dense binary classifier architecture
pub mod model;

/// Validation-loss patience tracking
pub mod early_stopping;

/// Training loop with early stopping and checkpointing
pub mod trainer;

/// Classification metrics on a held-out set
pub mod evaluator;

/// Inference engine - loads checkpoint and scores feature rows
pub mod inferencer;

// CPU by default; `--features wgpu` moves everything to the GPU.
#[cfg(not(feature = "wgpu"))]
pub type InnerBackend = burn::backend::NdArray;
#[cfg(feature = "wgpu")]
pub type InnerBackend = burn::backend::Wgpu;

pub type TrainBackend = burn::backend::Autodiff<InnerBackend>;

pub type InnerDevice = <InnerBackend as burn::tensor::backend::Backend>::Device;
