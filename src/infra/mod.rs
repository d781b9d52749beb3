// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Everything that touches the filesystem after training starts:
//
//   checkpoint.rs   - Burn records of the best epoch plus the run
//                     and network configuration as JSON, so the
//                     `predict` command can rebuild the model
//
//   metrics.rs      - per-epoch loss/accuracy CSV log
//
//   feature_info.rs - feature names, scaler parameters and test
//                     metrics consumed by the browser extension
//
//   tfjs_export.rs  - model.json + binary weight shard in the
//                     TensorFlow.js layers-model format
//
// Reference: Burn Book §5 (Checkpointing)
//            Rust Book §9 (Error Handling with anyhow)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// feature_info.json artifact
pub mod feature_info;

/// TensorFlow.js layers-model writer
pub mod tfjs_export;
