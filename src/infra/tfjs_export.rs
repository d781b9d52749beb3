// ============================================================
// Layer 6 - TensorFlow.js Exporter
// ============================================================
// Writes the trained network in the TensorFlow.js
// "layers-model" format so the browser can load it with
// tf.loadLayersModel('model_tfjs/model.json'):
//
//   model_tfjs/
//     model.json              ← topology + weights manifest
//     group1-shard1of1.bin    ← all weights, float32 little-endian
//
// The topology mirrors a Keras Sequential model: Dense layers
// named dense, dense_1, ... and Dropout layers named dropout,
// dropout_1. Dense kernels are [inputs, units] row-major, which
// is also how Burn stores Linear weights, so the values are
// written without transposing.
//
// Reference: TensorFlow.js converter, "Layers model format"

use anyhow::{Context, Result};
use burn::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{fs, path::{Path, PathBuf}};

use crate::ml::model::{LayerKind, PhishingNet};

pub const MODEL_JSON_FILE: &str = "model.json";
pub const WEIGHTS_FILE:    &str = "group1-shard1of1.bin";

/// Written as both `generatedBy` and the topology's `keras_version`.
const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelJson {
    pub format:           String,
    pub generated_by:     String,
    pub converted_by:     Option<String>,
    pub model_topology:   Value,
    pub weights_manifest: Vec<WeightsGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightsGroup {
    pub paths:   Vec<String>,
    pub weights: Vec<WeightEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub name:  String,
    pub shape: Vec<usize>,
    pub dtype: String,
}

/// What was written by an export.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub model_json:   PathBuf,
    pub weights:      PathBuf,
    pub weight_count: usize,
}

pub struct TfjsExporter {
    dir: PathBuf,
}

impl TfjsExporter {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn export<B: Backend>(&self, model: &PhishingNet<B>) -> Result<ExportSummary> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let (entries, values) = collect_weights(model);
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();

        let doc = ModelJson {
            format:           "layers-model".to_string(),
            generated_by:     GENERATOR.to_string(),
            converted_by:     None,
            model_topology:   topology(model),
            weights_manifest: vec![WeightsGroup {
                paths:   vec![WEIGHTS_FILE.to_string()],
                weights: entries,
            }],
        };

        let model_json = self.dir.join(MODEL_JSON_FILE);
        fs::write(&model_json, serde_json::to_string(&doc)?)
            .with_context(|| format!("Cannot write '{}'", model_json.display()))?;

        let weights = self.dir.join(WEIGHTS_FILE);
        fs::write(&weights, &bytes)
            .with_context(|| format!("Cannot write '{}'", weights.display()))?;

        tracing::info!(
            "Exported TensorFlow.js model to '{}' ({} weights, {} bytes)",
            self.dir.display(),
            values.len(),
            bytes.len()
        );
        Ok(ExportSummary { model_json, weights, weight_count: values.len() })
    }
}

/// Manifest entries and flattened weight values, in the same order.
fn collect_weights<B: Backend>(model: &PhishingNet<B>) -> (Vec<WeightEntry>, Vec<f32>) {
    let mut entries = Vec::new();
    let mut values  = Vec::new();

    for (name, layer, _) in model.dense_layers() {
        let kernel = layer.weight.val();
        entries.push(WeightEntry {
            name:  format!("{name}/kernel"),
            shape: kernel.dims().to_vec(),
            dtype: "float32".to_string(),
        });
        values.extend(kernel.into_data().iter::<f32>());

        if let Some(bias) = &layer.bias {
            let bias = bias.val();
            entries.push(WeightEntry {
                name:  format!("{name}/bias"),
                shape: bias.dims().to_vec(),
                dtype: "float32".to_string(),
            });
            values.extend(bias.into_data().iter::<f32>());
        }
    }
    (entries, values)
}

/// Keras-style Sequential topology for `model`.
fn topology<B: Backend>(model: &PhishingNet<B>) -> Value {
    let mut first_dense = true;
    let layers: Vec<Value> = model
        .summary()
        .into_iter()
        .map(|layer| match layer.kind {
            LayerKind::Dense { units, activation } => {
                let mut config = json!({
                    "name": layer.name,
                    "trainable": true,
                    "dtype": "float32",
                    "units": units,
                    "activation": activation,
                    "use_bias": true,
                    "kernel_initializer": { "class_name": "GlorotUniform", "config": { "seed": null } },
                    "bias_initializer": { "class_name": "Zeros", "config": {} },
                    "kernel_regularizer": null,
                    "bias_regularizer": null,
                    "activity_regularizer": null,
                    "kernel_constraint": null,
                    "bias_constraint": null,
                });
                if first_dense {
                    config["batch_input_shape"] = json!([null, model.input_width()]);
                    first_dense = false;
                }
                json!({ "class_name": "Dense", "config": config })
            }
            LayerKind::Dropout { rate } => json!({
                "class_name": "Dropout",
                "config": {
                    "name": layer.name,
                    "trainable": true,
                    "dtype": "float32",
                    "rate": rate,
                    "noise_shape": null,
                    "seed": null,
                }
            }),
        })
        .collect();

    json!({
        "class_name": "Sequential",
        "config": { "name": "sequential", "layers": layers },
        "keras_version": GENERATOR,
        "backend": "tensor_flow.js",
    })
}
