use burn::{
    module::Param,
    nn::{
        loss::BinaryCrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Initializer,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{relu, sigmoid},
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally - do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct PhishingNetConfig {
    pub num_features: usize,
    #[config(default = 64)]
    pub hidden_1: usize,
    #[config(default = 32)]
    pub hidden_2: usize,
    #[config(default = 16)]
    pub hidden_3: usize,
    #[config(default = 0.3)]
    pub dropout_1: f64,
    #[config(default = 0.2)]
    pub dropout_2: f64,
}

impl PhishingNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PhishingNet<B> {
        PhishingNet {
            dense_1:   dense(self.num_features, self.hidden_1, device),
            dropout_1: DropoutConfig::new(self.dropout_1).init(),
            dense_2:   dense(self.hidden_1, self.hidden_2, device),
            dropout_2: DropoutConfig::new(self.dropout_2).init(),
            dense_3:   dense(self.hidden_2, self.hidden_3, device),
            output:    dense(self.hidden_3, 1, device),
        }
    }

    /// Total trainable parameters of the network this config builds.
    pub fn param_count(&self) -> usize {
        let dims = [self.num_features, self.hidden_1, self.hidden_2, self.hidden_3, 1];
        dims.windows(2).map(|w| w[0] * w[1] + w[1]).sum()
    }
}

// Keras Dense defaults: Glorot-uniform kernel, zero bias.
// The initializer applies to the bias too, so it is replaced.
fn dense<B: Backend>(d_input: usize, d_output: usize, device: &B::Device) -> Linear<B> {
    let mut layer = LinearConfig::new(d_input, d_output)
        .with_initializer(Initializer::XavierUniform { gain: 1.0 })
        .init(device);
    layer.bias = Some(Param::from_tensor(Tensor::zeros([d_output], device)));
    layer
}

#[derive(Module, Debug)]
pub struct PhishingNet<B: Backend> {
    pub dense_1:   Linear<B>,
    pub dropout_1: Dropout,
    pub dense_2:   Linear<B>,
    pub dropout_2: Dropout,
    pub dense_3:   Linear<B>,
    pub output:    Linear<B>,
}

/// What a layer does, in Keras terms.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Dense { units: usize, activation: &'static str },
    Dropout { rate: f64 },
}

/// One row of the model summary / exported topology.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSummary {
    pub name:   &'static str,
    pub kind:   LayerKind,
    pub params: usize,
}

impl<B: Backend> PhishingNet<B> {
    /// features: [batch, num_features] → logits: [batch, 1]
    pub fn forward_logits(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        // Dropout is a no-op unless the backend tracks gradients.
        let x = self.dropout_1.forward(relu(self.dense_1.forward(features)));
        let x = self.dropout_2.forward(relu(self.dense_2.forward(x)));
        let x = relu(self.dense_3.forward(x));
        self.output.forward(x)
    }

    /// features: [batch, num_features] → phishing probability: [batch, 1]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        sigmoid(self.forward_logits(features))
    }

    /// Mean binary cross-entropy of the batch, plus the logits.
    pub fn forward_loss(
        &self,
        features: Tensor<B, 2>,
        targets:  Tensor<B, 2, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward_logits(features);
        // with_logits folds the sigmoid into the loss for numerical stability
        let bce = BinaryCrossEntropyLossConfig::new()
            .with_logits(true)
            .init(&logits.device());
        let loss = bce.forward(logits.clone(), targets);
        (loss, logits)
    }

    /// Dense layers in forward order, with their exported names
    /// and activations.
    pub fn dense_layers(&self) -> [(&'static str, &Linear<B>, &'static str); 4] {
        [
            ("dense",   &self.dense_1, "relu"),
            ("dense_1", &self.dense_2, "relu"),
            ("dense_2", &self.dense_3, "relu"),
            ("dense_3", &self.output,  "sigmoid"),
        ]
    }

    /// Layer-by-layer description, Keras naming.
    pub fn summary(&self) -> Vec<LayerSummary> {
        let dense = |name, layer: &Linear<B>, activation| LayerSummary {
            name,
            kind: LayerKind::Dense { units: linear_units(layer), activation },
            params: layer.num_params(),
        };
        let dropout = |name, layer: &Dropout| LayerSummary {
            name,
            kind: LayerKind::Dropout { rate: layer.prob },
            params: 0,
        };

        vec![
            dense("dense", &self.dense_1, "relu"),
            dropout("dropout", &self.dropout_1),
            dense("dense_1", &self.dense_2, "relu"),
            dropout("dropout_1", &self.dropout_2),
            dense("dense_2", &self.dense_3, "relu"),
            dense("dense_3", &self.output, "sigmoid"),
        ]
    }

    pub fn input_width(&self) -> usize {
        self.dense_1.weight.val().dims()[0]
    }
}

/// Output width of a Linear layer (weight is [d_input, d_output]).
pub fn linear_units<B: Backend>(layer: &Linear<B>) -> usize {
    layer.weight.val().dims()[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type B = NdArray;

    #[test]
    fn test_output_is_probability_per_row() {
        let device = Default::default();
        let model: PhishingNet<B> = PhishingNetConfig::new(5).init(&device);
        let x = Tensor::<B, 2>::random([7, 5], burn::tensor::Distribution::Normal(0.0, 3.0), &device);
        let probs = model.forward(x);
        assert_eq!(probs.dims(), [7, 1]);
        for p in probs.into_data().iter::<f32>() {
            assert!(p > 0.0 && p < 1.0);
        }
    }

    #[test]
    fn test_fresh_model_has_zero_biases_and_nonzero_kernels() {
        let model: PhishingNet<B> = PhishingNetConfig::new(4).init(&Default::default());
        for (name, layer, _) in model.dense_layers() {
            let bias: Vec<f32> = layer.bias.as_ref().unwrap().val().into_data().iter::<f32>().collect();
            assert_eq!(bias.len(), linear_units(layer), "{name}");
            assert!(bias.iter().all(|&b| b == 0.0), "{name} bias not zero");

            let kernel: Vec<f32> = layer.weight.val().into_data().iter::<f32>().collect();
            assert!(kernel.iter().any(|&w| w != 0.0), "{name} kernel is all zero");
        }
    }

    #[test]
    fn test_param_count_matches_topology() {
        let cfg = PhishingNetConfig::new(30);
        let model: PhishingNet<B> = cfg.init(&Default::default());
        let expected = 30 * 64 + 64 + 64 * 32 + 32 + 32 * 16 + 16 + 16 + 1;
        assert_eq!(cfg.param_count(), expected);
        assert_eq!(model.num_params(), expected);
        assert_eq!(model.input_width(), 30);
    }

    #[test]
    fn test_summary_layout() {
        let model: PhishingNet<B> = PhishingNetConfig::new(4).init(&Default::default());
        let summary = model.summary();
        let names: Vec<_> = summary.iter().map(|l| l.name).collect();
        assert_eq!(names, ["dense", "dropout", "dense_1", "dropout_1", "dense_2", "dense_3"]);
        assert_eq!(summary[1].kind, LayerKind::Dropout { rate: 0.3 });
        assert_eq!(summary[3].kind, LayerKind::Dropout { rate: 0.2 });
        assert_eq!(summary[5].kind, LayerKind::Dense { units: 1, activation: "sigmoid" });
        assert_eq!(summary[0].params, 4 * 64 + 64);
    }

    #[test]
    fn test_loss_is_scalar_and_positive() {
        let device = Default::default();
        let model: PhishingNet<B> = PhishingNetConfig::new(3).init(&device);
        let x = Tensor::<B, 2>::zeros([4, 3], &device);
        let y = Tensor::<B, 2, Int>::from_data(TensorData::new(vec![0i64, 1, 0, 1], [4, 1]), &device);
        let (loss, logits) = model.forward_loss(x, y);
        assert_eq!(logits.dims(), [4, 1]);
        let v: f64 = loss.into_scalar().elem::<f64>();
        assert!(v > 0.0);
    }
}
