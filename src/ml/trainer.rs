// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Mini-batch training of PhishingNet with Adam and binary
// cross-entropy, validated after every epoch.
//
//   - Training runs on TrainBackend (Autodiff<...>) so gradients
//     are tracked and dropout is active
//   - model.valid() returns the same weights on InnerBackend for
//     validation, with dropout disabled
//   - Every epoch that improves validation loss is checkpointed
//     and its weights are kept in memory
//   - After `patience` epochs without improvement the loop stops
//     and the best weights are returned
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::PhishingBatcher, dataset::PhishingDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::early_stopping::EarlyStopping;
use crate::ml::evaluator::evaluate;
use crate::ml::model::{PhishingNet, PhishingNetConfig};
use crate::ml::{InnerBackend, InnerDevice, TrainBackend};

/// Result of a training run.
pub struct TrainingOutcome {
    /// Weights from the best epoch, ready for evaluation and export.
    pub model:         PhishingNet<InnerBackend>,
    pub history:       Vec<EpochMetrics>,
    pub best_epoch:    usize,
    pub stopped_early: bool,
}

pub fn run_training(
    cfg:            &TrainConfig,
    model_cfg:      &PhishingNetConfig,
    train_dataset:  PhishingDataset,
    val_dataset:    PhishingDataset,
    ckpt_manager:   &CheckpointManager,
    metrics_logger: &MetricsLogger,
) -> Result<TrainingOutcome> {
    let device = InnerDevice::default();
    tracing::info!("Using device: {:?}", device);
    <TrainBackend as Backend>::seed(cfg.seed);
    train_loop(cfg, model_cfg, train_dataset, val_dataset, ckpt_manager, metrics_logger, device)
}

fn train_loop(
    cfg:            &TrainConfig,
    model_cfg:      &PhishingNetConfig,
    train_dataset:  PhishingDataset,
    val_dataset:    PhishingDataset,
    ckpt_manager:   &CheckpointManager,
    metrics_logger: &MetricsLogger,
    device:         InnerDevice,
) -> Result<TrainingOutcome> {

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: PhishingNet<TrainBackend> = model_cfg.init(&device);

    // ── Adam optimiser (Keras defaults) ───────────────────────────────────────
    let optim_cfg = AdamConfig::new()
        .with_beta_1(0.9)
        .with_beta_2(0.999)
        .with_epsilon(1e-7);
    let mut optim = optim_cfg.init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = PhishingBatcher::<TrainBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    let has_validation = val_dataset.sample_count() > 0;
    if !has_validation {
        tracing::warn!("Validation set is empty; early stopping will monitor training loss");
    }

    let mut stopper       = EarlyStopping::new(cfg.patience);
    let mut best_model    = None;
    let mut history       = Vec::new();
    let mut stopped_early = false;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_seen     = 0usize;

        for batch in train_loader.iter() {
            let batch_len = batch.targets.dims()[0];
            let (loss, _) = model.forward_loss(batch.features, batch.targets);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val * batch_len as f64;
            train_seen     += batch_len;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let train_loss = if train_seen > 0 {
            train_loss_sum / train_seen as f64
        } else { f64::NAN };

        // ── Validation phase ──────────────────────────────────────────────────
        let (val_loss, val_acc) = if has_validation {
            let (m, _) = evaluate(&model.valid(), val_dataset.samples(), cfg.batch_size, &device);
            (m.loss, m.accuracy)
        } else {
            (f64::NAN, 0.0)
        };

        let monitored = if has_validation { val_loss } else { train_loss };
        let improved  = stopper.observe(epoch, monitored);
        if improved {
            ckpt_manager.save_model(&model, epoch)?;
            best_model = Some(model.clone());
        }

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | val_acc={:.1}%{}",
            epoch, cfg.epochs, train_loss, val_loss, val_acc * 100.0,
            if improved { " *" } else { "" },
        );

        let metrics = EpochMetrics::new(epoch, train_loss, val_loss, val_acc);
        metrics_logger.log(&metrics)?;
        history.push(metrics);

        if stopper.should_stop() {
            println!(
                "Early stopping at epoch {} (no improvement for {} epochs)",
                epoch, cfg.patience,
            );
            stopped_early = true;
            break;
        }
    }

    // ── Restore best weights ──────────────────────────────────────────────────
    let (model, best_epoch) = match (best_model, stopper.best_epoch()) {
        (Some(best), Some(epoch)) => {
            tracing::info!(
                "Restoring weights from epoch {} (loss={:.4})",
                epoch,
                stopper.best_loss()
            );
            (best, epoch)
        }
        _ => {
            // Loss never became finite; keep the last weights so the
            // checkpoint directory still holds a loadable model.
            let last = history.len();
            tracing::warn!("No epoch improved the monitored loss; keeping epoch {}", last);
            ckpt_manager.save_model(&model, last)?;
            (model, last)
        }
    };

    tracing::info!("Training complete! Metrics in '{}'", metrics_logger.csv_path().display());
    Ok(TrainingOutcome {
        model: model.valid(),
        history,
        best_epoch,
        stopped_early,
    })
}
