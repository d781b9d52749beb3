// ============================================================
// Layer 6 - Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch so
// learning curves can be plotted after the run.
//
// Output file: checkpoints/metrics.csv
//
//   epoch,train_loss,val_loss,val_acc
//   1,0.612300,0.541200,0.781000
//   2,0.498100,0.463300,0.824000
//
// If val_loss starts rising while train_loss keeps falling the
// model is overfitting; early stopping reacts to exactly that.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

const HEADER: [&str; 4] = ["epoch", "train_loss", "val_loss", "val_acc"];

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean binary cross-entropy over the training samples
    pub train_loss: f64,

    /// Mean binary cross-entropy on the validation set
    pub val_loss: f64,

    /// Fraction of validation samples classified correctly
    pub val_acc: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64, val_acc: f64) -> Self {
        Self { epoch, train_loss, val_loss, val_acc }
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the logger and start a fresh CSV with a header row.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        let mut w = csv::Writer::from_path(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        w.write_record(HEADER)?;
        w.flush()?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        // header was written by new()
        let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        w.write_record([
            m.epoch.to_string(),
            format!("{:.6}", m.train_loss),
            format!("{:.6}", m.val_loss),
            format!("{:.6}", m.val_acc),
        ])?;
        w.flush()?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_header_and_rows() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(1, 0.61234, 0.5, 0.75)).unwrap();
        logger.log(&EpochMetrics::new(2, 0.4, 0.45, 0.8)).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "epoch,train_loss,val_loss,val_acc");
        assert_eq!(lines[1], "1,0.612340,0.500000,0.750000");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_rows_parse_back_with_csv_reader() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(3, 0.25, f64::NAN, 0.0)).unwrap();

        let mut reader = csv::Reader::from_path(logger.csv_path()).unwrap();
        assert_eq!(reader.headers().unwrap(), HEADER.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "3");
        assert!(rows[0][2].parse::<f64>().unwrap().is_nan());
    }

    #[test]
    fn test_new_run_truncates_previous_log() {
        let dir = tempfile::tempdir().unwrap();
        MetricsLogger::new(dir.path()).unwrap()
            .log(&EpochMetrics::new(1, 1.0, 1.0, 0.5)).unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        let text = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
