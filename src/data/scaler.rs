// ============================================================
// Layer 4 - Standard Scaler
// ============================================================
// z = (x - mean) / scale, per feature.
//
// mean and scale come from the TRAINING partition only and are
// exported next to the model so the browser applies exactly the
// same transform. scale is the population standard deviation
// (divide by n); a constant feature gets scale 1.0 so it maps
// to 0 instead of dividing by zero.

use anyhow::{ensure, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean:  Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Compute per-feature mean and scale from `rows`.
    pub fn fit(rows: &[Vec<f32>]) -> Result<Self> {
        ensure!(!rows.is_empty(), "cannot fit a scaler on zero rows");
        let n_features = rows[0].len();
        let n = rows.len() as f64;

        let mut mean = vec![0.0f64; n_features];
        for row in rows {
            ensure!(row.len() == n_features, "ragged feature rows");
            for (m, &x) in mean.iter_mut().zip(row) {
                *m += x as f64;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = vec![0.0f64; n_features];
        for row in rows {
            for ((v, &x), m) in var.iter_mut().zip(row).zip(&mean) {
                let d = x as f64 - m;
                *v += d * d;
            }
        }

        let scale = var
            .into_iter()
            .map(|v| {
                let std = (v / n).sqrt();
                if std > f64::EPSILON { std } else { 1.0 }
            })
            .collect();

        Ok(Self { mean, scale })
    }

    /// Rebuild a scaler from exported parameters.
    pub fn from_parts(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        ensure!(
            mean.len() == scale.len(),
            "scaler mean has {} entries but scale has {}",
            mean.len(),
            scale.len()
        );
        ensure!(scale.iter().all(|&s| s != 0.0), "scaler scale contains 0");
        Ok(Self { mean, scale })
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub fn transform_row(&self, row: &[f32]) -> Vec<f32> {
        row.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (m, s))| ((x as f64 - m) / s) as f32)
            .collect()
    }
}
