// ============================================================
// Layer 4 - Preprocessor
// ============================================================
// Turns the raw string table into a numeric FeatureTable:
//
//   1. Resolve the label column from the candidate list
//   2. Separate the label from the feature columns
//   3. Binarise the label (> 0 → phishing)
//   4. Parse feature cells, zero-filling missing values
//
// A non-numeric feature cell is a hard error naming the row and
// column; nothing is silently coerced except missing values.

use anyhow::{bail, Context, Result};

use crate::domain::label::{binarize, resolve_label_column};
use crate::domain::table::{CsvTable, FeatureTable};

/// Cell spellings treated as a missing value.
const MISSING_MARKERS: [&str; 6] = ["", "NA", "N/A", "NaN", "nan", "null"];

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Build the labelled feature table used for training.
    pub fn prepare(&self, table: &CsvTable) -> Result<FeatureTable> {
        let label_idx = resolve_label_column(&table.columns)?;
        tracing::info!("Using '{}' as the label column", table.columns[label_idx]);

        let feature_idx: Vec<usize> = (0..table.columns.len())
            .filter(|&i| i != label_idx)
            .collect();
        let feature_names: Vec<String> = feature_idx
            .iter()
            .map(|&i| table.columns[i].clone())
            .collect();

        let mut rows   = Vec::with_capacity(table.len());
        let mut labels = Vec::with_capacity(table.len());
        let mut filled = 0usize;

        for (row_no, record) in table.records.iter().enumerate() {
            let label = parse_cell(&record[label_idx], row_no, &table.columns[label_idx])?;
            labels.push(binarize(label));

            let mut row = Vec::with_capacity(feature_idx.len());
            for &i in &feature_idx {
                match parse_cell(&record[i], row_no, &table.columns[i])? {
                    Some(v) => row.push(v as f32),
                    None => {
                        filled += 1;
                        row.push(0.0);
                    }
                }
            }
            rows.push(row);
        }

        if filled > 0 {
            tracing::warn!("Filled {} missing feature values with 0", filled);
        }

        Ok(FeatureTable { feature_names, rows, labels })
    }

    /// Pull `feature_names` out of `table` by name, in that order.
    /// Used at prediction time where the column layout of the input
    /// may differ from the training file.
    pub fn project(&self, table: &CsvTable, feature_names: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut idx = Vec::with_capacity(feature_names.len());
        for name in feature_names {
            match table.columns.iter().position(|c| c == name) {
                Some(i) => idx.push(i),
                None => bail!("input is missing feature column '{name}'"),
            }
        }

        table
            .records
            .iter()
            .enumerate()
            .map(|(row_no, record)| {
                idx.iter()
                    .map(|&i| -> Result<f32> {
                        let value = parse_cell(&record[i], row_no, &table.columns[i])?;
                        Ok(value.map(|v| v as f32).unwrap_or(0.0))
                    })
                    .collect::<Result<Vec<f32>>>()
            })
            .collect()
    }

    /// Binarised labels of `table`, or `None` when it has no label column.
    pub fn labels(&self, table: &CsvTable) -> Result<Option<Vec<u8>>> {
        let Ok(label_idx) = resolve_label_column(&table.columns) else {
            return Ok(None);
        };
        let column = &table.columns[label_idx];
        table
            .records
            .iter()
            .enumerate()
            .map(|(row_no, record)| -> Result<u8> {
                Ok(binarize(parse_cell(&record[label_idx], row_no, column)?))
            })
            .collect::<Result<Vec<u8>>>()
            .map(Some)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one cell. `Ok(None)` means the value is missing.
fn parse_cell(raw: &str, row: usize, column: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if MISSING_MARKERS.contains(&raw) {
        return Ok(None);
    }
    let v = raw
        .parse::<f64>()
        .with_context(|| format!("row {row}, column '{column}': '{raw}' is not a number"))?;
    Ok(if v.is_nan() { None } else { Some(v) })
}
