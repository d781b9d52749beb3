// ============================================================
// Layer 4 - CSV Loader
// ============================================================
// Reads a feature CSV into memory as strings. Parsing numbers is
// left to the Preprocessor so that the label column can be
// found by name before any cell is interpreted.
//
// A missing file is one of the two checked failures of the
// pipeline and is reported as PipelineError::DatasetNotFound.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::domain::error::PipelineError;
use crate::domain::table::CsvTable;
use crate::domain::traits::TableSource;

/// Loads a single CSV file with a header row.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for CsvLoader {
    fn load(&self) -> Result<CsvTable> {
        if !self.path.is_file() {
            return Err(PipelineError::DatasetNotFound { path: self.path.clone() }.into());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .with_context(|| format!("opening CSV '{}'", self.path.display()))?;

        let columns: Vec<String> = reader
            .headers()
            .context("reading CSV headers")?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut records = Vec::new();
        for (row_no, result) in reader.records().enumerate() {
            // csv reports its own line numbers; row_no is the data row index
            let record = result.with_context(|| format!("CSV row {row_no}"))?;
            records.push(record.iter().map(|cell| cell.to_string()).collect());
        }

        tracing::info!(
            "Loaded {} samples with {} columns from '{}'",
            records.len(),
            columns.len(),
            self.path.display()
        );
        Ok(CsvTable::new(columns, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_loads_header_and_rows() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a, b ,label\n1,2,0\n3,,1\n").unwrap();

        let table = CsvLoader::new(&path).load().unwrap();
        assert_eq!(table.columns, vec!["a", "b", "label"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[1], vec!["3", "", "1"]);
    }

    #[test]
    fn test_missing_file_is_checked_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvLoader::new(dir.path().join("nope.csv")).load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::DatasetNotFound { .. })
        ));
    }

    #[test]
    fn test_ragged_row_is_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "a,label\n1,0\n1,2,3\n").unwrap();
        assert!(CsvLoader::new(&path).load().is_err());
    }
}
