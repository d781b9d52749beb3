// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything from the CSV file on disk to tensor batches.
//
//   phishing_dataset.csv
//       │
//       ▼
//   CsvLoader         → reads the header and string cells
//       │
//       ▼
//   Preprocessor      → finds the label, binarises it, zero-fills gaps
//       │
//       ▼
//   stratified_split  → 80/20 train/test keeping the class ratio
//       │
//       ▼
//   StandardScaler    → fit on train, applied to train and test
//       │
//       ▼
//   PhishingDataset   → implements Burn's Dataset trait
//       │
//       ▼
//   PhishingBatcher   → stacks samples into tensor batches
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads CSV files into a raw string table
pub mod loader;

/// Label resolution, binarisation and missing-value filling
pub mod preprocessor;

/// Stratified and tail splits
pub mod splitter;

/// Per-feature standardisation (mean / standard deviation)
pub mod scaler;

/// Implements Burn's Dataset trait for labelled feature rows
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
