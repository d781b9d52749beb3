/// A CSV file as read from disk: header row plus string cells.
/// Every record has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub columns: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(columns: Vec<String>, records: Vec<Vec<String>>) -> Self {
        Self { columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Numeric features with one binary label per row.
///
/// `rows[i].len() == feature_names.len()` for every row and
/// `labels.len() == rows.len()`.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    pub feature_names: Vec<String>,
    pub rows:          Vec<Vec<f32>>,
    pub labels:        Vec<u8>,
}

impl FeatureTable {
    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    /// (legitimate, phishing) row counts
    pub fn class_counts(&self) -> (usize, usize) {
        let phishing = self.labels.iter().filter(|&&l| l == 1).count();
        (self.labels.len() - phishing, phishing)
    }
}
