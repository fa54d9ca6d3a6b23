//! Error types for dataset loading.

use super::DatasetKind;

/// Fatal errors raised while loading a dataset file that exists.
///
/// A missing file is not an error; the dataset is simply absent.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed delimited file {path}: {message}")]
    Delimited { path: String, message: String },

    #[error("Malformed spreadsheet {path}: {message}")]
    Spreadsheet { path: String, message: String },

    #[error("{dataset} dataset is missing required column '{column}'")]
    MissingColumn {
        dataset: DatasetKind,
        column: &'static str,
    },

    #[error("{dataset} row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        dataset: DatasetKind,
        row: usize,
        column: &'static str,
        value: String,
    },
}

impl LoadError {
    /// Creates a missing column error.
    pub fn missing_column(dataset: DatasetKind, column: &'static str) -> Self {
        Self::MissingColumn { dataset, column }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(
        dataset: DatasetKind,
        row: usize,
        column: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            dataset,
            row,
            column,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_names_dataset_and_column() {
        let err = LoadError::missing_column(DatasetKind::Rainfall, "ANNUAL");
        assert_eq!(
            err.to_string(),
            "rainfall dataset is missing required column 'ANNUAL'"
        );
    }

    #[test]
    fn invalid_value_reports_row() {
        let err = LoadError::invalid_value(DatasetKind::CropProduction, 7, "Crop_Year", "abc");
        assert!(err.to_string().contains("row 7"));
        assert!(err.to_string().contains("'abc'"));
    }
}
