//! Error types for dictionary loading.

use std::path::PathBuf;

/// Errors from loading or validating a synonym dictionary.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dictionary CSV: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("dictionary row {row}: missing column '{column}'")]
    MissingColumn { row: usize, column: &'static str },

    #[error("dictionary row {row}: {source}")]
    Category {
        row: usize,
        #[source]
        source: fieldmap_model::ModelError,
    },

    #[error("dictionary row {row}: empty canonical field name")]
    EmptyCanonical { row: usize },

    #[error("dictionary row {row}: invalid required flag '{value}'")]
    InvalidRequired { row: usize, value: String },

    #[error("duplicate canonical field '{canonical}' in category {category}")]
    DuplicateCanonical { canonical: String, category: String },
}

impl From<csv::Error> for DictionaryError {
    fn from(source: csv::Error) -> Self {
        Self::Csv { source }
    }
}

pub type Result<T> = std::result::Result<T, DictionaryError>;
