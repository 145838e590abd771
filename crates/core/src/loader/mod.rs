//! Dataset loading: delimited text in, validated [`Dataset`] out.

pub mod csv;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::model::{DataFormatError, Dataset, DatasetError};

pub use self::csv::CsvOptions;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("missing required column `{0}`")]
    MissingColumn(String),
    #[error(transparent)]
    Format(#[from] DataFormatError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Read and parse a dataset file with the default options.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    load_dataset_with(path, &CsvOptions::default())
}

pub fn load_dataset_with(
    path: impl AsRef<Path>,
    options: &CsvOptions,
) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_dataset_with(&data, options)?;
    info!(path = %path.display(), records = dataset.len(), "dataset loaded");
    Ok(dataset)
}

/// Parse an in-memory CSV document with the default options.
pub fn parse_dataset(data: &[u8]) -> Result<Dataset, LoadError> {
    parse_dataset_with(data, &CsvOptions::default())
}

pub fn parse_dataset_with(data: &[u8], options: &CsvOptions) -> Result<Dataset, LoadError> {
    let records = self::csv::parse_records(data, options)?;
    Ok(Dataset::new(records)?)
}
