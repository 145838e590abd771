use barflow_protocol::Key;
use serde::Serialize;
use thiserror::Error;

/// One row of the dataset: a category and its measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Category name; unique within a dataset and used as the join key.
    pub name: Key,
    /// Finite, non-negative measurement.
    pub value: f64,
}

/// Why a row's fields could not become a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueIssue {
    NotANumber,
    NotFinite,
    Negative,
    EmptyName,
}

impl ValueIssue {
    fn describe(self) -> &'static str {
        match self {
            ValueIssue::NotANumber => "value is not a number",
            ValueIssue::NotFinite => "value is not finite",
            ValueIssue::Negative => "value is negative",
            ValueIssue::EmptyName => "name is empty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("row {row} (`{name}`): {} (got `{raw}`)", .issue.describe())]
pub struct DataFormatError {
    /// 1-based line number in the source file (header is line 1).
    pub row: u64,
    pub name: String,
    pub raw: String,
    pub issue: ValueIssue,
}

impl Record {
    pub fn new(name: impl Into<Key>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Build a record from the raw text of one row.
    ///
    /// The conversion is strict: anything that would not survive as a
    /// finite, non-negative number is rejected instead of becoming NaN.
    pub fn parse(row: u64, name: &str, raw: &str) -> Result<Self, DataFormatError> {
        let fail = |issue| DataFormatError {
            row,
            name: name.to_string(),
            raw: raw.to_string(),
            issue,
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(fail(ValueIssue::EmptyName));
        }
        let value: f64 = raw.trim().parse().map_err(|_| fail(ValueIssue::NotANumber))?;
        if value.is_nan() {
            return Err(fail(ValueIssue::NotANumber));
        }
        if !value.is_finite() {
            return Err(fail(ValueIssue::NotFinite));
        }
        if value < 0.0 {
            return Err(fail(ValueIssue::Negative));
        }
        // Normalize -0.0 so formatting and comparisons stay boring.
        Ok(Record::new(name, value + 0.0))
    }
}
