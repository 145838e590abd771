pub mod dataset;
pub mod record;

pub use dataset::{Dataset, DatasetError};
pub use record::{DataFormatError, Record, ValueIssue};
