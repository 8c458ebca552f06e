//! Error type for `roster-export`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("csv error: {0}")]
  Csv(#[from] ::csv::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("zip container error: {0}")]
  Zip(#[from] zip::result::ZipError),

  #[error("xml error: {0}")]
  Xml(String),

  /// The uploaded workbook is missing a required part or has no sheets.
  #[error("malformed workbook: {0}")]
  MalformedWorkbook(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
