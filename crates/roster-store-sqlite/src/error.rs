//! Error type for `roster-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roster_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// Attempted to update a person that was not found.
  #[error("person not found: {0}")]
  PersonNotFound(uuid::Uuid),

  #[error("duplicate country name: {0:?}")]
  DuplicateCountry(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
