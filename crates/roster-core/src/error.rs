//! Error types for `roster-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  #[error("duplicate country name: {0:?}")]
  DuplicateCountry(String),

  #[error("search term is not a valid id: {0:?}")]
  InvalidIdTerm(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
