//! Country reference data.
//!
//! Countries are written once (singly or via bulk import) and never updated
//! or deleted. Names are unique; duplicates are rejected at write time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
  pub id:   Uuid,
  pub name: String,
}

/// Input to [`crate::store::DirectoryStore::add_country`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCountry {
  pub name: String,
}

impl NewCountry {
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::Validation("country name must not be empty".into()));
    }
    Ok(())
  }
}
