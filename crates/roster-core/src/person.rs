//! Person records and their read-side projection.
//!
//! `Person` is the persisted shape; `PersonView` is the flattened projection
//! handed to the search/sort/export pipeline, with the country reference
//! already resolved to a display name.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Upper bound on person names, matching the storage column constraint.
pub const NAME_MAX_LEN: usize = 40;

/// A person as persisted. The id is assigned once at creation and never
/// changes; every other field is replaced wholesale on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub id:            Uuid,
  pub name:          String,
  pub date_of_birth: NaiveDate,
  pub country_id:    Option<Uuid>,
  pub phone_number:  String,
  pub address:       String,
}

/// Flattened, read-only projection of a [`Person`] with the country
/// reference resolved. Never persisted; assembled on read.
///
/// Equality is field-wise — two views are equal iff every field matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonView {
  pub id:            Uuid,
  pub name:          String,
  pub date_of_birth: NaiveDate,
  /// Nil UUID when the person has no country reference.
  pub country_id:    Uuid,
  /// Empty string when the country reference is absent or unresolved.
  pub country:       String,
  pub phone_number:  String,
  pub address:       String,
}

impl PersonView {
  /// Total mapping from a person plus an optionally-resolved country name.
  /// An absent country maps to a nil country id and an empty display name.
  pub fn from_person(person: Person, country_name: Option<String>) -> Self {
    Self {
      id:            person.id,
      name:          person.name,
      date_of_birth: person.date_of_birth,
      country_id:    person.country_id.unwrap_or(Uuid::nil()),
      country:       country_name.unwrap_or_default(),
      phone_number:  person.phone_number,
      address:       person.address,
    }
  }
}

/// Input to [`crate::store::DirectoryStore::add_person`].
/// The id is always assigned by the store; it is not accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPerson {
  pub name:          String,
  pub date_of_birth: NaiveDate,
  pub country_id:    Option<Uuid>,
  #[serde(default)]
  pub phone_number:  String,
  #[serde(default)]
  pub address:       String,
}

impl NewPerson {
  /// Request-boundary validation. Name and date of birth are required;
  /// the date requirement is enforced structurally by the field type.
  pub fn validate(&self) -> Result<()> {
    validate_name(&self.name)
  }
}

/// Input to [`crate::store::DirectoryStore::update_person`]. Replaces every
/// mutable field of the target person; the id comes from the request path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonUpdate {
  pub name:          String,
  pub date_of_birth: NaiveDate,
  pub country_id:    Option<Uuid>,
  #[serde(default)]
  pub phone_number:  String,
  #[serde(default)]
  pub address:       String,
}

impl PersonUpdate {
  pub fn validate(&self) -> Result<()> {
    validate_name(&self.name)
  }
}

fn validate_name(name: &str) -> Result<()> {
  if name.trim().is_empty() {
    return Err(Error::Validation("name must not be empty".into()));
  }
  if name.chars().count() > NAME_MAX_LEN {
    return Err(Error::Validation(format!(
      "name must be at most {NAME_MAX_LEN} characters"
    )));
  }
  Ok(())
}
