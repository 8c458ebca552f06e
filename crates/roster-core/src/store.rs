//! The `DirectoryStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! Higher layers (`roster-api`) depend on this abstraction, not on any
//! concrete backend.
//!
//! Read methods return flat [`PersonView`] rows with the country reference
//! already resolved; there is no lazy navigation from a person to its
//! country. The pipeline operates on these transient snapshots and discards
//! them after the response is produced.

use std::future::Future;

use uuid::Uuid;

use crate::{
  country::{Country, NewCountry},
  person::{NewPerson, PersonUpdate, PersonView},
};

/// Abstraction over a Roster directory backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DirectoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Persons ───────────────────────────────────────────────────────────

  /// Create and persist a new person. The id is assigned by the store.
  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<PersonView, Self::Error>> + Send + '_;

  /// Retrieve one person with its country resolved. `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<PersonView>, Self::Error>> + Send + '_;

  /// All persons with their countries resolved, in storage order.
  fn list_persons(
    &self,
  ) -> impl Future<Output = Result<Vec<PersonView>, Self::Error>> + Send + '_;

  /// Replace every mutable field of an existing person.
  ///
  /// Returns an error if no person with `id` exists.
  fn update_person(
    &self,
    id: Uuid,
    update: PersonUpdate,
  ) -> impl Future<Output = Result<PersonView, Self::Error>> + Send + '_;

  /// Delete a person. Returns `false` (not an error) if `id` was absent.
  fn delete_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Countries ─────────────────────────────────────────────────────────

  /// Create a country. Returns an error if the name is already taken.
  fn add_country(
    &self,
    input: NewCountry,
  ) -> impl Future<Output = Result<Country, Self::Error>> + Send + '_;

  /// Retrieve a country by id. `None` if not found.
  fn get_country(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Country>, Self::Error>> + Send + '_;

  /// Retrieve a country by exact name. `None` if not found.
  fn find_country_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Country>, Self::Error>> + Send + 'a;

  /// All countries, in storage order.
  fn list_countries(
    &self,
  ) -> impl Future<Output = Result<Vec<Country>, Self::Error>> + Send + '_;

  /// Bulk-insert country names, skipping blanks, names already present, and
  /// duplicates within the batch. Returns the number actually inserted.
  /// A duplicate never aborts the rest of the batch.
  fn import_countries(
    &self,
    names: Vec<String>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
