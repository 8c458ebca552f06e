//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use roster_core::{
  country::NewCountry,
  person::{NewPerson, PersonUpdate},
  store::DirectoryStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn dob(year: i32) -> NaiveDate { NaiveDate::from_ymd_opt(year, 3, 14).unwrap() }

fn new_person(name: &str, country_id: Option<Uuid>) -> NewPerson {
  NewPerson {
    name: name.into(),
    date_of_birth: dob(1990),
    country_id,
    phone_number: "555-0100".into(),
    address: "12 Main St".into(),
  }
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_person() {
  let s = store().await;

  let added = s.add_person(new_person("Amy", None)).await.unwrap();
  assert_eq!(added.name, "Amy");
  assert_eq!(added.country_id, Uuid::nil());
  assert_eq!(added.country, "");

  let fetched = s.get_person(added.id).await.unwrap().unwrap();
  assert_eq!(fetched, added);
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn person_view_resolves_country_name() {
  let s = store().await;
  let uk = s
    .add_country(NewCountry { name: "UK".into() })
    .await
    .unwrap();

  let view = s.add_person(new_person("Bob", Some(uk.id))).await.unwrap();
  assert_eq!(view.country_id, uk.id);
  assert_eq!(view.country, "UK");
}

#[tokio::test]
async fn list_persons_joins_countries() {
  let s = store().await;
  let us = s
    .add_country(NewCountry { name: "US".into() })
    .await
    .unwrap();

  s.add_person(new_person("Amy", Some(us.id))).await.unwrap();
  s.add_person(new_person("Bob", None)).await.unwrap();

  let all = s.list_persons().await.unwrap();
  assert_eq!(all.len(), 2);

  let amy = all.iter().find(|v| v.name == "Amy").unwrap();
  assert_eq!(amy.country, "US");
  let bob = all.iter().find(|v| v.name == "Bob").unwrap();
  assert_eq!(bob.country, "");
}

#[tokio::test]
async fn update_person_replaces_all_mutable_fields() {
  let s = store().await;
  let uk = s
    .add_country(NewCountry { name: "UK".into() })
    .await
    .unwrap();
  let added = s.add_person(new_person("Amy", None)).await.unwrap();

  let updated = s
    .update_person(added.id, PersonUpdate {
      name:          "Amelia".into(),
      date_of_birth: dob(1989),
      country_id:    Some(uk.id),
      phone_number:  "555-0199".into(),
      address:       "Leadworth".into(),
    })
    .await
    .unwrap();

  assert_eq!(updated.id, added.id, "id is immutable");
  assert_eq!(updated.name, "Amelia");
  assert_eq!(updated.date_of_birth, dob(1989));
  assert_eq!(updated.country, "UK");
  assert_eq!(updated.phone_number, "555-0199");
  assert_eq!(updated.address, "Leadworth");
}

#[tokio::test]
async fn update_missing_person_errors() {
  let s = store().await;
  let err = s
    .update_person(Uuid::new_v4(), PersonUpdate {
      name:          "Nobody".into(),
      date_of_birth: dob(2000),
      country_id:    None,
      phone_number:  String::new(),
      address:       String::new(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::PersonNotFound(_)));
}

#[tokio::test]
async fn delete_person_returns_bool_not_error() {
  let s = store().await;
  let added = s.add_person(new_person("Amy", None)).await.unwrap();

  assert!(s.delete_person(added.id).await.unwrap());
  assert!(s.get_person(added.id).await.unwrap().is_none());

  // A second delete is a no-op, not an error.
  assert!(!s.delete_person(added.id).await.unwrap());
}

// ─── Countries ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_country_and_find_by_name() {
  let s = store().await;
  let added = s
    .add_country(NewCountry { name: "India".into() })
    .await
    .unwrap();

  let by_id = s.get_country(added.id).await.unwrap().unwrap();
  assert_eq!(by_id, added);

  let by_name = s.find_country_by_name("India").await.unwrap().unwrap();
  assert_eq!(by_name, added);

  assert!(s.find_country_by_name("Atlantis").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_country_name_rejected() {
  let s = store().await;
  s.add_country(NewCountry { name: "Japan".into() })
    .await
    .unwrap();

  let err = s
    .add_country(NewCountry { name: "Japan".into() })
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::DuplicateCountry(_)));

  assert_eq!(s.list_countries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn import_countries_skips_blanks_and_duplicates() {
  let s = store().await;
  s.add_country(NewCountry { name: "UK".into() })
    .await
    .unwrap();

  let inserted = s
    .import_countries(vec![
      "UK".into(),     // already present
      "France".into(), // new
      "".into(),       // blank
      "France".into(), // duplicate within the batch
      "Spain".into(),  // new
    ])
    .await
    .unwrap();

  assert_eq!(inserted, 2);
  assert_eq!(s.list_countries().await.unwrap().len(), 3);
}

#[tokio::test]
async fn import_duplicate_does_not_abort_batch() {
  let s = store().await;
  let inserted = s
    .import_countries(vec!["A".into(), "A".into(), "B".into()])
    .await
    .unwrap();
  assert_eq!(inserted, 2);
}
