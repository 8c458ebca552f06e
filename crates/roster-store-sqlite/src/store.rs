//! [`SqliteStore`] — the SQLite implementation of [`DirectoryStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use roster_core::{
  country::{Country, NewCountry},
  person::{NewPerson, PersonUpdate, PersonView},
  store::DirectoryStore,
};

use crate::{
  Error, Result,
  encode::{RawCountry, RawPersonView, encode_date, encode_uuid},
  schema::SCHEMA,
};

const PERSON_VIEW_SELECT: &str = "SELECT
     p.person_id, p.name, p.date_of_birth, p.country_id, c.name,
     p.phone_number, p.address
   FROM persons p
   LEFT JOIN countries c ON c.country_id = p.country_id";

fn person_view_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPersonView> {
  Ok(RawPersonView {
    person_id:     row.get(0)?,
    name:          row.get(1)?,
    date_of_birth: row.get(2)?,
    country_id:    row.get(3)?,
    country_name:  row.get(4)?,
    phone_number:  row.get(5)?,
    address:       row.get(6)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster directory store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a person view by id; error if it vanished between statements.
  async fn person_view_expected(&self, id: Uuid) -> Result<PersonView> {
    self
      .get_person(id)
      .await?
      .ok_or(Error::PersonNotFound(id))
  }

  /// Insert one country row. The UNIQUE constraint on `name` is the
  /// last-resort guard; callers check for duplicates first.
  async fn insert_country(&self, country: &Country) -> Result<()> {
    let id_str = encode_uuid(country.id);
    let name = country.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO countries (country_id, name) VALUES (?1, ?2)",
          rusqlite::params![id_str, name],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── DirectoryStore impl ─────────────────────────────────────────────────────

impl DirectoryStore for SqliteStore {
  type Error = Error;

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn add_person(&self, input: NewPerson) -> Result<PersonView> {
    let id = Uuid::new_v4();

    let id_str         = encode_uuid(id);
    let name           = input.name;
    let dob_str        = encode_date(input.date_of_birth);
    let country_id_str = input.country_id.map(encode_uuid);
    let phone_number   = input.phone_number;
    let address        = input.address;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO persons (
             person_id, name, date_of_birth, country_id, phone_number, address
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            name,
            dob_str,
            country_id_str,
            phone_number,
            address,
          ],
        )?;
        Ok(())
      })
      .await?;

    self.person_view_expected(id).await
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<PersonView>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPersonView> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{PERSON_VIEW_SELECT} WHERE p.person_id = ?1"),
              rusqlite::params![id_str],
              person_view_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPersonView::into_view).transpose()
  }

  async fn list_persons(&self) -> Result<Vec<PersonView>> {
    let raws: Vec<RawPersonView> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(PERSON_VIEW_SELECT)?;
        let rows = stmt
          .query_map([], person_view_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPersonView::into_view).collect()
  }

  async fn update_person(
    &self,
    id: Uuid,
    update: PersonUpdate,
  ) -> Result<PersonView> {
    let id_str         = encode_uuid(id);
    let name           = update.name;
    let dob_str        = encode_date(update.date_of_birth);
    let country_id_str = update.country_id.map(encode_uuid);
    let phone_number   = update.phone_number;
    let address        = update.address;

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE persons SET
             name = ?2, date_of_birth = ?3, country_id = ?4,
             phone_number = ?5, address = ?6
           WHERE person_id = ?1",
          rusqlite::params![
            id_str,
            name,
            dob_str,
            country_id_str,
            phone_number,
            address,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::PersonNotFound(id));
    }

    self.person_view_expected(id).await
  }

  async fn delete_person(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM persons WHERE person_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  // ── Countries ─────────────────────────────────────────────────────────────

  async fn add_country(&self, input: NewCountry) -> Result<Country> {
    if self.find_country_by_name(&input.name).await?.is_some() {
      return Err(Error::DuplicateCountry(input.name));
    }

    let country = Country {
      id:   Uuid::new_v4(),
      name: input.name,
    };
    self.insert_country(&country).await?;
    Ok(country)
  }

  async fn get_country(&self, id: Uuid) -> Result<Option<Country>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCountry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT country_id, name FROM countries WHERE country_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawCountry {
                  country_id: row.get(0)?,
                  name:       row.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCountry::into_country).transpose()
  }

  async fn find_country_by_name(&self, name: &str) -> Result<Option<Country>> {
    let name = name.to_owned();

    let raw: Option<RawCountry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT country_id, name FROM countries WHERE name = ?1",
              rusqlite::params![name],
              |row| {
                Ok(RawCountry {
                  country_id: row.get(0)?,
                  name:       row.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCountry::into_country).transpose()
  }

  async fn list_countries(&self) -> Result<Vec<Country>> {
    let raws: Vec<RawCountry> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT country_id, name FROM countries")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawCountry {
              country_id: row.get(0)?,
              name:       row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCountry::into_country).collect()
  }

  async fn import_countries(&self, names: Vec<String>) -> Result<usize> {
    let mut inserted = 0;

    // One name at a time: a duplicate skips that name only, never the batch.
    for name in names {
      if name.trim().is_empty() {
        continue;
      }
      if self.find_country_by_name(&name).await?.is_some() {
        continue;
      }
      let country = Country {
        id: Uuid::new_v4(),
        name,
      };
      self.insert_country(&country).await?;
      inserted += 1;
    }

    Ok(inserted)
  }
}
