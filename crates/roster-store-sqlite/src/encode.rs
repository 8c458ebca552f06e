//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings, calendar dates as
//! `YYYY-MM-DD`.

use chrono::NaiveDate;
use roster_core::{country::Country, person::PersonView};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse().map_err(|_| Error::DateParse(s.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `persons` row left-joined with
/// `countries`.
pub struct RawPersonView {
  pub person_id:     String,
  pub name:          String,
  pub date_of_birth: String,
  pub country_id:    Option<String>,
  pub country_name:  Option<String>,
  pub phone_number:  String,
  pub address:       String,
}

impl RawPersonView {
  pub fn into_view(self) -> Result<PersonView> {
    let country_id = self
      .country_id
      .as_deref()
      .map(decode_uuid)
      .transpose()?
      .unwrap_or(Uuid::nil());

    Ok(PersonView {
      id:            decode_uuid(&self.person_id)?,
      name:          self.name,
      date_of_birth: decode_date(&self.date_of_birth)?,
      country_id,
      country:       self.country_name.unwrap_or_default(),
      phone_number:  self.phone_number,
      address:       self.address,
    })
  }
}

/// Raw strings read directly from a `countries` row.
pub struct RawCountry {
  pub country_id: String,
  pub name:       String,
}

impl RawCountry {
  pub fn into_country(self) -> Result<Country> {
    Ok(Country {
      id:   decode_uuid(&self.country_id)?,
      name: self.name,
    })
  }
}
