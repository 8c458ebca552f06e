//! The in-memory search and sort pipeline over [`PersonView`] sequences.
//!
//! Field selectors arrive from the HTTP layer as plain strings. They are
//! parsed into finite enums up front so that each supported field has exactly
//! one key-extraction site. An unrecognised selector is treated as "no
//! filter" / "no sort" rather than an error; several existing clients rely on
//! that permissive fallback.

use std::cmp::Ordering;

use uuid::Uuid;

use crate::{Error, Result, person::PersonView};

// ─── Field selectors ─────────────────────────────────────────────────────────

/// A searchable attribute of [`PersonView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
  Name,
  Address,
  PhoneNumber,
  DateOfBirth,
  Id,
}

impl SearchField {
  /// Parse a selector string. Unknown selectors yield `None`, which callers
  /// treat as "no filter".
  pub fn from_selector(s: &str) -> Option<Self> {
    match s {
      "Name" => Some(Self::Name),
      "Address" => Some(Self::Address),
      "PhoneNumber" => Some(Self::PhoneNumber),
      "DateOfBirth" => Some(Self::DateOfBirth),
      "Id" => Some(Self::Id),
      _ => None,
    }
  }

  /// The textual rendering of this field, used for substring matching.
  fn render(self, view: &PersonView) -> String {
    match self {
      Self::Name => view.name.clone(),
      Self::Address => view.address.clone(),
      Self::PhoneNumber => view.phone_number.clone(),
      Self::DateOfBirth => view.date_of_birth.to_string(),
      Self::Id => view.id.to_string(),
    }
  }
}

/// A sortable attribute of [`PersonView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
  Name,
  Id,
  DateOfBirth,
  Address,
  PhoneNumber,
  Country,
}

impl SortField {
  pub fn from_selector(s: &str) -> Option<Self> {
    match s {
      "Name" => Some(Self::Name),
      "Id" => Some(Self::Id),
      "DateOfBirth" => Some(Self::DateOfBirth),
      "Address" => Some(Self::Address),
      "PhoneNumber" => Some(Self::PhoneNumber),
      "Country" => Some(Self::Country),
      _ => None,
    }
  }

  /// Natural ordering of the field's own type: lexicographic for strings,
  /// chronological for dates, byte order for ids.
  fn compare(self, a: &PersonView, b: &PersonView) -> Ordering {
    match self {
      Self::Name => a.name.cmp(&b.name),
      Self::Id => a.id.cmp(&b.id),
      Self::DateOfBirth => a.date_of_birth.cmp(&b.date_of_birth),
      Self::Address => a.address.cmp(&b.address),
      Self::PhoneNumber => a.phone_number.cmp(&b.phone_number),
      Self::Country => a.country.cmp(&b.country),
    }
  }
}

/// Sort direction token, deserialised from the `orderOptions` query
/// parameter. Defaults to ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
pub enum SortDirection {
  #[default]
  #[serde(rename = "ASC")]
  Ascending,
  #[serde(rename = "DESC")]
  Descending,
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// Filter `records` down to those whose `field` contains `term` as a
/// case-insensitive substring, preserving input order.
///
/// An empty `field` or `term`, or an unrecognised selector, applies no
/// filter. Searching by `Id` is exact-match; a term that does not parse as a
/// UUID is a caller error ([`Error::InvalidIdTerm`]), never a silent
/// match-all.
pub fn search(
  records: &[PersonView],
  field: &str,
  term: &str,
) -> Result<Vec<PersonView>> {
  if field.is_empty() || term.is_empty() {
    return Ok(records.to_vec());
  }

  let Some(field) = SearchField::from_selector(field) else {
    return Ok(records.to_vec());
  };

  if field == SearchField::Id {
    let id = Uuid::parse_str(term)
      .map_err(|_| Error::InvalidIdTerm(term.to_string()))?;
    return Ok(records.iter().filter(|v| v.id == id).cloned().collect());
  }

  let needle = term.to_lowercase();
  Ok(
    records
      .iter()
      .filter(|v| field.render(v).to_lowercase().contains(&needle))
      .cloned()
      .collect(),
  )
}

// ─── Sort ────────────────────────────────────────────────────────────────────

/// Order `records` by `field` in the given direction.
///
/// An empty or unrecognised selector returns the input unchanged. The sort
/// is stable: equal keys keep their relative input order, so sorting is
/// idempotent and ties are deterministic.
pub fn sort(
  mut records: Vec<PersonView>,
  field: &str,
  direction: SortDirection,
) -> Vec<PersonView> {
  let Some(field) = SortField::from_selector(field) else {
    return records;
  };

  records.sort_by(|a, b| match direction {
    SortDirection::Ascending => field.compare(a, b),
    SortDirection::Descending => field.compare(b, a),
  });
  records
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn view(name: &str, country: &str) -> PersonView {
    PersonView {
      id:            Uuid::new_v4(),
      name:          name.into(),
      date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
      country_id:    Uuid::nil(),
      country:       country.into(),
      phone_number:  String::new(),
      address:       String::new(),
    }
  }

  fn sample() -> Vec<PersonView> {
    vec![view("Bob", "UK"), view("Amy", "US")]
  }

  // ── Search ──────────────────────────────────────────────────────────────

  #[test]
  fn search_empty_field_or_term_is_identity() {
    let records = sample();
    assert_eq!(search(&records, "", "am").unwrap(), records);
    assert_eq!(search(&records, "Name", "").unwrap(), records);
  }

  #[test]
  fn search_unknown_field_is_identity() {
    let records = sample();
    assert_eq!(search(&records, "ShoeSize", "42").unwrap(), records);
  }

  #[test]
  fn search_name_is_case_insensitive_substring() {
    let records = sample();
    let hits = search(&records, "Name", "am").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Amy");
  }

  #[test]
  fn search_preserves_input_order() {
    let mut records = sample();
    records.push(view("Amber", "UK"));
    let hits = search(&records, "Name", "am").unwrap();
    assert_eq!(
      hits.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
      ["Amy", "Amber"]
    );
  }

  #[test]
  fn search_date_of_birth_matches_rendered_date() {
    let mut records = sample();
    records[0].date_of_birth = NaiveDate::from_ymd_opt(1985, 6, 15).unwrap();
    let hits = search(&records, "DateOfBirth", "1985-06").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Bob");
  }

  #[test]
  fn search_id_is_exact_match() {
    let records = sample();
    let target = records[1].id;
    let hits = search(&records, "Id", &target.to_string()).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, target);
  }

  #[test]
  fn search_id_prefix_does_not_match() {
    let records = sample();
    let err = search(&records, "Id", "abcd").unwrap_err();
    assert!(matches!(err, Error::InvalidIdTerm(_)));
  }

  #[test]
  fn search_id_invalid_term_is_an_error_not_match_all() {
    let records = sample();
    let err = search(&records, "Id", "not-a-guid").unwrap_err();
    assert!(matches!(err, Error::InvalidIdTerm(_)));
  }

  // ── Sort ────────────────────────────────────────────────────────────────

  #[test]
  fn sort_empty_selector_is_identity() {
    let records = sample();
    assert_eq!(
      sort(records.clone(), "", SortDirection::Descending),
      records
    );
  }

  #[test]
  fn sort_unknown_selector_is_identity() {
    let records = sample();
    assert_eq!(
      sort(records.clone(), "Height", SortDirection::Ascending),
      records
    );
  }

  #[test]
  fn sort_name_ascending() {
    let sorted = sort(sample(), "Name", SortDirection::Ascending);
    assert_eq!(
      sorted.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
      ["Amy", "Bob"]
    );
  }

  #[test]
  fn sort_name_directions_are_reverses_without_duplicates() {
    let records = sample();
    let asc = sort(records.clone(), "Name", SortDirection::Ascending);
    let mut desc = sort(records, "Name", SortDirection::Descending);
    desc.reverse();
    assert_eq!(asc, desc);
  }

  #[test]
  fn sort_is_idempotent() {
    let once = sort(sample(), "DateOfBirth", SortDirection::Descending);
    let twice = sort(once.clone(), "DateOfBirth", SortDirection::Descending);
    assert_eq!(once, twice);
  }

  #[test]
  fn sort_is_stable_on_equal_keys() {
    // All sample records share a date of birth; order must not change.
    let records = sample();
    let sorted = sort(records.clone(), "DateOfBirth", SortDirection::Ascending);
    assert_eq!(sorted, records);
  }

  #[test]
  fn sort_phone_number_descending_uses_phone_number() {
    let mut records = sample();
    records[0].phone_number = "111".into(); // Bob
    records[0].address = "zzz".into();
    records[1].phone_number = "999".into(); // Amy
    records[1].address = "aaa".into();

    let sorted = sort(records, "PhoneNumber", SortDirection::Descending);
    assert_eq!(
      sorted.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
      ["Amy", "Bob"]
    );
  }

  #[test]
  fn sort_by_country() {
    let sorted = sort(sample(), "Country", SortDirection::Descending);
    assert_eq!(
      sorted.iter().map(|v| v.country.as_str()).collect::<Vec<_>>(),
      ["US", "UK"]
    );
  }
}
