//! CSV export — two columns, `Name` and `Country`.

use csv::Writer;
use roster_core::person::PersonView;

use crate::Result;

/// Serialize `records` as RFC 4180 CSV: a header row, then one row per
/// record in input order. Only strings are written, so the output is
/// locale-invariant by construction.
pub fn persons_csv(records: &[PersonView]) -> Result<Vec<u8>> {
  let mut writer = Writer::from_writer(Vec::new());

  writer.write_record(["Name", "Country"])?;
  for view in records {
    writer.write_record([view.name.as_str(), view.country.as_str()])?;
  }

  writer
    .into_inner()
    .map_err(|e| crate::Error::Io(e.into_error()))
}
