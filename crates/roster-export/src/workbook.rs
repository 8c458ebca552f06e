//! Reading uploaded workbooks for bulk country import.
//!
//! Hand-written `quick-xml` pull parsing, the same approach used for the
//! writer side. Only what the import needs is implemented: locating the
//! first sheet through the workbook relationships, shared and inline
//! strings, and the values of column A.

use std::io::{Cursor, Read as _};

use quick_xml::events::Event;
use zip::{ZipArchive, result::ZipError};

use crate::{Error, Result};

/// Read the first sheet of an uploaded `.xlsx` workbook and return the
/// values of column A from row 2 down, blank cells skipped.
///
/// Row 1 is reserved for the column header by convention and is never
/// imported.
pub fn read_country_column(bytes: &[u8]) -> Result<Vec<String>> {
  let mut archive = ZipArchive::new(Cursor::new(bytes))?;

  let shared = match read_part(&mut archive, "xl/sharedStrings.xml")? {
    Some(xml) => parse_shared_strings(&xml)?,
    None => Vec::new(),
  };

  let workbook = read_part(&mut archive, "xl/workbook.xml")?
    .ok_or_else(|| Error::MalformedWorkbook("missing xl/workbook.xml".into()))?;
  let relationship_id = first_sheet_relationship(&workbook)?;

  let rels = read_part(&mut archive, "xl/_rels/workbook.xml.rels")?
    .ok_or_else(|| {
      Error::MalformedWorkbook("missing xl/_rels/workbook.xml.rels".into())
    })?;
  let sheet_path = sheet_target(&rels, &relationship_id)?;

  let sheet = read_part(&mut archive, &sheet_path)?.ok_or_else(|| {
    Error::MalformedWorkbook(format!("missing sheet part {sheet_path:?}"))
  })?;

  parse_column_a(&sheet, &shared)
}

/// Read one archive entry fully into memory. `None` if the part is absent.
fn read_part(
  archive: &mut ZipArchive<Cursor<&[u8]>>,
  name: &str,
) -> Result<Option<Vec<u8>>> {
  let mut file = match archive.by_name(name) {
    Ok(f) => f,
    Err(ZipError::FileNotFound) => return Ok(None),
    Err(e) => return Err(e.into()),
  };
  let mut out = Vec::new();
  file.read_to_end(&mut out)?;
  Ok(Some(out))
}

fn local_name(name: &[u8]) -> &[u8] {
  // strip "prefix:" if present
  if let Some(pos) = name.iter().rposition(|&b| b == b':') {
    &name[pos + 1..]
  } else {
    name
  }
}

/// Pull a named attribute (namespace prefix ignored) as a UTF-8 string.
fn attribute(
  element: &quick_xml::events::BytesStart<'_>,
  name: &[u8],
) -> Result<Option<String>> {
  for attr in element.attributes() {
    let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
    if local_name(attr.key.as_ref()) == name {
      let value = attr
        .unescape_value()
        .map_err(|e| Error::Xml(e.to_string()))?;
      return Ok(Some(value.into_owned()));
    }
  }
  Ok(None)
}

// ─── Workbook structure ──────────────────────────────────────────────────────

/// The `r:id` of the first `<sheet>` element in `xl/workbook.xml`.
fn first_sheet_relationship(xml: &[u8]) -> Result<String> {
  let mut reader = quick_xml::Reader::from_reader(xml);
  let mut buf = Vec::new();

  loop {
    match reader.read_event_into(&mut buf) {
      Ok(Event::Start(ref e) | Event::Empty(ref e))
        if local_name(e.name().as_ref()) == b"sheet" =>
      {
        return attribute(e, b"id")?.ok_or_else(|| {
          Error::MalformedWorkbook("sheet element has no relationship id".into())
        });
      }
      Ok(Event::Eof) => break,
      Err(e) => return Err(Error::Xml(e.to_string())),
      _ => {}
    }
    buf.clear();
  }

  Err(Error::MalformedWorkbook("workbook contains no sheets".into()))
}

/// Resolve a relationship id to an archive path via workbook.xml.rels.
fn sheet_target(xml: &[u8], relationship_id: &str) -> Result<String> {
  let mut reader = quick_xml::Reader::from_reader(xml);
  let mut buf = Vec::new();

  loop {
    match reader.read_event_into(&mut buf) {
      Ok(Event::Start(ref e) | Event::Empty(ref e))
        if local_name(e.name().as_ref()) == b"Relationship" =>
      {
        if attribute(e, b"Id")?.as_deref() == Some(relationship_id) {
          let target = attribute(e, b"Target")?.ok_or_else(|| {
            Error::MalformedWorkbook("relationship has no target".into())
          })?;
          // Targets are relative to xl/ unless they start from the root.
          return Ok(match target.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None => format!("xl/{target}"),
          });
        }
      }
      Ok(Event::Eof) => break,
      Err(e) => return Err(Error::Xml(e.to_string())),
      _ => {}
    }
    buf.clear();
  }

  Err(Error::MalformedWorkbook(format!(
    "no relationship with id {relationship_id:?}"
  )))
}

/// Parse `xl/sharedStrings.xml`: one entry per `<si>`, concatenating the
/// text of every `<t>` inside it (rich-text runs split a string across
/// several `<t>` elements).
fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>> {
  let mut reader = quick_xml::Reader::from_reader(xml);
  let mut buf = Vec::new();

  let mut strings = Vec::new();
  let mut current = String::new();
  let mut in_text = false;

  loop {
    match reader.read_event_into(&mut buf) {
      Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"t" => {
        in_text = true;
      }
      Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
        b"t" => in_text = false,
        b"si" => strings.push(std::mem::take(&mut current)),
        _ => {}
      },
      Ok(Event::Text(ref t)) if in_text => {
        current.push_str(
          &t.unescape().map_err(|e| Error::Xml(e.to_string()))?,
        );
      }
      Ok(Event::Eof) => break,
      Err(e) => return Err(Error::Xml(e.to_string())),
      _ => {}
    }
    buf.clear();
  }

  Ok(strings)
}

// ─── Sheet data ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct Cell {
  column:    u32,
  row:       u32,
  kind:      CellKind,
  raw_value: String,
}

#[derive(Default, PartialEq, Clone, Copy)]
enum CellKind {
  /// Number or plain value in `<v>`.
  #[default]
  Value,
  /// `<v>` holds an index into the shared-string table.
  Shared,
  /// Inline string: text lives under `<is><t>`.
  Inline,
}

/// Column A values from row 2 down, in row order, blanks skipped.
fn parse_column_a(xml: &[u8], shared: &[String]) -> Result<Vec<String>> {
  let mut reader = quick_xml::Reader::from_reader(xml);
  let mut buf = Vec::new();

  let mut values = Vec::new();
  let mut row: u32 = 0;
  let mut next_column: u32 = 0;
  let mut cell: Option<Cell> = None;
  let mut in_value = false;

  loop {
    match reader.read_event_into(&mut buf) {
      Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
        match local_name(e.name().as_ref()) {
          b"row" => {
            row = match attribute(e, b"r")? {
              Some(r) => r
                .parse()
                .map_err(|_| Error::Xml(format!("bad row reference {r:?}")))?,
              None => row + 1,
            };
            next_column = 0;
          }
          b"c" => {
            // Cells without an explicit reference take the next column.
            let column = match attribute(e, b"r")? {
              Some(reference) => parse_column_index(&reference)?,
              None => next_column,
            };
            next_column = column + 1;

            let kind = match attribute(e, b"t")?.as_deref() {
              Some("s") => CellKind::Shared,
              Some("inlineStr") => CellKind::Inline,
              _ => CellKind::Value,
            };
            cell = Some(Cell {
              column,
              row,
              kind,
              raw_value: String::new(),
            });
          }
          b"v" => in_value = true,
          b"t" => {
            if matches!(&cell, Some(c) if c.kind == CellKind::Inline) {
              in_value = true;
            }
          }
          _ => {}
        }
      }
      Ok(Event::Text(ref t)) if in_value => {
        if let Some(c) = cell.as_mut() {
          c.raw_value
            .push_str(&t.unescape().map_err(|e| Error::Xml(e.to_string()))?);
        }
      }
      Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
        b"v" | b"t" => in_value = false,
        b"c" => {
          if let Some(c) = cell.take() {
            if c.column == 0 && c.row >= 2 {
              if let Some(value) = resolve_cell(&c, shared)? {
                values.push(value);
              }
            }
          }
        }
        _ => {}
      },
      Ok(Event::Eof) => break,
      Err(e) => return Err(Error::Xml(e.to_string())),
      _ => {}
    }
    buf.clear();
  }

  Ok(values)
}

/// Zero-based column index from a cell reference like `A2` or `BC14`.
fn parse_column_index(reference: &str) -> Result<u32> {
  let letters: String = reference
    .chars()
    .take_while(|c| c.is_ascii_alphabetic())
    .collect();
  // Spreadsheet columns stop at XFD; anything longer is not a real
  // reference and would overflow the accumulator below.
  if letters.is_empty() || letters.len() > 3 {
    return Err(Error::Xml(format!("bad cell reference {reference:?}")));
  }

  let mut index: u32 = 0;
  for c in letters.chars() {
    index = index * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
  }
  Ok(index - 1)
}

fn resolve_cell(cell: &Cell, shared: &[String]) -> Result<Option<String>> {
  let text = match cell.kind {
    CellKind::Shared => {
      let index: usize = cell.raw_value.trim().parse().map_err(|_| {
        Error::Xml(format!("bad shared-string index {:?}", cell.raw_value))
      })?;
      shared
        .get(index)
        .ok_or_else(|| {
          Error::MalformedWorkbook(format!(
            "shared-string index {index} out of range"
          ))
        })?
        .clone()
    }
    CellKind::Value | CellKind::Inline => cell.raw_value.clone(),
  };

  let trimmed = text.trim();
  if trimmed.is_empty() {
    Ok(None)
  } else {
    Ok(Some(trimmed.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use zip::{ZipWriter, write::SimpleFileOptions};

  use super::*;

  /// Build a minimal workbook whose first sheet has `rows` in column A,
  /// using the shared-strings table (the shape Excel itself produces).
  fn shared_string_workbook(rows: &[&str]) -> Vec<u8> {
    let shared: String = rows
      .iter()
      .map(|r| format!("<si><t>{r}</t></si>"))
      .collect();
    let cells: String = rows
      .iter()
      .enumerate()
      .map(|(i, _)| {
        let row = i + 1;
        format!(r#"<row r="{row}"><c r="A{row}" t="s"><v>{i}</v></c></row>"#)
      })
      .collect();

    build_workbook(
      Some(&format!("<sst>{shared}</sst>")),
      &format!("<worksheet><sheetData>{cells}</sheetData></worksheet>"),
    )
  }

  fn build_workbook(shared_strings: Option<&str>, sheet: &str) -> Vec<u8> {
    let mut archive = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    archive.start_file("xl/workbook.xml", options).unwrap();
    archive
      .write_all(
        br#"<workbook><sheets><sheet name="S1" sheetId="1" r:id="rId9"/></sheets></workbook>"#,
      )
      .unwrap();

    archive
      .start_file("xl/_rels/workbook.xml.rels", options)
      .unwrap();
    archive
      .write_all(
        br#"<Relationships><Relationship Id="rId9" Type="w" Target="worksheets/data.xml"/></Relationships>"#,
      )
      .unwrap();

    if let Some(sst) = shared_strings {
      archive.start_file("xl/sharedStrings.xml", options).unwrap();
      archive.write_all(sst.as_bytes()).unwrap();
    }

    archive
      .start_file("xl/worksheets/data.xml", options)
      .unwrap();
    archive.write_all(sheet.as_bytes()).unwrap();

    archive.finish().unwrap().into_inner()
  }

  #[test]
  fn reads_column_a_from_row_two_with_shared_strings() {
    let bytes =
      shared_string_workbook(&["Country", "UK", "USA", "  ", "India"]);
    let names = read_country_column(&bytes).unwrap();
    assert_eq!(names, ["UK", "USA", "India"]);
  }

  #[test]
  fn reads_inline_strings_and_skips_other_columns() {
    let sheet = r#"<worksheet><sheetData>
      <row r="1"><c r="A1" t="inlineStr"><is><t>Country</t></is></c></row>
      <row r="2"><c r="A2" t="inlineStr"><is><t>Japan</t></is></c><c r="B2" t="inlineStr"><is><t>ignored</t></is></c></row>
      <row r="3"><c r="B3" t="inlineStr"><is><t>ignored</t></is></c></row>
      <row r="4"><c r="A4" t="inlineStr"><is><t>Chile</t></is></c></row>
    </sheetData></worksheet>"#;
    let bytes = build_workbook(None, sheet);
    assert_eq!(read_country_column(&bytes).unwrap(), ["Japan", "Chile"]);
  }

  #[test]
  fn cells_without_references_fall_back_to_position() {
    let sheet = r#"<worksheet><sheetData>
      <row><c t="inlineStr"><is><t>Country</t></is></c></row>
      <row><c t="inlineStr"><is><t>Kenya</t></is></c><c t="inlineStr"><is><t>ignored</t></is></c></row>
    </sheetData></worksheet>"#;
    let bytes = build_workbook(None, sheet);
    assert_eq!(read_country_column(&bytes).unwrap(), ["Kenya"]);
  }

  #[test]
  fn oversized_cell_reference_is_an_error_not_a_panic() {
    let sheet = r#"<worksheet><sheetData>
      <row r="2"><c r="AAAAAAAAAA2" t="inlineStr"><is><t>x</t></is></c></row>
    </sheetData></worksheet>"#;
    let bytes = build_workbook(None, sheet);

    let err = read_country_column(&bytes).unwrap_err();
    assert!(matches!(err, Error::Xml(_)));
  }

  #[test]
  fn not_a_zip_is_a_container_error() {
    let err = read_country_column(b"this is not a workbook").unwrap_err();
    assert!(matches!(err, Error::Zip(_)));
  }

  #[test]
  fn workbook_without_sheets_is_malformed() {
    let mut archive = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    archive.start_file("xl/workbook.xml", options).unwrap();
    archive
      .write_all(b"<workbook><sheets/></workbook>")
      .unwrap();
    let bytes = archive.finish().unwrap().into_inner();

    let err = read_country_column(&bytes).unwrap_err();
    assert!(matches!(err, Error::MalformedWorkbook(_)));
  }

  #[test]
  fn round_trips_the_export_writer() {
    use chrono::NaiveDate;
    use roster_core::person::PersonView;
    use uuid::Uuid;

    // Column A of an exported sheet is the person name.
    let records: Vec<PersonView> = ["Amy", "Bob"]
      .into_iter()
      .map(|name| PersonView {
        id:            Uuid::new_v4(),
        name:          name.into(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        country_id:    Uuid::nil(),
        country:       "UK".into(),
        phone_number:  String::new(),
        address:       String::new(),
      })
      .collect();

    let bytes = crate::persons_xlsx(&records).unwrap();
    assert_eq!(read_country_column(&bytes).unwrap(), ["Amy", "Bob"]);
  }
}
