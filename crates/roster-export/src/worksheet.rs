//! XLSX export — a single-sheet Office Open XML workbook.
//!
//! The container is a plain zip archive; the sheet XML is generated with
//! `quick-xml`'s writer API. All cells are inline strings, so no
//! `sharedStrings.xml` part is needed.

use std::io::{Cursor, Write as _};

use quick_xml::{
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use roster_core::person::PersonView;
use zip::{ZipWriter, write::SimpleFileOptions};

use crate::Result;

/// Sheet name shown in the workbook's tab bar.
pub const SHEET_NAME: &str = "PersonsSheet";

const HEADER: [&str; 5] =
  ["Person Name", "Phone Number", "Date of Birth", "Country", "Address"];

const COLUMNS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

// Static package parts. Only the worksheet itself varies per export.

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

/// Serialize `records` as a valid `.xlsx` workbook with one sheet: a header
/// row, then one row per record in input order, dates rendered `YYYY-MM-DD`.
/// Column widths are sized to the widest cell in each column.
pub fn persons_xlsx(records: &[PersonView]) -> Result<Vec<u8>> {
  let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
  let options = SimpleFileOptions::default();

  archive.start_file("[Content_Types].xml", options)?;
  archive.write_all(CONTENT_TYPES.as_bytes())?;

  archive.start_file("_rels/.rels", options)?;
  archive.write_all(ROOT_RELS.as_bytes())?;

  archive.start_file("xl/workbook.xml", options)?;
  archive.write_all(workbook_xml().as_bytes())?;

  archive.start_file("xl/_rels/workbook.xml.rels", options)?;
  archive.write_all(WORKBOOK_RELS.as_bytes())?;

  archive.start_file("xl/worksheets/sheet1.xml", options)?;
  archive.write_all(&sheet_xml(records))?;

  Ok(archive.finish()?.into_inner())
}

fn workbook_xml() -> String {
  format!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{SHEET_NAME}" sheetId="1" r:id="rId1"/></sheets></workbook>"#
  )
}

/// The textual cell values for one record, in column order.
fn row_values(view: &PersonView) -> [String; 5] {
  [
    view.name.clone(),
    view.phone_number.clone(),
    view.date_of_birth.format("%Y-%m-%d").to_string(),
    view.country.clone(),
    view.address.clone(),
  ]
}

/// Width of each column: the widest cell (header included), in characters,
/// plus a little padding. Stands in for a renderer's auto-fit.
fn column_widths(records: &[PersonView]) -> [usize; 5] {
  let mut widths = HEADER.map(str::len);
  for view in records {
    for (w, value) in widths.iter_mut().zip(row_values(view)) {
      *w = (*w).max(value.chars().count());
    }
  }
  widths.map(|w| w + 2)
}

fn sheet_xml(records: &[PersonView]) -> Vec<u8> {
  let mut writer = Writer::new(Cursor::new(Vec::new()));

  // Writes to an in-memory cursor cannot fail.
  writer
    .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    .unwrap();

  let mut worksheet = BytesStart::new("worksheet");
  worksheet.push_attribute((
    "xmlns",
    "http://schemas.openxmlformats.org/spreadsheetml/2006/main",
  ));
  writer.write_event(Event::Start(worksheet)).unwrap();

  write_cols(&mut writer, &column_widths(records));

  writer
    .write_event(Event::Start(BytesStart::new("sheetData")))
    .unwrap();

  write_row(&mut writer, 1, &HEADER.map(String::from));
  for (i, view) in records.iter().enumerate() {
    write_row(&mut writer, i + 2, &row_values(view));
  }

  writer
    .write_event(Event::End(BytesEnd::new("sheetData")))
    .unwrap();
  writer
    .write_event(Event::End(BytesEnd::new("worksheet")))
    .unwrap();

  writer.into_inner().into_inner()
}

fn write_cols(writer: &mut Writer<Cursor<Vec<u8>>>, widths: &[usize; 5]) {
  writer
    .write_event(Event::Start(BytesStart::new("cols")))
    .unwrap();
  for (i, width) in widths.iter().enumerate() {
    let idx = (i + 1).to_string();
    let mut col = BytesStart::new("col");
    col.push_attribute(("min", idx.as_str()));
    col.push_attribute(("max", idx.as_str()));
    col.push_attribute(("width", width.to_string().as_str()));
    col.push_attribute(("customWidth", "1"));
    writer.write_event(Event::Empty(col)).unwrap();
  }
  writer
    .write_event(Event::End(BytesEnd::new("cols")))
    .unwrap();
}

fn write_row(
  writer: &mut Writer<Cursor<Vec<u8>>>,
  row_number: usize,
  values: &[String; 5],
) {
  let mut row = BytesStart::new("row");
  row.push_attribute(("r", row_number.to_string().as_str()));
  writer.write_event(Event::Start(row)).unwrap();

  for (column, value) in COLUMNS.iter().zip(values) {
    let reference = format!("{column}{row_number}");
    let mut cell = BytesStart::new("c");
    cell.push_attribute(("r", reference.as_str()));
    cell.push_attribute(("t", "inlineStr"));
    writer.write_event(Event::Start(cell)).unwrap();
    writer
      .write_event(Event::Start(BytesStart::new("is")))
      .unwrap();
    writer
      .write_event(Event::Start(BytesStart::new("t")))
      .unwrap();
    writer.write_event(Event::Text(BytesText::new(value))).unwrap();
    writer.write_event(Event::End(BytesEnd::new("t"))).unwrap();
    writer.write_event(Event::End(BytesEnd::new("is"))).unwrap();
    writer.write_event(Event::End(BytesEnd::new("c"))).unwrap();
  }

  writer
    .write_event(Event::End(BytesEnd::new("row")))
    .unwrap();
}
