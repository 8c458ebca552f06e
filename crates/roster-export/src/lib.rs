//! Tabular export of person views, and the workbook reader used by bulk
//! country import.
//!
//! Every function here is a pure transformation of an in-memory sequence
//! into an in-memory buffer (or back); nothing queries the store. Callers
//! supply records already fetched, filtered, and sorted.

pub mod error;

mod csv;
mod workbook;
mod worksheet;

pub use error::{Error, Result};
pub use self::csv::persons_csv;
pub use workbook::read_country_column;
pub use worksheet::persons_xlsx;
