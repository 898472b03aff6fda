//! Conversions between a calendar date and its two text forms.
//!
//! The ISO form (`yyyy-mm-dd`) is what date pickers submit and what the store
//! keeps. The display form (`dd/mm/yyyy`) is what people type and read. Both
//! parsers are strict: a string that does not name a real calendar day is
//! rejected rather than guessed at.

use chrono::NaiveDate;

use crate::error::ValidationError;

const ISO: &str = "%Y-%m-%d";
const DISPLAY: &str = "%d/%m/%Y";

pub fn to_iso(date: NaiveDate) -> String { date.format(ISO).to_string() }

pub fn to_display(date: NaiveDate) -> String {
  date.format(DISPLAY).to_string()
}

pub fn from_iso(s: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), ISO).ok()
}

pub fn from_display(s: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), DISPLAY).ok()
}

/// Parse the `applied_date` form field. Empty input means "no date".
pub fn parse_input(s: &str) -> Result<Option<NaiveDate>, ValidationError> {
  let s = s.trim();
  if s.is_empty() {
    return Ok(None);
  }
  from_iso(s).or_else(|| from_display(s)).map(Some).ok_or_else(|| {
    ValidationError::new(
      "applied_date",
      format!("{s:?} is not a date (expected yyyy-mm-dd or dd/mm/yyyy)"),
    )
  })
}
