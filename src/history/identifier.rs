use std::cmp::Ordering;
use std::fmt;

use chrono::{Duration, NaiveDate};

use crate::error::HistoryError;
use crate::history::source::ARCHIVE_EXTENSION;

pub const IDENTIFIER_LEN: usize = 6;
pub const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y";
pub const SHORT_DATE_FORMAT: &str = "%d/%m/%Y";

/// A `DDMMYY` snapshot code such as `030825`.
///
/// Components are kept exactly as written; `date()` is the normalized calendar
/// date, so `310625` (June has 30 days) lands on July 1, 2025.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotIdentifier {
    code: String,
    day: u32,
    month: u32,
    year: i32,
    date: NaiveDate,
}

fn two_digits(code: &str, range: std::ops::Range<usize>) -> Result<u32, HistoryError> {
    let part = &code[range];
    part.parse::<u32>()
        .map_err(|_| HistoryError::invalid_identifier(code, format!("`{part}` is not a number")))
}

/// Builds a date the way calendar arithmetic rolls over: months past 12 carry
/// into the year, days past the month end carry into the next month, and `00`
/// steps back one unit.
fn normalized_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let months = year * 12 + month as i32 - 1;
    let first = NaiveDate::from_ymd_opt(months.div_euclid(12), months.rem_euclid(12) as u32 + 1, 1)?;
    first.checked_add_signed(Duration::days(i64::from(day) - 1))
}

impl SnapshotIdentifier {
    pub fn parse(code: &str) -> Result<Self, HistoryError> {
        if code.len() != IDENTIFIER_LEN {
            return Err(HistoryError::invalid_identifier(
                code,
                format!("expected {IDENTIFIER_LEN} characters, found {}", code.chars().count()),
            ));
        }
        if !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HistoryError::invalid_identifier(
                code,
                "expected only digits (DDMMYY)",
            ));
        }

        let day = two_digits(code, 0..2)?;
        let month = two_digits(code, 2..4)?;
        let year = 2000 + two_digits(code, 4..6)? as i32;
        let date = normalized_date(year, month, day)
            .ok_or_else(|| HistoryError::invalid_identifier(code, "date out of range"))?;

        Ok(Self {
            code: code.to_string(),
            day,
            month,
            year,
            date,
        })
    }

    /// Parses an archived file name such as `030825.md`.
    pub fn from_file_name(name: &str) -> Result<Self, HistoryError> {
        let stem = name
            .strip_suffix(ARCHIVE_EXTENSION)
            .ok_or_else(|| HistoryError::invalid_identifier(name, "expected a `.md` file"))?;
        Self::parse(stem)
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Long form, e.g. `August 3, 2025`.
    pub fn display_date(&self) -> String {
        self.date.format(DISPLAY_DATE_FORMAT).to_string()
    }

    /// `DD/MM/YYYY`, e.g. `03/08/2025`.
    pub fn short_date(&self) -> String {
        self.date.format(SHORT_DATE_FORMAT).to_string()
    }
}

impl Ord for SnapshotIdentifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.code.cmp(&other.code))
    }
}

impl PartialOrd for SnapshotIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SnapshotIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
