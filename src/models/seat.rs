use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Seat position as shown to the visitor: row letters followed by a
/// 1-based column, e.g. `C7`.
///
/// Rows are zero-based internally. Row 0 is `A`, row 25 is `Z`, row 26 is
/// `AA`, so labels stay unique for any hall size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatLabel {
    row: u32,
    column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid seat label {0:?}")]
pub struct InvalidSeatLabel(pub String);

impl SeatLabel {
    /// Returns `None` for column 0; columns are 1-based.
    pub fn new(row: u32, column: u32) -> Option<Self> {
        (column > 0).then_some(Self { row, column })
    }

    /// Label of the seat at zero-based `index` in a hall `row_width` seats wide.
    pub fn from_index(index: u32, row_width: u32) -> Self {
        let width = row_width.max(1);
        Self {
            row: index / width,
            column: index % width + 1,
        }
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn column(&self) -> u32 {
        self.column
    }
}

/// Letters for a zero-based row index, spreadsheet style.
pub fn row_name(row: u32) -> String {
    let mut n = row as u64 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn row_index(letters: &str) -> Option<u32> {
    let mut n: u64 = 0;
    for b in letters.bytes() {
        n = n.checked_mul(26)?.checked_add(u64::from(b - b'A') + 1)?;
    }
    u32::try_from(n.checked_sub(1)?).ok()
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", row_name(self.row), self.column)
    }
}

impl FromStr for SeatLabel {
    type Err = InvalidSeatLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidSeatLabel(s.to_string());
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_uppercase())
            .ok_or_else(invalid)?;
        let (letters, digits) = trimmed.split_at(split);
        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let row = row_index(letters).ok_or_else(invalid)?;
        let column: u32 = digits.parse().map_err(|_| invalid())?;
        SeatLabel::new(row, column).ok_or_else(invalid)
    }
}

impl TryFrom<String> for SeatLabel {
    type Error = InvalidSeatLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatLabel> for String {
    fn from(label: SeatLabel) -> Self {
        label.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Selected,
    Booked,
}
