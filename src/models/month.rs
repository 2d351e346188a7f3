//! Calendar months and grid columns
//!
//! The budget grid has one column per calendar month plus a synthetic
//! thirteenth column holding the year total.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month, always within 1..=12
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

impl Month {
    pub const JANUARY: Month = Month(1);
    pub const DECEMBER: Month = Month(12);

    /// Create a month from its calendar number (1 = January)
    pub fn new(number: u8) -> Option<Self> {
        (1..=12).contains(&number).then_some(Self(number))
    }

    /// The calendar number, 1..=12
    pub const fn number(&self) -> u8 {
        self.0
    }

    /// Zero-based position for indexing per-month arrays
    pub const fn index(&self) -> usize {
        self.0 as usize - 1
    }

    pub fn prev(&self) -> Option<Self> {
        Self::new(self.0 - 1)
    }

    pub fn next(&self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    /// Short display name ("Jan")
    pub fn short_name(&self) -> &'static str {
        NAMES[self.index()]
    }

    /// All twelve months in calendar order
    pub fn all() -> impl Iterator<Item = Month> {
        (1..=12).map(Month)
    }

    /// Months from `self` through December
    pub fn through_year_end(&self) -> impl Iterator<Item = Month> {
        (self.0..=12).map(Month)
    }

    /// Months from January up to, but excluding, `self`
    pub fn before(&self) -> impl Iterator<Item = Month> {
        (1..self.0).map(Month)
    }
}

impl TryFrom<u8> for Month {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Month::new(value).ok_or_else(|| format!("month out of range: {}", value))
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> u8 {
        month.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl FromStr for Month {
    type Err = String;

    /// Accepts a month number ("3") or a name prefix ("mar", "March")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(number) = s.parse::<u8>() {
            return Month::try_from(number);
        }
        if s.len() >= 3 {
            let lower = s.to_lowercase();
            if let Some(pos) = NAMES
                .iter()
                .position(|name| lower.starts_with(&name.to_lowercase()))
            {
                return Ok(Month(pos as u8 + 1));
            }
        }
        Err(format!("not a month: '{}'", s))
    }
}

/// A value column of the budget grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Month(Month),
    /// The year-total column
    Total,
}

impl Column {
    /// Grid column number: 1..=12 for months, 13 for the total
    pub fn number(&self) -> u8 {
        match self {
            Column::Month(month) => month.number(),
            Column::Total => 13,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            13 => Some(Column::Total),
            n => Month::new(n).map(Column::Month),
        }
    }

    pub fn month(&self) -> Option<Month> {
        match self {
            Column::Month(month) => Some(*month),
            Column::Total => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Month(month) => write!(f, "{}", month),
            Column::Total => write!(f, "Total"),
        }
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("total") || trimmed == "13" {
            return Ok(Column::Total);
        }
        trimmed.parse::<Month>().map(Column::Month)
    }
}
