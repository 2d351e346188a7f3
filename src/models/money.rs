//! Money type for budget amounts
//!
//! Amounts are stored as signed minor currency units (i64) to avoid
//! floating-point drift. Text entered in a grid cell is turned into minor
//! units exactly once, by [`Money::parse_with`]; everything past that point
//! only ever sees integers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// How amounts are written and read for one currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// Symbol shown before the amount, e.g. "$"
    pub symbol: String,
    /// Number of minor-unit digits (2 for cents, 0 for yen)
    pub decimal_places: u32,
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>, decimal_places: u32) -> Self {
        Self {
            symbol: symbol.into(),
            decimal_places,
        }
    }

    fn scale(&self) -> i64 {
        10_i64.pow(self.decimal_places)
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::new("$", 2)
    }
}

/// A monetary amount in minor currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest magnitude, in minor units, accepted from cell text.
    ///
    /// Twelve months of it across several hundred rows still fit in an `i64`;
    /// the tree refuses any write that would overflow a total regardless.
    pub const MAX_PARSED_UNITS: i64 = 1_000_000_000_000_000;

    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use budget_grid::models::Money;
    /// let amount = Money::from_minor(1050); // 10.50
    /// assert_eq!(amount.minor_units(), 1050);
    /// ```
    pub const fn from_minor(units: i64) -> Self {
        Self(units)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Split evenly into twelve parts, rounding each part toward negative
    /// infinity; the twelfth part absorbs the remainder so the parts always
    /// add back up to `self`.
    pub fn split_twelve(&self) -> ([Money; 11], Money) {
        let per_month = self.0.div_euclid(12);
        let last = self.0 - per_month * 11;
        ([Money(per_month); 11], Money(last))
    }

    /// Parse cell text using the default currency format
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        Self::parse_with(s, &CurrencyFormat::default())
    }

    /// Parse cell text into minor units
    ///
    /// The currency symbol may lead or trail and a single `-` may lead or
    /// trail. Either `.` or `,` is accepted as the decimal separator, but
    /// only when it is followed by no more than `decimal_places` digits;
    /// otherwise every `.`/`,` is treated as a digit-group separator, and
    /// groups after the first must hold exactly three digits. "1,234.5" and
    /// "1.234,50" are both 123450 cents, "1,234" is 123400. Any other
    /// character, or a magnitude above [`Money::MAX_PARSED_UNITS`], is
    /// rejected.
    pub fn parse_with(s: &str, format: &CurrencyFormat) -> Result<Self, MoneyParseError> {
        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let mut text = s.trim();
        let mut negative = false;
        if let Some(rest) = text.strip_prefix('-') {
            negative = true;
            text = rest.trim_start();
        }
        if !format.symbol.is_empty() {
            text = text.strip_prefix(format.symbol.as_str()).unwrap_or(text).trim();
            text = text.strip_suffix(format.symbol.as_str()).unwrap_or(text).trim();
        }
        if !negative {
            if let Some(rest) = text.strip_prefix('-').or_else(|| text.strip_suffix('-')) {
                negative = true;
                text = rest.trim();
            }
        }

        if !text
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == ',')
        {
            return Err(invalid());
        }

        let places = format.decimal_places as usize;
        let (whole, fraction) = match text.rfind(['.', ',']) {
            Some(pos) if places > 0 && text.len() - pos - 1 <= places => {
                let separator = &text[pos..=pos];
                if text[..pos].contains(separator) {
                    return Err(invalid());
                }
                (&text[..pos], &text[pos + 1..])
            }
            _ => (text, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        let whole_digits = ungroup(whole).ok_or_else(invalid)?;

        let mut units: i64 = 0;
        for c in whole_digits.chars().chain(fraction.chars()) {
            let digit = c.to_digit(10).ok_or_else(invalid)?;
            units = units
                .checked_mul(10)
                .and_then(|u| u.checked_add(i64::from(digit)))
                .ok_or_else(invalid)?;
        }
        for _ in fraction.len()..places {
            units = units.checked_mul(10).ok_or_else(invalid)?;
        }
        if units > Self::MAX_PARSED_UNITS {
            return Err(MoneyParseError::TooLarge(s.trim().to_string()));
        }

        Ok(Self(if negative { -units } else { units }))
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Format with the given currency symbol and number of decimal places
    pub fn format_with(&self, format: &CurrencyFormat) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        if format.decimal_places == 0 {
            return format!("{}{}{}", sign, format.symbol, abs);
        }
        let scale = format.scale().unsigned_abs();
        format!(
            "{}{}{}.{:0width$}",
            sign,
            format.symbol,
            abs / scale,
            abs % scale,
            width = format.decimal_places as usize
        )
    }
}

/// Strip group separators from the integer part.
///
/// All separators must be the same character, the first group holds one to
/// three digits and every later group exactly three.
fn ungroup(whole: &str) -> Option<String> {
    let Some(separator) = whole.chars().find(|c| !c.is_ascii_digit()) else {
        return Some(whole.to_string());
    };
    let mut groups = whole.split(separator);
    let first = groups.next()?;
    if first.is_empty() || first.len() > 3 {
        return None;
    }
    let mut digits = first.to_string();
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.push_str(group);
    }
    digits.chars().all(|c| c.is_ascii_digit()).then_some(digits)
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with(&CurrencyFormat::default()))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    TooLarge(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid amount: '{}'", s),
            MoneyParseError::TooLarge(s) => write!(f, "Amount too large: '{}'", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1050).to_string(), "$10.50");
        assert_eq!(Money::from_minor(0).to_string(), "$0.00");
        assert_eq!(Money::from_minor(-1050).to_string(), "-$10.50");
        assert_eq!(Money::from_minor(5).to_string(), "$0.05");
    }

    #[test]
    fn test_format_with() {
        let yen = CurrencyFormat::new("¥", 0);
        assert_eq!(Money::from_minor(1500).format_with(&yen), "¥1500");

        let euro = CurrencyFormat::new("", 2);
        assert_eq!(Money::from_minor(-7).format_with(&euro), "-0.07");

        let dinar = CurrencyFormat::new("", 3);
        assert_eq!(Money::from_minor(12345).format_with(&dinar), "12.345");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().minor_units(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().minor_units(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().minor_units(), -1050);
        assert_eq!(Money::parse("-$10.50").unwrap().minor_units(), -1050);
        assert_eq!(Money::parse("10").unwrap().minor_units(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().minor_units(), 1050);
        assert_eq!(Money::parse("0.05").unwrap().minor_units(), 5);
        assert_eq!(Money::parse(".5").unwrap().minor_units(), 50);
        assert_eq!(Money::parse("10.").unwrap().minor_units(), 1000);
    }

    #[test]
    fn test_parse_separators() {
        assert_eq!(Money::parse("1,234.5").unwrap().minor_units(), 123450);
        assert_eq!(Money::parse("1.234,50").unwrap().minor_units(), 123450);
        assert_eq!(Money::parse("1,234").unwrap().minor_units(), 123400);
        assert_eq!(Money::parse("12,5").unwrap().minor_units(), 1250);
    }

    #[test]
    fn test_parse_suffix_symbol() {
        let format = CurrencyFormat::new("€", 2);
        assert_eq!(
            Money::parse_with("12,00€", &format).unwrap().minor_units(),
            1200
        );
        assert_eq!(
            Money::parse_with(" -3,5 € ", &format).unwrap().minor_units(),
            -350
        );
    }

    #[test]
    fn test_parse_zero_decimal_places() {
        let format = CurrencyFormat::new("¥", 0);
        assert_eq!(
            Money::parse_with("1,500", &format).unwrap().minor_units(),
            1500
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("-").is_err());
        assert!(Money::parse("99999999999999999999").is_err());
        assert!(Money::parse("12abc").is_err());
        assert!(Money::parse("1-2").is_err());
        assert!(Money::parse("1e5").is_err());
        assert!(Money::parse("12 apples 3").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("1,2,3").is_err());
        assert!(Money::parse("--5").is_err());
        assert!(Money::parse("1,23,456").is_err());
        assert!(Money::parse("1,234.567,5").is_err());
        assert!(Money::parse(".").is_err());
    }

    #[test]
    fn test_parse_grouped_and_signed() {
        assert_eq!(Money::parse("1.234.567").unwrap().minor_units(), 123456700);
        assert_eq!(Money::parse("$-10").unwrap().minor_units(), -1000);
        assert_eq!(Money::parse("10-").unwrap().minor_units(), -1000);
        assert_eq!(Money::parse(" 1,234,567.89 ").unwrap().minor_units(), 123456789);
    }

    #[test]
    fn test_parse_caps_magnitude() {
        assert_eq!(
            Money::parse("90000000000000000"),
            Err(MoneyParseError::TooLarge("90000000000000000".to_string()))
        );
        let max = Money::MAX_PARSED_UNITS / 100;
        assert_eq!(
            Money::parse(&max.to_string()).unwrap().minor_units(),
            Money::MAX_PARSED_UNITS
        );
        assert!(Money::parse(&format!("-{}", max + 1)).is_err());
    }

    #[test]
    fn test_checked_arithmetic() {
        let big = Money::from_minor(i64::MAX);
        assert!(big.checked_add(Money::from_minor(1)).is_none());
        assert_eq!(
            Money::from_minor(5).checked_sub(Money::from_minor(7)),
            Some(Money::from_minor(-2))
        );
    }

    #[test]
    fn test_split_twelve() {
        let (months, december) = Money::from_minor(1000).split_twelve();
        assert!(months.iter().all(|m| m.minor_units() == 83));
        assert_eq!(december.minor_units(), 87);

        let (months, december) = Money::from_minor(-1000).split_twelve();
        assert!(months.iter().all(|m| m.minor_units() == -84));
        assert_eq!(december.minor_units(), -76);
        let total: Money = months.iter().copied().sum::<Money>() + december;
        assert_eq!(total.minor_units(), -1000);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor_units(), 1500);
        assert_eq!((a - b).minor_units(), 500);
        assert_eq!((-a).minor_units(), -1000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.minor_units(), 2000);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_minor(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
