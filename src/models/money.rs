//! Money type for representing currency amounts
//!
//! Internally stores amounts in minor units (hundredths, i64) to avoid
//! floating-point drift across repeated deposits and withdrawals. On disk the
//! amount is a plain JSON number in major units, which is the format the
//! ledger file has always used.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Currency symbols stripped from the front of user input before parsing
const ACCEPTED_SYMBOLS: [char; 2] = ['₹', '$'];

/// Largest magnitude, in minor units, that any balance or amount may reach
///
/// Amounts are written to disk as JSON numbers in major units. Up to this
/// bound a fractional amount read back as an f64 still rounds to the exact
/// number of hundredths that was written.
pub const MAX_CENTS: i64 = 1_000_000_000_000_000;

/// Represents a monetary amount stored as hundredths of the currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use bank_ledger::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the minor units portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Add two amounts, returning `None` when the result passes [`MAX_CENTS`]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).and_then(Self::within_bounds)
    }

    /// Subtract two amounts, returning `None` when the result passes [`MAX_CENTS`]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).and_then(Self::within_bounds)
    }

    fn within_bounds(cents: i64) -> Option<Self> {
        (cents.abs() <= MAX_CENTS).then_some(Self(cents))
    }

    /// Convert a major-unit float (as stored on disk) into Money
    ///
    /// Rounds to the nearest hundredth. Returns `None` for NaN, infinities,
    /// and values outside the representable range.
    pub fn from_major(value: f64) -> Option<Self> {
        let scaled = (value * 100.0).round();
        if !scaled.is_finite() || scaled.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Self(scaled as i64))
    }

    /// Convert a JSON number in major units into Money
    ///
    /// Integers are scaled exactly; only fractional values go through f64.
    pub fn from_json_number(number: &serde_json::Number) -> Option<Self> {
        if let Some(units) = number.as_i64() {
            return units.checked_mul(100).map(Self);
        }
        if number.is_u64() {
            return None;
        }
        number.as_f64().and_then(Self::from_major)
    }

    /// The amount in major units as a float
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Parse a money amount typed by a user
    ///
    /// Accepts "500", "500.5", "500.50", "₹500", "$500" and a leading minus
    /// sign. At most two fractional digits are allowed.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let (negative, rest) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };
        let rest = rest.trim_start_matches(&ACCEPTED_SYMBOLS[..]).trim_start();

        let (whole, frac) = rest.split_once('.').unwrap_or((rest, ""));
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }
        if frac.len() > 2 {
            return Err(MoneyParseError::TooManyDecimals(s.to_string()));
        }

        // Only digits remain, so a failed parse here means the value overflowed.
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| MoneyParseError::Overflow(s.to_string()))?
        };
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().unwrap_or(0) * 10,
            _ => frac.parse().unwrap_or(0),
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .filter(|c| *c <= MAX_CENTS)
            .ok_or_else(|| MoneyParseError::Overflow(s.to_string()))?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.units().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.units(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol(""))
    }
}

// Whole amounts are written as integers so existing files keep their shape.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.cents_part() == 0 {
            serializer.serialize_i64(self.units())
        } else {
            serializer.serialize_f64(self.to_major())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let number = serde_json::Number::deserialize(deserializer)?;
        Money::from_json_number(&number)
            .ok_or_else(|| D::Error::custom(format!("amount out of range: {}", number)))
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
    Empty,
    InvalidFormat(String),
    TooManyDecimals(String),
    Overflow(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::Empty => write!(f, "no amount entered"),
            MoneyParseError::InvalidFormat(s) => write!(f, "not a number: {}", s),
            MoneyParseError::TooManyDecimals(s) => {
                write!(f, "at most two decimal places are allowed: {}", s)
            }
            MoneyParseError::Overflow(s) => write!(f, "amount too large: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
