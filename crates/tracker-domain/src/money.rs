use std::{
    fmt,
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

use crate::DomainError;

/// Currency amount stored as integer cents.
///
/// Totals are sums of `Money`, so they always match the records exactly and
/// survive a write/read cycle through the data file without drift.
///
/// ```rust
/// use tracker_domain::Money;
///
/// let amount: Money = "45.5".parse().unwrap();
/// assert_eq!(amount.cents(), 4550);
/// assert_eq!(amount.to_string(), "45.50");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Lossy view used only for percentage shares.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// `None` once the running total leaves the `i64` cent range.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |total, amount| total.checked_add(amount))
    }

    /// Like `parse`, but rounds anything past the second decimal half away
    /// from zero instead of rejecting it. Data files written by older tools
    /// store amounts as typed, e.g. `12.345`.
    pub fn parse_rounded(s: &str) -> Result<Money, DomainError> {
        parse_amount(s, ExtraDigits::Round)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl FromStr for Money {
    type Err = DomainError;

    /// Accepts an optional sign, whole units, and up to two fractional digits
    /// separated by `.` or `,`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_amount(s, ExtraDigits::Reject)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ExtraDigits {
    Reject,
    Round,
}

fn parse_amount(s: &str, extra: ExtraDigits) -> Result<Money, DomainError> {
    let invalid = || DomainError::InvalidAmount(format!("`{}` is not a number", s.trim()));
    let too_large = || DomainError::InvalidAmount("amount is too large".into());

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidAmount("amount is empty".into()));
    }

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let normalized = digits.replace(',', ".");
    let (units_str, fraction_str) = match normalized.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (normalized.as_str(), ""),
    };

    if units_str.is_empty() && fraction_str.is_empty() {
        return Err(invalid());
    }
    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if !all_digits(units_str) || !all_digits(fraction_str) {
        return Err(invalid());
    }

    let (fraction_str, round_up) = match (fraction_str.len() > 2, extra) {
        (false, _) => (fraction_str, false),
        (true, ExtraDigits::Reject) => {
            return Err(DomainError::InvalidAmount(format!(
                "`{}` has more than two decimal places",
                trimmed
            )));
        }
        (true, ExtraDigits::Round) => (&fraction_str[..2], fraction_str.as_bytes()[2] >= b'5'),
    };

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| too_large())?
    };
    let fraction: i64 = match fraction_str.len() {
        0 => 0,
        1 => fraction_str.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction_str.parse().map_err(|_| invalid())?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|value| value.checked_add(fraction))
        .and_then(|value| value.checked_add(i64::from(round_up)))
        .ok_or_else(too_large)?;

    Ok(Money(if negative { -cents } else { cents }))
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}
