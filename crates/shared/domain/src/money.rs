//! Fixed-point monetary amounts.
//!
//! Every amount carries exactly two fractional digits and is never negative.
//! Amounts cross the JSON boundary as strings (`"200.00"`) so no precision is
//! lost to binary floating point. Integral JSON numbers are also accepted;
//! fractional JSON numbers are refused because they arrive as `f64`.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{MAX_MONEY_UNITS, MONEY_SCALE};
use crate::error::{DomainError, DomainResult};

/// Non-negative amount with two fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Validate and normalize an amount.
    ///
    /// Rejects negative values and values with more than two significant
    /// fractional digits (`1.005`), and values that overflow `decimal(10,2)`.
    pub fn new(amount: Decimal) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::validation("amount cannot be negative"));
        }
        if amount.normalize().scale() > MONEY_SCALE {
            return Err(DomainError::validation(format!(
                "amount {} has more than {} fractional digits",
                amount, MONEY_SCALE
            )));
        }
        if amount > Decimal::from(MAX_MONEY_UNITS) + Decimal::new(99, MONEY_SCALE) {
            return Err(DomainError::validation(format!("amount {} is too large", amount)));
        }

        let mut normalized = amount.abs();
        normalized.rescale(MONEY_SCALE);
        Ok(Money(normalized))
    }

    /// Underlying decimal value (scale 2)
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price, within the column bound.
    pub fn checked_times(self, quantity: u32) -> DomainResult<Money> {
        Money::new(self.0 * Decimal::from(quantity))
    }

    /// Sum of two amounts, within the column bound.
    pub fn checked_add(self, rhs: Money) -> DomainResult<Money> {
        Money::new(self.0 + rhs.0)
    }

    /// Sum of many amounts; fails as soon as a partial sum leaves the column bound.
    pub fn total<I>(amounts: I) -> DomainResult<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim())
            .map_err(|_| DomainError::validation(format!("invalid amount '{}'", s)))?;
        Money::new(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
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
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> de::Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal string such as \"199.99\" or a whole number")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Money, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Money, E> {
        Money::new(Decimal::from(value)).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Money, E> {
        Money::new(Decimal::from(value)).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Money, E> {
        Err(E::custom(format!(
            "amount {} must be sent as a decimal string, e.g. \"199.99\"",
            value
        )))
    }
}
