//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

/// Amount of money expressed as an integer count of minor currency units
/// (cents, paise).
///
/// Division only ever happens when formatting, so arithmetic on [`Money`]
/// is exact.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Number of minor units in a single major unit.
    const MINOR_PER_MAJOR: u64 = 100;

    /// Creates a new [`Money`] out of the provided minor units.
    #[must_use]
    pub const fn from_minor(units: i64) -> Self {
        Self(units)
    }

    /// Returns the amount of minor units in this [`Money`].
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Indicates whether this [`Money`] is below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, returning [`None`] on overflow.
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Multiplies this amount by an integer `factor` (a quantity, usually),
    /// returning [`None`] on overflow.
    #[must_use]
    pub const fn checked_mul(self, factor: i64) -> Option<Self> {
        match self.0.checked_mul(factor) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Sums up the provided amounts, returning [`None`] on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, |acc, m| acc.checked_add(m))
    }
}

/// Formats as `{major}.{minor}` with exactly two fractional digits.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02}",
            abs / Self::MINOR_PER_MAJOR,
            abs % Self::MINOR_PER_MAJOR,
        )
    }
}

/// Parses a string of integer minor units (`"499800"`).
impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("empty amount");
        }
        s.parse::<i64>()
            .map(Self)
            .map_err(|_| "amount must be an integer count of minor units")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Amount of money in integer minor units (cents), serialized as a
    /// string of digits since `Int` is limited to 32 bits.
    ///
    /// Input accepts either a string of digits or an `Int`.
    #[graphql_scalar(with = Self, parse_token(String, i32))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.minor().to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            if let Some(i) = input.as_int_value() {
                return Ok(Self::from_minor(i64::from(i)));
            }
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string non-integer value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::Money;

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Money::from_minor(499_800).to_string(), "4998.00");
        assert_eq!(Money::from_minor(89_964).to_string(), "899.64");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(0).to_string(), "0.00");
        assert_eq!(Money::from_minor(-1_050).to_string(), "-10.50");
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("249900").unwrap(),
            Money::from_minor(249_900),
        );
        assert_eq!(Money::from_str("-3").unwrap(), Money::from_minor(-3));

        assert!(Money::from_str("").is_err());
        assert!(Money::from_str("12.50").is_err());
        assert!(Money::from_str("12USD").is_err());
    }

    #[test]
    fn checked_arithmetic() {
        let price = Money::from_minor(249_900);

        assert_eq!(price.checked_mul(2), Some(Money::from_minor(499_800)));
        assert_eq!(
            price.checked_add(Money::from_minor(100)),
            Some(Money::from_minor(250_000)),
        );
        assert_eq!(Money::from_minor(i64::MAX).checked_mul(2), None);
        assert_eq!(Money::from_minor(i64::MAX).checked_add(price), None);
    }

    #[test]
    fn checked_sum() {
        assert_eq!(
            Money::checked_sum([1, 2, 3].map(Money::from_minor)),
            Some(Money::from_minor(6)),
        );
        assert_eq!(Money::checked_sum([]), Some(Money::ZERO));
        assert_eq!(
            Money::checked_sum([
                Money::from_minor(i64::MAX),
                Money::from_minor(1),
            ]),
            None,
        );
    }
}
