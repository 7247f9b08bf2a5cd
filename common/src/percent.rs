//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
use rust_decimal::{prelude::ToPrimitive as _, Decimal, RoundingStrategy};

use crate::Money;

/// Percentage within `0..=100` range, fractional values allowed (`12.5`).
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
pub struct Percent(Decimal);

impl Percent {
    /// Zero [`Percent`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Percent`] by checking the provided value is within
    /// `0..=100` range.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        if val < Decimal::ZERO || val > Decimal::ONE_HUNDRED {
            None
        } else {
            Some(Self(val.normalize()))
        }
    }

    /// Calculates this [`Percent`] of the provided `amount`, rounding the
    /// result half-up to whole minor units.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn share_of(self, amount: Money) -> Option<Money> {
        Decimal::from(amount.minor())
            .checked_mul(self.0)?
            .checked_div(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Money::from_minor)
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Percentage within `0..=100` range as a decimal string (`"18"`,
    /// `"12.5"`).
    #[graphql_scalar(with = Self, parse_token(String))]
    type Percent = super::Percent;

    impl Percent {
        fn to_output<S: ScalarValue>(m: &Percent) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Percent` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Percent` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use crate::Money;

    use super::Percent;

    fn percent(s: &str) -> Percent {
        Percent::from_str(s).unwrap()
    }

    #[test]
    fn bounds() {
        assert!(Percent::from_str("0").is_ok());
        assert!(Percent::from_str("100").is_ok());
        assert!(Percent::from_str("12.5").is_ok());

        assert!(Percent::from_str("-0.01").is_err());
        assert!(Percent::from_str("100.01").is_err());
        assert!(Percent::from_str("eighteen").is_err());
    }

    #[test]
    fn displays_normalized() {
        assert_eq!(percent("18.00").to_string(), "18");
        assert_eq!(percent("12.50").to_string(), "12.5");
    }

    #[test]
    fn share_of_rounds_half_up() {
        let p = percent("18");
        assert_eq!(
            p.share_of(Money::from_minor(499_800)),
            Some(Money::from_minor(89_964)),
        );

        // 2.5 rounds up to 3
        assert_eq!(
            percent("50").share_of(Money::from_minor(5)),
            Some(Money::from_minor(3)),
        );
        // 4.125 rounds down to 4
        assert_eq!(
            percent("12.5").share_of(Money::from_minor(33)),
            Some(Money::from_minor(4)),
        );
        assert_eq!(
            Percent::ZERO.share_of(Money::from_minor(1_000)),
            Some(Money::ZERO),
        );
    }
}
