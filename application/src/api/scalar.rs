//! GraphQL scalar definitions.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    InputValue, ParseScalarResult, ParseScalarValue, ScalarToken, ScalarValue,
    Value,
};

/// Helper type to use in `#[graphql(with = ..)]` attribute of string-like
/// scalars wrapping a validated domain type `As`.
///
/// Input is parsed with the [`FromStr`] impl of `As`, so the domain rules
/// (trimming, length limits, formats) reject a malformed value before any
/// resolver runs. Output uses its [`Display`] impl.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Converts the target type into a string scalar [`Value`].
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Parses the target type out of a string scalar [`InputValue`].
    ///
    /// # Errors
    ///
    /// If the input is not a string, or is not a valid `As`.
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr,
        As::Err: fmt::Display,
        T: From<As>,
        S: ScalarValue,
    {
        let s = input
            .as_string_value()
            .ok_or_else(|| format!("Expected a string, found: {input}"))?;
        s.parse::<As>()
            .map(T::from)
            .map_err(|e| format!("Cannot parse \"{s}\": {e}"))
    }

    /// Parses the provided [`ScalarToken`] as a string.
    ///
    /// # Errors
    ///
    /// If the token is not a string.
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, InputValue};

    use crate::api::{customer, line};

    use super::Via;

    type Input = InputValue<DefaultScalarValue>;

    #[test]
    fn trims_input() {
        let name = Via::<service::domain::customer::Name>::from_input::<
            customer::Name,
            DefaultScalarValue,
        >(&Input::scalar("  John Doe "))
        .unwrap();

        assert_eq!(name.to_string(), "John Doe");
    }

    #[test]
    fn rejects_invalid_input() {
        let blank = Via::<service::domain::customer::Name>::from_input::<
            customer::Name,
            DefaultScalarValue,
        >(&Input::scalar("   "));
        assert!(blank.is_err());

        let email = Via::<service::domain::customer::Email>::from_input::<
            customer::Email,
            DefaultScalarValue,
        >(&Input::scalar("not an email"));
        assert!(email.unwrap_err().contains("invalid `Email`"));

        let code = Via::<service::domain::line::HsnSacCode>::from_input::<
            line::HsnSacCode,
            DefaultScalarValue,
        >(&Input::scalar(42));
        assert!(code.unwrap_err().starts_with("Expected a string"));
    }
}
