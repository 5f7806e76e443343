//! GraphQL scalar definitions.

use std::{fmt, marker::PhantomData, str::FromStr};

use derive_more::{AsRef, Display, From, Into};
use juniper::{
    GraphQLScalar, GraphQLType, InputValue, ParseScalarResult,
    ParseScalarValue, ScalarToken, ScalarValue, Value,
};

/// Helper type to use in `#[graphql(with = ..)]` attribute.
///
/// Uses [`FromStr`]/[`Display`] impls of `As` type to convert the target type
/// to/from GraphQL scalar.
///
/// Target type must implement [`TryFrom`] and [`AsRef`] for `As` type.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Converts the target type into scalar [`Value`] by using [`Display`]
    /// impl of `As` type.
    ///
    /// [`Display`]: fmt::Display
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Constructs the target type from scalar [`Value`] by using [`FromStr`]
    /// impl of `As` type.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the input value is not a string;
    /// - the input value cannot be parsed into `As` type;
    /// - the parsed value cannot be converted into the target type.
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr + fmt::Display,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let name = T::name(&()).unwrap_or("<unnamed>");
        let s = input.as_string_value().ok_or_else(|| {
            format!(
                "Cannot parse input scalar `{name}`: expected string input \
                 value, found: {input}",
            )
        })?;
        s.parse::<As>()
            .map_err(|e| {
                format!("Cannot parse input scalar `{name}` from \"{s}\": {e}")
            })?
            .try_into()
            .map_err(|e| format!("Cannot parse input scalar `{name}`: {e}"))
    }

    /// Parses the provided [`ScalarToken`].
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be parsed as [`String`].
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}

/// Arbitrary-precision decimal number, passed as a string (`"55.751244"`).
#[derive(
    AsRef, Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into,
    PartialEq,
)]
#[graphql(with = Via::<rust_decimal::Decimal>)]
pub struct Decimal(rust_decimal::Decimal);

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, InputValue, Value};

    use crate::api::estate::Area;

    use super::{Decimal, Via};

    #[test]
    fn reads_decimal_from_string() {
        let input = InputValue::<DefaultScalarValue>::scalar("55.751244");

        let dec: Decimal =
            Via::<rust_decimal::Decimal>::from_input(&input).unwrap();

        assert_eq!(dec.to_string(), "55.751244");
        assert_eq!(
            Via::<rust_decimal::Decimal>::to_output::<_, DefaultScalarValue>(
                &dec,
            ),
            Value::scalar("55.751244".to_owned()),
        );
    }

    #[test]
    fn rejects_non_string_and_invalid_input() {
        let err = Via::<rust_decimal::Decimal>::from_input::<Decimal, _>(
            &InputValue::<DefaultScalarValue>::scalar(12),
        )
        .unwrap_err();
        assert!(err.contains("expected string"), "{err}");

        let err = Via::<service::domain::estate::Area>::from_input::<Area, _>(
            &InputValue::<DefaultScalarValue>::scalar("-1"),
        )
        .unwrap_err();
        assert!(err.contains("invalid `Area`"), "{err}");
    }
}
