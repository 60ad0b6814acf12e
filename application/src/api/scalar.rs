//! Helpers for defining GraphQL scalars backed by domain types.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// Adapter for `#[graphql(with = ..)]` attribute, representing a scalar as a
/// string via the [`FromStr`] and [`Display`] impls of the `Domain` type.
///
/// The scalar type itself must implement [`AsRef`] and [`TryFrom`] for the
/// `Domain` type, so the domain validation is the only validation applied to
/// an input.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<Domain>(PhantomData<Domain>);

impl<Domain> Via<Domain> {
    /// Outputs the scalar as the [`Display`]ed `Domain` value.
    ///
    /// [`Display`]: fmt::Display
    pub fn to_output<T, S>(scalar: &T) -> Value<S>
    where
        Domain: fmt::Display,
        T: AsRef<Domain>,
        S: ScalarValue,
    {
        Value::scalar(scalar.as_ref().to_string())
    }

    /// Parses the scalar from a string [`InputValue`].
    ///
    /// # Errors
    ///
    /// If the [`InputValue`] is not a string, or the `Domain` type rejects
    /// it.
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        Domain: FromStr,
        Domain::Err: fmt::Display,
        T: TryFrom<Domain> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let name = scalar_name::<T, S>();
        let Some(raw) = input.as_string_value() else {
            return Err(format!(
                "`{name}` expects a string input value, found: {input}",
            ));
        };
        let parsed = raw
            .parse::<Domain>()
            .map_err(|e| format!("`{name}` cannot be parsed from {raw:?}: {e}"))?;
        T::try_from(parsed).map_err(|e| format!("`{name}` is invalid: {e}"))
    }

    /// Parses the provided [`ScalarToken`] as a [`String`].
    ///
    /// # Errors
    ///
    /// If the [`ScalarToken`] is not a string.
    pub fn parse_token<S: ScalarValue>(
        token: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(token)
    }
}

/// Returns the GraphQL name of the `T` scalar.
fn scalar_name<T, S>() -> String
where
    T: GraphQLType<S, TypeInfo = ()>,
    S: ScalarValue,
{
    T::name(&()).map_or_else(|| "scalar".into(), ToString::to_string)
}
