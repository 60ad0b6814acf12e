//! Closed enumerations persisted as small integers.

/// Defines a closed enumeration of kinds.
///
/// The generated enum:
/// - is [`Display`]ed and parsed in `SCREAMING_SNAKE_CASE`;
/// - is (de)serialized with [`serde`] in the same case;
/// - is stored in PostgreSQL as `INT2` of its discriminant (with the
///   `postgres` feature of the invoking crate);
/// - lists all its variants in `ALL`.
///
/// Any discriminant not listed in the definition is rejected when read back
/// from the database, so no value outside the enumeration can be observed.
///
/// # Example
///
/// ```rust
/// # use common::define_kind;
/// define_kind! {
///     #[doc = "Kind of a bed."]
///     enum Bed {
///         #[doc = "Single bed."]
///         Single = 1,
///
///         #[doc = "Double bed."]
///         Double = 2,
///     }
/// }
///
/// assert_eq!(Bed::Double.to_string(), "DOUBLE");
/// assert_eq!(Bed::ALL, &[Bed::Single, Bed::Double]);
/// ```
///
/// [`Display`]: std::fmt::Display
/// [`serde`]: https://docs.rs/serde
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::serde::Deserialize,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            PartialEq,
            $crate::private::serde::Serialize,
        )]
        #[doc = $doc]
        #[repr(u8)]
        #[serde(crate = "::common::private::serde")]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        #[strum(crate = "::common::private::strum")]
        #[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $(
                 #[doc = $variant_doc]
                 $variant = $value,
            )*
        }

        impl $name {
            /// All the variants, in the order of their definition.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Returns the discriminant of this kind.
            #[must_use]
            pub const fn u8(self) -> u8 {
                self as u8
            }
        }

        #[cfg(feature = "postgres")]
        impl<'a> $crate::private::postgres_types::FromSql<'a> for $name {
            $crate::private::postgres_types::accepts!(INT2);

            fn from_sql(
                ty: &$crate::private::postgres_types::Type,
                raw: &[u8],
            ) -> Result<
                $name,
                Box<dyn ::std::error::Error
                    + ::core::marker::Sync
                    + ::core::marker::Send>,
            > {
                let raw = u8::try_from(i16::from_sql(ty, raw)?)?;
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.u8() == raw)
                    .ok_or_else(|| ::std::format!(
                        "unknown `{}` discriminant: {raw}",
                        ::core::stringify!($name),
                    ).into())
            }
        }

        #[cfg(feature = "postgres")]
        impl $crate::private::postgres_types::ToSql for $name {
            $crate::private::postgres_types::accepts!(INT2);
            $crate::private::postgres_types::to_sql_checked!();

            fn to_sql(
                &self,
                ty: &$crate::private::postgres_types::Type,
                w: &mut $crate::private::postgres_types::private::BytesMut,
            ) -> Result<
                $crate::private::postgres_types::IsNull,
                ::std::boxed::Box<
                    dyn ::std::error::Error
                        + ::core::marker::Sync
                        + ::core::marker::Send
                >,
            > {
                i16::from(self.u8()).to_sql(ty, w)
            }
        }
    };
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    define_kind! {
        #[doc = "Test kind."]
        enum Meal {
            #[doc = "Breakfast."]
            Breakfast = 1,

            #[doc = "Late dinner."]
            LateDinner = 3,
        }
    }

    #[test]
    fn lists_all_variants_in_order() {
        assert_eq!(Meal::ALL, &[Meal::Breakfast, Meal::LateDinner]);
        assert_eq!(Meal::LateDinner.u8(), 3);
    }

    #[test]
    fn displays_and_parses_screaming_snake_case() {
        assert_eq!(Meal::LateDinner.to_string(), "LATE_DINNER");
        assert_eq!(Meal::from_str("BREAKFAST").unwrap(), Meal::Breakfast);
        assert!(Meal::from_str("Breakfast").is_err());
    }

    #[test]
    fn serializes_as_display() {
        assert_eq!(
            serde_json::to_string(&Meal::LateDinner).unwrap(),
            r#""LATE_DINNER""#,
        );
        assert_eq!(
            serde_json::from_str::<Meal>(r#""BREAKFAST""#).unwrap(),
            Meal::Breakfast,
        );
    }
}
