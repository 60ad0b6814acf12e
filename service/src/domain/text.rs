//! Bounded single-line text values.

/// Defines a newtype over a [`String`] that is non-empty, has no leading or
/// trailing whitespace and is at most `max` characters long.
macro_rules! define_text {
    (
        #[doc = $doc:literal]
        $name:ident, max = $max:literal $(,)?
    ) => {
        #[derive(
            ::derive_more::AsRef,
            Clone,
            Debug,
            ::derive_more::Display,
            Eq,
            Hash,
            PartialEq,
        )]
        #[as_ref(str, String)]
        #[cfg_attr(
            feature = "postgres",
            derive(::postgres_types::FromSql, ::postgres_types::ToSql),
            postgres(transparent),
        )]
        #[doc = $doc]
        pub struct $name(String);

        impl $name {
            /// Maximum length in characters.
            pub const MAX_LEN: usize = $max;

            #[doc = concat!("Creates a new [`", stringify!($name), "`].")]
            ///
            /// # Safety
            ///
            /// The caller must ensure that the given `text` is non-empty,
            /// trimmed and not longer than [`Self::MAX_LEN`].
            #[expect(unsafe_code, reason = "bypass")]
            #[must_use]
            pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
                Self(text.into())
            }

            #[doc = concat!(
                "Creates a new [`", stringify!($name), "`] if the given ",
                "`text` is valid.",
            )]
            #[must_use]
            pub fn new(text: impl Into<String>) -> Option<Self> {
                let text = text.into();
                Self::check(&text).then_some(Self(text))
            }

            /// Checks whether the given `text` is valid.
            fn check(text: impl AsRef<str>) -> bool {
                let text = text.as_ref();
                !text.is_empty()
                    && text.trim() == text
                    && text.chars().count() <= Self::MAX_LEN
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or(concat!("invalid `", stringify!($name), "`"))
            }
        }
    };
}

pub(crate) use define_text;
