//! Domain definitions.

pub mod company;
pub mod compass;
pub mod data;
pub mod estate;
pub mod rm;
pub mod taxon;
pub mod user;
pub mod visitor_hit;

pub use self::{
    company::Company, compass::Compass, data::Data, estate::Estate, rm::Rm,
    taxon::Taxon, user::User, visitor_hit::VisitorHit,
};

/// Defines a validated single-line text newtype.
///
/// A valid value is non-empty, has no surrounding whitespace and is at most
/// `max` characters long.
macro_rules! define_text {
    (
        $(#[doc = $doc:literal])*
        $name:ident(max = $max:literal)
    ) => {
        $(#[doc = $doc])*
        #[derive(
            ::derive_more::AsRef,
            Clone,
            Debug,
            ::derive_more::Display,
            Eq,
            Hash,
            Ord,
            PartialEq,
            PartialOrd,
        )]
        #[as_ref(str, String)]
        #[cfg_attr(
            feature = "postgres",
            derive(::postgres_types::FromSql, ::postgres_types::ToSql),
            postgres(transparent),
        )]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Maximum length of a [`", stringify!($name), "`] in characters.")]
            pub const MAX_LEN: usize = $max;

            #[doc = concat!("Creates a new [`", stringify!($name), "`] without checking it.")]
            ///
            /// # Safety
            ///
            /// The caller must ensure the value is non-empty, trimmed and not
            /// longer than [`Self::MAX_LEN`] characters.
            #[expect(unsafe_code, reason = "bypass")]
            #[must_use]
            pub unsafe fn new_unchecked(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[doc = concat!("Creates a new [`", stringify!($name), "`] if the provided `value` is valid.")]
            #[must_use]
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let value = value.into();
                Self::check(&value).then_some(Self(value))
            }

            /// Checks the format invariants.
            fn check(value: &str) -> bool {
                value.trim() == value
                    && !value.is_empty()
                    && value.chars().count() <= Self::MAX_LEN
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

/// Defines a UUID-backed identifier newtype.
macro_rules! define_id {
    (
        $(#[doc = $doc:literal])*
        $name:ident
    ) => {
        $(#[doc = $doc])*
        #[derive(
            Clone,
            Copy,
            Debug,
            Default,
            ::serde::Deserialize,
            ::derive_more::Display,
            Eq,
            ::derive_more::From,
            ::derive_more::FromStr,
            Hash,
            ::derive_more::Into,
            Ord,
            PartialEq,
            PartialOrd,
            ::serde::Serialize,
        )]
        #[cfg_attr(
            feature = "postgres",
            derive(::postgres_types::FromSql, ::postgres_types::ToSql),
            postgres(transparent),
        )]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Generates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(::uuid::Uuid::new_v4())
            }
        }
    };
}
pub(crate) use define_id;
