//! [`Compass`] definitions.

use super::{define_id, define_text};

/// Point of compass an [`Estate`] may face.
///
/// [`Estate`]: super::Estate
#[derive(Clone, Debug)]
pub struct Compass {
    /// ID of this [`Compass`] point.
    pub id: Id,

    /// [`Name`] of this [`Compass`] point.
    pub name: Name,

    /// [`Name`] of this [`Compass`] point in English.
    pub name_en: Name,

    /// [`Abbreviation`] of this [`Compass`] point.
    pub abbreviation: Abbreviation,
}

define_id! {
    /// ID of a [`Compass`] point.
    Id
}

define_text! {
    /// Name of a [`Compass`] point.
    Name(max = 100)
}

/// Abbreviation of a [`Compass`] point, like `N` or `SW`.
#[derive(
    derive_more::AsRef,
    Clone,
    Debug,
    derive_more::Display,
    Eq,
    Hash,
    PartialEq,
)]
#[as_ref(str, String)]
#[cfg_attr(
    feature = "postgres",
    derive(postgres_types::FromSql, postgres_types::ToSql),
    postgres(transparent)
)]
pub struct Abbreviation(String);

impl Abbreviation {
    /// Creates a new [`Abbreviation`] if the given `abbr` is one or two
    /// letters.
    #[must_use]
    pub fn new(abbr: impl Into<String>) -> Option<Self> {
        let abbr = abbr.into();
        let len = abbr.chars().count();
        ((1..=2).contains(&len) && abbr.chars().all(char::is_alphabetic))
            .then_some(Self(abbr))
    }
}

impl std::str::FromStr for Abbreviation {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Abbreviation`")
    }
}

#[cfg(test)]
mod spec {
    use super::{Abbreviation, Name};

    #[test]
    fn abbreviation_is_one_or_two_letters() {
        assert!(Abbreviation::new("N").is_some());
        assert!(Abbreviation::new("SW").is_some());
        assert!(Abbreviation::new("ЮЗ").is_some());
        assert!(Abbreviation::new("").is_none());
        assert!(Abbreviation::new("NNW").is_none());
        assert!(Abbreviation::new("N1").is_none());
    }

    #[test]
    fn name_is_bounded() {
        assert!(Name::new("North-west").is_some());
        assert!(Name::new("n".repeat(101)).is_none());
    }
}
