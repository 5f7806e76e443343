//! [`Data`] shared by catalogue entities.

use derive_more::{Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

use super::define_text;

/// Descriptive data every catalogue entity (a [`Taxon`], an [`Estate`] or an
/// [`Rm`]) carries.
///
/// [`Estate`]: super::Estate
/// [`Rm`]: super::Rm
/// [`Taxon`]: super::Taxon
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Data {
    /// [`Name`] of the entity.
    pub name: Name,

    /// [`Name`] of the entity in English, if differs.
    pub name_en: Option<Name>,

    /// [`Description`] of the entity.
    pub description: Option<Description>,

    /// Indicator whether the entity is shown publicly.
    pub enabled: bool,

    /// [`Position`] of the entity in lists.
    pub position: Position,
}

impl Data {
    /// Creates new enabled [`Data`] with the provided [`Name`] only.
    #[must_use]
    pub fn named(name: Name) -> Self {
        Self {
            name,
            name_en: None,
            description: None,
            enabled: true,
            position: Position::default(),
        }
    }
}

define_text! {
    /// Name of a catalogue entity.
    Name(max = 255)
}

/// Free-form description of a catalogue entity.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Maximum length of a [`Description`] in characters.
    pub const MAX_LEN: usize = 4096;

    /// Creates a new [`Description`] if the provided `text` is valid.
    ///
    /// Unlike names, descriptions may span multiple lines.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (!text.trim().is_empty() && text.chars().count() <= Self::MAX_LEN)
            .then_some(Self(text))
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Position of an entity in ordered lists. Lower goes first.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Position(i32);

#[cfg(test)]
mod spec {
    use super::{Description, Name};

    #[test]
    fn name_must_be_trimmed_and_bounded() {
        assert!(Name::new("Brick").is_some());
        assert!(Name::new("Кирпич").is_some());
        assert!(Name::new(" Brick").is_none());
        assert!(Name::new("").is_none());
        assert!(Name::new("я".repeat(255)).is_some());
        assert!(Name::new("я".repeat(256)).is_none());
    }

    #[test]
    fn description_allows_multiple_lines() {
        assert!(Description::new("Sunny flat.\nQuiet yard.").is_some());
        assert!(Description::new("  \n ").is_none());
        assert!(Description::new("x".repeat(4097)).is_none());
    }
}
