//! [`Taxon`] definitions.

use common::define_kind;

use super::{define_id, Data};

/// Entry of one of the lookup taxonomies describing [`Estate`]s and [`Rm`]s.
///
/// [`Estate`]: super::Estate
/// [`Rm`]: super::Rm
#[derive(Clone, Debug)]
pub struct Taxon {
    /// ID of this [`Taxon`].
    pub id: Id,

    /// [`Vocabulary`] this [`Taxon`] belongs to.
    pub vocabulary: Vocabulary,

    /// Descriptive [`Data`] of this [`Taxon`].
    pub data: Data,

    /// [`Applicability`] of this [`Taxon`].
    pub applicability: Applicability,
}

define_id! {
    /// ID of a [`Taxon`].
    Id
}

define_kind! {
    #[doc = "Taxonomy a [`Taxon`] belongs to."]
    enum Vocabulary {
        #[doc = "Material a building is made of."]
        Material = 1,

        #[doc = "Type of an estate (flat, house, land, ...)."]
        EstateType = 2,

        #[doc = "Feature of an estate."]
        EstateFeature = 3,

        #[doc = "Kind of a trim (finishing)."]
        Trim = 4,

        #[doc = "Feature of a room."]
        RoomFeature = 5,

        #[doc = "Type of a room."]
        RoomType = 6,
    }
}

impl Vocabulary {
    /// Indicates whether [`Taxon`]s of this [`Vocabulary`] carry an
    /// [`Applicability`].
    #[must_use]
    pub const fn is_scoped(self) -> bool {
        match self {
            Self::Material | Self::EstateType => false,
            Self::EstateFeature
            | Self::Trim
            | Self::RoomFeature
            | Self::RoomType => true,
        }
    }

    /// Checks whether the provided [`Applicability`] is allowed for
    /// [`Taxon`]s of this [`Vocabulary`].
    #[must_use]
    pub fn allows(self, applicability: Applicability) -> bool {
        self.is_scoped() || applicability == Applicability::default()
    }
}

/// Flags telling whether a [`Taxon`] applies to interiors, exteriors, both or
/// neither.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Applicability {
    /// Applies to interiors.
    pub internal: bool,

    /// Applies to exteriors.
    pub external: bool,
}

#[cfg(test)]
mod spec {
    use super::{Applicability, Vocabulary};

    #[test]
    fn unscoped_vocabularies_reject_flags() {
        let internal = Applicability {
            internal: true,
            external: false,
        };

        assert!(Vocabulary::Material.allows(Applicability::default()));
        assert!(!Vocabulary::Material.allows(internal));
        assert!(!Vocabulary::EstateType.allows(internal));
        assert!(Vocabulary::Trim.allows(internal));
        assert!(Vocabulary::RoomType.allows(internal));
    }

    #[test]
    fn displays_as_screaming_snake_case() {
        assert_eq!(Vocabulary::EstateFeature.to_string(), "ESTATE_FEATURE");
        assert_eq!(
            "ROOM_TYPE".parse::<Vocabulary>().ok(),
            Some(Vocabulary::RoomType),
        );
    }
}
