//! [`Rm`] (room) definitions.

use std::collections::BTreeSet;

use derive_more::{Display, Error};

use super::{
    define_id,
    estate::{self, Area},
    taxon::{self, Vocabulary},
    Data, Taxon,
};

/// Room of an [`Estate`].
///
/// [`Estate`]: super::Estate
#[derive(Clone, Debug)]
pub struct Rm {
    /// ID of this [`Rm`].
    pub id: Id,

    /// ID of the [`Estate`] this [`Rm`] belongs to.
    ///
    /// [`Estate`]: super::Estate
    pub estate_id: estate::Id,

    /// [`Taxon`] of [`Vocabulary::RoomType`] this [`Rm`] is of.
    pub kind: taxon::Id,

    /// Descriptive [`Data`] of this [`Rm`].
    pub data: Data,

    /// [`Area`] of this [`Rm`].
    pub size: Area,

    /// [`Taxon`]s of [`Vocabulary::RoomFeature`].
    pub features: BTreeSet<taxon::Id>,
}

define_id! {
    /// ID of an [`Rm`].
    Id
}

/// Role a [`Taxon`] plays in an [`Rm`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum TaxonRole {
    /// [`Rm::kind`].
    #[display("a room type")]
    Kind,

    /// One of [`Rm::features`].
    #[display("a room feature")]
    Feature,
}

impl TaxonRole {
    /// Checks whether the provided [`Taxon`] may play this [`TaxonRole`].
    ///
    /// # Errors
    ///
    /// With [`UnsuitableTaxon`] if it may not.
    pub fn admit(self, taxon: &Taxon) -> Result<(), UnsuitableTaxon> {
        let expected = match self {
            Self::Kind => Vocabulary::RoomType,
            Self::Feature => Vocabulary::RoomFeature,
        };
        (taxon.vocabulary == expected)
            .then_some(())
            .ok_or(UnsuitableTaxon {
                id: taxon.id,
                role: self,
            })
    }
}

/// [`Taxon`] cannot play the [`TaxonRole`] it is referenced in.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[display("`Taxon(id: {id})` cannot be used as {role}")]
pub struct UnsuitableTaxon {
    /// ID of the [`Taxon`].
    pub id: taxon::Id,

    /// [`TaxonRole`] the [`Taxon`] is referenced in.
    pub role: TaxonRole,
}

#[cfg(test)]
mod spec {
    use crate::domain::{
        data::Name,
        taxon::{self, Applicability, Vocabulary},
        Data, Taxon,
    };

    use super::TaxonRole;

    #[test]
    fn admits_taxons_of_room_vocabularies_only() {
        let taxon = |vocabulary| Taxon {
            id: taxon::Id::new(),
            vocabulary,
            data: Data::named(Name::new("Bedroom").unwrap()),
            applicability: Applicability::default(),
        };

        assert!(TaxonRole::Kind.admit(&taxon(Vocabulary::RoomType)).is_ok());
        assert!(TaxonRole::Kind.admit(&taxon(Vocabulary::EstateType)).is_err());
        assert!(
            TaxonRole::Feature
                .admit(&taxon(Vocabulary::RoomFeature))
                .is_ok(),
        );
        assert!(
            TaxonRole::Feature
                .admit(&taxon(Vocabulary::RoomType))
                .is_err(),
        );
    }
}
