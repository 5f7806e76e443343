//! [`Taxon`]-related definitions.

use std::collections::{BTreeSet, HashMap};

use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// An entry of a lookup taxonomy.
#[derive(Clone, Debug, From, Into)]
pub struct Taxon(domain::Taxon);

impl Taxon {
    /// Loads the [`Taxon`]s with the provided IDs, in the order of IDs.
    ///
    /// Missing [`Taxon`]s are skipped.
    ///
    /// # Errors
    ///
    /// Errors if the database query fails.
    pub(crate) async fn load_many(
        ids: &BTreeSet<domain::taxon::Id>,
        ctx: &Context,
    ) -> Result<Vec<Self>, Error> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let mut found: HashMap<_, _> = ctx
            .service()
            .execute(query::taxons::ByIds::by(ids.iter().copied().collect()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok(ids
            .iter()
            .filter_map(|id| found.remove(id))
            .map(Self)
            .collect())
    }

    /// Loads the [`Taxon`] with the provided ID.
    ///
    /// # Errors
    ///
    /// Errors if the [`Taxon`] doesn't exist.
    pub(crate) async fn load(
        id: domain::taxon::Id,
        ctx: &Context,
    ) -> Result<Self, Error> {
        ctx.service()
            .execute(query::taxons::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::TaxonError::NotExists.into())
            .map_err(ctx.error())
            .map(Self)
    }
}

/// An entry of a lookup taxonomy.
#[graphql_object(context = Context)]
impl Taxon {
    /// Unique identifier of this `Taxon`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Vocabulary` this `Taxon` belongs to.
    #[must_use]
    pub fn vocabulary(&self) -> Vocabulary {
        self.0.vocabulary.into()
    }

    /// Name of this `Taxon`.
    #[must_use]
    pub fn name(&self) -> api::data::Name {
        self.0.data.name.clone().into()
    }

    /// Name of this `Taxon` in English, if it differs.
    #[must_use]
    pub fn name_en(&self) -> Option<api::data::Name> {
        self.0.data.name_en.clone().map(Into::into)
    }

    /// Description of this `Taxon`.
    #[must_use]
    pub fn description(&self) -> Option<api::data::Description> {
        self.0.data.description.clone().map(Into::into)
    }

    /// Indicator whether this `Taxon` is shown publicly.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.0.data.enabled
    }

    /// Position of this `Taxon` in its `Vocabulary`.
    #[must_use]
    pub fn position(&self) -> i32 {
        self.0.data.position.into()
    }

    /// Indicator whether this `Taxon` applies to interiors.
    #[must_use]
    pub fn internal(&self) -> bool {
        self.0.applicability.internal
    }

    /// Indicator whether this `Taxon` applies to exteriors.
    #[must_use]
    pub fn external(&self) -> bool {
        self.0.applicability.external
    }
}

/// Unique identifier of a `Taxon`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::taxon::Id)]
#[into(domain::taxon::Id)]
#[graphql(name = "TaxonId", transparent)]
pub struct Id(Uuid);

/// Lookup taxonomy a `Taxon` belongs to.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum Vocabulary {
    /// Material a building is made of.
    Material,

    /// Type of an estate (flat, house, land, ...).
    EstateType,

    /// Feature of an estate.
    EstateFeature,

    /// Kind of a trim.
    Trim,

    /// Feature of a room.
    RoomFeature,

    /// Type of a room.
    RoomType,
}

impl From<domain::taxon::Vocabulary> for Vocabulary {
    fn from(vocabulary: domain::taxon::Vocabulary) -> Self {
        use domain::taxon::Vocabulary as V;
        match vocabulary {
            V::Material => Self::Material,
            V::EstateType => Self::EstateType,
            V::EstateFeature => Self::EstateFeature,
            V::Trim => Self::Trim,
            V::RoomFeature => Self::RoomFeature,
            V::RoomType => Self::RoomType,
        }
    }
}

impl From<Vocabulary> for domain::taxon::Vocabulary {
    fn from(vocabulary: Vocabulary) -> Self {
        use Vocabulary as V;
        match vocabulary {
            V::Material => Self::Material,
            V::EstateType => Self::EstateType,
            V::EstateFeature => Self::EstateFeature,
            V::Trim => Self::Trim,
            V::RoomFeature => Self::RoomFeature,
            V::RoomType => Self::RoomType,
        }
    }
}

#[cfg(test)]
mod spec {
    use service::domain;

    use super::Vocabulary;

    #[test]
    fn maps_every_vocabulary() {
        for &v in domain::taxon::Vocabulary::ALL {
            assert_eq!(domain::taxon::Vocabulary::from(Vocabulary::from(v)), v);
        }
    }
}
