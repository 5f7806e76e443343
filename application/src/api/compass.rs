//! [`Compass`] point-related definitions.

use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api::scalar, Context};

/// A point of compass an `Estate` may face.
#[derive(Clone, Debug, From, Into)]
pub struct Compass(domain::Compass);

/// A point of compass an `Estate` may face.
#[graphql_object(name = "CompassPoint", context = Context)]
impl Compass {
    /// Unique identifier of this `CompassPoint`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Name of this `CompassPoint`.
    #[must_use]
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// Name of this `CompassPoint` in English.
    #[must_use]
    pub fn name_en(&self) -> Name {
        self.0.name_en.clone().into()
    }

    /// Abbreviation of this `CompassPoint`, like `N` or `SW`.
    #[must_use]
    pub fn abbreviation(&self) -> Abbreviation {
        self.0.abbreviation.clone().into()
    }
}

/// Unique identifier of a `CompassPoint`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::compass::Id)]
#[into(domain::compass::Id)]
#[graphql(name = "CompassPointId", transparent)]
pub struct Id(Uuid);

/// Name of a `CompassPoint`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CompassPointName",
    with = scalar::Via::<domain::compass::Name>,
)]
pub struct Name(domain::compass::Name);

/// Abbreviation of a `CompassPoint`: one or two letters.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CompassPointAbbreviation",
    with = scalar::Via::<domain::compass::Abbreviation>,
)]
pub struct Abbreviation(domain::compass::Abbreviation);
