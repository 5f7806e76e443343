//! [`Rm`] (room)-related definitions.

use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, Context, Error};

/// A room of an `Estate`.
#[derive(Clone, Debug, From, Into)]
pub struct Rm(domain::Rm);

/// A room of an `Estate`.
#[graphql_object(name = "Room", context = Context)]
impl Rm {
    /// Unique identifier of this `Room`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Estate` this `Room` belongs to.
    #[must_use]
    pub fn estate(&self) -> api::Estate {
        #[expect(
            unsafe_code,
            reason = "foreign key guarantees `Estate` existence"
        )]
        unsafe {
            api::Estate::new_unchecked(self.0.estate_id)
        }
    }

    /// Type of this `Room`.
    pub async fn kind(&self, ctx: &Context) -> Result<api::Taxon, Error> {
        api::Taxon::load(self.0.kind, ctx).await
    }

    /// Name of this `Room`.
    #[must_use]
    pub fn name(&self) -> api::data::Name {
        self.0.data.name.clone().into()
    }

    /// Name of this `Room` in English, if it differs.
    #[must_use]
    pub fn name_en(&self) -> Option<api::data::Name> {
        self.0.data.name_en.clone().map(Into::into)
    }

    /// Description of this `Room`.
    #[must_use]
    pub fn description(&self) -> Option<api::data::Description> {
        self.0.data.description.clone().map(Into::into)
    }

    /// Indicator whether this `Room` is shown publicly.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.0.data.enabled
    }

    /// Position of this `Room` in its `Estate`.
    #[must_use]
    pub fn position(&self) -> i32 {
        self.0.data.position.into()
    }

    /// Area of this `Room`.
    #[must_use]
    pub fn size(&self) -> api::estate::Area {
        self.0.size.into()
    }

    /// Features of this `Room`.
    pub async fn features(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Taxon>, Error> {
        api::Taxon::load_many(&self.0.features, ctx).await
    }
}

/// Unique identifier of a `Room`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::rm::Id)]
#[into(domain::rm::Id)]
#[graphql(name = "RoomId", transparent)]
pub struct Id(Uuid);
