//! [`Company`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A company owning `Estate`s.
#[derive(Clone, Debug)]
pub struct Company {
    /// ID of this [`Company`].
    id: Id,

    /// Underlying [`domain::Company`].
    company: OnceCell<domain::Company>,
}

impl From<domain::Company> for Company {
    fn from(company: domain::Company) -> Self {
        Self {
            id: company.id.into(),
            company: OnceCell::new_with(Some(company)),
        }
    }
}

impl Company {
    /// Creates a new [`Company`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Company`] with the provided ID exists,
    /// otherwise accessing this [`Company`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            company: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Company`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Company`] doesn't exist.
    async fn company(&self, ctx: &Context) -> Result<&domain::Company, Error> {
        let id = self.id.into();
        self.company
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::company::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::query::CompanyError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A company owning `Estate`s.
#[graphql_object(context = Context)]
impl Company {
    /// Unique identifier of this `Company`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Company.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Company`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Company.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.company(ctx).await?.name.clone().into())
    }

    /// `DateTime` when this `Company` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Company.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.company(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Company`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::company::Id)]
#[into(domain::company::Id)]
#[graphql(name = "CompanyId", transparent)]
pub struct Id(Uuid);

/// Name of a `Company`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CompanyName",
    with = scalar::Via::<domain::company::Name>,
)]
pub struct Name(domain::company::Name);
