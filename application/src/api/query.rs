//! GraphQL [`Query`]s definitions.

use common::Money;
use juniper::graphql_object;
use service::{domain, query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::user::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Estate` with the specified ID.
    ///
    /// Disabled `Estate`s are visible to their owners only.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ESTATE_NOT_EXISTS` - the `Estate` with the specified ID does not
    ///                         exist or is not visible.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "estate",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn estate(
        id: api::estate::Id,
        ctx: &Context,
    ) -> Result<api::Estate, Error> {
        visible_estate(id.into(), ctx).await.map(Into::into)
    }

    /// Fetches the page of `Estate`s.
    ///
    /// `minPrice` and `maxPrice` must be in the same currency.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous;
    /// - `PRICE_CURRENCY_MISMATCH` - `minPrice` and `maxPrice` currencies
    ///                               differ.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            city = ?city.as_ref().map(ToString::to_string),
            first = ?first,
            gql.name = "estates",
            housing = ?housing,
            kind = ?kind,
            last = ?last,
            max_price = ?max_price,
            min_price = ?min_price,
            otel.name = Self::SPAN_NAME,
            rent = ?rent,
            search = ?search.as_ref().map(ToString::to_string),
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn estates(
        first: Option<i32>,
        after: Option<api::estate::list::Cursor>,
        last: Option<i32>,
        before: Option<api::estate::list::Cursor>,
        kind: Option<api::taxon::Id>,
        rent: Option<bool>,
        housing: Option<bool>,
        city: Option<api::estate::City>,
        min_price: Option<Money>,
        max_price: Option<Money>,
        search: Option<api::data::Name>,
        ctx: &Context,
    ) -> Result<api::estate::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        let arguments = read::estate::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;
        let filter = read::estate::Filter {
            kind: kind.map(Into::into),
            rent,
            housing,
            city: city.map(Into::into),
            price: price_range(min_price, max_price).map_err(ctx.error())?,
            search: search.map(Into::into),
            viewer: ctx.viewer().await?,
        };

        ctx.service()
            .execute(query::estates::List::by(read::estate::list::Selector {
                arguments,
                filter: filter.clone(),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|page| api::estate::list::Connection::new(page, filter))
    }

    /// Returns the `Room`s of the `Estate` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ESTATE_NOT_EXISTS` - the `Estate` with the specified ID does not
    ///                         exist or is not visible.
    #[tracing::instrument(
        skip_all,
        fields(
            estate_id = %estate_id,
            gql.name = "rooms",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn rooms(
        estate_id: api::estate::Id,
        ctx: &Context,
    ) -> Result<Vec<api::Rm>, Error> {
        let estate = visible_estate(estate_id.into(), ctx).await?;
        ctx.service()
            .execute(query::rms::ByEstate::by(estate.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rms| rms.into_iter().map(Into::into).collect())
    }

    /// Returns the enabled `Taxon`s of the specified `Vocabulary`, in list
    /// order.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "taxons",
            otel.name = Self::SPAN_NAME,
            vocabulary = ?vocabulary,
        ),
    )]
    pub async fn taxons(
        vocabulary: api::taxon::Vocabulary,
        ctx: &Context,
    ) -> Result<Vec<api::Taxon>, Error> {
        ctx.service()
            .execute(query::taxons::ByVocabulary::by(vocabulary.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|taxons| {
                taxons
                    .into_iter()
                    .filter(|t| t.data.enabled)
                    .map(Into::into)
                    .collect()
            })
    }

    /// Returns the `Taxon` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `TAXON_NOT_EXISTS` - the `Taxon` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "taxon",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn taxon(
        id: api::taxon::Id,
        ctx: &Context,
    ) -> Result<api::Taxon, Error> {
        api::Taxon::load(id.into(), ctx).await
    }

    /// Returns all the `CompassPoint`s ordered by name.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "compassPoints",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn compass_points(
        ctx: &Context,
    ) -> Result<Vec<api::Compass>, Error> {
        ctx.service()
            .execute(query::compass::All::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|points| points.into_iter().map(Into::into).collect())
    }

    /// Returns the `Company` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `COMPANY_NOT_EXISTS` - the `Company` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "company",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn company(
        id: api::company::Id,
        ctx: &Context,
    ) -> Result<api::Company, Error> {
        ctx.service()
            .execute(query::company::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| CompanyError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the total number of tracked page views.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "visitorHitsCount",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn visitor_hits_count(ctx: &Context) -> Result<i32, Error> {
        _ = ctx.current_session().await?;
        ctx.service()
            .execute(query::visitor_hits::TotalCount::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|total| i32::try_from(i64::from(total)).unwrap_or(i32::MAX))
    }
}

/// Loads the [`domain::Estate`] with the provided ID, if it is visible to the
/// current viewer.
///
/// # Errors
///
/// With [`EstateError::NotExists`] if it doesn't exist or is not visible.
async fn visible_estate(
    id: domain::estate::Id,
    ctx: &Context,
) -> Result<domain::Estate, Error> {
    let viewer = ctx.viewer().await?;
    ctx.service()
        .execute(query::estate::ById::by(id))
        .await
        .map_err(AsError::into_error)
        .map_err(ctx.error())?
        .filter(|e| e.is_visible_to(viewer))
        .ok_or_else(|| EstateError::NotExists.into())
        .map_err(ctx.error())
}

/// Builds a [`read::estate::PriceRange`] out of the provided bounds.
///
/// # Errors
///
/// With [`FilterError::PriceCurrencyMismatch`] if the bounds are in different
/// currencies.
fn price_range(
    min: Option<Money>,
    max: Option<Money>,
) -> Result<Option<read::estate::PriceRange>, Error> {
    let currency = match (min, max) {
        (None, None) => return Ok(None),
        (Some(min), Some(max)) if min.currency != max.currency => {
            return Err(FilterError::PriceCurrencyMismatch.into());
        }
        (Some(m), _) | (None, Some(m)) => m.currency,
    };
    Ok(Some(read::estate::PriceRange {
        currency,
        min: min.map(|m| m.amount),
        max: max.map(|m| m.amount),
    }))
}

define_error! {
    enum CompanyError {
        #[code = "COMPANY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Company` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum EstateError {
        #[code = "ESTATE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Estate` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum FilterError {
        #[code = "PRICE_CURRENCY_MISMATCH"]
        #[status = BAD_REQUEST]
        #[message = "`minPrice` and `maxPrice` must be in the same currency"]
        PriceCurrencyMismatch,
    }
}

define_error! {
    enum TaxonError {
        #[code = "TAXON_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Taxon` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Money};
    use rust_decimal::Decimal;

    use crate::{api, Error};

    use super::{price_range, TaxonError};

    fn money(amount: i64, currency: Currency) -> Money {
        Money {
            amount: Decimal::from(amount),
            currency,
        }
    }

    #[test]
    fn builds_price_range() {
        assert!(price_range(None, None).unwrap().is_none());

        let range = price_range(None, Some(money(500, Currency::Eur)))
            .unwrap()
            .unwrap();
        assert_eq!(range.currency, Currency::Eur);
        assert_eq!(range.min, None);
        assert_eq!(range.max, Some(Decimal::from(500)));
    }

    #[test]
    fn exposes_taxon_by_id() {
        let schema =
            api::Schema::new(api::Query, api::Mutation, api::Subscription);
        let sdl = schema.as_sdl();
        assert!(sdl.contains("taxon(id: TaxonId!): Taxon!"), "{sdl}");

        let err = Error::from(TaxonError::NotExists);
        assert_eq!(err.code, "TAXON_NOT_EXISTS");
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn rejects_mixed_currencies() {
        let err = price_range(
            Some(money(1, Currency::Usd)),
            Some(money(2, Currency::Rub)),
        )
        .unwrap_err();

        assert_eq!(err.code, "PRICE_CURRENCY_MISMATCH");
    }
}
