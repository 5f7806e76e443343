//! [`Estate`]-related definitions.

use std::{collections::BTreeSet, future};

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{
    graphql_object, GraphQLInputObject, GraphQLObject, GraphQLScalar,
};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    define_error, AsError, Context, Error,
};

/// A real-estate listing.
#[derive(Clone, Debug)]
pub struct Estate {
    /// ID of this [`Estate`].
    id: Id,

    /// Underlying [`domain::Estate`].
    estate: OnceCell<domain::Estate>,
}

impl From<domain::Estate> for Estate {
    fn from(estate: domain::Estate) -> Self {
        Self {
            id: estate.id.into(),
            estate: OnceCell::new_with(Some(estate)),
        }
    }
}

impl Estate {
    /// Creates a new [`Estate`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Estate`] with the provided ID exists,
    /// otherwise accessing this [`Estate`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            estate: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Estate`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Estate`] doesn't exist.
    async fn estate(&self, ctx: &Context) -> Result<&domain::Estate, Error> {
        let id = self.id.into();
        self.estate
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::estate::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|e| {
                        future::ready(e.ok_or_else(|| {
                            api::query::EstateError::NotExists.into()
                        }))
                    })
            })
            .await
    }

    /// Returns the [`domain::estate::Details`] of this [`Estate`].
    async fn details(
        &self,
        ctx: &Context,
    ) -> Result<&domain::estate::Details, Error> {
        Ok(&self.estate(ctx).await?.details)
    }

    /// Indicates whether the exact location of this [`Estate`] may be shown
    /// to the current viewer.
    async fn reveals_location(&self, ctx: &Context) -> Result<bool, Error> {
        let viewer = ctx.viewer().await?;
        Ok(self.estate(ctx).await?.reveals_location_to(viewer))
    }
}

/// A real-estate listing.
#[graphql_object(context = Context)]
impl Estate {
    /// Unique identifier of this `Estate`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Estate.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Estate`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Estate.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<api::data::Name, Error> {
        Ok(self.details(ctx).await?.data.name.clone().into())
    }

    /// Name of this `Estate` in English, if it differs.
    pub async fn name_en(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::data::Name>, Error> {
        Ok(self.details(ctx).await?.data.name_en.clone().map(Into::into))
    }

    /// Description of this `Estate`.
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::data::Description>, Error> {
        Ok(self
            .details(ctx)
            .await?
            .data
            .description
            .clone()
            .map(Into::into))
    }

    /// Indicator whether this `Estate` is listed publicly.
    pub async fn enabled(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.details(ctx).await?.data.enabled)
    }

    /// Position of this `Estate` in listings. Lower goes first.
    pub async fn position(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.details(ctx).await?.data.position.into())
    }

    /// Type of this `Estate`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Estate.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn kind(&self, ctx: &Context) -> Result<api::Taxon, Error> {
        api::Taxon::load(self.details(ctx).await?.kind, ctx).await
    }

    /// Country of this `Estate`.
    pub async fn country(&self, ctx: &Context) -> Result<Country, Error> {
        Ok(self.details(ctx).await?.location.country.clone().into())
    }

    /// Region of this `Estate`.
    pub async fn region(
        &self,
        ctx: &Context,
    ) -> Result<Option<Region>, Error> {
        Ok(self
            .details(ctx)
            .await?
            .location
            .region
            .clone()
            .map(Into::into))
    }

    /// City of this `Estate`.
    pub async fn city(&self, ctx: &Context) -> Result<City, Error> {
        Ok(self.details(ctx).await?.location.city.clone().into())
    }

    /// Exact address of this `Estate`.
    ///
    /// Hidden from everyone but the owner, unless `locationPublic` is set.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Estate.address",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn address(
        &self,
        ctx: &Context,
    ) -> Result<Option<Address>, Error> {
        if !self.reveals_location(ctx).await? {
            return Ok(None);
        }
        Ok(self
            .details(ctx)
            .await?
            .location
            .address
            .clone()
            .map(Into::into))
    }

    /// Zip code of this `Estate`.
    pub async fn zip_code(
        &self,
        ctx: &Context,
    ) -> Result<Option<ZipCode>, Error> {
        Ok(self
            .details(ctx)
            .await?
            .location
            .zip_code
            .clone()
            .map(Into::into))
    }

    /// Indicator whether the exact location of this `Estate` is public.
    pub async fn location_public(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.details(ctx).await?.location_public)
    }

    /// Geographical coordinates of this `Estate`.
    ///
    /// Hidden the same way as `address`.
    pub async fn coordinates(
        &self,
        ctx: &Context,
    ) -> Result<Option<Coordinates>, Error> {
        if !self.reveals_location(ctx).await? {
            return Ok(None);
        }
        Ok(self.details(ctx).await?.coordinates.map(Into::into))
    }

    /// Price of this `Estate`.
    pub async fn price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.details(ctx).await?.price)
    }

    /// Gross area of this `Estate`.
    pub async fn gross_size(&self, ctx: &Context) -> Result<Area, Error> {
        Ok(self.details(ctx).await?.gross_size.into())
    }

    /// Living area of this `Estate`.
    pub async fn live_size(&self, ctx: &Context) -> Result<Area, Error> {
        Ok(self.details(ctx).await?.live_size.into())
    }

    /// Price of one square metre of this `Estate`.
    ///
    /// Zero if the gross area is zero.
    pub async fn cost_meter(&self, ctx: &Context) -> Result<Money, Error> {
        let domain::estate::CostPerMeter { amount, currency } =
            self.estate(ctx).await?.cost_meter();
        Ok(Money { amount, currency })
    }

    /// Year this `Estate` was built in.
    pub async fn construction_year(
        &self,
        ctx: &Context,
    ) -> Result<Option<i32>, Error> {
        Ok(self
            .details(ctx)
            .await?
            .construction_year
            .map(|y| y.get().into()))
    }

    /// Total number of rooms in this `Estate`.
    pub async fn total_room(
        &self,
        ctx: &Context,
    ) -> Result<Option<i32>, Error> {
        Ok(self.details(ctx).await?.total_room.map(Into::into))
    }

    /// Floor this `Estate` is on.
    pub async fn floor(&self, ctx: &Context) -> Result<Option<i32>, Error> {
        Ok(self.details(ctx).await?.floor.map(Into::into))
    }

    /// Total number of floors in the building.
    pub async fn total_floor(
        &self,
        ctx: &Context,
    ) -> Result<Option<i32>, Error> {
        Ok(self.details(ctx).await?.total_floor.map(Into::into))
    }

    /// Indicator whether this `Estate` is a housing.
    pub async fn housing(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.details(ctx).await?.housing)
    }

    /// Indicator whether this `Estate` is offered for rent.
    pub async fn rent(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.details(ctx).await?.rent)
    }

    /// Materials this `Estate` is made of.
    pub async fn materials(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Taxon>, Error> {
        api::Taxon::load_many(&self.details(ctx).await?.materials, ctx).await
    }

    /// Interior trims of this `Estate`.
    pub async fn interior(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Taxon>, Error> {
        api::Taxon::load_many(&self.details(ctx).await?.interior, ctx).await
    }

    /// Exterior trims of this `Estate`.
    pub async fn exterior(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Taxon>, Error> {
        api::Taxon::load_many(&self.details(ctx).await?.exterior, ctx).await
    }

    /// Features of this `Estate`.
    pub async fn features(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Taxon>, Error> {
        api::Taxon::load_many(&self.details(ctx).await?.features, ctx).await
    }

    /// `CompassPoint`s this `Estate` faces.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Estate.compass",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn compass(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Compass>, Error> {
        let ids = &self.details(ctx).await?.compass;
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let mut found = ctx
            .service()
            .execute(query::compass::ByIds::by(ids.iter().copied().collect()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok(ids
            .iter()
            .filter_map(|id| found.remove(id))
            .map(Into::into)
            .collect())
    }

    /// `Company` owning this `Estate`, if any.
    pub async fn company(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Company>, Error> {
        Ok(self.details(ctx).await?.company_id.map(|id| {
            #[expect(
                unsafe_code,
                reason = "foreign key guarantees `Company` existence"
            )]
            unsafe {
                api::Company::new_unchecked(id)
            }
        }))
    }

    /// `User` owning this `Estate`, if any.
    pub async fn owner(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::User>, Error> {
        Ok(self.estate(ctx).await?.user_id.map(|id| {
            #[expect(
                unsafe_code,
                reason = "foreign key guarantees `User` existence"
            )]
            unsafe {
                api::User::new_unchecked(id)
            }
        }))
    }

    /// `Room`s of this `Estate`, in list order.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Estate.rooms",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rooms(&self, ctx: &Context) -> Result<Vec<api::Rm>, Error> {
        ctx.service()
            .execute(query::rms::ByEstate::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rms| rms.into_iter().map(Into::into).collect())
    }

    /// `DateTime` when this `Estate` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.estate(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Estate` was last modified.
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.estate(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of an `Estate`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::estate::Id)]
#[into(domain::estate::Id)]
#[graphql(name = "EstateId", transparent)]
pub struct Id(Uuid);

/// Country of an `Estate`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EstateCountry",
    with = scalar::Via::<domain::estate::Country>,
)]
pub struct Country(domain::estate::Country);

/// Region (state, province) of an `Estate`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EstateRegion",
    with = scalar::Via::<domain::estate::Region>,
)]
pub struct Region(domain::estate::Region);

/// City of an `Estate`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "EstateCity", with = scalar::Via::<domain::estate::City>)]
pub struct City(domain::estate::City);

/// Street address of an `Estate`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EstateAddress",
    with = scalar::Via::<domain::estate::Address>,
)]
pub struct Address(domain::estate::Address);

/// Zip code of an `Estate`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EstateZipCode",
    with = scalar::Via::<domain::estate::ZipCode>,
)]
pub struct ZipCode(domain::estate::ZipCode);

/// Area in square metres, like `"54.3"`.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(with = scalar::Via::<domain::estate::Area>)]
pub struct Area(domain::estate::Area);

/// Geographical coordinates of an `Estate`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "EstateCoordinates")]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: scalar::Decimal,

    /// Longitude in degrees.
    pub longitude: scalar::Decimal,
}

impl From<domain::estate::Coordinates> for Coordinates {
    fn from(coords: domain::estate::Coordinates) -> Self {
        Self {
            latitude: rust_decimal::Decimal::from(coords.latitude).into(),
            longitude: rust_decimal::Decimal::from(coords.longitude).into(),
        }
    }
}

/// Details of an `Estate` to create or update it with.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "EstateInput")]
pub struct Input {
    /// Descriptive data of the `Estate`.
    pub data: api::data::Input,

    /// `Taxon` of `ESTATE_TYPE` vocabulary.
    pub kind: api::taxon::Id,

    /// Country of the `Estate`.
    pub country: Country,

    /// Region of the `Estate`.
    pub region: Option<Region>,

    /// City of the `Estate`.
    pub city: City,

    /// Exact address of the `Estate`.
    pub address: Option<Address>,

    /// Zip code of the `Estate`.
    pub zip_code: Option<ZipCode>,

    /// Indicator whether the exact location is public. Defaults to `false`.
    pub location_public: Option<bool>,

    /// Latitude in degrees. Must be provided along with `longitude`.
    pub latitude: Option<scalar::Decimal>,

    /// Longitude in degrees. Must be provided along with `latitude`.
    pub longitude: Option<scalar::Decimal>,

    /// Price of the `Estate`.
    pub price: Money,

    /// Gross area of the `Estate`.
    pub gross_size: Area,

    /// Living area of the `Estate`.
    pub live_size: Area,

    /// Year the `Estate` was built in.
    pub construction_year: Option<i32>,

    /// Total number of rooms.
    pub total_room: Option<i32>,

    /// Floor the `Estate` is on.
    pub floor: Option<i32>,

    /// Total number of floors in the building.
    pub total_floor: Option<i32>,

    /// Indicator whether the `Estate` is a housing.
    pub housing: bool,

    /// Indicator whether the `Estate` is offered for rent.
    pub rent: bool,

    /// `Taxon`s of `MATERIAL` vocabulary.
    pub materials: Option<Vec<api::taxon::Id>>,

    /// `Taxon`s of `TRIM` vocabulary applicable to interiors.
    pub interior: Option<Vec<api::taxon::Id>>,

    /// `Taxon`s of `TRIM` vocabulary applicable to exteriors.
    pub exterior: Option<Vec<api::taxon::Id>>,

    /// `Taxon`s of `ESTATE_FEATURE` vocabulary.
    pub features: Option<Vec<api::taxon::Id>>,

    /// `CompassPoint`s the `Estate` faces.
    pub compass: Option<Vec<api::compass::Id>>,

    /// `Company` owning the `Estate`.
    pub company: Option<api::company::Id>,
}

impl TryFrom<Input> for domain::estate::Details {
    type Error = InputError;

    fn try_from(input: Input) -> Result<Self, Self::Error> {
        let coordinates = match (input.latitude, input.longitude) {
            (None, None) => None,
            (Some(lat), Some(lon)) => Some(domain::estate::Coordinates {
                latitude: domain::estate::Latitude::new(lat.into())
                    .ok_or(InputError::Coordinates)?,
                longitude: domain::estate::Longitude::new(lon.into())
                    .ok_or(InputError::Coordinates)?,
            }),
            (Some(_), None) | (None, Some(_)) => {
                return Err(InputError::Coordinates)
            }
        };
        let construction_year = input
            .construction_year
            .map(|y| {
                i16::try_from(y)
                    .ok()
                    .and_then(domain::estate::ConstructionYear::new)
                    .ok_or(InputError::ConstructionYear)
            })
            .transpose()?;

        Ok(Self {
            data: input.data.into(),
            kind: input.kind.into(),
            location: domain::estate::Location {
                country: input.country.into(),
                region: input.region.map(Into::into),
                city: input.city.into(),
                address: input.address.map(Into::into),
                zip_code: input.zip_code.map(Into::into),
            },
            location_public: input.location_public.unwrap_or_default(),
            coordinates,
            price: input.price,
            gross_size: input.gross_size.into(),
            live_size: input.live_size.into(),
            construction_year,
            total_room: count(input.total_room)?,
            floor: count(input.floor)?,
            total_floor: count(input.total_floor)?,
            housing: input.housing,
            rent: input.rent,
            materials: ids(input.materials),
            interior: ids(input.interior),
            exterior: ids(input.exterior),
            features: ids(input.features),
            compass: ids(input.compass),
            company_id: input.company.map(Into::into),
        })
    }
}

/// Converts an optional GraphQL number into a non-negative count.
fn count(n: Option<i32>) -> Result<Option<u16>, InputError> {
    n.map(|n| u16::try_from(n).map_err(|_| InputError::Number))
        .transpose()
}

/// Converts optional GraphQL IDs into a deduplicated set.
fn ids<I, T>(ids: Option<Vec<I>>) -> BTreeSet<T>
where
    I: Into<T>,
    T: Ord,
{
    ids.into_iter().flatten().map(Into::into).collect()
}

define_error! {
    enum InputError {
        #[code = "INVALID_COORDINATES"]
        #[status = BAD_REQUEST]
        #[message = "Latitude must be within [-90, 90] and longitude within \
                     [-180, 180], both provided or both omitted"]
        Coordinates,

        #[code = "INVALID_CONSTRUCTION_YEAR"]
        #[status = BAD_REQUEST]
        #[message = "Construction year must be a positive year"]
        ConstructionYear,

        #[code = "INVALID_NUMBER"]
        #[status = BAD_REQUEST]
        #[message = "Rooms and floors must be within [0, 65535]"]
        Number,
    }
}

pub mod list {
    //! Definitions related to the [`Estate`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Estate, Id};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Estate` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::estate::list::Cursor)]
    #[graphql(
        name = "EstateListCursor",
        with = scalar::Via::<read::estate::list::Cursor>,
    )]
    pub struct Cursor(pub read::estate::list::Cursor);

    /// Edge in the [`Estate`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::estate::list::Edge);

    /// Edge in the `Estate` list.
    #[graphql_object(name = "EstateListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `EstateListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `EstateListEdge`.
        #[must_use]
        pub fn node(&self) -> Estate {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees `Estate` \
                          existence"
            )]
            unsafe {
                Estate::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Estate`] list.
    #[derive(Clone, Debug)]
    pub struct Connection {
        /// Underlying [`read::estate::list::Connection`].
        page: read::estate::list::Connection,

        /// [`read::estate::Filter`] the list was selected with.
        filter: read::estate::Filter,
    }

    impl Connection {
        /// Creates a new [`Connection`] out of the selected `page`.
        #[must_use]
        pub fn new(
            page: read::estate::list::Connection,
            filter: read::estate::Filter,
        ) -> Self {
            Self { page, filter }
        }
    }

    /// Connection of the `Estate` list.
    #[graphql_object(name = "EstateListConnection", context = Context)]
    impl Connection {
        /// Edges of this `EstateListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.page.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            let info = self.page.page_info();
            PageInfo {
                has_next_page: info.has_next_page,
                has_previous_page: info.has_previous_page,
                start_cursor: info.start_cursor.map(Into::into),
                end_cursor: info.end_cursor.map(Into::into),
                filter: self.filter.clone(),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Debug)]
    pub struct PageInfo {
        /// Indicator whether there is a next page.
        has_next_page: bool,

        /// Indicator whether there is a previous page.
        has_previous_page: bool,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,

        /// [`read::estate::Filter`] to count the total with.
        filter: read::estate::Filter,
    }

    /// Information about an `EstateListConnection` page.
    #[graphql_object(name = "EstateListPageInfo", context = Context)]
    impl PageInfo {
        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.has_previous_page
        }

        /// Start cursor of the page.
        #[must_use]
        pub fn start_cursor(&self) -> &Option<Cursor> {
            &self.start_cursor
        }

        /// End cursor of the page.
        #[must_use]
        pub fn end_cursor(&self) -> &Option<Cursor> {
            &self.end_cursor
        }

        /// Total count of `Estate`s matching the list filter.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::estates::TotalCount::by(self.filter.clone()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(|total| i32::try_from(total.0).unwrap_or(i32::MAX))
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Money};
    use rust_decimal::Decimal;
    use service::domain;

    use super::{Input, InputError};

    fn input() -> Input {
        Input {
            data: crate::api::data::Input {
                name: domain::data::Name::new("Flat").unwrap().into(),
                name_en: None,
                description: None,
                enabled: None,
                position: None,
            },
            kind: domain::taxon::Id::new().into(),
            country: domain::estate::Country::new("Russia").unwrap().into(),
            region: None,
            city: domain::estate::City::new("Moscow").unwrap().into(),
            address: None,
            zip_code: None,
            location_public: None,
            latitude: None,
            longitude: None,
            price: Money {
                amount: Decimal::from(100_000),
                currency: Currency::Usd,
            },
            gross_size: "54.3".parse::<domain::estate::Area>().unwrap().into(),
            live_size: "40".parse::<domain::estate::Area>().unwrap().into(),
            construction_year: Some(1998),
            total_room: Some(2),
            floor: Some(3),
            total_floor: Some(9),
            housing: true,
            rent: false,
            materials: None,
            interior: None,
            exterior: None,
            features: None,
            compass: None,
            company: None,
        }
    }

    fn error(input: Input) -> InputError {
        domain::estate::Details::try_from(input).unwrap_err()
    }

    #[test]
    fn converts_valid_input() {
        let id = domain::taxon::Id::new();
        let details = domain::estate::Details::try_from(Input {
            latitude: Some(Decimal::new(55_751_244, 6).into()),
            longitude: Some(Decimal::new(37_618_423, 6).into()),
            materials: Some(vec![id.into(), id.into()]),
            ..input()
        })
        .unwrap();

        assert!(!details.location_public);
        assert!(details.coordinates.is_some());
        assert_eq!(details.floor, Some(3));
        assert_eq!(details.materials.len(), 1);
        assert_eq!(details.construction_year.unwrap().get(), 1998);
    }

    #[test]
    fn requires_both_coordinates() {
        let err = error(Input {
            latitude: Some(Decimal::ONE.into()),
            ..input()
        });
        assert!(matches!(err, InputError::Coordinates));

        let err = error(Input {
            latitude: Some(Decimal::from(91).into()),
            longitude: Some(Decimal::ONE.into()),
            ..input()
        });
        assert!(matches!(err, InputError::Coordinates));
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        let err = error(Input {
            construction_year: Some(0),
            ..input()
        });
        assert!(matches!(err, InputError::ConstructionYear));

        let err = error(Input {
            floor: Some(-1),
            ..input()
        });
        assert!(matches!(err, InputError::Number));
    }
}
