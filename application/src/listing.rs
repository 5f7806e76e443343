//! JSON listing of [`Estate`]s split into numbered pages.

use std::num::NonZeroU32;

use axum::{
    extract::{rejection::QueryRejection, Query},
    Extension, Json,
};
use common::pagination::{Number, Window};
use http::Uri;
use serde::{Deserialize, Serialize};
use service::{
    domain::{estate, taxon, Estate},
    query,
    read::{self, estate::numbered},
    Query as _,
};
use tracing as log;
use url::form_urlencoded;

use crate::{
    define_error,
    middleware::{current_request, pagination, Page},
    AsError, Error, Service,
};

/// Configuration of the [`estates`] handler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Number of [`Estate`]s on a page.
    pub page_size: NonZeroU32,
}

/// Filter accepted in the query string of the listing.
///
/// Filters are read from the query string only, for `POST` requests too. A
/// form body contributes the requested [`Page`] number and nothing else.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Filter {
    /// [`taxon::Id`] of the estate type to match.
    pub kind: Option<taxon::Id>,

    /// Rent flag to match.
    pub rent: Option<bool>,

    /// Housing flag to match.
    pub housing: Option<bool>,

    /// City to match.
    pub city: Option<String>,
}

impl From<Filter> for read::estate::Filter {
    fn from(filter: Filter) -> Self {
        Self {
            kind: filter.kind,
            rent: filter.rent,
            housing: filter.housing,
            city: filter.city.and_then(|c| estate::City::new(c.trim())),
            ..Self::default()
        }
    }
}

/// Numbered page of the listing.
#[derive(Debug, Serialize)]
pub struct Listing {
    /// Number of this page.
    pub page: u32,

    /// Total number of pages.
    pub pages: u64,

    /// Total number of listed [`Estate`]s.
    pub total: u64,

    /// [`Summary`]s of the [`Estate`]s on this page.
    pub estates: Vec<Summary>,

    /// Link to the next page, if any.
    pub next: Option<String>,

    /// Link to the previous page, if any.
    pub previous: Option<String>,
}

/// Publicly visible summary of an [`Estate`].
#[derive(Debug, Serialize)]
pub struct Summary {
    /// ID of the [`Estate`].
    pub id: estate::Id,

    /// Name of the [`Estate`].
    pub name: String,

    /// [`taxon::Id`] of the estate type.
    pub kind: taxon::Id,

    /// Country the [`Estate`] is located in.
    pub country: String,

    /// City the [`Estate`] is located in.
    pub city: String,

    /// Exact address, present only when the location is public.
    pub address: Option<String>,

    /// Price with its currency code, like `100000USD`.
    pub price: String,

    /// Gross area in square metres.
    pub gross_size: String,

    /// Living area in square metres.
    pub live_size: String,

    /// Price of one square metre with its currency code.
    pub cost_meter: String,

    /// Indicator whether the [`Estate`] is offered for rent.
    pub rent: bool,

    /// Indicator whether the [`Estate`] is a housing.
    pub housing: bool,
}

impl From<&Estate> for Summary {
    fn from(estate: &Estate) -> Self {
        let details = &estate.details;
        Self {
            id: estate.id,
            name: details.data.name.to_string(),
            kind: details.kind,
            country: details.location.country.to_string(),
            city: details.location.city.to_string(),
            address: details
                .location
                .address
                .as_ref()
                .filter(|_| estate.reveals_location_to(None))
                .map(ToString::to_string),
            price: details.price.to_string(),
            gross_size: details.gross_size.to_string(),
            live_size: details.live_size.to_string(),
            cost_meter: estate.cost_meter().to_string(),
            rent: details.rent,
            housing: details.housing,
        }
    }
}

define_error! {
    enum ListingError {
        #[code = "INVALID_FILTER"]
        #[status = BAD_REQUEST]
        #[message = "Malformed listing filter in the query string"]
        InvalidFilter,
    }
}

/// Lists enabled [`Estate`]s on the requested [`Page`].
///
/// # Errors
///
/// If the filter is malformed, or the database fails.
#[tracing::instrument(skip_all)]
pub async fn estates(
    Extension(service): Extension<Service>,
    Extension(config): Extension<Config>,
    Page(number): Page,
    filter: Result<Query<Filter>, QueryRejection>,
) -> Result<Json<Listing>, Error> {
    let Query(filter) = filter.map_err(|e| {
        log::debug!("rejected listing filter: {e}");
        Error::from(ListingError::InvalidFilter)
    })?;
    log::debug!("listing page {number} of estates");
    let window = Window {
        number,
        size: config.page_size,
    };

    let page = service
        .execute(query::estates::Numbered::by(
            read::estate::numbered::Selector {
                window,
                filter: filter.into(),
            },
        ))
        .await
        .map_err(AsError::into_error)?;
    let mut by_id = service
        .execute(query::estates::ByIds::by(page.ids.clone()))
        .await
        .map_err(AsError::into_error)?;
    let estates = page
        .ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .map(|e| Summary::from(&e))
        .collect();

    let uri = current_request().map(|r| r.uri.clone());
    let (next, previous) = neighbours(uri.as_ref(), &page);

    Ok(Json(Listing {
        page: number.get(),
        pages: page.pages(),
        total: page.total.0,
        estates,
        next,
        previous,
    }))
}

/// Builds links to the next and the previous pages of the provided
/// [`numbered::Page`], if they exist.
fn neighbours(
    uri: Option<&Uri>,
    page: &numbered::Page,
) -> (Option<String>, Option<String>) {
    let number = page.window.number;
    let link = |n: Option<Number>| Some(page_link(uri?, n?));

    (
        link(number.next().filter(|_| page.has_next())),
        link(number.previous().filter(|_| page.has_previous())),
    )
}

/// Builds a link to the page with the provided [`Number`], preserving all
/// the other query parameters of the provided [`Uri`].
fn page_link(uri: &Uri, number: Number) -> String {
    let query = uri.query().unwrap_or_default();
    let mut out = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key != pagination::PARAM {
            _ = out.append_pair(&key, &value);
        }
    }
    _ = out.append_pair(pagination::PARAM, &number.to_string());

    format!("{}?{}", uri.path(), out.finish())
}

#[cfg(test)]
mod spec {
    use std::num::NonZeroU32;

    use common::pagination::{Number, Window};
    use http::Uri;
    use service::read::estate::{numbered, TotalCount};

    use super::{neighbours, page_link};

    fn page(number: u32, total: u64) -> numbered::Page {
        numbered::Page {
            window: Window {
                number: Number::new(number).unwrap(),
                size: NonZeroU32::new(10).unwrap(),
            },
            total: TotalCount(total),
            ids: vec![],
        }
    }

    #[test]
    fn links_existing_neighbours_only() {
        let uri: Uri = "/estates?rent=true&page=2".parse().unwrap();

        assert_eq!(
            neighbours(Some(&uri), &page(2, 30)),
            (
                Some("/estates?rent=true&page=3".into()),
                Some("/estates?rent=true&page=1".into()),
            ),
        );
        assert_eq!(
            neighbours(Some(&uri), &page(1, 30)),
            (Some("/estates?rent=true&page=2".into()), None),
        );
        assert_eq!(
            neighbours(Some(&uri), &page(3, 30)),
            (None, Some("/estates?rent=true&page=2".into())),
        );
        assert_eq!(neighbours(Some(&uri), &page(1, 0)), (None, None));
        assert_eq!(neighbours(None, &page(2, 30)), (None, None));
    }

    #[test]
    fn replaces_page_parameter() {
        let uri: Uri = "/estates?city=Kyiv&page=2&rent=true".parse().unwrap();

        assert_eq!(
            page_link(&uri, Number::new(3).unwrap()),
            "/estates?city=Kyiv&rent=true&page=3",
        );
    }

    #[test]
    fn appends_page_parameter() {
        let uri: Uri = "/estates".parse().unwrap();
        assert_eq!(page_link(&uri, Number::FIRST), "/estates?page=1");

        let uri: Uri = "/estates?page=x&page=4".parse().unwrap();
        assert_eq!(
            page_link(&uri, Number::new(5).unwrap()),
            "/estates?page=5",
        );
    }

    #[test]
    fn keeps_encoding_of_other_parameters() {
        let uri: Uri = "/estates?city=New+York".parse().unwrap();

        assert_eq!(
            page_link(&uri, Number::new(2).unwrap()),
            "/estates?city=New+York&page=2",
        );
    }
}
