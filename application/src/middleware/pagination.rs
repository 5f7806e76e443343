//! Current page [`Number`] of a request.

use std::convert::Infallible;

use axum::{
    async_trait,
    body::{self, Body, Bytes},
    extract::{FromRequest, FromRequestParts, Multipart, Request, State},
    middleware::Next,
    response::{IntoResponse as _, Response},
};
use common::pagination::Number;
use derive_more::{Display, From, Into};
use http::{request::Parts, Method, StatusCode};
use tracing as log;

use super::content_type_essence;

/// Name of the request parameter carrying the page [`Number`].
pub const PARAM: &str = "page";

/// Page [`Number`] requested by the client.
///
/// Defaults to [`Number::FIRST`].
#[derive(Clone, Copy, Debug, Default, Display, Eq, From, Into, PartialEq)]
pub struct Page(pub Number);

#[async_trait]
impl<S> FromRequestParts<S> for Page
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().copied().unwrap_or_default())
    }
}

/// Configuration of the [`inject`] middleware.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Maximum size (in bytes) of a form body to buffer.
    pub body_limit: usize,
}

/// Middleware attaching the requested [`Page`] to the request extensions.
///
/// The `page` parameter of a URL-encoded or multipart `POST` form body takes
/// precedence over the one in the query string. The body is restored for the
/// handler.
pub async fn inject(
    State(config): State<Config>,
    req: Request,
    next: Next,
) -> Response {
    let query_value = req.uri().query().and_then(last_param);

    let (mut parts, body) = req.into_parts();
    let (body_value, body) = if let Some(form) = Form::of(&parts) {
        let bytes = match body::to_bytes(body, config.body_limit).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("failed to buffer form body: {e}");
                return StatusCode::PAYLOAD_TOO_LARGE.into_response();
            }
        };
        let value = match form {
            Form::UrlEncoded => last_param(&bytes),
            Form::Multipart => {
                last_multipart_param(&parts, bytes.clone()).await
            }
        };
        (value, Body::from(bytes))
    } else {
        (None, body)
    };

    let page = Page(Number::parse_or_first(
        body_value.or(query_value).as_deref(),
    ));
    _ = parts.extensions.insert(page);

    next.run(Request::from_parts(parts, body)).await
}

/// Encoding of a `POST` form body.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Form {
    /// `application/x-www-form-urlencoded` body.
    UrlEncoded,

    /// `multipart/form-data` body.
    Multipart,
}

impl Form {
    /// Detects the [`Form`] of the request, if it is a `POST` of a form.
    fn of(parts: &Parts) -> Option<Self> {
        if parts.method != Method::POST {
            return None;
        }
        match content_type_essence(&parts.headers)?.as_str() {
            "application/x-www-form-urlencoded" => Some(Self::UrlEncoded),
            "multipart/form-data" => Some(Self::Multipart),
            _ => None,
        }
    }
}

/// Returns the last value of the [`PARAM`] in the provided URL-encoded
/// `input`.
fn last_param(input: impl AsRef<[u8]>) -> Option<String> {
    url::form_urlencoded::parse(input.as_ref())
        .filter(|(k, _)| k == PARAM)
        .last()
        .map(|(_, v)| v.into_owned())
}

/// Returns the last value of the [`PARAM`] field in the provided
/// `multipart/form-data` body.
///
/// A body that fails to parse stops the lookup at the broken part.
async fn last_multipart_param(parts: &Parts, bytes: Bytes) -> Option<String> {
    let mut req = Request::new(Body::from(bytes));
    *req.headers_mut() = parts.headers.clone();
    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(|e| log::debug!("malformed multipart form: {e}"))
        .ok()?;

    let mut found = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some(PARAM) {
            found = field.text().await.ok();
        }
    }
    found
}

#[cfg(test)]
mod spec {
    use axum::{body::Body, routing::post, Router};
    use http::{header, Request, StatusCode};
    use http_body_util::BodyExt as _;
    use tower::ServiceExt as _;

    use super::{inject, last_param, Config, Page};

    fn app() -> Router {
        Router::new()
            .route(
                "/estates",
                post(|page: Page, body: String| async move {
                    format!("{page}|{body}")
                })
                .get(|page: Page| async move { page.to_string() }),
            )
            .layer(axum::middleware::from_fn_with_state(
                Config { body_limit: 256 },
                inject,
            ))
    }

    async fn request(req: Request<Body>) -> (StatusCode, String) {
        let resp = app().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn form(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn takes_last_page_param() {
        assert_eq!(last_param("a=1&page=2&page=5").as_deref(), Some("5"));
        assert_eq!(last_param("pages=2"), None);
        assert_eq!(last_param(""), None);
    }

    #[tokio::test]
    async fn reads_page_from_query() {
        assert_eq!(request(get("/estates?page=3")).await.1, "3");
    }

    #[tokio::test]
    async fn falls_back_to_first_page() {
        for uri in [
            "/estates",
            "/estates?page=abc",
            "/estates?page=",
            "/estates?page=0",
            "/estates?page=-2",
        ] {
            assert_eq!(request(get(uri)).await.1, "1", "{uri}");
        }
    }

    #[tokio::test]
    async fn prefers_form_body_over_query() {
        let (status, body) =
            request(form("/estates?page=7", "city=Moscow&page=2")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "2|city=Moscow&page=2");
    }

    #[tokio::test]
    async fn prefers_multipart_body_over_query() {
        const BODY: &str = "--XX\r\n\
            Content-Disposition: form-data; name=\"city\"\r\n\r\n\
            Moscow\r\n\
            --XX\r\n\
            Content-Disposition: form-data; name=\"page\"\r\n\r\n\
            2\r\n\
            --XX--\r\n";
        let req = Request::builder()
            .method("POST")
            .uri("/estates?page=7")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XX")
            .body(Body::from(BODY))
            .unwrap();

        let (status, body) = request(req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("2|{BODY}"));
    }

    #[tokio::test]
    async fn uses_query_when_multipart_body_has_no_page() {
        const BODY: &str = "--XX\r\n\
            Content-Disposition: form-data; name=\"city\"\r\n\r\n\
            Moscow\r\n\
            --XX--\r\n";
        let req = Request::builder()
            .method("POST")
            .uri("/estates?page=4")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XX")
            .body(Body::from(BODY))
            .unwrap();

        assert_eq!(request(req).await.1, format!("4|{BODY}"));
    }

    #[tokio::test]
    async fn malformed_body_param_does_not_fall_through_to_query() {
        assert_eq!(
            request(form("/estates?page=7", "page=x")).await.1,
            "1|page=x",
        );
    }

    #[tokio::test]
    async fn uses_query_when_body_has_no_page() {
        assert_eq!(
            request(form("/estates?page=4", "city=Moscow")).await.1,
            "4|city=Moscow",
        );
    }

    #[tokio::test]
    async fn rejects_oversized_form_body() {
        let req = Request::builder()
            .method("POST")
            .uri("/estates")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("x".repeat(257)))
            .unwrap();

        assert_eq!(request(req).await.0, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn leaves_other_bodies_untouched() {
        let req = Request::builder()
            .method("POST")
            .uri("/estates?page=5")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"page":2}"#))
            .unwrap();

        assert_eq!(request(req).await.1, r#"5|{"page":2}"#);
    }
}
