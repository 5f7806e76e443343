//! Task-local access to the request being currently served.

use std::{net::IpAddr, sync::Arc};

use axum::{extract::Request, middleware::Next, response::Response};
use axum_client_ip::InsecureClientIp;
use http::{HeaderMap, Method, Uri};

tokio::task_local! {
    /// [`Snapshot`] of the request served by the current task.
    static CURRENT: Arc<Snapshot>;
}

/// Immutable snapshot of an HTTP request.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// [`Method`] of the request.
    pub method: Method,

    /// [`Uri`] of the request.
    pub uri: Uri,

    /// Headers of the request.
    pub headers: HeaderMap,

    /// IP address of the client, if known.
    pub client_ip: Option<IpAddr>,
}

impl Snapshot {
    /// Takes a [`Snapshot`] of the provided [`Request`].
    fn of(req: &Request) -> Self {
        Self {
            method: req.method().clone(),
            uri: req.uri().clone(),
            headers: req.headers().clone(),
            client_ip: InsecureClientIp::from(req.headers(), req.extensions())
                .ok()
                .map(|ip| ip.0),
        }
    }
}

/// Returns the [`Snapshot`] of the request served by the current task.
///
/// [`None`] is returned outside of a [`scope`].
#[must_use]
pub fn current_request() -> Option<Arc<Snapshot>> {
    CURRENT.try_with(Arc::clone).ok()
}

/// Middleware making a [`Snapshot`] of the request available via
/// [`current_request()`] for the whole downstream processing.
pub async fn scope(req: Request, next: Next) -> Response {
    let snapshot = Arc::new(Snapshot::of(&req));
    CURRENT.scope(snapshot, next.run(req)).await
}

#[cfg(test)]
mod spec {
    use axum::{body::Body, routing::get, Router};
    use http::{Request, StatusCode};
    use http_body_util::BodyExt as _;
    use tower::ServiceExt as _;

    use super::{current_request, scope};

    fn app() -> Router {
        Router::new()
            .route(
                "/estates",
                get(|| async {
                    current_request().map_or_else(
                        || "none".to_owned(),
                        |r| format!("{} {}", r.method, r.uri),
                    )
                }),
            )
            .layer(axum::middleware::from_fn(scope))
    }

    #[test]
    fn is_none_outside_of_request() {
        assert!(current_request().is_none());
    }

    #[tokio::test]
    async fn is_some_inside_of_request() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri("/estates?page=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"GET /estates?page=2");
        assert!(current_request().is_none());
    }

    #[tokio::test]
    async fn takes_client_ip_from_forwarding_headers() {
        let app = Router::new()
            .route(
                "/",
                get(|| async {
                    current_request()
                        .and_then(|r| r.client_ip)
                        .map(|ip| ip.to_string())
                        .unwrap_or_default()
                }),
            )
            .layer(axum::middleware::from_fn(scope));

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("X-Forwarded-For", "203.0.113.7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"203.0.113.7");
    }
}
