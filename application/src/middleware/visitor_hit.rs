//! Tracking of page views as [`VisitorHit`]s.
//!
//! [`VisitorHit`]: service::domain::VisitorHit

use std::{fmt, future::Future, net::IpAddr, sync::Arc};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_client_ip::InsecureClientIp;
use axum_extra::headers::{
    authorization::Bearer, Authorization, HeaderMapExt as _,
};
use http::{header, HeaderMap};
use service::{
    command::{self, Command as _, RecordVisitorHit},
    domain::{
        user::{self, session},
        visitor_hit::{Host, Referrer, SessionKey, Url, UserAgent},
    },
};
use tracing as log;

use crate::Service;

use super::is_ajax;

/// Recorder of [`RecordVisitorHit`]s.
pub trait Recorder: Clone + Send + Sync + 'static {
    /// Error of recording a [`RecordVisitorHit`].
    type Error: fmt::Display + Send;

    /// Resolves the [`user::Id`] the provided [`session::Token`] belongs to.
    ///
    /// [`None`] is returned for invalid or expired [`session::Token`]s.
    fn authorize(
        &self,
        token: session::Token,
    ) -> impl Future<Output = Option<user::Id>> + Send;

    /// Records the provided [`RecordVisitorHit`].
    fn record(
        &self,
        hit: RecordVisitorHit,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl Recorder for Service {
    type Error = String;

    async fn authorize(&self, token: session::Token) -> Option<user::Id> {
        self.execute(command::AuthorizeUserSession { token })
            .await
            .map_err(|e| log::debug!("visitor is not authorized: {e}"))
            .ok()
            .map(|out| out.user.id)
    }

    async fn record(&self, hit: RecordVisitorHit) -> Result<(), Self::Error> {
        self.execute(hit).await.map(drop).map_err(|e| e.to_string())
    }
}

/// State of the [`track`] middleware.
#[derive(Clone, Debug)]
pub struct Tracker<R> {
    /// [`Recorder`] of the tracked hits.
    pub recorder: R,

    /// Path prefix of the admin area, which is not tracked.
    pub admin_prefix: Arc<str>,
}

/// Middleware recording a [`RecordVisitorHit`] before serving the request.
///
/// AJAX requests, admin area requests and requests of known crawlers are not
/// tracked. Failure to record is logged and never fails the request.
pub async fn track<R: Recorder>(
    State(tracker): State<Tracker<R>>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(visit) = Visit::of(&req, &tracker.admin_prefix) {
        let user_id = match visit.token.clone() {
            Some(token) => tracker.recorder.authorize(token).await,
            None => None,
        };
        if let Err(e) = tracker.recorder.record(visit.into_hit(user_id)).await
        {
            log::error!("failed to record visitor hit: {e}");
        }
    }
    next.run(req).await
}

/// Trackable data of a request.
#[derive(Debug)]
struct Visit {
    /// Bearer [`session::Token`] of the visitor, if any.
    token: Option<session::Token>,

    /// [`UserAgent`] of the visitor.
    user_agent: UserAgent,

    /// IP address of the visitor, if known.
    ip_address: Option<IpAddr>,

    /// Indicator whether the request is made over HTTPS.
    secure: bool,

    /// [`Referrer`] of the request.
    referrer: Option<Referrer>,

    /// [`Host`] the request is made to.
    host: Option<Host>,

    /// Requested [`Url`].
    url: Url,
}

impl Visit {
    /// Collects a [`Visit`] out of the provided [`Request`], unless it must not
    /// be tracked.
    fn of(req: &Request, admin_prefix: &str) -> Option<Self> {
        let headers = req.headers();
        if is_ajax(headers) || req.uri().path().starts_with(admin_prefix) {
            return None;
        }
        let user_agent =
            UserAgent::new(header_str(headers, header::USER_AGENT));
        if user_agent.is_crawler() {
            return None;
        }

        Some(Self {
            token: headers
                .typed_get::<Authorization<Bearer>>()
                .and_then(|auth| auth.token().parse().ok()),
            user_agent,
            ip_address: InsecureClientIp::from(headers, req.extensions())
                .ok()
                .map(|ip| ip.0),
            secure: is_secure(req),
            referrer: Referrer::new(header_str(headers, header::REFERER)),
            host: Host::new(header_str(headers, header::HOST)),
            url: Url::new(
                req.uri()
                    .path_and_query()
                    .map_or_else(|| req.uri().path(), |pq| pq.as_str()),
            ),
        })
    }

    /// Turns this [`Visit`] into a [`RecordVisitorHit`] of the provided
    /// visitor.
    fn into_hit(self, user_id: Option<user::Id>) -> RecordVisitorHit {
        let session_key = match (&self.token, user_id) {
            (Some(token), Some(_)) => SessionKey::authenticated(token),
            _ => SessionKey::anonymous(self.ip_address, &self.user_agent),
        };
        RecordVisitorHit {
            user_id,
            user_agent: self.user_agent,
            ip_address: self.ip_address,
            session_key,
            secure: self.secure,
            referrer: self.referrer,
            host: self.host,
            url: self.url,
        }
    }
}

/// Returns the value of the provided header, or an empty string.
fn header_str(headers: &HeaderMap, name: header::HeaderName) -> &str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Indicates whether the [`Request`] is made over HTTPS.
fn is_secure(req: &Request) -> bool {
    req.uri().scheme() == Some(&http::uri::Scheme::HTTPS)
        || req
            .headers()
            .get("X-Forwarded-Proto")
            .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"https"))
}

#[cfg(test)]
mod spec {
    use std::sync::{Arc, Mutex};

    use axum::{body::Body, routing::get, Router};
    use http::{header, Request, StatusCode};
    use service::{
        command::RecordVisitorHit,
        domain::user::{self, session},
    };
    use tower::ServiceExt as _;

    use super::{track, Recorder, Tracker};

    const TOKEN: &str = "header.claims.signature";

    #[derive(Clone, Debug, Default)]
    struct Fake {
        hits: Arc<Mutex<Vec<RecordVisitorHit>>>,
        user: Option<user::Id>,
        broken: bool,
    }

    impl Recorder for Fake {
        type Error = &'static str;

        async fn authorize(&self, token: session::Token) -> Option<user::Id> {
            (token.as_ref() == TOKEN).then_some(self.user).flatten()
        }

        async fn record(
            &self,
            hit: RecordVisitorHit,
        ) -> Result<(), Self::Error> {
            if self.broken {
                return Err("database is down");
            }
            self.hits.lock().unwrap().push(hit);
            Ok(())
        }
    }

    async fn visit(fake: &Fake, req: Request<Body>) -> StatusCode {
        Router::new()
            .route("/", get(|| async { "page" }))
            .route("/*path", get(|| async { "page" }))
            .layer(axum::middleware::from_fn_with_state(
                Tracker {
                    recorder: fake.clone(),
                    admin_prefix: "/admin/".into(),
                },
                track::<Fake>,
            ))
            .oneshot(req)
            .await
            .unwrap()
            .status()
    }

    fn page(uri: &str) -> http::request::Builder {
        Request::builder()
            .uri(uri)
            .header(header::USER_AGENT, "Mozilla/5.0 (X11; Linux x86_64)")
            .header("X-Forwarded-For", "198.51.100.4")
    }

    #[tokio::test]
    async fn records_anonymous_visit() {
        let fake = Fake::default();

        let status = visit(
            &fake,
            page("/estates?page=2")
                .header(header::HOST, "estates.example.com")
                .header(header::REFERER, "https://search.example.com/")
                .header("X-Forwarded-Proto", "https")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let hits = fake.hits.lock().unwrap();
        let [hit] = hits.as_slice() else {
            panic!("expected exactly one hit, got: {hits:?}");
        };
        assert_eq!(hit.user_id, None);
        assert_eq!(hit.url.as_ref(), "/estates?page=2");
        assert_eq!(hit.host.as_ref().unwrap().as_ref(), "estates.example.com");
        assert_eq!(
            hit.referrer.as_ref().unwrap().as_ref(),
            "https://search.example.com/",
        );
        assert!(hit.secure);
        assert_eq!(hit.ip_address.unwrap().to_string(), "198.51.100.4");
        assert_eq!(
            hit.session_key.as_ref(),
            "198.51.100.4:Mozilla/5.0 (X11; Linux x86",
        );
    }

    #[tokio::test]
    async fn records_authenticated_visit() {
        let fake = Fake {
            user: Some(user::Id::new()),
            ..Fake::default()
        };

        _ = visit(
            &fake,
            page("/")
                .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        let hits = fake.hits.lock().unwrap();
        assert_eq!(hits[0].user_id, fake.user);
        assert_eq!(
            hits[0].session_key.as_ref(),
            TOKEN.parse::<session::Token>().unwrap().digest(),
        );
        assert!(!hits[0].secure);
    }

    #[tokio::test]
    async fn invalid_token_is_tracked_anonymously() {
        let fake = Fake {
            user: Some(user::Id::new()),
            ..Fake::default()
        };

        _ = visit(
            &fake,
            page("/")
                .header(header::AUTHORIZATION, "Bearer forged")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        let hits = fake.hits.lock().unwrap();
        assert_eq!(hits[0].user_id, None);
        assert!(hits[0].session_key.as_ref().starts_with("198.51.100.4:"));
    }

    #[tokio::test]
    async fn skips_untracked_requests() {
        let fake = Fake::default();

        for req in [
            page("/estates")
                .header("X-Requested-With", "XMLHttpRequest")
                .body(Body::empty())
                .unwrap(),
            page("/admin/estates").body(Body::empty()).unwrap(),
            Request::builder()
                .uri("/estates")
                .header(
                    header::USER_AGENT,
                    "Mozilla/5.0 (compatible; YandexBot/3.0)",
                )
                .body(Body::empty())
                .unwrap(),
        ] {
            assert_eq!(visit(&fake, req).await, StatusCode::OK);
        }

        assert!(fake.hits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn recording_failure_does_not_fail_request() {
        let fake = Fake {
            broken: true,
            ..Fake::default()
        };

        let status = visit(&fake, page("/").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert!(fake.hits.lock().unwrap().is_empty());
    }
}
