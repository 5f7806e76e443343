//! Flash [`Messages`] delivered to AJAX clients inside JSON responses.

use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    body::{self, Body},
    extract::Request,
    middleware::Next,
    response::{IntoResponse as _, Response},
};
use http::{header, StatusCode};
use serde::Serialize;
use tracing as log;

use super::{content_type_essence, is_ajax};

/// Key the queued [`Message`]s are injected under.
pub const KEY: &str = "core_messages";

/// Response content types the [`Message`]s are injected into.
const SCRIPT_CONTENT_TYPES: &[&str] =
    &["application/javascript", "application/json"];

/// Severity of a [`Message`].
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Level {
    /// Development-related information.
    Debug,

    /// Informational message for the user.
    Info,

    /// Action was successful.
    Success,

    /// Failure did not occur, but may be imminent.
    Warning,

    /// Action was not successful.
    Error,
}

impl Level {
    /// Returns the numeric value of this [`Level`].
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Debug => 10,
            Self::Info => 20,
            Self::Success => 25,
            Self::Warning => 30,
            Self::Error => 40,
        }
    }

    /// Returns the tag of this [`Level`].
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Flash message queued by a handler.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Message {
    /// [`Level`] of this [`Message`].
    pub level: Level,

    /// Text of this [`Message`].
    pub text: String,

    /// Extra space-separated tags of this [`Message`].
    pub extra_tags: String,
}

impl Message {
    /// Returns all the tags of this [`Message`]: the [`Level::tag()`]
    /// followed by the [`Message::extra_tags`].
    #[must_use]
    pub fn tags(&self) -> String {
        let extra = self.extra_tags.trim();
        if extra.is_empty() {
            self.level.tag().to_owned()
        } else {
            format!("{} {extra}", self.level.tag())
        }
    }
}

/// JSON representation of a [`Message`].
#[derive(Debug, Serialize)]
struct Payload<'m> {
    level: u8,
    message: &'m str,
    extra_tags: String,
}

impl<'m> From<&'m Message> for Payload<'m> {
    fn from(msg: &'m Message) -> Self {
        Self {
            level: msg.level.value(),
            message: &msg.text,
            extra_tags: msg.tags(),
        }
    }
}

/// Per-request store of queued [`Message`]s.
///
/// Clones share the same queue.
#[derive(Clone, Debug, Default)]
pub struct Messages(Arc<Mutex<Vec<Message>>>);

impl Messages {
    /// Queues a new [`Message`].
    pub fn add(
        &self,
        level: Level,
        text: impl Into<String>,
        extra_tags: impl Into<String>,
    ) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Message {
                level,
                text: text.into(),
                extra_tags: extra_tags.into(),
            });
    }

    /// Queues a new [`Level::Info`] [`Message`].
    pub fn info(&self, text: impl Into<String>) {
        self.add(Level::Info, text, "");
    }

    /// Queues a new [`Level::Success`] [`Message`].
    pub fn success(&self, text: impl Into<String>) {
        self.add(Level::Success, text, "");
    }

    /// Queues a new [`Level::Warning`] [`Message`].
    pub fn warning(&self, text: impl Into<String>) {
        self.add(Level::Warning, text, "");
    }

    /// Takes all the queued [`Message`]s out of this store.
    #[must_use]
    pub fn drain(&self) -> Vec<Message> {
        std::mem::take(
            &mut *self.0.lock().unwrap_or_else(PoisonError::into_inner),
        )
    }
}

/// Middleware providing a [`Messages`] store to handlers and injecting the
/// queued [`Message`]s into JSON object responses to AJAX requests.
///
/// A response body that is not a JSON object is returned untouched.
pub async fn inject(mut req: Request, next: Next) -> Response {
    let messages = Messages::default();
    _ = req.extensions_mut().insert(messages.clone());
    let ajax = is_ajax(req.headers());

    let resp = next.run(req).await;
    let scripted = content_type_essence(resp.headers())
        .is_some_and(|t| SCRIPT_CONTENT_TYPES.contains(&t.as_str()));
    if !ajax || !scripted {
        _ = discard(&messages, "response is not an AJAX script");
        return resp;
    }

    let (mut parts, body) = resp.into_parts();
    let bytes = match body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("failed to read response body: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let Ok(serde_json::Value::Object(mut content)) =
        serde_json::from_slice(&bytes)
    else {
        _ = discard(&messages, "response body is not a JSON object");
        return Response::from_parts(parts, Body::from(bytes));
    };

    let queued = messages.drain();
    let payload = queued.iter().map(Payload::from).collect::<Vec<_>>();
    let rewritten = serde_json::to_value(payload).and_then(|msgs| {
        _ = content.insert(KEY.to_owned(), msgs);
        serde_json::to_vec(&content)
    });
    match rewritten {
        Ok(rewritten) => {
            _ = parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(rewritten))
        }
        Err(e) => {
            log::error!("failed to serialize `{KEY}`: {e}");
            Response::from_parts(parts, Body::from(bytes))
        }
    }
}

/// Drops the undelivered [`Message`]s, logging their number and the
/// `reason`.
fn discard(messages: &Messages, reason: &str) -> usize {
    let dropped = messages.drain().len();
    if dropped > 0 {
        log::debug!("discarded {dropped} queued message(s): {reason}");
    }
    dropped
}

#[cfg(test)]
mod spec {
    use axum::{
        body::Body,
        response::{IntoResponse as _, Response},
        routing::get,
        Extension, Router,
    };
    use http::{header, Request};
    use http_body_util::BodyExt as _;
    use tower::ServiceExt as _;

    use super::{discard, inject, Level, Message, Messages};

    fn app(content_type: &'static str, body: &'static str) -> Router {
        Router::new()
            .route(
                "/",
                get(move |Extension(msgs): Extension<Messages>| async move {
                    msgs.success("Estate saved");
                    msgs.add(Level::Warning, "Check the price", "price");
                    ([(header::CONTENT_TYPE, content_type)], body)
                        .into_response()
                }),
            )
            .layer(axum::middleware::from_fn(inject))
    }

    async fn call(app: Router, ajax: bool) -> (Response<()>, String) {
        let mut req = Request::builder().uri("/");
        if ajax {
            req = req.header("X-Requested-With", "XMLHttpRequest");
        }
        let resp = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let (parts, body) = resp.into_parts();
        let body = body.collect().await.unwrap().to_bytes();
        (
            Response::from_parts(parts, ()),
            String::from_utf8(body.to_vec()).unwrap(),
        )
    }

    #[test]
    fn tags_start_with_level_tag() {
        let msg = Message {
            level: Level::Error,
            text: "Oops".to_owned(),
            extra_tags: " form ".to_owned(),
        };
        assert_eq!(msg.tags(), "error form");

        let msg = Message {
            extra_tags: String::new(),
            ..msg
        };
        assert_eq!(msg.tags(), "error");
        assert_eq!(Level::Success.value(), 25);
    }

    #[test]
    fn drains_queue() {
        let msgs = Messages::default();
        msgs.info("one");
        msgs.clone().warning("two");

        assert_eq!(msgs.drain().len(), 2);
        assert!(msgs.drain().is_empty());
    }

    #[test]
    fn discards_undelivered_messages() {
        let msgs = Messages::default();
        msgs.success("Estate saved");
        msgs.warning("Check the price");

        assert_eq!(discard(&msgs, "not an AJAX request"), 2);
        assert!(msgs.drain().is_empty());
        assert_eq!(discard(&msgs, "not an AJAX request"), 0);
    }

    #[tokio::test]
    async fn injects_into_ajax_json_objects() {
        let (_, body) =
            call(app("application/json", r#"{"ok":true}"#), true).await;

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(
            json["core_messages"],
            serde_json::json!([
                {
                    "level": 25,
                    "message": "Estate saved",
                    "extra_tags": "success",
                },
                {
                    "level": 30,
                    "message": "Check the price",
                    "extra_tags": "warning price",
                },
            ]),
        );
    }

    #[tokio::test]
    async fn matches_content_type_essence() {
        let (_, body) = call(
            app("application/javascript; charset=utf-8", r#"{"a":1}"#),
            true,
        )
        .await;

        assert!(body.contains("core_messages"));
    }

    #[tokio::test]
    async fn skips_non_ajax_requests() {
        let (_, body) =
            call(app("application/json", r#"{"ok":true}"#), false).await;

        assert_eq!(body, r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn skips_other_content_types() {
        let (_, body) = call(app("text/html", r#"{"ok":true}"#), true).await;

        assert_eq!(body, r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn leaves_unparsable_and_non_object_bodies_untouched() {
        let (resp, body) = call(app("application/json", "{oops"), true).await;
        assert_eq!(body, "{oops");
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json",
        );

        let (_, body) = call(app("application/json", "[1,2]"), true).await;
        assert_eq!(body, "[1,2]");
    }
}
