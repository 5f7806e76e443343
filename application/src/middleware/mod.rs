//! HTTP middleware wrapping every request.
//!
//! Layered in the following order (outermost first):
//! 1. [`current_request::scope`];
//! 2. [`visitor_hit::track`];
//! 3. [`pagination::inject`];
//! 4. [`messages::inject`].

pub mod current_request;
pub mod messages;
pub mod pagination;
pub mod visitor_hit;

use http::{header, HeaderMap};

pub use self::{
    current_request::current_request, messages::Messages, pagination::Page,
};

/// Value of the `X-Requested-With` header sent by AJAX requests.
const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

/// Indicates whether the provided request [`HeaderMap`] denotes an AJAX
/// request.
fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get("X-Requested-With")
        .is_some_and(|v| v.as_bytes() == XML_HTTP_REQUEST.as_bytes())
}

/// Returns the essence (type and subtype, without parameters) of the
/// `Content-Type` in the provided [`HeaderMap`], lowercased.
fn content_type_essence(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let essence = value.split(';').next().unwrap_or_default().trim();
    (!essence.is_empty()).then(|| essence.to_ascii_lowercase())
}

#[cfg(test)]
mod spec {
    use http::{header, HeaderMap, HeaderValue};

    use super::{content_type_essence, is_ajax};

    #[test]
    fn detects_ajax_requests() {
        let mut headers = HeaderMap::new();
        assert!(!is_ajax(&headers));

        _ = headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );
        assert!(is_ajax(&headers));

        _ = headers
            .insert("X-Requested-With", HeaderValue::from_static("fetch"));
        assert!(!is_ajax(&headers));
    }

    #[test]
    fn strips_content_type_parameters() {
        let mut headers = HeaderMap::new();
        assert_eq!(content_type_essence(&headers), None);

        _ = headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("Application/JSON; charset=utf-8"),
        );
        assert_eq!(
            content_type_essence(&headers).as_deref(),
            Some("application/json"),
        );
    }
}
