//! [`VisitorHit`] definitions.

use std::net::IpAddr;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

use super::{define_id, user};

/// Single tracked page view.
#[derive(Clone, Debug)]
pub struct VisitorHit {
    /// ID of this [`VisitorHit`].
    pub id: Id,

    /// ID of the authenticated [`User`] who made this [`VisitorHit`], if any.
    ///
    /// [`User`]: super::User
    pub user_id: Option<user::Id>,

    /// [`UserAgent`] of the visitor.
    pub user_agent: UserAgent,

    /// IP address of the visitor, if known.
    pub ip_address: Option<IpAddr>,

    /// [`SessionKey`] identifying the visitor.
    pub session_key: SessionKey,

    /// Indicator whether the page was requested over HTTPS.
    pub secure: bool,

    /// [`Referrer`] of the page, if any.
    pub referrer: Option<Referrer>,

    /// [`Host`] the page was requested from, if any.
    pub host: Option<Host>,

    /// [`Url`] of the page.
    pub url: Url,

    /// [`DateTime`] when this [`VisitorHit`] happened.
    pub created_at: CreationDateTime,
}

define_id! {
    /// ID of a [`VisitorHit`].
    Id
}

/// Markers of crawler [`UserAgent`]s, which are not tracked.
pub const CRAWLER_MARKERS: &[&str] = &[
    "Teoma",
    "alexa",
    "froogle",
    "Gigabot",
    "inktomi",
    "looksmart",
    "URL_Spider_SQL",
    "Firefly",
    "NationalDirectory",
    "Ask Jeeves",
    "TECNOSEEK",
    "InfoSeek",
    "WebFindBot",
    "girafabot",
    "crawler",
    "www.galaxy.com",
    "Googlebot",
    "Googlebot/2.1",
    "Google",
    "Webmaster",
    "Scooter",
    "James Bond",
    "Slurp",
    "msnbot",
    "appie",
    "FAST",
    "WebBug",
    "Spade",
    "ZyBorg",
    "rabaz",
    "Baiduspider",
    "Feedfetcher-Google",
    "TechnoratiSnoop",
    "Rankivabot",
    "Mediapartners-Google",
    "Sogou web spider",
    "WebAlta Crawler",
    "MJ12bot",
    "Yandex/",
    "YandexBot",
    "YaDirectBot",
    "StackRambler",
    "DotBot",
    "dotbot",
];

/// `User-Agent` of a visitor, truncated to [`UserAgent::MAX_LEN`] characters.
#[derive(AsRef, Clone, Debug, Default, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct UserAgent(String);

impl UserAgent {
    /// Maximum length of a [`UserAgent`] in characters.
    pub const MAX_LEN: usize = 255;

    /// Creates a new [`UserAgent`] out of the raw header value, truncating it.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(truncate(raw, Self::MAX_LEN).to_owned())
    }

    /// Indicates whether this [`UserAgent`] belongs to a known crawler.
    ///
    /// Markers are matched case-sensitively as substrings.
    #[must_use]
    pub fn is_crawler(&self) -> bool {
        CRAWLER_MARKERS.iter().any(|m| self.0.contains(m))
    }
}

/// Key identifying a visitor across requests.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct SessionKey(String);

impl SessionKey {
    /// Maximum length of a [`SessionKey`] in characters.
    pub const MAX_LEN: usize = 40;

    /// Creates a [`SessionKey`] of an authenticated visitor out of its
    /// [`session::Token`].
    ///
    /// [`session::Token`]: user::session::Token
    #[must_use]
    pub fn authenticated(token: &user::session::Token) -> Self {
        Self(token.digest())
    }

    /// Creates a [`SessionKey`] of an anonymous visitor as `{ip}:{ua}`.
    #[must_use]
    pub fn anonymous(ip: Option<IpAddr>, user_agent: &UserAgent) -> Self {
        let ip = ip.map(|ip| ip.to_string()).unwrap_or_default();
        let key = format!("{ip}:{user_agent}");
        Self(truncate(&key, Self::MAX_LEN).to_owned())
    }
}

/// `Referer` of a visited page.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Referrer(String);

impl Referrer {
    /// Maximum length of a [`Referrer`] in characters.
    pub const MAX_LEN: usize = 2048;

    /// Creates a new [`Referrer`] out of the raw header value, truncating it.
    ///
    /// Blank values are [`None`].
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        (!raw.is_empty()).then(|| Self(truncate(raw, Self::MAX_LEN).to_owned()))
    }
}

/// `Host` of a visited page.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Host(String);

impl Host {
    /// Maximum length of a [`Host`] in characters.
    pub const MAX_LEN: usize = 100;

    /// Creates a new [`Host`] out of the raw header value, truncating it.
    ///
    /// Blank values are [`None`].
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        (!raw.is_empty()).then(|| Self(truncate(raw, Self::MAX_LEN).to_owned()))
    }
}

/// Path and query of a visited page.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Url(String);

impl Url {
    /// Creates a new [`Url`] out of the provided path and query.
    #[must_use]
    pub fn new(path_and_query: impl Into<String>) -> Self {
        Self(path_and_query.into())
    }
}

/// Returns the longest prefix of `s` having at most `max` characters.
fn truncate(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(i, _)| &s[..i])
}

/// [`DateTime`] when a [`VisitorHit`] happened.
pub type CreationDateTime = DateTimeOf<(VisitorHit, unit::Creation)>;

#[cfg(test)]
mod spec {
    use std::net::{IpAddr, Ipv4Addr};

    use super::{Host, SessionKey, UserAgent};

    #[test]
    fn detects_crawlers() {
        for ua in [
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://google.com/bot)",
            "Mozilla/5.0 (compatible; YandexBot/3.0)",
            "msnbot/2.0b",
            "Some generic crawler",
        ] {
            assert!(UserAgent::new(ua).is_crawler(), "{ua}");
        }

        for ua in [
            "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Firefox/128.0",
            "",
            "googlebot",
        ] {
            assert!(!UserAgent::new(ua).is_crawler(), "{ua}");
        }
    }

    #[test]
    fn truncates_user_agent_by_chars() {
        let ua = UserAgent::new(&"ж".repeat(300));

        assert_eq!(ua.as_ref().chars().count(), UserAgent::MAX_LEN);
    }

    #[test]
    fn anonymous_session_key_is_ip_and_user_agent() {
        let ip = Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));

        let key = SessionKey::anonymous(ip, &UserAgent::new("curl/8.0"));
        assert_eq!(key.as_ref(), "10.0.0.1:curl/8.0");

        let key = SessionKey::anonymous(
            ip,
            &UserAgent::new("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"),
        );
        assert_eq!(key.as_ref(), "10.0.0.1:Mozilla/5.0 (Windows NT 10.0; W");
        assert_eq!(key.as_ref().len(), SessionKey::MAX_LEN);
    }

    #[test]
    fn authenticated_session_key_fits() {
        let token = "a.b.c".parse().unwrap();

        let key = SessionKey::authenticated(&token);

        assert!(key.as_ref().len() <= SessionKey::MAX_LEN);
        assert_ne!(key.as_ref(), "a.b.c");
    }

    #[test]
    fn host_is_truncated_and_blank_is_none() {
        assert_eq!(Host::new("   "), None);
        assert_eq!(
            Host::new(&"h".repeat(150)).map(|h| h.as_ref().len()),
            Some(Host::MAX_LEN),
        );
    }
}
