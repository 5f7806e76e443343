//! [`DateTime`] and its typed flavour [`DateTimeOf`].

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{cmp::Ordering, marker::PhantomData, ops, time::Duration};

use derive_more::{Debug, Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{format_description::well_known::Rfc3339, UtcOffset};

/// [`DateTimeOf`] not bound to any particular meaning.
pub type DateTime = DateTimeOf;

/// UTC date and time truncated to microseconds (the PostgreSQL
/// `TIMESTAMPTZ` precision).
///
/// The `Of` parameter tells what the moment means (for example
/// `(Estate, unit::Creation)`), so moments of different meaning cannot be
/// mixed up. [`DateTimeOf::coerce()`] converts between them explicitly.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// Underlying UTC moment.
    inner: time::OffsetDateTime,

    /// Meaning of this moment.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// Unix epoch.
    pub const UNIX_EPOCH: Self = Self {
        inner: time::OffsetDateTime::UNIX_EPOCH,
        _of: PhantomData,
    };

    /// Returns the current moment.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn now() -> Self {
        let now = time::OffsetDateTime::now_utc();
        Self {
            inner: now
                .replace_microsecond(now.microsecond())
                .expect("microsecond is always in range"),
            _of: PhantomData,
        }
    }

    /// Creates a [`DateTimeOf`] out of the provided Unix `timestamp`.
    ///
    /// [`None`] is returned if the `timestamp` is out of range.
    #[must_use]
    pub fn from_unix_timestamp(timestamp: i64) -> Option<Self> {
        time::OffsetDateTime::from_unix_timestamp(timestamp)
            .ok()
            .map(|inner| Self {
                inner,
                _of: PhantomData,
            })
    }

    /// Returns the Unix timestamp of this moment.
    #[must_use]
    pub fn unix_timestamp(&self) -> i64 {
        self.inner.unix_timestamp()
    }

    /// Returns the calendar year of this moment.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.inner.year()
    }

    /// Parses a [RFC 3339] string.
    ///
    /// # Errors
    ///
    /// If the `input` is not a valid [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        time::OffsetDateTime::parse(input, &Rfc3339)
            .map_err(ParseError::Parse)?
            .try_into()
            .map_err(ParseError::ComponentRange)
    }

    /// Formats this moment as a [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.inner
            .format(&Rfc3339)
            .expect("UTC moment is always RFC 3339 representable")
    }

    /// Reinterprets this moment with another meaning.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Error of parsing a [`DateTime`].
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Input is not a [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    Parse(time::error::Parse),

    /// Parsed moment has a component out of range.
    ComponentRange(time::error::ComponentRange),
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> TryFrom<time::OffsetDateTime> for DateTimeOf<Of> {
    type Error = time::error::ComponentRange;

    fn try_from(dt: time::OffsetDateTime) -> Result<Self, Self::Error> {
        dt.to_offset(UtcOffset::UTC)
            .replace_microsecond(dt.microsecond())
            .map(|inner| Self {
                inner,
                _of: PhantomData,
            })
    }
}

impl<Of: ?Sized> From<DateTimeOf<Of>> for time::OffsetDateTime {
    fn from(dt: DateTimeOf<Of>) -> Self {
        dt.inner
    }
}

impl<Of: ?Sized> ops::Add<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self {
            inner: self.inner + rhs,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> ops::Sub<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self {
            inner: self.inner - rhs,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> ops::Sub for DateTimeOf<Of> {
    type Output = Duration;

    /// Returns the [`Duration`] between two moments, saturating to zero if
    /// `rhs` is later than `self`.
    fn sub(self, rhs: Self) -> Self::Output {
        (self.inner - rhs.inner).try_into().unwrap_or_default()
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> FromSql<'_> for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::OffsetDateTime::from_sql(ty, raw)?
            .try_into()
            .map_err(Box::from)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.inner.to_sql(ty, w)
    }
}

#[cfg(feature = "serde")]
pub mod serde {
    //! [`serde`] integration.

    pub mod unix_timestamp {
        //! (De)serializes a [`DateTimeOf`] as a Unix timestamp, as used by
        //! the `exp` claim of a JWT.

        use serde::{de::Error as _, Deserialize as _, Deserializer, Serializer};

        use crate::DateTimeOf;

        /// Serializes the provided [`DateTimeOf`] as a Unix timestamp.
        ///
        /// # Errors
        ///
        /// If the `serializer` fails.
        pub fn serialize<Of, S>(
            dt: &DateTimeOf<Of>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
            Of: ?Sized,
        {
            serializer.serialize_i64(dt.unix_timestamp())
        }

        /// Deserializes a [`DateTimeOf`] from a Unix timestamp.
        ///
        /// # Errors
        ///
        /// If the value is not an integer or is out of range.
        pub fn deserialize<'de, D, Of>(
            deserializer: D,
        ) -> Result<DateTimeOf<Of>, D::Error>
        where
            D: Deserializer<'de>,
            Of: ?Sized,
        {
            DateTimeOf::from_unix_timestamp(i64::deserialize(deserializer)?)
                .ok_or_else(|| D::Error::custom("timestamp is out of range"))
        }
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! [`juniper`] integration.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Date and time in [RFC 3339] format with microsecond precision.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[graphql_scalar(with = Self, parse_token(String))]
    type DateTime = crate::DateTime;

    impl DateTime {
        fn to_output<S: ScalarValue>(dt: &DateTime) -> Value<S> {
            Value::scalar(dt.to_rfc3339())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            let s = input.as_string_value().ok_or_else(|| {
                format!(
                    "Cannot parse `DateTime` input scalar from non-string \
                     value: {input}",
                )
            })?;
            Self::from_rfc3339(s).map_err(|e| {
                format!("Cannot parse `DateTime` input scalar: {e}")
            })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use super::DateTime;

    #[test]
    fn round_trips_rfc3339() {
        let dt = DateTime::from_rfc3339("2024-05-17T10:20:30.123456Z").unwrap();

        assert_eq!(dt.to_rfc3339(), "2024-05-17T10:20:30.123456Z");
        assert_eq!(dt.year(), 2024);
    }

    #[test]
    fn normalizes_offset_to_utc() {
        let dt = DateTime::from_rfc3339("2024-01-01T03:00:00+03:00").unwrap();

        assert_eq!(dt.to_rfc3339(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn subtraction_saturates() {
        let earlier = DateTime::UNIX_EPOCH;
        let later = earlier + Duration::from_secs(90);

        assert_eq!(later - earlier, Duration::from_secs(90));
        assert_eq!(earlier - later, Duration::ZERO);
    }
}
