//! [`Session`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, FromStr};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3;

#[cfg(doc)]
use crate::domain::User;
use crate::domain::user;

/// Authenticated session of a [`User`], encoded as JWT claims.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Session {
    /// ID of the [`User`] this [`Session`] belongs to.
    pub user_id: user::Id,

    /// [`DateTime`] when this [`Session`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

/// Bearer token of a [`Session`].
#[derive(AsRef, Clone, Debug, Display, FromStr)]
#[as_ref(str)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] without checking its contents.
    ///
    /// # Safety
    ///
    /// The provided `token` must be a valid [`Token`] representation.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(token: String) -> Self {
        Self(token)
    }

    /// Returns a stable hexadecimal digest of this [`Token`].
    ///
    /// Used to identify a visitor without storing the token itself.
    #[must_use]
    pub fn digest(&self) -> String {
        format!("{:032x}", xxh3::xxh3_128(self.0.as_bytes()))
    }
}

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;

#[cfg(test)]
mod spec {
    use super::Token;

    #[test]
    fn digest_is_stable_and_fits_session_key() {
        let token: Token = "header.claims.signature".parse().unwrap();

        assert_eq!(token.digest(), token.clone().digest());
        assert_eq!(token.digest().len(), 32);
        assert_ne!(
            token.digest(),
            "header.claims.other".parse::<Token>().unwrap().digest(),
        );
    }
}
