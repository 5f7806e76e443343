//! [`User`] definitions.

pub mod session;

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret};
use xxhash_rust::xxh3;

use crate::domain::{define_id, define_text};

pub use self::session::Session;

/// Registered user owning [`Estate`]s.
///
/// [`Estate`]: crate::domain::Estate
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`]
    pub id: Id,

    /// [`Name`] of this [`User`].
    pub name: Name,

    /// [`Login`] of this [`User`].
    pub login: Login,

    /// [`PasswordHash`] of this [`User`].
    pub password_hash: PasswordHash,

    /// [`Email`] of this [`User`].
    pub email: Option<Email>,

    /// [`DateTime`] when this [`User`] was created.
    pub created_at: CreationDateTime,
}

define_id! {
    /// ID of a [`User`].
    Id
}

define_text! {
    /// Name of a [`User`].
    Name(max = 255)
}

/// Login of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Login(String);

impl Login {
    /// Creates a new [`Login`] if the given `login` is valid.
    #[must_use]
    pub fn new(login: impl Into<String>) -> Option<Self> {
        let login = login.into();
        Self::check(&login).then_some(Self(login))
    }

    /// Checks whether the given `login` is a valid [`Login`].
    fn check(login: impl AsRef<str>) -> bool {
        /// Letters, digits, `.`, `_` and `-`, from 2 to 64 characters.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[\p{L}\p{N}._-]{2,64}$").expect("valid regex")
        });

        REGEX.is_match(login.as_ref())
    }
}

impl std::str::FromStr for Login {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Login`")
    }
}

/// Password of a [`User`].
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let len = password.as_ref().chars().count();
        (6..=128).contains(&len)
    }
}

impl std::str::FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Password hash of a [`User`].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes the given [`Password`] salted with the [`Login`] it belongs to.
    #[must_use]
    pub fn new(login: &Login, password: &Password) -> Self {
        // TODO: Use `argon2` or any other slow password hashing algorithm.
        let mut hasher = xxh3::Xxh3::with_seed(xxh3::xxh3_64(
            login.as_ref().as_bytes(),
        ));
        hasher.update(password.0.as_bytes());
        Self(format!("xxh3${:032x}", hasher.digest128()))
    }

    /// Checks whether the given [`Password`] matches this [`PasswordHash`].
    #[must_use]
    pub fn verify(&self, login: &Login, password: &Password) -> bool {
        *self == Self::new(login, password)
    }
}

/// Email address of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 254 && REGEX.is_match(address)
    }
}

impl std::str::FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// [`DateTime`] when a [`User`] was created.
pub type CreationDateTime = DateTimeOf<(User, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Email, Login, Password, PasswordHash};

    #[test]
    fn login_format() {
        assert!(Login::new("ivan.petrov").is_some());
        assert!(Login::new("агент_7").is_some());
        assert!(Login::new("x").is_none());
        assert!(Login::new("with space").is_none());
    }

    #[test]
    fn email_format() {
        assert!(Email::new("agent@example.com").is_some());
        assert!(Email::new("agent@localhost").is_none());
        assert!(Email::new("agent example@mail.com").is_none());
    }

    #[test]
    fn password_hash_is_salted_by_login() {
        let password = Password::new("qwerty123").unwrap();
        let alice = Login::new("alice").unwrap();
        let bob = Login::new("bob").unwrap();

        let hash = PasswordHash::new(&alice, &password);

        assert!(hash.verify(&alice, &password));
        assert!(!hash.verify(&bob, &password));
        assert!(!hash.verify(&alice, &Password::new("qwerty124").unwrap()));
        assert_ne!(hash.to_string(), "qwerty123");
    }
}
