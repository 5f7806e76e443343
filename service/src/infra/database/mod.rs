//! [`Database`] abstraction and its implementations.

#[cfg(test)]
pub(crate) mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Storage the [`Service`] keeps its entities in.
///
/// [`Service`]: crate::Service
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Postgres`] error.
    #[cfg(feature = "postgres")]
    Postgres(postgres::Error),
}

impl Error {
    /// Checks whether this [`Error`] is caused by the provided unique
    /// `constraint` being violated.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: &str) -> bool {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(e) => e.is_unique_violation(Some(constraint)),
        }
    }

    /// Checks whether this [`Error`] is caused by the provided foreign key
    /// `constraint` being violated.
    #[must_use]
    pub fn is_foreign_key_violation(&self, constraint: &str) -> bool {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(e) => e.is_foreign_key_violation(Some(constraint)),
        }
    }
}
