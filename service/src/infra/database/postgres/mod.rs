//! Postgres [`Database`] implementation.

pub mod client;
pub mod connection;
mod fuzz_pattern;
mod impls;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::{error::SqlState, NoTls};
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use deadpool_postgres::Config;
pub use refinery::embed_migrations;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
    fuzz_pattern::FuzzPattern,
};

/// Postgres [`Database`] client.
#[derive(Clone, Copy, Debug, Deref)]
pub struct Postgres<T = NonTx>(T);

impl Postgres {
    /// Creates a new [`Postgres`] client backed by a connection pool built
    /// out of the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the [`Config`] doesn't describe a valid pool.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self(NonTx::from_pool(pool)))
    }
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// [`Connection`] error.
    #[display("`Connection` error: {_0}")]
    Connection(connection::Error),

    /// Error of creating a new [`connection::Pool`].
    #[display("Failed to create a new `connection::Pool`: {_0}")]
    PoolCreationError(connection::PoolCreationError),

    /// [`connection::Pool`] error.
    #[display("`connection::Pool` error: {_0}")]
    PoolError(connection::PoolError),
}

impl Error {
    /// Checks whether this [`Error`] is a violation of the provided unique
    /// `constraint`, or of any unique constraint if [`None`].
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        self.violates(&SqlState::UNIQUE_VIOLATION, constraint)
    }

    /// Checks whether this [`Error`] is a violation of the provided foreign
    /// key `constraint`, or of any foreign key if [`None`].
    #[must_use]
    pub fn is_foreign_key_violation(&self, constraint: Option<&str>) -> bool {
        self.violates(&SqlState::FOREIGN_KEY_VIOLATION, constraint)
    }

    /// Checks whether this [`Error`] is a `state` violation of the provided
    /// `constraint`.
    fn violates(&self, state: &SqlState, constraint: Option<&str>) -> bool {
        match self {
            Self::Connection(e) => {
                e.code() == Some(state)
                    && constraint.map_or(true, |c| {
                        e.as_db_error().and_then(|e| e.constraint()) == Some(c)
                    })
            }
            Self::PoolError(..) | Self::PoolCreationError(..) => false,
        }
    }
}
