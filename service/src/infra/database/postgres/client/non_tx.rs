//! [`NonTx`] client definitions.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

use super::delegate_connection;

/// Non-transactional Postgres client.
///
/// Acquires a pooled connection on the first statement and keeps it until
/// a [`Tx`] takes it over.
///
/// [`Tx`]: super::Tx
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to acquire connections from.
    pub(crate) pool: connection::Pool,

    /// Acquired connection, if any.
    connection: Arc<RwLock<Option<connection::NonTx>>>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client on top of the provided
    /// [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            connection: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the acquired connection, acquiring one if there is none yet.
    pub(crate) async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::NonTx>, Traced<database::Error>>
    {
        {
            let acquired = self.connection.read().await;
            if acquired.is_some() {
                return Ok(RwLockReadGuard::map(acquired, |c| {
                    c.as_ref().expect("checked above")
                }));
            }
        }

        let mut slot = self.connection.write().await;
        if slot.is_none() {
            *slot = Some(
                self.pool
                    .get()
                    .await
                    .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                    .map_err(tracerr::map_from)?,
            );
        }
        Ok(RwLockReadGuard::map(slot.downgrade(), |c| {
            c.as_ref().expect("initialized above")
        }))
    }

    /// Takes the acquired connection out of this [`NonTx`] client, if any.
    pub(crate) async fn take_connection(&self) -> Option<connection::NonTx> {
        self.connection.write().await.take()
    }
}

delegate_connection!(NonTx);
