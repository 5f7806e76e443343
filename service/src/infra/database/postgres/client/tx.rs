//! [`Tx`] client definitions.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

use super::{delegate_connection, NonTx};

/// Transactional Postgres client.
///
/// Begins the transaction on the first statement, reusing the connection of
/// the [`NonTx`] client it was created from when that one has any.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`NonTx`] client to take the connection from, until it is taken.
    origin: Arc<Mutex<Option<NonTx>>>,

    /// [`connection::Pool`] to acquire a connection from otherwise.
    pool: connection::Pool,

    /// Open transaction, if begun.
    tx: Arc<RwLock<Option<connection::Tx>>>,
}

impl Tx {
    /// Creates a new [`Tx`] client out of the provided [`NonTx`] client.
    #[must_use]
    pub fn from_non_tx(client: NonTx) -> Self {
        Self {
            pool: client.pool.clone(),
            origin: Arc::new(Mutex::new(Some(client))),
            tx: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the open transaction, beginning one if there is none yet.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        {
            let open = self.tx.read().await;
            if open.is_some() {
                return Ok(RwLockReadGuard::map(open, |t| {
                    t.as_ref().expect("checked above")
                }));
            }
        }

        let mut slot = self.tx.write().await;
        if slot.is_none() {
            let reused = match self.origin.lock().await.take() {
                Some(client) => client.take_connection().await,
                None => None,
            };
            let conn = match reused {
                Some(conn) => conn,
                None => self
                    .pool
                    .get()
                    .await
                    .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                    .map_err(tracerr::map_from)?,
            };
            *slot = Some(
                connection::Tx::begin(conn)
                    .await
                    .map_err(tracerr::wrap!())?,
            );
        }
        Ok(RwLockReadGuard::map(slot.downgrade(), |t| {
            t.as_ref().expect("initialized above")
        }))
    }

    /// Commits the transaction of this [`Tx`] client, if it has begun.
    ///
    /// # Errors
    ///
    /// If Postgres fails to commit the transaction.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        match self.tx.write().await.take() {
            Some(tx) => tx.commit().await.map_err(tracerr::wrap!()),
            None => Ok(()),
        }
    }
}

delegate_connection!(Tx);
