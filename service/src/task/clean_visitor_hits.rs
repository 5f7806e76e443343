//! [`CleanVisitorHits`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Perform, Start};
use tokio::time::{interval, MissedTickBehavior};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{visitor_hit, VisitorHit},
    infra::{database, Database},
    Service,
};

use super::Task;

/// Configuration for [`CleanVisitorHits`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between [`VisitorHit`]s cleanings.
    pub interval: time::Duration,

    /// Age after which a [`VisitorHit`] is deleted.
    pub retention: time::Duration,
}

/// [`Task`] deleting [`VisitorHit`]s older than the configured retention.
#[derive(Clone, Copy, Debug)]
pub struct CleanVisitorHits<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<CleanVisitorHits<Self>, Config>>> for Service<Db>
where
    CleanVisitorHits<Service<Db>>:
        Task<Perform<()>, Ok = u64, Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<CleanVisitorHits<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let task = CleanVisitorHits {
            config: by.into_inner(),
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(0) => {}
                Ok(n) => log::info!("deleted {n} outdated `VisitorHit`s"),
                Err(e) => {
                    log::error!("`task::CleanVisitorHits` failed: {e}");
                }
            }
        }
    }
}

impl<Db> Task<Perform<()>> for CleanVisitorHits<Service<Db>>
where
    Db: Database<
        Delete<By<VisitorHit, visitor_hit::CreationDateTime>>,
        Ok = u64,
        Err = Traced<database::Error>,
    >,
{
    /// Number of deleted [`VisitorHit`]s.
    type Ok = u64;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let threshold =
            visitor_hit::CreationDateTime::now() - self.config.retention;
        self.service
            .database()
            .execute(Delete(By::new(threshold)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`CleanVisitorHits`] execution.
pub type ExecutionError = Traced<database::Error>;
