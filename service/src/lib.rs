//! Business logic of the estate listing backend.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use common::operations::{By, Start};
use derive_more::{Debug, Display, Error};

#[cfg(doc)]
use infra::Database;

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] encoding key of user sessions.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_encoding_key: jsonwebtoken::EncodingKey,

    /// [JWT] decoding key of user sessions.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// [`task::CleanVisitorHits`] configuration.
    pub clean_visitor_hits: task::clean_visitor_hits::Config,
}

/// Domain service of the estate listing.
#[derive(Clone, Debug)]
pub struct Service<Db> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] along with the [`task::Background`] its
    /// periodic [`Task`]s run in.
    pub fn new(config: Config, database: Db) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::CleanVisitorHits<Self>,
                        task::clean_visitor_hits::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Service { config, database };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn("CleanVisitorHits", async move {
            svc.execute(Start(By::new(svc.config().clean_visitor_hits)))
                .await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }
}

/// Shortcut for the error of starting a [`Task`].
type TaskStartError<Svc, T, Args> = <Svc as Task<Start<By<T, Args>>>>::Err;

/// Error of starting a [`Service`].
#[derive(Debug, Display, Error)]
pub enum StartupError<Svc>
where
    Svc: Task<
        Start<
            By<task::CleanVisitorHits<Svc>, task::clean_visitor_hits::Config>,
        >,
    >,
{
    /// [`task::CleanVisitorHits`] failed to start.
    CleanVisitorHitsTask(
        TaskStartError<
            Svc,
            task::CleanVisitorHits<Svc>,
            task::clean_visitor_hits::Config,
        >,
    ),
}
