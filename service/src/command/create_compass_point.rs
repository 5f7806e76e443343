//! [`Command`] for creating a new [`Compass`] point.

use common::operations::Insert;
use tracerr::Traced;

use crate::{
    domain::{compass, Compass},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Compass`] point.
#[derive(Clone, Debug)]
pub struct CreateCompassPoint {
    /// [`compass::Name`] of a new [`Compass`] point.
    pub name: compass::Name,

    /// English [`compass::Name`] of a new [`Compass`] point.
    pub name_en: compass::Name,

    /// [`compass::Abbreviation`] of a new [`Compass`] point.
    pub abbreviation: compass::Abbreviation,
}

impl<Db> Command<CreateCompassPoint> for Service<Db>
where
    Db: Database<Insert<Compass>, Err = Traced<database::Error>>,
{
    type Ok = Compass;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateCompassPoint,
    ) -> Result<Self::Ok, Self::Err> {
        let CreateCompassPoint {
            name,
            name_en,
            abbreviation,
        } = cmd;

        let point = Compass {
            id: compass::Id::new(),
            name,
            name_en,
            abbreviation,
        };
        self.database()
            .execute(Insert(point.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(point)
    }
}

/// Error of [`CreateCompassPoint`] [`Command`] execution.
pub type ExecutionError = database::Error;
