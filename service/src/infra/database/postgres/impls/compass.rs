//! [`Compass`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{compass, Compass},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Reads a [`Compass`] point out of the provided `compass_points` [`Row`].
fn compass_from_row(row: &Row) -> Compass {
    Compass {
        id: row.get("id"),
        name: row.get("name"),
        name_en: row.get("name_en"),
        abbreviation: row.get("abbreviation"),
    }
}

impl<C> Database<Select<By<Vec<Compass>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Compass>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Compass>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, name, name_en, abbreviation \
            FROM compass_points \
            ORDER BY name, id";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(compass_from_row)
            .collect())
    }
}

impl<C, IDs> Database<Select<By<HashMap<compass::Id, Compass>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[compass::Id]>,
{
    type Ok = HashMap<compass::Id, Compass>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<compass::Id, Compass>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let ids: &[compass::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = "\
            SELECT id, name, name_en, abbreviation \
            FROM compass_points \
            WHERE id = ANY($1::UUID[])";
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let point = compass_from_row(row);
                (point.id, point)
            })
            .collect())
    }
}

impl<C> Database<Insert<Compass>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(point): Insert<Compass>,
    ) -> Result<Self::Ok, Self::Err> {
        let Compass {
            id,
            name,
            name_en,
            abbreviation,
        } = point;

        const SQL: &str = "\
            INSERT INTO compass_points (id, name, name_en, abbreviation) \
            VALUES ($1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR)";
        self.exec(SQL, &[&id, &name, &name_en, &abbreviation])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
