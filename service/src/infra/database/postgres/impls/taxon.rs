//! [`Taxon`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        taxon::{self, Applicability, Vocabulary},
        Taxon,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

use super::data_from_row;

/// Reads a [`Taxon`] out of the provided `taxons` [`Row`].
fn taxon_from_row(row: &Row) -> Taxon {
    Taxon {
        id: row.get("id"),
        vocabulary: row.get("vocabulary"),
        data: data_from_row(row),
        applicability: Applicability {
            internal: row.get("internal"),
            external: row.get("external"),
        },
    }
}

impl<C, IDs> Database<Select<By<HashMap<taxon::Id, Taxon>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[taxon::Id]>,
{
    type Ok = HashMap<taxon::Id, Taxon>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<taxon::Id, Taxon>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let ids: &[taxon::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = "\
            SELECT id, vocabulary, \
                   name, name_en, description, enabled, position, \
                   internal, external \
            FROM taxons \
            WHERE id = ANY($1::UUID[])";
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let taxon = taxon_from_row(row);
                (taxon.id, taxon)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Taxon>, taxon::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Taxon>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Taxon>, taxon::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::<HashMap<_, Taxon>, _>::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Taxon>, Vocabulary>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Taxon>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Taxon>, Vocabulary>>,
    ) -> Result<Self::Ok, Self::Err> {
        let vocabulary: Vocabulary = by.into_inner();

        const SQL: &str = "\
            SELECT id, vocabulary, \
                   name, name_en, description, enabled, position, \
                   internal, external \
            FROM taxons \
            WHERE vocabulary = $1::INT2 \
            ORDER BY position, name, id";
        Ok(self
            .query(SQL, &[&vocabulary])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(taxon_from_row)
            .collect())
    }
}

impl<C> Database<Insert<Taxon>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(taxon): Insert<Taxon>,
    ) -> Result<Self::Ok, Self::Err> {
        let Taxon {
            id,
            vocabulary,
            data,
            applicability: Applicability { internal, external },
        } = taxon;

        const SQL: &str = "\
            INSERT INTO taxons (\
                id, vocabulary, \
                name, name_en, description, enabled, position, \
                internal, external\
            ) VALUES (\
                $1::UUID, $2::INT2, \
                $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, $6::BOOL, $7::INT4, \
                $8::BOOL, $9::BOOL\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &vocabulary,
                &data.name,
                &data.name_en,
                &data.description,
                &data.enabled,
                &data.position,
                &internal,
                &external,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
