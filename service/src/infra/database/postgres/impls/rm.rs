//! [`Rm`]-related [`Database`] implementations.

use std::collections::{BTreeSet, HashMap};

use common::operations::{By, Delete, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{estate, rm, Rm},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

use super::data_from_row;

/// Reads an [`Rm`] without its features out of the provided `rms` [`Row`].
fn rm_from_row(row: &Row) -> Rm {
    Rm {
        id: row.get("id"),
        estate_id: row.get("estate_id"),
        kind: row.get("kind"),
        data: data_from_row(row),
        size: row.get("size"),
        features: BTreeSet::new(),
    }
}

impl<C> Postgres<C>
where
    C: Connection,
{
    /// Fills [`Rm::features`] of the provided [`Rm`]s.
    async fn attach_rm_features(
        &self,
        rms: &mut [Rm],
    ) -> Result<(), Traced<database::Error>> {
        if rms.is_empty() {
            return Ok(());
        }
        let ids = rms.iter().map(|r| r.id).collect::<Vec<_>>();
        let positions = ids
            .iter()
            .enumerate()
            .map(|(n, id)| (*id, n))
            .collect::<HashMap<_, _>>();

        const SQL: &str = "\
            SELECT rm_id, taxon_id \
            FROM rm_features \
            WHERE rm_id = ANY($1::UUID[])";
        for row in self.query(SQL, &[&ids]).await.map_err(tracerr::wrap!())? {
            if let Some(&n) = positions.get(&row.get("rm_id")) {
                _ = rms[n].features.insert(row.get("taxon_id"));
            }
        }
        Ok(())
    }
}

impl<C> Database<Select<By<Option<Rm>, rm::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Rm>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rm>, rm::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, estate_id, kind, \
                   name, name_en, description, enabled, position, \
                   size \
            FROM rms \
            WHERE id = $1::UUID";
        let Some(row) = self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let mut rms = [rm_from_row(&row)];
        self.attach_rm_features(&mut rms)
            .await
            .map_err(tracerr::wrap!())?;
        let [rm] = rms;
        Ok(Some(rm))
    }
}

impl<C> Database<Select<By<Vec<Rm>, estate::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Rm>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rm>, estate::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let estate_id = by.into_inner();

        const SQL: &str = "\
            SELECT id, estate_id, kind, \
                   name, name_en, description, enabled, position, \
                   size \
            FROM rms \
            WHERE estate_id = $1::UUID \
            ORDER BY position, name, id";
        let mut rms = self
            .query(SQL, &[&estate_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(rm_from_row)
            .collect::<Vec<_>>();
        self.attach_rm_features(&mut rms)
            .await
            .map_err(tracerr::wrap!())?;
        Ok(rms)
    }
}

impl<C> Database<Insert<Rm>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rm): Insert<Rm>,
    ) -> Result<Self::Ok, Self::Err> {
        let Rm {
            id,
            estate_id,
            kind,
            data,
            size,
            features,
        } = rm;

        const SQL: &str = "\
            INSERT INTO rms (\
                id, estate_id, kind, \
                name, name_en, description, enabled, position, \
                size\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::VARCHAR, $5::VARCHAR, $6::VARCHAR, $7::BOOL, $8::INT4, \
                $9::NUMERIC\
            )";
        _ = self
            .exec(
                SQL,
                &[
                    &id,
                    &estate_id,
                    &kind,
                    &data.name,
                    &data.name_en,
                    &data.description,
                    &data.enabled,
                    &data.position,
                    &size,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?;

        if !features.is_empty() {
            let features = features.into_iter().collect::<Vec<_>>();
            const SQL: &str = "\
                INSERT INTO rm_features (rm_id, taxon_id) \
                SELECT $1::UUID, UNNEST($2::UUID[])";
            _ = self
                .exec(SQL, &[&id, &features])
                .await
                .map_err(tracerr::wrap!())?;
        }

        Ok(())
    }
}

impl<C> Database<Delete<By<Rm, rm::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Rm, rm::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: rm::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM rms \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
