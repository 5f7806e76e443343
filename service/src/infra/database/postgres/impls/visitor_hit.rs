//! [`VisitorHit`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{visitor_hit, VisitorHit},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Insert<VisitorHit>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(hit): Insert<VisitorHit>,
    ) -> Result<Self::Ok, Self::Err> {
        let VisitorHit {
            id,
            user_id,
            user_agent,
            ip_address,
            session_key,
            secure,
            referrer,
            host,
            url,
            created_at,
        } = hit;

        const SQL: &str = "\
            INSERT INTO visitor_hits (\
                id, user_id, user_agent, ip_address, session_key, secure, \
                referrer, host, url, created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, $4::INET, $5::VARCHAR, \
                $6::BOOL, $7::VARCHAR, $8::VARCHAR, $9::TEXT, \
                $10::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &user_id,
                &user_agent,
                &ip_address,
                &session_key,
                &secure,
                &referrer,
                &host,
                &url,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<read::visitor_hit::TotalCount, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::visitor_hit::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<read::visitor_hit::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*) \
            FROM visitor_hits";
        Ok(self
            .query_one(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .get::<_, i64>(0)
            .into())
    }
}

impl<C> Database<Delete<By<VisitorHit, visitor_hit::CreationDateTime>>>
    for Postgres<C>
where
    C: Connection,
{
    /// Number of deleted [`VisitorHit`]s.
    type Ok = u64;
    type Err = Traced<database::Error>;

    /// Deletes all the [`VisitorHit`]s recorded before the provided
    /// [`visitor_hit::CreationDateTime`].
    async fn execute(
        &self,
        Delete(by): Delete<By<VisitorHit, visitor_hit::CreationDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let before = by.into_inner();

        const SQL: &str = "\
            DELETE FROM visitor_hits \
            WHERE created_at < $1::TIMESTAMPTZ";
        self.exec(SQL, &[&before]).await.map_err(tracerr::wrap!())
    }
}
