//! [`User`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Reads a [`User`] out of the provided `users` [`Row`].
fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        login: row.get("login"),
        password_hash: row.get("password_hash"),
        email: row.get("email"),
        created_at: row.get("created_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<user::Id, User>, IDs>>> for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[user::Id]>,
{
    type Ok = HashMap<user::Id, User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<user::Id, User>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let ids: &[user::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = "\
            SELECT id, name, login, password_hash, email, created_at \
            FROM users \
            WHERE id = ANY($1::UUID[])";
        Ok(self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let user = user_from_row(row);
                (user.id, user)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<User>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::<HashMap<_, User>, _>::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<'l, C> Database<Select<By<Option<User>, &'l user::Login>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'l user::Login>>,
    ) -> Result<Self::Ok, Self::Err> {
        let login = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, login, password_hash, email, created_at \
            FROM users \
            WHERE login = $1::VARCHAR";
        Ok(self
            .query_opt(SQL, &[login])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(user_from_row))
    }
}

impl<C> Database<Insert<User>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        let User {
            id,
            name,
            login,
            password_hash,
            email,
            created_at,
        } = user;

        const SQL: &str = "\
            INSERT INTO users (\
                id, name, login, password_hash, email, created_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, $6::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[&id, &name, &login, &password_hash, &email, &created_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
