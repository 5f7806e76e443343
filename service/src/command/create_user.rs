//! [`Command`] for registering a new [`User`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{Email, Login, Name, Password};
use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// Name of the unique constraint guarding [`User::login`]s.
const LOGIN_CONSTRAINT: &str = "users_login_unique";

/// [`Command`] for registering a new [`User`].
#[derive(Clone, Debug)]
pub struct CreateUser {
    /// [`Name`] of a new [`User`].
    pub name: user::Name,

    /// [`Login`] of a new [`User`].
    pub login: user::Login,

    /// [`Password`] of a new [`User`].
    pub password: SecretBox<user::Password>,

    /// [`Email`] of a new [`User`], if any.
    pub email: Option<user::Email>,
}

impl<Db> Command<CreateUser> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser {
            name,
            login,
            password,
            email,
        } = cmd;

        let user = User {
            id: user::Id::new(),
            name,
            password_hash: user::PasswordHash::new(
                &login,
                password.expose_secret(),
            ),
            login,
            email,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        // Concurrent registrations of the same login are settled by the
        // unique constraint.
        tx.execute(Insert(user.clone()))
            .await
            .map_err(|e| {
                if e.as_ref().is_unique_violation(LOGIN_CONSTRAINT) {
                    tracerr::new!(E::LoginOccupied(user.login.clone()))
                } else {
                    tracerr::map_from(e)
                }
            })
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(user)
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`user::Login`] is already occupied.
    #[display("`{_0}` login is occupied")]
    #[from(ignore)]
    LoginOccupied(#[error(not(source))] user::Login),
}
