//! [`Command`] for creating a [`Session`].

use std::time::Duration;

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{session::Token, Login, Password};
use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`] out of [`User`] credentials.
#[derive(Clone, Debug)]
pub struct CreateUserSession {
    /// [`Login`] of the [`User`].
    pub login: user::Login,

    /// [`Password`] of the [`User`].
    pub password: SecretBox<user::Password>,
}

impl CreateUserSession {
    /// [`Duration`] a [`Session`] stays valid for.
    pub const TTL: Duration = Duration::from_secs(12 * 60 * 60);
}

/// Output of [`CreateUserSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Token`] of the created [`Session`].
    pub token: session::Token,

    /// [`User`] the [`Session`] has been created for.
    pub user: User,

    /// [`DateTime`] when the [`Session`] expires.
    pub expires_at: session::ExpirationDateTime,
}

impl<Db> Command<CreateUserSession> for Service<Db>
where
    Db: for<'l> Database<
        Select<By<Option<User>, &'l user::Login>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUserSession { login, password } = cmd;

        let user = self
            .database()
            .execute(Select(By::new(&login)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|u| {
                u.password_hash.verify(&login, password.expose_secret())
            })
            .ok_or_else(|| tracerr::new!(E::WrongCredentials))?;

        let expires_at = (DateTime::now() + CreateUserSession::TTL).coerce();
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &Session {
                user_id: user.id,
                expires_at,
            },
            &self.config().jwt_encoding_key,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        // SAFETY: `jsonwebtoken::encode()` produces well-formed tokens only.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { session::Token::new_unchecked(token) };

        Ok(Output {
            token,
            user,
            expires_at,
        })
    }
}

/// Error of [`CreateUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// Unknown [`Login`] or wrong [`Password`].
    #[display("Wrong `User` credentials")]
    WrongCredentials,
}
