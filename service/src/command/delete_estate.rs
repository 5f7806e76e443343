//! [`Command`] for deleting an [`Estate`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Rm;
use crate::{
    domain::{estate, user, Estate},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting an [`Estate`] along with its [`Rm`]s.
#[derive(Clone, Copy, Debug)]
pub struct DeleteEstate {
    /// ID of the [`Estate`] to delete.
    pub id: estate::Id,

    /// ID of the [`User`] performing the deletion.
    ///
    /// [`User`]: crate::domain::User
    pub by: user::Id,
}

impl<Db> Command<DeleteEstate> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Estate, estate::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Estate>, estate::Id>>,
            Ok = Option<Estate>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Estate, estate::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    /// Deleted [`Estate`].
    type Ok = Estate;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteEstate) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteEstate { id, by } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::<Estate, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        let estate = tx
            .execute(Select(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::EstateNotExists(id)))?;
        if !estate.is_owned_by(by) {
            return Err(tracerr::new!(E::NotOwner(id)));
        }

        tx.execute(Delete(By::<Estate, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(estate)
    }
}

/// Error of [`DeleteEstate`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Estate`] does not exist.
    #[display("`Estate(id: {_0})` does not exist")]
    #[from(ignore)]
    EstateNotExists(#[error(not(source))] estate::Id),

    /// [`Estate`] is owned by someone else.
    #[display("`Estate(id: {_0})` is not owned by the `User`")]
    #[from(ignore)]
    NotOwner(#[error(not(source))] estate::Id),
}

#[cfg(test)]
mod spec {
    use crate::{domain::user, infra::database::memory, Command as _};

    use super::{DeleteEstate, ExecutionError};

    #[tokio::test]
    async fn refuses_non_owner() {
        let owner = user::Id::new();
        let (db, estate, rm, _) = memory::seeded(owner);

        let err = memory::service(db.clone())
            .execute(DeleteEstate {
                id: estate.id,
                by: user::Id::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::NotOwner(id) if *id == estate.id,
        ));
        let state = db.committed();
        assert!(state.estates.contains_key(&estate.id));
        assert!(state.rms.contains_key(&rm.id));
    }

    #[tokio::test]
    async fn reports_missing_estate() {
        let owner = user::Id::new();
        let (db, _, _, _) = memory::seeded(owner);
        let missing = crate::domain::estate::Id::new();

        let err = memory::service(db)
            .execute(DeleteEstate {
                id: missing,
                by: owner,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::EstateNotExists(id) if *id == missing,
        ));
    }

    #[tokio::test]
    async fn deletes_owned_estate_with_rooms() {
        let owner = user::Id::new();
        let (db, estate, _, _) = memory::seeded(owner);

        let deleted = memory::service(db.clone())
            .execute(DeleteEstate {
                id: estate.id,
                by: owner,
            })
            .await
            .unwrap();

        assert_eq!(deleted.id, estate.id);
        let state = db.committed();
        assert!(state.estates.is_empty());
        assert!(state.rms.is_empty());
    }
}
