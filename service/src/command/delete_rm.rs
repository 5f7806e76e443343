//! [`Command`] for deleting an [`Rm`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{estate, rm, user, Estate, Rm},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting an [`Rm`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteRm {
    /// ID of the [`Rm`] to delete.
    pub id: rm::Id,

    /// ID of the [`User`] performing the deletion.
    ///
    /// [`User`]: crate::domain::User
    pub by: user::Id,
}

impl<Db> Command<DeleteRm> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Rm>, rm::Id>>,
            Ok = Option<Rm>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Estate, estate::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Estate>, estate::Id>>,
            Ok = Option<Estate>,
            Err = Traced<database::Error>,
        > + Database<Delete<By<Rm, rm::Id>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    /// Deleted [`Rm`].
    type Ok = Rm;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteRm) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteRm { id, by } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let rm = tx
            .execute(Select(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::RmNotExists(id)))?;

        tx.execute(Lock(By::<Estate, _>::new(rm.estate_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        let owned = tx
            .execute(Select(By::new(rm.estate_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some_and(|e| e.is_owned_by(by));
        if !owned {
            return Err(tracerr::new!(E::NotOwner(rm.estate_id)));
        }

        tx.execute(Delete(By::<Rm, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(rm)
    }
}

/// Error of [`DeleteRm`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Rm`] does not exist.
    #[display("`Rm(id: {_0})` does not exist")]
    #[from(ignore)]
    RmNotExists(#[error(not(source))] rm::Id),

    /// [`Estate`] of the [`Rm`] is owned by someone else.
    #[display("`Estate(id: {_0})` is not owned by the `User`")]
    #[from(ignore)]
    NotOwner(#[error(not(source))] estate::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{rm, user},
        infra::database::memory,
        Command as _,
    };

    use super::{DeleteRm, ExecutionError};

    #[tokio::test]
    async fn refuses_non_owner() {
        let owner = user::Id::new();
        let (db, estate, rm, _) = memory::seeded(owner);

        let err = memory::service(db.clone())
            .execute(DeleteRm {
                id: rm.id,
                by: user::Id::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::NotOwner(id) if *id == estate.id,
        ));
        assert!(db.committed().rms.contains_key(&rm.id));
    }

    #[tokio::test]
    async fn reports_missing_room() {
        let owner = user::Id::new();
        let (db, _, _, _) = memory::seeded(owner);
        let missing = rm::Id::new();

        let err = memory::service(db)
            .execute(DeleteRm {
                id: missing,
                by: owner,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::RmNotExists(id) if *id == missing,
        ));
    }

    #[tokio::test]
    async fn deletes_room_of_owned_estate() {
        let owner = user::Id::new();
        let (db, estate, rm, _) = memory::seeded(owner);

        let deleted = memory::service(db.clone())
            .execute(DeleteRm { id: rm.id, by: owner })
            .await
            .unwrap();

        assert_eq!(deleted.id, rm.id);
        let state = db.committed();
        assert!(state.rms.is_empty());
        assert!(state.estates.contains_key(&estate.id));
    }
}
