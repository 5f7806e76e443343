//! [`Command`] for updating an existing [`Estate`].

use std::collections::HashMap;

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        company, compass,
        estate::{self, Details},
        taxon, user, Company, Compass, Estate, Taxon,
    },
    infra::{database, Database},
    Service,
};

use super::{create_estate, Command};

/// [`Command`] for replacing the [`Details`] of an existing [`Estate`].
#[derive(Clone, Debug)]
pub struct UpdateEstate {
    /// ID of the [`Estate`] to update.
    pub id: estate::Id,

    /// ID of the [`User`] performing the update.
    ///
    /// [`User`]: crate::domain::User
    pub by: user::Id,

    /// New [`Details`] of the [`Estate`].
    pub details: Details,
}

impl<Db> Command<UpdateEstate> for Service<Db>
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
            Select<By<HashMap<taxon::Id, Taxon>, Vec<taxon::Id>>>,
            Ok = HashMap<taxon::Id, Taxon>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<compass::Id, Compass>, Vec<compass::Id>>>,
            Ok = HashMap<compass::Id, Compass>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Company>, company::Id>>,
            Ok = Option<Company>,
            Err = Traced<database::Error>,
        > + Database<Update<Estate>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Estate;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateEstate) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateEstate { id, by, details } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::<Estate, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        let mut estate = tx
            .execute(Select(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::EstateNotExists(id)))?;
        if !estate.is_owned_by(by) {
            return Err(tracerr::new!(E::NotOwner(id)));
        }

        create_estate::check_details(&tx, &details)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        estate.details = details;
        estate.updated_at = DateTime::now().coerce();
        tx.execute(Update(estate.clone()))
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

/// Error of [`UpdateEstate`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// New [`Details`] are invalid.
    #[display("{_0}")]
    Details(create_estate::ExecutionError),

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
    use crate::{
        domain::{data::Name, estate, user},
        infra::database::memory,
        Command as _,
    };

    use super::{ExecutionError, UpdateEstate};

    #[tokio::test]
    async fn refuses_non_owner() {
        let owner = user::Id::new();
        let (db, estate, _, _) = memory::seeded(owner);
        let mut details = estate.details.clone();
        details.data.name = Name::new("Stolen").unwrap();

        let err = memory::service(db.clone())
            .execute(UpdateEstate {
                id: estate.id,
                by: user::Id::new(),
                details,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::NotOwner(id) if *id == estate.id,
        ));
        let stored = &db.committed().estates[&estate.id];
        assert_eq!(stored.details.data.name, estate.details.data.name);
        assert_eq!(stored.updated_at, estate.updated_at);
    }

    #[tokio::test]
    async fn reports_missing_estate() {
        let owner = user::Id::new();
        let (db, estate, _, _) = memory::seeded(owner);
        let missing = estate::Id::new();

        let err = memory::service(db)
            .execute(UpdateEstate {
                id: missing,
                by: owner,
                details: estate.details,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::EstateNotExists(id) if *id == missing,
        ));
    }

    #[tokio::test]
    async fn updates_owned_estate() {
        let owner = user::Id::new();
        let (db, estate, _, _) = memory::seeded(owner);
        let mut details = estate.details.clone();
        details.data.name = Name::new("Renovated cottage").unwrap();

        let updated = memory::service(db.clone())
            .execute(UpdateEstate {
                id: estate.id,
                by: owner,
                details,
            })
            .await
            .unwrap();

        assert_eq!(updated.details.data.name.to_string(), "Renovated cottage");
        let stored = &db.committed().estates[&estate.id];
        assert_eq!(stored.details.data.name, updated.details.data.name);
        assert_eq!(stored.user_id, Some(owner));
    }
}
