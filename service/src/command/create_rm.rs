//! [`Command`] for adding a new [`Rm`] to an [`Estate`].

use std::collections::{BTreeSet, HashMap};

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        estate::{self, Area},
        rm::{self, TaxonRole},
        taxon, user, Data, Estate, Rm, Taxon,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a new [`Rm`] to an [`Estate`].
#[derive(Clone, Debug)]
pub struct CreateRm {
    /// ID of the [`Estate`] to add the [`Rm`] to.
    pub estate_id: estate::Id,

    /// ID of the [`User`] adding the [`Rm`].
    ///
    /// [`User`]: crate::domain::User
    pub by: user::Id,

    /// Room type [`Taxon`] of a new [`Rm`].
    pub kind: taxon::Id,

    /// [`Data`] of a new [`Rm`].
    pub data: Data,

    /// [`Area`] of a new [`Rm`].
    pub size: Area,

    /// Room feature [`Taxon`]s of a new [`Rm`].
    pub features: BTreeSet<taxon::Id>,
}

impl<Db> Command<CreateRm> for Service<Db>
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
        > + Database<Insert<Rm>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rm;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRm) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRm {
            estate_id,
            by,
            kind,
            data,
            size,
            features,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::<Estate, _>::new(estate_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        let estate = tx
            .execute(Select(By::new(estate_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::EstateNotExists(estate_id)))?;
        if !estate.is_owned_by(by) {
            return Err(tracerr::new!(E::NotOwner(estate_id)));
        }

        let referenced = std::iter::once((kind, TaxonRole::Kind))
            .chain(features.iter().map(|id| (*id, TaxonRole::Feature)))
            .collect::<Vec<_>>();
        let taxons = tx
            .execute(Select(By::new(
                referenced.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for (id, role) in referenced {
            let taxon = taxons
                .get(&id)
                .ok_or_else(|| tracerr::new!(E::TaxonNotExists(id)))?;
            role.admit(taxon).map_err(tracerr::from_and_wrap!(=> E))?;
        }

        let rm = Rm {
            id: rm::Id::new(),
            estate_id,
            kind,
            data,
            size,
            features,
        };
        tx.execute(Insert(rm.clone()))
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

/// Error of [`CreateRm`] [`Command`] execution.
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

    /// Referenced [`Taxon`] does not exist.
    #[display("`Taxon(id: {_0})` does not exist")]
    #[from(ignore)]
    TaxonNotExists(#[error(not(source))] taxon::Id),

    /// Referenced [`Taxon`] cannot play its role.
    #[display("{_0}")]
    UnsuitableTaxon(rm::UnsuitableTaxon),
}

#[cfg(test)]
mod spec {
    use std::collections::BTreeSet;

    use crate::{
        domain::{data::Name, estate, taxon, user, Data},
        infra::database::memory,
        Command as _,
    };

    use super::{CreateRm, ExecutionError};

    fn command(
        estate_id: estate::Id,
        by: user::Id,
        kind: taxon::Id,
    ) -> CreateRm {
        CreateRm {
            estate_id,
            by,
            kind,
            data: Data::named(Name::new("Bedroom").unwrap()),
            size: "16".parse().unwrap(),
            features: BTreeSet::new(),
        }
    }

    #[tokio::test]
    async fn refuses_non_owner() {
        let owner = user::Id::new();
        let (db, estate, _, room_type) = memory::seeded(owner);

        let err = memory::service(db.clone())
            .execute(command(estate.id, user::Id::new(), room_type.id))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::NotOwner(id) if *id == estate.id,
        ));
        assert_eq!(db.committed().rms.len(), 1);
    }

    #[tokio::test]
    async fn reports_missing_estate() {
        let owner = user::Id::new();
        let (db, _, _, room_type) = memory::seeded(owner);
        let missing = estate::Id::new();

        let err = memory::service(db.clone())
            .execute(command(missing, owner, room_type.id))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::EstateNotExists(id) if *id == missing,
        ));
        assert_eq!(db.committed().rms.len(), 1);
    }

    #[tokio::test]
    async fn adds_room_to_owned_estate() {
        let owner = user::Id::new();
        let (db, estate, _, room_type) = memory::seeded(owner);

        let rm = memory::service(db.clone())
            .execute(command(estate.id, owner, room_type.id))
            .await
            .unwrap();

        assert_eq!(rm.estate_id, estate.id);
        let state = db.committed();
        assert_eq!(state.rms.len(), 2);
        assert!(state.rms.contains_key(&rm.id));
    }
}
