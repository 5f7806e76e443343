//! [`Command`] for creating a new [`Estate`].

use std::collections::HashMap;

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        company, compass,
        estate::{self, Details, TaxonRelation},
        taxon, user, Company, Compass, Estate, Taxon,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Estate`].
#[derive(Clone, Debug)]
pub struct CreateEstate {
    /// ID of the [`User`] creating the [`Estate`] and becoming its owner.
    ///
    /// [`User`]: crate::domain::User
    pub by: user::Id,

    /// [`Details`] of a new [`Estate`].
    pub details: Details,
}

impl<Db> Command<CreateEstate> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
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
        > + Database<Insert<Estate>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Estate;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateEstate) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateEstate { by, details } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        check_details(&tx, &details)
            .await
            .map_err(tracerr::wrap!())?;

        let now = DateTime::now();
        let estate = Estate {
            id: estate::Id::new(),
            details,
            user_id: Some(by),
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };
        tx.execute(Insert(estate.clone()))
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

/// Checks the provided [`Details`] against their own invariants and the
/// entities they reference.
///
/// # Errors
///
/// If any of the [`Details`] is invalid or refers to a missing entity.
pub(super) async fn check_details<Db>(
    db: &Db,
    details: &Details,
) -> Result<(), Traced<ExecutionError>>
where
    Db: Database<
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
        >,
{
    use ExecutionError as E;

    details
        .check(DateTime::now().year())
        .map_err(tracerr::from_and_wrap!(=> E))?;

    let ids = details.taxons().map(|(id, _)| id).collect::<Vec<_>>();
    let taxons = db
        .execute(Select(By::new(ids)))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;
    for (id, rel) in details.taxons() {
        let taxon = taxons
            .get(&id)
            .ok_or_else(|| tracerr::new!(E::TaxonNotExists(id)))?;
        TaxonRelation::admit(rel, taxon)
            .map_err(tracerr::from_and_wrap!(=> E))?;
    }

    let points = details.compass.iter().copied().collect::<Vec<_>>();
    let found = db
        .execute(Select(By::new(points)))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;
    if let Some(&id) =
        details.compass.iter().find(|id| !found.contains_key(*id))
    {
        return Err(tracerr::new!(E::CompassPointNotExists(id)));
    }

    if let Some(id) = details.company_id {
        _ = db
            .execute(Select(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::CompanyNotExists(id)))?;
    }

    Ok(())
}

/// Error of [`CreateEstate`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Details`] violate an invariant.
    #[display("Invalid `Estate` details: {_0}")]
    Invalid(estate::Violation),

    /// Referenced [`Taxon`] does not exist.
    #[display("`Taxon(id: {_0})` does not exist")]
    #[from(ignore)]
    TaxonNotExists(#[error(not(source))] taxon::Id),

    /// Referenced [`Compass`] point does not exist.
    #[display("`Compass(id: {_0})` does not exist")]
    #[from(ignore)]
    CompassPointNotExists(#[error(not(source))] compass::Id),

    /// Referenced [`Company`] does not exist.
    #[display("`Company(id: {_0})` does not exist")]
    #[from(ignore)]
    CompanyNotExists(#[error(not(source))] company::Id),
}
