//! [`Command`] for creating a new [`Taxon`].

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        taxon::{self, Applicability, Vocabulary},
        Data, Taxon,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Taxon`].
#[derive(Clone, Debug)]
pub struct CreateTaxon {
    /// [`Vocabulary`] of a new [`Taxon`].
    pub vocabulary: Vocabulary,

    /// [`Data`] of a new [`Taxon`].
    pub data: Data,

    /// [`Applicability`] of a new [`Taxon`].
    pub applicability: Applicability,
}

impl<Db> Command<CreateTaxon> for Service<Db>
where
    Db: Database<Insert<Taxon>, Err = Traced<database::Error>>,
{
    type Ok = Taxon;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateTaxon) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateTaxon {
            vocabulary,
            data,
            applicability,
        } = cmd;

        if !vocabulary.allows(applicability) {
            return Err(tracerr::new!(E::UnscopedVocabulary(vocabulary)));
        }

        let taxon = Taxon {
            id: taxon::Id::new(),
            vocabulary,
            data,
            applicability,
        };
        self.database()
            .execute(Insert(taxon.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(taxon)
    }
}

/// Error of [`CreateTaxon`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Applicability`] is set for a [`Vocabulary`] not having one.
    #[display("`{_0}` taxons cannot be internal or external")]
    #[from(ignore)]
    UnscopedVocabulary(#[error(not(source))] Vocabulary),
}
