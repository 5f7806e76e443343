//! [`Query`] collection related to [`Taxon`]s.

use std::collections::HashMap;

use common::operations::By;

use crate::domain::{
    taxon::{self, Vocabulary},
    Taxon,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Taxon`] by its [`taxon::Id`].
pub type ById = DatabaseQuery<By<Option<Taxon>, taxon::Id>>;

/// Queries [`Taxon`]s by their [`taxon::Id`]s.
pub type ByIds =
    DatabaseQuery<By<HashMap<taxon::Id, Taxon>, Vec<taxon::Id>>>;

/// Queries all the [`Taxon`]s of a [`Vocabulary`] in list order.
pub type ByVocabulary = DatabaseQuery<By<Vec<Taxon>, Vocabulary>>;
