//! [`Query`] collection related to [`Rm`]s.

use common::operations::By;

use crate::domain::{estate, rm, Rm};
#[cfg(doc)]
use crate::{domain::Estate, Query};

use super::DatabaseQuery;

/// Queries an [`Rm`] by its [`rm::Id`].
pub type ById = DatabaseQuery<By<Option<Rm>, rm::Id>>;

/// Queries all the [`Rm`]s of an [`Estate`] in list order.
pub type ByEstate = DatabaseQuery<By<Vec<Rm>, estate::Id>>;
