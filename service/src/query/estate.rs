//! [`Query`] collection related to a single [`Estate`].

use common::operations::By;

use crate::domain::{estate, Estate};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries an [`Estate`] by its [`estate::Id`].
pub type ById = DatabaseQuery<By<Option<Estate>, estate::Id>>;
