//! [`Query`] collection related to [`Compass`] points.

use std::collections::HashMap;

use common::operations::By;

use crate::domain::{compass, Compass};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`Compass`] points ordered by name.
pub type All = DatabaseQuery<By<Vec<Compass>, ()>>;

/// Queries [`Compass`] points by their [`compass::Id`]s.
pub type ByIds =
    DatabaseQuery<By<HashMap<compass::Id, Compass>, Vec<compass::Id>>>;
