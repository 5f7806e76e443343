//! [`Query`] collection related to multiple [`Estate`]s.

use std::collections::HashMap;

use common::operations::By;

use crate::{
    domain::{estate, Estate},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries [`Estate`]s by their [`estate::Id`]s.
pub type ByIds =
    DatabaseQuery<By<HashMap<estate::Id, Estate>, Vec<estate::Id>>>;

/// Queries a cursor-paginated list of [`Estate`]s.
pub type List =
    DatabaseQuery<By<read::estate::list::Page, read::estate::list::Selector>>;

/// Queries a numbered page of [`Estate`]s.
pub type Numbered = DatabaseQuery<
    By<read::estate::numbered::Page, read::estate::numbered::Selector>,
>;

/// Queries total count of [`Estate`]s matching a filter.
pub type TotalCount =
    DatabaseQuery<By<read::estate::TotalCount, read::estate::Filter>>;
