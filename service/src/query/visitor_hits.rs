//! [`Query`] collection related to [`VisitorHit`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::VisitorHit, Query};

use super::DatabaseQuery;

/// Queries total count of recorded [`VisitorHit`]s.
pub type TotalCount = DatabaseQuery<By<read::visitor_hit::TotalCount, ()>>;
