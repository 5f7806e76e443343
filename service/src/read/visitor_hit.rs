//! [`VisitorHit`]-related read definitions.
//!
//! [`VisitorHit`]: crate::domain::VisitorHit

use derive_more::{From, Into};

/// Total count of recorded [`VisitorHit`]s.
///
/// [`VisitorHit`]: crate::domain::VisitorHit
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
pub struct TotalCount(i64);
