//! [`Company`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};

use super::{define_id, define_text};

/// Company owning [`Estate`]s.
///
/// [`Estate`]: super::Estate
#[derive(Clone, Debug)]
pub struct Company {
    /// ID of this [`Company`].
    pub id: Id,

    /// [`Name`] of this [`Company`].
    pub name: Name,

    /// [`DateTime`] when this [`Company`] was created.
    pub created_at: CreationDateTime,
}

define_id! {
    /// ID of a [`Company`].
    Id
}

define_text! {
    /// Name of a [`Company`].
    Name(max = 255)
}

/// [`DateTime`] when a [`Company`] was created.
pub type CreationDateTime = DateTimeOf<(Company, unit::Creation)>;
