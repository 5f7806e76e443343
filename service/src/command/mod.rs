//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_company;
pub mod create_compass_point;
pub mod create_estate;
pub mod create_rm;
pub mod create_taxon;
pub mod create_user;
pub mod create_user_session;
pub mod delete_estate;
pub mod delete_rm;
pub mod record_visitor_hit;
pub mod update_estate;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    create_company::CreateCompany, create_compass_point::CreateCompassPoint,
    create_estate::CreateEstate, create_rm::CreateRm,
    create_taxon::CreateTaxon, create_user::CreateUser,
    create_user_session::CreateUserSession, delete_estate::DeleteEstate,
    delete_rm::DeleteRm, record_visitor_hit::RecordVisitorHit,
    update_estate::UpdateEstate,
};
