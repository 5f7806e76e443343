//! GraphQL API definitions.

pub mod company;
pub mod compass;
pub mod data;
pub mod estate;
mod mutation;
mod query;
pub mod rm;
pub mod scalar;
mod subscription;
pub mod taxon;
pub mod user;

use crate::define_error;

pub use self::{
    company::Company, compass::Compass, estate::Estate, mutation::Mutation,
    query::Query, rm::Rm, subscription::Subscription, taxon::Taxon,
    user::User,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

define_error! {
    enum OwnershipError {
        #[code = "NOT_OWNER"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` does not own the `Estate`"]
        NotOwner,
    }
}

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}
