//! GraphQL API definitions.

pub mod hotel;
mod mutation;
mod query;
pub mod scalar;
pub mod user;

use service::domain;

use crate::{define_error, Context};

pub use self::{hotel::Hotel, mutation::Mutation, query::Query, user::User};

/// GraphQL schema.
pub type Schema = juniper::RootNode<
    'static,
    Query,
    Mutation,
    juniper::EmptySubscription<Context>,
>;

define_error! {
    enum PrivilegeError {
        #[code = "NOT_MERCHANT"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be a merchant"]
        Merchant,

        #[code = "NOT_ADMIN"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be an admin"]
        Admin,
    }
}

impl From<domain::user::Role> for PrivilegeError {
    fn from(role: domain::user::Role) -> Self {
        use domain::user::Role as R;

        match role {
            R::Merchant => Self::Merchant,
            R::Admin => Self::Admin,
        }
    }
}

define_error! {
    enum PaginationError {
        #[code = "INVALID_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "`page` must be positive and `perPage` within 1..=100"]
        Invalid,
    }
}
