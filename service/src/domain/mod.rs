//! Domain definitions.

pub mod hotel;
pub(crate) mod text;
pub mod user;

pub use self::{hotel::Hotel, user::User};
