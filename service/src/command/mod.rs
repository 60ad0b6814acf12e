//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_hotel;
pub mod create_room_type;
pub mod create_user;
pub mod create_user_session;
pub mod delete_room_type;
pub mod transit_hotel;
pub mod update_hotel;
pub mod update_room_type;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession, create_hotel::CreateHotel,
    create_room_type::CreateRoomType, create_user::CreateUser,
    create_user_session::CreateUserSession, delete_room_type::DeleteRoomType,
    transit_hotel::TransitHotel, update_hotel::UpdateHotel,
    update_room_type::UpdateRoomType,
};
