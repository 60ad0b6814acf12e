//! GraphQL [`Mutation`]s definitions.

use juniper::graphql_object;
use secrecy::{SecretBox, SecretString};
use service::{
    command,
    domain::{self, hotel::Transition},
    Command as _,
};

use crate::{
    api::{self, hotel::HotelError},
    define_error, AsError, Context, Error, Session,
};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";

    /// Applies the provided [`Transition`] to the `Hotel` on behalf of the
    /// authenticated `User`.
    async fn transit_hotel(
        id: api::hotel::Id,
        transition: Transition,
        ctx: &Context,
    ) -> Result<api::Hotel, Error> {
        let initiator = ctx.current_session().await?.initiator();

        ctx.service()
            .execute(command::TransitHotel {
                hotel_id: id.into(),
                initiator,
                transition,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Registers a new `User` and authenticates as it.
    ///
    /// Registering an `ADMIN` requires the admin `inviteCode`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LOGIN_OCCUPIED` - provided `UserLogin` is occupied by another `User`;
    /// - `INVALID_INVITE_CODE` - `inviteCode` is missing or wrong for an
    ///                           `ADMIN`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUser",
            login = %login,
            otel.name = Self::SPAN_NAME,
            role = ?role,
        ),
    )]
    pub async fn create_user(
        login: api::user::Login,
        password: api::user::Password,
        role: api::user::Role,
        invite_code: Option<String>,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let user = ctx
            .service()
            .execute(command::CreateUser {
                login: login.into(),
                password: SecretBox::init_with(move || password.into()),
                role: role.into(),
                invite_code: invite_code.map(SecretString::from),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByUserId(user.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session::from(&output));

        Ok(output.into())
    }

    /// Authenticates with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials does not match any `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUserSession",
            login = %login,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_user_session(
        login: api::user::Login,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByCredentials {
                login: login.into(),
                password: SecretBox::init_with(move || password.into()),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session::from(&output));

        Ok(output.into())
    }

    /// Creates a new `Hotel` in the `DRAFT` status, owned by the
    /// authenticated merchant.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_MERCHANT` - the authenticated `User` is not a merchant;
    /// - `INVALID_STAR`, `INVALID_CAPACITY`, `NEGATIVE_PRICE` - malformed
    ///   input.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createHotel",
            name = %hotel.name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_hotel(
        hotel: api::hotel::Input,
        room_types: Option<Vec<api::hotel::room::Input>>,
        nearby_places: Option<Vec<api::hotel::place::Input>>,
        ctx: &Context,
    ) -> Result<api::Hotel, Error> {
        let initiator = ctx.current_session().await?.initiator();

        let content: domain::hotel::Content = hotel
            .try_into()
            .map_err(Error::from)
            .map_err(ctx.error())?;
        let room_types = room_types
            .unwrap_or_default()
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<domain::hotel::room::Details>, _>>()
            .map_err(Error::from)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateHotel {
                initiator,
                content,
                room_types,
                nearby_places: nearby_places
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Edits the `Hotel` owned by the authenticated merchant.
    ///
    /// Provided `roomTypes` and `nearbyPlaces` replace the existing ones.
    /// The `Hotel` keeps its status.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FOUND` - the `Hotel` does not exist;
    /// - `FORBIDDEN` - the `Hotel` is not owned by the authenticated `User`;
    /// - `INVALID_STAR`, `INVALID_CAPACITY`, `NEGATIVE_PRICE` - malformed
    ///   input.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateHotel",
            hotel.id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_hotel(
        id: api::hotel::Id,
        patch: api::hotel::Patch,
        room_types: Option<Vec<api::hotel::room::Input>>,
        nearby_places: Option<Vec<api::hotel::place::Input>>,
        ctx: &Context,
    ) -> Result<api::Hotel, Error> {
        let initiator = ctx.current_session().await?.initiator();

        let content: command::update_hotel::Changes = patch
            .try_into()
            .map_err(Error::from)
            .map_err(ctx.error())?;
        let room_types = room_types
            .map(|rooms| {
                rooms
                    .into_iter()
                    .map(TryInto::try_into)
                    .collect::<Result<Vec<domain::hotel::room::Details>, _>>()
            })
            .transpose()
            .map_err(Error::from)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpdateHotel {
                hotel_id: id.into(),
                initiator,
                content,
                room_types,
                nearby_places: nearby_places
                    .map(|places| places.into_iter().map(Into::into).collect()),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Submits the `Hotel` for a review.
    ///
    /// Allowed for the owning merchant on a `DRAFT` or `REJECTED` `Hotel`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FOUND` - the `Hotel` does not exist;
    /// - `FORBIDDEN` - the authenticated `User` is not the owning merchant;
    /// - `INVALID_HOTEL_STATUS` - the `Hotel` cannot be submitted in its
    ///                            current status.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "submitHotel",
            hotel.id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn submit_hotel(
        id: api::hotel::Id,
        ctx: &Context,
    ) -> Result<api::Hotel, Error> {
        Self::transit_hotel(id, Transition::Submit, ctx).await
    }

    /// Approves the `PENDING` `Hotel`, listing it publicly.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FOUND` - the `Hotel` does not exist;
    /// - `FORBIDDEN` - the authenticated `User` is not an admin;
    /// - `INVALID_HOTEL_STATUS` - the `Hotel` is not `PENDING`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "approveHotel",
            hotel.id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn approve_hotel(
        id: api::hotel::Id,
        ctx: &Context,
    ) -> Result<api::Hotel, Error> {
        Self::transit_hotel(id, Transition::Approve, ctx).await
    }

    /// Rejects the `PENDING` `Hotel` with the provided `reason`.
    ///
    /// An omitted or blank `reason` is replaced with a default one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FOUND` - the `Hotel` does not exist;
    /// - `FORBIDDEN` - the authenticated `User` is not an admin;
    /// - `INVALID_HOTEL_STATUS` - the `Hotel` is not `PENDING`;
    /// - `INVALID_REJECT_REASON` - the `reason` is too long.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "rejectHotel",
            hotel.id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn reject_hotel(
        id: api::hotel::Id,
        reason: Option<String>,
        ctx: &Context,
    ) -> Result<api::Hotel, Error> {
        let reason = domain::hotel::RejectReason::or_default(reason)
            .ok_or(api::hotel::InputError::RejectReason)
            .map_err(Error::from)
            .map_err(ctx.error())?;

        Self::transit_hotel(id, Transition::Reject(reason), ctx).await
    }

    /// Takes the `APPROVED` `Hotel` off the public listing.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FOUND` - the `Hotel` does not exist;
    /// - `FORBIDDEN` - the authenticated `User` is not an admin;
    /// - `INVALID_HOTEL_STATUS` - the `Hotel` is not `APPROVED`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "takeHotelOffline",
            hotel.id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn take_hotel_offline(
        id: api::hotel::Id,
        ctx: &Context,
    ) -> Result<api::Hotel, Error> {
        Self::transit_hotel(id, Transition::TakeOffline, ctx).await
    }

    /// Brings the `OFFLINE` `Hotel` back to the public listing.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FOUND` - the `Hotel` does not exist;
    /// - `FORBIDDEN` - the authenticated `User` is not an admin;
    /// - `INVALID_HOTEL_STATUS` - the `Hotel` is not `OFFLINE`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "bringHotelOnline",
            hotel.id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn bring_hotel_online(
        id: api::hotel::Id,
        ctx: &Context,
    ) -> Result<api::Hotel, Error> {
        Self::transit_hotel(id, Transition::BringOnline, ctx).await
    }

    /// Adds a new `RoomType` to the `Hotel` owned by the authenticated
    /// merchant.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FOUND` - the `Hotel` does not exist;
    /// - `FORBIDDEN` - the `Hotel` is not owned by the authenticated `User`;
    /// - `INVALID_CAPACITY`, `NEGATIVE_PRICE` - malformed input.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createRoomType",
            hotel.id = %hotel_id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_room_type(
        hotel_id: api::hotel::Id,
        room_type: api::hotel::room::Input,
        ctx: &Context,
    ) -> Result<api::hotel::RoomType, Error> {
        let initiator = ctx.current_session().await?.initiator();
        let details: domain::hotel::room::Details = room_type
            .try_into()
            .map_err(Error::from)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateRoomType {
                hotel_id: hotel_id.into(),
                initiator,
                details,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Edits the `RoomType` of the `Hotel` owned by the authenticated
    /// merchant.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FOUND` - the `RoomType` does not exist;
    /// - `FORBIDDEN` - the `Hotel` is not owned by the authenticated `User`;
    /// - `INVALID_CAPACITY`, `NEGATIVE_PRICE` - malformed input.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateRoomType",
            otel.name = Self::SPAN_NAME,
            room_type.id = %id,
        ),
    )]
    pub async fn update_room_type(
        id: api::hotel::room::Id,
        patch: api::hotel::room::Patch,
        ctx: &Context,
    ) -> Result<api::hotel::RoomType, Error> {
        let initiator = ctx.current_session().await?.initiator();
        let details: command::update_room_type::Changes = patch
            .try_into()
            .map_err(Error::from)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpdateRoomType {
                room_type_id: id.into(),
                initiator,
                details,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the `RoomType` from the `Hotel` owned by the authenticated
    /// merchant.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FOUND` - the `RoomType` does not exist;
    /// - `FORBIDDEN` - the `Hotel` is not owned by the authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteRoomType",
            otel.name = Self::SPAN_NAME,
            room_type.id = %id,
        ),
    )]
    pub async fn delete_room_type(
        id: api::hotel::room::Id,
        ctx: &Context,
    ) -> Result<api::hotel::RoomType, Error> {
        let initiator = ctx.current_session().await?.initiator();

        ctx.service()
            .execute(command::DeleteRoomType {
                room_type_id: id.into(),
                initiator,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_INVITE_CODE"]
                #[status = FORBIDDEN]
                #[message = "Admin invite code is missing or wrong"]
                InvalidInviteCode,

                #[code = "LOGIN_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "`UserLogin` is occupied by another `User`"]
                LoginOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidInviteCode => Some(Error::InvalidInviteCode.into()),
            Self::LoginOccupied(_) => Some(Error::LoginOccupied.into()),
            Self::PasswordHashing(_) => None,
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = FORBIDDEN]
                #[message = "Provided credentials does not match any `User`"]
                WrongCredentials,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::UserNotExists(_) | Self::WrongCredentials => {
                Some(Error::WrongCredentials.into())
            }
        }
    }
}

impl AsError for command::create_hotel::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotMerchant(_) => Some(api::PrivilegeError::Merchant.into()),
        }
    }
}

impl AsError for command::update_hotel::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::HotelNotExists(_) => HotelError::NotExists.into(),
            Self::NotOwner(_) => HotelError::NotOwner.into(),
        })
    }
}

impl AsError for command::transit_hotel::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::HotelNotExists(_) => HotelError::NotExists.into(),
            Self::Transition(e) => e.into(),
        })
    }
}

impl AsError for command::create_room_type::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::HotelNotExists(_) => HotelError::NotExists.into(),
            Self::NotOwner(_) => HotelError::NotOwner.into(),
        })
    }
}

impl AsError for command::update_room_type::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use api::hotel::room::RoomTypeError;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotOwner(_) => HotelError::NotOwner.into(),
            Self::RoomTypeNotExists(_) => RoomTypeError::NotExists.into(),
        })
    }
}

impl AsError for command::delete_room_type::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use api::hotel::room::RoomTypeError;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotOwner(_) => HotelError::NotOwner.into(),
            Self::RoomTypeNotExists(_) => RoomTypeError::NotExists.into(),
        })
    }
}

#[cfg(test)]
mod spec {
    use service::{
        command::{self, transit_hotel},
        domain::{
            hotel::{
                self,
                lifecycle::{TransitionError, TransitionKind},
                Status,
            },
            user,
        },
    };

    use crate::{AsError, Error};

    fn error(e: &impl AsError) -> Error {
        e.try_as_error().unwrap()
    }

    #[test]
    fn transition_errors() {
        let err = error(&transit_hotel::ExecutionError::HotelNotExists(
            hotel::Id::new(),
        ));
        assert_eq!(err.code, "NOT_FOUND");
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);

        let err = error(&transit_hotel::ExecutionError::Transition(
            TransitionError::Forbidden(TransitionKind::Approve),
        ));
        assert_eq!(err.code, "FORBIDDEN");
        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);

        let err = error(&transit_hotel::ExecutionError::Transition(
            TransitionError::InvalidState {
                status: Status::Approved,
                transition: TransitionKind::Submit,
            },
        ));
        assert_eq!(err.code, "INVALID_HOTEL_STATUS");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);
        assert!(err.message.contains("SUBMIT"), "{}", err.message);
        assert!(err.message.contains("APPROVED"), "{}", err.message);
    }

    #[test]
    fn account_errors() {
        let err =
            error(&command::create_user::ExecutionError::InvalidInviteCode);
        assert_eq!(err.code, "INVALID_INVITE_CODE");

        let err = error(
            &command::create_user_session::ExecutionError::UserNotExists(
                user::Id::new(),
            ),
        );
        assert_eq!(err.code, "WRONG_CREDENTIALS");

        let err = error(&command::create_hotel::ExecutionError::NotMerchant(
            user::Id::new(),
        ));
        assert_eq!(err.code, "NOT_MERCHANT");
        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);
    }
}
