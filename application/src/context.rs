//! [`Context`]-related definitions.

use std::sync::atomic::{self, AtomicU16};

use axum::{
    async_trait,
    extract::FromRequestParts,
    response::{IntoResponse as _, Response},
    Json, RequestPartsExt as _,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use common::DateTime;
use juniper::{http::GraphQLResponse, DefaultScalarValue, IntoFieldError as _};
use service::{
    command::{self, Command as _},
    domain::user::{self, session},
};
use tokio::sync::OnceCell;

#[cfg(doc)]
use crate::api::User;
use crate::{api, define_error, AsError, Error, Service};

/// Per-request context of the GraphQL API.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] executing the request.
    service: Service,

    /// Status code of the response, applied if the request fails.
    error_status_code: AtomicU16,

    /// Parts of the HTTP request, holding its authorization header.
    parts: http::request::Parts,

    /// Outcome of the [`Session`] authentication, performed once per
    /// request.
    session: OnceCell<Result<Session, Error>>,
}

impl Context {
    /// Returns the [`Service`] of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the status code to respond with if the request fails.
    #[must_use]
    pub fn error_status_code(&self) -> http::StatusCode {
        let code = self.error_status_code.load(atomic::Ordering::Relaxed);
        http::StatusCode::from_u16(code)
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Sets the status code to respond with if the request fails.
    pub fn set_error_status_code(&self, status_code: http::StatusCode) {
        self.error_status_code
            .store(status_code.as_u16(), atomic::Ordering::Relaxed);
    }

    /// Returns a [`Result::map_err()`] closure recording the status code of
    /// the passed [`Error`] via [`Context::set_error_status_code()`].
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        |err| {
            self.set_error_status_code(err.status_code);
            err
        }
    }

    /// Sets the current [`Session`], unless it has been resolved already.
    pub fn set_current_session(&self, session: Session) {
        _ = self.session.set(Ok(session));
    }

    /// Returns the current [`Session`], if the request is authorized.
    ///
    /// # Errors
    ///
    /// If the provided authentication token is invalid.
    pub async fn try_current_session(&self) -> Result<Option<Session>, Error> {
        let unauthorized = Error::from(AuthError::AuthorizationRequired).code;
        match self.resolve_session().await {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.code == unauthorized => Ok(None),
            Err(e) => Err(e).map_err(self.error()),
        }
    }

    /// Returns the current [`Session`].
    ///
    /// # Errors
    ///
    /// If the request is not authorized, or the provided authentication
    /// token is invalid.
    pub async fn current_session(&self) -> Result<Session, Error> {
        self.resolve_session().await.map_err(self.error())
    }

    /// Resolves the [`Session`] of the request, authenticating it on the
    /// first call only.
    async fn resolve_session(&self) -> Result<Session, Error> {
        self.session.get_or_init(|| self.authenticate()).await.clone()
    }

    /// Authenticates the [`Session`] by the bearer token of the request.
    async fn authenticate(&self) -> Result<Session, Error> {
        let TypedHeader(Authorization(bearer)) = self
            .parts
            .clone()
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|e| {
                if e.is_missing() {
                    AuthError::AuthorizationRequired.into()
                } else {
                    e.into_error()
                }
            })?;

        #[expect(unsafe_code, reason = "token comes from the header as is")]
        let token =
            unsafe { session::Token::new_unchecked(bearer.token().to_owned()) };
        let authorized = self
            .service
            .execute(command::AuthorizeUserSession {
                token: token.clone(),
            })
            .await
            .map_err(AsError::into_error)?;

        Ok(Session {
            user_id: authorized.user_id.into(),
            role: authorized.role,
            token,
            expires_at: authorized.expires_at.coerce(),
        })
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let Some(service) = parts.extensions.get::<Service>().cloned() else {
            let err = Error::internal(&"missing `Service` extension");
            return Err((
                http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(GraphQLResponse::<DefaultScalarValue>::error(
                    err.into_field_error(),
                )),
            )
                .into_response());
        };

        Ok(Self {
            service,
            error_status_code: AtomicU16::new(
                http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ),
            parts: parts.clone(),
            session: OnceCell::new(),
        })
    }
}

/// User session.
#[derive(Clone, Debug)]
pub struct Session {
    /// ID of the [`User`] associated with this [`Session`].
    pub user_id: api::user::Id,

    /// [`user::Role`] of the [`User`] associated with this [`Session`].
    pub role: user::Role,

    /// Authentication token.
    pub token: session::Token,

    /// [`DateTime`] when this [`Session`] expires.
    pub expires_at: DateTime,
}

impl Session {
    /// Returns the [`user::Initiator`] acting within this [`Session`].
    #[must_use]
    pub fn initiator(&self) -> user::Initiator {
        user::Initiator {
            id: self.user_id.into(),
            role: self.role,
        }
    }

    /// Returns the [`user::Initiator`] acting within this [`Session`] if it
    /// has the provided [`user::Role`].
    ///
    /// # Errors
    ///
    /// With the [`api::PrivilegeError`] if the [`user::Role`] differs.
    pub fn initiator_of(
        &self,
        role: user::Role,
    ) -> Result<user::Initiator, Error> {
        if self.role == role {
            Ok(self.initiator())
        } else {
            Err(api::PrivilegeError::from(role).into())
        }
    }
}

impl AsError for command::authorize_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenDecodeError(_) => {
                Some(AuthError::AuthorizationRequired.into())
            }
            Self::UserNotExists(_) => {
                Some(AuthError::AuthorizationRequired.into())
            }
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authorization required"]
        AuthorizationRequired,
    }
}

#[cfg(test)]
mod spec {
    use service::{command::authorize_user_session::ExecutionError, domain};

    use crate::AsError as _;

    #[test]
    fn token_of_missing_user_requires_authorization() {
        let err =
            ExecutionError::UserNotExists(domain::user::Id::new()).into_error();

        assert_eq!(err.code, "AUTHORIZATION_REQUIRED");
        assert_eq!(err.status_code, http::StatusCode::UNAUTHORIZED);
    }
}
