//! [`Command`] for authorizing a [`Session`] of a [`User`] by its
//! [`session::Token`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use jsonwebtoken::{Algorithm, Validation};
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`User`] by the [`session::Token`] issued
/// to it.
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<Db> Command<AuthorizeUserSession> for Service<Db>
where
    Db: Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeUserSession { token } = cmd;

        let claims = jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.config.jwt_decoding_key,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims;

        let user = self
            .database()
            .execute(Select(By::new(claims.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::UserNotExists(claims.user_id)))?;

        // Stored role wins over the one issued with the token.
        Ok(Session {
            role: user.role,
            ..claims
        })
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] decoding error.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),

    /// [`User`] the [`Session`] belongs to does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;

    use secrecy::SecretBox;

    use crate::{
        command::CreateUser,
        domain::user::{self, session, Session},
        spec::service,
        Command as _, Service,
    };

    use super::{AuthorizeUserSession, ExecutionError};

    fn token_for<Db>(svc: &Service<Db>, claims: &Session) -> session::Token {
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            claims,
            &svc.config().jwt_encoding_key,
        )
        .unwrap();
        #[expect(unsafe_code, reason = "test token")]
        unsafe {
            session::Token::new_unchecked(token)
        }
    }

    #[tokio::test]
    async fn rejects_malformed_token() {
        #[expect(unsafe_code, reason = "test token")]
        let token = unsafe { session::Token::new_unchecked("garbage".into()) };

        let err = service()
            .execute(AuthorizeUserSession { token })
            .await
            .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }

    #[tokio::test]
    async fn rejects_token_of_unknown_user() {
        let svc = service();
        let claims = Session {
            user_id: user::Id::new(),
            role: user::Role::Admin,
            expires_at: (DateTime::now() + Duration::from_secs(60)).coerce(),
        };
        let token = token_for(&svc, &claims);

        let err = svc
            .execute(AuthorizeUserSession { token })
            .await
            .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::UserNotExists(id) if id == claims.user_id,
        ));
    }

    #[tokio::test]
    async fn takes_role_from_stored_user() {
        let svc = service();
        let merchant = svc
            .execute(CreateUser {
                login: user::Login::new("merchant").unwrap(),
                password: SecretBox::new(Box::new(
                    user::Password::new("secret-pass").unwrap(),
                )),
                role: user::Role::Merchant,
                invite_code: None,
            })
            .await
            .unwrap();
        let claims = Session {
            user_id: merchant.id,
            role: user::Role::Admin,
            expires_at: (DateTime::now() + Duration::from_secs(60)).coerce(),
        };

        let session = svc
            .execute(AuthorizeUserSession {
                token: token_for(&svc, &claims),
            })
            .await
            .unwrap();

        assert_eq!(session.user_id, merchant.id);
        assert_eq!(session.role, user::Role::Merchant);
    }
}
