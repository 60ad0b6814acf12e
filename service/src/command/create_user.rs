//! [`Command`] for creating a new [`User`].

use argon2::password_hash;
use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox, SecretString};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{Login, Password, Role};
use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`User`].
#[derive(Clone, Debug)]
pub struct CreateUser {
    /// [`Login`] of a new [`User`].
    pub login: user::Login,

    /// [`Password`] of a new [`User`].
    pub password: SecretBox<user::Password>,

    /// [`Role`] of a new [`User`].
    pub role: user::Role,

    /// Invite code, required for a [`Role::Admin`] only.
    pub invite_code: Option<SecretString>,
}

impl<Db> Command<CreateUser> for Service<Db>
where
    Db: for<'l> Database<
            Select<By<Option<User>, &'l user::Login>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser {
            login,
            password,
            role,
            invite_code,
        } = cmd;

        if role == user::Role::Admin {
            let expected = self.config().admin_invite_code.expose_secret();
            if invite_code.as_ref().map(|c| c.expose_secret())
                != Some(expected)
            {
                return Err(tracerr::new!(E::InvalidInviteCode));
            }
        }

        let u = self
            .database()
            .execute(Select(By::new(&login)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if u.is_some() {
            return Err(tracerr::new!(E::LoginOccupied(login)));
        }

        let user = User {
            id: user::Id::new(),
            login,
            password_hash: user::PasswordHash::new(password.expose_secret())
                .map_err(tracerr::from_and_wrap!(=> E))?,
            role,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(user)
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Invite code is missing or doesn't match.
    #[display("Invalid admin invite code")]
    #[from(ignore)]
    InvalidInviteCode,

    /// [`user::Login`] is already occupied.
    #[display("`{_0}` login is occupied")]
    #[from(ignore)]
    LoginOccupied(#[error(not(source))] user::Login),

    /// [`user::Password`] hashing error.
    #[display("Failed to hash a password: {_0}")]
    PasswordHashing(#[error(not(source))] password_hash::Error),
}

#[cfg(test)]
mod spec {
    use secrecy::{SecretBox, SecretString};

    use crate::{
        domain::user::{Login, Password, Role},
        spec::{service, INVITE_CODE},
        Command as _,
    };

    use super::{CreateUser, ExecutionError};

    fn cmd(login: &str, role: Role, code: Option<&str>) -> CreateUser {
        CreateUser {
            login: Login::new(login).unwrap(),
            password: SecretBox::new(Box::new(
                Password::new("secret-pass").unwrap(),
            )),
            role,
            invite_code: code.map(|c| SecretString::from(c.to_owned())),
        }
    }

    #[tokio::test]
    async fn creates_merchant() {
        let svc = service();

        let user = svc
            .execute(cmd("merchant", Role::Merchant, None))
            .await
            .unwrap();

        assert_eq!(user.role, Role::Merchant);
        assert_eq!(user.login.to_string(), "merchant");
        assert!(user
            .password_hash
            .verify(&Password::new("secret-pass").unwrap()));
    }

    #[tokio::test]
    async fn rejects_occupied_login() {
        let svc = service();
        _ = svc
            .execute(cmd("merchant", Role::Merchant, None))
            .await
            .unwrap();

        let err = svc
            .execute(cmd("merchant", Role::Merchant, None))
            .await
            .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::LoginOccupied(_),
        ));
    }

    #[tokio::test]
    async fn admin_requires_invite_code() {
        let svc = service();

        for code in [None, Some("wrong")] {
            let err = svc
                .execute(cmd("admin", Role::Admin, code))
                .await
                .unwrap_err();
            assert!(matches!(
                err.into_inner(),
                ExecutionError::InvalidInviteCode,
            ));
        }

        let admin = svc
            .execute(cmd("admin", Role::Admin, Some(INVITE_CODE)))
            .await
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
    }
}
