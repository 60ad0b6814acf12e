//! [`User`] definitions.

pub mod session;

use std::{str::FromStr, sync::LazyLock};

use argon2::{
    password_hash::{self, PasswordHasher as _, PasswordVerifier as _},
    Argon2,
};
#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use self::session::Session;

/// Platform user: either a hotel merchant or a marketplace admin.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`Login`] of this [`User`].
    pub login: Login,

    /// [`PasswordHash`] of this [`User`].
    pub password_hash: PasswordHash,

    /// [`Role`] of this [`User`].
    pub role: Role,

    /// [`DateTime`] when this [`User`] was created.
    pub created_at: CreationDateTime,
}

impl User {
    /// Returns the [`Initiator`] of actions performed by this [`User`].
    #[must_use]
    pub fn initiator(&self) -> Initiator {
        Initiator {
            id: self.id,
            role: self.role,
        }
    }
}

/// ID of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    derive_more::FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Role of a [`User`] on the marketplace."]
    enum Role {
        #[doc = "Owns hotel listings, edits them and submits for review."]
        Merchant = 1,

        #[doc = "Moderates hotel listings."]
        Admin = 2,
    }
}

/// Identity of the [`User`] performing an action.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Initiator {
    /// ID of the acting [`User`].
    pub id: Id,

    /// [`Role`] the acting [`User`] has.
    pub role: Role,
}

impl Initiator {
    /// Indicates whether this [`Initiator`] acts as an [`Role::Admin`].
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Indicates whether this [`Initiator`] acts as the [`Role::Merchant`]
    /// with the provided [`Id`].
    #[must_use]
    pub fn is_merchant(&self, id: Id) -> bool {
        self.role == Role::Merchant && self.id == id
    }
}

/// Login of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Login(String);

impl Login {
    /// Creates a new [`Login`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `login` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    /// Creates a new [`Login`] if the given `login` is valid.
    #[must_use]
    pub fn new(login: impl Into<String>) -> Option<Self> {
        let login = login.into();
        Self::check(&login).then_some(Self(login))
    }

    /// Checks whether the given `login` is a valid [`Login`].
    fn check(login: impl AsRef<str>) -> bool {
        /// 3 to 32 letters, digits, `_`, `-` or `.`.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[\p{L}\p{N}_.\-]{3,32}$").expect("valid regex")
        });

        REGEX.is_match(login.as_ref())
    }
}

impl FromStr for Login {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Login`")
    }
}

/// Password of a [`User`].
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
pub struct Password(String);

impl Password {
    /// Minimum length of a [`Password`] in characters.
    pub const MIN_LEN: usize = 6;

    /// Maximum length of a [`Password`] in characters.
    pub const MAX_LEN: usize = 128;

    /// Creates a new [`Password`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `password` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        (Self::MIN_LEN..=Self::MAX_LEN)
            .contains(&password.as_ref().chars().count())
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// [Argon2] hash of a [`Password`] in the [PHC string format].
///
/// [Argon2]: https://en.wikipedia.org/wiki/Argon2
/// [PHC string format]: https://github.com/P-H-C/phc-string-format
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes the provided [`Password`] with a random salt.
    ///
    /// # Errors
    ///
    /// If [`Argon2`] fails to hash the [`Password`].
    pub fn new(password: &Password) -> Result<Self, password_hash::Error> {
        let salt =
            password_hash::SaltString::encode_b64(Uuid::new_v4().as_bytes())?;
        Ok(Self(
            Argon2::default()
                .hash_password(password.0.as_bytes(), &salt)?
                .to_string(),
        ))
    }

    /// Checks whether this [`PasswordHash`] is a hash of the provided
    /// [`Password`].
    #[must_use]
    pub fn verify(&self, password: &Password) -> bool {
        password_hash::PasswordHash::new(&self.0).is_ok_and(|hash| {
            Argon2::default()
                .verify_password(password.0.as_bytes(), &hash)
                .is_ok()
        })
    }
}

/// [`DateTime`] when a [`User`] was created.
pub type CreationDateTime = DateTimeOf<(User, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Id, Initiator, Login, Password, PasswordHash, Role};

    #[test]
    fn parses_ids_and_logins() {
        let id = Id::new();

        assert_eq!(id.to_string().parse::<Id>().unwrap(), id);
        assert!("merchant_01".parse::<Login>().is_ok());
        assert!("no spaces".parse::<Login>().is_err());
    }

    #[test]
    fn password_hash_verifies_only_its_password() {
        let password = Password::new("s3cret-pass").unwrap();
        let hash = PasswordHash::new(&password).unwrap();

        assert!(hash.verify(&password));
        assert!(!hash.verify(&Password::new("s3cret-pasS").unwrap()));
    }

    #[test]
    fn password_hash_is_salted() {
        let password = Password::new("s3cret-pass").unwrap();

        assert_ne!(
            PasswordHash::new(&password).unwrap(),
            PasswordHash::new(&password).unwrap(),
        );
    }

    #[test]
    fn password_length() {
        assert!(Password::new("12345").is_none());
        assert!(Password::new("123456").is_some());
        assert!(Password::new("密码密码密码").is_some());
        assert!(Password::new("x".repeat(129)).is_none());
    }

    #[test]
    fn login_format() {
        assert!(Login::new("hotel_owner.1").is_some());
        assert!(Login::new("商家一号").is_some());
        assert!(Login::new("ab").is_none());
        assert!(Login::new("with space").is_none());
        assert!(Login::new("x".repeat(33)).is_none());
    }

    #[test]
    fn initiator_roles() {
        let id = Id::new();
        let merchant = Initiator {
            id,
            role: Role::Merchant,
        };
        let admin = Initiator {
            id,
            role: Role::Admin,
        };

        assert!(merchant.is_merchant(id));
        assert!(!merchant.is_merchant(Id::new()));
        assert!(!merchant.is_admin());
        assert!(admin.is_admin());
        assert!(!admin.is_merchant(id));
    }
}
