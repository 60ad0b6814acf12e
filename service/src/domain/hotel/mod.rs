//! [`Hotel`] listing definitions.

pub mod lifecycle;
pub mod place;
pub mod room;

use std::{str::FromStr, sync::LazyLock};

use common::{unit, DateTime, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use smart_default::SmartDefault;
use uuid::Uuid;

use crate::domain::{text::define_text, user};

pub use self::{
    lifecycle::{RejectReason, Status, Transition},
    place::NearbyPlace,
    room::RoomType,
};

/// Hotel listing published on the marketplace by a merchant.
#[derive(Clone, Debug)]
pub struct Hotel {
    /// ID of this [`Hotel`].
    pub id: Id,

    /// ID of the merchant [`user::User`] owning this [`Hotel`].
    ///
    /// Never changes once the [`Hotel`] is created.
    pub merchant_id: user::Id,

    /// Descriptive [`Content`] of this [`Hotel`].
    pub content: Content,

    /// Moderation [`Status`] of this [`Hotel`].
    pub status: Status,

    /// [`RejectReason`] of the last rejection, present only while this
    /// [`Hotel`] is [`Status::Rejected`].
    pub reject_reason: Option<RejectReason>,

    /// [`DateTime`] when this [`Hotel`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Hotel`] was modified the last time.
    pub updated_at: ModificationDateTime,
}

impl Hotel {
    /// Creates a new [`Status::Draft`] [`Hotel`] owned by the provided
    /// merchant.
    #[must_use]
    pub fn new(merchant_id: user::Id, content: Content) -> Self {
        let now = DateTime::now();
        Self {
            id: Id::new(),
            merchant_id,
            content,
            status: Status::Draft,
            reject_reason: None,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    /// Indicates whether the provided [`user::Initiator`] owns this
    /// [`Hotel`] and so may edit it.
    #[must_use]
    pub fn is_owned_by(&self, initiator: &user::Initiator) -> bool {
        initiator.is_merchant(self.merchant_id)
    }

    /// Indicates whether this [`Hotel`] may be shown to the provided viewer.
    ///
    /// [`Status::Approved`] listings are public, the rest are visible to
    /// their owner and admins only.
    #[must_use]
    pub fn is_visible_to(&self, viewer: Option<&user::Initiator>) -> bool {
        self.status.is_public()
            || viewer.is_some_and(|v| v.is_admin() || self.is_owned_by(v))
    }

    /// Marks this [`Hotel`] as modified right now.
    pub fn touch(&mut self) {
        self.updated_at = DateTimeOf::now();
    }
}

/// ID of a [`Hotel`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    derive_more::FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
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

/// Descriptive content of a [`Hotel`], editable by its owner.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Content {
    /// [`Name`] of the [`Hotel`].
    pub name: Name,

    /// [`Name`] of the [`Hotel`] in English, if differs.
    pub english_name: Option<Name>,

    /// [`City`] the [`Hotel`] is located in.
    pub city: City,

    /// [`Address`] of the [`Hotel`].
    pub address: Address,

    /// [`Star`] rating of the [`Hotel`].
    pub star: Star,

    /// [`OpeningDate`] of the [`Hotel`], if known.
    pub opening_date: Option<OpeningDate>,

    /// [`Description`] of the [`Hotel`].
    pub description: Description,

    /// [`Label`]s the [`Hotel`] is tagged with, e.g. "family friendly".
    pub tags: Vec<Label>,

    /// Facilities of the [`Hotel`] as [`Label`]s, e.g. "swimming pool".
    pub facilities: Vec<Label>,

    /// [`ImageUrl`]s of the [`Hotel`] photos, in display order.
    pub images: Vec<ImageUrl>,
}

define_text! {
    #[doc = "Name of a [`Hotel`]."]
    Name, max = 128
}

define_text! {
    #[doc = "City a [`Hotel`] is located in."]
    City, max = 64
}

define_text! {
    #[doc = "Address of a [`Hotel`]."]
    Address, max = 256
}

define_text! {
    #[doc = "Short label: a tag or a facility of a [`Hotel`]."]
    Label, max = 32
}

/// Star rating of a [`Hotel`] from 1 to 5.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
    SmartDefault,
)]
pub struct Star(#[default(3)] u8);

impl Star {
    /// Creates a new [`Star`] rating if the given `stars` are in `1..=5`.
    #[must_use]
    pub fn new(stars: impl TryInto<u8>) -> Option<Self> {
        stars
            .try_into()
            .ok()
            .filter(|s| (1..=5).contains(s))
            .map(Self)
    }
}

/// Date a [`Hotel`] was opened in `YYYY-MM-DD` format.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct OpeningDate(String);

impl OpeningDate {
    /// Creates a new [`OpeningDate`] if the given `date` is valid.
    #[must_use]
    pub fn new(date: impl Into<String>) -> Option<Self> {
        let date = date.into();
        Self::check(&date).then_some(Self(date))
    }

    /// Checks whether the given `date` is a valid [`OpeningDate`].
    fn check(date: impl AsRef<str>) -> bool {
        /// `YYYY-MM-DD` with a month in `01..=12` and a day in `01..=31`.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$")
                .expect("valid regex")
        });

        REGEX.is_match(date.as_ref())
    }
}

impl FromStr for OpeningDate {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `OpeningDate`")
    }
}

/// Free-form description of a [`Hotel`], possibly empty.
#[derive(AsRef, Clone, Debug, Default, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Maximum length in characters.
    pub const MAX_LEN: usize = 8192;

    /// Creates a new [`Description`] if the given `text` is not too long.
    ///
    /// Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let text = text.trim();
        (text.chars().count() <= Self::MAX_LEN).then(|| Self(text.to_owned()))
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("too long `Description`")
    }
}

/// URL of an image, either absolute or relative to the uploads host.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Creates a new [`ImageUrl`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `url` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Creates a new [`ImageUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Self::check(&url).then_some(Self(url))
    }

    /// Checks whether the given `url` is a valid [`ImageUrl`].
    fn check(url: impl AsRef<str>) -> bool {
        /// `http(s)://` URL or an absolute path, without whitespace.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^(https?://[^\s/]+)?/\S*$").expect("valid regex")
        });

        let url = url.as_ref();
        url.len() <= 2048 && REGEX.is_match(url)
    }
}

impl FromStr for ImageUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ImageUrl`")
    }
}

/// [`DateTime`] when a [`Hotel`] was created.
pub type CreationDateTime = DateTimeOf<(Hotel, unit::Creation)>;

/// [`DateTime`] when a [`Hotel`] was modified the last time.
pub type ModificationDateTime = DateTimeOf<(Hotel, unit::Modification)>;

#[cfg(test)]
pub(crate) mod spec {
    use crate::domain::user::{self, Initiator, Role};

    use super::{
        Address, City, Content, Description, Hotel, Id, ImageUrl, Label, Name,
        OpeningDate, Star, Status,
    };

    /// Returns a minimal valid [`Content`] named after the provided `name`.
    pub(crate) fn content(name: &str) -> Content {
        Content {
            name: Name::new(name).unwrap(),
            english_name: None,
            city: City::new("上海").unwrap(),
            address: Address::new("No. 1 Century Avenue, Pudong").unwrap(),
            star: Star::default(),
            opening_date: None,
            description: Description::default(),
            tags: vec![],
            facilities: vec![],
            images: vec![],
        }
    }

    fn merchant(id: user::Id) -> Initiator {
        Initiator {
            id,
            role: Role::Merchant,
        }
    }

    #[test]
    fn new_hotel_is_draft_without_reason() {
        let hotel = Hotel::new(user::Id::new(), content("Bund View"));

        assert_eq!(hotel.status, Status::Draft);
        assert!(hotel.reject_reason.is_none());
        assert_eq!(hotel.created_at.coerce::<()>(), hotel.updated_at.coerce());
    }

    #[test]
    fn visibility() {
        let owner = user::Id::new();
        let mut hotel = Hotel::new(owner, content("Bund View"));
        let admin = Initiator {
            id: user::Id::new(),
            role: Role::Admin,
        };
        let stranger = merchant(user::Id::new());

        assert!(hotel.is_visible_to(Some(&merchant(owner))));
        assert!(hotel.is_visible_to(Some(&admin)));
        assert!(!hotel.is_visible_to(Some(&stranger)));
        assert!(!hotel.is_visible_to(None));

        hotel.status = Status::Approved;
        assert!(hotel.is_visible_to(Some(&stranger)));
        assert!(hotel.is_visible_to(None));

        hotel.status = Status::Offline;
        assert!(!hotel.is_visible_to(None));
    }

    #[test]
    fn ownership_requires_merchant_role() {
        let id = user::Id::new();
        let hotel = Hotel::new(id, content("Bund View"));

        assert!(hotel.is_owned_by(&merchant(id)));
        assert!(!hotel.is_owned_by(&Initiator {
            id,
            role: Role::Admin,
        }));
    }

    #[test]
    fn star_range() {
        assert_eq!(Star::default(), Star::new(3).unwrap());
        assert!(Star::new(0).is_none());
        assert!(Star::new(6).is_none());
        assert!(Star::new(-1).is_none());
        assert!(Star::new(5).is_some());
    }

    #[test]
    fn opening_date_format() {
        assert!(OpeningDate::new("2019-06-01").is_some());
        assert!(OpeningDate::new("2019-13-01").is_none());
        assert!(OpeningDate::new("2019-6-1").is_none());
        assert!(OpeningDate::new("01.06.2019").is_none());
    }

    #[test]
    fn image_url_format() {
        assert!(ImageUrl::new("https://cdn.example.com/h/1.jpg").is_some());
        assert!(ImageUrl::new("/uploads/1700000000-lobby.png").is_some());
        assert!(ImageUrl::new("lobby.png").is_none());
        assert!(ImageUrl::new("/uploads/with space.png").is_none());
        assert!(ImageUrl::new("").is_none());
    }

    #[test]
    fn parses_ids_and_opening_dates() {
        let id = Id::new();

        assert_eq!(id.to_string().parse::<Id>().unwrap(), id);
        assert!("not-an-id".parse::<Id>().is_err());
        assert!("2019-05-20".parse::<OpeningDate>().is_ok());
        assert!("2019-13-20".parse::<OpeningDate>().is_err());
    }

    #[test]
    fn description_is_trimmed_and_may_be_empty() {
        assert_eq!(
            AsRef::<str>::as_ref(&Description::new("  cozy  ").unwrap()),
            "cozy",
        );
        assert_eq!(Description::new("   ").unwrap(), Description::default());
        assert!(Description::new("x".repeat(8193)).is_none());
    }

    #[test]
    fn labels() {
        assert!(Label::new("免费停车").is_some());
        assert!(Label::new("").is_none());
    }
}
