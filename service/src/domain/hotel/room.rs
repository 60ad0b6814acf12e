//! [`RoomType`] definitions.

use common::Money;
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use smart_default::SmartDefault;
use uuid::Uuid;

use crate::domain::{hotel, text::define_text};

/// Type of rooms offered by a [`Hotel`].
///
/// [`Hotel`]: hotel::Hotel
#[derive(Clone, Debug)]
pub struct RoomType {
    /// ID of this [`RoomType`].
    pub id: Id,

    /// ID of the [`Hotel`] offering this [`RoomType`].
    ///
    /// [`Hotel`]: hotel::Hotel
    pub hotel_id: hotel::Id,

    /// [`Details`] of this [`RoomType`].
    pub details: Details,
}

impl RoomType {
    /// Creates a new [`RoomType`] of the provided [`Hotel`].
    ///
    /// [`Hotel`]: hotel::Hotel
    #[must_use]
    pub fn new(hotel_id: hotel::Id, details: Details) -> Self {
        Self {
            id: Id::new(),
            hotel_id,
            details,
        }
    }
}

/// ID of a [`RoomType`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    FromStr,
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

/// Editable details of a [`RoomType`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Details {
    /// [`Name`] of the [`RoomType`].
    pub name: Name,

    /// [`Price`] of a night in the [`RoomType`].
    pub price: Price,

    /// [`Price`] before a discount, shown struck through.
    pub original_price: Option<Price>,

    /// How many guests the [`RoomType`] accommodates.
    pub capacity: Capacity,

    /// Whether a breakfast is included.
    pub breakfast: bool,

    /// [`ImageUrl`]s of the [`RoomType`] photos, in display order.
    ///
    /// [`ImageUrl`]: hotel::ImageUrl
    pub images: Vec<hotel::ImageUrl>,
}

define_text! {
    #[doc = "Name of a [`RoomType`], e.g. \"Deluxe King Room\"."]
    Name, max = 128
}

/// Non-negative [`Money`] price of a [`RoomType`].
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
pub struct Price(Money);

impl Price {
    /// Creates a new [`Price`] if the given `amount` is not negative.
    #[must_use]
    pub fn new(amount: Money) -> Option<Self> {
        (!amount.is_negative()).then_some(Self(amount))
    }

    /// Returns the [`Money`] amount of this [`Price`].
    #[must_use]
    pub const fn money(self) -> Money {
        self.0
    }
}

/// Number of guests a [`RoomType`] accommodates, from 1 to 20.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
    SmartDefault,
)]
pub struct Capacity(#[default(2)] u8);

impl Capacity {
    /// Creates a new [`Capacity`] if the given `guests` are in `1..=20`.
    #[must_use]
    pub fn new(guests: impl TryInto<u8>) -> Option<Self> {
        guests
            .try_into()
            .ok()
            .filter(|g| (1..=20).contains(g))
            .map(Self)
    }
}

/// Returns the lowest [`Price`] among the provided [`RoomType`]s, if any.
pub fn lowest_price<'r>(
    rooms: impl IntoIterator<Item = &'r RoomType>,
) -> Option<Price> {
    rooms
        .into_iter()
        .map(|r| r.details.price)
        .min_by(|a, b| a.0.amount.cmp(&b.0.amount))
}
