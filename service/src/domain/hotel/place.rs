//! [`NearbyPlace`] definitions.

use common::define_kind;
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use uuid::Uuid;

use crate::domain::{hotel, text::define_text};

/// Point of interest near a [`Hotel`].
///
/// [`Hotel`]: hotel::Hotel
#[derive(Clone, Debug)]
pub struct NearbyPlace {
    /// ID of this [`NearbyPlace`].
    pub id: Id,

    /// ID of the [`Hotel`] this [`NearbyPlace`] is near to.
    ///
    /// [`Hotel`]: hotel::Hotel
    pub hotel_id: hotel::Id,

    /// [`Details`] of this [`NearbyPlace`].
    pub details: Details,
}

impl NearbyPlace {
    /// Creates a new [`NearbyPlace`] near the provided [`Hotel`].
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

/// ID of a [`NearbyPlace`].
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

/// Details of a [`NearbyPlace`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Details {
    /// [`Kind`] of the [`NearbyPlace`].
    pub kind: Kind,

    /// [`Name`] of the [`NearbyPlace`].
    pub name: Name,

    /// [`Distance`] from the [`Hotel`] to the [`NearbyPlace`].
    ///
    /// [`Hotel`]: hotel::Hotel
    pub distance: Distance,
}

define_kind! {
    #[doc = "Kind of a [`NearbyPlace`]."]
    enum Kind {
        #[doc = "Tourist attraction."]
        Attraction = 1,

        #[doc = "Public transport stop or station."]
        Transport = 2,

        #[doc = "Shopping mall."]
        Mall = 3,
    }
}

define_text! {
    #[doc = "Name of a [`NearbyPlace`]."]
    Name, max = 128
}

define_text! {
    #[doc = "Human-readable distance to a [`NearbyPlace`], e.g. \"500m\"."]
    Distance, max = 32
}
