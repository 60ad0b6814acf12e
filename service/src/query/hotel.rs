//! [`Query`] collection related to a single [`Hotel`].

use common::operations::By;

use crate::{
    domain::{
        hotel::{self, NearbyPlace, RoomType},
        Hotel,
    },
    read::hotel::Listing,
};
#[cfg(doc)]
use crate::Query;

use super::Fetch;

/// Queries a [`Hotel`] by its [`hotel::Id`].
pub type ById = Fetch<By<Option<Hotel>, hotel::Id>>;

/// Queries a [`Listing`] of a [`Hotel`] by its [`hotel::Id`].
pub type ListingById = Fetch<By<Option<Listing>, hotel::Id>>;

/// Queries [`RoomType`]s of a [`Hotel`] by its [`hotel::Id`].
pub type RoomTypes = Fetch<By<Vec<RoomType>, hotel::Id>>;

/// Queries [`NearbyPlace`]s of a [`Hotel`] by its [`hotel::Id`].
pub type NearbyPlaces = Fetch<By<Vec<NearbyPlace>, hotel::Id>>;
