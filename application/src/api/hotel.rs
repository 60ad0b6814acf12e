//! [`Hotel`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLScalar, Nullable,
};
use service::{command, domain, query, read, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    define_error, AsError, Context, Error,
};

pub use self::{place::NearbyPlace, room::RoomType};

/// A [`Hotel`] listing.
#[derive(Debug)]
pub struct Hotel {
    /// [`domain::Hotel`] representing this [`Hotel`].
    hotel: domain::Hotel,

    /// [`domain::hotel::RoomType`]s of this [`Hotel`], loaded on demand.
    room_types: OnceCell<Vec<domain::hotel::RoomType>>,

    /// [`domain::hotel::NearbyPlace`]s of this [`Hotel`], loaded on demand.
    nearby_places: OnceCell<Vec<domain::hotel::NearbyPlace>>,
}

impl From<domain::Hotel> for Hotel {
    fn from(hotel: domain::Hotel) -> Self {
        Self {
            hotel,
            room_types: OnceCell::new(),
            nearby_places: OnceCell::new(),
        }
    }
}

impl From<read::hotel::Listing> for Hotel {
    fn from(listing: read::hotel::Listing) -> Self {
        let read::hotel::Listing {
            hotel,
            room_types,
            nearby_places,
        } = listing;
        Self {
            hotel,
            room_types: OnceCell::new_with(Some(room_types)),
            nearby_places: OnceCell::new_with(Some(nearby_places)),
        }
    }
}

impl Hotel {
    /// Returns the [`domain::hotel::RoomType`]s of this [`Hotel`].
    ///
    /// # Errors
    ///
    /// If failed to load them.
    async fn load_room_types(
        &self,
        ctx: &Context,
    ) -> Result<&[domain::hotel::RoomType], Error> {
        self.room_types
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::hotel::RoomTypes::by(self.hotel.id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
            })
            .await
            .map(Vec::as_slice)
    }

    /// Returns the [`domain::hotel::NearbyPlace`]s of this [`Hotel`].
    ///
    /// # Errors
    ///
    /// If failed to load them.
    async fn load_nearby_places(
        &self,
        ctx: &Context,
    ) -> Result<&[domain::hotel::NearbyPlace], Error> {
        self.nearby_places
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::hotel::NearbyPlaces::by(self.hotel.id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
            })
            .await
            .map(Vec::as_slice)
    }
}

/// A `Hotel` listing.
#[graphql_object(context = Context)]
impl Hotel {
    /// Unique identifier of this `Hotel`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Hotel.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.hotel.id.into()
    }

    /// ID of the merchant `User` owning this `Hotel`.
    pub fn merchant_id(&self) -> api::user::Id {
        self.hotel.merchant_id.into()
    }

    /// Name of this `Hotel`.
    pub fn name(&self) -> Name {
        self.hotel.content.name.clone().into()
    }

    /// English name of this `Hotel`, if any.
    pub fn english_name(&self) -> Option<Name> {
        self.hotel.content.english_name.clone().map(Into::into)
    }

    /// City this `Hotel` is located in.
    pub fn city(&self) -> City {
        self.hotel.content.city.clone().into()
    }

    /// Address of this `Hotel`.
    pub fn address(&self) -> Address {
        self.hotel.content.address.clone().into()
    }

    /// Star rating of this `Hotel`, from 1 to 5.
    pub fn star(&self) -> i32 {
        u8::from(self.hotel.content.star).into()
    }

    /// Opening date of this `Hotel`, if known.
    pub fn opening_date(&self) -> Option<OpeningDate> {
        self.hotel.content.opening_date.clone().map(Into::into)
    }

    /// Description of this `Hotel`.
    pub fn description(&self) -> Description {
        self.hotel.content.description.clone().into()
    }

    /// Tags of this `Hotel`.
    pub fn tags(&self) -> Vec<Label> {
        self.hotel.content.tags.iter().cloned().map(Into::into).collect()
    }

    /// Facilities of this `Hotel`.
    pub fn facilities(&self) -> Vec<Label> {
        self.hotel
            .content
            .facilities
            .iter()
            .cloned()
            .map(Into::into)
            .collect()
    }

    /// Photos of this `Hotel`.
    pub fn images(&self) -> Vec<ImageUrl> {
        self.hotel.content.images.iter().cloned().map(Into::into).collect()
    }

    /// Moderation status of this `Hotel`.
    pub fn status(&self) -> Status {
        self.hotel.status.into()
    }

    /// Reason of the last rejection of this `Hotel`.
    ///
    /// Present only while this `Hotel` is `REJECTED`.
    pub fn reject_reason(&self) -> Option<String> {
        self.hotel.reject_reason.as_ref().map(ToString::to_string)
    }

    /// Room types of this `Hotel`, in the order they were added.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Hotel.roomTypes",
            hotel.id = %self.hotel.id,
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn room_types(
        &self,
        ctx: &Context,
    ) -> Result<Vec<RoomType>, Error> {
        Ok(self
            .load_room_types(ctx)
            .await?
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Places near this `Hotel`, in the order they were added.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Hotel.nearbyPlaces",
            hotel.id = %self.hotel.id,
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn nearby_places(
        &self,
        ctx: &Context,
    ) -> Result<Vec<NearbyPlace>, Error> {
        Ok(self
            .load_nearby_places(ctx)
            .await?
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Lowest price among the room types of this `Hotel`.
    ///
    /// Absent if this `Hotel` has no room types.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Hotel.lowestPrice",
            hotel.id = %self.hotel.id,
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn lowest_price(
        &self,
        ctx: &Context,
    ) -> Result<Option<Money>, Error> {
        let rooms = self.load_room_types(ctx).await?;
        Ok(domain::hotel::room::lowest_price(rooms)
            .map(domain::hotel::room::Price::money))
    }

    /// `DateTime` when this `Hotel` was created.
    pub fn created_at(&self) -> DateTime {
        self.hotel.created_at.coerce()
    }

    /// `DateTime` when this `Hotel` was modified last time.
    pub fn updated_at(&self) -> DateTime {
        self.hotel.updated_at.coerce()
    }
}

/// Unique identifier of a `Hotel`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::hotel::Id)]
#[into(domain::hotel::Id)]
#[graphql(name = "HotelId", transparent)]
pub struct Id(Uuid);

/// Name of a `Hotel`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "HotelName", with = scalar::Via::<domain::hotel::Name>)]
pub struct Name(domain::hotel::Name);

/// City a `Hotel` is located in.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "HotelCity", with = scalar::Via::<domain::hotel::City>)]
pub struct City(domain::hotel::City);

/// Address of a `Hotel`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "HotelAddress",
    with = scalar::Via::<domain::hotel::Address>,
)]
pub struct Address(domain::hotel::Address);

/// Tag or facility of a `Hotel`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "HotelLabel", with = scalar::Via::<domain::hotel::Label>)]
pub struct Label(domain::hotel::Label);

/// Opening date of a `Hotel` in `YYYY-MM-DD` format.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "HotelOpeningDate",
    with = scalar::Via::<domain::hotel::OpeningDate>,
)]
pub struct OpeningDate(domain::hotel::OpeningDate);

/// Description of a `Hotel`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "HotelDescription",
    with = scalar::Via::<domain::hotel::Description>,
)]
pub struct Description(domain::hotel::Description);

/// URL of an image, either absolute or starting with `/`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "ImageUrl", with = scalar::Via::<domain::hotel::ImageUrl>)]
pub struct ImageUrl(domain::hotel::ImageUrl);

/// Moderation status of a `Hotel`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "HotelStatus")]
pub enum Status {
    /// Being prepared by its merchant.
    Draft,

    /// Awaiting a review.
    Pending,

    /// Publicly listed.
    Approved,

    /// Rejected by a review.
    Rejected,

    /// Withdrawn from the public listing.
    Offline,
}

impl From<domain::hotel::Status> for Status {
    fn from(status: domain::hotel::Status) -> Self {
        use domain::hotel::Status as S;

        match status {
            S::Draft => Self::Draft,
            S::Pending => Self::Pending,
            S::Approved => Self::Approved,
            S::Rejected => Self::Rejected,
            S::Offline => Self::Offline,
        }
    }
}

impl From<Status> for domain::hotel::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => Self::Draft,
            Status::Pending => Self::Pending,
            Status::Approved => Self::Approved,
            Status::Rejected => Self::Rejected,
            Status::Offline => Self::Offline,
        }
    }
}

/// Content of a new `Hotel`.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "HotelInput")]
pub struct Input {
    /// Name of the `Hotel`.
    pub name: Name,

    /// English name of the `Hotel`.
    pub english_name: Option<Name>,

    /// City the `Hotel` is located in.
    pub city: City,

    /// Address of the `Hotel`.
    pub address: Address,

    /// Star rating from 1 to 5, 3 by default.
    pub star: Option<i32>,

    /// Opening date of the `Hotel`.
    pub opening_date: Option<OpeningDate>,

    /// Description of the `Hotel`.
    pub description: Option<Description>,

    /// Tags of the `Hotel`.
    pub tags: Option<Vec<Label>>,

    /// Facilities of the `Hotel`.
    pub facilities: Option<Vec<Label>>,

    /// Photos of the `Hotel`.
    pub images: Option<Vec<ImageUrl>>,
}

impl TryFrom<Input> for domain::hotel::Content {
    type Error = InputError;

    fn try_from(input: Input) -> Result<Self, Self::Error> {
        let Input {
            name,
            english_name,
            city,
            address,
            star,
            opening_date,
            description,
            tags,
            facilities,
            images,
        } = input;
        Ok(Self {
            name: name.into(),
            english_name: english_name.map(Into::into),
            city: city.into(),
            address: address.into(),
            star: star.map(star_of).transpose()?.unwrap_or_default(),
            opening_date: opening_date.map(Into::into),
            description: description.map(Into::into).unwrap_or_default(),
            tags: labels(tags.unwrap_or_default()),
            facilities: labels(facilities.unwrap_or_default()),
            images: images_of(images.unwrap_or_default()),
        })
    }
}

/// Changes of a `Hotel` content.
///
/// Omitted fields are left intact.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "HotelPatch")]
pub struct Patch {
    /// New name of the `Hotel`.
    pub name: Option<Name>,

    /// New English name of the `Hotel`, `null` removes it.
    pub english_name: Nullable<Name>,

    /// New city of the `Hotel`.
    pub city: Option<City>,

    /// New address of the `Hotel`.
    pub address: Option<Address>,

    /// New star rating from 1 to 5.
    pub star: Option<i32>,

    /// New opening date of the `Hotel`, `null` removes it.
    pub opening_date: Nullable<OpeningDate>,

    /// New description of the `Hotel`.
    pub description: Option<Description>,

    /// New tags of the `Hotel`.
    pub tags: Option<Vec<Label>>,

    /// New facilities of the `Hotel`.
    pub facilities: Option<Vec<Label>>,

    /// New photos of the `Hotel`.
    pub images: Option<Vec<ImageUrl>>,
}

impl TryFrom<Patch> for command::update_hotel::Changes {
    type Error = InputError;

    fn try_from(patch: Patch) -> Result<Self, Self::Error> {
        let Patch {
            name,
            english_name,
            city,
            address,
            star,
            opening_date,
            description,
            tags,
            facilities,
            images,
        } = patch;
        Ok(Self {
            name: name.map(Into::into),
            english_name: english_name.explicit().map(|n| n.map(Into::into)),
            city: city.map(Into::into),
            address: address.map(Into::into),
            star: star.map(star_of).transpose()?,
            opening_date: opening_date
                .explicit()
                .map(|d| d.map(Into::into)),
            description: description.map(Into::into),
            tags: tags.map(labels),
            facilities: facilities.map(labels),
            images: images.map(images_of),
        })
    }
}

/// Parses a [`domain::hotel::Star`] rating.
fn star_of(star: i32) -> Result<domain::hotel::Star, InputError> {
    domain::hotel::Star::new(star).ok_or(InputError::Star)
}

/// Converts `HotelLabel`s into [`domain::hotel::Label`]s.
fn labels(labels: Vec<Label>) -> Vec<domain::hotel::Label> {
    labels.into_iter().map(Into::into).collect()
}

/// Converts `ImageUrl`s into [`domain::hotel::ImageUrl`]s.
fn images_of(images: Vec<ImageUrl>) -> Vec<domain::hotel::ImageUrl> {
    images.into_iter().map(Into::into).collect()
}

define_error! {
    enum InputError {
        #[code = "INVALID_STAR"]
        #[status = BAD_REQUEST]
        #[message = "`star` must be within 1..=5"]
        Star,

        #[code = "INVALID_CAPACITY"]
        #[status = BAD_REQUEST]
        #[message = "`capacity` must be within 1..=20"]
        Capacity,

        #[code = "NEGATIVE_PRICE"]
        #[status = BAD_REQUEST]
        #[message = "Price must not be negative"]
        Price,

        #[code = "INVALID_REJECT_REASON"]
        #[status = BAD_REQUEST]
        #[message = "Reject reason must be at most 1024 characters"]
        RejectReason,
    }
}

define_error! {
    enum HotelError {
        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "`Hotel` with the specified ID does not exist"]
        NotExists,

        #[code = "FORBIDDEN"]
        #[status = FORBIDDEN]
        #[message = "`Hotel` is not owned by the authenticated `User`"]
        NotOwner,

        #[code = "FORBIDDEN"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` may not perform this transition"]
        TransitionForbidden,
    }
}

impl From<&domain::hotel::lifecycle::TransitionError> for Error {
    fn from(e: &domain::hotel::lifecycle::TransitionError) -> Self {
        use domain::hotel::lifecycle::TransitionError as E;

        match e {
            E::Forbidden(_) => HotelError::TransitionForbidden.into(),
            E::InvalidState { .. } => Self::new(
                "INVALID_HOTEL_STATUS",
                http::StatusCode::CONFLICT,
                e.to_string(),
            ),
        }
    }
}

pub mod room {
    //! [`RoomType`]-related definitions.

    use common::Money;
    use derive_more::{AsRef, Display, From, Into};
    use juniper::{
        graphql_object, GraphQLInputObject, GraphQLScalar, Nullable,
    };
    use service::{command, domain};
    use uuid::Uuid;

    use crate::{api::scalar, define_error, Context};

    use super::{images_of, ImageUrl, InputError};

    /// A room type of a `Hotel`.
    #[derive(Clone, Debug, From)]
    pub struct RoomType(domain::hotel::RoomType);

    /// A room type of a `Hotel`.
    #[graphql_object(context = Context)]
    impl RoomType {
        /// Unique identifier of this `RoomType`.
        pub fn id(&self) -> Id {
            self.0.id.into()
        }

        /// ID of the `Hotel` this `RoomType` belongs to.
        pub fn hotel_id(&self) -> super::Id {
            self.0.hotel_id.into()
        }

        /// Name of this `RoomType`.
        pub fn name(&self) -> Name {
            self.0.details.name.clone().into()
        }

        /// Price of this `RoomType` per night.
        pub fn price(&self) -> Money {
            self.0.details.price.money()
        }

        /// Price before a discount, if any.
        pub fn original_price(&self) -> Option<Money> {
            self.0.details.original_price.map(domain::hotel::room::Price::money)
        }

        /// Maximum number of guests.
        pub fn capacity(&self) -> i32 {
            u8::from(self.0.details.capacity).into()
        }

        /// Indicator whether a breakfast is included.
        pub fn breakfast(&self) -> bool {
            self.0.details.breakfast
        }

        /// Photos of this `RoomType`.
        pub fn images(&self) -> Vec<ImageUrl> {
            self.0.details.images.iter().cloned().map(Into::into).collect()
        }
    }

    /// Unique identifier of a `RoomType`.
    #[derive(
        Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
    )]
    #[from(domain::hotel::room::Id)]
    #[into(domain::hotel::room::Id)]
    #[graphql(name = "RoomTypeId", transparent)]
    pub struct Id(Uuid);

    /// Name of a `RoomType`.
    #[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
    #[graphql(
        name = "RoomTypeName",
        with = scalar::Via::<domain::hotel::room::Name>,
    )]
    pub struct Name(domain::hotel::room::Name);

    /// Details of a new `RoomType`.
    #[derive(Clone, Debug, GraphQLInputObject)]
    #[graphql(name = "RoomTypeInput")]
    pub struct Input {
        /// Name of the `RoomType`.
        pub name: Name,

        /// Price per night.
        pub price: Money,

        /// Price before a discount.
        pub original_price: Option<Money>,

        /// Maximum number of guests from 1 to 20, 2 by default.
        pub capacity: Option<i32>,

        /// Indicator whether a breakfast is included.
        pub breakfast: Option<bool>,

        /// Photos of the `RoomType`.
        pub images: Option<Vec<ImageUrl>>,
    }

    impl TryFrom<Input> for domain::hotel::room::Details {
        type Error = InputError;

        fn try_from(input: Input) -> Result<Self, Self::Error> {
            let Input {
                name,
                price,
                original_price,
                capacity,
                breakfast,
                images,
            } = input;
            Ok(Self {
                name: name.into(),
                price: price_of(price)?,
                original_price: original_price.map(price_of).transpose()?,
                capacity: capacity
                    .map(capacity_of)
                    .transpose()?
                    .unwrap_or_default(),
                breakfast: breakfast.unwrap_or_default(),
                images: images_of(images.unwrap_or_default()),
            })
        }
    }

    /// Changes of a `RoomType`.
    ///
    /// Omitted fields are left intact.
    #[derive(Clone, Debug, GraphQLInputObject)]
    #[graphql(name = "RoomTypePatch")]
    pub struct Patch {
        /// New name of the `RoomType`.
        pub name: Option<Name>,

        /// New price per night.
        pub price: Option<Money>,

        /// New price before a discount, `null` removes it.
        pub original_price: Nullable<Money>,

        /// New maximum number of guests from 1 to 20.
        pub capacity: Option<i32>,

        /// Indicator whether a breakfast is included now.
        pub breakfast: Option<bool>,

        /// New photos of the `RoomType`.
        pub images: Option<Vec<ImageUrl>>,
    }

    impl TryFrom<Patch> for command::update_room_type::Changes {
        type Error = InputError;

        fn try_from(patch: Patch) -> Result<Self, Self::Error> {
            let Patch {
                name,
                price,
                original_price,
                capacity,
                breakfast,
                images,
            } = patch;
            Ok(Self {
                name: name.map(Into::into),
                price: price.map(price_of).transpose()?,
                original_price: original_price
                    .explicit()
                    .map(|p| p.map(price_of).transpose())
                    .transpose()?,
                capacity: capacity.map(capacity_of).transpose()?,
                breakfast,
                images: images.map(images_of),
            })
        }
    }

    /// Parses a [`domain::hotel::room::Price`].
    fn price_of(
        amount: Money,
    ) -> Result<domain::hotel::room::Price, InputError> {
        domain::hotel::room::Price::new(amount).ok_or(InputError::Price)
    }

    /// Parses a [`domain::hotel::room::Capacity`].
    fn capacity_of(
        guests: i32,
    ) -> Result<domain::hotel::room::Capacity, InputError> {
        domain::hotel::room::Capacity::new(guests).ok_or(InputError::Capacity)
    }

    define_error! {
        enum RoomTypeError {
            #[code = "NOT_FOUND"]
            #[status = NOT_FOUND]
            #[message = "`RoomType` with the specified ID does not exist"]
            NotExists,
        }
    }
}

pub mod place {
    //! [`NearbyPlace`]-related definitions.

    use derive_more::{AsRef, Display, From, Into};
    use juniper::{
        graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLScalar,
    };
    use service::domain;
    use uuid::Uuid;

    use crate::{api::scalar, Context};

    /// A place near a `Hotel`.
    #[derive(Clone, Debug, From)]
    pub struct NearbyPlace(domain::hotel::NearbyPlace);

    /// A place near a `Hotel`.
    #[graphql_object(context = Context)]
    impl NearbyPlace {
        /// Unique identifier of this `NearbyPlace`.
        pub fn id(&self) -> Id {
            self.0.id.into()
        }

        /// Kind of this `NearbyPlace`.
        pub fn kind(&self) -> Kind {
            self.0.details.kind.into()
        }

        /// Name of this `NearbyPlace`.
        pub fn name(&self) -> Name {
            self.0.details.name.clone().into()
        }

        /// Distance from the `Hotel` to this `NearbyPlace`.
        pub fn distance(&self) -> Distance {
            self.0.details.distance.clone().into()
        }
    }

    /// Unique identifier of a `NearbyPlace`.
    #[derive(
        Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
    )]
    #[from(domain::hotel::place::Id)]
    #[into(domain::hotel::place::Id)]
    #[graphql(name = "NearbyPlaceId", transparent)]
    pub struct Id(Uuid);

    /// Name of a `NearbyPlace`.
    #[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
    #[graphql(
        name = "NearbyPlaceName",
        with = scalar::Via::<domain::hotel::place::Name>,
    )]
    pub struct Name(domain::hotel::place::Name);

    /// Human-readable distance to a `NearbyPlace`, e.g. `500m`.
    #[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
    #[graphql(
        name = "NearbyPlaceDistance",
        with = scalar::Via::<domain::hotel::place::Distance>,
    )]
    pub struct Distance(domain::hotel::place::Distance);

    /// Kind of a `NearbyPlace`.
    #[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
    #[graphql(name = "NearbyPlaceKind")]
    pub enum Kind {
        /// Tourist attraction.
        Attraction,

        /// Public transport stop or station.
        Transport,

        /// Shopping mall.
        Mall,
    }

    impl From<domain::hotel::place::Kind> for Kind {
        fn from(kind: domain::hotel::place::Kind) -> Self {
            use domain::hotel::place::Kind as K;

            match kind {
                K::Attraction => Self::Attraction,
                K::Transport => Self::Transport,
                K::Mall => Self::Mall,
            }
        }
    }

    impl From<Kind> for domain::hotel::place::Kind {
        fn from(kind: Kind) -> Self {
            match kind {
                Kind::Attraction => Self::Attraction,
                Kind::Transport => Self::Transport,
                Kind::Mall => Self::Mall,
            }
        }
    }

    /// Details of a new `NearbyPlace`.
    #[derive(Clone, Debug, GraphQLInputObject)]
    #[graphql(name = "NearbyPlaceInput")]
    pub struct Input {
        /// Kind of the `NearbyPlace`.
        pub kind: Kind,

        /// Name of the `NearbyPlace`.
        pub name: Name,

        /// Distance from the `Hotel`.
        pub distance: Distance,
    }

    impl From<Input> for domain::hotel::place::Details {
        fn from(input: Input) -> Self {
            Self {
                kind: input.kind.into(),
                name: input.name.into(),
                distance: input.distance.into(),
            }
        }
    }
}

pub mod search {
    //! Definitions related to the public `Hotel` search.

    use derive_more::{AsRef, Display, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::read;

    use crate::{api::scalar, Context};

    use super::Hotel;

    /// Text searched for in names and addresses of `Hotel`s.
    #[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
    #[graphql(
        name = "HotelSearchKeyword",
        with = scalar::Via::<read::hotel::search::Keyword>,
    )]
    pub struct Keyword(read::hotel::search::Keyword);

    /// Page of the `Hotel` search results.
    #[derive(Debug, From)]
    pub struct Page(read::hotel::search::Page);

    /// Converts a count into a GraphQL `Int`.
    fn int(n: usize) -> i32 {
        i32::try_from(n).unwrap_or(i32::MAX)
    }

    /// Page of the `Hotel` search results.
    #[graphql_object(name = "HotelSearchPage", context = Context)]
    impl Page {
        /// `Hotel`s on this page, most recently updated first.
        pub fn items(&self) -> Vec<Hotel> {
            self.0.items.iter().cloned().map(Into::into).collect()
        }

        /// Total number of the found `Hotel`s.
        pub fn total(&self) -> i32 {
            int(self.0.total)
        }

        /// Number of this page, starting from 1.
        pub fn page(&self) -> i32 {
            int(self.0.arguments.page())
        }

        /// Maximum number of `Hotel`s on a page.
        pub fn per_page(&self) -> i32 {
            int(self.0.arguments.limit())
        }

        /// Total number of pages.
        pub fn pages(&self) -> i32 {
            int(self.0.pages())
        }

        /// Indicator whether there is a next page.
        pub fn has_next_page(&self) -> bool {
            self.0.has_next_page()
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::Money;
    use juniper::Nullable;
    use service::{command, domain};

    use crate::Error;

    use super::{
        room, Address, City, Input, InputError, Name, Patch, Status,
    };

    fn input(star: Option<i32>) -> Input {
        Input {
            name: Name(domain::hotel::Name::new("Bund View").unwrap()),
            english_name: None,
            city: City(domain::hotel::City::new("上海").unwrap()),
            address: Address(
                domain::hotel::Address::new("No. 1 Zhongshan Road").unwrap(),
            ),
            star,
            opening_date: None,
            description: None,
            tags: None,
            facilities: None,
            images: None,
        }
    }

    fn empty_patch() -> Patch {
        Patch {
            name: None,
            english_name: Nullable::ImplicitNull,
            city: None,
            address: None,
            star: None,
            opening_date: Nullable::ImplicitNull,
            description: None,
            tags: None,
            facilities: None,
            images: None,
        }
    }

    #[test]
    fn input_defaults_and_validates_star() {
        let content = domain::hotel::Content::try_from(input(None)).unwrap();
        assert_eq!(content.star, domain::hotel::Star::default());
        assert!(content.tags.is_empty());

        let content = domain::hotel::Content::try_from(input(Some(5))).unwrap();
        assert_eq!(content.star, domain::hotel::Star::new(5).unwrap());

        let err = domain::hotel::Content::try_from(input(Some(6))).unwrap_err();
        assert_eq!(Error::from(err).code, "INVALID_STAR");
    }

    #[test]
    fn patch_distinguishes_null_from_omitted() {
        let changes =
            command::update_hotel::Changes::try_from(empty_patch()).unwrap();
        assert!(changes.english_name.is_none());

        let changes = command::update_hotel::Changes::try_from(Patch {
            english_name: Nullable::ExplicitNull,
            ..empty_patch()
        })
        .unwrap();
        assert_eq!(changes.english_name, Some(None));
    }

    #[test]
    fn room_input_rejects_negative_price() {
        let room = |price: &str, capacity| room::Input {
            name: room::Name::from(
                domain::hotel::room::Name::new("King").unwrap(),
            ),
            price: Money::from_str(price).unwrap(),
            original_price: None,
            capacity,
            breakfast: None,
            images: None,
        };

        let details =
            domain::hotel::room::Details::try_from(room("399CNY", None))
                .unwrap();
        assert_eq!(details.capacity, domain::hotel::room::Capacity::default());
        assert!(!details.breakfast);

        assert!(matches!(
            domain::hotel::room::Details::try_from(room("-1CNY", None)),
            Err(InputError::Price),
        ));
        assert!(matches!(
            domain::hotel::room::Details::try_from(room("399CNY", Some(0))),
            Err(InputError::Capacity),
        ));
    }

    #[test]
    fn status_conversion() {
        for &status in domain::hotel::Status::ALL {
            assert_eq!(
                domain::hotel::Status::from(Status::from(status)),
                status,
            );
        }
    }
}
