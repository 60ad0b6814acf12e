//! GraphQL [`Query`]s definitions.

use common::{pagination, Money};
use juniper::graphql_object;
use service::{domain, query, read, Query as _};

use crate::{
    api::{self, hotel::HotelError},
    define_error, AsError, Context, Error,
};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::user::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Hotel` with the specified ID, along with its room types
    /// and nearby places.
    ///
    /// A `Hotel` which is not `APPROVED` is visible to its merchant and
    /// admins only.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FOUND` - the `Hotel` does not exist or is not visible to the
    ///                 current `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "hotel",
            hotel.id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn hotel(
        id: api::hotel::Id,
        ctx: &Context,
    ) -> Result<api::Hotel, Error> {
        let viewer = ctx.try_current_session().await?.map(|s| s.initiator());

        ctx.service()
            .execute(query::hotel::ListingById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .filter(|l| l.hotel.is_visible_to(viewer.as_ref()))
            .ok_or_else(|| HotelError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Searches the publicly listed `Hotel`s, most recently updated first.
    ///
    /// Price bounds apply to the lowest price of a `Hotel`, and a `Hotel`
    /// without room types satisfies any bounds.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PAGINATION_ARGUMENTS` - `page` is not positive or `perPage`
    ///                                    is out of 1..=100.
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    #[tracing::instrument(
        skip_all,
        fields(
            city = ?city,
            gql.name = "searchHotels",
            keyword = ?keyword,
            otel.name = Self::SPAN_NAME,
            page = ?page,
            per_page = ?per_page,
        ),
    )]
    pub async fn search_hotels(
        city: Option<api::hotel::City>,
        keyword: Option<api::hotel::search::Keyword>,
        star: Option<i32>,
        tag: Option<api::hotel::Label>,
        min_price: Option<Money>,
        max_price: Option<Money>,
        page: Option<i32>,
        per_page: Option<i32>,
        ctx: &Context,
    ) -> Result<api::hotel::search::Page, Error> {
        let arguments = pagination::Arguments::new(page, per_page)
            .ok_or_else(|| api::PaginationError::Invalid.into())
            .map_err(ctx.error())?;
        let star = star
            .map(|s| {
                domain::hotel::Star::new(s)
                    .ok_or(api::hotel::InputError::Star)
            })
            .transpose()
            .map_err(Error::from)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::hotels::Search::by(read::hotel::search::Selector {
                arguments,
                filter: read::hotel::search::Filter {
                    city: city.map(Into::into),
                    keyword: keyword.map(Into::into),
                    star,
                    tag: tag.map(Into::into),
                    min_price,
                    max_price,
                },
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns up to 5 top-rated publicly listed `Hotel`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "featuredHotels",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn featured_hotels(
        ctx: &Context,
    ) -> Result<Vec<api::Hotel>, Error> {
        ctx.service()
            .execute(query::hotels::Featured::by(read::hotel::Featured))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|hotels| hotels.into_iter().map(Into::into).collect())
    }

    /// Returns all the `Hotel`s of the authenticated merchant in any status,
    /// most recently updated first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_MERCHANT` - the authenticated `User` is not a merchant.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myHotels",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_hotels(ctx: &Context) -> Result<Vec<api::Hotel>, Error> {
        let me = ctx
            .current_session()
            .await?
            .initiator_of(domain::user::Role::Merchant)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::hotels::ByMerchant::by(me.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|hotels| hotels.into_iter().map(Into::into).collect())
    }

    /// Returns all the `Hotel`s for a moderation, optionally of the
    /// specified `status` only, most recently updated first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_ADMIN` - the authenticated `User` is not an admin.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "hotelsForReview",
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn hotels_for_review(
        status: Option<api::hotel::Status>,
        ctx: &Context,
    ) -> Result<Vec<api::Hotel>, Error> {
        _ = ctx
            .current_session()
            .await?
            .initiator_of(domain::user::Role::Admin)
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::hotels::ForReview::by(read::hotel::ForReview {
                status: status.map(Into::into),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|hotels| hotels.into_iter().map(Into::into).collect())
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}
