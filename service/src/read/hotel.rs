//! [`Hotel`]-related read definitions.

use crate::domain::{
    hotel::{room, NearbyPlace, RoomType, Status},
    Hotel,
};

/// [`Hotel`] along with its [`RoomType`]s and [`NearbyPlace`]s, as shown on
/// its page.
#[derive(Clone, Debug)]
pub struct Listing {
    /// The [`Hotel`] itself.
    pub hotel: Hotel,

    /// [`RoomType`]s offered by the [`Hotel`].
    pub room_types: Vec<RoomType>,

    /// [`NearbyPlace`]s of the [`Hotel`].
    pub nearby_places: Vec<NearbyPlace>,
}

impl Listing {
    /// Returns the lowest [`room::Price`] among the [`RoomType`]s of this
    /// [`Listing`], if any.
    #[must_use]
    pub fn lowest_price(&self) -> Option<room::Price> {
        room::lowest_price(&self.room_types)
    }
}

/// Selects the [`Status::Approved`] [`Hotel`]s to be featured on the main
/// page: the ones with the most stars, most recently modified first.
#[derive(Clone, Copy, Debug, Default)]
pub struct Featured;

impl Featured {
    /// Maximum number of featured [`Hotel`]s.
    pub const LIMIT: usize = 5;
}

/// Selects all the [`Hotel`]s for moderation, most recently modified first.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForReview {
    /// [`Status`] to narrow the [`Hotel`]s to, if any.
    pub status: Option<Status>,
}

impl ForReview {
    /// Indicates whether the provided [`Hotel`] is selected.
    #[must_use]
    pub fn matches(&self, hotel: &Hotel) -> bool {
        self.status.map_or(true, |s| hotel.status == s)
    }
}

pub mod search {
    //! Public [`Hotel`] search definitions.

    use common::{pagination, Money};

    use crate::domain::{
        hotel::{self, room, Status},
        text::define_text,
        Hotel,
    };

    /// Page of found [`Hotel`]s.
    pub type Page = pagination::Page<Hotel>;

    /// Search request: a [`Filter`] and a page to return.
    pub type Selector = pagination::Selector<Filter>;

    /// Filter of the public [`Hotel`] search.
    ///
    /// Only [`Status::Approved`] [`Hotel`]s are ever found. Found [`Hotel`]s
    /// are ordered by their modification time, most recent first.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`hotel::City`] the [`Hotel`] is located in.
        pub city: Option<hotel::City>,

        /// [`Keyword`] to look for in the [`Hotel`] names and address.
        pub keyword: Option<Keyword>,

        /// Exact [`hotel::Star`] rating of the [`Hotel`].
        pub star: Option<hotel::Star>,

        /// [`hotel::Label`] the [`Hotel`] is tagged with.
        pub tag: Option<hotel::Label>,

        /// Lower bound of the [`Hotel`] lowest room price, inclusive.
        pub min_price: Option<Money>,

        /// Upper bound of the [`Hotel`] lowest room price, inclusive.
        pub max_price: Option<Money>,
    }

    impl Filter {
        /// Indicates whether the provided [`Hotel`] with the provided lowest
        /// [`room::Price`] passes this [`Filter`].
        ///
        /// [`Hotel`]s without any room pass the price bounds.
        #[must_use]
        pub fn matches(
            &self,
            hotel: &Hotel,
            lowest_price: Option<room::Price>,
        ) -> bool {
            let Self {
                city,
                keyword,
                star,
                tag,
                min_price,
                max_price,
            } = self;
            let c = &hotel.content;

            hotel.status == Status::Approved
                && city.as_ref().map_or(true, |city| c.city == *city)
                && keyword.as_ref().map_or(true, |k| {
                    k.is_found_in(c.name.as_ref())
                        || c.english_name
                            .as_ref()
                            .is_some_and(|n| k.is_found_in(n.as_ref()))
                        || k.is_found_in(c.address.as_ref())
                })
                && star.map_or(true, |s| c.star == s)
                && tag.as_ref().map_or(true, |t| c.tags.contains(t))
                && lowest_price.map(room::Price::money).map_or(true, |p| {
                    min_price.map_or(true, |min| p.amount >= min.amount)
                        && max_price.map_or(true, |max| p.amount <= max.amount)
                })
        }
    }

    define_text! {
        #[doc = "Text searched for case-insensitively."]
        Keyword, max = 64
    }

    impl Keyword {
        /// Indicates whether this [`Keyword`] is a case-insensitive substring
        /// of the provided `text`.
        #[must_use]
        pub fn is_found_in(&self, text: &str) -> bool {
            text.to_lowercase().contains(&self.0.to_lowercase())
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::Money;

    use crate::domain::{
        hotel::{self, room, spec::content, Status},
        user, Hotel,
    };

    use super::{
        search::{Filter, Keyword},
        ForReview,
    };

    fn approved(name: &str) -> Hotel {
        let mut hotel = Hotel::new(user::Id::new(), content(name));
        hotel.status = Status::Approved;
        hotel
    }

    fn price(s: &str) -> Option<room::Price> {
        room::Price::new(Money::from_str(s).unwrap())
    }

    #[test]
    fn finds_only_approved() {
        let mut hotel = approved("Lakeside");
        assert!(Filter::default().matches(&hotel, None));

        for &status in Status::ALL {
            hotel.status = status;
            assert_eq!(
                Filter::default().matches(&hotel, None),
                status == Status::Approved,
            );
        }
    }

    #[test]
    fn keyword_is_case_insensitive_over_names_and_address() {
        let mut hotel = approved("Lakeside Resort");
        hotel.content.english_name = hotel::Name::new("Hupan Jiudian");
        let by = |k: &str| Filter {
            keyword: Keyword::new(k),
            ..Filter::default()
        };

        assert!(by("lakeSIDE").matches(&hotel, None));
        assert!(by("jiudian").matches(&hotel, None));
        assert!(by("century avenue").matches(&hotel, None));
        assert!(!by("mountain").matches(&hotel, None));
    }

    #[test]
    fn exact_filters() {
        let mut hotel = approved("Lakeside");
        hotel.content.star = hotel::Star::new(5).unwrap();
        hotel.content.tags = vec![hotel::Label::new("亲子").unwrap()];

        let five = Filter {
            star: hotel::Star::new(5),
            ..Filter::default()
        };
        let four = Filter {
            star: hotel::Star::new(4),
            ..Filter::default()
        };
        assert!(five.matches(&hotel, None));
        assert!(!four.matches(&hotel, None));

        let tagged = Filter {
            tag: hotel::Label::new("亲子"),
            city: hotel::City::new("上海"),
            ..Filter::default()
        };
        let elsewhere = Filter {
            city: hotel::City::new("北京"),
            ..Filter::default()
        };
        assert!(tagged.matches(&hotel, None));
        assert!(!elsewhere.matches(&hotel, None));
    }

    #[test]
    fn price_bounds_apply_to_lowest_price() {
        let hotel = approved("Lakeside");
        let filter = Filter {
            min_price: Money::from_str("200CNY").ok(),
            max_price: Money::from_str("400CNY").ok(),
            ..Filter::default()
        };

        assert!(filter.matches(&hotel, price("200CNY")));
        assert!(filter.matches(&hotel, price("400CNY")));
        assert!(!filter.matches(&hotel, price("199.99CNY")));
        assert!(!filter.matches(&hotel, price("400.5CNY")));
        assert!(filter.matches(&hotel, None));
    }

    #[test]
    fn review_filter() {
        let hotel = approved("Lakeside");

        assert!(ForReview::default().matches(&hotel));
        assert!(ForReview {
            status: Some(Status::Approved)
        }
        .matches(&hotel));
        assert!(!ForReview {
            status: Some(Status::Pending)
        }
        .matches(&hotel));
    }
}
