//! [`Query`] collection related to multiple [`Hotel`]s.

use common::operations::By;

use crate::{
    domain::{user, Hotel},
    read::hotel::{self as read, search},
};
#[cfg(doc)]
use crate::Query;

use super::Fetch;

/// Searches [`Hotel`]s publicly listed on the marketplace.
pub type Search = Fetch<By<search::Page, search::Selector>>;

/// Queries [`read::Featured`] [`Hotel`]s.
pub type Featured = Fetch<By<Vec<Hotel>, read::Featured>>;

/// Queries all [`Hotel`]s of a merchant by its [`user::Id`].
pub type ByMerchant = Fetch<By<Vec<Hotel>, user::Id>>;

/// Queries [`Hotel`]s [`read::ForReview`] by admins.
pub type ForReview = Fetch<By<Vec<Hotel>, read::ForReview>>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{pagination, Money};

    use crate::{
        command::{CreateHotel, TransitHotel},
        domain::{
            hotel::{self, room, spec::content, Status, Transition},
            user::{self, Initiator, Role},
        },
        infra::database::Memory,
        read::hotel::{search, ForReview as Review},
        spec::service,
        Command as _, Service,
    };

    use super::{ByMerchant, Featured, ForReview, Search};

    fn initiator(role: Role) -> Initiator {
        Initiator {
            id: user::Id::new(),
            role,
        }
    }

    async fn seed(
        svc: &Service<Memory>,
        owner: Initiator,
        name: &str,
        star: u8,
        price: Option<&str>,
        transitions: &[Transition],
    ) -> hotel::Id {
        let mut c = content(name);
        c.star = hotel::Star::new(star).unwrap();
        let id = svc
            .execute(CreateHotel {
                initiator: owner,
                content: c,
                room_types: price
                    .map(|p| room::spec::details("King", p))
                    .into_iter()
                    .collect(),
                nearby_places: vec![],
            })
            .await
            .unwrap()
            .hotel
            .id;
        let admin = initiator(Role::Admin);
        for t in transitions {
            let by = if *t == Transition::Submit { owner } else { admin };
            _ = svc
                .execute(TransitHotel {
                    hotel_id: id,
                    initiator: by,
                    transition: t.clone(),
                })
                .await
                .unwrap();
        }
        id
    }

    async fn approved(
        svc: &Service<Memory>,
        owner: Initiator,
        name: &str,
        star: u8,
        price: Option<&str>,
    ) -> hotel::Id {
        seed(
            svc,
            owner,
            name,
            star,
            price,
            &[Transition::Submit, Transition::Approve],
        )
        .await
    }

    #[tokio::test]
    async fn search_finds_approved_within_price() {
        let svc = service();
        let owner = initiator(Role::Merchant);
        let cheap = approved(&svc, owner, "Cheap Inn", 2, Some("150CNY")).await;
        let mid = approved(&svc, owner, "Mid Hotel", 3, Some("300CNY")).await;
        let roomless = approved(&svc, owner, "Empty Hotel", 3, None).await;
        _ = seed(&svc, owner, "Draft Hotel", 3, Some("300CNY"), &[]).await;
        _ = seed(
            &svc,
            owner,
            "Offline Hotel",
            3,
            Some("300CNY"),
            &[Transition::Submit, Transition::Approve, Transition::TakeOffline],
        )
        .await;

        let page = svc
            .execute(Search::by(search::Selector {
                arguments: pagination::Arguments::default(),
                filter: search::Filter {
                    min_price: Money::from_str("200CNY").ok(),
                    ..search::Filter::default()
                },
            }))
            .await
            .unwrap();

        let ids = page.items.iter().map(|h| h.id).collect::<Vec<_>>();
        assert_eq!(page.total, 2);
        assert_eq!(ids, [roomless, mid]);
        assert!(!ids.contains(&cheap));
    }

    #[tokio::test]
    async fn search_paginates_most_recent_first() {
        let svc = service();
        let owner = initiator(Role::Merchant);
        let mut ids = vec![];
        for i in 0..5 {
            ids.push(approved(&svc, owner, &format!("Hotel {i}"), 3, None).await);
        }
        ids.reverse();

        let page = svc
            .execute(Search::by(search::Selector {
                arguments: pagination::Arguments::new(Some(2), Some(2))
                    .unwrap(),
                filter: search::Filter::default(),
            }))
            .await
            .unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.pages(), 3);
        assert!(page.has_next_page());
        assert_eq!(
            page.items.iter().map(|h| h.id).collect::<Vec<_>>(),
            ids[2..4],
        );
    }

    #[tokio::test]
    async fn featured_are_top_rated_approved() {
        let svc = service();
        let owner = initiator(Role::Merchant);
        let mut expected = vec![];
        for star in 1..=5 {
            let id = approved(&svc, owner, "Hotel", star, None).await;
            if star > 1 {
                expected.push(id);
            }
        }
        expected.push(approved(&svc, owner, "Another", 5, None).await);
        _ = seed(&svc, owner, "Pending", 5, None, &[Transition::Submit]).await;

        let featured = svc.execute(Featured::by(Default::default())).await.unwrap();

        assert_eq!(featured.len(), 5);
        assert!(featured.iter().all(|h| h.status == Status::Approved));
        assert_eq!(featured[0].id, expected[4]);
        assert_eq!(featured[1].id, expected[3]);
        assert_eq!(featured[4].id, expected[0]);
    }

    #[tokio::test]
    async fn merchant_and_review_lists() {
        let svc = service();
        let (alice, bob) =
            (initiator(Role::Merchant), initiator(Role::Merchant));
        let draft = seed(&svc, alice, "Draft", 3, None, &[]).await;
        let pending =
            seed(&svc, alice, "Pending", 3, None, &[Transition::Submit]).await;
        let other = approved(&svc, bob, "Other", 3, None).await;

        let mine = svc.execute(ByMerchant::by(alice.id)).await.unwrap();
        assert_eq!(
            mine.iter().map(|h| h.id).collect::<Vec<_>>(),
            [pending, draft],
        );

        let all = svc
            .execute(ForReview::by(Review::default()))
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, other);

        let queue = svc
            .execute(ForReview::by(Review {
                status: Some(Status::Pending),
            }))
            .await
            .unwrap();
        assert_eq!(queue.iter().map(|h| h.id).collect::<Vec<_>>(), [pending]);
    }
}
