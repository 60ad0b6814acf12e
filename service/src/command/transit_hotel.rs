//! [`Command`] for moving a [`Hotel`] through its moderation lifecycle.

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::hotel::Status;
use crate::{
    domain::{
        hotel::{self, Transition},
        user, Hotel,
    },
    infra::{database, Database},
    read::hotel::Listing,
    Service,
};

use super::Command;

/// [`Command`] for applying a [`Transition`] to a [`Hotel`].
///
/// The [`Transition`] is validated and applied against the [`Hotel`] state
/// read under an exclusive lock, so concurrent [`Transition`]s upon the same
/// [`Hotel`] are serialized and the later one observes the [`Status`] set by
/// the earlier one.
#[derive(Clone, Debug)]
pub struct TransitHotel {
    /// ID of the [`Hotel`] to apply the [`Transition`] to.
    pub hotel_id: hotel::Id,

    /// [`user::Initiator`] applying the [`Transition`].
    pub initiator: user::Initiator,

    /// [`Transition`] to apply.
    pub transition: Transition,
}

impl<Db> Command<TransitHotel> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Hotel, hotel::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Hotel>, hotel::Id>>,
            Ok = Option<Hotel>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Listing>, hotel::Id>>,
            Ok = Option<Listing>,
            Err = Traced<database::Error>,
        > + Database<Update<Hotel>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: TransitHotel) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let TransitHotel {
            hotel_id,
            initiator,
            transition,
        } = cmd;
        let kind = transition.kind();

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent transitions of the same `Hotel`.
        tx.execute(Lock(By::new(hotel_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut hotel = tx
            .execute(Select(By::<Option<Hotel>, _>::new(hotel_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::HotelNotExists(hotel_id))
            .map_err(tracerr::wrap!())?;
        let from = hotel.status;

        hotel
            .transit(transition, &initiator)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(hotel.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let listing = tx
            .execute(Select(By::<Option<Listing>, _>::new(hotel_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::HotelNotExists(hotel_id))
            .map_err(tracerr::wrap!())?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            hotel.id = %hotel.id,
            initiator.id = %initiator.id,
            "`Hotel` transition `{kind}`: `{from}` -> `{}`",
            hotel.status,
        );

        Ok(listing)
    }
}

/// Error of [`TransitHotel`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Hotel`] with the provided ID does not exist.
    #[display("`Hotel(id: {_0})` does not exist")]
    #[from(ignore)]
    HotelNotExists(#[error(not(source))] hotel::Id),

    /// [`Transition`] is not allowed.
    #[display("`Hotel` transition failed: {_0}")]
    Transition(hotel::lifecycle::TransitionError),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::CreateHotel,
        domain::{
            hotel::{
                self, lifecycle::TransitionError, room, spec::content,
                RejectReason, Status, Transition,
            },
            user::{self, Initiator, Role},
        },
        infra::database::Memory,
        query,
        spec::service,
        Command as _, Service,
    };

    use super::{ExecutionError, TransitHotel};

    fn initiator(role: Role) -> Initiator {
        Initiator {
            id: user::Id::new(),
            role,
        }
    }

    async fn draft(svc: &Service<Memory>, owner: Initiator) -> hotel::Id {
        svc.execute(CreateHotel {
            initiator: owner,
            content: content("Riverside Inn"),
            room_types: vec![room::spec::details("King", "420CNY")],
            nearby_places: vec![],
        })
        .await
        .unwrap()
        .hotel
        .id
    }

    async fn transit(
        svc: &Service<Memory>,
        hotel_id: hotel::Id,
        initiator: Initiator,
        transition: Transition,
    ) -> Result<Status, ExecutionError> {
        svc.execute(TransitHotel {
            hotel_id,
            initiator,
            transition,
        })
        .await
        .map(|l| l.hotel.status)
        .map_err(tracerr::Traced::into_inner)
    }

    async fn stored(svc: &Service<Memory>, id: hotel::Id) -> hotel::Hotel {
        svc.execute(query::hotel::ById::by(id))
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn review_round_trip() {
        let svc = service();
        let (owner, admin) = (initiator(Role::Merchant), initiator(Role::Admin));
        let id = draft(&svc, owner).await;

        // Draft -> Pending.
        let status = transit(&svc, id, owner, Transition::Submit).await;
        assert_eq!(status.unwrap(), Status::Pending);
        assert!(stored(&svc, id).await.reject_reason.is_none());

        // Pending -> Rejected.
        let reason = RejectReason::new("photos too small").unwrap();
        let status =
            transit(&svc, id, admin, Transition::Reject(reason.clone())).await;
        assert_eq!(status.unwrap(), Status::Rejected);
        assert_eq!(stored(&svc, id).await.reject_reason, Some(reason));

        // Rejected -> Pending.
        let status = transit(&svc, id, owner, Transition::Submit).await;
        assert_eq!(status.unwrap(), Status::Pending);
        assert!(stored(&svc, id).await.reject_reason.is_none());

        // Pending -> Approved -> Offline -> Approved.
        for (transition, expected) in [
            (Transition::Approve, Status::Approved),
            (Transition::TakeOffline, Status::Offline),
            (Transition::BringOnline, Status::Approved),
        ] {
            let status = transit(&svc, id, admin, transition).await;
            assert_eq!(status.unwrap(), expected);
        }
        let hotel = stored(&svc, id).await;
        assert_eq!(hotel.status, Status::Approved);
        assert!(hotel.reject_reason.is_none());
    }

    #[tokio::test]
    async fn returns_full_listing() {
        let svc = service();
        let owner = initiator(Role::Merchant);
        let id = draft(&svc, owner).await;

        let listing = svc
            .execute(TransitHotel {
                hotel_id: id,
                initiator: owner,
                transition: Transition::Submit,
            })
            .await
            .unwrap();

        assert_eq!(listing.hotel.id, id);
        assert_eq!(listing.room_types.len(), 1);
    }

    #[tokio::test]
    async fn approving_draft_keeps_it_intact() {
        let svc = service();
        let owner = initiator(Role::Merchant);
        let id = draft(&svc, owner).await;
        let before = stored(&svc, id).await;

        let err = transit(&svc, id, initiator(Role::Admin), Transition::Approve)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExecutionError::Transition(TransitionError::InvalidState {
                status: Status::Draft,
                ..
            }),
        ));
        let after = stored(&svc, id).await;
        assert_eq!(after.status, Status::Draft);
        assert_eq!(after.updated_at, before.updated_at);
    }

    #[tokio::test]
    async fn other_merchant_cannot_submit() {
        let svc = service();
        let owner = initiator(Role::Merchant);
        let id = draft(&svc, owner).await;
        assert_eq!(
            transit(&svc, id, owner, Transition::Submit).await.unwrap(),
            Status::Pending,
        );

        let err =
            transit(&svc, id, initiator(Role::Merchant), Transition::Submit)
                .await
                .unwrap_err();

        assert!(matches!(
            err,
            ExecutionError::Transition(TransitionError::Forbidden(_)),
        ));
        assert_eq!(stored(&svc, id).await.status, Status::Pending);
    }

    #[tokio::test]
    async fn missing_hotel_is_reported_first() {
        let svc = service();
        let id = hotel::Id::new();

        let err =
            transit(&svc, id, initiator(Role::Merchant), Transition::Approve)
                .await
                .unwrap_err();

        assert!(matches!(err, ExecutionError::HotelNotExists(i) if i == id));
    }

    #[tokio::test]
    async fn concurrent_reviews_are_serialized() {
        let svc = service();
        let (owner, admin) = (initiator(Role::Merchant), initiator(Role::Admin));
        let id = draft(&svc, owner).await;
        assert_eq!(
            transit(&svc, id, owner, Transition::Submit).await.unwrap(),
            Status::Pending,
        );
        let reason = RejectReason::new("no parking").unwrap();

        let (approved, rejected) = tokio::join!(
            transit(&svc, id, admin, Transition::Approve),
            transit(&svc, id, admin, Transition::Reject(reason)),
        );

        let now = stored(&svc, id).await.status;
        match (approved, rejected) {
            (
                Ok(won),
                Err(ExecutionError::Transition(
                    TransitionError::InvalidState { status: seen, .. },
                )),
            )
            | (
                Err(ExecutionError::Transition(
                    TransitionError::InvalidState { status: seen, .. },
                )),
                Ok(won),
            ) => {
                assert_eq!(seen, won);
                assert_eq!(now, won);
            }
            other => panic!("exactly one review must win: {other:?}"),
        }
    }
}
