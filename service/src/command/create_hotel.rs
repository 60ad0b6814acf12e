//! [`Command`] for creating a new [`Hotel`].

use common::operations::{Commit, Insert, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::hotel::Status;
use crate::{
    domain::{
        hotel::{self, place, room, NearbyPlace, RoomType},
        user, Hotel,
    },
    infra::{database, Database},
    read::hotel::Listing,
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Status::Draft`] [`Hotel`] along with its
/// [`RoomType`]s and [`NearbyPlace`]s.
#[derive(Clone, Debug)]
pub struct CreateHotel {
    /// Merchant [`user::Initiator`] creating the [`Hotel`].
    pub initiator: user::Initiator,

    /// [`hotel::Content`] of the new [`Hotel`].
    pub content: hotel::Content,

    /// [`room::Details`] of the new [`Hotel`]'s [`RoomType`]s.
    pub room_types: Vec<room::Details>,

    /// [`place::Details`] of the new [`Hotel`]'s [`NearbyPlace`]s.
    pub nearby_places: Vec<place::Details>,
}

impl<Db> Command<CreateHotel> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Hotel>, Err = Traced<database::Error>>
        + Database<Insert<RoomType>, Err = Traced<database::Error>>
        + Database<Insert<NearbyPlace>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateHotel) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateHotel {
            initiator,
            content,
            room_types,
            nearby_places,
        } = cmd;

        if initiator.role != user::Role::Merchant {
            return Err(tracerr::new!(E::NotMerchant(initiator.id)));
        }

        let hotel = Hotel::new(initiator.id, content);
        let room_types = room_types
            .into_iter()
            .map(|d| RoomType::new(hotel.id, d))
            .collect::<Vec<_>>();
        let nearby_places = nearby_places
            .into_iter()
            .map(|d| NearbyPlace::new(hotel.id, d))
            .collect::<Vec<_>>();

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(hotel.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        for room in &room_types {
            tx.execute(Insert(room.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }
        for place in &nearby_places {
            tx.execute(Insert(place.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Listing {
            hotel,
            room_types,
            nearby_places,
        })
    }
}

/// Error of [`CreateHotel`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`User`] is not a merchant.
    ///
    /// [`User`]: crate::domain::User
    #[display("`User(id: {_0})` is not a merchant")]
    #[from(ignore)]
    NotMerchant(#[error(not(source))] user::Id),
}
