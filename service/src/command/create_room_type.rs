//! [`Command`] for adding a [`RoomType`] to a [`Hotel`].

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        hotel::{self, room, RoomType},
        user, Hotel,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a [`RoomType`] to a [`Hotel`] by its owner.
#[derive(Clone, Debug)]
pub struct CreateRoomType {
    /// ID of the [`Hotel`] to add the [`RoomType`] to.
    pub hotel_id: hotel::Id,

    /// Merchant [`user::Initiator`] adding the [`RoomType`].
    pub initiator: user::Initiator,

    /// [`room::Details`] of the new [`RoomType`].
    pub details: room::Details,
}

impl<Db> Command<CreateRoomType> for Service<Db>
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
        > + Database<Update<Hotel>, Ok = (), Err = Traced<database::Error>>
        + Database<Insert<RoomType>, Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = RoomType;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateRoomType,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRoomType {
            hotel_id,
            initiator,
            details,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Hotel`.
        tx.execute(Lock(By::new(hotel_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut hotel = tx
            .execute(Select(By::<Option<Hotel>, _>::new(hotel_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::HotelNotExists(hotel_id))
            .map_err(tracerr::wrap!())?;
        if !hotel.is_owned_by(&initiator) {
            return Err(tracerr::new!(E::NotOwner(hotel_id)));
        }

        let room = RoomType::new(hotel_id, details);
        tx.execute(Insert(room.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        hotel.touch();
        tx.execute(Update(hotel))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(room)
    }
}

/// Error of [`CreateRoomType`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Hotel`] with the provided ID does not exist.
    #[display("`Hotel(id: {_0})` does not exist")]
    #[from(ignore)]
    HotelNotExists(#[error(not(source))] hotel::Id),

    /// [`Hotel`] is not owned by the initiator.
    #[display("`Hotel(id: {_0})` is not owned by the initiator")]
    #[from(ignore)]
    NotOwner(#[error(not(source))] hotel::Id),
}
