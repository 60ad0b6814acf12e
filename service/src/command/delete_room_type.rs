//! [`Command`] for removing a [`RoomType`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted, Update,
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

/// [`Command`] for removing a [`RoomType`] by the owner of its [`Hotel`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteRoomType {
    /// ID of the [`RoomType`] to remove.
    pub room_type_id: room::Id,

    /// Merchant [`user::Initiator`] removing the [`RoomType`].
    pub initiator: user::Initiator,
}

impl<Db> Command<DeleteRoomType> for Service<Db>
where
    Db: Database<
            Select<By<Option<RoomType>, room::Id>>,
            Ok = Option<RoomType>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Hotel, hotel::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Hotel>, hotel::Id>>,
            Ok = Option<Hotel>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<RoomType>, room::Id>>,
            Ok = Option<RoomType>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<RoomType, room::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Hotel>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = RoomType;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteRoomType,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteRoomType {
            room_type_id,
            initiator,
        } = cmd;

        let hotel_id = self
            .database()
            .execute(Select(By::<Option<RoomType>, _>::new(room_type_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomTypeNotExists(room_type_id))
            .map_err(tracerr::wrap!())?
            .hotel_id;

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
            .ok_or(E::RoomTypeNotExists(room_type_id))
            .map_err(tracerr::wrap!())?;
        if !hotel.is_owned_by(&initiator) {
            return Err(tracerr::new!(E::NotOwner(hotel_id)));
        }

        let room = tx
            .execute(Select(By::<Option<RoomType>, _>::new(room_type_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomTypeNotExists(room_type_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<RoomType, _>::new(room_type_id)))
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

/// Error of [`DeleteRoomType`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Hotel`] is not owned by the initiator.
    #[display("`Hotel(id: {_0})` is not owned by the initiator")]
    #[from(ignore)]
    NotOwner(#[error(not(source))] hotel::Id),

    /// [`RoomType`] with the provided ID does not exist.
    #[display("`RoomType(id: {_0})` does not exist")]
    #[from(ignore)]
    RoomTypeNotExists(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::CreateHotel,
        domain::{
            hotel::{room, spec::content},
            user::{self, Initiator, Role},
        },
        query,
        spec::service,
        Command as _,
    };

    use super::{DeleteRoomType, ExecutionError};

    #[tokio::test]
    async fn only_owner_deletes() {
        let svc = service();
        let owner = Initiator {
            id: user::Id::new(),
            role: Role::Merchant,
        };
        let listing = svc
            .execute(CreateHotel {
                initiator: owner,
                content: content("Riverside Inn"),
                room_types: vec![
                    room::spec::details("King", "420CNY"),
                    room::spec::details("Twin", "380CNY"),
                ],
                nearby_places: vec![],
            })
            .await
            .unwrap();
        let room_id = listing.room_types[0].id;

        let err = svc
            .execute(DeleteRoomType {
                room_type_id: room_id,
                initiator: Initiator {
                    id: user::Id::new(),
                    role: Role::Merchant,
                },
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), ExecutionError::NotOwner(_)));

        let deleted = svc
            .execute(DeleteRoomType {
                room_type_id: room_id,
                initiator: owner,
            })
            .await
            .unwrap();
        assert_eq!(deleted.id, room_id);

        let rooms = svc
            .execute(query::hotel::RoomTypes::by(listing.hotel.id))
            .await
            .unwrap();
        assert_eq!(rooms.len(), 1);
        assert_ne!(rooms[0].id, room_id);
    }
}
