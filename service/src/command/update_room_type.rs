//! [`Command`] for editing a [`RoomType`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
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

/// [`Command`] for editing a [`RoomType`] by the owner of its [`Hotel`].
#[derive(Clone, Debug)]
pub struct UpdateRoomType {
    /// ID of the [`RoomType`] to edit.
    pub room_type_id: room::Id,

    /// Merchant [`user::Initiator`] editing the [`RoomType`].
    pub initiator: user::Initiator,

    /// [`Changes`] of the [`room::Details`].
    pub details: Changes,
}

/// Changes of [`room::Details`].
///
/// Every provided field replaces the stored one.
#[derive(Clone, Debug, Default)]
pub struct Changes {
    /// New [`room::Name`].
    pub name: Option<room::Name>,

    /// New [`room::Price`].
    pub price: Option<room::Price>,

    /// New original [`room::Price`], [`None`] inside removes it.
    pub original_price: Option<Option<room::Price>>,

    /// New [`room::Capacity`].
    pub capacity: Option<room::Capacity>,

    /// Whether a breakfast is included now.
    pub breakfast: Option<bool>,

    /// New photos.
    pub images: Option<Vec<hotel::ImageUrl>>,
}

impl Changes {
    /// Applies these [`Changes`] to the provided [`room::Details`].
    fn apply(self, d: &mut room::Details) {
        let Self {
            name,
            price,
            original_price,
            capacity,
            breakfast,
            images,
        } = self;

        if let Some(name) = name {
            d.name = name;
        }
        if let Some(price) = price {
            d.price = price;
        }
        if let Some(price) = original_price {
            d.original_price = price;
        }
        if let Some(capacity) = capacity {
            d.capacity = capacity;
        }
        if let Some(breakfast) = breakfast {
            d.breakfast = breakfast;
        }
        if let Some(images) = images {
            d.images = images;
        }
    }
}

impl<Db> Command<UpdateRoomType> for Service<Db>
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
        > + Database<Update<Hotel>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<RoomType>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = RoomType;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateRoomType,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRoomType {
            room_type_id,
            initiator,
            details,
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

        let mut room = tx
            .execute(Select(By::<Option<RoomType>, _>::new(room_type_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomTypeNotExists(room_type_id))
            .map_err(tracerr::wrap!())?;

        details.apply(&mut room.details);
        tx.execute(Update(room.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

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

/// Error of [`UpdateRoomType`] [`Command`] execution.
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
    use std::str::FromStr as _;

    use common::Money;

    use crate::{
        command::CreateHotel,
        domain::{
            hotel::{room, spec::content},
            user::{self, Initiator, Role},
        },
        spec::service,
        Command as _,
    };

    use super::{Changes, ExecutionError, UpdateRoomType};

    #[tokio::test]
    async fn owner_changes_price() {
        let svc = service();
        let owner = Initiator {
            id: user::Id::new(),
            role: Role::Merchant,
        };
        let listing = svc
            .execute(CreateHotel {
                initiator: owner,
                content: content("Riverside Inn"),
                room_types: vec![room::spec::details("King", "420CNY")],
                nearby_places: vec![],
            })
            .await
            .unwrap();
        let room_id = listing.room_types[0].id;
        let price = room::Price::new(Money::from_str("360CNY").unwrap());

        let room = svc
            .execute(UpdateRoomType {
                room_type_id: room_id,
                initiator: owner,
                details: Changes {
                    price,
                    breakfast: Some(true),
                    ..Changes::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(Some(room.details.price), price);
        assert!(room.details.breakfast);
        assert_eq!(room.details.name, room::Name::new("King").unwrap());

        let err = svc
            .execute(UpdateRoomType {
                room_type_id: room::Id::new(),
                initiator: owner,
                details: Changes::default(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.into_inner(),
            ExecutionError::RoomTypeNotExists(_),
        ));
    }
}
