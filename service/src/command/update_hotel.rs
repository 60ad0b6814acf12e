//! [`Command`] for editing a [`Hotel`].

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Transacted, Update,
};
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

/// [`Command`] for editing a [`Hotel`] by its owner.
///
/// Provided [`RoomType`]s and [`NearbyPlace`]s replace the existing ones
/// wholesale.
///
/// The [`Hotel`] may be edited in any [`Status`], including the publicly
/// listed [`Status::Approved`] one, and its [`Status`] is never changed.
#[derive(Clone, Debug)]
pub struct UpdateHotel {
    /// ID of the [`Hotel`] to edit.
    pub hotel_id: hotel::Id,

    /// Merchant [`user::Initiator`] editing the [`Hotel`].
    pub initiator: user::Initiator,

    /// [`Changes`] of the [`hotel::Content`].
    pub content: Changes,

    /// New [`RoomType`]s replacing the existing ones.
    pub room_types: Option<Vec<room::Details>>,

    /// New [`NearbyPlace`]s replacing the existing ones.
    pub nearby_places: Option<Vec<place::Details>>,
}

/// Changes of a [`hotel::Content`].
///
/// Every provided field replaces the stored one, the omitted ones are left
/// intact.
#[derive(Clone, Debug, Default)]
pub struct Changes {
    /// New [`hotel::Name`].
    pub name: Option<hotel::Name>,

    /// New English [`hotel::Name`], [`None`] inside removes it.
    pub english_name: Option<Option<hotel::Name>>,

    /// New [`hotel::City`].
    pub city: Option<hotel::City>,

    /// New [`hotel::Address`].
    pub address: Option<hotel::Address>,

    /// New [`hotel::Star`] rating.
    pub star: Option<hotel::Star>,

    /// New [`hotel::OpeningDate`], [`None`] inside removes it.
    pub opening_date: Option<Option<hotel::OpeningDate>>,

    /// New [`hotel::Description`].
    pub description: Option<hotel::Description>,

    /// New tags.
    pub tags: Option<Vec<hotel::Label>>,

    /// New facilities.
    pub facilities: Option<Vec<hotel::Label>>,

    /// New photos.
    pub images: Option<Vec<hotel::ImageUrl>>,
}

impl Changes {
    /// Applies these [`Changes`] to the provided [`hotel::Content`].
    fn apply(self, c: &mut hotel::Content) {
        let Self {
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
        } = self;

        if let Some(name) = name {
            c.name = name;
        }
        if let Some(name) = english_name {
            c.english_name = name;
        }
        if let Some(city) = city {
            c.city = city;
        }
        if let Some(address) = address {
            c.address = address;
        }
        if let Some(star) = star {
            c.star = star;
        }
        if let Some(date) = opening_date {
            c.opening_date = date;
        }
        if let Some(description) = description {
            c.description = description;
        }
        if let Some(tags) = tags {
            c.tags = tags;
        }
        if let Some(facilities) = facilities {
            c.facilities = facilities;
        }
        if let Some(images) = images {
            c.images = images;
        }
    }
}

impl<Db> Command<UpdateHotel> for Service<Db>
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
        + Database<
            Delete<By<Vec<RoomType>, hotel::Id>>,
            Err = Traced<database::Error>,
        > + Database<Insert<RoomType>, Err = Traced<database::Error>>
        + Database<
            Delete<By<Vec<NearbyPlace>, hotel::Id>>,
            Err = Traced<database::Error>,
        > + Database<Insert<NearbyPlace>, Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateHotel) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateHotel {
            hotel_id,
            initiator,
            content,
            room_types,
            nearby_places,
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

        content.apply(&mut hotel.content);
        hotel.touch();
        tx.execute(Update(hotel))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if let Some(rooms) = room_types {
            tx.execute(Delete(By::<Vec<RoomType>, _>::new(hotel_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            for details in rooms {
                tx.execute(Insert(RoomType::new(hotel_id, details)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
        }
        if let Some(places) = nearby_places {
            tx.execute(Delete(By::<Vec<NearbyPlace>, _>::new(hotel_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            for details in places {
                tx.execute(Insert(NearbyPlace::new(hotel_id, details)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
        }

        let listing = tx
            .execute(Select(By::<Option<Listing>, _>::new(hotel_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::HotelNotExists(hotel_id))
            .map_err(tracerr::wrap!())?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(listing)
    }
}

/// Error of [`UpdateHotel`] [`Command`] execution.
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

#[cfg(test)]
mod spec {
    use crate::{
        command::{CreateHotel, TransitHotel},
        domain::{
            hotel::{self, place, room, spec::content, Status, Transition},
            user::{self, Initiator, Role},
        },
        spec::service,
        Command as _,
    };

    use super::{Changes, ExecutionError, UpdateHotel};

    fn merchant() -> Initiator {
        Initiator {
            id: user::Id::new(),
            role: Role::Merchant,
        }
    }

    #[tokio::test]
    async fn replaces_provided_fields_only() {
        let svc = service();
        let owner = merchant();
        let created = svc
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

        let updated = svc
            .execute(UpdateHotel {
                hotel_id: created.hotel.id,
                initiator: owner,
                content: Changes {
                    star: hotel::Star::new(5),
                    english_name: Some(hotel::Name::new("Riverside")),
                    ..Changes::default()
                },
                room_types: Some(vec![room::spec::details("Suite", "990CNY")]),
                nearby_places: Some(vec![place::Details {
                    kind: place::Kind::Transport,
                    name: place::Name::new("Line 2").unwrap(),
                    distance: place::Distance::new("300m").unwrap(),
                }]),
            })
            .await
            .unwrap();

        let c = &updated.hotel.content;
        assert_eq!(c.name, created.hotel.content.name);
        assert_eq!(c.star, hotel::Star::new(5).unwrap());
        assert_eq!(c.english_name, hotel::Name::new("Riverside"));
        assert_eq!(updated.room_types.len(), 1);
        assert_eq!(
            updated.room_types[0].details.name,
            room::Name::new("Suite").unwrap(),
        );
        assert_eq!(updated.nearby_places.len(), 1);
        assert!(updated.hotel.updated_at >= created.hotel.updated_at);
    }

    #[tokio::test]
    async fn keeps_status_of_approved_hotel() {
        let svc = service();
        let owner = merchant();
        let admin = Initiator {
            id: user::Id::new(),
            role: Role::Admin,
        };
        let id = svc
            .execute(CreateHotel {
                initiator: owner,
                content: content("Riverside Inn"),
                room_types: vec![],
                nearby_places: vec![],
            })
            .await
            .unwrap()
            .hotel
            .id;
        for (initiator, transition) in [
            (owner, Transition::Submit),
            (admin, Transition::Approve),
        ] {
            _ = svc
                .execute(TransitHotel {
                    hotel_id: id,
                    initiator,
                    transition,
                })
                .await
                .unwrap();
        }

        let updated = svc
            .execute(UpdateHotel {
                hotel_id: id,
                initiator: owner,
                content: Changes {
                    name: hotel::Name::new("Riverside Grand"),
                    ..Changes::default()
                },
                room_types: None,
                nearby_places: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.hotel.status, Status::Approved);
        assert_eq!(updated.hotel.content.name.to_string(), "Riverside Grand");
    }

    #[tokio::test]
    async fn only_owner_edits() {
        let svc = service();
        let id = svc
            .execute(CreateHotel {
                initiator: merchant(),
                content: content("Riverside Inn"),
                room_types: vec![],
                nearby_places: vec![],
            })
            .await
            .unwrap()
            .hotel
            .id;

        for initiator in [
            merchant(),
            Initiator {
                id: user::Id::new(),
                role: Role::Admin,
            },
        ] {
            let err = svc
                .execute(UpdateHotel {
                    hotel_id: id,
                    initiator,
                    content: Changes::default(),
                    room_types: None,
                    nearby_places: None,
                })
                .await
                .unwrap_err();
            assert!(matches!(err.into_inner(), ExecutionError::NotOwner(_)));
        }

        let err = svc
            .execute(UpdateHotel {
                hotel_id: hotel::Id::new(),
                initiator: merchant(),
                content: Changes::default(),
                room_types: None,
                nearby_places: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.into_inner(),
            ExecutionError::HotelNotExists(_),
        ));
    }
}
