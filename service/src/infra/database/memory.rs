//! In-memory [`Database`] implementation backing the [`Service`] tests.
//!
//! [`Service`]: crate::Service

use std::{
    cmp::Reverse,
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Update,
};
use tokio::sync::OwnedMutexGuard;
use tracerr::Traced;

use crate::{
    domain::{
        hotel::{self, room, NearbyPlace, RoomType},
        user, Hotel, User,
    },
    infra::{database, Database},
    read::hotel::{search, Featured, ForReview, Listing},
};

/// [`Database`] keeping everything in memory.
///
/// Transactions share the state with their origin and apply writes
/// immediately. A [`Lock`]ed [`Hotel`] stays locked until the transaction
/// holding it is [`Commit`]ted or dropped.
#[derive(Clone, Debug, Default)]
pub(crate) struct Memory {
    /// Stored entities.
    state: Arc<Mutex<State>>,

    /// Row locks of [`Hotel`]s, shared by all transactions.
    locks: Arc<Mutex<HashMap<hotel::Id, Arc<tokio::sync::Mutex<()>>>>>,

    /// Row locks held by this transaction.
    held: Arc<Mutex<Vec<OwnedMutexGuard<()>>>>,
}

/// Entities stored in a [`Memory`] database.
#[derive(Debug, Default)]
struct State {
    /// Stored [`User`]s.
    users: HashMap<user::Id, User>,

    /// Stored [`Hotel`]s along with the sequence number of their last write.
    hotels: HashMap<hotel::Id, (u64, Hotel)>,

    /// Sequence number of the last [`Hotel`] write.
    seq: u64,

    /// Stored [`RoomType`]s.
    room_types: Vec<RoomType>,

    /// Stored [`NearbyPlace`]s.
    nearby_places: Vec<NearbyPlace>,
}

impl State {
    /// Returns [`RoomType`]s of the provided [`Hotel`].
    fn room_types_of(&self, id: hotel::Id) -> Vec<RoomType> {
        self.room_types
            .iter()
            .filter(|r| r.hotel_id == id)
            .cloned()
            .collect()
    }

    /// Returns the stored [`Hotel`] with the provided ID.
    fn hotel(&self, id: hotel::Id) -> Option<Hotel> {
        self.hotels.get(&id).map(|(_, h)| h.clone())
    }

    /// Stores the provided [`Hotel`].
    fn put_hotel(&mut self, hotel: Hotel) {
        self.seq += 1;
        _ = self.hotels.insert(hotel.id, (self.seq, hotel));
    }

    /// Returns the [`Hotel`]s passing the provided predicate, most recently
    /// modified first.
    ///
    /// Writes within the same microsecond are ordered by their sequence.
    fn hotels(&self, mut pred: impl FnMut(&Hotel) -> bool) -> Vec<Hotel> {
        let mut hotels = self
            .hotels
            .values()
            .filter(|(_, h)| pred(h))
            .collect::<Vec<_>>();
        hotels.sort_by_key(|(seq, h)| Reverse((h.updated_at, *seq)));
        hotels.into_iter().map(|(_, h)| h.clone()).collect()
    }
}

impl Memory {
    /// Locks the [`State`] of this [`Memory`] database.
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the row locks held by this transaction.
    fn held(&self) -> MutexGuard<'_, Vec<OwnedMutexGuard<()>>> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Self {
            state: Arc::clone(&self.state),
            locks: Arc::clone(&self.locks),
            held: Arc::default(),
        })
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.held().clear();
        Ok(())
    }
}

impl Database<Lock<By<Hotel, hotel::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Hotel, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let row = Arc::clone(
            self.locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(by.into_inner())
                .or_default(),
        );
        let guard = row.lock_owned().await;
        self.held().push(guard);
        Ok(())
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().users.get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<Option<User>, &user::Login>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &user::Login>>,
    ) -> Result<Self::Ok, Self::Err> {
        let login = by.into_inner();
        Ok(self
            .state()
            .users
            .values()
            .find(|u| u.login == *login)
            .cloned())
    }
}

impl Database<Insert<User>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.state().users.insert(user.id, user);
        Ok(())
    }
}

impl Database<Select<By<Option<Hotel>, hotel::Id>>> for Memory {
    type Ok = Option<Hotel>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Hotel>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Let concurrent operations interleave with the read, as a real
        // database round trip does.
        tokio::task::yield_now().await;
        Ok(self.state().hotel(by.into_inner()))
    }
}

impl Database<Select<By<Option<Listing>, hotel::Id>>> for Memory {
    type Ok = Option<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let state = self.state();
        Ok(state.hotel(id).map(|hotel| Listing {
            hotel,
            room_types: state.room_types_of(id),
            nearby_places: state
                .nearby_places
                .iter()
                .filter(|p| p.hotel_id == id)
                .cloned()
                .collect(),
        }))
    }
}

impl Database<Insert<Hotel>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(hotel): Insert<Hotel>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().put_hotel(hotel);
        Ok(())
    }
}

impl Database<Update<Hotel>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(hotel): Update<Hotel>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().put_hotel(hotel);
        Ok(())
    }
}

impl Database<Select<By<search::Page, search::Selector>>> for Memory {
    type Ok = search::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<search::Page, search::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let search::Selector { arguments, filter } = by.into_inner();
        let state = self.state();

        let found = state.hotels(|h| {
            filter.matches(h, room::lowest_price(&state.room_types_of(h.id)))
        });
        let total = found.len();
        Ok(search::Page::new(
            arguments,
            found
                .into_iter()
                .skip(arguments.offset())
                .take(arguments.limit()),
            total,
        ))
    }
}

impl Database<Select<By<Vec<Hotel>, Featured>>> for Memory {
    type Ok = Vec<Hotel>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Hotel>, Featured>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut hotels = self.state().hotels(|h| h.status.is_public());
        // Stable, so keeps the most recently modified first among equals.
        hotels.sort_by_key(|h| Reverse(h.content.star));
        hotels.truncate(Featured::LIMIT);
        Ok(hotels)
    }
}

impl Database<Select<By<Vec<Hotel>, user::Id>>> for Memory {
    type Ok = Vec<Hotel>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Hotel>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let merchant_id = by.into_inner();
        Ok(self.state().hotels(|h| h.merchant_id == merchant_id))
    }
}

impl Database<Select<By<Vec<Hotel>, ForReview>>> for Memory {
    type Ok = Vec<Hotel>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Hotel>, ForReview>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        Ok(self.state().hotels(|h| filter.matches(h)))
    }
}

impl Database<Select<By<Vec<RoomType>, hotel::Id>>> for Memory {
    type Ok = Vec<RoomType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<RoomType>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state().room_types_of(by.into_inner()))
    }
}

impl Database<Select<By<Option<RoomType>, room::Id>>> for Memory {
    type Ok = Option<RoomType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RoomType>, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .state()
            .room_types
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }
}

impl Database<Insert<RoomType>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(room): Insert<RoomType>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().room_types.push(room);
        Ok(())
    }
}

impl Database<Update<RoomType>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(room): Update<RoomType>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        if let Some(r) = state.room_types.iter_mut().find(|r| r.id == room.id)
        {
            *r = room;
        }
        Ok(())
    }
}

impl Database<Delete<By<RoomType, room::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<RoomType, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.state().room_types.retain(|r| r.id != id);
        Ok(())
    }
}

impl Database<Delete<By<Vec<RoomType>, hotel::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<RoomType>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.state().room_types.retain(|r| r.hotel_id != id);
        Ok(())
    }
}

impl Database<Select<By<Vec<NearbyPlace>, hotel::Id>>> for Memory {
    type Ok = Vec<NearbyPlace>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<NearbyPlace>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .state()
            .nearby_places
            .iter()
            .filter(|p| p.hotel_id == id)
            .cloned()
            .collect())
    }
}

impl Database<Insert<NearbyPlace>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(place): Insert<NearbyPlace>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().nearby_places.push(place);
        Ok(())
    }
}

impl Database<Delete<By<Vec<NearbyPlace>, hotel::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<NearbyPlace>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.state().nearby_places.retain(|p| p.hotel_id != id);
        Ok(())
    }
}
