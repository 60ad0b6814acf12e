//! [`Query`] definition.

pub mod hotel;
pub mod hotels;
pub mod user;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] fetching something from a [`Database`] as is, via a single
/// [`Select`] operation.
///
/// Concrete queries are aliases of it, e.g. [`hotel::ById`].
#[derive(Clone, Copy, Debug)]
pub struct Fetch<T>(T);

impl<W, B> Fetch<By<W, B>> {
    /// Creates a new [`Fetch`] of a `W` selected by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<Db, W, B> Query<Fetch<By<W, B>>> for Service<Db>
where
    Db: Database<Select<By<W, B>>, Ok = W, Err = Traced<database::Error>>,
{
    type Ok = W;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        query: Fetch<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Fetch(by) = query;
        self.database()
            .execute(Select(by))
            .await
            .map_err(tracerr::wrap!())
    }
}
