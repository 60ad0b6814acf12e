//! [`NearbyPlace`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::hotel::{self, place::Details, NearbyPlace},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Reads a [`NearbyPlace`] from the provided [`Row`].
fn from_row(row: &Row) -> NearbyPlace {
    NearbyPlace {
        id: row.get("id"),
        hotel_id: row.get("hotel_id"),
        details: Details {
            kind: row.get("kind"),
            name: row.get("name"),
            distance: row.get("distance"),
        },
    }
}

impl<C> Database<Select<By<Vec<NearbyPlace>, hotel::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<NearbyPlace>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<NearbyPlace>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let hotel_id: hotel::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, hotel_id, kind, name, distance \
            FROM nearby_places \
            WHERE hotel_id = $1::UUID \
            ORDER BY seq";
        Ok(self
            .query(SQL, &[&hotel_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<NearbyPlace>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(place): Insert<NearbyPlace>,
    ) -> Result<Self::Ok, Self::Err> {
        let NearbyPlace {
            id,
            hotel_id,
            details:
                Details {
                    kind,
                    name,
                    distance,
                },
        } = place;

        const SQL: &str = "\
            INSERT INTO nearby_places (\
                id, hotel_id, kind, name, distance\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::INT2, $4::VARCHAR, $5::VARCHAR\
            )";
        self.exec(SQL, &[&id, &hotel_id, &kind, &name, &distance])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Vec<NearbyPlace>, hotel::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<NearbyPlace>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let hotel_id: hotel::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM nearby_places \
            WHERE hotel_id = $1::UUID";
        self.exec(SQL, &[&hotel_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
