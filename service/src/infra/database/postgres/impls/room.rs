//! [`RoomType`]-related [`Database`] implementations.

use common::{
    money::Currency,
    operations::{By, Delete, Insert, Select, Update},
    Money,
};
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::hotel::{
        self,
        room::{self, Capacity, Details, Price},
        RoomType,
    },
    infra::{
        database::{
            self,
            postgres::{self, Connection},
            Postgres,
        },
        Database,
    },
};

/// Columns of the `room_types` table a [`RoomType`] is read from.
const COLUMNS: &str = "\
    id, hotel_id, \
    name, price, original_price, price_currency, capacity, breakfast, images";

/// Reads a [`RoomType`] from the provided [`Row`].
///
/// # Errors
///
/// If the [`Row`] contains a negative [`Price`] or an invalid [`Capacity`].
fn from_row(row: &Row) -> Result<RoomType, Traced<database::Error>> {
    let currency: Currency = row.get("price_currency");
    let price = |amount: Decimal| {
        Price::new(Money { amount, currency })
            .ok_or(postgres::Error::Malformed("room_types.price"))
            .map_err(tracerr::from_and_wrap!())
    };

    Ok(RoomType {
        id: row.get("id"),
        hotel_id: row.get("hotel_id"),
        details: Details {
            name: row.get("name"),
            price: price(row.get("price"))?,
            original_price: row
                .get::<_, Option<Decimal>>("original_price")
                .map(price)
                .transpose()?,
            capacity: Capacity::new(row.get::<_, i16>("capacity"))
                .ok_or(postgres::Error::Malformed("room_types.capacity"))
                .map_err(tracerr::from_and_wrap!())?,
            breakfast: row.get("breakfast"),
            images: row.get("images"),
        },
    })
}

impl<C> Database<Select<By<Vec<RoomType>, hotel::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<RoomType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<RoomType>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let hotel_id: hotel::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM room_types \
             WHERE hotel_id = $1::UUID \
             ORDER BY seq",
        );
        self.query(&sql, &[&hotel_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect()
    }
}

impl<C> Database<Select<By<Option<RoomType>, room::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<RoomType>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<RoomType>, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: room::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM room_types \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row)
            .transpose()
    }
}

impl<C> Database<Insert<RoomType>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<RoomType>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(room): Insert<RoomType>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(room)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<RoomType>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(room): Update<RoomType>,
    ) -> Result<Self::Ok, Self::Err> {
        let RoomType {
            id,
            hotel_id,
            details:
                Details {
                    name,
                    price,
                    original_price,
                    capacity,
                    breakfast,
                    images,
                },
        } = room;

        let price = price.money();
        let original_price = original_price.map(|p| p.money().amount);
        let capacity = i16::from(u8::from(capacity));

        const SQL: &str = "\
            INSERT INTO room_types (\
                id, hotel_id, \
                name, price, original_price, price_currency, \
                capacity, breakfast, images\
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::VARCHAR, $4::NUMERIC, $5::NUMERIC, $6::INT2, \
                $7::INT2, $8::BOOL, $9::VARCHAR[]\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                price = EXCLUDED.price, \
                original_price = EXCLUDED.original_price, \
                price_currency = EXCLUDED.price_currency, \
                capacity = EXCLUDED.capacity, \
                breakfast = EXCLUDED.breakfast, \
                images = EXCLUDED.images";
        self.exec(
            SQL,
            &[
                &id,
                &hotel_id,
                &name,
                &price.amount,
                &original_price,
                &price.currency,
                &capacity,
                &breakfast,
                &images,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<RoomType, room::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<RoomType, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: room::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM room_types \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Vec<RoomType>, hotel::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<RoomType>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let hotel_id: hotel::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM room_types \
            WHERE hotel_id = $1::UUID";
        self.exec(SQL, &[&hotel_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
