//! [`Hotel`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        hotel::{self, Content, NearbyPlace, RoomType, Star, Status},
        user, Hotel,
    },
    infra::{
        database::{
            self,
            postgres::{self, Connection, LikePattern},
            Postgres,
        },
        Database,
    },
    read::hotel::{search, Featured, ForReview, Listing},
};

/// Columns of the `hotels` table a [`Hotel`] is read from.
const COLUMNS: &str = "\
    id, merchant_id, \
    name, english_name, city, address, star, opening_date, description, \
    tags, facilities, images, \
    status, reject_reason, \
    created_at, updated_at";

/// Subquery of the lowest room price of the `hotels` row.
const LOWEST_PRICE: &str = "\
    SELECT MIN(price) \
    FROM room_types \
    WHERE room_types.hotel_id = hotels.id";

/// Reads a [`Hotel`] from the provided [`Row`].
///
/// # Errors
///
/// If the [`Row`] contains an invalid [`Star`] rating.
fn from_row(row: &Row) -> Result<Hotel, Traced<database::Error>> {
    let star = Star::new(row.get::<_, i16>("star"))
        .ok_or(postgres::Error::Malformed("hotels.star"))
        .map_err(tracerr::from_and_wrap!())?;
    Ok(Hotel {
        id: row.get("id"),
        merchant_id: row.get("merchant_id"),
        content: Content {
            name: row.get("name"),
            english_name: row.get("english_name"),
            city: row.get("city"),
            address: row.get("address"),
            star,
            opening_date: row.get("opening_date"),
            description: row.get("description"),
            tags: row.get("tags"),
            facilities: row.get("facilities"),
            images: row.get("images"),
        },
        status: row.get("status"),
        reject_reason: row.get("reject_reason"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Reads [`Hotel`]s from the provided [`Row`]s.
fn from_rows(rows: &[Row]) -> Result<Vec<Hotel>, Traced<database::Error>> {
    rows.iter().map(from_row).collect()
}

impl<C> Database<Select<By<Option<Hotel>, hotel::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Hotel>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Hotel>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: hotel::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM hotels \
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

impl<C> Database<Select<By<Option<Listing>, hotel::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
            Select<By<Option<Hotel>, hotel::Id>>,
            Ok = Option<Hotel>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<RoomType>, hotel::Id>>,
            Ok = Vec<RoomType>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<NearbyPlace>, hotel::Id>>,
            Ok = Vec<NearbyPlace>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let Some(hotel) = self
            .execute(Select(By::<Option<Hotel>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };
        let room_types = self
            .execute(Select(By::<Vec<RoomType>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?;
        let nearby_places = self
            .execute(Select(By::<Vec<NearbyPlace>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Some(Listing {
            hotel,
            room_types,
            nearby_places,
        }))
    }
}

impl<C> Database<Insert<Hotel>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Hotel>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(hotel): Insert<Hotel>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(hotel)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Hotel>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(hotel): Update<Hotel>,
    ) -> Result<Self::Ok, Self::Err> {
        let Hotel {
            id,
            merchant_id,
            content:
                Content {
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
                },
            status,
            reject_reason,
            created_at,
            updated_at,
        } = hotel;

        let star = i16::from(u8::from(star));

        const SQL: &str = "\
            INSERT INTO hotels (\
                id, merchant_id, \
                name, english_name, city, address, star, opening_date, \
                description, \
                tags, facilities, images, \
                status, reject_reason, \
                created_at, updated_at\
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, $6::VARCHAR, \
                $7::INT2, $8::VARCHAR, \
                $9::TEXT, \
                $10::VARCHAR[], $11::VARCHAR[], $12::VARCHAR[], \
                $13::INT2, $14::TEXT, \
                $15::TIMESTAMPTZ, $16::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                english_name = EXCLUDED.english_name, \
                city = EXCLUDED.city, \
                address = EXCLUDED.address, \
                star = EXCLUDED.star, \
                opening_date = EXCLUDED.opening_date, \
                description = EXCLUDED.description, \
                tags = EXCLUDED.tags, \
                facilities = EXCLUDED.facilities, \
                images = EXCLUDED.images, \
                status = EXCLUDED.status, \
                reject_reason = EXCLUDED.reject_reason, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &merchant_id,
                &name,
                &english_name,
                &city,
                &address,
                &star,
                &opening_date,
                &description,
                &tags,
                &facilities,
                &images,
                &status,
                &reject_reason,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Hotel, hotel::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Hotel, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: hotel::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM hotels \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<search::Page, search::Selector>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = search::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<search::Page, search::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let search::Selector {
            arguments,
            filter:
                search::Filter {
                    city,
                    keyword,
                    star,
                    tag,
                    min_price,
                    max_price,
                },
        } = by.into_inner();

        let limit = i64::try_from(arguments.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(arguments.offset()).unwrap_or(i64::MAX);
        let status = Status::Approved;
        let pattern = keyword.as_ref().map(|k| LikePattern::contains(k.as_ref()));
        let star = star.map(|s| i16::from(u8::from(s)));
        let min_price = min_price.map(|m| m.amount);
        let max_price = max_price.map(|m| m.amount);

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&status];

        let city_idx = city.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let pattern_idx = pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });
        let star_idx = star.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let tag_idx = tag.as_ref().map(|t| {
            ps.push(t);
            ps.len()
        });
        let min_price_idx = min_price.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });
        let max_price_idx = max_price.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });

        let filtering = format!(
            "status = $1::INT2 \
             {city} \
             {keyword} \
             {star} \
             {tag} \
             {min_price} \
             {max_price}",
            city = city_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND city = ${idx}::VARCHAR"))
            }),
            keyword = pattern_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(
                    "AND (name ILIKE ${idx}::VARCHAR \
                          OR english_name ILIKE ${idx}::VARCHAR \
                          OR address ILIKE ${idx}::VARCHAR)"
                ))
            }),
            star = star_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND star = ${idx}::INT2"))
            }),
            tag = tag_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND ${idx}::VARCHAR = ANY(tags)"))
            }),
            min_price = min_price_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(
                    "AND COALESCE(({LOWEST_PRICE}) >= ${idx}::NUMERIC, TRUE)"
                ))
            }),
            max_price = max_price_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!(
                    "AND COALESCE(({LOWEST_PRICE}) <= ${idx}::NUMERIC, TRUE)"
                ))
            }),
        );

        let count_sql = format!(
            "SELECT COUNT(*)::INT8 \
             FROM hotels \
             WHERE {filtering}",
        );
        let total = self
            .query_opt(&count_sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .map_or(0, |row| row.get::<_, i64>(0));

        ps.push(&limit);
        let limit_idx = ps.len();
        ps.push(&offset);
        let offset_idx = ps.len();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM hotels \
             WHERE {filtering} \
             ORDER BY updated_at DESC, id DESC \
             LIMIT ${limit_idx}::INT8 \
             OFFSET ${offset_idx}::INT8",
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        Ok(search::Page::new(
            arguments,
            from_rows(&rows)?,
            usize::try_from(total).unwrap_or_default(),
        ))
    }
}

impl<C> Database<Select<By<Vec<Hotel>, Featured>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Hotel>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Hotel>, Featured>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM hotels \
             WHERE status = $1::INT2 \
             ORDER BY star DESC, updated_at DESC, id DESC \
             LIMIT {limit}",
            limit = Featured::LIMIT,
        );
        let rows = self
            .query(&sql, &[&Status::Approved])
            .await
            .map_err(tracerr::wrap!())?;
        from_rows(&rows)
    }
}

impl<C> Database<Select<By<Vec<Hotel>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Hotel>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Hotel>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let merchant_id: user::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM hotels \
             WHERE merchant_id = $1::UUID \
             ORDER BY updated_at DESC, id DESC",
        );
        let rows = self
            .query(&sql, &[&merchant_id])
            .await
            .map_err(tracerr::wrap!())?;
        from_rows(&rows)
    }
}

impl<C> Database<Select<By<Vec<Hotel>, ForReview>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Hotel>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Hotel>, ForReview>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ForReview { status } = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM hotels \
             WHERE $1::INT2 IS NULL OR status = $1::INT2 \
             ORDER BY updated_at DESC, id DESC",
        );
        let rows = self
            .query(&sql, &[&status])
            .await
            .map_err(tracerr::wrap!())?;
        from_rows(&rows)
    }
}
