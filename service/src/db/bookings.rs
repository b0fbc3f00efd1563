// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.


//! Database operations on bookings.

use crate::db::ensure_one_row;
use crate::model::{Booking, BookingId, CustomerId, TaxiId};
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
#[cfg(feature = "postgres")]
use taxibook_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use taxibook_core::db::sqlite;
use taxibook_core::db::{DbError, DbResult, Executor};
use time::Date;

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Booking {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let customer_id: i64 = row.try_get("customer_id").map_err(postgres::map_sqlx_error)?;
        let taxi_id: i64 = row.try_get("taxi_id").map_err(postgres::map_sqlx_error)?;
        let travel_date: Date = row.try_get("travel_date").map_err(postgres::map_sqlx_error)?;

        Ok(Booking::for_refs(CustomerId::new(customer_id), TaxiId::new(taxi_id), travel_date)
            .with_id(BookingId::new(id)))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Booking {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let customer_id: i64 = row.try_get("customer_id").map_err(sqlite::map_sqlx_error)?;
        let taxi_id: i64 = row.try_get("taxi_id").map_err(sqlite::map_sqlx_error)?;
        let travel_date: Date = row.try_get("travel_date").map_err(sqlite::map_sqlx_error)?;

        Ok(Booking::for_refs(CustomerId::new(customer_id), TaxiId::new(taxi_id), travel_date)
            .with_id(BookingId::new(id)))
    }
}

/// Gets all bookings sorted by identifier.
pub(crate) async fn list_bookings(ex: &mut Executor) -> DbResult<Vec<Booking>> {
    let query_str = "SELECT * FROM bookings ORDER BY id";
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Booking::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Booking::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the booking identified by `id`, or `None` if it does not exist.
pub(crate) async fn get_booking(ex: &mut Executor, id: BookingId) -> DbResult<Option<Booking>> {
    let row = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => sqlx::query("SELECT * FROM bookings WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(ex.conn())
            .await
            .map_err(postgres::map_sqlx_error)?
            .map(Booking::try_from),

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlx::query("SELECT * FROM bookings WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(ex.conn())
            .await
            .map_err(sqlite::map_sqlx_error)?
            .map(Booking::try_from),

        #[allow(unused)]
        _ => unreachable!(),
    };
    row.transpose()
}

/// Gets the booking of `taxi_id` for `travel_date`.  If there are several, returns the oldest one.
///
/// Fails with `NotFound` if the taxi is not booked on that date.
pub(crate) async fn get_booking_by_taxi_and_date(
    ex: &mut Executor,
    taxi_id: TaxiId,
    travel_date: Date,
) -> DbResult<Booking> {
    let row = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT * FROM bookings
                WHERE taxi_id = $1 AND travel_date = $2
                ORDER BY id LIMIT 1";
            sqlx::query(query_str)
                .bind(taxi_id.as_i64())
                .bind(travel_date)
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
                .map(Booking::try_from)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT * FROM bookings
                WHERE taxi_id = ? AND travel_date = ?
                ORDER BY id LIMIT 1";
            sqlx::query(query_str)
                .bind(taxi_id.as_i64())
                .bind(travel_date)
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?
                .map(Booking::try_from)
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    row.unwrap_or(Err(DbError::NotFound))
}

/// Stores a new `booking` and returns it with the identifier assigned by the database.
///
/// The references to the customer and the taxi are stored as given: checking that they exist is
/// up to the caller.
pub(crate) async fn create_booking(ex: &mut Executor, booking: Booking) -> DbResult<Booking> {
    let customer_id = booking.customer_ref()?;
    let taxi_id = booking.taxi_ref()?;

    let id: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO bookings (customer_id, taxi_id, travel_date)
                VALUES ($1, $2, $3)
                RETURNING id";
            let row = sqlx::query(query_str)
                .bind(customer_id.as_i64())
                .bind(taxi_id.as_i64())
                .bind(*booking.travel_date())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("id").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO bookings (customer_id, taxi_id, travel_date)
                VALUES (?, ?, ?)
                RETURNING id";
            let row = sqlx::query(query_str)
                .bind(customer_id.as_i64())
                .bind(taxi_id.as_i64())
                .bind(*booking.travel_date())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("id").map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(booking.with_id(BookingId::new(id)))
}

/// Overwrites all fields of the stored booking that has the same identifier as `booking`.
///
/// Fails with `NotFound` if the booking has no identifier or if it does not exist.
pub(crate) async fn update_booking(ex: &mut Executor, booking: Booking) -> DbResult<Booking> {
    let id = match booking.id() {
        Some(id) => *id,
        None => return Err(DbError::NotFound),
    };
    let customer_id = booking.customer_ref()?;
    let taxi_id = booking.taxi_ref()?;

    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE bookings SET customer_id = $1, taxi_id = $2, travel_date = $3
                WHERE id = $4";
            let done = sqlx::query(query_str)
                .bind(customer_id.as_i64())
                .bind(taxi_id.as_i64())
                .bind(*booking.travel_date())
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE bookings SET customer_id = ?, taxi_id = ?, travel_date = ?
                WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(customer_id.as_i64())
                .bind(taxi_id.as_i64())
                .bind(*booking.travel_date())
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    ensure_one_row(rows_affected)?;
    Ok(booking)
}

/// Deletes the booking identified by `id`.
pub(crate) async fn delete_booking(ex: &mut Executor, id: BookingId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM bookings WHERE id = $1")
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM bookings WHERE id = ?")
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    ensure_one_row(rows_affected)
}
