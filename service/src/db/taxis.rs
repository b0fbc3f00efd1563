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


//! Database operations on taxis.

use crate::db::ensure_one_row;
use crate::model::{Taxi, TaxiId};
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

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Taxi {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let registration: String = row.try_get("registration").map_err(postgres::map_sqlx_error)?;
        let seat: String = row.try_get("seat").map_err(postgres::map_sqlx_error)?;
        Ok(Taxi::new(registration, seat).with_id(TaxiId::new(id)))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Taxi {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let registration: String = row.try_get("registration").map_err(sqlite::map_sqlx_error)?;
        let seat: String = row.try_get("seat").map_err(sqlite::map_sqlx_error)?;
        Ok(Taxi::new(registration, seat).with_id(TaxiId::new(id)))
    }
}

/// Gets all taxis sorted by registration.
pub(crate) async fn list_taxis(ex: &mut Executor) -> DbResult<Vec<Taxi>> {
    let query_str = "SELECT * FROM taxis ORDER BY registration, id";
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Taxi::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Taxi::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the taxi identified by `id`, or `None` if it does not exist.
pub(crate) async fn get_taxi(ex: &mut Executor, id: TaxiId) -> DbResult<Option<Taxi>> {
    let row = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => sqlx::query("SELECT * FROM taxis WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(ex.conn())
            .await
            .map_err(postgres::map_sqlx_error)?
            .map(Taxi::try_from),

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlx::query("SELECT * FROM taxis WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(ex.conn())
            .await
            .map_err(sqlite::map_sqlx_error)?
            .map(Taxi::try_from),

        #[allow(unused)]
        _ => unreachable!(),
    };
    row.transpose()
}

/// Gets the taxi that has the given `registration`.
///
/// Fails with `NotFound` if there is no such taxi.
pub(crate) async fn get_taxi_by_registration(
    ex: &mut Executor,
    registration: &str,
) -> DbResult<Taxi> {
    let row = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM taxis WHERE registration = $1 ORDER BY id LIMIT 1";
            sqlx::query(query_str)
                .bind(registration)
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
                .map(Taxi::try_from)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM taxis WHERE registration = ? ORDER BY id LIMIT 1";
            sqlx::query(query_str)
                .bind(registration)
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?
                .map(Taxi::try_from)
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    row.unwrap_or(Err(DbError::NotFound))
}

/// Stores a new `taxi` and returns it with the identifier assigned by the database.
pub(crate) async fn create_taxi(ex: &mut Executor, taxi: Taxi) -> DbResult<Taxi> {
    let id: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "INSERT INTO taxis (registration, seat) VALUES ($1, $2) RETURNING id";
            let row = sqlx::query(query_str)
                .bind(taxi.registration().as_str())
                .bind(taxi.seat().as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("id").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO taxis (registration, seat) VALUES (?, ?) RETURNING id";
            let row = sqlx::query(query_str)
                .bind(taxi.registration().as_str())
                .bind(taxi.seat().as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("id").map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(taxi.with_id(TaxiId::new(id)))
}

/// Overwrites all fields of the stored taxi that has the same identifier as `taxi`.
///
/// Fails with `NotFound` if the taxi has no identifier or if it does not exist.
pub(crate) async fn update_taxi(ex: &mut Executor, taxi: Taxi) -> DbResult<Taxi> {
    let id = match taxi.id() {
        Some(id) => *id,
        None => return Err(DbError::NotFound),
    };

    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE taxis SET registration = $1, seat = $2 WHERE id = $3";
            let done = sqlx::query(query_str)
                .bind(taxi.registration().as_str())
                .bind(taxi.seat().as_str())
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE taxis SET registration = ?, seat = ? WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(taxi.registration().as_str())
                .bind(taxi.seat().as_str())
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
    Ok(taxi)
}

/// Deletes the taxi identified by `id`.  Its bookings are not touched.
pub(crate) async fn delete_taxi(ex: &mut Executor, id: TaxiId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM taxis WHERE id = $1")
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM taxis WHERE id = ?")
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
