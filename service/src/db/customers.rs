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


//! Database operations on customers.

use crate::db::ensure_one_row;
use crate::model::{Customer, CustomerId};
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
impl TryFrom<PgRow> for Customer {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(postgres::map_sqlx_error)?;
        let last_name: String = row.try_get("last_name").map_err(postgres::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(postgres::map_sqlx_error)?;
        let phone_number: String =
            row.try_get("phone_number").map_err(postgres::map_sqlx_error)?;
        let birth_date: Date = row.try_get("birth_date").map_err(postgres::map_sqlx_error)?;
        let state: String = row.try_get("state").map_err(postgres::map_sqlx_error)?;

        Ok(Customer::new(first_name, last_name, email, phone_number, birth_date)
            .with_id(CustomerId::new(id))
            .with_state(state))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Customer {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(sqlite::map_sqlx_error)?;
        let last_name: String = row.try_get("last_name").map_err(sqlite::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(sqlite::map_sqlx_error)?;
        let phone_number: String = row.try_get("phone_number").map_err(sqlite::map_sqlx_error)?;
        let birth_date: Date = row.try_get("birth_date").map_err(sqlite::map_sqlx_error)?;
        let state: String = row.try_get("state").map_err(sqlite::map_sqlx_error)?;

        Ok(Customer::new(first_name, last_name, email, phone_number, birth_date)
            .with_id(CustomerId::new(id))
            .with_state(state))
    }
}

/// Gets all customers sorted by last name, then first name, then identifier.
pub(crate) async fn list_customers(ex: &mut Executor) -> DbResult<Vec<Customer>> {
    let query_str = "SELECT * FROM customers ORDER BY last_name, first_name, id";
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Customer::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Customer::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the customer identified by `id`, or `None` if it does not exist.
pub(crate) async fn get_customer(ex: &mut Executor, id: CustomerId) -> DbResult<Option<Customer>> {
    let row = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => sqlx::query("SELECT * FROM customers WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(ex.conn())
            .await
            .map_err(postgres::map_sqlx_error)?
            .map(Customer::try_from),

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlx::query("SELECT * FROM customers WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(ex.conn())
            .await
            .map_err(sqlite::map_sqlx_error)?
            .map(Customer::try_from),

        #[allow(unused)]
        _ => unreachable!(),
    };
    row.transpose()
}

/// Gets the customer that has the given `email` address.
///
/// Fails with `NotFound` if there is no such customer.  If more than one customer matches, which
/// the schema should prevent, the one with the lowest identifier wins.
pub(crate) async fn get_customer_by_email(ex: &mut Executor, email: &str) -> DbResult<Customer> {
    let row = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM customers WHERE email = $1 ORDER BY id LIMIT 1";
            sqlx::query(query_str)
                .bind(email)
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
                .map(Customer::try_from)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM customers WHERE email = ? ORDER BY id LIMIT 1";
            sqlx::query(query_str)
                .bind(email)
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?
                .map(Customer::try_from)
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    row.unwrap_or(Err(DbError::NotFound))
}

/// Stores a new `customer` and returns it with the identifier assigned by the database.
///
/// The `state` of the customer must have been set by the caller.
pub(crate) async fn create_customer(ex: &mut Executor, customer: Customer) -> DbResult<Customer> {
    let id: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO customers
                    (first_name, last_name, email, phone_number, birth_date, state)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id";
            let row = sqlx::query(query_str)
                .bind(customer.first_name().as_str())
                .bind(customer.last_name().as_str())
                .bind(customer.email().as_str())
                .bind(customer.phone_number().as_str())
                .bind(*customer.birth_date())
                .bind(customer.state().as_deref())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("id").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO customers
                    (first_name, last_name, email, phone_number, birth_date, state)
                VALUES (?, ?, ?, ?, ?, ?)
                RETURNING id";
            let row = sqlx::query(query_str)
                .bind(customer.first_name().as_str())
                .bind(customer.last_name().as_str())
                .bind(customer.email().as_str())
                .bind(customer.phone_number().as_str())
                .bind(*customer.birth_date())
                .bind(customer.state().as_deref())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("id").map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(customer.with_id(CustomerId::new(id)))
}

/// Overwrites all fields of the stored customer that has the same identifier as `customer`.
///
/// Fails with `NotFound` if the customer has no identifier or if it does not exist.
pub(crate) async fn update_customer(ex: &mut Executor, customer: Customer) -> DbResult<Customer> {
    let id = match customer.id() {
        Some(id) => *id,
        None => return Err(DbError::NotFound),
    };

    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE customers
                SET first_name = $1, last_name = $2, email = $3, phone_number = $4,
                    birth_date = $5, state = $6
                WHERE id = $7";
            let done = sqlx::query(query_str)
                .bind(customer.first_name().as_str())
                .bind(customer.last_name().as_str())
                .bind(customer.email().as_str())
                .bind(customer.phone_number().as_str())
                .bind(*customer.birth_date())
                .bind(customer.state().as_deref())
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE customers
                SET first_name = ?, last_name = ?, email = ?, phone_number = ?,
                    birth_date = ?, state = ?
                WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(customer.first_name().as_str())
                .bind(customer.last_name().as_str())
                .bind(customer.email().as_str())
                .bind(customer.phone_number().as_str())
                .bind(*customer.birth_date())
                .bind(customer.state().as_deref())
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
    Ok(customer)
}

/// Deletes the customer identified by `id`.  Its bookings are not touched.
pub(crate) async fn delete_customer(ex: &mut Executor, id: CustomerId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM customers WHERE id = $1")
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM customers WHERE id = ?")
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
