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


//! Database abstraction in terms of the operations needed by the server.

#[cfg(feature = "postgres")]
use taxibook_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use taxibook_core::db::sqlite;
use taxibook_core::db::{DbError, DbResult, Executor};

mod bookings;
pub(crate) use bookings::*;
mod customers;
pub(crate) use customers::*;
mod taxis;
pub(crate) use taxis::*;


/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Validates that a statement that modifies a single entity by its identifier touched exactly
/// one row.  Zero rows means the entity did not exist.
fn ensure_one_row(affected: u64) -> DbResult<()> {
    match affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        n => Err(DbError::BackendError(format!("Expected to modify one row but touched {}", n))),
    }
}
