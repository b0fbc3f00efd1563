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


//! Entry point to the taxi booking service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use log::info;
use std::net::Ipv4Addr;
use std::sync::Arc;
use taxibook::db::init_schema;
use taxibook::serve;
use taxibook_core::db::Db;
use taxibook_core::env::get_var;

/// Default port to listen on when `PORT` is not set.
const DEFAULT_PORT: u16 = 3000;

/// Opens the PostgreSQL database configured by the `PGSQL_PROD_*` variables.
#[cfg(feature = "postgres")]
fn connect_postgres() -> Result<Arc<dyn Db + Send + Sync>, String> {
    use taxibook_core::db::postgres::{PostgresDb, PostgresOptions};

    let opts = PostgresOptions::from_env("PGSQL_PROD")?;
    info!("Using PostgreSQL database {} at {}:{}", opts.database, opts.host, opts.port);
    Ok(Arc::new(PostgresDb::connect(opts)))
}

/// Fails because PostgreSQL support has not been compiled in.
#[cfg(not(feature = "postgres"))]
fn connect_postgres() -> Result<Arc<dyn Db + Send + Sync>, String> {
    Err("PostgreSQL support not available; set SQLITE_PATH instead".to_owned())
}

/// Opens the database selected by the environment.
///
/// `SQLITE_PATH` selects an SQLite database stored in the given file.  Otherwise, the PostgreSQL
/// connection details are read from the `PGSQL_PROD_*` variables.
async fn connect_db() -> Result<Arc<dyn Db + Send + Sync>, String> {
    #[cfg(feature = "sqlite")]
    if let Some(path) = get_var::<String>("SQLITE_PATH")? {
        info!("Using SQLite database at {}", path);
        let db = taxibook_core::db::sqlite::connect(&path).await.map_err(|e| e.to_string())?;
        return Ok(Arc::new(db));
    }

    connect_postgres()
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let port = get_var::<u16>("PORT").unwrap().unwrap_or(DEFAULT_PORT);
    let addr = (Ipv4Addr::LOCALHOST, port);

    let db = connect_db().await.unwrap();
    init_schema(&mut db.ex().await.unwrap()).await.unwrap();

    info!("Listening on {}:{}", addr.0, addr.1);
    serve(addr, db).await.unwrap()
}
