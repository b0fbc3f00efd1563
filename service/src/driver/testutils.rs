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


//! Test utilities for the business layer.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use std::sync::Arc;
use taxibook_core::clocks::testutils::SettableClock;
use taxibook_core::clocks::Clock;
use taxibook_core::db::sqlite::testutils::setup;
use taxibook_core::db::{Db, Executor};
use time::macros::{date, datetime};
use time::Date;

/// State of a running test.
pub(crate) struct TestContext {
    db: Arc<dyn Db + Send + Sync>,
    clock: Arc<SettableClock>,
    driver: Driver,
}

impl TestContext {
    /// Initializes a driver backed by an empty in-memory database and a clock frozen at noon UTC
    /// of 2024-06-01.
    pub(crate) async fn setup() -> Self {
        let sqlite = Arc::new(setup().await);
        db::init_schema(&mut sqlite.ex().await.unwrap()).await.unwrap();
        let db: Arc<dyn Db + Send + Sync> = sqlite;

        let clock = Arc::new(SettableClock::new(datetime!(2024-06-01 12:00:00 UTC)));

        let driver = Driver::new(db.clone(), clock.clone());
        Self { db, clock, driver }
    }

    /// Obtains a database executor.  Must be released before calling into the driver.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Gets a copy of the driver to run an operation.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Gets the clock shared with the driver.
    pub(crate) fn clock(&self) -> &SettableClock {
        &self.clock
    }

    /// Returns the date that the driver considers to be today.
    pub(crate) fn today(&self) -> Date {
        self.clock.today()
    }

    /// Stores a valid customer named `first` `last` directly in the database.
    pub(crate) async fn put_customer(&self, first: &str, last: &str) -> Customer {
        let customer = Customer::new(
            first,
            last,
            format!("{}.{}@example.com", first, last).to_lowercase(),
            "(212) 555-1234",
            date!(1985 - 06 - 15),
        )
        .with_unknown_state();
        db::create_customer(&mut self.ex().await, customer).await.unwrap()
    }

    /// Stores a valid taxi with `registration` directly in the database.
    pub(crate) async fn put_taxi(&self, registration: &str) -> Taxi {
        db::create_taxi(&mut self.ex().await, Taxi::new(registration, "4")).await.unwrap()
    }

    /// Stores a booking of `taxi` by `customer` on `travel_date` directly in the database.
    pub(crate) async fn put_booking(
        &self,
        customer: &Customer,
        taxi: &Taxi,
        travel_date: Date,
    ) -> Booking {
        let booking = Booking::for_refs(customer.id().unwrap(), taxi.id().unwrap(), travel_date);
        db::create_booking(&mut self.ex().await, booking).await.unwrap()
    }
}
