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


//! Test utilities for the REST API.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use crate::rest::app;
use axum::Router;
use std::sync::Arc;
use taxibook_core::clocks::testutils::SettableClock;
use taxibook_core::db::sqlite::testutils::setup;
use taxibook_core::db::Db;
use time::macros::{date, datetime};
use time::Date;

/// The date that the application considers to be today during tests.
pub(crate) const TODAY: Date = date!(2024 - 06 - 01);

pub(crate) struct TestContext {
    db: Arc<dyn Db + Send + Sync>,
    app: Router,
}

impl TestContext {
    pub(crate) async fn setup() -> Self {
        let sqlite = Arc::new(setup().await);
        db::init_schema(&mut sqlite.ex().await.unwrap()).await.unwrap();
        let db: Arc<dyn Db + Send + Sync> = sqlite;

        let clock = Arc::new(SettableClock::new(datetime!(2024-06-01 08:30:00 UTC)));
        let driver = Driver::new(db.clone(), clock);
        let app = app(driver);
        Self { db, app }
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    pub(crate) async fn put_customer(&self, first: &str, last: &str) -> Customer {
        let customer = Customer::new(
            first,
            last,
            format!("{}.{}@example.com", first, last).to_lowercase(),
            "(201) 555-0123",
            date!(1985 - 06 - 15),
        )
        .with_unknown_state();
        db::create_customer(&mut self.db.ex().await.unwrap(), customer).await.unwrap()
    }

    pub(crate) async fn get_customer(&self, id: CustomerId) -> Option<Customer> {
        db::get_customer(&mut self.db.ex().await.unwrap(), id).await.unwrap()
    }

    pub(crate) async fn list_customers(&self) -> Vec<Customer> {
        db::list_customers(&mut self.db.ex().await.unwrap()).await.unwrap()
    }

    pub(crate) async fn put_taxi(&self, registration: &str) -> Taxi {
        db::create_taxi(&mut self.db.ex().await.unwrap(), Taxi::new(registration, "4"))
            .await
            .unwrap()
    }

    pub(crate) async fn get_taxi(&self, id: TaxiId) -> Option<Taxi> {
        db::get_taxi(&mut self.db.ex().await.unwrap(), id).await.unwrap()
    }

    pub(crate) async fn list_taxis(&self) -> Vec<Taxi> {
        db::list_taxis(&mut self.db.ex().await.unwrap()).await.unwrap()
    }

    pub(crate) async fn put_booking(
        &self,
        customer: &Customer,
        taxi: &Taxi,
        travel_date: Date,
    ) -> Booking {
        let booking = Booking::for_refs(customer.id().unwrap(), taxi.id().unwrap(), travel_date);
        db::create_booking(&mut self.db.ex().await.unwrap(), booking).await.unwrap()
    }

    pub(crate) async fn get_booking(&self, id: BookingId) -> Option<Booking> {
        db::get_booking(&mut self.db.ex().await.unwrap(), id).await.unwrap()
    }

    pub(crate) async fn list_bookings(&self) -> Vec<Booking> {
        db::list_bookings(&mut self.db.ex().await.unwrap()).await.unwrap()
    }
}
