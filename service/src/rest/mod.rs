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


//! Entry point to the REST server.

use crate::driver::Driver;
use axum::Router;

mod booking_delete;
mod booking_get;
mod booking_put;
mod bookings_get;
mod bookings_post;
mod customer_by_email_get;
mod customer_delete;
mod customer_get;
mod customer_put;
mod customers_get;
mod customers_post;
mod taxi_booking_get;
mod taxi_by_registration_get;
mod taxi_delete;
mod taxi_get;
mod taxi_put;
mod taxis_get;
mod taxis_post;
#[cfg(test)]
mod testutils;

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;
    Router::new()
        .route("/api/v1/customers", get(customers_get::handler).post(customers_post::handler))
        .route(
            "/api/v1/customers/:id",
            get(customer_get::handler).put(customer_put::handler).delete(customer_delete::handler),
        )
        .route("/api/v1/customers/email/:email", get(customer_by_email_get::handler))
        .route("/api/v1/taxis", get(taxis_get::handler).post(taxis_post::handler))
        .route(
            "/api/v1/taxis/:id",
            get(taxi_get::handler).put(taxi_put::handler).delete(taxi_delete::handler),
        )
        .route("/api/v1/taxis/:id/bookings/:date", get(taxi_booking_get::handler))
        .route("/api/v1/taxis/registration/:registration", get(taxi_by_registration_get::handler))
        .route("/api/v1/bookings", get(bookings_get::handler).post(bookings_post::handler))
        .route(
            "/api/v1/bookings/:id",
            get(booking_get::handler).put(booking_put::handler).delete(booking_delete::handler),
        )
        .with_state(driver)
}
