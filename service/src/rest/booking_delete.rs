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


//! API to cancel a booking.

use crate::driver::Driver;
use crate::model::BookingId;
use axum::extract::{Path, State};
use axum::http;
use axum::response::IntoResponse;
use taxibook_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<BookingId>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    driver.delete_booking(Some(id)).await?;
    Ok(http::StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use taxibook_core::rest::testutils::*;
    use time::macros::date;

    fn route(id: impl std::fmt::Display) -> (http::Method, String) {
        (http::Method::DELETE, format!("/api/v1/bookings/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let customer = context.put_customer("Jane", "Doe").await;
        let taxi = context.put_taxi("ABC1234").await;
        let booking = context.put_booking(&customer, &taxi, date!(2024 - 06 - 20)).await;
        let kept = context.put_booking(&customer, &taxi, date!(2024 - 06 - 21)).await;

        OneShotBuilder::new(context.app(), route(booking.id().unwrap()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        assert_eq!(vec![kept], context.list_bookings().await);
        assert_eq!(vec![customer], context.list_customers().await);
        assert_eq!(vec![taxi], context.list_taxis().await);
    }

    #[tokio::test]
    async fn test_missing() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route(3))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Booking 3 not found")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route(1));
}
