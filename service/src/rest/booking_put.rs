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


//! API to change an existing booking.

use crate::driver::Driver;
use crate::model::{Booking, BookingId};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use taxibook_core::rest::RestError;

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<BookingId>,
    Json(booking): Json<Booking>,
) -> Result<impl IntoResponse, RestError> {
    if booking.id().is_some_and(|body_id| body_id != id) {
        return Err(RestError::Conflict("Booking ID cannot be modified".to_owned()));
    }

    let booking = driver.update_booking(booking.with_id(id)).await?;
    Ok(Json(booking))
}
