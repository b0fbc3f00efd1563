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


//! API to find the booking of a taxi on a given date.

use crate::driver::Driver;
use crate::model::{parse_date, TaxiId};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use taxibook_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path((taxi_id, travel_date)): Path<(TaxiId, String)>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let travel_date = parse_date(&travel_date)?;
    let booking = driver.get_booking_by_taxi_and_date(taxi_id, travel_date).await?;
    Ok(Json(booking))
}
