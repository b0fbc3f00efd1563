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


//! API to get a single taxi.

use crate::driver::Driver;
use crate::model::TaxiId;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use taxibook_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<TaxiId>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let taxi = driver.get_taxi(id).await?;
    Ok(Json(taxi))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use taxibook_core::rest::testutils::*;

    fn route(id: impl std::fmt::Display) -> (http::Method, String) {
        (http::Method::GET, format!("/api/v1/taxis/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let taxi = context.put_taxi("ABC1234").await;
        context.put_taxi("DEF5678").await;

        let response = OneShotBuilder::new(context.into_app(), route(taxi.id().unwrap()))
            .send_empty()
            .await
            .expect_json::<Taxi>()
            .await;
        assert_eq!(taxi, response);
    }

    #[tokio::test]
    async fn test_missing() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route(31))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Taxi 31 not found")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route(1));
}
