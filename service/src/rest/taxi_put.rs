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


//! API to replace the details of a taxi.

use crate::driver::Driver;
use crate::model::{Taxi, TaxiId};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use taxibook_core::rest::RestError;

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<TaxiId>,
    Json(taxi): Json<Taxi>,
) -> Result<impl IntoResponse, RestError> {
    if taxi.id().is_some_and(|body_id| body_id != id) {
        return Err(RestError::Conflict("Taxi ID cannot be modified".to_owned()));
    }

    let taxi = driver.update_taxi(taxi.with_id(id)).await?;
    Ok(Json(taxi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;
    use serde_json::json;
    use taxibook_core::rest::testutils::*;

    fn route(id: impl std::fmt::Display) -> (http::Method, String) {
        (http::Method::PUT, format!("/api/v1/taxis/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let taxi = context.put_taxi("ABC1234").await;
        let id = taxi.id().unwrap();

        let response = OneShotBuilder::new(context.app(), route(id))
            .send_json(json!({"id": id, "registration": "XYZ9876", "seat": "16"}))
            .await
            .expect_json::<Taxi>()
            .await;
        assert_eq!(Taxi::new("XYZ9876", "16").with_id(id), response);

        assert_eq!(Some(response), context.get_taxi(id).await);
    }

    #[tokio::test]
    async fn test_id_mismatch() {
        let context = TestContext::setup().await;

        let taxi = context.put_taxi("ABC1234").await;
        let id = taxi.id().unwrap();

        OneShotBuilder::new(context.app(), route(id))
            .send_json(json!({"id": id.as_i64() + 1, "registration": "XYZ9876", "seat": "16"}))
            .await
            .expect_status(http::StatusCode::CONFLICT)
            .expect_error("Taxi ID cannot be modified")
            .await;

        assert_eq!(Some(taxi), context.get_taxi(id).await);
    }

    #[tokio::test]
    async fn test_registration_conflict() {
        let context = TestContext::setup().await;

        let t1 = context.put_taxi("ABC1234").await;
        let t2 = context.put_taxi("XYZ9876").await;

        OneShotBuilder::new(context.app(), route(t2.id().unwrap()))
            .send_json(json!({"registration": "ABC1234", "seat": "4"}))
            .await
            .expect_status(http::StatusCode::CONFLICT)
            .expect_error("registration is already used")
            .await;

        assert_eq!(vec![t1, t2], context.list_taxis().await);
    }

    #[tokio::test]
    async fn test_missing() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route(8))
            .send_json(json!({"registration": "ABC1234", "seat": "4"}))
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Taxi 8 not found")
            .await;

        assert!(context.list_taxis().await.is_empty());
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route(1));
}
