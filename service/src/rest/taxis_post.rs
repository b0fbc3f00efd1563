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


//! API to add a taxi to the fleet.

use crate::driver::Driver;
use crate::model::Taxi;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{http, Json};
use taxibook_core::rest::RestError;

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Json(taxi): Json<Taxi>,
) -> Result<impl IntoResponse, RestError> {
    let taxi = driver.create_taxi(taxi).await?;
    Ok((http::StatusCode::CREATED, Json(taxi)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use serde_json::json;
    use taxibook_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/api/v1/taxis".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(json!({"registration": "ABC1234", "seat": "05"}))
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<Taxi>()
            .await;
        assert_eq!(Taxi::new("ABC1234", "05").with_id(response.id().unwrap()), response);

        assert_eq!(vec![response], context.list_taxis().await);
    }

    #[tokio::test]
    async fn test_invalid_fields() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"registration": "ABC-123", "seat": "21"}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_field_errors(&[
                ("registration", "7 characters' alpha-numerical"),
                ("seat", "between 2 and 20"),
            ])
            .await;

        assert!(context.list_taxis().await.is_empty());
    }

    #[tokio::test]
    async fn test_registration_conflict() {
        let context = TestContext::setup().await;

        let existing = context.put_taxi("ABC1234").await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"registration": "ABC1234", "seat": "8"}))
            .await
            .expect_status(http::StatusCode::CONFLICT)
            .expect_error("registration is already used")
            .await;

        assert_eq!(vec![existing], context.list_taxis().await);
    }

    #[tokio::test]
    async fn test_missing_field() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route())
            .send_json(json!({"registration": "ABC1234"}))
            .await
            .expect_status(http::StatusCode::UNPROCESSABLE_ENTITY)
            .expect_text("missing field `seat`")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route());
}
