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


//! API to list all taxis.

use crate::driver::Driver;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use taxibook_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let taxis = driver.list_taxis().await?;
    Ok(Json(taxis))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use taxibook_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/api/v1/taxis".to_owned())
    }

    #[tokio::test]
    async fn test_sorted_by_registration() {
        let context = TestContext::setup().await;

        let t1 = context.put_taxi("ZZZ0001").await;
        let t2 = context.put_taxi("AAA0002").await;
        let t3 = context.put_taxi("MMM0003").await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .send_empty()
            .await
            .expect_json::<Vec<Taxi>>()
            .await;
        assert_eq!(vec![t2, t3, t1], response);
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route());
}
