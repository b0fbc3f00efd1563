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


//! API to list all customers.

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
    let customers = driver.list_customers().await?;
    Ok(Json(customers))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use taxibook_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/api/v1/customers".to_owned())
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .send_empty()
            .await
            .expect_json::<Vec<Customer>>()
            .await;
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_sorted_by_name() {
        let context = TestContext::setup().await;

        let c1 = context.put_customer("Bob", "Young").await;
        let c2 = context.put_customer("Carol", "Adams").await;
        let c3 = context.put_customer("Alice", "Young").await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .send_empty()
            .await
            .expect_json::<Vec<Customer>>()
            .await;
        assert_eq!(vec![c2, c3, c1], response);
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route());
}
