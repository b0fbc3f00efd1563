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


//! Operations on taxis.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use log::{debug, info};
use regex::Regex;
use std::sync::LazyLock;
use taxibook_core::db::{DbError, Executor};
use taxibook_core::driver::{DriverError, DriverResult, FieldErrors};

/// Pattern that registrations must match.
static REGISTRATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{7}$").unwrap());

/// Pattern for the number of seats, which admits an optional leading zero for single digits.
static SEAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0?[2-9]|1[0-9]|20)$").unwrap());

/// Message for registrations that do not match `REGISTRATION_RE`.
const REGISTRATION_MESSAGE: &str =
    "Please use a registration name which is a 7 characters' alpha-numerical string";
/// Message for seat counts that do not match `SEAT_RE`.
const SEAT_MESSAGE: &str = "Please use a number of seats between 2 and 20";

/// Message returned when the registration of a taxi collides with another taxi's.
pub(crate) const REGISTRATION_TAKEN: &str =
    "That registration is already used, please use a unique registration";

/// Checks the format of every field of `taxi`.
fn check_taxi_fields(taxi: &Taxi) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if !REGISTRATION_RE.is_match(taxi.registration()) {
        errors.add("registration", REGISTRATION_MESSAGE);
    }
    if !SEAT_RE.is_match(taxi.seat()) {
        errors.add("seat", SEAT_MESSAGE);
    }
    errors
}

/// Validates `taxi` before it is written: all fields must be well-formed and its registration
/// must not belong to any other taxi.
pub(crate) async fn validate_taxi(ex: &mut Executor, taxi: &Taxi) -> DriverResult<()> {
    let errors = check_taxi_fields(taxi);
    if !errors.is_empty() {
        debug!("Rejecting taxi with invalid fields: {}", errors);
        return errors.into_result();
    }

    match db::get_taxi_by_registration(ex, taxi.registration()).await {
        Ok(other) if other.id() != taxi.id() => {
            debug!("Rejecting taxi: registration {} is taken", taxi.registration());
            Err(DriverError::AlreadyExists(REGISTRATION_TAKEN.to_owned()))
        }
        Ok(_) | Err(DbError::NotFound) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Builds the error returned when a taxi does not exist.
fn taxi_not_found(id: TaxiId) -> DriverError {
    DriverError::NotFound(format!("Taxi {} not found", id))
}

impl Driver {
    /// Gets all taxis sorted by registration.
    pub(crate) async fn list_taxis(self) -> DriverResult<Vec<Taxi>> {
        let taxis = db::list_taxis(&mut self.db.ex().await?).await?;
        Ok(taxis)
    }

    /// Gets the taxi identified by `id`.
    pub(crate) async fn get_taxi(self, id: TaxiId) -> DriverResult<Taxi> {
        db::get_taxi(&mut self.db.ex().await?, id).await?.ok_or_else(|| taxi_not_found(id))
    }

    /// Gets the taxi with the given `registration`.
    pub(crate) async fn get_taxi_by_registration(self, registration: &str) -> DriverResult<Taxi> {
        match db::get_taxi_by_registration(&mut self.db.ex().await?, registration).await {
            Ok(taxi) => Ok(taxi),
            Err(DbError::NotFound) => {
                Err(DriverError::NotFound(format!("No taxi with registration {}", registration)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Adds a new `taxi` to the fleet and returns it with its assigned identifier.
    pub(crate) async fn create_taxi(self, taxi: Taxi) -> DriverResult<Taxi> {
        if taxi.id().is_some() {
            return Err(DriverError::InvalidInput("A new taxi cannot have an ID".to_owned()));
        }

        let mut tx = self.db.begin().await?;
        validate_taxi(tx.ex(), &taxi).await?;
        let taxi = db::create_taxi(tx.ex(), taxi).await.map_err(|e| match e {
            DbError::AlreadyExists => DriverError::AlreadyExists(REGISTRATION_TAKEN.to_owned()),
            e => e.into(),
        })?;
        tx.commit().await?;

        info!("Created taxi {:?} with registration {}", taxi.id(), taxi.registration());
        Ok(taxi)
    }

    /// Replaces all fields of the existing `taxi`, which must carry its identifier.
    pub(crate) async fn update_taxi(self, taxi: Taxi) -> DriverResult<Taxi> {
        let Some(id) = *taxi.id() else {
            return Err(DriverError::InvalidInput("Taxi ID is required for updates".to_owned()));
        };

        let mut tx = self.db.begin().await?;
        if db::get_taxi(tx.ex(), id).await?.is_none() {
            return Err(taxi_not_found(id));
        }
        validate_taxi(tx.ex(), &taxi).await?;
        let taxi = db::update_taxi(tx.ex(), taxi).await.map_err(|e| match e {
            DbError::AlreadyExists => DriverError::AlreadyExists(REGISTRATION_TAKEN.to_owned()),
            DbError::NotFound => taxi_not_found(id),
            e => e.into(),
        })?;
        tx.commit().await?;

        info!("Updated taxi {}", id);
        Ok(taxi)
    }

    /// Deletes the taxi identified by `id`, if any, and returns what was deleted.
    ///
    /// Bookings of the taxi are left untouched.
    pub(crate) async fn delete_taxi(self, id: Option<TaxiId>) -> DriverResult<Option<Taxi>> {
        let Some(id) = id else {
            debug!("No taxi ID given; nothing to delete");
            return Ok(None);
        };

        let mut tx = self.db.begin().await?;
        let taxi = db::get_taxi(tx.ex(), id).await?.ok_or_else(|| taxi_not_found(id))?;
        db::delete_taxi(tx.ex(), id).await?;
        tx.commit().await?;

        info!("Deleted taxi {}", id);
        Ok(Some(taxi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;
    use time::macros::date;

    #[test]
    fn test_check_taxi_fields() {
        for (registration, seat) in [("ABC1234", "4"), ("abc1234", "02"), ("0000000", "20")] {
            let errors = check_taxi_fields(&Taxi::new(registration, seat));
            assert!(errors.is_empty(), "{} {}: {}", registration, seat, errors);
        }

        for registration in ["ABC123", "ABC12345", "ABC-123", "ABC 123", "ÁBC1234"] {
            let errors = check_taxi_fields(&Taxi::new(registration, "4"));
            assert_eq!(Some(REGISTRATION_MESSAGE), errors.get("registration"), "{}", registration);
            assert_eq!(None, errors.get("seat"));
        }

        for seat in ["", "0", "1", "01", "21", "100", "4 ", "four", "-4"] {
            let errors = check_taxi_fields(&Taxi::new("ABC1234", seat));
            assert_eq!(Some(SEAT_MESSAGE), errors.get("seat"), "{}", seat);
            assert_eq!(None, errors.get("registration"));
        }
    }

    #[tokio::test]
    async fn test_create_taxi_ok() {
        let context = TestContext::setup().await;

        let taxi = context.driver().create_taxi(Taxi::new("XYZ9876", "7")).await.unwrap();
        let id = taxi.id().unwrap();
        assert_eq!(Taxi::new("XYZ9876", "7").with_id(id), taxi);

        assert_eq!(Some(taxi), db::get_taxi(&mut context.ex().await, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_taxi_with_id() {
        let context = TestContext::setup().await;

        let taxi = Taxi::new("XYZ9876", "7").with_id(TaxiId::new(1));
        match context.driver().create_taxi(taxi).await {
            Err(DriverError::InvalidInput(msg)) => assert!(msg.contains("cannot have an ID")),
            e => panic!("{:?}", e),
        }
    }

    #[tokio::test]
    async fn test_create_taxi_invalid_fields() {
        let context = TestContext::setup().await;

        match context.driver().create_taxi(Taxi::new("XYZ", "1")).await {
            Err(DriverError::Validation(errors)) => {
                assert_eq!(Some(REGISTRATION_MESSAGE), errors.get("registration"));
                assert_eq!(Some(SEAT_MESSAGE), errors.get("seat"));
            }
            e => panic!("{:?}", e),
        }
        assert!(db::list_taxis(&mut context.ex().await).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_taxi_duplicate_registration() {
        let context = TestContext::setup().await;

        let existing = context.put_taxi("XYZ9876").await;

        assert_eq!(
            DriverError::AlreadyExists(REGISTRATION_TAKEN.to_owned()),
            context.driver().create_taxi(Taxi::new("XYZ9876", "9")).await.unwrap_err()
        );
        assert_eq!(vec![existing], db::list_taxis(&mut context.ex().await).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_taxis_sorted() {
        let context = TestContext::setup().await;

        let t1 = context.put_taxi("CCCCCCC").await;
        let t2 = context.put_taxi("AAAAAAA").await;
        let t3 = context.put_taxi("BBBBBBB").await;

        assert_eq!(vec![t2, t3, t1], context.driver().list_taxis().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_taxi() {
        let context = TestContext::setup().await;

        let taxi = context.put_taxi("XYZ9876").await;

        assert_eq!(taxi, context.driver().get_taxi(taxi.id().unwrap()).await.unwrap());
        assert_eq!(
            DriverError::NotFound("Taxi 50 not found".to_owned()),
            context.driver().get_taxi(TaxiId::new(50)).await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_get_taxi_by_registration() {
        let context = TestContext::setup().await;

        let taxi = context.put_taxi("XYZ9876").await;

        assert_eq!(taxi, context.driver().get_taxi_by_registration("XYZ9876").await.unwrap());
        assert_eq!(
            DriverError::NotFound("No taxi with registration XYZ0000".to_owned()),
            context.driver().get_taxi_by_registration("XYZ0000").await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_update_taxi_ok() {
        let context = TestContext::setup().await;

        let existing = context.put_taxi("XYZ9876").await;
        let id = existing.id().unwrap();

        let taxi = Taxi::new("XYZ9876", "12").with_id(id);
        assert_eq!(taxi, context.driver().update_taxi(taxi.clone()).await.unwrap());

        let taxi = Taxi::new("NEW0001", "12").with_id(id);
        assert_eq!(taxi, context.driver().update_taxi(taxi.clone()).await.unwrap());

        assert_eq!(vec![taxi], db::list_taxis(&mut context.ex().await).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_taxi_registration_taken() {
        let context = TestContext::setup().await;

        let t1 = context.put_taxi("AAAAAAA").await;
        let t2 = context.put_taxi("BBBBBBB").await;

        let taxi = Taxi::new("AAAAAAA", "4").with_id(t2.id().unwrap());
        assert_eq!(
            DriverError::AlreadyExists(REGISTRATION_TAKEN.to_owned()),
            context.driver().update_taxi(taxi).await.unwrap_err()
        );
        assert_eq!(vec![t1, t2], db::list_taxis(&mut context.ex().await).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_taxi_not_found() {
        let context = TestContext::setup().await;

        let taxi = Taxi::new("XYZ9876", "4").with_id(TaxiId::new(3));
        assert_eq!(
            DriverError::NotFound("Taxi 3 not found".to_owned()),
            context.driver().update_taxi(taxi).await.unwrap_err()
        );
        assert!(db::list_taxis(&mut context.ex().await).await.unwrap().is_empty());

        match context.driver().update_taxi(Taxi::new("XYZ9876", "4")).await {
            Err(DriverError::InvalidInput(msg)) => assert!(msg.contains("required")),
            e => panic!("{:?}", e),
        }
    }

    #[tokio::test]
    async fn test_delete_taxi() {
        let context = TestContext::setup().await;

        let customer = context.put_customer("Jane", "Doe").await;
        let taxi = context.put_taxi("XYZ9876").await;
        let booking = context.put_booking(&customer, &taxi, date!(2024 - 08 - 15)).await;

        assert_eq!(None, context.driver().delete_taxi(None).await.unwrap());
        assert_eq!(Some(taxi.clone()), context.driver().delete_taxi(*taxi.id()).await.unwrap());
        assert_eq!(
            DriverError::NotFound(format!("Taxi {} not found", taxi.id().unwrap())),
            context.driver().delete_taxi(*taxi.id()).await.unwrap_err()
        );

        assert!(db::list_taxis(&mut context.ex().await).await.unwrap().is_empty());
        assert_eq!(vec![booking], db::list_bookings(&mut context.ex().await).await.unwrap());
    }
}
