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


//! Operations on bookings.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use log::{debug, info};
use taxibook_core::db::{DbError, Executor};
use taxibook_core::driver::{DriverError, DriverResult, FieldErrors};
use time::Date;

/// Message for customer references that are not identifiers.
const CUSTOMER_ID_MESSAGE: &str = "Please use a customer ID";
/// Message for taxi references that are not identifiers.
const TAXI_ID_MESSAGE: &str = "Please use a taxi ID";
/// Message for travel dates that are not in the future.
const TRAVEL_DATE_MESSAGE: &str =
    "Travel dates can not be in the past. Please choose one from the future";

/// Checks the format of every field of `booking`, where `today` is the current date.
///
/// Returns the parsed references to the customer and the taxi when all fields are valid.
fn check_booking_fields(
    booking: &Booking,
    today: Date,
) -> Result<(CustomerId, TaxiId), FieldErrors> {
    let mut errors = FieldErrors::default();

    let customer_id = match booking.customer_ref() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add("customerId", CUSTOMER_ID_MESSAGE);
            None
        }
    };
    let taxi_id = match booking.taxi_ref() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add("taxiId", TAXI_ID_MESSAGE);
            None
        }
    };
    if *booking.travel_date() <= today {
        errors.add("travelDate", TRAVEL_DATE_MESSAGE);
    }

    match (customer_id, taxi_id) {
        (Some(customer_id), Some(taxi_id)) if errors.is_empty() => Ok((customer_id, taxi_id)),
        _ => Err(errors),
    }
}

/// Validates `booking` before it is written.
///
/// All fields must be well-formed and both the customer and the taxi must exist.  Returns a copy of
/// the booking with its references in canonical form.
pub(crate) async fn validate_booking(
    ex: &mut Executor,
    booking: &Booking,
    today: Date,
) -> DriverResult<Booking> {
    let (customer_id, taxi_id) = match check_booking_fields(booking, today) {
        Ok(refs) => refs,
        Err(errors) => {
            debug!("Rejecting booking with invalid fields: {}", errors);
            return Err(DriverError::Validation(errors));
        }
    };

    let mut errors = FieldErrors::default();
    if db::get_customer(ex, customer_id).await?.is_none() {
        errors.add("customerId", format!("No customer with ID {}", customer_id));
    }
    if db::get_taxi(ex, taxi_id).await?.is_none() {
        errors.add("taxiId", format!("No taxi with ID {}", taxi_id));
    }
    if !errors.is_empty() {
        debug!("Rejecting booking with dangling references: {}", errors);
        return Err(DriverError::Validation(errors));
    }

    let canonical = Booking::for_refs(customer_id, taxi_id, *booking.travel_date());
    Ok(match booking.id() {
        Some(id) => canonical.with_id(*id),
        None => canonical,
    })
}

/// Builds the error returned when a booking does not exist.
fn booking_not_found(id: BookingId) -> DriverError {
    DriverError::NotFound(format!("Booking {} not found", id))
}

impl Driver {
    /// Gets all bookings in creation order.
    pub(crate) async fn list_bookings(self) -> DriverResult<Vec<Booking>> {
        let bookings = db::list_bookings(&mut self.db.ex().await?).await?;
        Ok(bookings)
    }

    /// Gets the booking identified by `id`.
    pub(crate) async fn get_booking(self, id: BookingId) -> DriverResult<Booking> {
        db::get_booking(&mut self.db.ex().await?, id).await?.ok_or_else(|| booking_not_found(id))
    }

    /// Gets the booking of `taxi_id` on `travel_date`.
    pub(crate) async fn get_booking_by_taxi_and_date(
        self,
        taxi_id: TaxiId,
        travel_date: Date,
    ) -> DriverResult<Booking> {
        let mut ex = self.db.ex().await?;
        match db::get_booking_by_taxi_and_date(&mut ex, taxi_id, travel_date).await {
            Ok(booking) => Ok(booking),
            Err(DbError::NotFound) => Err(DriverError::NotFound(format!(
                "Taxi {} has no booking on {}",
                taxi_id, travel_date
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Books a taxi for a customer and returns the booking with its assigned identifier.
    pub(crate) async fn create_booking(self, booking: Booking) -> DriverResult<Booking> {
        if booking.id().is_some() {
            return Err(DriverError::InvalidInput("A new booking cannot have an ID".to_owned()));
        }

        let mut tx = self.db.begin().await?;
        let booking = validate_booking(tx.ex(), &booking, self.clock.today()).await?;
        let booking = db::create_booking(tx.ex(), booking).await?;
        tx.commit().await?;

        info!(
            "Created booking {:?} of taxi {} for customer {} on {}",
            booking.id(),
            booking.taxi_id(),
            booking.customer_id(),
            booking.travel_date()
        );
        Ok(booking)
    }

    /// Replaces all fields of the existing `booking`, which must carry its identifier.
    pub(crate) async fn update_booking(self, booking: Booking) -> DriverResult<Booking> {
        let Some(id) = *booking.id() else {
            return Err(DriverError::InvalidInput("Booking ID is required for updates".to_owned()));
        };

        let mut tx = self.db.begin().await?;
        if db::get_booking(tx.ex(), id).await?.is_none() {
            return Err(booking_not_found(id));
        }
        let booking = validate_booking(tx.ex(), &booking, self.clock.today()).await?;
        let booking = db::update_booking(tx.ex(), booking).await?;
        tx.commit().await?;

        info!("Updated booking {}", id);
        Ok(booking)
    }

    /// Cancels the booking identified by `id`, if any, and returns what was deleted.
    pub(crate) async fn delete_booking(
        self,
        id: Option<BookingId>,
    ) -> DriverResult<Option<Booking>> {
        let Some(id) = id else {
            debug!("No booking ID given; nothing to delete");
            return Ok(None);
        };

        let mut tx = self.db.begin().await?;
        let booking = db::get_booking(tx.ex(), id).await?.ok_or_else(|| booking_not_found(id))?;
        db::delete_booking(tx.ex(), id).await?;
        tx.commit().await?;

        info!("Deleted booking {}", id);
        Ok(Some(booking))
    }
}
