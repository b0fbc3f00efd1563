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


//! Operations on customers.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use log::{debug, info};
use regex::Regex;
use std::sync::LazyLock;
use taxibook_core::db::{DbError, Executor};
use taxibook_core::driver::{DriverError, DriverResult, FieldErrors};
use taxibook_core::model::EmailAddress;
use time::Date;

/// Pattern that first and last names must match.
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z'-]{1,25}$").unwrap());

/// Pattern that phone numbers must match.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\([2-9][0-8][0-9]\)\s?[0-9]{3}-[0-9]{4}$").unwrap());

/// Message for names that do not match `NAME_RE`.
const NAME_MESSAGE: &str = "Please use a name without numbers or specials";
/// Message for malformed email addresses.
const EMAIL_MESSAGE: &str = "The email address must be in the format of name@domain.com";
/// Message for phone numbers that do not match `PHONE_RE`.
const PHONE_MESSAGE: &str = "Please use a phone number in the format (201) 555-0123";
/// Message for birth dates that are not in the past.
const BIRTH_DATE_MESSAGE: &str =
    "Birthdates can not be in the future. Please choose one from the past";

/// Message returned when the email of a customer collides with another customer's.
pub(crate) const EMAIL_TAKEN: &str = "That email is already used, please use a unique email";

/// Checks the format of every field of `customer`, where `today` is the current date.
fn check_customer_fields(customer: &Customer, today: Date) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if !NAME_RE.is_match(customer.first_name()) {
        errors.add("firstName", NAME_MESSAGE);
    }
    if !NAME_RE.is_match(customer.last_name()) {
        errors.add("lastName", NAME_MESSAGE);
    }
    if EmailAddress::new(customer.email().as_str()).is_err() {
        errors.add("email", EMAIL_MESSAGE);
    }
    if !PHONE_RE.is_match(customer.phone_number()) {
        errors.add("phoneNumber", PHONE_MESSAGE);
    }
    if *customer.birth_date() >= today {
        errors.add("birthDate", BIRTH_DATE_MESSAGE);
    }
    errors
}

/// Validates `customer` before it is written: all fields must be well-formed and its email must not
/// belong to any other customer.
pub(crate) async fn validate_customer(
    ex: &mut Executor,
    customer: &Customer,
    today: Date,
) -> DriverResult<()> {
    let errors = check_customer_fields(customer, today);
    if !errors.is_empty() {
        debug!("Rejecting customer with invalid fields: {}", errors);
        return errors.into_result();
    }

    match db::get_customer_by_email(ex, customer.email()).await {
        Ok(other) if other.id() != customer.id() => {
            debug!("Rejecting customer: email {} belongs to {:?}", customer.email(), other.id());
            Err(DriverError::AlreadyExists(EMAIL_TAKEN.to_owned()))
        }
        Ok(_) | Err(DbError::NotFound) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Builds the error returned when a customer does not exist.
fn customer_not_found(id: CustomerId) -> DriverError {
    DriverError::NotFound(format!("Customer {} not found", id))
}

impl Driver {
    /// Gets all customers sorted by name.
    pub(crate) async fn list_customers(self) -> DriverResult<Vec<Customer>> {
        let customers = db::list_customers(&mut self.db.ex().await?).await?;
        Ok(customers)
    }

    /// Gets the customer identified by `id`.
    pub(crate) async fn get_customer(self, id: CustomerId) -> DriverResult<Customer> {
        match db::get_customer(&mut self.db.ex().await?, id).await? {
            Some(customer) => Ok(customer),
            None => Err(customer_not_found(id)),
        }
    }

    /// Gets the customer that owns `email`.
    pub(crate) async fn get_customer_by_email(self, email: &str) -> DriverResult<Customer> {
        match db::get_customer_by_email(&mut self.db.ex().await?, email).await {
            Ok(customer) => Ok(customer),
            Err(DbError::NotFound) => {
                Err(DriverError::NotFound(format!("No customer with email {}", email)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Registers a new `customer` and returns it with its assigned identifier.
    pub(crate) async fn create_customer(self, customer: Customer) -> DriverResult<Customer> {
        if customer.id().is_some() {
            return Err(DriverError::InvalidInput("A new customer cannot have an ID".to_owned()));
        }

        let mut tx = self.db.begin().await?;
        validate_customer(tx.ex(), &customer, self.clock.today()).await?;
        let customer = match db::create_customer(tx.ex(), customer.with_unknown_state()).await {
            Ok(customer) => customer,
            Err(DbError::AlreadyExists) => {
                return Err(DriverError::AlreadyExists(EMAIL_TAKEN.to_owned()))
            }
            Err(e) => return Err(e.into()),
        };
        tx.commit().await?;

        info!("Created customer {:?} with email {}", customer.id(), customer.email());
        Ok(customer)
    }

    /// Replaces all fields of the existing `customer`, which must carry its identifier.
    pub(crate) async fn update_customer(self, customer: Customer) -> DriverResult<Customer> {
        let id = match customer.id() {
            Some(id) => *id,
            None => {
                return Err(DriverError::InvalidInput(
                    "Customer ID is required for updates".to_owned(),
                ))
            }
        };

        let mut tx = self.db.begin().await?;
        if db::get_customer(tx.ex(), id).await?.is_none() {
            return Err(customer_not_found(id));
        }
        validate_customer(tx.ex(), &customer, self.clock.today()).await?;
        let customer = match db::update_customer(tx.ex(), customer.with_unknown_state()).await {
            Ok(customer) => customer,
            Err(DbError::AlreadyExists) => {
                return Err(DriverError::AlreadyExists(EMAIL_TAKEN.to_owned()))
            }
            Err(DbError::NotFound) => return Err(customer_not_found(id)),
            Err(e) => return Err(e.into()),
        };
        tx.commit().await?;

        info!("Updated customer {}", id);
        Ok(customer)
    }

    /// Deletes the customer identified by `id`, if any, and returns what was deleted.
    ///
    /// Bookings made by the customer are left untouched.
    pub(crate) async fn delete_customer(
        self,
        id: Option<CustomerId>,
    ) -> DriverResult<Option<Customer>> {
        let Some(id) = id else {
            debug!("No customer ID given; nothing to delete");
            return Ok(None);
        };

        let mut tx = self.db.begin().await?;
        let customer = match db::get_customer(tx.ex(), id).await? {
            Some(customer) => customer,
            None => return Err(customer_not_found(id)),
        };
        db::delete_customer(tx.ex(), id).await?;
        tx.commit().await?;

        info!("Deleted customer {}", id);
        Ok(Some(customer))
    }
}
