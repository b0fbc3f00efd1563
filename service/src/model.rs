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


//! High-level data types.

use derive_getters::Getters;
use derive_more::{Constructor, Display, From};
use serde::{Deserialize, Serialize};
use taxibook_core::model::{ModelError, ModelResult};
use time::Date;

/// Value assigned to the `state` of a customer when none is provided.
pub(crate) const UNKNOWN_STATE: &str = "unknown";

/// Serialization of calendar dates as `YYYY-MM-DD` strings.
mod iso_date {
    use serde::{de, ser, Deserialize, Deserializer, Serializer};
    use time::macros::format_description;
    use time::Date;

    /// Serializes `date` in `YYYY-MM-DD` form.
    pub(super) fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text =
            date.format(format_description!("[year]-[month]-[day]")).map_err(ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// Deserializes a date in `YYYY-MM-DD` form.
    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse_date(&text).map_err(de::Error::custom)
    }
}

/// Parses a `YYYY-MM-DD` string into a date.
pub(crate) fn parse_date(s: &str) -> ModelResult<Date> {
    Date::parse(s, time::macros::format_description!("[year]-[month]-[day]"))
        .map_err(|e| ModelError(format!("Invalid date '{}': {}", s, e)))
}

/// Generates a newtype for the identifier of an entity stored in the database.
macro_rules! entity_id [
    ( $name:ident, $what:literal ) => {
        #[doc = concat!("Identifier of ", $what, " assigned by the database.")]
        #[derive(
            Clone, Constructor, Copy, Debug, Deserialize, Display, Eq, From, Hash, Ord, PartialEq,
            PartialOrd, Serialize,
        )]
        #[serde(transparent)]
        pub(crate) struct $name(i64);

        impl $name {
            /// Returns the raw value of the identifier for storage purposes.
            pub(crate) fn as_i64(self) -> i64 {
                self.0
            }
        }
    }
];

entity_id!(CustomerId, "a customer");
entity_id!(TaxiId, "a taxi");
entity_id!(BookingId, "a booking");

/// Parses a string of decimal digits as the raw value of an identifier.
fn parse_id(field: &str, s: &str) -> ModelResult<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ModelError(format!("Invalid {} '{}': must only contain digits", field, s)));
    }
    s.parse::<i64>().map_err(|e| ModelError(format!("Invalid {} '{}': {}", field, s, e)))
}

/// A registered customer of the taxi company.
#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Customer {
    /// Identifier of the customer, if already stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<CustomerId>,

    /// Given name.
    first_name: String,

    /// Family name.
    last_name: String,

    /// Contact email address.  Unique across customers.
    email: String,

    /// Contact phone number, like `(201) 555-0123`.
    phone_number: String,

    /// Date of birth.
    #[serde(with = "iso_date")]
    birth_date: Date,

    /// Region the customer lives in.  Derived by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<String>,
}

impl Customer {
    /// Creates a new customer that has not been stored yet.
    pub(crate) fn new<S1, S2, S3, S4>(
        first_name: S1,
        last_name: S2,
        email: S3,
        phone_number: S4,
        birth_date: Date,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
        S4: Into<String>,
    {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
            birth_date,
            state: None,
        }
    }

    /// Modifies the customer to carry the `id` assigned by the database.
    pub(crate) fn with_id(mut self, id: CustomerId) -> Self {
        self.id = Some(id);
        self
    }

    /// Modifies the customer to have a specific `state`.
    pub(crate) fn with_state<S: Into<String>>(mut self, state: S) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Modifies the customer to have a specific `email`.
    #[cfg(test)]
    pub(crate) fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = email.into();
        self
    }

    /// Modifies the customer to have a specific `birth_date`.
    #[cfg(test)]
    pub(crate) fn with_birth_date(mut self, birth_date: Date) -> Self {
        self.birth_date = birth_date;
        self
    }

    /// Replaces the `state` with the placeholder used while region lookups are unavailable.
    pub(crate) fn with_unknown_state(self) -> Self {
        self.with_state(UNKNOWN_STATE)
    }
}

/// A taxi in the company's fleet.
#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Taxi {
    /// Identifier of the taxi, if already stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<TaxiId>,

    /// Registration plate.  Unique across taxis.
    registration: String,

    /// Number of seats, as a decimal string.
    seat: String,
}

impl Taxi {
    /// Creates a new taxi that has not been stored yet.
    pub(crate) fn new<S1: Into<String>, S2: Into<String>>(registration: S1, seat: S2) -> Self {
        Self { id: None, registration: registration.into(), seat: seat.into() }
    }

    /// Modifies the taxi to carry the `id` assigned by the database.
    pub(crate) fn with_id(mut self, id: TaxiId) -> Self {
        self.id = Some(id);
        self
    }
}

/// A reservation of a taxi by a customer for a given day.
#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Booking {
    /// Identifier of the booking, if already stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<BookingId>,

    /// Identifier of the customer that made the booking, as a decimal string.
    customer_id: String,

    /// Identifier of the booked taxi, as a decimal string.
    taxi_id: String,

    /// Day for which the taxi is booked.
    #[serde(with = "iso_date")]
    travel_date: Date,
}

impl Booking {
    /// Creates a new booking that has not been stored yet.
    pub(crate) fn new<S1, S2>(customer_id: S1, taxi_id: S2, travel_date: Date) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            id: None,
            customer_id: customer_id.into(),
            taxi_id: taxi_id.into(),
            travel_date,
        }
    }

    /// Creates a new booking from typed references to its customer and taxi.
    pub(crate) fn for_refs(customer_id: CustomerId, taxi_id: TaxiId, travel_date: Date) -> Self {
        Self::new(customer_id.to_string(), taxi_id.to_string(), travel_date)
    }

    /// Modifies the booking to carry the `id` assigned by the database.
    pub(crate) fn with_id(mut self, id: BookingId) -> Self {
        self.id = Some(id);
        self
    }

    /// Parses the textual customer reference into an identifier.
    pub(crate) fn customer_ref(&self) -> ModelResult<CustomerId> {
        parse_id("customer ID", &self.customer_id).map(CustomerId::new)
    }

    /// Parses the textual taxi reference into an identifier.
    pub(crate) fn taxi_ref(&self) -> ModelResult<TaxiId> {
        parse_id("taxi ID", &self.taxi_id).map(TaxiId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_customer_json_camel_case() {
        let customer = Customer::new(
            "Jane",
            "Doe",
            "jane@example.com",
            "(212) 555-1234",
            date!(1980 - 02 - 29),
        )
        .with_id(CustomerId::new(4))
        .with_state("NY");
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(
            serde_json::json!({
                "id": 4,
                "firstName": "Jane",
                "lastName": "Doe",
                "email": "jane@example.com",
                "phoneNumber": "(212) 555-1234",
                "birthDate": "1980-02-29",
                "state": "NY",
            }),
            json
        );
        assert_eq!(customer, serde_json::from_value::<Customer>(json).unwrap());
    }

    #[test]
    fn test_customer_json_optional_fields() {
        let customer: Customer = serde_json::from_str(
            r#"{"firstName":"A","lastName":"B","email":"a@b.c","phoneNumber":"(212) 555-1234","birthDate":"2001-12-03"}"#,
        )
        .unwrap();
        assert_eq!(
            Customer::new("A", "B", "a@b.c", "(212) 555-1234", date!(2001 - 12 - 03)),
            customer
        );

        let json = serde_json::to_string(&customer).unwrap();
        assert!(!json.contains("\"id\""));
        assert!(!json.contains("\"state\""));
    }

    #[test]
    fn test_json_decode_errors() {
        let err = serde_json::from_str::<Taxi>(r#"{"registration":"ABC1234"}"#).unwrap_err();
        assert!(err.to_string().contains("missing field `seat`"));

        let err = serde_json::from_str::<Booking>(
            r#"{"customerId":"1","taxiId":"2","travelDate":"12/03/2030"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid date '12/03/2030'"));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(date!(2024 - 02 - 29), parse_date("2024-02-29").unwrap());
        for bad in ["", "2023-02-29", "2024-2-3", "20240229", "2024-02-29T00:00:00"] {
            assert!(parse_date(bad).unwrap_err().0.contains("Invalid date"), "{}", bad);
        }
    }

    #[test]
    fn test_customer_with_unknown_state() {
        let customer =
            Customer::new("A", "B", "a@b.c", "(212) 555-1234", date!(2001 - 12 - 03));
        assert_eq!(Some(UNKNOWN_STATE), customer.clone().with_unknown_state().state().as_deref());
        assert_eq!(
            Some(UNKNOWN_STATE),
            customer.with_state("CA").with_unknown_state().state().as_deref()
        );
    }

    #[test]
    fn test_booking_refs() {
        let booking = Booking::new("12", "0034", date!(2030 - 01 - 01));
        assert_eq!(CustomerId::new(12), booking.customer_ref().unwrap());
        assert_eq!(TaxiId::new(34), booking.taxi_ref().unwrap());

        for bad in ["", "x1", "-3", "1 2", "99999999999999999999"] {
            let booking = Booking::new(bad, bad, date!(2030 - 01 - 01));
            assert!(booking.customer_ref().unwrap_err().0.contains("customer ID"));
            assert!(booking.taxi_ref().unwrap_err().0.contains("taxi ID"));
        }
    }

    #[test]
    fn test_booking_for_refs() {
        let booking = Booking::for_refs(CustomerId::new(5), TaxiId::new(7), date!(2030 - 01 - 01));
        assert_eq!("5", booking.customer_id().as_str());
        assert_eq!("7", booking.taxi_id().as_str());
        assert_eq!(&None, booking.id());
    }
}
