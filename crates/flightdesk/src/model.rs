//! Domain records and identifiers.
//!
//! Identifiers arrive as untrusted text from the menu shell and are parsed
//! with [`FromStr`]; anything that is not an integer fails with an
//! invalid-input error naming the field.

use crate::{stmt::Value, Error, Result};

use std::{fmt, str::FromStr};

macro_rules! id {
    (
        $( #[$attrs:meta] )*
        $name:ident, $field:literal
    ) => {
        $( #[$attrs] )*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(src: &str) -> Result<$name> {
                src.trim()
                    .parse()
                    .map($name)
                    .map_err(|_| Error::invalid_input($field, src))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$name> for Value {
            fn from(src: $name) -> Value {
                Value::I64(src.0)
            }
        }
    };
}

id!(PlaneId, "plane id");
id!(PilotId, "pilot id");
id!(TechnicianId, "technician id");
id!(CustomerId, "customer id");
id!(
    /// The `fnum` of a flight.
    FlightNumber,
    "flight number"
);
id!(FlightInfoId, "flight info id");
id!(RepairId, "repair id");
id!(
    /// Unique, strictly increasing across every reservation ever made.
    ReservationNumber,
    "reservation number"
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    pub id: PlaneId,
    pub make: String,
    pub model: String,
    pub age: i64,
    /// Capacity. Must be positive.
    pub seats: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pilot {
    pub id: PilotId,
    pub fullname: String,
    pub nationality: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Technician {
    pub id: TechnicianId,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub fname: String,
    pub lname: String,
}

/// A flight and its assignment to a pilot and a plane. The flight starts
/// with no seats sold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFlight {
    pub fnum: FlightNumber,
    pub info: FlightInfoId,
    pub pilot: PilotId,
    pub plane: PlaneId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repair {
    pub id: RepairId,
    pub plane: PlaneId,
    /// `YYYY-MM-DD`
    pub date: String,
}

/// Stored status of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    Reserved,
    Waitlisted,
    Cancelled,
}

impl ReservationStatus {
    /// Single-letter code stored in the `status` column.
    pub fn code(self) -> &'static str {
        match self {
            ReservationStatus::Reserved => "R",
            ReservationStatus::Waitlisted => "W",
            ReservationStatus::Cancelled => "C",
        }
    }

    /// Parses a stored code. Case and surrounding whitespace are ignored.
    pub fn from_code(code: &str) -> Option<ReservationStatus> {
        match code.trim().to_ascii_uppercase().as_str() {
            "R" => Some(ReservationStatus::Reserved),
            "W" => Some(ReservationStatus::Waitlisted),
            "C" => Some(ReservationStatus::Cancelled),
            _ => None,
        }
    }

    /// Only a waitlisted reservation changes status, to reserved or
    /// cancelled.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (
                ReservationStatus::Waitlisted,
                ReservationStatus::Reserved | ReservationStatus::Cancelled
            )
        )
    }
}

impl FromStr for ReservationStatus {
    type Err = Error;

    fn from_str(src: &str) -> Result<ReservationStatus> {
        ReservationStatus::from_code(src).ok_or_else(|| Error::invalid_input("status", src))
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReservationStatus::Reserved => "reserved",
            ReservationStatus::Waitlisted => "waitlisted",
            ReservationStatus::Cancelled => "cancelled",
        })
    }
}

impl From<ReservationStatus> for Value {
    fn from(src: ReservationStatus) -> Value {
        Value::String(src.code().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Reserved,
    Waitlisted,
    /// No seat was available and the customer was not waitlisted.
    Declined,
}

/// Result of a booking operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingOutcome {
    pub status: BookingStatus,
    pub reservation_number: Option<ReservationNumber>,
}

impl BookingOutcome {
    pub fn reserved(rnum: ReservationNumber) -> BookingOutcome {
        BookingOutcome {
            status: BookingStatus::Reserved,
            reservation_number: Some(rnum),
        }
    }

    pub fn waitlisted(rnum: ReservationNumber) -> BookingOutcome {
        BookingOutcome {
            status: BookingStatus::Waitlisted,
            reservation_number: Some(rnum),
        }
    }

    pub fn declined(rnum: Option<ReservationNumber>) -> BookingOutcome {
        BookingOutcome {
            status: BookingStatus::Declined,
            reservation_number: rnum,
        }
    }

    /// The flight had no seat left.
    pub fn is_capacity_exhausted(&self) -> bool {
        self.status == BookingStatus::Declined
    }
}

/// What to do when a booking finds the flight full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitlistPolicy {
    /// Add the customer to the waitlist.
    Enroll,
    /// Report the flight as full.
    #[default]
    Decline,
}
