pub mod accessor;

mod admin;

mod booking;
pub use booking::BookingRequest;

pub mod db;
pub use db::{Db, Executor, Transaction};

pub mod model;

mod reporting;

pub use flightdesk_core::{bail, driver, err, stmt, Error, Result};
