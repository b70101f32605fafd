//! Input-boundary validation of readings
//!
//! The classifier and the reconciler accept any number. Readings coming in
//! over HTTP or from the vehicle platform are checked here first.

pub mod reading;

pub use reading::{validate_coordinate, validate_reading, ValidationError};
