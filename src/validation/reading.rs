use crate::core::{Coordinate, PositionReading};
use serde::Serialize;
use thiserror::Error;

/// Reasons a reading is rejected at the input boundary
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("latitude {value} is outside [-90, 90]")]
    LatitudeOutOfRange { value: f64 },
    #[error("longitude {value} is outside [-180, 180]")]
    LongitudeOutOfRange { value: f64 },
    #[error("hdop {value} must not be negative")]
    NegativeAccuracy { value: f64 },
    /// Body missing a field or carrying the wrong type
    #[error("{detail}")]
    MalformedBody { detail: String },
}

/// Collect every problem with a coordinate
pub fn validate_coordinate(coordinate: &Coordinate) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_coordinate(coordinate, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Collect every problem with a reading. The sentinel is valid.
pub fn validate_reading(reading: &PositionReading) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_coordinate(&reading.coordinate(), &mut errors);

    if !reading.hdop.is_finite() {
        errors.push(ValidationError::NotFinite { field: "hdop" });
    } else if reading.hdop < 0.0 {
        errors.push(ValidationError::NegativeAccuracy { value: reading.hdop });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_coordinate(coordinate: &Coordinate, errors: &mut Vec<ValidationError>) {
    if !coordinate.lat.is_finite() {
        errors.push(ValidationError::NotFinite { field: "lat" });
    } else if !(-90.0..=90.0).contains(&coordinate.lat) {
        errors.push(ValidationError::LatitudeOutOfRange { value: coordinate.lat });
    }

    if !coordinate.lng.is_finite() {
        errors.push(ValidationError::NotFinite { field: "lng" });
    } else if !(-180.0..=180.0).contains(&coordinate.lng) {
        errors.push(ValidationError::LongitudeOutOfRange { value: coordinate.lng });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_readings() {
        assert!(validate_reading(&PositionReading::sentinel()).is_ok());
        assert!(validate_reading(&PositionReading::new(90.0, -180.0, 0.0)).is_ok());
        assert!(validate_reading(&PositionReading::new(40.7538, -73.9878, 15.0)).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        let errors = validate_reading(&PositionReading::new(91.0, 181.0, -1.0)).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::LatitudeOutOfRange { value: 91.0 },
                ValidationError::LongitudeOutOfRange { value: 181.0 },
                ValidationError::NegativeAccuracy { value: -1.0 },
            ]
        );
    }

    #[test]
    fn test_non_finite() {
        let errors = validate_reading(&PositionReading::new(f64::NAN, 1.0, f64::INFINITY)).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::NotFinite { field: "lat" },
                ValidationError::NotFinite { field: "hdop" },
            ]
        );
    }

    #[test]
    fn test_coordinate_only() {
        assert!(validate_coordinate(&Coordinate::new(10.0, 20.0)).is_ok());
        assert_eq!(
            validate_coordinate(&Coordinate::new(-90.5, 0.0)).unwrap_err(),
            vec![ValidationError::LatitudeOutOfRange { value: -90.5 }]
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::LatitudeOutOfRange { value: 91.0 }.to_string(),
            "latitude 91 is outside [-90, 90]"
        );
        assert_eq!(
            ValidationError::NotFinite { field: "hdop" }.to_string(),
            "hdop must be a finite number"
        );
    }
}
