//! Core data types for position readings

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Raw position reading as delivered by a poll, a vehicle fetch or the manual controls
///
/// `hdop` is the horizontal accuracy estimate; lower is better. The triple
/// `(0, 0, 0)` is the "no signal" sentinel, not a position in the Gulf of Guinea.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionReading {
    pub lat: f64,
    pub lng: f64,
    pub hdop: f64,
}

impl PositionReading {
    pub fn new(lat: f64, lng: f64, hdop: f64) -> Self {
        Self { lat, lng, hdop }
    }

    /// The "no signal available" reading
    pub fn sentinel() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// True for the `(0, 0, 0)` sentinel. `-0.0` compares equal to `0.0`.
    pub fn is_sentinel(&self) -> bool {
        self.lat == 0.0 && self.lng == 0.0 && self.hdop == 0.0
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Canned reading used to exercise the classifier without live data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestScenario {
    pub lat: f64,
    pub lng: f64,
    pub hdop: f64,
    pub description: String,
}

impl TestScenario {
    pub fn reading(&self) -> PositionReading {
        PositionReading::new(self.lat, self.lng, self.hdop)
    }
}

/// The fixed scenario list: offline sentinel, a poor fix and a good fix
pub fn test_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario {
            lat: 0.0,
            lng: 0.0,
            hdop: 0.0,
            description: "Vehicle Offline".to_string(),
        },
        TestScenario {
            lat: 40.7538,
            lng: -73.9878,
            hdop: 15.0,
            description: "Urban Garage".to_string(),
        },
        TestScenario {
            lat: 40.658878,
            lng: -74.186740,
            hdop: 1.5,
            description: "Open Road".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_detection() {
        assert!(PositionReading::sentinel().is_sentinel());
        assert!(PositionReading::new(-0.0, 0.0, -0.0).is_sentinel());
        assert!("0".parse::<f64>().map(|z| PositionReading::new(z, z, z).is_sentinel()).unwrap());
        assert!(!PositionReading::new(0.0, 0.0, 1.0).is_sentinel());
        assert!(!PositionReading::new(0.0, 0.1, 0.0).is_sentinel());
    }

    #[test]
    fn test_scenarios_cover_every_tier() {
        let scenarios = test_scenarios();
        assert_eq!(scenarios.len(), 3);
        assert!(scenarios[0].reading().is_sentinel());
        assert!(scenarios[1].hdop > 10.0);
        assert!(scenarios[2].hdop <= 10.0);
    }
}
