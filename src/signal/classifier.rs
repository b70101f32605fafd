//! Maps a raw reading to a signal tier and a human readable accuracy estimate.
//!
//! The radius formulas are a display heuristic that keeps the accuracy circle
//! proportionate; they are not a confidence interval. The constants are part of
//! the contract since the UI depends on them literally.

use crate::core::{
    PositionReading, GOOD_COLOR, GOOD_RADIUS_FACTOR, MIN_GOOD_RADIUS_M, NO_SIGNAL_COLOR,
    POOR_COLOR, POOR_RADIUS_FACTOR, POOR_SIGNAL_THRESHOLD,
};
use serde::{Deserialize, Serialize};

/// Signal quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalTier {
    /// Only produced by the `(0, 0, 0)` sentinel
    NoSignal,
    /// Accuracy value above the threshold
    PoorSignal,
    GoodSignal,
}

impl SignalTier {
    /// Marker color keyed to the tier
    pub fn color(&self) -> &'static str {
        match self {
            SignalTier::GoodSignal => GOOD_COLOR,
            SignalTier::PoorSignal => POOR_COLOR,
            SignalTier::NoSignal => NO_SIGNAL_COLOR,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignalTier::GoodSignal => "Good GPS",
            SignalTier::PoorSignal => "Poor GPS",
            SignalTier::NoSignal => "No GPS",
        }
    }
}

/// Result of classifying a reading. Derived on every reading, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalStatus {
    pub tier: SignalTier,
    pub message: String,
    /// Whether a position marker is drawn at all
    pub show_marker: bool,
    /// Accuracy circle radius in meters, absent for the sentinel
    pub radius_m: Option<f64>,
}

impl SignalStatus {
    /// "±75m" style estimate, absent when there is no signal
    pub fn accuracy_label(&self) -> Option<String> {
        self.radius_m.map(format_radius)
    }
}

/// Accuracy circle radius for a non-sentinel accuracy value
pub fn accuracy_radius(hdop: f64) -> f64 {
    if hdop > POOR_SIGNAL_THRESHOLD {
        hdop * POOR_RADIUS_FACTOR
    } else {
        (hdop * GOOD_RADIUS_FACTOR).max(MIN_GOOD_RADIUS_M)
    }
}

/// Classify a reading. Total over every numeric input; coordinates are not range checked here.
pub fn classify(reading: &PositionReading) -> SignalStatus {
    // The sentinel still shows a marker: the map falls back to the last known location
    if reading.is_sentinel() {
        return SignalStatus {
            tier: SignalTier::NoSignal,
            message: "No GPS signal".to_string(),
            show_marker: true,
            radius_m: None,
        };
    }

    let radius = accuracy_radius(reading.hdop);
    let (tier, prefix) = if reading.hdop > POOR_SIGNAL_THRESHOLD {
        (SignalTier::PoorSignal, "Poor GPS accuracy")
    } else {
        (SignalTier::GoodSignal, "Good GPS accuracy")
    };

    SignalStatus {
        tier,
        message: format!("{}: {}", prefix, format_radius(radius)),
        show_marker: true,
        radius_m: Some(radius),
    }
}

fn format_radius(radius_m: f64) -> String {
    let rounded = (radius_m * 10.0).round() / 10.0;
    format!("±{}m", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_no_signal() {
        let status = classify(&PositionReading::new(0.0, 0.0, 0.0));
        assert_eq!(status.tier, SignalTier::NoSignal);
        assert_eq!(status.message, "No GPS signal");
        assert!(status.show_marker);
        assert_eq!(status.radius_m, None);
        assert_eq!(status.accuracy_label(), None);

        // However the zeros are produced
        let parsed: f64 = "0.000".parse().unwrap();
        let defaulted = f64::default();
        let status = classify(&PositionReading::new(parsed, defaulted, -0.0));
        assert_eq!(status.tier, SignalTier::NoSignal);
    }

    #[test]
    fn test_poor_signal_radius() {
        for hdop in [10.0001, 10.5, 15.0, 42.0, 1000.0] {
            let status = classify(&PositionReading::new(51.5, -0.12, hdop));
            assert_eq!(status.tier, SignalTier::PoorSignal, "hdop {}", hdop);
            assert_eq!(status.radius_m, Some(hdop * 5.0));
        }
    }

    #[test]
    fn test_good_signal_radius() {
        for hdop in [0.0, 0.5, 1.5, 1.6, 4.0, 10.0] {
            let status = classify(&PositionReading::new(51.5, -0.12, hdop));
            assert_eq!(status.tier, SignalTier::GoodSignal, "hdop {}", hdop);
            assert_eq!(status.radius_m, Some((hdop * 2.0).max(3.0)));
        }
    }

    #[test]
    fn test_threshold_is_inclusive_for_good() {
        assert_eq!(classify(&PositionReading::new(1.0, 1.0, 10.0)).tier, SignalTier::GoodSignal);
        assert_eq!(classify(&PositionReading::new(1.0, 1.0, 10.01)).tier, SignalTier::PoorSignal);
    }

    #[test]
    fn test_zero_accuracy_off_origin_is_good() {
        let status = classify(&PositionReading::new(12.0, 0.0, 0.0));
        assert_eq!(status.tier, SignalTier::GoodSignal);
        assert_eq!(status.radius_m, Some(3.0));
    }

    #[test]
    fn test_urban_garage_scenario() {
        let status = classify(&PositionReading::new(40.7538, -73.9878, 15.0));
        assert_eq!(status.tier, SignalTier::PoorSignal);
        assert_eq!(status.accuracy_label().as_deref(), Some("±75m"));
        assert!(status.message.contains("±75m"));
    }

    #[test]
    fn test_open_road_scenario() {
        let status = classify(&PositionReading::new(40.658878, -74.186740, 1.5));
        assert_eq!(status.tier, SignalTier::GoodSignal);
        assert_eq!(status.accuracy_label().as_deref(), Some("±3m"));
        assert!(status.message.contains("±3m"));
    }

    #[test]
    fn test_unvalidated_input_is_accepted() {
        let status = classify(&PositionReading::new(500.0, -900.0, 2.0));
        assert_eq!(status.tier, SignalTier::GoodSignal);
        let status = classify(&PositionReading::new(1.0, 1.0, f64::NAN));
        assert_eq!(status.tier, SignalTier::GoodSignal);
    }

    #[test]
    fn test_tier_colors() {
        assert_eq!(SignalTier::GoodSignal.color(), "#22c55e");
        assert_eq!(SignalTier::PoorSignal.color(), "#eab308");
        assert_eq!(SignalTier::NoSignal.color(), "#ef4444");
    }
}
