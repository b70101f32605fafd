//! Display and classification constants

use crate::core::types::Coordinate;

/// Accuracy values strictly above this are classified as a poor signal
pub const POOR_SIGNAL_THRESHOLD: f64 = 10.0;

/// Radius multiplier applied to the accuracy value of a poor signal (meters)
pub const POOR_RADIUS_FACTOR: f64 = 5.0;

/// Radius multiplier applied to the accuracy value of a good signal (meters)
pub const GOOD_RADIUS_FACTOR: f64 = 2.0;

/// Smallest accuracy circle drawn for a good signal (meters)
pub const MIN_GOOD_RADIUS_M: f64 = 3.0;

/// Map center used before any valid reading has been seen (New York City)
pub const DEFAULT_LOCATION: Coordinate = Coordinate {
    lat: 40.7128,
    lng: -74.0060,
};

/// Zoom level of a freshly mounted map
pub const DEFAULT_ZOOM: u8 = 13;

/// Zoom level used by focus requests and manual pins
pub const FOCUS_ZOOM: u8 = 16;

pub const GOOD_COLOR: &str = "#22c55e";
pub const POOR_COLOR: &str = "#eab308";
pub const NO_SIGNAL_COLOR: &str = "#ef4444";
/// Manual pins carry no signal semantics and use a fixed neutral color
pub const PIN_COLOR: &str = "#3b82f6";
