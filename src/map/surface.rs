//! Map surface abstraction

use crate::core::Coordinate;
use serde::{Deserialize, Serialize};

/// Handle to a layer owned by a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(u64);

impl LayerId {
    pub fn new(id: u64) -> Self {
        LayerId(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// What a marker represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerKind {
    /// Automatic position marker, colored by signal tier
    Status,
    /// User dropped pin
    ManualPin,
}

/// A point marker with its popup text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerLayer {
    pub position: Coordinate,
    pub kind: MarkerKind,
    pub color: String,
    pub popup: String,
}

/// Accuracy circle around an automatic marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleLayer {
    pub center: Coordinate,
    pub radius_m: f64,
    pub color: String,
    pub fill_opacity: f64,
}

/// Drawing surface the reconciler renders onto
///
/// Implementations own the layers they hand out; removing an unknown or
/// already removed layer is a no-op.
pub trait MapSurface {
    /// Add a marker and return its handle
    fn add_marker(&mut self, marker: MarkerLayer) -> LayerId;

    /// Add an accuracy circle and return its handle
    fn add_circle(&mut self, circle: CircleLayer) -> LayerId;

    /// Remove a layer previously returned by this surface
    fn remove_layer(&mut self, id: LayerId);

    /// Recenter the view
    fn set_view(&mut self, center: Coordinate, zoom: u8);

    /// Current zoom level
    fn zoom(&self) -> u8;

    /// Release the surface itself. Called once on teardown.
    fn destroy(&mut self);
}
