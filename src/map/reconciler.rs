//! Map reconciler
//!
//! Owns the position marker, the accuracy circle and the manual pin on a
//! [`MapSurface`]. Every update replaces elements instead of accumulating them,
//! and at most one of {automatic marker, manual pin} is visible at a time.

use crate::core::{Coordinate, PositionReading, DEFAULT_LOCATION, DEFAULT_ZOOM, FOCUS_ZOOM, PIN_COLOR};
use crate::map::scene::{SceneSurface, SceneView};
use crate::map::signal::MapSignal;
use crate::map::surface::{CircleLayer, LayerId, MapSurface, MarkerKind, MarkerLayer};
use crate::signal::{classify, SignalStatus};
use log::debug;
use serde::{Deserialize, Serialize};

const CIRCLE_FILL_OPACITY: f64 = 0.1;

/// View controller for the vehicle map
pub struct MapReconciler<S: MapSurface> {
    /// Surface the layers live on
    surface: S,
    /// Most recent automatic reading, displayed or not
    current_reading: Option<PositionReading>,
    /// Classification of `current_reading`
    current_status: Option<SignalStatus>,
    /// Most recent non-sentinel coordinate
    last_known: Coordinate,
    /// User dropped pin overriding automatic display
    manual_pin: Option<Coordinate>,
    /// One-shot recenter command waiting to be applied
    pending_focus: Option<Coordinate>,
    marker: Option<LayerId>,
    circle: Option<LayerId>,
    pin: Option<LayerId>,
    torn_down: bool,
}

/// Serializable state of a scene-backed map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub reading: Option<PositionReading>,
    pub status: Option<SignalStatus>,
    pub last_known_location: Coordinate,
    pub manual_pin: Option<Coordinate>,
    pub scene: SceneView,
}

impl<S: MapSurface> MapReconciler<S> {
    /// Mount on a surface, centered on the default location
    pub fn mount(mut surface: S) -> Self {
        surface.set_view(DEFAULT_LOCATION, DEFAULT_ZOOM);
        Self {
            surface,
            current_reading: None,
            current_status: None,
            last_known: DEFAULT_LOCATION,
            manual_pin: None,
            pending_focus: None,
            marker: None,
            circle: None,
            pin: None,
            torn_down: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn current_reading(&self) -> Option<&PositionReading> {
        self.current_reading.as_ref()
    }

    pub fn current_status(&self) -> Option<&SignalStatus> {
        self.current_status.as_ref()
    }

    pub fn last_known_location(&self) -> Coordinate {
        self.last_known
    }

    pub fn manual_pin(&self) -> Option<Coordinate> {
        self.manual_pin
    }

    /// Dispatch one signal. Fencing is the caller's job.
    pub fn handle(&mut self, signal: MapSignal) {
        match signal {
            MapSignal::Reading(reading) => self.apply_reading(reading),
            MapSignal::Focus { reading, .. } => {
                self.apply_reading(reading);
                self.request_focus(reading.coordinate());
            }
            MapSignal::DropPin(coordinate) => self.drop_manual_pin(coordinate),
            MapSignal::ClearManualPin => self.clear_manual_pin(),
        }
    }

    /// Record a reading and, unless a manual pin is showing, redraw the marker
    pub fn apply_reading(&mut self, reading: PositionReading) {
        if self.torn_down {
            return;
        }

        // Bookkeeping happens even under a pin so clearing it restores a fresh view
        if !reading.is_sentinel() {
            self.last_known = reading.coordinate();
        }
        self.current_reading = Some(reading);
        self.current_status = Some(classify(&reading));

        if self.manual_pin.is_some() {
            debug!("manual pin active, reading ({}, {}) not displayed", reading.lat, reading.lng);
            return;
        }

        self.render_automatic();
    }

    /// Replace any pin and automatic marker with a single pin at `coordinate`
    pub fn drop_manual_pin(&mut self, coordinate: Coordinate) {
        if self.torn_down {
            return;
        }

        self.remove_pin();
        self.remove_automatic();

        let id = self.surface.add_marker(MarkerLayer {
            position: coordinate,
            kind: MarkerKind::ManualPin,
            color: PIN_COLOR.to_string(),
            popup: format!(
                "Dropped pin\nLat: {:.6}\nLng: {:.6}",
                coordinate.lat, coordinate.lng
            ),
        });
        self.pin = Some(id);
        self.manual_pin = Some(coordinate);
        self.surface.set_view(coordinate, FOCUS_ZOOM);
    }

    /// Remove the pin and resume automatic display from the cached reading
    pub fn clear_manual_pin(&mut self) {
        if self.torn_down || self.manual_pin.is_none() {
            return;
        }

        self.remove_pin();
        self.manual_pin = None;
        self.render_automatic();
    }

    /// Recenter on `coordinate` at the focus zoom, leaving markers untouched.
    /// The command is consumed as soon as it has been applied.
    pub fn request_focus(&mut self, coordinate: Coordinate) {
        if self.torn_down {
            return;
        }
        self.pending_focus = Some(coordinate);
        self.flush_focus();
    }

    fn flush_focus(&mut self) {
        if let Some(target) = self.pending_focus.take() {
            self.surface.set_view(target, FOCUS_ZOOM);
        }
    }

    /// Release every layer and the surface. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.remove_pin();
        self.remove_automatic();
        self.pending_focus = None;
        self.surface.destroy();
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn render_automatic(&mut self) {
        let Some(reading) = self.current_reading else {
            return;
        };
        let status = match &self.current_status {
            Some(status) => status.clone(),
            None => classify(&reading),
        };

        self.remove_automatic();

        let offline = reading.is_sentinel();
        let display = if offline {
            self.last_known
        } else {
            reading.coordinate()
        };
        let color = status.tier.color();

        let popup = if offline {
            format!(
                "NO GPS\n{}\nLast known location:\nLat: {:.6}\nLng: {:.6}",
                status.message, display.lat, display.lng
            )
        } else {
            format!(
                "{}\n{}\nLat: {:.6}\nLng: {:.6}\nHDOP: {}",
                status.tier.label().to_uppercase(),
                status.message,
                reading.lat,
                reading.lng,
                reading.hdop
            )
        };

        if status.show_marker {
            self.marker = Some(self.surface.add_marker(MarkerLayer {
                position: display,
                kind: MarkerKind::Status,
                color: color.to_string(),
                popup,
            }));
        }

        if let Some(radius_m) = status.radius_m {
            self.circle = Some(self.surface.add_circle(CircleLayer {
                center: display,
                radius_m,
                color: color.to_string(),
                fill_opacity: CIRCLE_FILL_OPACITY,
            }));
        }

        let zoom = self.surface.zoom();
        self.surface.set_view(display, zoom);
    }

    fn remove_automatic(&mut self) {
        if let Some(id) = self.marker.take() {
            self.surface.remove_layer(id);
        }
        if let Some(id) = self.circle.take() {
            self.surface.remove_layer(id);
        }
    }

    fn remove_pin(&mut self) {
        if let Some(id) = self.pin.take() {
            self.surface.remove_layer(id);
        }
    }
}

impl MapReconciler<SceneSurface> {
    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            reading: self.current_reading,
            status: self.current_status.clone(),
            last_known_location: self.last_known,
            manual_pin: self.manual_pin,
            scene: self.surface.view(),
        }
    }
}

impl<S: MapSurface> Drop for MapReconciler<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
