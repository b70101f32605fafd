//! In-memory map surface
//!
//! Keeps the layer set and view the browser renders. The dashboard serves
//! [`SceneView`]s of it over HTTP and tests inspect it directly.

use crate::core::{Coordinate, DEFAULT_LOCATION, DEFAULT_ZOOM};
use crate::map::surface::{CircleLayer, LayerId, MapSurface, MarkerKind, MarkerLayer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
enum Layer {
    Marker(MarkerLayer),
    Circle(CircleLayer),
}

/// Layer-handle-free view of a scene, in insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneView {
    pub center: Coordinate,
    pub zoom: u8,
    pub markers: Vec<MarkerLayer>,
    pub circles: Vec<CircleLayer>,
}

/// Map surface backed by an ordered layer table
#[derive(Debug, Clone)]
pub struct SceneSurface {
    layers: BTreeMap<LayerId, Layer>,
    next_id: u64,
    center: Coordinate,
    zoom: u8,
    view_changes: u32,
    destroyed: bool,
}

impl Default for SceneSurface {
    fn default() -> Self {
        Self {
            layers: BTreeMap::new(),
            next_id: 1,
            center: DEFAULT_LOCATION,
            zoom: DEFAULT_ZOOM,
            view_changes: 0,
            destroyed: false,
        }
    }
}

impl SceneSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, layer: Layer) -> LayerId {
        let id = LayerId::new(self.next_id);
        self.next_id += 1;
        self.layers.insert(id, layer);
        id
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// Number of layers currently on the surface
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of `set_view` calls since creation
    pub fn view_changes(&self) -> u32 {
        self.view_changes
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn markers(&self) -> impl Iterator<Item = &MarkerLayer> {
        self.layers.values().filter_map(|layer| match layer {
            Layer::Marker(marker) => Some(marker),
            Layer::Circle(_) => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = &CircleLayer> {
        self.layers.values().filter_map(|layer| match layer {
            Layer::Circle(circle) => Some(circle),
            Layer::Marker(_) => None,
        })
    }

    pub fn markers_of(&self, kind: MarkerKind) -> usize {
        self.markers().filter(|m| m.kind == kind).count()
    }

    pub fn view(&self) -> SceneView {
        SceneView {
            center: self.center,
            zoom: self.zoom,
            markers: self.markers().cloned().collect(),
            circles: self.circles().cloned().collect(),
        }
    }
}

impl MapSurface for SceneSurface {
    fn add_marker(&mut self, marker: MarkerLayer) -> LayerId {
        self.insert(Layer::Marker(marker))
    }

    fn add_circle(&mut self, circle: CircleLayer) -> LayerId {
        self.insert(Layer::Circle(circle))
    }

    fn remove_layer(&mut self, id: LayerId) {
        self.layers.remove(&id);
    }

    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
        self.view_changes += 1;
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn destroy(&mut self) {
        self.layers.clear();
        self.destroyed = true;
    }
}
