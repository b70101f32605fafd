//! Mock vehicle platform for testing and development

use crate::core::PositionReading;
use crate::vehicle::error::{VehicleError, VehicleResult};
use crate::vehicle::source::{SharedVehicle, VehicleDataSource, VehicleLocation};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Default)]
struct MockState {
    locations: HashMap<String, PositionReading>,
    failures: HashMap<String, VehicleError>,
    delays: HashMap<String, Duration>,
    shared: HashMap<String, Vec<SharedVehicle>>,
    accepted_token: Option<String>,
    connected: bool,
}

/// In-process stand-in for the vehicle platform
#[derive(Debug)]
pub struct MockVehicleSource {
    state: Mutex<MockState>,
    calls: AtomicU32,
}

impl Default for MockVehicleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVehicleSource {
    /// Create a connected mock that accepts any token
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                connected: true,
                ..MockState::default()
            }),
            calls: AtomicU32::new(0),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Set the fix returned for `vehicle_id`
    pub fn set_location(&self, vehicle_id: &str, reading: PositionReading) {
        self.state().locations.insert(vehicle_id.to_string(), reading);
    }

    /// Make every fetch of `vehicle_id` fail with `error`
    pub fn fail_with(&self, vehicle_id: &str, error: VehicleError) {
        self.state().failures.insert(vehicle_id.to_string(), error);
    }

    /// Delay responses for `vehicle_id`
    pub fn delay(&self, vehicle_id: &str, delay: Duration) {
        self.state().delays.insert(vehicle_id.to_string(), delay);
    }

    /// Only accept this bearer token from now on
    pub fn require_token(&self, token: &str) {
        self.state().accepted_token = Some(token.to_string());
    }

    pub fn set_shared_vehicles(&self, wallet_address: &str, vehicles: Vec<SharedVehicle>) {
        self.state().shared.insert(wallet_address.to_string(), vehicles);
    }

    /// Simulate losing the platform
    pub fn disconnect(&self) {
        self.state().connected = false;
    }

    pub fn reconnect(&self) {
        self.state().connected = true;
    }

    /// Number of platform calls served, failed ones included
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::Relaxed)
    }

    fn resolve_location(&self, vehicle_id: &str, bearer_token: &str) -> VehicleResult<VehicleLocation> {
        let state = self.state();
        if !state.connected {
            return Err(VehicleError::Transport("connection refused".to_string()));
        }
        if let Some(expected) = &state.accepted_token {
            if expected != bearer_token {
                return Err(VehicleError::Unauthorized);
            }
        }
        if let Some(error) = state.failures.get(vehicle_id) {
            return Err(error.clone());
        }
        state
            .locations
            .get(vehicle_id)
            .map(|reading| VehicleLocation {
                reading: *reading,
                timestamp: Utc::now(),
            })
            .ok_or_else(|| VehicleError::NotFound {
                vehicle_id: vehicle_id.to_string(),
            })
    }
}

impl VehicleDataSource for MockVehicleSource {
    async fn fetch_location(&self, vehicle_id: &str, bearer_token: &str) -> VehicleResult<VehicleLocation> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let delay = self.state().delays.get(vehicle_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.resolve_location(vehicle_id, bearer_token)
    }

    async fn shared_vehicles(&self, wallet_address: &str) -> VehicleResult<Vec<SharedVehicle>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let state = self.state();
        if !state.connected {
            return Err(VehicleError::Transport("connection refused".to_string()));
        }
        Ok(state.shared.get(wallet_address).cloned().unwrap_or_default())
    }
}
