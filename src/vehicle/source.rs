//! Vehicle data source trait and platform types

use crate::core::PositionReading;
use crate::vehicle::error::VehicleResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Last known fix of a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleLocation {
    pub reading: PositionReading,
    pub timestamp: DateTime<Utc>,
}

/// Make/model/year of a vehicle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleDefinition {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<u16>,
}

/// A permission grant from the owner to an app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharingGrant {
    pub permissions: Vec<String>,
    pub grantee: String,
    pub created_at: Option<String>,
    pub expires_at: Option<String>,
}

/// Vehicle the owner has shared with this app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedVehicle {
    pub token_id: u64,
    pub definition: VehicleDefinition,
    pub grants: Vec<SharingGrant>,
}

impl SharedVehicle {
    /// "2021 Tesla Model 3" style name, skipping unknown parts
    pub fn display_name(&self) -> String {
        let d = &self.definition;
        let parts: Vec<String> = [
            d.year.map(|y| y.to_string()),
            d.make.clone(),
            d.model.clone(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            format!("Vehicle {}", self.token_id)
        } else {
            parts.join(" ")
        }
    }
}

/// Read access to the vehicle platform
pub trait VehicleDataSource: Send + Sync + 'static {
    /// Last known location of `vehicle_id`, authorized by the user's bearer token
    fn fetch_location(
        &self,
        vehicle_id: &str,
        bearer_token: &str,
    ) -> impl Future<Output = VehicleResult<VehicleLocation>> + Send;

    /// Vehicles `wallet_address` has shared with this app
    fn shared_vehicles(
        &self,
        wallet_address: &str,
    ) -> impl Future<Output = VehicleResult<Vec<SharedVehicle>>> + Send;
}
