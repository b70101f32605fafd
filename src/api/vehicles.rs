//! Vehicle platform routes

use crate::api::{ApiError, ApiResult, AppState};
use crate::storage::StoredFix;
use crate::vehicle::{SharedVehicle, VehicleDataSource};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap};
use axum::Json;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedQuery {
    wallet_address: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedVehiclesResponse {
    wallet_address: String,
    vehicles: Vec<SharedVehicle>,
    count: usize,
}

/// A vehicle fix as stored, with the platform's own timestamp
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFixResponse {
    vehicle_id: String,
    fix: StoredFix,
    reported_at: DateTime<Utc>,
}

fn bearer_token(headers: &HeaderMap) -> ApiResult<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))
}

pub async fn shared_vehicles<V: VehicleDataSource>(
    State(state): State<AppState<V>>,
    Query(query): Query<SharedQuery>,
) -> ApiResult<Json<SharedVehiclesResponse>> {
    let vehicles = state.vehicles.shared_vehicles(&query.wallet_address).await?;
    Ok(Json(SharedVehiclesResponse {
        wallet_address: query.wallet_address,
        count: vehicles.len(),
        vehicles,
    }))
}

/// Fetch a vehicle's location and focus the map on it
///
/// The manual pin is cleared before the fetch starts. A failed fetch leaves
/// the rest of the map alone, and a response that arrives after a newer one
/// is fenced off by the dashboard.
pub async fn vehicle_location<V: VehicleDataSource>(
    State(state): State<AppState<V>>,
    Path(vehicle_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<VehicleFixResponse>> {
    let token = bearer_token(&headers)?;
    let signals = state.dashboard.signals();

    let ticket = signals.issue_ticket();
    signals.clear_manual_pin()?;

    let location = match state.vehicles.fetch_location(&vehicle_id, token).await {
        Ok(location) => location,
        Err(err) => {
            warn!("location fetch for vehicle {} failed: {}", vehicle_id, err);
            return Err(err.into());
        }
    };

    let fix = state.store.save(location.reading);
    signals.focus(location.reading, Some(ticket))?;
    info!(
        "vehicle {} at ({}, {}) hdop {}",
        vehicle_id, fix.lat, fix.lng, fix.hdop
    );

    Ok(Json(VehicleFixResponse {
        vehicle_id,
        fix,
        reported_at: location.timestamp,
    }))
}
