//! HTTP client for the vehicle platform

use crate::core::PositionReading;
use crate::utils::config::VehicleSettings;
use crate::validation::validate_reading;
use crate::vehicle::error::{VehicleError, VehicleResult};
use crate::vehicle::source::{
    SharedVehicle, SharingGrant, VehicleDataSource, VehicleDefinition, VehicleLocation,
};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Accuracy assumed when the platform reports a fix without one
pub const DEFAULT_ACCURACY: f64 = 1.0;

const SHARED_VEHICLES_QUERY: &str = r#"
query SharedVehicles($owner: Address!, $privileged: Address!) {
  vehicles(filterBy: { privileged: $privileged, owner: $owner }, first: 100) {
    nodes {
      tokenId
      definition { make model year }
      sacds(first: 10) {
        nodes { permissions grantee createdAt expiresAt }
      }
    }
  }
}
"#;

/// Platform values arrive either as JSON numbers or as numeric strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn value(&self) -> Option<f64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Body of the location endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LocationPayload {
    latitude: Option<NumberOrText>,
    longitude: Option<NumberOrText>,
    accuracy: Option<NumberOrText>,
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    data: Option<VehiclesData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct VehiclesData {
    vehicles: Option<Connection<VehicleNode>>,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VehicleNode {
    token_id: u64,
    definition: Option<VehicleDefinition>,
    sacds: Option<Connection<SharingGrant>>,
}

/// Turn a location body into a validated fix
pub fn parse_location(vehicle_id: &str, payload: LocationPayload) -> VehicleResult<VehicleLocation> {
    let lat = payload.latitude.as_ref().and_then(NumberOrText::value);
    let lng = payload.longitude.as_ref().and_then(NumberOrText::value);
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Err(VehicleError::Unavailable {
            vehicle_id: vehicle_id.to_string(),
        });
    };
    let hdop = payload
        .accuracy
        .as_ref()
        .and_then(NumberOrText::value)
        .unwrap_or(DEFAULT_ACCURACY);

    let reading = PositionReading::new(lat, lng, hdop);
    if let Err(errors) = validate_reading(&reading) {
        let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(VehicleError::InvalidLocation(details.join("; ")));
    }

    Ok(VehicleLocation {
        reading,
        timestamp: payload.timestamp.unwrap_or_else(Utc::now),
    })
}

/// Flatten the identity query result
pub fn parse_shared_vehicles(response: GraphQlResponse) -> VehicleResult<Vec<SharedVehicle>> {
    if !response.errors.is_empty() {
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(VehicleError::Transport(messages.join("; ")));
    }

    let nodes = response
        .data
        .and_then(|d| d.vehicles)
        .map(|c| c.nodes)
        .unwrap_or_default();

    Ok(nodes
        .into_iter()
        .map(|node| SharedVehicle {
            token_id: node.token_id,
            definition: node.definition.unwrap_or_default(),
            grants: node.sacds.map(|c| c.nodes).unwrap_or_default(),
        })
        .collect())
}

/// Vehicle platform over HTTPS
#[derive(Clone)]
pub struct HttpVehicleClient {
    client: Client,
    api_base_url: String,
    identity_url: String,
    client_id: Option<String>,
    api_key: Option<String>,
}

impl std::fmt::Debug for HttpVehicleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpVehicleClient")
            .field("api_base_url", &self.api_base_url)
            .field("identity_url", &self.identity_url)
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl HttpVehicleClient {
    pub fn new(settings: &VehicleSettings) -> VehicleResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(concat!("DriveTunes/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            identity_url: settings.identity_url.clone(),
            client_id: settings.client_id.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    fn location_url(&self, vehicle_id: &str) -> String {
        format!("{}/vehicles/{}/location", self.api_base_url, vehicle_id)
    }
}

fn status_error(status: StatusCode, vehicle_id: &str) -> VehicleError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => VehicleError::Unauthorized,
        StatusCode::NOT_FOUND => VehicleError::NotFound {
            vehicle_id: vehicle_id.to_string(),
        },
        other => VehicleError::Transport(format!("vehicle platform returned {}", other)),
    }
}

impl VehicleDataSource for HttpVehicleClient {
    async fn fetch_location(&self, vehicle_id: &str, bearer_token: &str) -> VehicleResult<VehicleLocation> {
        if vehicle_id.is_empty() || !vehicle_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(VehicleError::NotFound {
                vehicle_id: vehicle_id.to_string(),
            });
        }

        let mut request = self.client.get(self.location_url(vehicle_id)).bearer_auth(bearer_token);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key);
        }

        debug!("fetching location for vehicle {}", vehicle_id);
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("location fetch for vehicle {} failed with {}", vehicle_id, status);
            return Err(status_error(status, vehicle_id));
        }

        let payload: LocationPayload = response.json().await?;
        parse_location(vehicle_id, payload)
    }

    async fn shared_vehicles(&self, wallet_address: &str) -> VehicleResult<Vec<SharedVehicle>> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or(VehicleError::NotConfigured("DIMO_CLIENT_ID"))?;

        debug!("querying shared vehicles for wallet {}", wallet_address);
        let response = self
            .client
            .post(&self.identity_url)
            .json(&json!({
                "query": SHARED_VEHICLES_QUERY,
                "variables": { "owner": wallet_address, "privileged": client_id },
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("shared vehicle query failed with {}", status);
            return Err(status_error(status, wallet_address));
        }

        parse_shared_vehicles(response.json().await?)
    }
}
