//! GPS fix routes

use crate::api::{ApiError, ApiResult, AppState};
use crate::core::{test_scenarios, PositionReading, TestScenario};
use crate::storage::StoredFix;
use crate::validation::validate_reading;
use crate::vehicle::VehicleDataSource;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use log::debug;
use uuid::Uuid;

/// Store a fix and show it on the map
pub async fn save_fix<V: VehicleDataSource>(
    State(state): State<AppState<V>>,
    body: Result<Json<PositionReading>, JsonRejection>,
) -> ApiResult<Json<StoredFix>> {
    let Json(reading) = body?;
    validate_reading(&reading)?;
    let fix = state.store.save(reading);
    debug!("stored fix {} at ({}, {})", fix.id, fix.lat, fix.lng);
    state.dashboard.signals().reading(reading)?;
    Ok(Json(fix))
}

pub async fn latest_fix<V: VehicleDataSource>(
    State(state): State<AppState<V>>,
) -> ApiResult<Json<StoredFix>> {
    state
        .store
        .latest()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No GPS data found".to_string()))
}

/// Every fix, newest first
pub async fn list_fixes<V: VehicleDataSource>(State(state): State<AppState<V>>) -> Json<Vec<StoredFix>> {
    Json(state.store.all())
}

pub async fn get_fix<V: VehicleDataSource>(
    State(state): State<AppState<V>>,
    Path(id): Path<String>,
) -> ApiResult<Json<StoredFix>> {
    // A malformed id can't name a stored fix
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::NotFound(format!("GPS fix {} not found", id)))?;
    Ok(Json(state.store.get(id)?))
}

pub async fn scenarios() -> Json<Vec<TestScenario>> {
    Json(test_scenarios())
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{body_json, get, json_request, TestApp};
    use crate::core::PositionReading;
    use crate::signal::SignalTier;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_latest_is_404_when_empty() {
        let app = TestApp::new();
        let response = app.send(get("/api/gps/latest")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"message": "No GPS data found"}));
    }

    #[tokio::test]
    async fn test_save_then_read_back() {
        let app = TestApp::new();
        let response = app
            .send(json_request("POST", "/api/gps", json!({"lat": 40.7538, "lng": -73.9878, "hdop": 15})))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let saved = body_json(response).await;
        assert_eq!(saved["hdop"], json!(15.0));

        let response = app.send(get("/api/gps/latest")).await;
        assert_eq!(body_json(response).await, saved);

        let id = saved["id"].as_str().unwrap().to_string();
        let response = app.send(get(&format!("/api/gps/{}", id))).await;
        assert_eq!(body_json(response).await, saved);

        let snapshot = app.map_where(|s| s.reading.is_some()).await;
        assert_eq!(snapshot.reading, Some(PositionReading::new(40.7538, -73.9878, 15.0)));
        assert_eq!(snapshot.status.map(|s| s.tier), Some(SignalTier::PoorSignal));
    }

    #[tokio::test]
    async fn test_invalid_fix_rejected() {
        let app = TestApp::new();
        let response = app
            .send(json_request("POST", "/api/gps", json!({"lat": 95.0, "lng": 0.0, "hdop": -1.0})))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid GPS data");
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
        assert!(app.state.store.all().is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let app = TestApp::new();
        for lat in [1.0, 2.0, 3.0] {
            app.send(json_request("POST", "/api/gps", json!({"lat": lat, "lng": 1.0, "hdop": 1.0})))
                .await;
        }
        let body = body_json(app.send(get("/api/gps")).await).await;
        let lats: Vec<f64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["lat"].as_f64().unwrap())
            .collect();
        assert_eq!(lats, vec![3.0, 2.0, 1.0]);
    }

    #[tokio::test]
    async fn test_unknown_fix_id() {
        let app = TestApp::new();
        let response = app
            .send(get("/api/gps/6f1c2a52-8f43-4c3e-9a57-0d1f7c6a1b23"))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let app = TestApp::new();
        let response = app.send(get("/api/gps/not-a-uuid")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "GPS fix not-a-uuid not found");
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_bad_requests() {
        let app = TestApp::new();
        for body in [
            json!({"lat": 1.0, "lng": 2.0}),
            json!({"lat": "north", "lng": 2.0, "hdop": 1.0}),
        ] {
            let response = app.send(json_request("POST", "/api/gps", body.clone())).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
            let body = body_json(response).await;
            assert_eq!(body["message"], "Invalid GPS data");
            assert_eq!(body["errors"][0]["kind"], "malformed_body");
        }
        assert!(app.state.store.all().is_empty());
    }

    #[tokio::test]
    async fn test_scenarios_route() {
        let app = TestApp::new();
        let body = body_json(app.send(get("/api/gps/test-scenarios")).await).await;
        assert_eq!(body[0]["description"], "Vehicle Offline");
        assert_eq!(body[1], json!({"lat": 40.7538, "lng": -73.9878, "hdop": 15.0, "description": "Urban Garage"}));
        assert_eq!(body[2]["hdop"], json!(1.5));
    }
}
