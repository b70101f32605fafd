//! Map view routes
//!
//! Mutations are queued on the dashboard and answered with 202; the new state
//! shows up in the next `GET /api/map`.

use crate::api::{ApiResult, AppState};
use crate::core::{Coordinate, PositionReading};
use crate::map::MapSnapshot;
use crate::signal::{classify, SignalStatus};
use crate::validation::{validate_coordinate, validate_reading};
use crate::vehicle::VehicleDataSource;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

pub async fn snapshot<V: VehicleDataSource>(State(state): State<AppState<V>>) -> Json<MapSnapshot> {
    Json(state.dashboard.snapshot())
}

pub async fn drop_pin<V: VehicleDataSource>(
    State(state): State<AppState<V>>,
    body: Result<Json<Coordinate>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Coordinate>)> {
    let Json(coordinate) = body?;
    validate_coordinate(&coordinate)?;
    state.dashboard.signals().drop_pin(coordinate)?;
    Ok((StatusCode::ACCEPTED, Json(coordinate)))
}

pub async fn clear_pin<V: VehicleDataSource>(State(state): State<AppState<V>>) -> ApiResult<StatusCode> {
    state.dashboard.signals().clear_manual_pin()?;
    Ok(StatusCode::ACCEPTED)
}

/// Manual control input, handled like any automatic reading
pub async fn apply_reading<V: VehicleDataSource>(
    State(state): State<AppState<V>>,
    body: Result<Json<PositionReading>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SignalStatus>)> {
    let Json(reading) = body?;
    validate_reading(&reading)?;
    state.dashboard.signals().reading(reading)?;
    Ok((StatusCode::ACCEPTED, Json(classify(&reading))))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{body_json, get, json_request, TestApp};
    use crate::core::{Coordinate, DEFAULT_LOCATION, DEFAULT_ZOOM};
    use crate::map::MarkerKind;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_initial_map() {
        let app = TestApp::new();
        let body = body_json(app.send(get("/api/map")).await).await;
        assert_eq!(body["scene"]["zoom"], json!(DEFAULT_ZOOM));
        assert_eq!(body["scene"]["center"], json!(DEFAULT_LOCATION));
        assert_eq!(body["scene"]["markers"], json!([]));
        assert_eq!(body["manual_pin"], json!(null));
    }

    #[tokio::test]
    async fn test_reading_then_pin_then_clear() {
        let app = TestApp::new();
        let response = app
            .send(json_request("POST", "/api/map/reading", json!({"lat": 40.0, "lng": -74.0, "hdop": 2.0})))
            .await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(body_json(response).await["message"], "Good GPS accuracy: ±4m");

        let response = app
            .send(json_request("POST", "/api/map/pin", json!({"lat": 41.0, "lng": -73.0})))
            .await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let pinned = app.map_where(|s| s.manual_pin.is_some()).await;
        assert_eq!(pinned.scene.markers.len(), 1);
        assert_eq!(pinned.scene.markers[0].kind, MarkerKind::ManualPin);
        assert!(pinned.scene.circles.is_empty());

        let request = Request::builder()
            .method("DELETE")
            .uri("/api/map/pin")
            .body(Body::empty())
            .unwrap();
        assert_eq!(app.send(request).await.status(), StatusCode::ACCEPTED);

        let cleared = app.map_where(|s| s.manual_pin.is_none()).await;
        assert_eq!(cleared.scene.markers.len(), 1);
        assert_eq!(cleared.scene.markers[0].kind, MarkerKind::Status);
        assert_eq!(cleared.scene.markers[0].position, Coordinate::new(40.0, -74.0));
        assert_eq!(cleared.scene.circles.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_map_bodies_are_bad_requests() {
        let app = TestApp::new();
        let response = app
            .send(json_request("POST", "/api/map/reading", json!({"lat": 1.0})))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid GPS data");

        let response = app
            .send(json_request("POST", "/api/map/pin", json!({"lat": "here", "lng": 1.0})))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.state.dashboard.snapshot().reading, None);
    }

    #[tokio::test]
    async fn test_out_of_range_pin_rejected() {
        let app = TestApp::new();
        let response = app
            .send(json_request("POST", "/api/map/pin", json!({"lat": 10.0, "lng": 200.0})))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.state.dashboard.snapshot().manual_pin, None);
    }
}
