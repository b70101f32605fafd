//! HTTP interface
//!
//! Routes are thin: they validate input at the boundary, talk to the store and
//! the collaborators, and hand display changes to the dashboard as
//! [`MapSignal`](crate::map::MapSignal)s. Nothing here touches the map directly.

pub mod error;
pub mod gps;
pub mod map;
pub mod vehicles;
pub mod music;

pub use error::{ApiError, ApiResult};

use crate::dashboard::DashboardHandle;
use crate::music::{MusicClient, MusicTokenStore};
use crate::storage::GpsStore;
use crate::utils::config::AppConfig;
use crate::vehicle::VehicleDataSource;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// Shared handler state
pub struct AppState<V> {
    pub store: Arc<dyn GpsStore>,
    pub dashboard: DashboardHandle,
    pub vehicles: Arc<V>,
    pub music: MusicClient,
    pub music_tokens: Arc<MusicTokenStore>,
    pub config: Arc<AppConfig>,
}

// Derived Clone would require V: Clone
impl<V> Clone for AppState<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            dashboard: self.dashboard.clone(),
            vehicles: Arc::clone(&self.vehicles),
            music: self.music.clone(),
            music_tokens: Arc::clone(&self.music_tokens),
            config: Arc::clone(&self.config),
        }
    }
}

impl<V: VehicleDataSource> AppState<V> {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn GpsStore>,
        dashboard: DashboardHandle,
        vehicles: V,
    ) -> ApiResult<Self> {
        let music = MusicClient::new(&config.music)?;
        Ok(Self {
            store,
            dashboard,
            vehicles: Arc::new(vehicles),
            music,
            music_tokens: Arc::new(MusicTokenStore::default()),
            config: Arc::new(config),
        })
    }
}

/// Every route of the dashboard server
pub fn router<V: VehicleDataSource>(state: AppState<V>) -> Router {
    Router::new()
        .route("/api/gps", get(gps::list_fixes::<V>).post(gps::save_fix::<V>))
        .route("/api/gps/latest", get(gps::latest_fix::<V>))
        .route("/api/gps/test-scenarios", get(gps::scenarios))
        .route("/api/gps/:id", get(gps::get_fix::<V>))
        .route("/api/map", get(map::snapshot::<V>))
        .route("/api/map/pin", post(map::drop_pin::<V>).delete(map::clear_pin::<V>))
        .route("/api/map/reading", post(map::apply_reading::<V>))
        .route("/api/vehicles/shared", get(vehicles::shared_vehicles::<V>))
        .route("/api/vehicles/:id/location", get(vehicles::vehicle_location::<V>))
        .route("/api/music/config", get(music::config::<V>))
        .route("/api/music/authorize", get(music::authorize::<V>))
        .route("/api/music/callback", get(music::callback::<V>))
        .route("/api/music/exchange", post(music::exchange::<V>))
        .route("/api/music/profile", get(music::profile::<V>))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::dashboard::Dashboard;
    use crate::map::MapSnapshot;
    use crate::storage::MemStorage;
    use crate::vehicle::MockVehicleSource;
    use axum::body::Body;
    use axum::http::{Request, Response};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::time::Duration;

    pub struct TestApp {
        pub router: Router,
        pub state: AppState<MockVehicleSource>,
    }

    impl TestApp {
        pub fn new() -> Self {
            Self::with_config(AppConfig::default())
        }

        pub fn with_config(config: AppConfig) -> Self {
            let (dashboard, _task) = Dashboard::new().spawn();
            let state = AppState::new(
                config,
                Arc::new(MemStorage::new()),
                dashboard,
                MockVehicleSource::new(),
            )
            .unwrap();
            Self {
                router: router(state.clone()),
                state,
            }
        }

        pub async fn send(&self, request: Request<Body>) -> Response<Body> {
            use tower::ServiceExt;
            self.router.clone().oneshot(request).await.unwrap()
        }

        /// Wait until the published map state satisfies `done`
        pub async fn map_where<F>(&self, done: F) -> MapSnapshot
        where
            F: Fn(&MapSnapshot) -> bool,
        {
            let mut updates = self.state.dashboard.subscribe();
            tokio::time::timeout(Duration::from_secs(5), async {
                loop {
                    let snapshot = updates.borrow_and_update().clone();
                    if done(&snapshot) {
                        break snapshot;
                    }
                    updates.changed().await.unwrap();
                }
            })
            .await
            .unwrap()
        }
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn body_json(response: Response<Body>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}
