//! DriveTunes vehicle dashboard
//!
//! Classifies GPS readings from a connected vehicle, keeps the map display in
//! step with them and links a music-streaming account for later playlist work.

pub mod core;
pub mod signal;
pub mod map;
pub mod dashboard;
pub mod poll;
pub mod storage;
pub mod validation;
pub mod cache;
pub mod vehicle;
pub mod music;
pub mod api;
pub mod utils;

// Re-export commonly used types
pub use core::{Coordinate, PositionReading, TestScenario};
pub use signal::{classify, SignalStatus, SignalTier};
pub use map::{MapReconciler, MapSignal, MapSignalSender, MapSnapshot, MapSurface, SceneSurface};
pub use dashboard::{Dashboard, DashboardHandle};
pub use storage::{GpsStore, MemStorage, StoredFix};
pub use vehicle::{HttpVehicleClient, VehicleDataSource, VehicleError};
pub use api::{router, ApiError, AppState};
pub use utils::config::AppConfig;
