//! Vehicle-data platform boundary
//!
//! The platform hands back a vehicle's last known fix or one of a fixed set of
//! failures. Nothing here touches the map; callers decide what a failure means
//! for display (it means "no update").

pub mod error;
pub mod source;
pub mod http;
pub mod mock;

pub use error::{VehicleError, VehicleResult};
pub use source::{SharedVehicle, SharingGrant, VehicleDataSource, VehicleDefinition, VehicleLocation};
pub use http::HttpVehicleClient;
pub use mock::MockVehicleSource;
