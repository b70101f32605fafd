//! Core types and constants shared by the classifier, the map and the services

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
