//! GPS signal classification

pub mod classifier;

pub use classifier::{accuracy_radius, classify, SignalStatus, SignalTier};
