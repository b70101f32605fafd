//! Map display reconciliation
//!
//! The reconciler owns every element drawn on a [`MapSurface`] and decides on
//! each reading or user interaction what should be visible. Producers talk to
//! it through a typed [`MapSignal`] channel rather than ambient events.

pub mod surface;
pub mod scene;
pub mod reconciler;
pub mod signal;
pub mod fence;

pub use surface::{CircleLayer, LayerId, MapSurface, MarkerKind, MarkerLayer};
pub use scene::{SceneSurface, SceneView};
pub use reconciler::{MapReconciler, MapSnapshot};
pub use signal::{channel, MapSignal, MapSignalReceiver, MapSignalSender, SignalError};
pub use fence::{RequestFence, Ticket, TicketIssuer};
