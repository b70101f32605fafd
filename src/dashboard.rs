//! Dashboard event loop
//!
//! Single consumer of [`MapSignal`]s. Signals from every producer are
//! serialized onto one task, so the reconciler never sees two events at once
//! and display state always reflects the most recently delivered event.

use crate::map::{
    channel, MapReconciler, MapSignal, MapSignalReceiver, MapSignalSender, MapSnapshot,
    RequestFence, SceneSurface,
};
use log::{debug, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Owner of the map state
pub struct Dashboard {
    reconciler: MapReconciler<SceneSurface>,
    fence: RequestFence,
    snapshots: watch::Sender<MapSnapshot>,
    signals_applied: u64,
    signals_fenced: u64,
}

/// Cloneable access for producers and readers
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    signals: MapSignalSender,
    snapshots: watch::Receiver<MapSnapshot>,
}

impl DashboardHandle {
    pub fn signals(&self) -> &MapSignalSender {
        &self.signals
    }

    /// Latest published map state
    pub fn snapshot(&self) -> MapSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MapSnapshot> {
        self.snapshots.clone()
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        let reconciler = MapReconciler::mount(SceneSurface::new());
        let (snapshots, _) = watch::channel(reconciler.snapshot());
        Self {
            reconciler,
            fence: RequestFence::new(),
            snapshots,
            signals_applied: 0,
            signals_fenced: 0,
        }
    }

    /// Apply one signal and publish the result. Returns false when a stale
    /// focus response was fenced off.
    pub fn process(&mut self, signal: MapSignal) -> bool {
        if let MapSignal::Focus {
            reading,
            ticket: Some(ticket),
        } = &signal
        {
            if !self.fence.admit(*ticket) {
                debug!(
                    "dropping stale vehicle fix #{} at ({}, {})",
                    ticket.value(),
                    reading.lat,
                    reading.lng
                );
                self.signals_fenced += 1;
                return false;
            }
        }

        self.reconciler.handle(signal);
        self.signals_applied += 1;
        self.snapshots.send_replace(self.reconciler.snapshot());
        true
    }

    pub fn reconciler(&self) -> &MapReconciler<SceneSurface> {
        &self.reconciler
    }

    /// (applied, fenced) signal counts
    pub fn statistics(&self) -> (u64, u64) {
        (self.signals_applied, self.signals_fenced)
    }

    /// Consume signals until every sender is dropped, then tear the map down
    pub async fn run(mut self, mut signals: MapSignalReceiver) {
        info!("dashboard event loop started");
        while let Some(signal) = signals.recv().await {
            self.process(signal);
        }
        self.reconciler.teardown();
        info!(
            "dashboard event loop stopped ({} applied, {} fenced)",
            self.signals_applied, self.signals_fenced
        );
    }

    /// Start the event loop on the current runtime
    pub fn spawn(self) -> (DashboardHandle, JoinHandle<()>) {
        let (tx, rx) = channel();
        let handle = DashboardHandle {
            signals: tx,
            snapshots: self.snapshots.subscribe(),
        };
        let task = tokio::spawn(self.run(rx));
        (handle, task)
    }
}
