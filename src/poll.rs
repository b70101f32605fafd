//! Periodic reading sources
//!
//! The poller asks a [`ReadingSource`] for a reading on every tick and feeds
//! it to the map as an automatic reading. A tick without data is skipped; there
//! is no retry beyond the next tick.

use crate::core::{test_scenarios, PositionReading, TestScenario};
use crate::map::MapSignalSender;
use crate::storage::GpsStore;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Something that can be polled for the current reading
pub trait ReadingSource: Send + 'static {
    fn next_reading(&mut self) -> Option<PositionReading>;

    fn name(&self) -> &'static str;
}

/// Which source the poller reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollSourceKind {
    /// Latest fix in the store
    Store,
    /// Rotate through the canned test scenarios
    Scenarios,
}

/// Reads the latest stored fix
pub struct StoreSource {
    store: Arc<dyn GpsStore>,
}

impl StoreSource {
    pub fn new(store: Arc<dyn GpsStore>) -> Self {
        Self { store }
    }
}

impl ReadingSource for StoreSource {
    fn next_reading(&mut self) -> Option<PositionReading> {
        self.store.latest().map(|fix| fix.reading())
    }

    fn name(&self) -> &'static str {
        "store"
    }
}

/// Cycles through a fixed scenario list
pub struct ScenarioCycle {
    scenarios: Vec<TestScenario>,
    index: usize,
}

impl Default for ScenarioCycle {
    fn default() -> Self {
        Self::new(test_scenarios())
    }
}

impl ScenarioCycle {
    pub fn new(scenarios: Vec<TestScenario>) -> Self {
        Self {
            scenarios,
            index: 0,
        }
    }
}

impl ReadingSource for ScenarioCycle {
    fn next_reading(&mut self) -> Option<PositionReading> {
        if self.scenarios.is_empty() {
            return None;
        }
        let scenario = &self.scenarios[self.index % self.scenarios.len()];
        self.index = (self.index + 1) % self.scenarios.len();
        debug!("scenario tick: {}", scenario.description);
        Some(scenario.reading())
    }

    fn name(&self) -> &'static str {
        "scenarios"
    }
}

/// Build the configured source
pub fn source_for(kind: PollSourceKind, store: Arc<dyn GpsStore>) -> Box<dyn ReadingSource> {
    match kind {
        PollSourceKind::Store => Box::new(StoreSource::new(store)),
        PollSourceKind::Scenarios => Box::new(ScenarioCycle::default()),
    }
}

impl ReadingSource for Box<dyn ReadingSource> {
    fn next_reading(&mut self) -> Option<PositionReading> {
        (**self).next_reading()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Poll `source` every `interval` until the map channel closes
pub fn spawn_poller<R: ReadingSource>(
    mut source: R,
    signals: MapSignalSender,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("polling {} every {:?}", source.name(), interval);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let Some(reading) = source.next_reading() else {
                debug!("{} poll returned no reading", source.name());
                continue;
            };
            if signals.reading(reading).is_err() {
                info!("map channel closed, stopping {} poller", source.name());
                break;
            }
        }
    })
}
