//! Process-local store of GPS fixes

use crate::core::PositionReading;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("GPS fix {0} not found")]
    NotFound(Uuid),
}

/// A saved reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFix {
    pub id: Uuid,
    pub lat: f64,
    pub lng: f64,
    pub hdop: f64,
    pub timestamp: DateTime<Utc>,
}

impl StoredFix {
    pub fn reading(&self) -> PositionReading {
        PositionReading::new(self.lat, self.lng, self.hdop)
    }
}

/// Storage seam for the latest fix and its history
pub trait GpsStore: Send + Sync {
    fn save(&self, reading: PositionReading) -> StoredFix;

    /// Most recent fix, if any
    fn latest(&self) -> Option<StoredFix>;

    /// Every fix, newest first
    fn all(&self) -> Vec<StoredFix>;

    fn get(&self, id: Uuid) -> Result<StoredFix, StorageError>;
}

/// Newest-last ordering: timestamp, then insertion order for ties
type FixKey = (DateTime<Utc>, u64);

/// In-memory [`GpsStore`]
#[derive(Debug, Default)]
pub struct MemStorage {
    inner: RwLock<MemInner>,
}

#[derive(Debug, Default)]
struct MemInner {
    fixes: BTreeMap<FixKey, StoredFix>,
    by_id: HashMap<Uuid, FixKey>,
    next_seq: u64,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save with an explicit timestamp
    pub fn save_at(&self, reading: PositionReading, timestamp: DateTime<Utc>) -> StoredFix {
        let fix = StoredFix {
            id: Uuid::new_v4(),
            lat: reading.lat,
            lng: reading.lng,
            hdop: reading.hdop,
            timestamp,
        };
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let key = (timestamp, inner.next_seq);
        inner.next_seq += 1;
        inner.by_id.insert(fix.id, key);
        inner.fixes.insert(key, fix.clone());
        fix
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GpsStore for MemStorage {
    fn save(&self, reading: PositionReading) -> StoredFix {
        self.save_at(reading, Utc::now())
    }

    fn latest(&self) -> Option<StoredFix> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.fixes.last_key_value().map(|(_, fix)| fix.clone())
    }

    fn all(&self) -> Vec<StoredFix> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.fixes.values().rev().cloned().collect()
    }

    fn get(&self, id: Uuid) -> Result<StoredFix, StorageError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner
            .by_id
            .get(&id)
            .and_then(|key| inner.fixes.get(key))
            .cloned()
            .ok_or(StorageError::NotFound(id))
    }
}
