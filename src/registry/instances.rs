//! Per-dashboard-instance state slots.
//!
//! Every read of upstream records, page rebuild, and write of the persisted
//! page index for one logical instance must happen under that instance's
//! lock, so a rebuild always observes a consistent snapshot and the index
//! never reflects a lost update. Instances are independent; work on distinct
//! keys proceeds in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Identifier of one logical dashboard instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceKey(pub String);

impl InstanceKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Mutable state guarded by an instance's lock.
///
/// Only the current page index survives between renders; pages are always
/// rebuilt from live data.
#[derive(Debug, Default)]
pub struct InstanceState {
    /// Zero-based index of the page last shown for this instance.
    pub current_index: usize,
}

/// Keyed registry of instance slots.
///
/// The outer map lock is held only to fetch or create a slot; the returned
/// per-instance async mutex is the critical section callers hold across the
/// read-rebuild-write sequence.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    slots: Mutex<HashMap<InstanceKey, Arc<tokio::sync::Mutex<InstanceState>>>>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the slot for an instance, creating it on first use.
    pub fn slot(&self, key: &InstanceKey) -> Arc<tokio::sync::Mutex<InstanceState>> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    /// Drop an instance's slot when the instance is torn down.
    ///
    /// In-flight holders of the slot keep it alive until they finish; new
    /// lookups start fresh.
    pub fn remove(&self, key: &InstanceKey) {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.remove(key);
    }

    /// Number of registered instances.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
