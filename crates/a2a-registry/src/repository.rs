//! In-memory registry view keyed by agent name.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::entry::RegistryEntry;

/// Concurrent store of the latest entry per agent.
///
/// Entries are shared immutably; an upsert swaps the whole entry, so readers
/// never observe a half-written one. There are no cross-key transactions.
#[derive(Debug, Default)]
pub struct RegistryRepository {
    entries: RwLock<HashMap<String, Arc<RegistryEntry>>>,
}

impl RegistryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `entry.agent_name`.
    ///
    /// Entries with a blank agent name are ignored. Last write wins; there is
    /// no timestamp comparison.
    pub fn upsert(&self, entry: RegistryEntry) {
        if entry.agent_name.trim().is_empty() {
            tracing::debug!("Ignoring registry entry with blank agent name");
            return;
        }
        let name = entry.agent_name.clone();
        self.write().insert(name, Arc::new(entry));
    }

    pub fn find_by_name(&self, name: &str) -> Option<Arc<RegistryEntry>> {
        self.read().get(name).cloned()
    }

    /// Point-in-time snapshot of every entry, in no particular order.
    pub fn find_all(&self) -> Vec<Arc<RegistryEntry>> {
        self.read().values().cloned().collect()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Writers only ever insert or clear whole entries, so a poisoned map is
    // still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<RegistryEntry>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<RegistryEntry>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
