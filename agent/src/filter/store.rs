//! Live exclusion configuration
//!
//! The store is owned by the configuration surface; sessions hold a clone of
//! the handle and take a fresh snapshot for every message, so changes apply
//! from the next message on.

use packetlog_shared::types::filter::{ExclusionSet, FilterRule};
use std::sync::{Arc, RwLock};
use tracing::info;

/// Shared handle to the active exclusion set
#[derive(Debug, Clone, Default)]
pub struct ExclusionStore {
    inner: Arc<RwLock<ExclusionSet>>,
}

impl ExclusionStore {
    pub fn new(initial: ExclusionSet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Snapshot of the current exclusions
    pub fn get_exclusions(&self) -> ExclusionSet {
        // The set is replaced wholesale, so a poisoned lock still holds a valid value.
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Run `f` against the current exclusions without cloning them
    pub fn with<R>(&self, f: impl FnOnce(&ExclusionSet) -> R) -> R {
        match self.inner.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    /// Replace the exclusions
    pub fn set_exclusions(&self, exclusions: ExclusionSet) {
        info!("Exclusions updated: {}", exclusions.summary());
        match self.inner.write() {
            Ok(mut guard) => *guard = exclusions,
            Err(poisoned) => *poisoned.into_inner() = exclusions,
        }
    }

    /// Add or remove a single rule, returning whether the set changed.
    pub fn toggle(&self, rule: FilterRule, excluded: bool) -> bool {
        let mut exclusions = self.get_exclusions();
        let changed = if excluded {
            exclusions.insert(rule)
        } else {
            exclusions.remove(&rule)
        };
        if changed {
            self.set_exclusions(exclusions);
        }
        changed
    }
}
