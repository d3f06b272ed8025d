//! Run-scoped home for the locale lock, the locale store, and snapshots.
//!
//! A [`LocaleRegistry`] bundles everything invocations share: one
//! [`FairLock`], the [`LocaleStore`] it protects, the table of per-invocation
//! snapshots, and the invocation identity counter. Test runs construct their
//! own registry around an injected store; [`LocaleRegistry::process`] exposes
//! the lazily created registry guarding the process default locale.
//!
//! Snapshots are keyed by [`InvocationId`] rather than stored on the guard, so
//! before and after callbacks dispatched on different objects still restore
//! the right value.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use locale_matrix_common::Locale;
use log::debug;
use once_cell::sync::Lazy;

use crate::invocation::InvocationId;
use crate::lock::FairLock;
use crate::store::{LocaleStore, ProcessLocaleStore};

static PROCESS_REGISTRY: Lazy<Arc<LocaleRegistry>> =
    Lazy::new(|| Arc::new(LocaleRegistry::new(Arc::new(ProcessLocaleStore))));

/// Shared state for every invocation of a test run.
#[derive(Debug)]
pub struct LocaleRegistry {
    lock: FairLock,
    store: Arc<dyn LocaleStore>,
    snapshots: Mutex<HashMap<InvocationId, Locale>>,
    next_id: AtomicU64,
}

impl LocaleRegistry {
    /// Create a registry guarding `store`.
    #[must_use]
    pub fn new(store: Arc<dyn LocaleStore>) -> Self {
        Self {
            lock: FairLock::new(),
            store,
            snapshots: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// The registry guarding the process default locale.
    ///
    /// Created on first use and kept for the lifetime of the process.
    #[must_use]
    pub fn process() -> Arc<Self> {
        Arc::clone(&PROCESS_REGISTRY)
    }

    /// The lock serialising mutate/restore cycles.
    #[must_use]
    pub const fn lock(&self) -> &FairLock {
        &self.lock
    }

    /// The guarded locale store.
    #[must_use]
    pub fn store(&self) -> &dyn LocaleStore {
        self.store.as_ref()
    }

    /// Allocate a process-unique identity for a new invocation.
    pub fn allocate_id(&self) -> InvocationId {
        InvocationId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn snapshots(&self) -> MutexGuard<'_, HashMap<InvocationId, Locale>> {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Remember the locale observed by `id` before it mutated the store.
    pub fn record_snapshot(&self, id: InvocationId, previous: Locale) {
        debug!(target: "locale_matrix::registry", "{id} saved previous locale `{previous}`");
        self.snapshots().insert(id, previous);
    }

    /// Remove and return the snapshot recorded for `id`.
    pub fn take_snapshot(&self, id: InvocationId) -> Option<Locale> {
        self.snapshots().remove(&id)
    }

    /// Number of snapshots awaiting restoration.
    #[must_use]
    pub fn pending_snapshots(&self) -> usize {
        self.snapshots().len()
    }
}
