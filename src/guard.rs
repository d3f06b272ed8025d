//! Per-invocation locale scope.
//!
//! A [`LocaleScopeGuard`] walks `Idle → Acquiring → Mutated → Restoring →
//! Released`. [`LocaleScopeGuard::before`] takes the registry lock, snapshots
//! the current default and installs the invocation's tag.
//! [`LocaleScopeGuard::after`] writes the snapshot back and always releases
//! the lock, whatever happened to the test body in between.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use locale_matrix_common::Locale;
use log::{debug, warn};

use crate::error::LocaleError;
use crate::invocation::InvocationId;
use crate::registry::LocaleRegistry;

/// Lifecycle of a [`LocaleScopeGuard`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScopeState {
    /// Created, before-phase not yet entered.
    Idle,
    /// Waiting for the registry lock.
    Acquiring,
    /// Lock held and the invocation's tag installed.
    Mutated,
    /// Restoring the snapshot.
    Restoring,
    /// Lock released; terminal.
    Released,
}

impl fmt::Display for ScopeState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Acquiring => "acquiring",
            Self::Mutated => "mutated",
            Self::Restoring => "restoring",
            Self::Released => "released",
        };
        formatter.write_str(name)
    }
}

/// Installs one invocation's locale for the span of its body.
#[derive(Debug)]
pub struct LocaleScopeGuard {
    id: InvocationId,
    tag: String,
    registry: Arc<LocaleRegistry>,
    state: Mutex<ScopeState>,
}

impl LocaleScopeGuard {
    /// Create an idle guard for invocation `id` installing `tag`.
    #[must_use]
    pub fn new(id: InvocationId, tag: impl Into<String>, registry: Arc<LocaleRegistry>) -> Self {
        Self {
            id,
            tag: tag.into(),
            registry,
            state: Mutex::new(ScopeState::Idle),
        }
    }

    /// Identity the snapshot and lock ownership are keyed by.
    #[must_use]
    pub const fn id(&self) -> InvocationId {
        self.id
    }

    /// Tag installed by this guard.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.tag.as_str()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ScopeState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter(&self, next: ScopeState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(target: "locale_matrix::guard", "{}: {} -> {next}", self.id, *state);
        *state = next;
    }

    /// Move from `Idle` to `Acquiring`, refusing any other starting state.
    fn begin(&self) -> Result<(), LocaleError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if *state != ScopeState::Idle {
            return Err(LocaleError::ScopeMisuse {
                phase: "before",
                invocation: self.id,
                state: *state,
            });
        }

        let next = ScopeState::Acquiring;
        debug!(target: "locale_matrix::guard", "{}: {} -> {next}", self.id, *state);
        *state = next;
        Ok(())
    }

    /// Acquire the lock and install the invocation's locale.
    ///
    /// Blocks until the registry lock is available. If the tag cannot be
    /// parsed, the store rejects the write, or the store panics, the snapshot
    /// is discarded, the lock is released, and the guard ends in
    /// [`ScopeState::Released`].
    ///
    /// Only an idle guard may run `before`; a second call fails with
    /// [`LocaleError::ScopeMisuse`] instead of waiting on its own lock.
    pub fn before(&self) -> Result<(), LocaleError> {
        self.begin()?;

        if !self.registry.lock().acquire(self.id) {
            self.enter(ScopeState::Idle);
            return Err(LocaleError::LockAlreadyHeld {
                invocation: self.id,
            });
        }

        let held = HeldLock::new(self);
        self.install()?;
        held.keep();

        self.enter(ScopeState::Mutated);
        Ok(())
    }

    fn install(&self) -> Result<(), LocaleError> {
        let locale =
            Locale::parse(&self.tag).map_err(|error| LocaleError::invalid_tag(&self.tag, error))?;
        let store = self.registry.store();

        let previous = store.current()?;
        self.registry.record_snapshot(self.id, previous);
        store.replace(locale)
    }

    /// Drop any snapshot and give the lock back.
    fn abandon(&self) {
        self.registry.take_snapshot(self.id);
        self.registry.lock().release(self.id);
        self.enter(ScopeState::Released);
    }

    /// Restore the snapshot and release the lock.
    ///
    /// A missing snapshot is logged and skipped. The lock is released even
    /// when restoration fails or the store panics; a failure is returned
    /// afterwards.
    pub fn after(&self) -> Result<(), LocaleError> {
        self.enter(ScopeState::Restoring);
        let held = HeldLock::new(self);

        let restored = match self.registry.take_snapshot(self.id) {
            Some(previous) => {
                debug!(target: "locale_matrix::guard", "{} restoring `{previous}`", self.id);
                self.registry.store().replace(previous)
            }
            None => {
                warn!(
                    target: "locale_matrix::guard",
                    "{} has no saved locale to restore; skipping restore",
                    self.id,
                );
                Ok(())
            }
        };

        drop(held);
        restored
    }
}

/// Releases a scope's lock when dropped unless [`HeldLock::keep`] was called.
///
/// Store calls made while the lock is held may unwind; dropping this value
/// during the unwind still hands the lock to the next waiter.
struct HeldLock<'a> {
    scope: &'a LocaleScopeGuard,
    armed: bool,
}

impl<'a> HeldLock<'a> {
    const fn new(scope: &'a LocaleScopeGuard) -> Self {
        Self { scope, armed: true }
    }

    /// Keep the lock held past this value's lifetime.
    fn keep(mut self) {
        self.armed = false;
    }
}

impl Drop for HeldLock<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if thread::panicking() {
            warn!(
                target: "locale_matrix::guard",
                "{} unwinding while holding the locale lock; releasing it",
                self.scope.id,
            );
        }
        self.scope.abandon();
    }
}
