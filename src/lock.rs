//! Fair mutual exclusion over the default locale.
//!
//! [`FairLock`] is a ticket lock: every caller draws a ticket on entry and
//! waits until the serving counter reaches it, so waiters are admitted in
//! strict arrival order. Acquisition and release are separate calls rather
//! than an RAII guard because an invocation's before and after callbacks run
//! as distinct calls, possibly on different threads. Ownership is tracked per
//! [`InvocationId`] so a release from a non-holder cannot hand the lock on.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

use crate::invocation::InvocationId;

#[derive(Debug, Default)]
struct TicketState {
    next_ticket: u64,
    now_serving: u64,
    holder: Option<InvocationId>,
}

/// FIFO-fair, non-reentrant lock owned by an invocation identity.
#[derive(Debug, Default)]
pub struct FairLock {
    state: Mutex<TicketState>,
    turn: Condvar,
}

impl FairLock {
    /// Create an unlocked lock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, TicketState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until `owner` holds the lock.
    ///
    /// Waiters are admitted in the order they called `acquire`. There is no
    /// timeout; a holder that never releases blocks every later caller.
    /// Returns `false` without waiting when `owner` already holds the lock,
    /// since the lock is not reentrant.
    #[must_use]
    pub fn acquire(&self, owner: InvocationId) -> bool {
        let mut state = self.state();

        if state.holder == Some(owner) {
            warn!(
                target: "locale_matrix::lock",
                "{owner} attempted to acquire the locale lock it already holds",
            );
            return false;
        }

        let ticket = state.next_ticket;
        state.next_ticket = state.next_ticket.wrapping_add(1);

        while state.now_serving != ticket {
            state = self
                .turn
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        state.holder = Some(owner);
        debug!(
            target: "locale_matrix::lock",
            "{owner} acquired the locale lock (ticket {ticket})",
        );
        true
    }

    /// Release the lock held by `owner`, admitting the next waiter.
    ///
    /// Returns `false` and leaves the lock untouched when `owner` is not the
    /// current holder.
    pub fn release(&self, owner: InvocationId) -> bool {
        let mut state = self.state();

        if state.holder != Some(owner) {
            warn!(
                target: "locale_matrix::lock",
                "{owner} attempted to release the locale lock it does not hold (holder: {:?})",
                state.holder,
            );
            return false;
        }

        state.holder = None;
        state.now_serving = state.now_serving.wrapping_add(1);
        drop(state);

        self.turn.notify_all();
        debug!(target: "locale_matrix::lock", "{owner} released the locale lock");
        true
    }

    /// Current holder, if any.
    #[must_use]
    pub fn holder(&self) -> Option<InvocationId> {
        self.state().holder
    }

    /// Number of callers waiting behind the current holder.
    #[must_use]
    pub fn waiting(&self) -> u64 {
        let state = self.state();
        let outstanding = state.next_ticket.wrapping_sub(state.now_serving);

        if state.holder.is_some() {
            outstanding.saturating_sub(1)
        } else {
            outstanding
        }
    }
}
