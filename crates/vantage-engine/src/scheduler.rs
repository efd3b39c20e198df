//! Per-token recompute debouncing.
//!
//! Each token has at most one pending recompute. A request arriving
//! within one quantum of the token's last completed computation is
//! deferred to the quantum boundary; further requests before then only
//! replace the pending parameters. Once a quantum has passed since the
//! last completion, a request runs immediately.
//!
//! Time is a [`Duration`] since a host-chosen epoch. The scheduler never
//! reads a clock, so tests drive it with plain numbers.

use std::time::Duration;

use indexmap::IndexMap;
use tracing::debug;
use vantage_core::TokenId;

/// What the caller should do with a request.
#[derive(Clone, Debug, PartialEq)]
pub enum Dispatch<P> {
    /// Execute now with these parameters, then call
    /// [`Scheduler::complete`].
    RunNow(P),
    /// Held until `due`; collect it with [`Scheduler::poll`].
    Deferred {
        /// When the pending request becomes runnable.
        due: Duration,
    },
}

#[derive(Debug)]
struct Pending<P> {
    params: P,
    due: Duration,
}

#[derive(Debug)]
struct Slot<P> {
    last_completed: Option<Duration>,
    pending: Option<Pending<P>>,
}

impl<P> Default for Slot<P> {
    fn default() -> Self {
        Self {
            last_completed: None,
            pending: None,
        }
    }
}

/// Latest-wins debouncer keyed by token.
#[derive(Debug)]
pub struct Scheduler<P> {
    quantum: Duration,
    slots: IndexMap<TokenId, Slot<P>>,
}

impl<P> Scheduler<P> {
    /// Scheduler spacing recomputes at least `quantum` apart.
    pub fn new(quantum: Duration) -> Self {
        Self {
            quantum,
            slots: IndexMap::new(),
        }
    }

    /// The debounce quantum.
    pub fn quantum(&self) -> Duration {
        self.quantum
    }

    /// Ask for a recompute of `token` at time `now`.
    pub fn request(&mut self, token: TokenId, params: P, now: Duration) -> Dispatch<P> {
        let quantum = self.quantum;
        let slot = self.slots.entry(token).or_default();
        if let Some(pending) = slot.pending.as_mut() {
            pending.params = params;
            debug!(%token, due_ms = pending.due.as_millis() as u64, "coalesced recompute request");
            return Dispatch::Deferred { due: pending.due };
        }
        match slot.last_completed {
            Some(last) if now.saturating_sub(last) < quantum => {
                let due = last + quantum;
                slot.pending = Some(Pending { params, due });
                debug!(%token, due_ms = due.as_millis() as u64, "deferred recompute");
                Dispatch::Deferred { due }
            }
            _ => Dispatch::RunNow(params),
        }
    }

    /// Take every pending request due at or before `now`, in the order
    /// tokens were first seen.
    pub fn poll(&mut self, now: Duration) -> Vec<(TokenId, P)> {
        let mut ready = Vec::new();
        for (token, slot) in self.slots.iter_mut() {
            if slot.pending.as_ref().is_some_and(|p| p.due <= now) {
                if let Some(pending) = slot.pending.take() {
                    ready.push((*token, pending.params));
                }
            }
        }
        ready
    }

    /// Record that a computation for `token` finished at `now`.
    pub fn complete(&mut self, token: TokenId, now: Duration) {
        self.slots.entry(token).or_default().last_completed = Some(now);
    }

    /// Drop all state for `token`, including any pending request.
    /// Returns whether a request was pending.
    pub fn cancel(&mut self, token: TokenId) -> bool {
        let had_pending = self
            .slots
            .shift_remove(&token)
            .is_some_and(|slot| slot.pending.is_some());
        if had_pending {
            debug!(%token, "cancelled pending recompute");
        }
        had_pending
    }

    /// Whether `token` has a pending request.
    pub fn is_pending(&self, token: TokenId) -> bool {
        self.slots.get(&token).is_some_and(|s| s.pending.is_some())
    }

    /// Earliest due time among pending requests.
    pub fn next_due(&self) -> Option<Duration> {
        self.slots
            .values()
            .filter_map(|s| s.pending.as_ref().map(|p| p.due))
            .min()
    }

    /// Number of pending requests.
    pub fn pending_count(&self) -> usize {
        self.slots.values().filter(|s| s.pending.is_some()).count()
    }

    /// Forget every token.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
