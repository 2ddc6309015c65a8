//! Sign-out errors waiting to be shown on the sign-in screen

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    /// Message by the microsecond its sign-out started
    errors: BTreeMap<i64, String>,
    in_flight: usize,
}

/// Errors raised by sign-outs since the user last signed in.
///
/// Each sign-out writes the whole set back after its store clear, so a clear
/// issued by one sign-out never loses an error recorded by another, whether
/// the two overlap or run back to back.
#[derive(Debug, Default)]
pub(crate) struct PendingErrors {
    state: Mutex<State>,
}

/// One sign-out in progress. Dropping it ends the sign-out.
#[derive(Debug)]
pub(crate) struct InFlight<'a> {
    pending: &'a PendingErrors,
    started_at: i64,
    /// No other sign-out was running when this one started
    leading: bool,
}

impl PendingErrors {
    pub(crate) fn begin(&self, started_at: i64) -> InFlight<'_> {
        let mut state = self.lock();
        let leading = state.in_flight == 0;
        state.in_flight += 1;
        InFlight {
            pending: self,
            started_at,
            leading,
        }
    }

    /// Every pending error, oldest first
    pub(crate) fn snapshot(&self) -> Vec<(i64, String)> {
        self.lock()
            .errors
            .iter()
            .map(|(timestamp, message)| (*timestamp, message.clone()))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl InFlight<'_> {
    pub(crate) fn record(&self, message: String) {
        self.pending.lock().errors.insert(self.started_at, message);
    }

    /// Drop errors left by sign-outs that finished before this one started.
    ///
    /// Only a sign-out that started with no other in flight may do this, so
    /// errors of overlapping sign-outs (all started later) are kept.
    pub(crate) fn discard_earlier(&self) {
        if !self.leading {
            return;
        }
        let started_at = self.started_at;
        self.pending
            .lock()
            .errors
            .retain(|timestamp, _| *timestamp >= started_at);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.pending.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}
