use crate::foundation::core::TimeMs;

/// Collapses a burst of signals into one delivery after a quiet period.
///
/// Latest-wins: the payload of the final signal in a burst is the one
/// delivered, and it is never dropped.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    quiet_ms: f64,
    pending: Option<(TimeMs, T)>,
    coalesced: u64,
}

impl<T> Debouncer<T> {
    pub fn new(quiet_ms: f64) -> Self {
        Self {
            quiet_ms: quiet_ms.max(0.0),
            pending: None,
            coalesced: 0,
        }
    }

    /// Record a signal; restarts the quiet window.
    pub fn signal(&mut self, now: TimeMs, value: T) {
        if self.pending.is_some() {
            self.coalesced = self.coalesced.saturating_add(1);
        }
        self.pending = Some((now, value));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<TimeMs> {
        self.pending.as_ref().map(|(at, _)| at.offset(self.quiet_ms))
    }

    /// Deliver the latest payload once `quiet_ms` has passed since the last signal.
    pub fn poll(&mut self, now: TimeMs) -> Option<T> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|(at, _)| now.elapsed_since(*at) >= self.quiet_ms);
        if !ready {
            return None;
        }
        self.pending.take().map(|(_, v)| v)
    }

    /// Signals absorbed into a later one since construction.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/debounce.rs"]
mod tests;
