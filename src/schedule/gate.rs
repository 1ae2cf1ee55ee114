use crate::foundation::core::TimeMs;

/// One-time readiness signal. Waiters registered before it opens are
/// released exactly once; waiters registered afterwards pass straight through.
#[derive(Clone, Debug)]
pub struct ReadyGate<W> {
    opened_at: Option<TimeMs>,
    waiters: Vec<W>,
}

impl<W> Default for ReadyGate<W> {
    fn default() -> Self {
        Self {
            opened_at: None,
            waiters: Vec::new(),
        }
    }
}

impl<W> ReadyGate<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.opened_at.is_some()
    }

    pub fn opened_at(&self) -> Option<TimeMs> {
        self.opened_at
    }

    /// Returns the waiter back when the gate is already open.
    pub fn wait(&mut self, waiter: W) -> Option<W> {
        if self.is_open() {
            Some(waiter)
        } else {
            self.waiters.push(waiter);
            None
        }
    }

    /// Opens the gate and hands back the queued waiters. Later calls are no-ops.
    pub fn open(&mut self, now: TimeMs) -> Vec<W> {
        if self.is_open() {
            return Vec::new();
        }
        self.opened_at = Some(now);
        std::mem::take(&mut self.waiters)
    }

    pub fn pending(&self) -> usize {
        self.waiters.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/gate.rs"]
mod tests;
