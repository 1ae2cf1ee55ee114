use crate::foundation::core::TimeMs;

/// Cancellation token for a scheduled continuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(u64);

#[derive(Clone, Debug)]
struct Entry<A> {
    token: TimerToken,
    due: TimeMs,
    action: A,
}

/// Deferred actions keyed by cancellation token.
///
/// Determinism rule: actions due in the same drain are returned by due time,
/// then by scheduling order.
#[derive(Clone, Debug)]
pub struct Timers<A> {
    next: u64,
    entries: Vec<Entry<A>>,
}

impl<A> Default for Timers<A> {
    fn default() -> Self {
        Self {
            next: 0,
            entries: Vec::new(),
        }
    }
}

impl<A> Timers<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: TimeMs, action: A) -> TimerToken {
        let token = TimerToken(self.next);
        self.next = self.next.wrapping_add(1);
        self.entries.push(Entry { token, due, action });
        token
    }

    /// Returns true if the token was still pending.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.token != token);
        before != self.entries.len()
    }

    /// Cancel and hand back the action, for callers that run it early.
    pub fn take(&mut self, token: TimerToken) -> Option<A> {
        let idx = self.entries.iter().position(|e| e.token == token)?;
        Some(self.entries.remove(idx).action)
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.entries.iter().any(|e| e.token == token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_due(&self) -> Option<TimeMs> {
        self.entries
            .iter()
            .map(|e| e.due)
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }

    pub fn drain_due(&mut self, now: TimeMs) -> Vec<(TimerToken, A)> {
        let (mut due, keep): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|e| e.due <= now);
        self.entries = keep;
        due.sort_by(|a, b| a.due.0.total_cmp(&b.due.0).then(a.token.cmp(&b.token)));
        due.into_iter().map(|e| (e.token, e.action)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/timers.rs"]
mod tests;
