//! Themed route transitions.
//!
//! A navigation request is announced on a [`TransitionBus`] so the overlay
//! can cover the viewport, and the navigation itself runs once the grace
//! interval elapses (or the overlay acknowledges its reveal). Narrow
//! viewports skip the whole choreography. At most one request is in flight;
//! a newer one replaces it.

use crate::{
    config::TransitionConfig,
    foundation::core::{Breakpoint, Theme, TimeMs, Viewport},
    schedule::timers::{TimerToken, Timers},
};

/// Where a navigation goes once it executes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum Destination {
    Route(String),
    /// In-page section; becomes a commanded scroll.
    Section(String),
    Top,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NavigationIntent {
    pub destination: Destination,
    #[serde(default)]
    pub theme: Theme,
}

/// Payload published to overlay listeners.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TransitionRequest {
    pub theme: Theme,
    pub requested_at: TimeMs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&TransitionRequest)>;

/// Typed publish/subscribe channel for transition requests.
#[derive(Default)]
pub struct TransitionBus {
    next: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl std::fmt::Debug for TransitionBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl TransitionBus {
    pub fn subscribe(&mut self, listener: impl FnMut(&TransitionRequest) + 'static) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        before != self.listeners.len()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn emit(&mut self, request: &TransitionRequest) {
        for (_, listener) in &mut self.listeners {
            listener(request);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RequestOutcome {
    /// Run now; no transition was announced.
    Immediate(Destination),
    Deferred {
        token: TimerToken,
        execute_at: TimeMs,
    },
}

#[derive(Clone, Copy, Debug)]
struct InFlight {
    token: TimerToken,
    request: TransitionRequest,
}

#[derive(Debug)]
pub struct TransitionChoreographer {
    config: TransitionConfig,
    breakpoint: Breakpoint,
    bus: TransitionBus,
    timers: Timers<Destination>,
    in_flight: Option<InFlight>,
    emitted: u64,
    superseded: u64,
}

impl TransitionChoreographer {
    pub fn new(config: TransitionConfig, breakpoint: Breakpoint) -> Self {
        Self {
            config,
            breakpoint,
            bus: TransitionBus::default(),
            timers: Timers::new(),
            in_flight: None,
            emitted: 0,
            superseded: 0,
        }
    }

    pub fn bus_mut(&mut self) -> &mut TransitionBus {
        &mut self.bus
    }

    #[tracing::instrument(level = "debug", skip(self, intent), fields(theme = ?intent.theme))]
    pub fn request(
        &mut self,
        intent: NavigationIntent,
        viewport: Viewport,
        now: TimeMs,
    ) -> RequestOutcome {
        if let Some(prev) = self.in_flight.take() {
            self.timers.cancel(prev.token);
            self.superseded += 1;
            tracing::debug!(
                requested_at = prev.request.requested_at.as_millis(),
                "pending transition superseded"
            );
        }

        if viewport.is_narrow(self.breakpoint) {
            tracing::debug!(width = viewport.width, "narrow viewport, navigating immediately");
            return RequestOutcome::Immediate(intent.destination);
        }

        let request = TransitionRequest {
            theme: intent.theme,
            requested_at: now,
        };
        self.bus.emit(&request);
        self.emitted += 1;

        let wait = if self.config.wait_for_reveal {
            self.config.reveal_timeout_ms
        } else {
            self.config.grace_ms
        };
        let execute_at = now.offset(wait);
        let token = self.timers.schedule(execute_at, intent.destination);
        self.in_flight = Some(InFlight { token, request });
        RequestOutcome::Deferred { token, execute_at }
    }

    /// Overlay acknowledgment. When configured to wait for it, the pending
    /// navigation runs now instead of at the fallback deadline.
    pub fn revealed(&mut self, now: TimeMs) -> Option<Destination> {
        if !self.config.wait_for_reveal {
            return None;
        }
        let flight = self.in_flight.take()?;
        tracing::debug!(
            waited_ms = now.elapsed_since(flight.request.requested_at),
            "overlay revealed"
        );
        self.timers.take(flight.token)
    }

    /// Navigations whose grace interval has elapsed by `now`.
    pub fn poll(&mut self, now: TimeMs) -> Vec<Destination> {
        let due = self.timers.drain_due(now);
        if let Some(flight) = self.in_flight
            && due.iter().any(|(t, _)| *t == flight.token)
        {
            self.in_flight = None;
        }
        due.into_iter().map(|(_, d)| d).collect()
    }

    /// When the pending navigation runs unless acknowledged sooner.
    pub fn deadline(&self) -> Option<TimeMs> {
        self.timers.next_due()
    }

    pub fn in_flight(&self) -> Option<&TransitionRequest> {
        self.in_flight.as_ref().map(|f| &f.request)
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/choreographer.rs"]
mod tests;
