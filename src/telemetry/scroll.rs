//! Per-frame scroll sampling and synchronous fan-out to observers.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::{
    config::TelemetryConfig,
    foundation::core::{ScrollDirection, TimeMs},
};

/// One frame's view of the document scroll position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollSample {
    pub offset: f64,
    /// Smoothed rate of change, px/s (positive when scrolling down).
    pub velocity: f64,
    pub direction: ScrollDirection,
    pub timestamp: TimeMs,
}

/// Receives every published sample. Implementations only record targets;
/// animation stepping happens after the fan-out completes.
pub trait ScrollObserver {
    fn on_sample(&mut self, sample: &ScrollSample);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
struct CommandedScroll {
    target: f64,
    until: TimeMs,
}

pub struct ScrollTelemetry {
    config: TelemetryConfig,
    prev: Option<ScrollSample>,
    subscribers: Vec<(SubscriptionId, Weak<RefCell<dyn ScrollObserver>>)>,
    next_id: u64,
    commanded: Option<CommandedScroll>,
}

impl std::fmt::Debug for ScrollTelemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollTelemetry")
            .field("prev", &self.prev)
            .field("subscribers", &self.subscribers.len())
            .field("commanded", &self.commanded)
            .finish()
    }
}

impl ScrollTelemetry {
    pub fn new(config: TelemetryConfig) -> Self {
        Self {
            config,
            prev: None,
            subscribers: Vec::new(),
            next_id: 0,
            commanded: None,
        }
    }

    /// Register an observer. Only a weak reference is held: an observer that
    /// is dropped without unsubscribing is skipped and pruned on next publish.
    pub fn subscribe<O: ScrollObserver + 'static>(
        &mut self,
        observer: &Rc<RefCell<O>>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let weak = Rc::downgrade(observer);
        let weak: Weak<RefCell<dyn ScrollObserver>> = weak;
        self.subscribers.push((id, weak));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn latest(&self) -> Option<&ScrollSample> {
        self.prev.as_ref()
    }

    /// Mark an upcoming programmatic scroll so it is not read as user input.
    pub fn begin_commanded_scroll(&mut self, target: f64, now: TimeMs) {
        tracing::debug!(target, "commanded scroll: telemetry suppressed");
        self.commanded = Some(CommandedScroll {
            target,
            until: now.offset(self.config.commanded_scroll_timeout_ms),
        });
    }

    pub fn is_suppressed(&self) -> bool {
        self.commanded.is_some()
    }

    /// Derive the sample for this frame without publishing it.
    pub fn sample(&mut self, offset: f64, now: TimeMs) -> ScrollSample {
        let offset = if offset.is_finite() { offset } else { 0.0 };

        let suppressed = match self.commanded {
            Some(cmd) => {
                let arrived =
                    (offset - cmd.target).abs() <= self.config.commanded_scroll_epsilon_px;
                if arrived || now >= cmd.until {
                    tracing::debug!(offset, arrived, "commanded scroll finished");
                    self.commanded = None;
                }
                true
            }
            None => false,
        };

        let sample = match self.prev {
            None => ScrollSample {
                offset,
                velocity: 0.0,
                direction: ScrollDirection::None,
                timestamp: now,
            },
            Some(_) if suppressed => ScrollSample {
                offset,
                velocity: 0.0,
                direction: ScrollDirection::None,
                timestamp: now,
            },
            Some(prev) => {
                let delta = offset - prev.offset;
                let dt_ms = now.elapsed_since(prev.timestamp);
                let velocity = if dt_ms > 0.0 {
                    let raw = delta / (dt_ms / 1000.0);
                    let alpha = 1.0 - (-dt_ms / self.config.velocity_smoothing_ms).exp();
                    prev.velocity + alpha * (raw - prev.velocity)
                } else {
                    prev.velocity
                };
                ScrollSample {
                    offset,
                    velocity,
                    direction: ScrollDirection::from_delta(delta),
                    timestamp: now,
                }
            }
        };

        self.prev = Some(sample);
        sample
    }

    /// Deliver `sample` to every live subscriber, in subscription order.
    /// Returns the number of observers reached.
    pub fn publish(&mut self, sample: &ScrollSample) -> usize {
        let mut delivered = 0;
        self.subscribers.retain(|(id, weak)| {
            let Some(observer) = weak.upgrade() else {
                tracing::trace!(?id, "dropping subscriber whose target was torn down");
                return false;
            };
            match observer.try_borrow_mut() {
                Ok(mut o) => {
                    o.on_sample(sample);
                    delivered += 1;
                }
                Err(_) => tracing::trace!(?id, "subscriber busy; sample skipped"),
            }
            true
        });
        delivered
    }

    /// Sample and publish in one scheduling turn.
    pub fn tick(&mut self, offset: f64, now: TimeMs) -> ScrollSample {
        let sample = self.sample(offset, now);
        self.publish(&sample);
        sample
    }
}

#[cfg(test)]
#[path = "../../tests/unit/telemetry/scroll.rs"]
mod tests;
