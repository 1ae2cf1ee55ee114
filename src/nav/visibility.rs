//! Direction-aware show/hide machine for the fixed navigation bar.
//!
//! `Visible -> Hidden` on a downward sample past the threshold;
//! `Hidden -> Visible` on any upward sample. No transition fires while the
//! bar is locked (overlay menu open).

use crate::{
    animation::tween::TweenSlot,
    config::NavConfig,
    foundation::core::{ScrollDirection, TimeMs},
    host::surface::Style,
    telemetry::scroll::{ScrollObserver, ScrollSample},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NavState {
    #[default]
    Visible,
    Hidden,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NavVisibility {
    pub state: NavState,
    pub locked: bool,
}

#[derive(Clone, Debug)]
pub struct NavVisibilityController {
    config: NavConfig,
    visibility: NavVisibility,
    offset_y: TweenSlot,
    entry_y: TweenSlot,
    entry_opacity: TweenSlot,
    entered: bool,
    transitions: u64,
}

impl NavVisibilityController {
    pub fn new(config: NavConfig) -> Self {
        Self {
            config,
            visibility: NavVisibility::default(),
            offset_y: TweenSlot::new(0.0),
            entry_y: TweenSlot::new(0.0),
            entry_opacity: TweenSlot::new(1.0),
            entered: false,
            transitions: 0,
        }
    }

    /// Start the one-time entry slide. Repeated calls are ignored.
    pub fn mount(&mut self, now: TimeMs) {
        if self.entered {
            return;
        }
        self.entered = true;
        let cfg = &self.config;
        self.entry_y.set(cfg.entry_offset_px);
        self.entry_opacity.set(0.0);
        self.entry_y
            .retarget(0.0, now, cfg.entry_duration_ms, cfg.entry_ease);
        self.entry_opacity
            .retarget(1.0, now, cfg.entry_duration_ms, cfg.entry_ease);
    }

    pub fn visibility(&self) -> NavVisibility {
        self.visibility
    }

    pub fn state(&self) -> NavState {
        self.visibility.state
    }

    pub fn is_locked(&self) -> bool {
        self.visibility.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        if self.visibility.locked != locked {
            tracing::debug!(locked, "nav lock changed");
        }
        self.visibility.locked = locked;
    }

    /// Bring a hidden bar back after a commanded scroll lands within the
    /// hide threshold. Honors the lock. Returns true if a transition started.
    pub fn show_near_top(&mut self, offset: f64, now: TimeMs) -> bool {
        if self.visibility.locked
            || self.visibility.state == NavState::Visible
            || offset > self.config.hide_threshold_px
        {
            return false;
        }
        self.transition(NavState::Visible, now);
        true
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    fn transition(&mut self, to: NavState, now: TimeMs) {
        let target = match to {
            NavState::Visible => 0.0,
            NavState::Hidden => self.config.hidden_offset_px,
        };
        tracing::debug!(from = ?self.visibility.state, ?to, "nav visibility transition");
        self.visibility.state = to;
        self.transitions += 1;
        self.offset_y.retarget(
            target,
            now,
            self.config.transition_ms,
            self.config.transition_ease,
        );
    }

    pub fn translate_y(&self, now: TimeMs) -> f64 {
        self.entry_y.value_at(now) + self.offset_y.value_at(now)
    }

    pub fn opacity(&self, now: TimeMs) -> f64 {
        self.entry_opacity.value_at(now)
    }

    pub fn style(&self, now: TimeMs) -> Style {
        Style {
            translate_y: Some(self.translate_y(now)),
            opacity: Some(self.opacity(now)),
            ..Style::default()
        }
    }

    pub fn settle(&mut self, now: TimeMs) {
        self.entry_y.settle(now);
        self.entry_opacity.settle(now);
        self.offset_y.settle(now);
    }
}

impl ScrollObserver for NavVisibilityController {
    fn on_sample(&mut self, sample: &ScrollSample) {
        if self.visibility.locked {
            return;
        }
        match (self.visibility.state, sample.direction) {
            (NavState::Visible, ScrollDirection::Down)
                if sample.offset > self.config.hide_threshold_px =>
            {
                self.transition(NavState::Hidden, sample.timestamp);
            }
            (NavState::Hidden, ScrollDirection::Up) => {
                self.transition(NavState::Visible, sample.timestamp);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nav/visibility.rs"]
mod tests;
