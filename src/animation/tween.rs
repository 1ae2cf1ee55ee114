use crate::{animation::ease::Ease, foundation::core::TimeMs, foundation::math::lerp};

/// A single scalar interpolation from `from` to `to` starting at `start`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub start: TimeMs,
    pub duration_ms: f64,
    pub ease: Ease,
}

impl Tween {
    pub fn new(from: f64, to: f64, start: TimeMs, duration_ms: f64, ease: Ease) -> Self {
        let duration_ms = if duration_ms.is_finite() {
            duration_ms.max(0.0)
        } else {
            0.0
        };
        Self {
            from,
            to,
            start,
            duration_ms,
            ease,
        }
    }

    /// Linear progress in `[0, 1]`; zero-length tweens jump straight to 1.
    pub fn progress(&self, now: TimeMs) -> f64 {
        if now < self.start {
            return 0.0;
        }
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (now.elapsed_since(self.start) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, now: TimeMs) -> f64 {
        lerp(self.from, self.to, self.ease.apply(self.progress(now)))
    }

    pub fn is_complete(&self, now: TimeMs) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn end(&self) -> TimeMs {
        self.start.offset(self.duration_ms)
    }
}

/// One animated property of one target, with overwrite semantics: a new
/// instruction replaces the in-flight tween and starts from the value the
/// old tween had reached at that instant.
#[derive(Clone, Debug)]
pub struct TweenSlot {
    resting: f64,
    active: Option<Tween>,
    generation: u64,
}

impl TweenSlot {
    pub fn new(initial: f64) -> Self {
        Self {
            resting: initial,
            active: None,
            generation: 0,
        }
    }

    /// Snap to `value` immediately, discarding any in-flight tween.
    pub fn set(&mut self, value: f64) {
        self.active = None;
        self.resting = value;
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn retarget(&mut self, to: f64, now: TimeMs, duration_ms: f64, ease: Ease) {
        self.retarget_delayed(to, now, 0.0, duration_ms, ease);
    }

    /// Like [`TweenSlot::retarget`], but the new tween holds its start value
    /// for `delay_ms` first.
    pub fn retarget_delayed(
        &mut self,
        to: f64,
        now: TimeMs,
        delay_ms: f64,
        duration_ms: f64,
        ease: Ease,
    ) {
        let from = self.value_at(now);
        if let Some(prev) = self.active {
            tracing::trace!(
                from = prev.to,
                to,
                "tween overwritten before completion"
            );
        }
        self.active = Some(Tween::new(
            from,
            to,
            now.offset(delay_ms.max(0.0)),
            duration_ms,
            ease,
        ));
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn value_at(&self, now: TimeMs) -> f64 {
        match &self.active {
            Some(t) => t.value_at(now),
            None => self.resting,
        }
    }

    /// Final value once every in-flight tween has landed.
    pub fn target(&self) -> f64 {
        self.active.map_or(self.resting, |t| t.to)
    }

    /// Retire a finished tween into the resting value. Returns true when a
    /// tween completed on this call.
    pub fn settle(&mut self, now: TimeMs) -> bool {
        match self.active {
            Some(t) if t.is_complete(now) => {
                self.resting = t.to;
                self.active = None;
                true
            }
            _ => false,
        }
    }

    /// Bumped on every instruction; lets callers detect supersession.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
