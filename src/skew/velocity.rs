use crate::{
    animation::tween::TweenSlot,
    config::SkewConfig,
    foundation::core::{BandId, TimeMs},
    host::surface::Style,
    telemetry::scroll::{ScrollObserver, ScrollSample},
    ticker::band::BandDirection,
};

/// Skew (degrees) for a velocity, bounded to `±max_skew_deg`. Right-moving
/// bands flip the sign so every band leans into the scroll.
pub fn skew_for_velocity(velocity: f64, direction: BandDirection, config: &SkewConfig) -> f64 {
    if velocity.is_nan() {
        return 0.0;
    }
    let max = config.max_skew_deg.abs();
    let raw = (velocity / config.scale_factor).clamp(-max, max);
    raw * direction.sign()
}

/// Momentum skew for one band's wrapper, independent of its translation loop.
#[derive(Clone, Debug)]
pub struct VelocitySkew {
    band: BandId,
    direction: BandDirection,
    config: SkewConfig,
    slot: TweenSlot,
    samples: u64,
}

impl VelocitySkew {
    pub fn new(band: BandId, direction: BandDirection, config: SkewConfig) -> Self {
        Self {
            band,
            direction,
            config,
            slot: TweenSlot::new(0.0),
            samples: 0,
        }
    }

    pub fn band(&self) -> BandId {
        self.band
    }

    pub fn skew_deg(&self, now: TimeMs) -> f64 {
        self.slot.value_at(now)
    }

    pub fn target_deg(&self) -> f64 {
        self.slot.target()
    }

    pub fn samples_seen(&self) -> u64 {
        self.samples
    }

    pub fn wrapper_style(&self, now: TimeMs) -> Style {
        Style::skew_x(self.skew_deg(now))
    }

    pub fn settle(&mut self, now: TimeMs) {
        self.slot.settle(now);
    }
}

impl ScrollObserver for VelocitySkew {
    fn on_sample(&mut self, sample: &ScrollSample) {
        self.samples += 1;
        let target = skew_for_velocity(sample.velocity, self.direction, &self.config);
        if target == self.slot.target() {
            return;
        }
        // Replace, don't queue: the new target starts from wherever the
        // previous tween had got to.
        self.slot.retarget(
            target,
            sample.timestamp,
            self.config.smoothing_ms,
            self.config.ease,
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/skew/velocity.rs"]
mod tests;
