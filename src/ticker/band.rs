//! Seamless infinite ticker bands.
//!
//! Each band renders enough physical copies of its token sequence to cover
//! the viewport, measures exactly one copy once fonts are ready, and drives a
//! constant-speed translation across one copy width. Reaching the end is a
//! pure `Running -> Resetting -> Running` transition that snaps back to the
//! start value; copy 2 is pixel-identical to copy 1, so the snap is invisible.

use std::collections::BTreeMap;

use crate::{
    config::TickerConfig,
    foundation::core::{BandId, TimeMs, Viewport},
    foundation::error::{ScrollfxError, ScrollfxResult},
    foundation::math::fingerprint_tokens,
    host::surface::Surface,
    schedule::{debounce::Debouncer, gate::ReadyGate},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandDirection {
    #[default]
    Left,
    Right,
}

impl BandDirection {
    /// +1 for left-moving bands, -1 for right-moving ones.
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}

/// Immutable band configuration owned by the page.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TickerBandSpec {
    pub tokens: Vec<String>,
    #[serde(default)]
    pub direction: BandDirection,
    #[serde(default)]
    pub outline: bool,
}

impl TickerBandSpec {
    pub fn new<S: Into<String>>(
        tokens: impl IntoIterator<Item = S>,
        direction: BandDirection,
    ) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            direction,
            outline: false,
        }
    }

    pub fn outlined(mut self) -> Self {
        self.outline = true;
        self
    }

    pub fn validate(&self) -> ScrollfxResult<()> {
        if self.tokens.iter().any(|t| t.contains('\n')) {
            return Err(ScrollfxError::validation(
                "ticker tokens must be single-line labels",
            ));
        }
        Ok(())
    }

    pub fn fingerprint(&self) -> u64 {
        fingerprint_tokens(&self.tokens)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum LoopPhase {
    Running,
    Resetting,
}

/// Derived loop parameters. Recomputed wholesale, never patched.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TickerLoopState {
    pub measured_unit_width_px: f64,
    pub loop_duration_ms: f64,
    pub phase: LoopPhase,
    pub direction: BandDirection,
    pub loop_start: TimeMs,
    pub iteration: u64,
    pub copies: usize,
}

impl TickerLoopState {
    pub fn new(
        unit_width: f64,
        direction: BandDirection,
        now: TimeMs,
        viewport: Viewport,
        config: &TickerConfig,
    ) -> Self {
        let raw_ms = unit_width / config.speed_px_per_sec * 1000.0;
        let loop_duration_ms = raw_ms.max(config.min_loop_duration_ms);
        Self {
            measured_unit_width_px: unit_width,
            loop_duration_ms,
            phase: LoopPhase::Running,
            direction,
            loop_start: now,
            iteration: 0,
            copies: copies_for(
                unit_width,
                viewport.width,
                config.min_copies,
                config.max_copies,
            ),
        }
    }

    pub fn start_x(&self) -> f64 {
        match self.direction {
            BandDirection::Left => 0.0,
            BandDirection::Right => -self.measured_unit_width_px,
        }
    }

    pub fn end_x(&self) -> f64 {
        match self.direction {
            BandDirection::Left => -self.measured_unit_width_px,
            BandDirection::Right => 0.0,
        }
    }

    /// Linear (no easing) translation at `now`.
    pub fn translate_x(&self, now: TimeMs) -> f64 {
        let elapsed = now.elapsed_since(self.loop_start);
        let t = (elapsed % self.loop_duration_ms) / self.loop_duration_ms;
        self.start_x() + (self.end_x() - self.start_x()) * t
    }

    /// Apply every loop reset due by `now`; returns how many wrapped.
    pub fn advance(&mut self, now: TimeMs) -> u64 {
        let elapsed = now.elapsed_since(self.loop_start);
        if elapsed < self.loop_duration_ms {
            return 0;
        }
        self.phase = LoopPhase::Resetting;
        let d = self.loop_duration_ms;
        let mut wraps = (elapsed / d).floor().max(1.0);
        // Division can land one ulp either side of a whole loop count;
        // settle it against absolute times instead.
        if self.loop_start.offset((wraps + 1.0) * d) <= now {
            wraps += 1.0;
        } else if wraps > 1.0 && self.loop_start.offset(wraps * d) > now {
            wraps -= 1.0;
        }
        self.loop_start = self.loop_start.offset(wraps * self.loop_duration_ms);
        self.iteration = self.iteration.saturating_add(wraps as u64);
        self.phase = LoopPhase::Running;
        wraps as u64
    }
}

/// Copies needed so the track always overflows the viewport by one unit,
/// bounded to `[max(min_copies, 2), max_copies]`.
pub fn copies_for(
    unit_width: f64,
    viewport_width: f64,
    min_copies: usize,
    max_copies: usize,
) -> usize {
    let min_copies = min_copies.max(2);
    let max_copies = max_copies.max(min_copies);
    if unit_width <= 0.0 || !unit_width.is_finite() || !viewport_width.is_finite() {
        return min_copies;
    }
    // Stay in f64 until clamped: near-zero widths cover the viewport
    // with an unbounded count.
    let cover = (viewport_width.max(0.0) / unit_width).ceil() + 1.0;
    if cover >= max_copies as f64 {
        tracing::debug!(unit_width, viewport_width, max_copies, "copy count capped");
        return max_copies;
    }
    (cover as usize).clamp(min_copies, max_copies)
}

/// Why a band currently has no running loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum IdleReason {
    AwaitingFonts,
    NoTokens,
    ZeroWidth,
    Unmounted,
}

#[derive(Clone, Debug)]
struct Band {
    spec: TickerBandSpec,
    fingerprint: u64,
    state: Result<TickerLoopState, IdleReason>,
    generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LoopReset {
    pub band: BandId,
    pub wraps: u64,
    pub iteration: u64,
}

#[derive(Debug)]
pub struct TickerEngine {
    config: TickerConfig,
    bands: BTreeMap<BandId, Band>,
    fonts: ReadyGate<BandId>,
    resize: Debouncer<Viewport>,
}

impl TickerEngine {
    pub fn new(config: TickerConfig) -> Self {
        let resize = Debouncer::new(config.resize_debounce_ms);
        Self {
            config,
            bands: BTreeMap::new(),
            fonts: ReadyGate::new(),
            resize,
        }
    }

    pub fn fonts_ready(&self) -> bool {
        self.fonts.is_open()
    }

    pub fn mount(
        &mut self,
        id: BandId,
        spec: TickerBandSpec,
        now: TimeMs,
        surface: &dyn Surface,
    ) -> ScrollfxResult<()> {
        spec.validate()?;
        let fingerprint = spec.fingerprint();
        self.bands.insert(
            id,
            Band {
                spec,
                fingerprint,
                state: Err(IdleReason::AwaitingFonts),
                generation: 0,
            },
        );
        if let Some(id) = self.fonts.wait(id) {
            self.remeasure(id, now, surface);
        }
        Ok(())
    }

    pub fn unmount(&mut self, id: BandId) -> bool {
        self.bands.remove(&id).is_some()
    }

    /// Replace a band's tokens. The loop restarts only when the token set
    /// changes identity.
    pub fn set_tokens(
        &mut self,
        id: BandId,
        tokens: Vec<String>,
        now: TimeMs,
        surface: &dyn Surface,
    ) -> bool {
        let fingerprint = fingerprint_tokens(&tokens);
        let Some(band) = self.bands.get_mut(&id) else {
            return false;
        };
        if band.fingerprint == fingerprint {
            return false;
        }
        band.spec.tokens = tokens;
        band.fingerprint = fingerprint;
        if self.fonts.is_open() {
            self.remeasure(id, now, surface);
        }
        true
    }

    /// One-time font readiness; measures every band that was waiting.
    pub fn on_fonts_ready(&mut self, now: TimeMs, surface: &dyn Surface) {
        for id in self.fonts.open(now) {
            self.remeasure(id, now, surface);
        }
    }

    /// Debounced: the remeasure happens on the first `step` after the quiet period.
    pub fn on_resize(&mut self, now: TimeMs, viewport: Viewport) {
        self.resize.signal(now, viewport);
    }

    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// Discard the band's loop and rebuild it from a fresh measurement.
    #[tracing::instrument(skip(self, surface))]
    pub fn remeasure(&mut self, id: BandId, now: TimeMs, surface: &dyn Surface) {
        let Some(band) = self.bands.get_mut(&id) else {
            return;
        };
        band.generation = band.generation.wrapping_add(1);

        if !self.fonts.is_open() {
            band.state = Err(IdleReason::AwaitingFonts);
            return;
        }
        if band.spec.tokens.is_empty() {
            tracing::debug!(?id, "band has no tokens; loop skipped");
            band.state = Err(IdleReason::NoTokens);
            return;
        }
        let Some(width) = surface.unit_width(id) else {
            tracing::trace!(?id, "band unmounted before measurement");
            band.state = Err(IdleReason::Unmounted);
            return;
        };
        if !width.is_finite() || width <= 0.0 {
            tracing::debug!(?id, width, "zero-width band; loop skipped");
            band.state = Err(IdleReason::ZeroWidth);
            return;
        }

        let state =
            TickerLoopState::new(width, band.spec.direction, now, surface.viewport(), &self.config);
        if state.loop_duration_ms > width / self.config.speed_px_per_sec * 1000.0 {
            tracing::debug!(?id, width, "loop duration clamped to floor");
        }
        tracing::debug!(
            ?id,
            width,
            duration_ms = state.loop_duration_ms,
            copies = state.copies,
            "ticker loop (re)started"
        );
        band.state = Ok(state);
    }

    pub fn remeasure_all(&mut self, now: TimeMs, surface: &dyn Surface) {
        let ids: Vec<BandId> = self.bands.keys().copied().collect();
        for id in ids {
            self.remeasure(id, now, surface);
        }
    }

    /// Fire a settled resize, then apply loop resets due by `now`.
    pub fn step(&mut self, now: TimeMs, surface: &dyn Surface) -> Vec<LoopReset> {
        if let Some(viewport) = self.resize.poll(now) {
            tracing::debug!(width = viewport.width, "resize settled; remeasuring bands");
            self.remeasure_all(now, surface);
        }

        let mut resets = Vec::new();
        for (id, band) in &mut self.bands {
            if let Ok(state) = &mut band.state {
                let wraps = state.advance(now);
                if wraps > 0 {
                    resets.push(LoopReset {
                        band: *id,
                        wraps,
                        iteration: state.iteration,
                    });
                }
            }
        }
        resets
    }

    pub fn loop_state(&self, id: BandId) -> Option<&TickerLoopState> {
        self.bands.get(&id).and_then(|b| b.state.as_ref().ok())
    }

    pub fn idle_reason(&self, id: BandId) -> Option<IdleReason> {
        self.bands.get(&id).and_then(|b| b.state.err())
    }

    pub fn spec(&self, id: BandId) -> Option<&TickerBandSpec> {
        self.bands.get(&id).map(|b| &b.spec)
    }

    /// Bumped on every restart; one loop per band, never stacked.
    pub fn generation(&self, id: BandId) -> Option<u64> {
        self.bands.get(&id).map(|b| b.generation)
    }

    pub fn translate_x(&self, id: BandId, now: TimeMs) -> Option<f64> {
        self.loop_state(id).map(|s| s.translate_x(now))
    }

    /// The rendered token sequence: `copies` back-to-back repetitions.
    pub fn rendered_tokens(&self, id: BandId) -> Vec<&str> {
        let Some(band) = self.bands.get(&id) else {
            return Vec::new();
        };
        let copies = band
            .state
            .as_ref()
            .map_or(self.config.min_copies.max(2), |s| s.copies);
        std::iter::repeat_n(band.spec.tokens.iter(), copies)
            .flatten()
            .map(String::as_str)
            .collect()
    }

    pub fn band_ids(&self) -> impl Iterator<Item = BandId> + '_ {
        self.bands.keys().copied()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ticker/band.rs"]
mod tests;
