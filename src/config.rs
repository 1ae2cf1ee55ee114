//! Tunable constants for every component, loadable from JSON.
//!
//! The visual constants (skew scale, grace interval, smoothing windows) are
//! hand-tuned values; they live here rather than in the components.

use std::path::Path;

use crate::{
    animation::{ease::Ease, stagger::StaggerMode},
    foundation::core::Breakpoint,
    foundation::error::{ScrollfxError, ScrollfxResult},
    reveal::trigger::RevealMotion,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub telemetry: TelemetryConfig,
    pub ticker: TickerConfig,
    pub skew: SkewConfig,
    pub nav: NavConfig,
    pub reveal: RevealConfig,
    pub transition: TransitionConfig,
    /// Shared narrow-viewport threshold (px).
    pub breakpoint: Breakpoint,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Time constant of the exponential velocity smoother.
    pub velocity_smoothing_ms: f64,
    /// Upper bound on how long a commanded scroll suppresses telemetry.
    pub commanded_scroll_timeout_ms: f64,
    /// Distance from the commanded target at which suppression ends.
    pub commanded_scroll_epsilon_px: f64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            velocity_smoothing_ms: 100.0,
            commanded_scroll_timeout_ms: 1500.0,
            commanded_scroll_epsilon_px: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    pub speed_px_per_sec: f64,
    pub resize_debounce_ms: f64,
    /// Physical copies rendered at minimum; more are added on wide viewports.
    pub min_copies: usize,
    /// Ceiling on rendered copies, reached only by near-empty bands.
    pub max_copies: usize,
    /// Floor for degenerate (near-empty) bands.
    pub min_loop_duration_ms: f64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            speed_px_per_sec: 100.0,
            resize_debounce_ms: 200.0,
            min_copies: 4,
            max_copies: 64,
            min_loop_duration_ms: 50.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SkewConfig {
    /// Velocity (px/s) per degree of skew.
    pub scale_factor: f64,
    pub max_skew_deg: f64,
    pub smoothing_ms: f64,
    pub ease: Ease,
}

impl Default for SkewConfig {
    fn default() -> Self {
        Self {
            scale_factor: 300.0,
            max_skew_deg: 5.0,
            smoothing_ms: 500.0,
            ease: Ease::Power3Out,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub hide_threshold_px: f64,
    /// Vertical offset of the bar while hidden (negative is up).
    pub hidden_offset_px: f64,
    pub transition_ms: f64,
    pub transition_ease: Ease,
    /// Start offset of the one-time entry slide.
    pub entry_offset_px: f64,
    pub entry_duration_ms: f64,
    pub entry_ease: Ease,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            hide_threshold_px: 50.0,
            hidden_offset_px: -100.0,
            transition_ms: 400.0,
            transition_ease: Ease::Power3Out,
            entry_offset_px: -100.0,
            entry_duration_ms: 1000.0,
            entry_ease: Ease::Power3Out,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Fraction of viewport height used when a registration gives none.
    pub default_threshold: f64,
    pub batch_stagger_ms: f64,
    pub batch_stagger_mode: StaggerMode,
    pub motion: RevealMotion,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            default_threshold: 0.9,
            batch_stagger_ms: 100.0,
            batch_stagger_mode: StaggerMode::Linear,
            motion: RevealMotion::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub grace_ms: f64,
    /// Wait for the overlay's reveal acknowledgment instead of the fixed grace timer.
    pub wait_for_reveal: bool,
    /// Fallback deadline while waiting for an acknowledgment.
    pub reveal_timeout_ms: f64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            grace_ms: 200.0,
            wait_for_reveal: false,
            reveal_timeout_ms: 1000.0,
        }
    }
}

fn require_positive(v: f64, field: &str) -> ScrollfxResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(ScrollfxError::config(format!(
            "{field} must be finite and > 0"
        )));
    }
    Ok(())
}

fn require_non_negative(v: f64, field: &str) -> ScrollfxResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(ScrollfxError::config(format!(
            "{field} must be finite and >= 0"
        )));
    }
    Ok(())
}

impl MotionConfig {
    pub fn from_json_str(s: &str) -> ScrollfxResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| ScrollfxError::serde(format!("motion config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ScrollfxResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            ScrollfxError::Other(anyhow::Error::new(e).context(format!(
                "read motion config '{}'",
                path.display()
            )))
        })?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> ScrollfxResult<()> {
        let t = &self.telemetry;
        require_positive(t.velocity_smoothing_ms, "telemetry.velocity_smoothing_ms")?;
        require_non_negative(
            t.commanded_scroll_timeout_ms,
            "telemetry.commanded_scroll_timeout_ms",
        )?;
        require_non_negative(
            t.commanded_scroll_epsilon_px,
            "telemetry.commanded_scroll_epsilon_px",
        )?;

        let k = &self.ticker;
        require_positive(k.speed_px_per_sec, "ticker.speed_px_per_sec")?;
        require_non_negative(k.resize_debounce_ms, "ticker.resize_debounce_ms")?;
        require_positive(k.min_loop_duration_ms, "ticker.min_loop_duration_ms")?;
        if k.min_copies < 2 {
            return Err(ScrollfxError::config("ticker.min_copies must be >= 2"));
        }
        if k.max_copies < k.min_copies {
            return Err(ScrollfxError::config(
                "ticker.max_copies must be >= ticker.min_copies",
            ));
        }

        let s = &self.skew;
        require_positive(s.scale_factor, "skew.scale_factor")?;
        require_non_negative(s.max_skew_deg, "skew.max_skew_deg")?;
        if s.max_skew_deg >= 90.0 {
            return Err(ScrollfxError::config("skew.max_skew_deg must be < 90"));
        }
        require_non_negative(s.smoothing_ms, "skew.smoothing_ms")?;

        let n = &self.nav;
        require_non_negative(n.hide_threshold_px, "nav.hide_threshold_px")?;
        if !n.hidden_offset_px.is_finite() || !n.entry_offset_px.is_finite() {
            return Err(ScrollfxError::config("nav offsets must be finite"));
        }
        require_non_negative(n.transition_ms, "nav.transition_ms")?;
        require_non_negative(n.entry_duration_ms, "nav.entry_duration_ms")?;

        let r = &self.reveal;
        if !r.default_threshold.is_finite() || !(0.0..=1.0).contains(&r.default_threshold) {
            return Err(ScrollfxError::config(
                "reveal.default_threshold must be within [0, 1]",
            ));
        }
        require_non_negative(r.batch_stagger_ms, "reveal.batch_stagger_ms")?;
        r.motion.validate()?;

        let x = &self.transition;
        require_non_negative(x.grace_ms, "transition.grace_ms")?;
        require_non_negative(x.reveal_timeout_ms, "transition.reveal_timeout_ms")?;

        require_positive(self.breakpoint.0, "breakpoint")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
