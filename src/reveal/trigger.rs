//! Viewport-intersection reveals.
//!
//! A registration plays its entrance when the trigger element's top edge
//! crosses a line at `threshold * viewport_height` from the top of the
//! viewport. `OneShot` registrations retire after their first completion;
//! `Reversible` ones reverse when the element moves back below the line.

use crate::{
    animation::{
        ease::Ease,
        stagger::{StaggerMode, stagger_offsets},
        tween::TweenSlot,
    },
    foundation::core::{TargetId, TimeMs, Viewport},
    foundation::error::{ScrollfxError, ScrollfxResult},
    foundation::math::lerp,
    host::surface::{Style, Surface},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealPolicy {
    #[default]
    OneShot,
    Reversible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RevealState {
    Pending,
    Playing,
    Done,
    /// Reversing (or reversed) after a backward crossing.
    Hidden,
}

/// Trigger line as a fraction of viewport height, measured from the top.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "ThresholdRepr", into = "f64")]
pub struct Threshold(f64);

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ThresholdRepr {
    Fraction(f64),
    Position(String),
}

impl TryFrom<ThresholdRepr> for Threshold {
    type Error = ScrollfxError;

    fn try_from(repr: ThresholdRepr) -> Result<Self, Self::Error> {
        match repr {
            ThresholdRepr::Fraction(f) => Threshold::new(f),
            ThresholdRepr::Position(s) => Threshold::parse(&s),
        }
    }
}

impl From<Threshold> for f64 {
    fn from(t: Threshold) -> Self {
        t.0
    }
}

impl Threshold {
    pub fn new(fraction: f64) -> ScrollfxResult<Self> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(ScrollfxError::validation(format!(
                "reveal threshold must be within [0, 1], got {fraction}"
            )));
        }
        Ok(Self(fraction))
    }

    /// Parse `"top 90%"`, `"top bottom"`, `"top center"` or `"top top"`.
    pub fn parse(s: &str) -> ScrollfxResult<Self> {
        let mut parts = s.split_whitespace();
        let (Some(edge), Some(line), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ScrollfxError::validation(format!(
                "threshold '{s}' must be '<edge> <viewport line>'"
            )));
        };
        if !edge.eq_ignore_ascii_case("top") {
            return Err(ScrollfxError::validation(format!(
                "threshold '{s}': only the element's top edge is supported"
            )));
        }
        let fraction = match line.to_ascii_lowercase().as_str() {
            "top" => 0.0,
            "center" => 0.5,
            "bottom" => 1.0,
            pct => {
                let n = pct
                    .strip_suffix('%')
                    .and_then(|n| n.parse::<f64>().ok())
                    .ok_or_else(|| {
                        ScrollfxError::validation(format!("threshold '{s}': bad viewport line"))
                    })?;
                n / 100.0
            }
        };
        Self::new(fraction)
    }

    pub fn fraction(self) -> f64 {
        self.0
    }

    /// Whether an element whose top sits at `element_top` (document
    /// coordinates) has passed the trigger line.
    pub fn is_past(self, element_top: f64, scroll_offset: f64, viewport: Viewport) -> bool {
        element_top - scroll_offset <= self.0 * viewport.height
    }
}

/// Resting and initial values of a reveal's animated properties.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RevealMotion {
    pub from_y: f64,
    pub from_opacity: f64,
    pub to_y: f64,
    pub to_opacity: f64,
    pub duration_ms: f64,
    pub ease: Ease,
}

impl Default for RevealMotion {
    fn default() -> Self {
        Self {
            from_y: 40.0,
            from_opacity: 0.0,
            to_y: 0.0,
            to_opacity: 1.0,
            duration_ms: 1000.0,
            ease: Ease::Power3Out,
        }
    }
}

impl RevealMotion {
    /// Visible-to-hidden motion, e.g. a floating button that fades away
    /// once a footer comes into view.
    pub fn hide() -> Self {
        Self {
            from_y: 0.0,
            from_opacity: 1.0,
            to_y: 20.0,
            to_opacity: 0.0,
            duration_ms: 300.0,
            ease: Ease::Power2InOut,
        }
    }

    pub fn validate(&self) -> ScrollfxResult<()> {
        let finite = [self.from_y, self.to_y, self.from_opacity, self.to_opacity]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(ScrollfxError::validation("reveal motion values must be finite"));
        }
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(ScrollfxError::validation(
                "reveal motion duration_ms must be finite and >= 0",
            ));
        }
        Ok(())
    }

    pub fn style_at(&self, progress: f64) -> Style {
        Style {
            translate_y: Some(lerp(self.from_y, self.to_y, progress)),
            opacity: Some(lerp(self.from_opacity, self.to_opacity, progress).clamp(0.0, 1.0)),
            ..Style::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct RevealId(u32);

/// A registration request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealSpec {
    pub target: TargetId,
    /// Element whose crossing starts the reveal; defaults to `target`.
    pub trigger: Option<TargetId>,
    pub threshold: Threshold,
    pub policy: RevealPolicy,
    pub motion: RevealMotion,
    pub delay_ms: f64,
}

impl RevealSpec {
    pub fn new(target: TargetId, threshold: Threshold, policy: RevealPolicy) -> Self {
        Self {
            target,
            trigger: None,
            threshold,
            policy,
            motion: RevealMotion::default(),
            delay_ms: 0.0,
        }
    }

    pub fn with_motion(mut self, motion: RevealMotion) -> Self {
        self.motion = motion;
        self
    }
}

#[derive(Clone, Debug)]
pub struct RevealRegistration {
    pub id: RevealId,
    pub spec: RevealSpec,
    pub state: RevealState,
    progress: TweenSlot,
    was_past: bool,
    retired: bool,
    final_frame_pending: bool,
    plays: u32,
    reverses: u32,
}

impl RevealRegistration {
    pub fn plays(&self) -> u32 {
        self.plays
    }

    pub fn reverses(&self) -> u32 {
        self.reverses
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }

    pub fn progress(&self, now: TimeMs) -> f64 {
        self.progress.value_at(now)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum RevealEventKind {
    Play,
    Reverse,
    Completed,
    Retired,
    /// Target vanished; registration dropped without further writes.
    Unmounted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RevealEvent {
    pub id: RevealId,
    pub target: TargetId,
    pub kind: RevealEventKind,
}

#[derive(Clone, Debug, Default)]
pub struct RevealTrigger {
    registrations: Vec<RevealRegistration>,
    next_id: u32,
}

impl RevealTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, spec: RevealSpec) -> ScrollfxResult<RevealId> {
        spec.motion.validate()?;
        if !spec.delay_ms.is_finite() || spec.delay_ms < 0.0 {
            return Err(ScrollfxError::validation(
                "reveal delay_ms must be finite and >= 0",
            ));
        }
        let id = RevealId(self.next_id);
        self.next_id += 1;
        self.registrations.push(RevealRegistration {
            id,
            spec,
            state: RevealState::Pending,
            progress: TweenSlot::new(0.0),
            was_past: false,
            retired: false,
            final_frame_pending: false,
            plays: 0,
            reverses: 0,
        });
        Ok(id)
    }

    /// Register `targets` against one shared trigger element, staggering
    /// their entrances by `stagger_ms` each (distributed by `stagger_mode`).
    pub fn register_batch(
        &mut self,
        trigger: TargetId,
        targets: &[TargetId],
        threshold: Threshold,
        policy: RevealPolicy,
        motion: RevealMotion,
        stagger_ms: f64,
        stagger_mode: StaggerMode,
    ) -> ScrollfxResult<Vec<RevealId>> {
        let offsets = stagger_offsets(targets.len(), stagger_ms, stagger_mode);
        targets
            .iter()
            .zip(offsets)
            .map(|(&target, delay_ms)| {
                self.register(RevealSpec {
                    target,
                    trigger: Some(trigger),
                    threshold,
                    policy,
                    motion,
                    delay_ms,
                })
            })
            .collect()
    }

    pub fn unregister(&mut self, id: RevealId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        before != self.registrations.len()
    }

    pub fn get(&self, id: RevealId) -> Option<&RevealRegistration> {
        self.registrations.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Evaluate crossings for this frame's scroll offset.
    pub fn evaluate(
        &mut self,
        scroll_offset: f64,
        viewport: Viewport,
        now: TimeMs,
        surface: &dyn Surface,
    ) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        let mut unmounted = Vec::new();

        for reg in self.registrations.iter_mut().filter(|r| !r.retired) {
            let trigger = reg.spec.trigger.unwrap_or(reg.spec.target);
            let Some(top) = surface.element_top(trigger) else {
                tracing::trace!(id = ?reg.id, ?trigger, "reveal trigger unmounted");
                unmounted.push(reg.id);
                events.push(RevealEvent {
                    id: reg.id,
                    target: reg.spec.target,
                    kind: RevealEventKind::Unmounted,
                });
                continue;
            };

            let past = reg.spec.threshold.is_past(top, scroll_offset, viewport);
            let motion = reg.spec.motion;
            let (id, target) = (reg.id, reg.spec.target);
            let mut emit = |kind| events.push(RevealEvent { id, target, kind });

            if past && !reg.was_past && reg.state != RevealState::Playing {
                if reg.state != RevealState::Done {
                    reg.state = RevealState::Playing;
                    reg.plays += 1;
                    reg.progress.retarget_delayed(
                        1.0,
                        now,
                        reg.spec.delay_ms,
                        motion.duration_ms,
                        motion.ease,
                    );
                    emit(RevealEventKind::Play);
                }
            } else if !past
                && reg.was_past
                && reg.spec.policy == RevealPolicy::Reversible
                && matches!(reg.state, RevealState::Playing | RevealState::Done)
            {
                reg.state = RevealState::Hidden;
                reg.reverses += 1;
                reg.progress.retarget(0.0, now, motion.duration_ms, motion.ease);
                emit(RevealEventKind::Reverse);
            }
            reg.was_past = past;

            if reg.progress.settle(now) {
                match reg.state {
                    RevealState::Playing => {
                        reg.state = RevealState::Done;
                        emit(RevealEventKind::Completed);
                        if reg.spec.policy == RevealPolicy::OneShot {
                            reg.retired = true;
                            reg.final_frame_pending = true;
                            emit(RevealEventKind::Retired);
                        }
                    }
                    RevealState::Hidden => reg.state = RevealState::Pending,
                    _ => {}
                }
            }
        }

        if !unmounted.is_empty() {
            self.registrations.retain(|r| !unmounted.contains(&r.id));
        }
        events
    }

    /// Styles to write this frame. Retired registrations contribute one final
    /// resting frame and are then silent.
    pub fn frames(&mut self, now: TimeMs) -> Vec<(TargetId, Style)> {
        let mut out = Vec::new();
        for reg in &mut self.registrations {
            if reg.retired && !reg.final_frame_pending {
                continue;
            }
            reg.final_frame_pending = false;
            out.push((reg.spec.target, reg.spec.motion.style_at(reg.progress.value_at(now))));
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/trigger.rs"]
mod tests;
