//! scrollfx is a headless, scroll-synchronized animation orchestration layer.
//!
//! It turns a stream of host frames (scroll offset, viewport, font and
//! mount state) into style writes against a [`Surface`]:
//!
//! 1. **Telemetry**: `scroll offset + time -> ScrollSample`, fanned out to
//!    every subscriber before any animation steps.
//! 2. **Ticker bands**: seamless constant-speed loops, measured once fonts
//!    are ready and remeasured after a debounced resize.
//! 3. **Velocity skew** and **nav visibility**: scroll observers with
//!    overwrite-on-retarget tweens.
//! 4. **Reveals**: intersection-gated entrances, one-shot or reversible.
//! 5. **Transitions**: themed route changes gated by a grace interval,
//!    bypassed on narrow viewports.
//!
//! [`MotionStage`] runs these in a fixed per-frame order. Nothing in the
//! frame path fails: unmounted targets and degenerate measurements are
//! skipped silently. Errors only surface from configuration and setup.
#![forbid(unsafe_code)]

mod animation;
mod config;
mod foundation;
mod host;
mod nav;
mod reveal;
mod scenario;
mod schedule;
mod skew;
mod stage;
mod telemetry;
mod ticker;
mod transition;

pub use animation::ease::Ease;
pub use animation::stagger::{StaggerMode, stagger_offsets};
pub use animation::tween::{Tween, TweenSlot};
pub use config::{
    MotionConfig, NavConfig, RevealConfig, SkewConfig, TelemetryConfig, TickerConfig,
    TransitionConfig,
};
pub use foundation::core::{
    Affine, BandId, Breakpoint, NARROW_VIEWPORT_PX, ScrollDirection, TargetId, Theme, TimeMs,
    Vec2, Viewport,
};
pub use foundation::error::{ScrollfxError, ScrollfxResult};
pub use host::sim::{BandLayout, SimSurface};
pub use host::surface::{Style, Surface};
pub use nav::visibility::{NavState, NavVisibility, NavVisibilityController};
pub use reveal::scrub::{ScrubBinding, ScrubProperty};
pub use reveal::trigger::{
    RevealEvent, RevealEventKind, RevealId, RevealMotion, RevealPolicy, RevealRegistration,
    RevealSpec, RevealState, RevealTrigger, Threshold,
};
pub use scenario::{
    Scenario, ScenarioBand, ScenarioElement, ScenarioReveal, ScenarioRun, ScenarioStep,
};
pub use schedule::debounce::Debouncer;
pub use schedule::gate::ReadyGate;
pub use schedule::timers::{TimerToken, Timers};
pub use skew::velocity::{VelocitySkew, skew_for_velocity};
pub use stage::{BandFrame, BandTargets, FrameReport, MotionStage};
pub use telemetry::scroll::{ScrollObserver, ScrollSample, ScrollTelemetry, SubscriptionId};
pub use ticker::band::{
    BandDirection, IdleReason, LoopPhase, LoopReset, TickerBandSpec, TickerEngine,
    TickerLoopState, copies_for,
};
pub use transition::choreographer::{
    Destination, ListenerId, NavigationIntent, RequestOutcome, TransitionBus,
    TransitionChoreographer, TransitionRequest,
};
