//! Per-frame orchestration over a [`Surface`].
//!
//! Frame order: telemetry fan-out, due transition timers, ticker loops
//! (including a settled resize), reveal crossings, then style writes. Every
//! write is preceded by an existence check; writes to unmounted targets are
//! skipped and counted, never reported as errors.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use crate::{
    config::MotionConfig,
    foundation::core::{Affine, BandId, TargetId, TimeMs, Viewport},
    foundation::error::ScrollfxResult,
    host::surface::{Style, Surface},
    nav::visibility::{NavVisibility, NavVisibilityController},
    reveal::scrub::ScrubBinding,
    reveal::trigger::{RevealEvent, RevealId, RevealPolicy, RevealSpec, RevealTrigger, Threshold},
    skew::velocity::VelocitySkew,
    telemetry::scroll::{ScrollSample, ScrollTelemetry, SubscriptionId},
    ticker::band::{LoopReset, TickerBandSpec, TickerEngine},
    transition::choreographer::{
        Destination, ListenerId, NavigationIntent, RequestOutcome, TransitionChoreographer,
        TransitionRequest,
    },
};

/// DOM targets of one band: the translated track and the skewed wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BandTargets {
    pub track: TargetId,
    pub wrapper: TargetId,
}

#[derive(Debug)]
struct BandRig {
    targets: BandTargets,
    skew: Rc<RefCell<VelocitySkew>>,
    subscription: SubscriptionId,
}

#[derive(Debug)]
struct NavRig {
    target: TargetId,
    controller: Rc<RefCell<NavVisibilityController>>,
    subscription: SubscriptionId,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct BandFrame {
    pub band: BandId,
    pub translate_x: Option<f64>,
    pub skew_deg: f64,
    /// Wrapper skew composed over the track translation.
    pub transform: Affine,
}

/// What happened during one [`MotionStage::frame`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameReport {
    pub at_ms: f64,
    pub sample: ScrollSample,
    pub nav: Option<NavVisibility>,
    pub bands: Vec<BandFrame>,
    pub loop_resets: Vec<LoopReset>,
    pub reveal_events: Vec<RevealEvent>,
    /// Navigations executed since the previous frame, including immediate ones.
    pub navigations: Vec<Destination>,
    /// Deadline of a navigation still waiting out its grace interval.
    pub pending_navigation_at: Option<TimeMs>,
    pub writes: u32,
    pub skipped_writes: u32,
}

impl FrameReport {
    fn new(sample: ScrollSample) -> Self {
        Self {
            at_ms: sample.timestamp.as_millis(),
            sample,
            nav: None,
            bands: Vec::new(),
            loop_resets: Vec::new(),
            reveal_events: Vec::new(),
            navigations: Vec::new(),
            pending_navigation_at: None,
            writes: 0,
            skipped_writes: 0,
        }
    }

    fn write(&mut self, surface: &mut dyn Surface, target: TargetId, style: Style) {
        if !surface.is_mounted(target) {
            tracing::trace!(?target, "target unmounted; write skipped");
            self.skipped_writes += 1;
            return;
        }
        surface.apply(target, &style);
        self.writes += 1;
    }
}

#[derive(Debug)]
pub struct MotionStage {
    config: MotionConfig,
    telemetry: ScrollTelemetry,
    ticker: TickerEngine,
    bands: BTreeMap<BandId, BandRig>,
    nav: Option<NavRig>,
    reveals: RevealTrigger,
    scrubs: Vec<ScrubBinding>,
    transitions: TransitionChoreographer,
    executed: Vec<Destination>,
    /// Outlives any one nav controller so remounts stay locked.
    menu_open: bool,
}

impl MotionStage {
    pub fn new(config: MotionConfig) -> ScrollfxResult<Self> {
        config.validate()?;
        Ok(Self {
            telemetry: ScrollTelemetry::new(config.telemetry.clone()),
            ticker: TickerEngine::new(config.ticker.clone()),
            transitions: TransitionChoreographer::new(
                config.transition.clone(),
                config.breakpoint,
            ),
            bands: BTreeMap::new(),
            nav: None,
            reveals: RevealTrigger::new(),
            scrubs: Vec::new(),
            executed: Vec::new(),
            menu_open: false,
            config,
        })
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn telemetry(&self) -> &ScrollTelemetry {
        &self.telemetry
    }

    pub fn ticker(&self) -> &TickerEngine {
        &self.ticker
    }

    pub fn reveals(&self) -> &RevealTrigger {
        &self.reveals
    }

    pub fn transitions(&self) -> &TransitionChoreographer {
        &self.transitions
    }

    pub fn nav_visibility(&self) -> Option<NavVisibility> {
        self.nav.as_ref().map(|n| n.controller.borrow().visibility())
    }

    pub fn skew_deg(&self, band: BandId, now: TimeMs) -> Option<f64> {
        self.bands.get(&band).map(|r| r.skew.borrow().skew_deg(now))
    }

    /// Mount (or remount) a band: starts its loop once fonts are ready and
    /// subscribes its wrapper skew to scroll telemetry.
    pub fn mount_band(
        &mut self,
        id: BandId,
        spec: TickerBandSpec,
        targets: BandTargets,
        now: TimeMs,
        surface: &dyn Surface,
    ) -> ScrollfxResult<()> {
        let direction = spec.direction;
        self.ticker.mount(id, spec, now, surface)?;
        if let Some(old) = self.bands.remove(&id) {
            self.telemetry.unsubscribe(old.subscription);
        }
        let skew = Rc::new(RefCell::new(VelocitySkew::new(
            id,
            direction,
            self.config.skew.clone(),
        )));
        let subscription = self.telemetry.subscribe(&skew);
        self.bands.insert(
            id,
            BandRig {
                targets,
                skew,
                subscription,
            },
        );
        Ok(())
    }

    pub fn unmount_band(&mut self, id: BandId) -> bool {
        let Some(rig) = self.bands.remove(&id) else {
            return false;
        };
        self.telemetry.unsubscribe(rig.subscription);
        self.ticker.unmount(id)
    }

    pub fn set_band_tokens(
        &mut self,
        id: BandId,
        tokens: Vec<String>,
        now: TimeMs,
        surface: &dyn Surface,
    ) -> bool {
        self.ticker.set_tokens(id, tokens, now, surface)
    }

    /// Mount the navigation bar and play its entry animation.
    pub fn mount_nav(&mut self, target: TargetId, now: TimeMs) {
        if let Some(old) = self.nav.take() {
            self.telemetry.unsubscribe(old.subscription);
        }
        let mut nav = NavVisibilityController::new(self.config.nav.clone());
        nav.set_locked(self.menu_open);
        nav.mount(now);
        let controller = Rc::new(RefCell::new(nav));
        let subscription = self.telemetry.subscribe(&controller);
        self.nav = Some(NavRig {
            target,
            controller,
            subscription,
        });
    }

    pub fn set_menu_open(&mut self, open: bool) {
        self.menu_open = open;
        if let Some(nav) = &self.nav {
            nav.controller.borrow_mut().set_locked(open);
        }
    }

    pub fn resize(&mut self, now: TimeMs, viewport: Viewport) {
        self.ticker.on_resize(now, viewport);
    }

    pub fn fonts_ready(&mut self, now: TimeMs, surface: &dyn Surface) {
        self.ticker.on_fonts_ready(now, surface);
    }

    pub fn register_reveal(&mut self, spec: RevealSpec) -> ScrollfxResult<RevealId> {
        self.reveals.register(spec)
    }

    /// Batch registration with the configured motion and stagger.
    pub fn register_reveal_batch(
        &mut self,
        trigger: TargetId,
        targets: &[TargetId],
        threshold: Option<Threshold>,
        policy: RevealPolicy,
    ) -> ScrollfxResult<Vec<RevealId>> {
        let threshold = match threshold {
            Some(t) => t,
            None => Threshold::new(self.config.reveal.default_threshold)?,
        };
        self.reveals.register_batch(
            trigger,
            targets,
            threshold,
            policy,
            self.config.reveal.motion,
            self.config.reveal.batch_stagger_ms,
            self.config.reveal.batch_stagger_mode,
        )
    }

    /// A registration using the configured threshold and motion.
    pub fn default_reveal(
        &self,
        target: TargetId,
        policy: RevealPolicy,
    ) -> ScrollfxResult<RevealSpec> {
        let threshold = Threshold::new(self.config.reveal.default_threshold)?;
        Ok(RevealSpec::new(target, threshold, policy).with_motion(self.config.reveal.motion))
    }

    pub fn bind_scrub(&mut self, binding: ScrubBinding) -> ScrollfxResult<()> {
        binding.validate()?;
        self.scrubs.push(binding);
        Ok(())
    }

    pub fn subscribe_transitions(
        &mut self,
        listener: impl FnMut(&TransitionRequest) + 'static,
    ) -> ListenerId {
        self.transitions.bus_mut().subscribe(listener)
    }

    pub fn unsubscribe_transitions(&mut self, id: ListenerId) -> bool {
        self.transitions.bus_mut().unsubscribe(id)
    }

    /// User navigation. Narrow viewports navigate before this returns.
    pub fn navigate(
        &mut self,
        intent: NavigationIntent,
        now: TimeMs,
        surface: &mut dyn Surface,
    ) -> RequestOutcome {
        let outcome = self.transitions.request(intent, surface.viewport(), now);
        if let RequestOutcome::Immediate(dest) = &outcome {
            self.execute(dest.clone(), now, surface);
        }
        outcome
    }

    /// Overlay reveal acknowledgment.
    pub fn transition_revealed(&mut self, now: TimeMs, surface: &mut dyn Surface) {
        if let Some(dest) = self.transitions.revealed(now) {
            self.execute(dest, now, surface);
        }
    }

    fn execute(&mut self, dest: Destination, now: TimeMs, surface: &mut dyn Surface) {
        match &dest {
            Destination::Route(route) => surface.navigate(route),
            Destination::Section(id) => {
                let Some(offset) = surface.section_offset(id) else {
                    tracing::trace!(section = %id, "section not mounted; navigation dropped");
                    return;
                };
                self.commanded_scroll(offset, now, surface);
            }
            Destination::Top => self.commanded_scroll(0.0, now, surface),
        }
        tracing::debug!(?dest, "navigation executed");
        self.executed.push(dest);
    }

    /// Telemetry ignores the scroll it commanded, so a bar hidden on the
    /// way down is restored here when the target is near the top.
    fn commanded_scroll(&mut self, offset: f64, now: TimeMs, surface: &mut dyn Surface) {
        self.telemetry.begin_commanded_scroll(offset, now);
        surface.scroll_to(offset);
        if let Some(nav) = &self.nav
            && nav.controller.borrow_mut().show_near_top(offset, now)
        {
            tracing::debug!(offset, "nav restored after commanded scroll");
        }
    }

        #[tracing::instrument(level = "trace", skip(self, surface))]
    pub fn frame(&mut self, now: TimeMs, surface: &mut dyn Surface) -> FrameReport {
        let sample = self.telemetry.tick(surface.scroll_offset(), now);
        let mut report = FrameReport::new(sample);

        for dest in self.transitions.poll(now) {
            self.execute(dest, now, surface);
        }
        report.navigations = std::mem::take(&mut self.executed);
        report.pending_navigation_at = self.transitions.deadline();

        report.loop_resets = self.ticker.step(now, surface);
        for reset in &report.loop_resets {
            tracing::trace!(band = ?reset.band, iteration = reset.iteration, "ticker loop reset");
        }

        let viewport = surface.viewport();
        report.reveal_events = self.reveals.evaluate(sample.offset, viewport, now, surface);

        for (&id, rig) in &self.bands {
            let translate_x = self.ticker.translate_x(id, now);
            let track = translate_x.map(Style::translate_x);
            if let Some(style) = track {
                report.write(surface, rig.targets.track, style);
            }
            let mut skew = rig.skew.borrow_mut();
            let wrapper = skew.wrapper_style(now);
            report.write(surface, rig.targets.wrapper, wrapper);
            report.bands.push(BandFrame {
                band: id,
                translate_x,
                skew_deg: skew.skew_deg(now),
                transform: wrapper.to_affine() * track.unwrap_or_default().to_affine(),
            });
            skew.settle(now);
        }

        if let Some(nav) = &self.nav {
            let mut controller = nav.controller.borrow_mut();
            report.write(surface, nav.target, controller.style(now));
            controller.settle(now);
            report.nav = Some(controller.visibility());
        }

        for (target, style) in self.reveals.frames(now) {
            report.write(surface, target, style);
        }
        for scrub in &self.scrubs {
            report.write(surface, scrub.target, scrub.style_at(sample.offset));
        }

        report
    }
}
