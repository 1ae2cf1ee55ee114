//! Scripted host timelines replayed against a [`SimSurface`].

use std::{cell::RefCell, collections::BTreeMap, path::Path, rc::Rc};

use crate::{
    config::MotionConfig,
    foundation::core::{BandId, TargetId, Theme, TimeMs, Viewport},
    foundation::error::{ScrollfxError, ScrollfxResult},
    host::sim::{BandLayout, SimSurface},
    reveal::scrub::ScrubBinding,
    reveal::trigger::{RevealMotion, RevealPolicy, RevealSpec, Threshold},
    stage::{BandTargets, FrameReport, MotionStage},
    ticker::band::TickerBandSpec,
    transition::choreographer::{Destination, NavigationIntent, TransitionRequest},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioBand {
    pub id: BandId,
    #[serde(flatten)]
    pub spec: TickerBandSpec,
    pub targets: BandTargets,
    pub layout: BandLayout,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioElement {
    pub target: TargetId,
    pub top: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioReveal {
    pub target: TargetId,
    #[serde(default)]
    pub trigger: Option<TargetId>,
    #[serde(default)]
    pub threshold: Option<Threshold>,
    #[serde(default)]
    pub policy: RevealPolicy,
    #[serde(default)]
    pub motion: Option<RevealMotion>,
    #[serde(default)]
    pub delay_ms: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ScenarioStep {
    Frame {
        at_ms: f64,
        /// Omitted: keep the current offset (e.g. after a commanded scroll).
        #[serde(default)]
        scroll: Option<f64>,
    },
    Resize {
        at_ms: f64,
        width: f64,
        height: f64,
    },
    FontsReady {
        at_ms: f64,
    },
    Menu {
        open: bool,
    },
    Navigate {
        at_ms: f64,
        #[serde(default)]
        theme: Theme,
        destination: Destination,
    },
    Revealed {
        at_ms: f64,
    },
    Unmount {
        target: TargetId,
    },
    UnmountBand {
        band: BandId,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: MotionConfig,
    pub viewport: Viewport,
    #[serde(default)]
    pub bands: Vec<ScenarioBand>,
    #[serde(default)]
    pub nav: Option<TargetId>,
    #[serde(default)]
    pub elements: Vec<ScenarioElement>,
    #[serde(default)]
    pub sections: BTreeMap<String, f64>,
    #[serde(default)]
    pub reveals: Vec<ScenarioReveal>,
    #[serde(default)]
    pub scrubs: Vec<ScrubBinding>,
    pub steps: Vec<ScenarioStep>,
}

/// Everything a replay produced.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ScenarioRun {
    pub frames: Vec<FrameReport>,
    pub transition_requests: Vec<TransitionRequest>,
    pub routes: Vec<String>,
    pub commanded_scrolls: Vec<f64>,
}

impl Scenario {
    pub fn from_json_str(s: &str) -> ScrollfxResult<Self> {
        let scenario: Self = serde_json::from_str(s)
            .map_err(|e| ScrollfxError::serde(format!("scenario: {e}")))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ScrollfxResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            ScrollfxError::Other(
                anyhow::Error::new(e).context(format!("read scenario '{}'", path.display())),
            )
        })?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> ScrollfxResult<()> {
        self.config.validate()?;
        Viewport::new(self.viewport.width, self.viewport.height)?;

        let mut last = f64::NEG_INFINITY;
        for (i, step) in self.steps.iter().enumerate() {
            let Some(at) = step.at_ms() else { continue };
            if !at.is_finite() || at < last {
                return Err(ScrollfxError::validation(format!(
                    "steps[{i}]: at_ms must be finite and non-decreasing"
                )));
            }
            last = at;
        }
        for band in &self.bands {
            band.spec.validate()?;
        }
        for scrub in &self.scrubs {
            scrub.validate()?;
        }
        Ok(())
    }

    /// Replay every step. Fonts start unloaded, as on a cold page load.
    #[tracing::instrument(skip(self), fields(steps = self.steps.len()))]
    pub fn run(&self) -> ScrollfxResult<ScenarioRun> {
        let mut surface = SimSurface::new(self.viewport).with_breakpoint(self.config.breakpoint);
        for band in &self.bands {
            surface.add_band(band.id, band.layout);
            surface.mount(band.targets.track);
            surface.mount(band.targets.wrapper);
        }
        for el in &self.elements {
            surface.add_element(el.target, el.top);
        }
        for (id, offset) in &self.sections {
            surface.add_section(id.clone(), *offset);
        }

        let mut stage = MotionStage::new(self.config.clone())?;
        let requests = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&requests);
        stage.subscribe_transitions(move |r| sink.borrow_mut().push(*r));

        for band in &self.bands {
            stage.mount_band(band.id, band.spec.clone(), band.targets, TimeMs::ZERO, &surface)?;
        }
        if let Some(nav) = self.nav {
            surface.mount(nav);
            stage.mount_nav(nav, TimeMs::ZERO);
        }
        for r in &self.reveals {
            let mut spec = stage.default_reveal(r.target, r.policy)?;
            spec.trigger = r.trigger;
            spec.delay_ms = r.delay_ms;
            if let Some(t) = r.threshold {
                spec.threshold = t;
            }
            if let Some(m) = r.motion {
                spec.motion = m;
            }
            stage.register_reveal(spec)?;
        }
        for scrub in &self.scrubs {
            stage.bind_scrub(*scrub)?;
        }

        let mut frames = Vec::new();
        for step in &self.steps {
            match step {
                ScenarioStep::Frame { at_ms, scroll } => {
                    if let Some(offset) = scroll {
                        surface.set_scroll(*offset);
                    }
                    frames.push(stage.frame(TimeMs(*at_ms), &mut surface));
                }
                ScenarioStep::Resize {
                    at_ms,
                    width,
                    height,
                } => {
                    let viewport = Viewport::new(*width, *height)?;
                    surface.set_viewport(viewport);
                    stage.resize(TimeMs(*at_ms), viewport);
                }
                ScenarioStep::FontsReady { at_ms } => {
                    surface.set_fonts_loaded(true);
                    stage.fonts_ready(TimeMs(*at_ms), &surface);
                }
                ScenarioStep::Menu { open } => stage.set_menu_open(*open),
                ScenarioStep::Navigate {
                    at_ms,
                    theme,
                    destination,
                } => {
                    let intent = NavigationIntent {
                        destination: destination.clone(),
                        theme: *theme,
                    };
                    stage.navigate(intent, TimeMs(*at_ms), &mut surface);
                }
                ScenarioStep::Revealed { at_ms } => {
                    stage.transition_revealed(TimeMs(*at_ms), &mut surface);
                }
                ScenarioStep::Unmount { target } => surface.unmount(*target),
                ScenarioStep::UnmountBand { band } => {
                    stage.unmount_band(*band);
                    surface.remove_band(*band);
                }
            }
        }

        let transition_requests = requests.borrow().clone();
        Ok(ScenarioRun {
            frames,
            transition_requests,
            routes: surface.routes().to_vec(),
            commanded_scrolls: surface.commanded_scrolls().to_vec(),
        })
    }
}

impl ScenarioStep {
    fn at_ms(&self) -> Option<f64> {
        match self {
            Self::Frame { at_ms, .. }
            | Self::Resize { at_ms, .. }
            | Self::FontsReady { at_ms }
            | Self::Navigate { at_ms, .. }
            | Self::Revealed { at_ms } => Some(*at_ms),
            Self::Menu { .. } | Self::Unmount { .. } | Self::UnmountBand { .. } => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/scenario.rs"]
mod tests;
