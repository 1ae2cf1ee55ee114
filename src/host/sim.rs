use std::{
    cell::Cell,
    collections::{BTreeMap, BTreeSet},
};

use crate::{
    foundation::core::{BandId, Breakpoint, TargetId, Viewport},
    host::surface::{Style, Surface},
};

/// Layout of one band: single-copy width per viewport class.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BandLayout {
    pub unit_px: f64,
    /// Width below the breakpoint (smaller type on narrow viewports).
    #[serde(default)]
    pub narrow_unit_px: Option<f64>,
    /// Width reported while fallback fonts are in use.
    #[serde(default)]
    pub fallback_unit_px: Option<f64>,
}

impl BandLayout {
    pub fn fixed(unit_px: f64) -> Self {
        Self {
            unit_px,
            narrow_unit_px: None,
            fallback_unit_px: None,
        }
    }
}

/// In-memory document used by tests and the scenario runner.
#[derive(Debug)]
pub struct SimSurface {
    scroll: f64,
    viewport: Viewport,
    breakpoint: Breakpoint,
    fonts_loaded: bool,
    bands: BTreeMap<BandId, BandLayout>,
    elements: BTreeMap<TargetId, f64>,
    mounted: BTreeSet<TargetId>,
    sections: BTreeMap<String, f64>,
    styles: BTreeMap<TargetId, Style>,
    routes: Vec<String>,
    commanded_scrolls: Vec<f64>,
    writes: u64,
    measurements: Cell<u64>,
}

impl SimSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            scroll: 0.0,
            viewport,
            breakpoint: Breakpoint::default(),
            fonts_loaded: false,
            bands: BTreeMap::new(),
            elements: BTreeMap::new(),
            mounted: BTreeSet::new(),
            sections: BTreeMap::new(),
            styles: BTreeMap::new(),
            routes: Vec::new(),
            commanded_scrolls: Vec::new(),
            writes: 0,
            measurements: Cell::new(0),
        }
    }

    pub fn with_breakpoint(mut self, breakpoint: Breakpoint) -> Self {
        self.breakpoint = breakpoint;
        self
    }

    pub fn set_scroll(&mut self, offset: f64) {
        self.scroll = offset.max(0.0);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_fonts_loaded(&mut self, loaded: bool) {
        self.fonts_loaded = loaded;
    }

    pub fn add_band(&mut self, band: BandId, layout: BandLayout) {
        self.bands.insert(band, layout);
    }

    pub fn remove_band(&mut self, band: BandId) {
        self.bands.remove(&band);
    }

    /// Mount a plain target (band tracks, wrappers, nav bar).
    pub fn mount(&mut self, target: TargetId) {
        self.mounted.insert(target);
    }

    /// Mount a target positioned at `top` in document coordinates.
    pub fn add_element(&mut self, target: TargetId, top: f64) {
        self.elements.insert(target, top);
        self.mounted.insert(target);
    }

    pub fn unmount(&mut self, target: TargetId) {
        self.mounted.remove(&target);
        self.elements.remove(&target);
    }

    pub fn add_section(&mut self, id: impl Into<String>, offset: f64) {
        self.sections.insert(id.into(), offset);
    }

    pub fn style(&self, target: TargetId) -> Option<Style> {
        self.styles.get(&target).copied()
    }

    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    pub fn commanded_scrolls(&self) -> &[f64] {
        &self.commanded_scrolls
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// How many times a band width was read.
    pub fn measurements(&self) -> u64 {
        self.measurements.get()
    }
}

impl Surface for SimSurface {
    fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn unit_width(&self, band: BandId) -> Option<f64> {
        self.measurements.set(self.measurements.get() + 1);
        let layout = self.bands.get(&band)?;
        if !self.fonts_loaded
            && let Some(w) = layout.fallback_unit_px
        {
            return Some(w);
        }
        if self.viewport.is_narrow(self.breakpoint)
            && let Some(w) = layout.narrow_unit_px
        {
            return Some(w);
        }
        Some(layout.unit_px)
    }

    fn element_top(&self, target: TargetId) -> Option<f64> {
        self.elements.get(&target).copied()
    }

    fn section_offset(&self, id: &str) -> Option<f64> {
        self.sections.get(id).copied()
    }

    fn is_mounted(&self, target: TargetId) -> bool {
        self.mounted.contains(&target)
    }

    fn apply(&mut self, target: TargetId, style: &Style) {
        let prev = self.styles.get(&target).copied().unwrap_or_default();
        self.styles.insert(target, prev.merged(*style));
        self.writes += 1;
    }

    fn scroll_to(&mut self, offset: f64) {
        self.commanded_scrolls.push(offset);
        self.scroll = offset.max(0.0);
    }

    fn navigate(&mut self, route: &str) {
        self.routes.push(route.to_string());
    }
}
