use crate::foundation::core::{Affine, BandId, TargetId, Vec2, Viewport};

/// Visual properties written to one target. `None` leaves a property untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Style {
    pub translate_x: Option<f64>,
    pub translate_y: Option<f64>,
    pub skew_x_deg: Option<f64>,
    pub opacity: Option<f64>,
}

impl Style {
    pub fn translate_x(x: f64) -> Self {
        Self {
            translate_x: Some(x),
            ..Self::default()
        }
    }

    pub fn skew_x(deg: f64) -> Self {
        Self {
            skew_x_deg: Some(deg),
            ..Self::default()
        }
    }

    /// Overlay `other` on top of `self`, property by property.
    pub fn merged(self, other: Style) -> Self {
        Self {
            translate_x: other.translate_x.or(self.translate_x),
            translate_y: other.translate_y.or(self.translate_y),
            skew_x_deg: other.skew_x_deg.or(self.skew_x_deg),
            opacity: other.opacity.or(self.opacity),
        }
    }

    /// Canonical order: T(translate) * SkewX.
    pub fn to_affine(self) -> Affine {
        let t = Affine::translate(Vec2::new(
            self.translate_x.unwrap_or(0.0),
            self.translate_y.unwrap_or(0.0),
        ));
        let skew = self
            .skew_x_deg
            .map_or(Affine::IDENTITY, |deg| Affine::skew(deg.to_radians().tan(), 0.0));
        t * skew
    }
}

/// The document the orchestration layer reads from and writes to.
///
/// Reads returning `None` mean the target is not (or no longer) mounted.
pub trait Surface {
    fn scroll_offset(&self) -> f64;

    fn viewport(&self) -> Viewport;

    /// Rendered width of exactly one copy of the band's token sequence.
    fn unit_width(&self, band: BandId) -> Option<f64>;

    /// Top edge of an element in document coordinates.
    fn element_top(&self, target: TargetId) -> Option<f64>;

    /// Document offset of a named in-page section.
    fn section_offset(&self, id: &str) -> Option<f64>;

    fn is_mounted(&self, target: TargetId) -> bool;

    fn apply(&mut self, target: TargetId, style: &Style);

    /// Commanded scroll; the only mutation of scroll position.
    fn scroll_to(&mut self, offset: f64);

    fn navigate(&mut self, route: &str);
}

#[cfg(test)]
#[path = "../../tests/unit/host/surface.rs"]
mod tests;
