use crate::{
    foundation::core::TargetId,
    foundation::error::{ScrollfxError, ScrollfxResult},
    foundation::math::lerp,
    host::surface::Style,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrubProperty {
    TranslateY,
    Opacity,
}

/// A property driven directly by scroll position (parallax), with no
/// timeline of its own.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrubBinding {
    pub target: TargetId,
    pub start_offset: f64,
    pub end_offset: f64,
    pub from: f64,
    pub to: f64,
    pub property: ScrubProperty,
}

impl ScrubBinding {
    pub fn validate(&self) -> ScrollfxResult<()> {
        let finite = [self.start_offset, self.end_offset, self.from, self.to]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(ScrollfxError::validation("scrub binding values must be finite"));
        }
        if self.end_offset < self.start_offset {
            return Err(ScrollfxError::validation(
                "scrub binding end_offset must be >= start_offset",
            ));
        }
        Ok(())
    }

    pub fn value_at(&self, scroll_offset: f64) -> f64 {
        let span = self.end_offset - self.start_offset;
        let t = if span <= 0.0 {
            if scroll_offset >= self.start_offset { 1.0 } else { 0.0 }
        } else {
            ((scroll_offset - self.start_offset) / span).clamp(0.0, 1.0)
        };
        lerp(self.from, self.to, t)
    }

    pub fn style_at(&self, scroll_offset: f64) -> Style {
        let v = self.value_at(scroll_offset);
        match self.property {
            ScrubProperty::TranslateY => Style {
                translate_y: Some(v),
                ..Style::default()
            },
            ScrubProperty::Opacity => Style {
                opacity: Some(v.clamp(0.0, 1.0)),
                ..Style::default()
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/scrub.rs"]
mod tests;
