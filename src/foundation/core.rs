use crate::foundation::error::{ScrollfxError, ScrollfxResult};

pub use kurbo::{Affine, Vec2};

/// Width below which transition choreography is bypassed (md breakpoint).
pub const NARROW_VIEWPORT_PX: f64 = 768.0;

/// Monotonic host clock reading in milliseconds (frame timestamp).
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct TimeMs(pub f64);

impl TimeMs {
    pub const ZERO: Self = Self(0.0);

    pub fn as_millis(self) -> f64 {
        self.0
    }

    /// Milliseconds since `earlier`, saturating at zero.
    pub fn elapsed_since(self, earlier: TimeMs) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    pub fn offset(self, ms: f64) -> TimeMs {
        TimeMs(self.0 + ms)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> ScrollfxResult<Self> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(ScrollfxError::validation(
                "viewport width/height must be finite and >= 0",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn is_narrow(self, breakpoint: Breakpoint) -> bool {
        self.width < breakpoint.0
    }
}

/// The single viewport width threshold shared by every call site.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Breakpoint(pub f64);

impl Default for Breakpoint {
    fn default() -> Self {
        Self(NARROW_VIEWPORT_PX)
    }
}

/// Identifies a ticker band mounted on the surface.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct BandId(pub u32);

/// Identifies any animatable element on the surface.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TargetId(pub u32);

/// Discrete scroll direction derived from consecutive offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScrollDirection {
    Up,
    Down,
    #[default]
    None,
}

impl ScrollDirection {
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            Self::Down
        } else if delta < 0.0 {
            Self::Up
        } else {
            Self::None
        }
    }
}

/// Visual theme carried by a transition request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
