//! Per-element delay offsets for batched entrance animations.
//!
//! Invariants: zero items yield an empty vec, the first offset is always
//! zero, and offsets are non-decreasing.

use crate::animation::ease::Ease;

/// How delay offsets are distributed across a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum StaggerMode {
    /// `offset[i] = i * each_ms`.
    #[default]
    Linear,
    /// Total span `(count - 1) * each_ms`, distributed along an easing curve.
    Eased { ease: Ease },
}

pub fn stagger_offsets(count: usize, each_ms: f64, mode: StaggerMode) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let each_ms = if each_ms.is_finite() { each_ms.max(0.0) } else { 0.0 };
    if count == 1 {
        return vec![0.0];
    }

    match mode {
        StaggerMode::Linear => (0..count).map(|i| i as f64 * each_ms).collect(),
        StaggerMode::Eased { ease } => {
            let span = each_ms * (count - 1) as f64;
            (0..count)
                .map(|i| span * ease.apply(i as f64 / (count - 1) as f64))
                .collect()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/stagger.rs"]
mod tests;
