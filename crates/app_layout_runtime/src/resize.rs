//! Resize handle math shared by pointer drags and keyboard steps.

use serde::{Deserialize, Serialize};

use crate::model::{PointerPosition, ResizeSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Orientation of a resizable panel.
pub enum ResizeAxis {
    /// Panel docked on the right edge; width grows leftwards.
    Side,
    /// Panel docked at the bottom; height grows upwards.
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Keys handled by a focused resize handle.
pub enum ResizeKey {
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Jump to the minimum size.
    Home,
    /// Jump to the maximum size.
    End,
}

/// Clamps `value` into `[min, max]`.
///
/// Returns `None` for an inverted range, in which case no resize may happen.
pub fn clamp_size(value: f64, min: f64, max: f64) -> Option<f64> {
    if !(min.is_finite() && max.is_finite() && value.is_finite()) || max < min {
        return None;
    }
    Some(value.clamp(min, max))
}

/// Percentage of the resizable range covered by `current`, for `aria-valuenow`.
///
/// A degenerate range yields `0.0` so `NaN` never reaches the accessibility tree.
pub fn relative_size(current: f64, min: f64, max: f64) -> f64 {
    if !(min.is_finite() && max.is_finite() && current.is_finite()) || max <= min {
        return 0.0;
    }
    let clamped = current.clamp(min, max);
    (clamped - min) / (max - min) * 100.0
}

/// Signed step for `key`, or `None` when the key does not apply to `axis`.
fn step_direction(key: ResizeKey, axis: ResizeAxis) -> Option<f64> {
    match (axis, key) {
        (ResizeAxis::Side, ResizeKey::ArrowLeft | ResizeKey::ArrowUp) => Some(1.0),
        (ResizeAxis::Side, ResizeKey::ArrowRight | ResizeKey::ArrowDown) => Some(-1.0),
        (ResizeAxis::Bottom, ResizeKey::ArrowUp) => Some(1.0),
        (ResizeAxis::Bottom, ResizeKey::ArrowDown) => Some(-1.0),
        (ResizeAxis::Bottom, ResizeKey::ArrowLeft | ResizeKey::ArrowRight) => None,
        (_, ResizeKey::Home | ResizeKey::End) => Some(0.0),
    }
}

/// New size after a key press, or `None` when nothing changes.
pub fn keyboard_resize(
    current: f64,
    key: ResizeKey,
    axis: ResizeAxis,
    step: f64,
    min: f64,
    max: f64,
) -> Option<f64> {
    let direction = step_direction(key, axis)?;
    let requested = match key {
        ResizeKey::Home => min,
        ResizeKey::End => max,
        _ => current + direction * step,
    };
    clamp_size(requested, min, max)
}

impl ResizeSession {
    /// Unclamped size for the current pointer position.
    pub fn size_at(&self, pointer: PointerPosition) -> f64 {
        match self.axis {
            ResizeAxis::Side => self.size_start + (self.pointer_start.x - pointer.x),
            ResizeAxis::Bottom => self.size_start + (self.pointer_start.y - pointer.y),
        }
    }
}
