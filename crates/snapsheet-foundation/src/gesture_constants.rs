//! Shared gesture thresholds.
//!
//! Values are in logical pixels (and logical pixels per second). Hosts with
//! very dense touch screens may want to scale them by the device density.

/// Distance a pointer must travel from its press position before a drag starts.
///
/// Matches Android's `ViewConfiguration.TOUCH_SLOP` of 8dp.
pub const DRAG_THRESHOLD: f32 = 8.0;

/// Release velocity above which a sheet release counts as a fling and moves
/// to the next snap in the direction of travel.
pub const MIN_FLING_VELOCITY: f32 = 300.0;

/// Cap applied to tracked release velocities.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;

/// Scroll offsets closer than this to a bound count as being at the bound.
pub const SCROLL_EPSILON: f32 = 0.5;
