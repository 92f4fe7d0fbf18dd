//! Release planning: where a released sheet goes and how long it takes.
//!
//! Velocities here are in logical px/s with positive values pointing toward
//! a taller sheet, which is the opposite sign of screen-space drag deltas.

use snapsheet_animation::{AnimationSpec, Easing, FlingCalculator};
use snapsheet_foundation::gesture_constants::{MAX_FLING_VELOCITY, MIN_FLING_VELOCITY};

use crate::error::SheetError;
use crate::state::EXTENT_EPSILON;

/// Thresholds and physics used when the sheet or its content is released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingConfig {
    /// Releases slower than this settle at the nearest snap.
    pub min_fling_velocity: f32,
    /// Estimated and host-reported velocities are capped to this.
    pub max_fling_velocity: f32,
    pub density: f32,
    pub friction: f32,
    /// Shortest settle animation after a fling.
    pub min_duration_millis: u64,
    /// Multiplier on the time the sheet would need at release velocity.
    pub fling_duration_scale: f32,
    /// Shortest slow settle, as a fraction of the base duration.
    pub min_settle_fraction: f32,
}

impl Default for FlingConfig {
    fn default() -> Self {
        Self {
            min_fling_velocity: MIN_FLING_VELOCITY,
            max_fling_velocity: MAX_FLING_VELOCITY,
            density: 1.0,
            friction: FlingCalculator::DEFAULT_FRICTION,
            min_duration_millis: 80,
            fling_duration_scale: 2.0,
            min_settle_fraction: 0.25,
        }
    }
}

impl FlingConfig {
    pub fn with_min_fling_velocity(mut self, velocity: f32) -> Self {
        self.min_fling_velocity = velocity;
        self
    }

    pub fn with_max_fling_velocity(mut self, velocity: f32) -> Self {
        self.max_fling_velocity = velocity;
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_min_duration_millis(mut self, millis: u64) -> Self {
        self.min_duration_millis = millis;
        self
    }

    pub fn calculator(&self) -> FlingCalculator {
        FlingCalculator::new(self.friction, self.density)
    }

    /// A zero velocity is never a fling, whatever the threshold.
    pub fn is_fling(&self, velocity: f32) -> bool {
        velocity.is_finite() && velocity != 0.0 && velocity.abs() >= self.min_fling_velocity
    }

    /// Caps `velocity` to `max_fling_velocity`; non-finite input becomes 0.
    pub fn clamp_velocity(&self, velocity: f32) -> f32 {
        if velocity.is_finite() {
            velocity.clamp(-self.max_fling_velocity, self.max_fling_velocity)
        } else {
            0.0
        }
    }

    pub(crate) fn validate(&self) -> Result<(), SheetError> {
        let positive = |value: f32| value.is_finite() && value > 0.0;
        if !positive(self.min_fling_velocity) {
            return Err(SheetError::Fling("min_fling_velocity must be positive"));
        }
        if !positive(self.max_fling_velocity) || self.max_fling_velocity < self.min_fling_velocity
        {
            return Err(SheetError::Fling(
                "max_fling_velocity must be positive and not below min_fling_velocity",
            ));
        }
        if !positive(self.density) || !positive(self.friction) {
            return Err(SheetError::Fling("density and friction must be positive"));
        }
        if !positive(self.fling_duration_scale) {
            return Err(SheetError::Fling("fling_duration_scale must be positive"));
        }
        if !(self.min_settle_fraction.is_finite()
            && (0.0..=1.0).contains(&self.min_settle_fraction))
        {
            return Err(SheetError::Fling("min_settle_fraction must be within 0.0..=1.0"));
        }
        Ok(())
    }

    /// Extent the sheet would coast to if nothing stopped it.
    pub fn projected_extent(&self, extent: f32, velocity: f32, available_height: f32) -> f32 {
        if available_height <= 0.0 {
            return extent;
        }
        let distance = self.calculator().fling_distance(velocity) / available_height;
        extent + distance * velocity.signum()
    }
}

/// Closest snap to `extent`. `snaps` must not be empty.
pub fn nearest_snap(snaps: &[f32], extent: f32) -> f32 {
    snaps
        .iter()
        .copied()
        .min_by(|a, b| (a - extent).abs().total_cmp(&(b - extent).abs()))
        .unwrap_or(extent)
}

/// Snap a sheet released at `extent` with `velocity` settles at.
///
/// Slow releases pick the nearest snap. Fast ones pick, among the snaps
/// strictly in the direction of travel, the one closest to where a free
/// fling would stop, so a hard flick can skip snaps and a gentle one still
/// reaches the next.
pub fn fling_target(
    snaps: &[f32],
    extent: f32,
    velocity: f32,
    available_height: f32,
    config: &FlingConfig,
) -> f32 {
    if !config.is_fling(velocity) {
        return nearest_snap(snaps, extent);
    }
    let projected = config.projected_extent(extent, velocity, available_height);
    let ahead = snaps.iter().copied().filter(|snap| {
        if velocity > 0.0 {
            *snap > extent + EXTENT_EPSILON
        } else {
            *snap < extent - EXTENT_EPSILON
        }
    });
    ahead
        .min_by(|a, b| (a - projected).abs().total_cmp(&(b - projected).abs()))
        .unwrap_or_else(|| nearest_snap(snaps, extent))
}

/// Resting extent when snapping is disabled.
pub fn free_target(
    extent: f32,
    velocity: f32,
    available_height: f32,
    config: &FlingConfig,
    lower: f32,
    upper: f32,
) -> f32 {
    let target = if config.is_fling(velocity) {
        config.projected_extent(extent, velocity, available_height)
    } else {
        extent
    };
    target.clamp(lower.min(upper), upper)
}

/// Tween for a settle covering `distance` (in extent units).
///
/// A fling settles roughly as fast as the finger was moving, bounded by
/// `min_duration_millis` and `base_millis`, and decelerates into place.
/// Anything else takes a share of `base_millis` proportional to the part of
/// `range` it covers.
pub fn settle_spec(
    distance: f32,
    velocity: f32,
    available_height: f32,
    range: f32,
    base_millis: u64,
    config: &FlingConfig,
) -> AnimationSpec {
    let distance = distance.abs();
    let base = base_millis as f32;
    let min = (config.min_duration_millis as f32).min(base);
    if config.is_fling(velocity) && available_height > 0.0 {
        let millis =
            distance * available_height / velocity.abs() * 1000.0 * config.fling_duration_scale;
        return AnimationSpec::tween(
            millis.clamp(min, base).round() as u64,
            Easing::LinearOutSlowIn,
        );
    }
    let fraction = if range > EXTENT_EPSILON {
        (distance / range).clamp(config.min_settle_fraction, 1.0)
    } else {
        1.0
    };
    let millis = (base * fraction).max(min);
    AnimationSpec::tween(millis.round() as u64, Easing::FastOutSlowIn)
}

#[cfg(test)]
#[path = "tests/fling_tests.rs"]
mod tests;
