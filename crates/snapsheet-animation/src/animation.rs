//! Time-based tweens with Material easing curves.
//!
//! A [`TweenAnimation`] is a pure value: it does not own a frame callback.
//! Whoever drives it feeds frame times in and applies the sampled value.

use std::time::Duration;

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

impl Lerp for f64 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction as f64
    }
}

/// Easing curves used for sheet and scroll animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    /// No easing.
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Material standard curve. Used for settles that start at rest.
    #[default]
    FastOutSlowIn,
    /// Material decelerate curve. Used when the motion inherits a fling.
    LinearOutSlowIn,
    /// Material accelerate curve.
    FastOutLinearIn,
}

impl Easing {
    /// Apply the easing function to a linear fraction in [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::Linear => fraction.clamp(0.0, 1.0),
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
            Easing::LinearOutSlowIn => cubic_bezier(0.0, 0.0, 0.2, 1.0, fraction),
            Easing::FastOutLinearIn => cubic_bezier(0.4, 0.0, 1.0, 1.0, fraction),
        }
    }
}

/// Evaluates the CSS-style cubic bezier `(0,0) (x1,y1) (x2,y2) (1,1)` at `fraction`.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample = |a: f32, b: f32, c: f32, t: f32| ((a * t + b) * t + c) * t;
    let slope = |t: f32| (3.0 * ax * t + 2.0 * bx) * t + cx;

    // Newton first, bisection when the slope flattens out.
    let mut t = fraction;
    let mut solved = false;
    for _ in 0..8 {
        let error = sample(ax, bx, cx, t) - fraction;
        if error.abs() < 1e-6 {
            solved = true;
            break;
        }
        let dx = slope(t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - error / dx).clamp(0.0, 1.0);
    }

    if !solved {
        let (mut low, mut high) = (0.0f32, 1.0f32);
        t = fraction;
        for _ in 0..16 {
            let error = sample(ax, bx, cx, t) - fraction;
            if error.abs() < 1e-6 {
                break;
            }
            if error > 0.0 {
                high = t;
            } else {
                low = t;
            }
            t = 0.5 * (low + high);
        }
    }

    sample(ay, by, cy, t)
}

/// Duration, easing and optional start delay of a tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub duration_millis: u64,
    pub easing: Easing,
    pub delay_millis: u64,
}

impl AnimationSpec {
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
            delay_millis: 0,
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::Linear)
    }

    pub fn with_delay(mut self, delay_millis: u64) -> Self {
        self.delay_millis = delay_millis;
        self
    }

    /// Same curve, duration multiplied by `factor` (rounded, at least 1 ms
    /// unless it was zero).
    pub fn scaled(mut self, factor: f32) -> Self {
        if self.duration_millis > 0 {
            let scaled = (self.duration_millis as f32 * factor.max(0.0)).round() as u64;
            self.duration_millis = scaled.max(1);
        }
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_millis)
    }

    pub fn total_nanos(&self) -> u64 {
        (self.duration_millis + self.delay_millis) * 1_000_000
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::FastOutSlowIn)
    }
}

/// One sample of a running tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame<T> {
    pub value: T,
    pub finished: bool,
}

/// Interpolates from `start` to `target` along `spec`.
///
/// The first sampled frame anchors the start time, so the first value is
/// always `start` and motion begins on the following frame.
#[derive(Debug, Clone)]
pub struct TweenAnimation<T: Lerp + Clone> {
    start: T,
    target: T,
    spec: AnimationSpec,
    start_time_nanos: Option<u64>,
}

impl<T: Lerp + Clone> TweenAnimation<T> {
    pub fn new(start: T, target: T, spec: AnimationSpec) -> Self {
        Self {
            start,
            target,
            spec,
            start_time_nanos: None,
        }
    }

    pub fn start(&self) -> &T {
        &self.start
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn spec(&self) -> AnimationSpec {
        self.spec
    }

    pub fn has_started(&self) -> bool {
        self.start_time_nanos.is_some()
    }

    pub fn sample(&mut self, frame_time_nanos: u64) -> AnimationFrame<T> {
        let start_time = *self.start_time_nanos.get_or_insert(frame_time_nanos);
        let elapsed_nanos = frame_time_nanos.saturating_sub(start_time);
        let delay_nanos = self.spec.delay_millis * 1_000_000;

        if elapsed_nanos < delay_nanos {
            return AnimationFrame {
                value: self.start.clone(),
                finished: false,
            };
        }

        if self.spec.duration_millis == 0 {
            return AnimationFrame {
                value: self.target.clone(),
                finished: true,
            };
        }

        let duration_nanos = self.spec.duration_millis * 1_000_000;
        let linear = ((elapsed_nanos - delay_nanos) as f64 / duration_nanos as f64).clamp(0.0, 1.0)
            as f32;
        if linear >= 1.0 {
            return AnimationFrame {
                value: self.target.clone(),
                finished: true,
            };
        }

        let progress = self.spec.easing.transform(linear);
        AnimationFrame {
            value: self.start.lerp(&self.target, progress),
            finished: false,
        }
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
