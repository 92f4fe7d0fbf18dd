//! Fling decay physics.
//!
//! Distances and durations follow the Android `Scroller` spline so flings
//! feel the same as native lists. Velocities are in pixels per second.

use std::sync::LazyLock;

const INFLECTION: f32 = 0.35;
const START_TENSION: f32 = 0.5;
const END_TENSION: f32 = 1.0;
const P1: f32 = START_TENSION * INFLECTION;
const P2: f32 = 1.0 - END_TENSION * (1.0 - INFLECTION);

const NB_SAMPLES: usize = 100;

const GRAVITY_EARTH: f32 = 9.80665;
const INCHES_PER_METER: f32 = 39.37;
/// `ln(0.78) / ln(0.9)`
const DECELERATION_RATE: f64 = 2.358_201_6;

/// Normalized distance travelled at each of `NB_SAMPLES + 1` evenly spaced times.
static SPLINE_POSITIONS: LazyLock<[f32; NB_SAMPLES + 1]> = LazyLock::new(|| {
    let mut positions = [0.0f32; NB_SAMPLES + 1];
    let mut x_min = 0.0f32;
    for (i, slot) in positions.iter_mut().enumerate().take(NB_SAMPLES) {
        let alpha = i as f32 / NB_SAMPLES as f32;
        let mut x_max = 1.0f32;
        loop {
            let x = x_min + (x_max - x_min) / 2.0;
            let coef = 3.0 * x * (1.0 - x);
            let tx = coef * ((1.0 - x) * P1 + x * P2) + x * x * x;
            if (tx - alpha).abs() < 1e-5 {
                *slot = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;
                break;
            }
            if tx > alpha {
                x_max = x;
            } else {
                x_min = x;
            }
        }
    }
    positions[NB_SAMPLES] = 1.0;
    positions
});

/// Distance and velocity coefficients of the spline at a normalized time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineSample {
    pub distance: f32,
    pub velocity: f32,
}

pub fn spline_sample(time: f32) -> SplineSample {
    let time = time.clamp(0.0, 1.0);
    let index = (NB_SAMPLES as f32 * time) as usize;
    if index >= NB_SAMPLES {
        return SplineSample {
            distance: 1.0,
            velocity: 0.0,
        };
    }
    let t_inf = index as f32 / NB_SAMPLES as f32;
    let t_sup = (index + 1) as f32 / NB_SAMPLES as f32;
    let d_inf = SPLINE_POSITIONS[index];
    let d_sup = SPLINE_POSITIONS[index + 1];
    let velocity = (d_sup - d_inf) / (t_sup - t_inf);
    SplineSample {
        distance: d_inf + (time - t_inf) * velocity,
        velocity,
    }
}

/// Total distance and duration of a fling started at `initial_velocity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingInfo {
    pub initial_velocity: f32,
    /// Unsigned distance in pixels.
    pub distance: f32,
    pub duration_millis: u64,
}

impl FlingInfo {
    /// Signed offset from the fling origin after `time_ms`.
    pub fn offset_at(&self, time_ms: u64) -> f32 {
        self.distance
            * self.initial_velocity.signum()
            * spline_sample(self.fraction(time_ms)).distance
    }

    /// Signed velocity in px/s after `time_ms`.
    pub fn velocity_at(&self, time_ms: u64) -> f32 {
        if self.duration_millis == 0 {
            return 0.0;
        }
        spline_sample(self.fraction(time_ms)).velocity
            * self.initial_velocity.signum()
            * self.distance
            / self.duration_millis as f32
            * 1000.0
    }

    pub fn is_finished(&self, time_ms: u64) -> bool {
        time_ms >= self.duration_millis
    }

    fn fraction(&self, time_ms: u64) -> f32 {
        if self.duration_millis == 0 {
            1.0
        } else {
            time_ms as f32 / self.duration_millis as f32
        }
    }
}

/// Turns a release velocity into fling distance and duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingCalculator {
    friction: f32,
    physical_coefficient: f32,
}

impl FlingCalculator {
    /// Android `ViewConfiguration.getScrollFriction()`.
    pub const DEFAULT_FRICTION: f32 = 0.015;

    /// `density` is the logical-to-physical pixel ratio of the screen.
    pub fn new(friction: f32, density: f32) -> Self {
        Self {
            friction,
            physical_coefficient: GRAVITY_EARTH * INCHES_PER_METER * density * 160.0 * 0.84,
        }
    }

    pub fn with_density(density: f32) -> Self {
        Self::new(Self::DEFAULT_FRICTION, density)
    }

    fn spline_deceleration(&self, velocity: f32) -> f64 {
        (INFLECTION as f64 * velocity.abs() as f64
            / (self.friction * self.physical_coefficient) as f64)
            .ln()
    }

    pub fn fling_duration_millis(&self, velocity: f32) -> u64 {
        if velocity == 0.0 || !velocity.is_finite() {
            return 0;
        }
        let l = self.spline_deceleration(velocity);
        (1000.0 * (l / (DECELERATION_RATE - 1.0)).exp()).max(0.0) as u64
    }

    /// Unsigned distance in pixels a fling at `velocity` travels before stopping.
    pub fn fling_distance(&self, velocity: f32) -> f32 {
        if velocity == 0.0 || !velocity.is_finite() {
            return 0.0;
        }
        let l = self.spline_deceleration(velocity);
        self.friction
            * self.physical_coefficient
            * (DECELERATION_RATE / (DECELERATION_RATE - 1.0) * l).exp() as f32
    }

    pub fn fling_info(&self, velocity: f32) -> FlingInfo {
        FlingInfo {
            initial_velocity: velocity,
            distance: self.fling_distance(velocity),
            duration_millis: self.fling_duration_millis(velocity),
        }
    }
}

impl Default for FlingCalculator {
    fn default() -> Self {
        Self::with_density(1.0)
    }
}

/// A running decay from a fixed origin, sampled by frame time.
///
/// Like tweens, the first sample anchors the start time.
#[derive(Debug, Clone)]
pub struct FlingDecay {
    origin: f32,
    info: FlingInfo,
    start_time_nanos: Option<u64>,
}

impl FlingDecay {
    pub fn new(origin: f32, velocity: f32, calculator: FlingCalculator) -> Self {
        Self {
            origin,
            info: calculator.fling_info(velocity),
            start_time_nanos: None,
        }
    }

    pub fn origin(&self) -> f32 {
        self.origin
    }

    pub fn info(&self) -> FlingInfo {
        self.info
    }

    /// Where the decay comes to rest.
    pub fn target(&self) -> f32 {
        self.origin + self.info.distance * self.info.initial_velocity.signum()
    }

    /// Returns the value at `frame_time_nanos` and whether the decay is done.
    pub fn sample(&mut self, frame_time_nanos: u64) -> (f32, bool) {
        let start = *self.start_time_nanos.get_or_insert(frame_time_nanos);
        let time_ms = frame_time_nanos.saturating_sub(start) / 1_000_000;
        let finished = self.info.is_finished(time_ms);
        let value = if finished {
            self.target()
        } else {
            self.origin + self.info.offset_at(time_ms)
        };
        (value, finished)
    }
}
