//! Release velocity estimation for drag gestures.
//!
//! Uses the impulse strategy of Jetpack Compose's `VelocityTracker1D`: the
//! velocity is derived from the kinetic energy the pointer imparted across
//! the recent samples rather than from a least-squares fit.

/// Ring buffer capacity.
const HISTORY_SIZE: usize = 20;

/// Samples older than this (relative to the newest) are ignored.
const HORIZON_MS: u64 = 100;

/// A gap longer than this between two samples means the pointer stopped.
pub const ASSUME_STOPPED_MS: u64 = 40;

#[derive(Clone, Copy, Debug)]
struct Sample {
    time_ms: u64,
    position: f32,
}

/// Tracks absolute pointer positions along one axis.
#[derive(Clone, Debug)]
pub struct VelocityTracker1D {
    samples: [Option<Sample>; HISTORY_SIZE],
    head: usize,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            head: 0,
        }
    }

    pub fn add_position(&mut self, time_ms: u64, position: f32) {
        self.head = (self.head + 1) % HISTORY_SIZE;
        self.samples[self.head] = Some(Sample { time_ms, position });
    }

    /// Velocity in units per second, or 0.0 with fewer than two usable samples.
    pub fn velocity(&self) -> f32 {
        let Some(newest) = self.samples[self.head] else {
            return 0.0;
        };

        // (age relative to newest in ms, position), newest first.
        let mut window: Vec<(f32, f32)> = Vec::with_capacity(HISTORY_SIZE);
        let mut index = self.head;
        let mut previous = newest;
        while let Some(sample) = self.samples[index] {
            let age = newest.time_ms.saturating_sub(sample.time_ms);
            let gap = previous.time_ms.saturating_sub(sample.time_ms);
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            window.push((-(age as f32), sample.position));
            previous = sample;
            if window.len() == HISTORY_SIZE {
                break;
            }
            index = (index + HISTORY_SIZE - 1) % HISTORY_SIZE;
        }

        impulse_velocity(&window) * 1000.0
    }

    /// Velocity clamped to `[-max_velocity, max_velocity]`; NaN becomes 0.
    pub fn velocity_with_max(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }
        let velocity = self.velocity();
        if velocity.is_nan() {
            return 0.0;
        }
        velocity.clamp(-max_velocity, max_velocity)
    }

    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.head = 0;
    }
}

/// `window` is newest first; returns units per millisecond.
fn impulse_velocity(window: &[(f32, f32)]) -> f32 {
    let count = window.len();
    if count < 2 {
        return 0.0;
    }

    let mut work = 0.0f32;
    for i in (1..count).rev() {
        let (older_time, older_position) = window[i];
        let (newer_time, newer_position) = window[i - 1];
        if older_time == newer_time {
            continue;
        }
        let v_curr = (newer_position - older_position) / (newer_time - older_time);
        let v_prev = kinetic_energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == count - 1 {
            work *= 0.5;
        }
    }
    kinetic_energy_to_velocity(work)
}

/// `E = ½·v²` with unit mass.
#[inline]
fn kinetic_energy_to_velocity(kinetic_energy: f32) -> f32 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_single_sample_is_still() {
        let mut tracker = VelocityTracker1D::new();
        assert_eq!(tracker.velocity(), 0.0);
        tracker.add_position(0, 100.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn constant_motion() {
        let mut tracker = VelocityTracker1D::new();
        for step in 0..4u64 {
            tracker.add_position(step * 10, step as f32 * 100.0);
        }
        let velocity = tracker.velocity();
        assert!((velocity - 10_000.0).abs() < 1_000.0, "got {velocity}");
    }

    #[test]
    fn upward_motion_is_negative() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_position(0, 300.0);
        tracker.add_position(10, 200.0);
        tracker.add_position(20, 100.0);
        assert!(tracker.velocity() < 0.0);
    }

    #[test]
    fn capped_in_both_directions() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_position(0, 0.0);
        tracker.add_position(1, 10_000.0);
        assert_eq!(tracker.velocity_with_max(8_000.0), 8_000.0);

        tracker.reset();
        tracker.add_position(0, 10_000.0);
        tracker.add_position(1, 0.0);
        assert_eq!(tracker.velocity_with_max(8_000.0), -8_000.0);
    }

    #[test]
    fn pause_before_release_kills_velocity() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_position(0, 0.0);
        tracker.add_position(ASSUME_STOPPED_MS + 1, 100.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn stale_samples_are_ignored() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_position(0, 5_000.0);
        tracker.add_position(150, 100.0);
        tracker.add_position(160, 200.0);
        tracker.add_position(170, 300.0);
        let velocity = tracker.velocity();
        assert!(velocity > 0.0, "got {velocity}");
    }
}
