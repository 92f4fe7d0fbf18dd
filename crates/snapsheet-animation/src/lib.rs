//! Animation primitives for snapsheet.
//!
//! Tweens sample an easing curve against frame time; decays reproduce the
//! Android fling spline so a released sheet or list travels the distance a
//! user expects from a given velocity.

pub mod animation;
pub mod decay_spec;

pub use animation::{AnimationFrame, AnimationSpec, Easing, Lerp, TweenAnimation};
pub use decay_spec::{FlingCalculator, FlingDecay, FlingInfo};

pub mod prelude {
    pub use crate::animation::{AnimationSpec, Easing, TweenAnimation};
    pub use crate::decay_spec::{FlingCalculator, FlingDecay};
}
