//! Core runtime for snapsheet.
//!
//! Everything in snapsheet runs on a single UI thread. The host drives
//! time by calling [`RuntimeHandle::drain_frame_callbacks`] once per frame;
//! animations register one-shot frame callbacks through a [`FrameClock`].

mod frame_clock;
mod listeners;
mod platform;
mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use listeners::{ListenerId, Listeners};
pub use platform::RuntimeScheduler;
pub use runtime::{DefaultScheduler, Runtime, RuntimeHandle};

pub(crate) type FrameCallbackId = u64;

/// Nanoseconds in one millisecond.
pub const NANOS_PER_MILLI: u64 = 1_000_000;
