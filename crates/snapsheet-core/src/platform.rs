//! Platform abstraction for frame scheduling.
//!
//! The runtime never owns a display link. It asks the host for frames
//! through this trait and the host answers by draining frame callbacks.

/// Schedules frames on behalf of the snapsheet runtime.
///
/// Implementations must be safe to call from multiple threads.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}
