use crate::runtime::RuntimeHandle;
use crate::{FrameCallbackId, NANOS_PER_MILLI};

/// Schedules one-shot work on the next drained frame.
#[derive(Clone)]
pub struct FrameClock {
    runtime: RuntimeHandle,
}

impl FrameClock {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &RuntimeHandle {
        &self.runtime
    }

    /// `callback` receives the frame time in nanoseconds. The returned
    /// registration is inert when the runtime has already been dropped.
    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let id = self.runtime.register_frame_callback(callback);
        if id.is_none() {
            log::debug!("frame callback ignored: runtime is gone");
        }
        FrameCallbackRegistration {
            runtime: self.runtime.clone(),
            id,
        }
    }

    pub fn with_frame_millis(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        self.with_frame_nanos(move |nanos| callback(nanos / NANOS_PER_MILLI))
    }
}

/// Pending frame callback. Dropping it removes the callback from the queue.
pub struct FrameCallbackRegistration {
    runtime: RuntimeHandle,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    /// Whether the callback was accepted by a live runtime.
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn cancel(self) {}
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

impl std::fmt::Debug for FrameCallbackRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCallbackRegistration")
            .field("id", &self.id)
            .finish()
    }
}
