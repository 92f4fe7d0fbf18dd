//! Inner scroll position of the sheet content.
//!
//! [`ScrollableState`] is the seam between the sheet coordinator and whatever
//! list the host renders inside the sheet. [`ScrollState`] is the stock
//! implementation for hosts that let the sheet own the offset.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::gesture_constants::SCROLL_EPSILON;

static NEXT_SCROLL_STATE_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_CALLBACK_ID: AtomicU64 = AtomicU64::new(1);

/// Scroll position the coordinator reads and drives.
///
/// Offsets are in pixels, `0.0` is the top of the content and positive
/// deltas reveal content further down.
pub trait ScrollableState {
    fn offset(&self) -> f32;

    fn max_offset(&self) -> f32;

    /// Applies as much of `delta` as the bounds allow and returns the part
    /// that was applied.
    fn consume_scroll_delta(&self, delta: f32) -> f32;

    /// Jumps to `offset`, clamped to `[0, max_offset]`.
    fn scroll_to(&self, offset: f32);

    /// Called after layout with the measured scroll range. Scrollables that
    /// measure themselves can ignore it.
    fn update_max_offset(&self, _max_offset: f32) {}

    fn is_at_top(&self) -> bool {
        self.offset() <= SCROLL_EPSILON
    }

    fn is_at_bottom(&self) -> bool {
        self.offset() >= self.max_offset() - SCROLL_EPSILON
    }
}

/// Shared scroll offset with change callbacks.
///
/// Clones share the same position.
#[derive(Clone)]
pub struct ScrollState {
    inner: Rc<ScrollStateInner>,
}

struct ScrollStateInner {
    id: u64,
    value: Cell<f32>,
    max_value: Cell<f32>,
    change_callbacks: RefCell<HashMap<u64, Rc<dyn Fn(f32)>>>,
}

impl ScrollState {
    pub fn new(initial: f32) -> Self {
        Self {
            inner: Rc::new(ScrollStateInner {
                id: NEXT_SCROLL_STATE_ID.fetch_add(1, Ordering::Relaxed),
                value: Cell::new(initial.max(0.0)),
                max_value: Cell::new(0.0),
                change_callbacks: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn value(&self) -> f32 {
        self.inner.value.get()
    }

    pub fn max_value(&self) -> f32 {
        self.inner.max_value.get()
    }

    /// Updates the scrollable range after layout. The current offset is
    /// clamped into the new range.
    pub fn set_max_value(&self, max: f32) {
        let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        self.inner.max_value.set(max);
        if self.value() > max {
            self.set_value(max);
        }
    }

    /// Scrolls by `delta`, clamped to `[0, max_value]`. Returns the applied delta.
    pub fn dispatch_raw_delta(&self, delta: f32) -> f32 {
        if !delta.is_finite() {
            log::warn!("ignoring non-finite scroll delta {delta}");
            return 0.0;
        }
        let current = self.value();
        let new_value = (current + delta).clamp(0.0, self.max_value());
        let applied = new_value - current;
        if applied.abs() > 0.001 {
            self.set_value(new_value);
            applied
        } else {
            0.0
        }
    }

    /// Registers a callback invoked with the new offset on every change.
    pub fn add_change_callback(&self, callback: impl Fn(f32) + 'static) -> u64 {
        let id = NEXT_CALLBACK_ID.fetch_add(1, Ordering::Relaxed);
        self.inner
            .change_callbacks
            .borrow_mut()
            .insert(id, Rc::new(callback));
        id
    }

    pub fn remove_change_callback(&self, id: u64) {
        self.inner.change_callbacks.borrow_mut().remove(&id);
    }

    fn set_value(&self, value: f32) {
        self.inner.value.set(value);
        let callbacks: Vec<Rc<dyn Fn(f32)>> = self
            .inner
            .change_callbacks
            .borrow()
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(value);
        }
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl std::fmt::Debug for ScrollState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollState")
            .field("id", &self.inner.id)
            .field("value", &self.value())
            .field("max_value", &self.max_value())
            .finish()
    }
}

impl ScrollableState for ScrollState {
    fn offset(&self) -> f32 {
        self.value()
    }

    fn max_offset(&self) -> f32 {
        self.max_value()
    }

    fn consume_scroll_delta(&self, delta: f32) -> f32 {
        self.dispatch_raw_delta(delta)
    }

    fn scroll_to(&self, offset: f32) {
        let clamped = if offset.is_finite() {
            offset.clamp(0.0, self.max_value())
        } else {
            0.0
        };
        if (clamped - self.value()).abs() > f32::EPSILON {
            self.set_value(clamped);
        }
    }

    fn update_max_offset(&self, max_offset: f32) {
        self.set_max_value(max_offset);
    }
}

#[cfg(test)]
#[path = "tests/scroll_tests.rs"]
mod tests;
