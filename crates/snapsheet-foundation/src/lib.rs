//! Input and scrolling building blocks consumed by the sheet coordinator.

pub mod drag;
pub mod gesture_constants;
pub mod scroll;
pub mod velocity_tracker;

pub use drag::{DragEnd, DragEvent, DragGesture, DragOrigin, DragStart, DragUpdate, PointerPhase};
pub use scroll::{ScrollState, ScrollableState};
pub use velocity_tracker::VelocityTracker1D;
