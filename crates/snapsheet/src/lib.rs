//! Headless coordination engine for draggable bottom sheets.
//!
//! A sheet rests at one of a few *snaps* and moves between them with the
//! user's finger. A single drag first resizes the sheet and, once it is
//! fully expanded, scrolls the content inside it; dragging back down hands
//! the gesture back to the sheet when the content reaches its top.
//!
//! ```no_run
//! use snapsheet::{
//!     Positioning, Runtime, SheetConfig, SheetCoordinator, SheetMeasurements, SnapSpec,
//! };
//!
//! # fn main() -> Result<(), snapsheet::SheetError> {
//! let runtime = Runtime::default();
//! let spec = SnapSpec::new([0.4, 1.0], Positioning::RelativeToAvailableSpace)?;
//! let sheet = SheetCoordinator::new(SheetConfig::new(spec), runtime.handle())?;
//! sheet.add_state_listener(|state| println!("extent {:.2}", state.extent));
//! sheet.on_layout(SheetMeasurements {
//!     available_height: 800.0,
//!     content_height: 1600.0,
//!     max_scroll_extent: 800.0,
//!     ..Default::default()
//! });
//! let _settle = sheet.expand();
//! runtime.handle().drain_frame_callbacks(16_000_000);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod extent;
pub mod fling;
pub mod settle;
pub mod snap;
pub mod state;

pub use config::{SheetConfig, SheetMode, DEFAULT_DURATION_MILLIS};
pub use controller::SheetController;
pub use coordinator::{Phase, SheetCoordinator, SheetMeasurements, SnapOptions};
pub use error::{SheetError, SnapSpecError};
pub use events::{DismissCause, DismissPrevented, SnapEvent};
pub use extent::{Extent, SnapPoint};
pub use fling::FlingConfig;
pub use settle::{Settle, SettleOutcome};
pub use snap::{normalize, reverse_normalize, Positioning, SheetGeometry, Snap, SnapSpec};
pub use state::{SheetState, EXTENT_EPSILON};

pub use snapsheet_core::{ListenerId, Runtime, RuntimeHandle};
pub use snapsheet_foundation::{DragEnd, DragEvent, DragOrigin, DragStart, DragUpdate};

pub mod prelude {
    pub use crate::config::{SheetConfig, SheetMode};
    pub use crate::controller::SheetController;
    pub use crate::coordinator::{SheetCoordinator, SheetMeasurements, SnapOptions};
    pub use crate::snap::{Positioning, Snap, SnapSpec};
    pub use crate::state::SheetState;
}
