//! Imperative handle for code outside the sheet.

use std::cell::RefCell;
use std::rc::Rc;

use snapsheet_animation::Easing;

use crate::coordinator::{SheetCoordinator, SnapOptions, WeakCoordinator};
use crate::settle::Settle;
use crate::state::SheetState;

/// Forwards commands to the sheet it is attached to.
///
/// A controller starts unbound and is attached with
/// [`SheetCoordinator::attach`]. It never keeps the sheet alive: once the
/// sheet is dropped, or before it has been laid out, every command returns
/// an already skipped [`Settle`].
#[derive(Clone, Default)]
pub struct SheetController {
    binding: Rc<RefCell<WeakCoordinator>>,
}

impl SheetController {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bind(&self, coordinator: WeakCoordinator) {
        *self.binding.borrow_mut() = coordinator;
    }

    pub fn detach(&self) {
        *self.binding.borrow_mut() = WeakCoordinator::default();
    }

    pub fn is_attached(&self) -> bool {
        self.coordinator()
            .is_some_and(|coordinator| !coordinator.is_disposed())
    }

    /// Current state of the attached sheet.
    pub fn state(&self) -> Option<SheetState> {
        self.coordinator().map(|coordinator| coordinator.state())
    }

    pub fn snap_to_extent(&self, extent: f32, options: SnapOptions) -> Settle {
        self.forward(|coordinator| coordinator.snap_to_extent(extent, options))
    }

    pub fn scroll_to(
        &self,
        offset: f32,
        duration_millis: Option<u64>,
        easing: Option<Easing>,
    ) -> Settle {
        self.forward(|coordinator| coordinator.scroll_to(offset, duration_millis, easing))
    }

    pub fn expand(&self) -> Settle {
        self.forward(SheetCoordinator::expand)
    }

    pub fn collapse(&self) -> Settle {
        self.forward(SheetCoordinator::collapse)
    }

    pub fn show(&self) -> Settle {
        self.forward(SheetCoordinator::show)
    }

    pub fn hide(&self) -> Settle {
        self.forward(SheetCoordinator::hide)
    }

    pub fn rebuild(&self) {
        if let Some(coordinator) = self.coordinator() {
            coordinator.rebuild();
        }
    }

    fn coordinator(&self) -> Option<SheetCoordinator> {
        self.binding.borrow().upgrade()
    }

    fn forward(&self, command: impl FnOnce(&SheetCoordinator) -> Settle) -> Settle {
        match self.coordinator() {
            Some(coordinator) => command(&coordinator),
            None => {
                log::debug!("sheet command ignored: controller is not attached");
                Settle::skipped()
            }
        }
    }
}

impl std::fmt::Debug for SheetController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetController")
            .field("attached", &self.is_attached())
            .finish()
    }
}
