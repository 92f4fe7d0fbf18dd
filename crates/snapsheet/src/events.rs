//! Notifications a sheet sends to its host.

use snapsheet_core::{ListenerId, Listeners};

use crate::settle::{SettleOutcome, SettleSignal};
use crate::state::SheetState;

/// What tried to dismiss a sheet that may not be dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissCause {
    BackButton,
    Backdrop,
    DragRelease,
}

/// Sent when a dismissal was refused. Both flags are false for a drag release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DismissPrevented {
    pub back_button: bool,
    pub backdrop: bool,
}

impl DismissPrevented {
    pub fn cause(&self) -> DismissCause {
        if self.back_button {
            DismissCause::BackButton
        } else if self.backdrop {
            DismissCause::Backdrop
        } else {
            DismissCause::DragRelease
        }
    }
}

impl From<DismissCause> for DismissPrevented {
    fn from(cause: DismissCause) -> Self {
        Self {
            back_button: cause == DismissCause::BackButton,
            backdrop: cause == DismissCause::Backdrop,
        }
    }
}

/// The sheet came to rest on a snap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEvent {
    pub state: SheetState,
    /// The snap in the unit of the sheet's positioning.
    pub snap: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SheetEvent {
    State(SheetState),
    Snapped(SnapEvent),
    DismissPrevented(DismissPrevented),
    Dismissed,
}

/// Work collected while the coordinator is borrowed and delivered after
/// the borrow is released, so listeners may call back into the sheet.
#[derive(Default)]
pub(crate) struct Outbox {
    pub(crate) events: Vec<SheetEvent>,
    settled: Vec<(SettleSignal, SettleOutcome)>,
}

impl Outbox {
    pub(crate) fn push(&mut self, event: SheetEvent) {
        self.events.push(event);
    }

    pub(crate) fn settle(&mut self, signal: Option<SettleSignal>, outcome: SettleOutcome) {
        if let Some(signal) = signal {
            self.settled.push((signal, outcome));
        }
    }
}

#[derive(Default)]
pub(crate) struct SheetHooks {
    pub(crate) state: Listeners<SheetState>,
    pub(crate) snap: Listeners<SnapEvent>,
    pub(crate) dismiss_prevented: Listeners<DismissPrevented>,
    pub(crate) dismissed: Listeners<()>,
}

impl SheetHooks {
    pub(crate) fn deliver(&self, outbox: Outbox) {
        for event in &outbox.events {
            match event {
                SheetEvent::State(state) => self.state.dispatch(state),
                SheetEvent::Snapped(snap) => self.snap.dispatch(snap),
                SheetEvent::DismissPrevented(prevented) => {
                    self.dismiss_prevented.dispatch(prevented)
                }
                SheetEvent::Dismissed => self.dismissed.dispatch(&()),
            }
        }
        for (signal, outcome) in outbox.settled {
            signal.resolve(outcome);
        }
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        self.state.remove(id)
            || self.snap.remove(id)
            || self.dismiss_prevented.remove(id)
            || self.dismissed.remove(id)
    }

    pub(crate) fn clear(&self) {
        self.state.clear();
        self.snap.clear();
        self.dismiss_prevented.clear();
        self.dismissed.clear();
    }
}
