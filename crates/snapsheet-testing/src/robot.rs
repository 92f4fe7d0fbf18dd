//! Robot testing for sheets.
//!
//! [`SheetRobot`] owns a runtime and one sheet, advances a simulated clock
//! in 16 ms frames and records everything the sheet reports, so tests can
//! script a gesture and then assert on the resulting history.
//!
//! # Example
//!
//! ```
//! use snapsheet::{Positioning, SheetConfig, SnapSpec};
//! use snapsheet_testing::SheetRobot;
//!
//! let spec = SnapSpec::new([0.4, 1.0], Positioning::RelativeToAvailableSpace).unwrap();
//! let mut robot = SheetRobot::new(SheetConfig::new(spec));
//! robot.layout_simple(1000.0, 2000.0, 1000.0);
//!
//! robot.drag_and_release(snapsheet::DragOrigin::Content, -500.0, -3000.0);
//! robot.wait_for_idle();
//! assert!((robot.extent() - 1.0).abs() < 1e-3);
//! ```

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use snapsheet::{
    DismissPrevented, DragEnd, DragOrigin, DragStart, DragUpdate, SheetConfig, SheetCoordinator,
    SheetMeasurements, SheetState, Settle, SettleOutcome, SnapEvent,
};
use snapsheet_core::{Runtime, NANOS_PER_MILLI};
use snapsheet_foundation::ScrollableState;

/// Simulated frame interval.
pub const FRAME_MILLIS: u64 = 16;

/// Frames [`SheetRobot::wait_for_idle`] runs before giving up.
const MAX_IDLE_FRAMES: usize = 10_000;

/// Everything the sheet reported since the robot was created or the log
/// was last cleared.
#[derive(Debug, Clone, Default)]
pub struct RobotLog {
    pub states: Vec<SheetState>,
    pub snaps: Vec<SnapEvent>,
    pub dismiss_prevented: Vec<DismissPrevented>,
    pub dismissed: usize,
}

pub struct SheetRobot {
    runtime: Runtime,
    sheet: SheetCoordinator,
    now_nanos: u64,
    pointer_y: f32,
    log: Rc<RefCell<RobotLog>>,
}

impl SheetRobot {
    /// Panics if `config` is invalid.
    pub fn new(config: SheetConfig) -> Self {
        let runtime = Runtime::default();
        let sheet =
            SheetCoordinator::new(config, runtime.handle()).expect("robot config must be valid");
        Self::wrap(runtime, sheet)
    }

    /// Robot whose sheet drives `scroll` instead of its own scroll state.
    pub fn with_scrollable(config: SheetConfig, scroll: Rc<dyn ScrollableState>) -> Self {
        let runtime = Runtime::default();
        let sheet = SheetCoordinator::with_scrollable(config, runtime.handle(), scroll)
            .expect("robot config must be valid");
        Self::wrap(runtime, sheet)
    }

    fn wrap(runtime: Runtime, sheet: SheetCoordinator) -> Self {
        let log = Rc::new(RefCell::new(RobotLog::default()));

        let states = Rc::clone(&log);
        sheet.add_state_listener(move |state| states.borrow_mut().states.push(*state));
        let snaps = Rc::clone(&log);
        sheet.add_snap_listener(move |event| snaps.borrow_mut().snaps.push(*event));
        let prevented = Rc::clone(&log);
        sheet.add_dismiss_prevented_listener(move |event| {
            prevented.borrow_mut().dismiss_prevented.push(*event)
        });
        let dismissed = Rc::clone(&log);
        sheet.add_dismissed_listener(move || dismissed.borrow_mut().dismissed += 1);

        Self {
            runtime,
            sheet,
            now_nanos: 0,
            pointer_y: 0.0,
            log,
        }
    }

    pub fn sheet(&self) -> &SheetCoordinator {
        &self.sheet
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn layout(&mut self, measurements: SheetMeasurements) {
        self.sheet.on_layout(measurements);
    }

    /// Layout without header or footer.
    pub fn layout_simple(&mut self, available_height: f32, content_height: f32, max_scroll: f32) {
        self.layout(SheetMeasurements {
            available_height,
            content_height,
            max_scroll_extent: max_scroll,
            ..SheetMeasurements::default()
        });
    }

    pub fn now_ms(&self) -> u64 {
        self.now_nanos / NANOS_PER_MILLI
    }

    /// Advances the clock by one frame and runs the frame callbacks.
    pub fn advance_frame(&mut self) {
        self.now_nanos += FRAME_MILLIS * NANOS_PER_MILLI;
        self.runtime.handle().drain_frame_callbacks(self.now_nanos);
    }

    /// Advances at least `millis`, one frame at a time.
    pub fn advance_time(&mut self, millis: u64) {
        let frames = millis.div_ceil(FRAME_MILLIS);
        for _ in 0..frames {
            self.advance_frame();
        }
    }

    /// Runs frames until no animation is pending. Returns the frame count.
    pub fn wait_for_idle(&mut self) -> usize {
        for frames in 0..MAX_IDLE_FRAMES {
            if !self.sheet.is_animating() {
                return frames;
            }
            self.advance_frame();
        }
        panic!("sheet still animating after {MAX_IDLE_FRAMES} frames");
    }

    pub fn press(&mut self, origin: DragOrigin) {
        self.pointer_y = 500.0;
        self.sheet.drag_start(DragStart {
            origin,
            position_y: self.pointer_y,
            time_ms: self.now_ms(),
        });
    }

    /// Moves the pointer by `delta_y` (screen space, down is positive)
    /// over one frame.
    pub fn move_by(&mut self, delta_y: f32) {
        self.advance_frame();
        self.pointer_y += delta_y;
        self.sheet.drag_update(DragUpdate {
            delta_y,
            time_ms: self.now_ms(),
        });
    }

    /// Lifts the pointer and lets the sheet estimate the velocity.
    pub fn release(&mut self) {
        self.sheet.drag_end(DragEnd {
            velocity_y: None,
            time_ms: self.now_ms(),
        });
    }

    /// Lifts the pointer with a host-reported velocity (px/s, down is positive).
    pub fn release_with_velocity(&mut self, velocity_y: f32) {
        self.sheet.drag_end(DragEnd {
            velocity_y: Some(velocity_y),
            time_ms: self.now_ms(),
        });
    }

    pub fn cancel(&mut self) {
        self.sheet.drag_cancel();
    }

    /// Presses and moves `total_dy` in `steps` equal moves without releasing.
    pub fn drag(&mut self, origin: DragOrigin, total_dy: f32, steps: usize) {
        self.press(origin);
        let steps = steps.max(1);
        let step = total_dy / steps as f32;
        for _ in 0..steps {
            self.move_by(step);
        }
    }

    /// Drags `total_dy` in ten moves and releases with `velocity_y`.
    pub fn drag_and_release(&mut self, origin: DragOrigin, total_dy: f32, velocity_y: f32) {
        self.drag(origin, total_dy, 10);
        self.release_with_velocity(velocity_y);
    }

    pub fn extent(&self) -> f32 {
        self.sheet.extent()
    }

    pub fn state(&self) -> SheetState {
        self.sheet.state()
    }

    pub fn scroll_offset(&self) -> f32 {
        self.sheet.scrollable().offset()
    }

    pub fn log(&self) -> RobotLog {
        self.log.borrow().clone()
    }

    pub fn states(&self) -> Vec<SheetState> {
        self.log.borrow().states.clone()
    }

    /// Extents of every recorded state, in order.
    pub fn extents(&self) -> Vec<f32> {
        self.log.borrow().states.iter().map(|state| state.extent).collect()
    }

    pub fn snaps(&self) -> Vec<SnapEvent> {
        self.log.borrow().snaps.clone()
    }

    pub fn dismiss_prevented(&self) -> Vec<DismissPrevented> {
        self.log.borrow().dismiss_prevented.clone()
    }

    pub fn dismissed_count(&self) -> usize {
        self.log.borrow().dismissed
    }

    pub fn clear_log(&mut self) {
        *self.log.borrow_mut() = RobotLog::default();
    }

    /// Polls `settle` once with a no-op waker.
    pub fn poll(settle: &mut Settle) -> Poll<SettleOutcome> {
        let mut cx = Context::from_waker(futures_task::noop_waker_ref());
        Pin::new(settle).poll(&mut cx)
    }
}
