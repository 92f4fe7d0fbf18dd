//! The sheet's gesture and animation state machine.
//!
//! [`SheetCoordinator`] owns the [`Extent`] and decides, for every drag
//! delta, whether it moves the sheet or scrolls the content inside it. On
//! release it picks a resting snap and animates there. Programmatic commands
//! run as a queue of steps (for example "scroll to top, then collapse") so a
//! touch or a newer command can cancel the whole sequence at once.
//!
//! Animations advance on frame callbacks from a [`FrameClock`]; the host
//! drives time through its runtime.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use snapsheet_animation::{AnimationSpec, Easing, FlingDecay, TweenAnimation};
use snapsheet_core::{FrameCallbackRegistration, FrameClock, ListenerId, RuntimeHandle};
use snapsheet_foundation::gesture_constants::SCROLL_EPSILON;
use snapsheet_foundation::{
    DragEnd, DragEvent, DragOrigin, DragStart, DragUpdate, ScrollState, ScrollableState,
    VelocityTracker1D,
};

use crate::config::SheetConfig;
use crate::controller::SheetController;
use crate::error::SheetError;
use crate::events::{
    DismissCause, DismissPrevented, Outbox, SheetEvent, SheetHooks, SnapEvent,
};
use crate::extent::Extent;
use crate::fling::{fling_target, free_target, settle_spec};
use crate::settle::{Settle, SettleOutcome, SettleSignal};
use crate::snap::{reverse_normalize, SheetGeometry, SnapSpec};
use crate::state::{SheetState, EXTENT_EPSILON};

/// Leftover drag distance below this many pixels is rounding noise.
const DELTA_EPSILON: f32 = 1e-3;

/// What the coordinator is doing right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    /// A drag is moving the sheet.
    DraggingSheet,
    /// A drag is scrolling the content of a fully expanded sheet.
    ScrollingContent,
    /// The content is coasting after a fast release.
    FlingingContent,
    /// A settle or command animation is running toward `target`.
    Animating { target: f32 },
}

/// Heights reported by the host after each layout pass, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SheetMeasurements {
    pub available_height: f32,
    pub header_height: f32,
    pub content_height: f32,
    pub footer_height: f32,
    /// How far the content can scroll.
    pub max_scroll_extent: f32,
}

impl SheetMeasurements {
    fn is_valid(&self) -> bool {
        [
            self.available_height,
            self.header_height,
            self.content_height,
            self.footer_height,
            self.max_scroll_extent,
        ]
        .iter()
        .all(|value| value.is_finite() && *value >= 0.0)
    }
}

/// Options for [`SheetCoordinator::snap_to_extent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapOptions {
    /// Overrides the configured base duration.
    pub duration_millis: Option<u64>,
    /// Initial velocity in px/s, positive toward a taller sheet. A fast
    /// one shortens the animation the way a release would.
    pub velocity: Option<f32>,
    /// Keep the target within `[min_extent, max_extent]`.
    pub clamp: bool,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            duration_millis: None,
            velocity: None,
            clamp: true,
        }
    }
}

impl SnapOptions {
    pub fn with_duration_millis(mut self, millis: u64) -> Self {
        self.duration_millis = Some(millis);
        self
    }

    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Allows targets outside `[min_extent, max_extent]`, down to hidden.
    pub fn unclamped(mut self) -> Self {
        self.clamp = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Scroll {
        target: f32,
        spec: AnimationSpec,
    },
    Extent {
        target: f32,
        spec: AnimationSpec,
        report_snap: bool,
    },
    ContentFling {
        velocity: f32,
    },
}

enum Motion {
    Scroll(TweenAnimation<f32>),
    Extent {
        tween: TweenAnimation<f32>,
        report_snap: bool,
    },
    ContentFling {
        decay: FlingDecay,
        last: f32,
    },
}

struct Task {
    steps: VecDeque<Step>,
    motion: Option<Motion>,
    settle: Option<SettleSignal>,
    dismiss_when_hidden: bool,
}

struct DragSession {
    origin: DragOrigin,
    tracker: VelocityTracker1D,
    position_y: f32,
}

struct CoordinatorInner {
    config: SheetConfig,
    extent: Extent,
    scroll: Rc<dyn ScrollableState>,
    frame_clock: FrameClock,
    phase: Phase,
    drag: Option<DragSession>,
    task: Option<Task>,
    registration: Option<FrameCallbackRegistration>,
    last_state: Option<SheetState>,
    disposed: bool,
}

/// Shared handle to one sheet. Clones refer to the same sheet.
///
/// Everything runs on the UI thread. Listeners are called after internal
/// state is released and may call back into the coordinator; a
/// [`ScrollableState`] implementation must not.
#[derive(Clone)]
pub struct SheetCoordinator {
    inner: Rc<RefCell<CoordinatorInner>>,
    hooks: Rc<SheetHooks>,
}

/// Non-owning handle held by controllers.
#[derive(Clone, Default)]
pub(crate) struct WeakCoordinator {
    inner: Weak<RefCell<CoordinatorInner>>,
    hooks: Weak<SheetHooks>,
}

impl WeakCoordinator {
    pub(crate) fn upgrade(&self) -> Option<SheetCoordinator> {
        Some(SheetCoordinator {
            inner: self.inner.upgrade()?,
            hooks: self.hooks.upgrade()?,
        })
    }
}

impl SheetCoordinator {
    /// Creates a sheet whose content offset lives in a fresh [`ScrollState`].
    pub fn new(config: SheetConfig, runtime: RuntimeHandle) -> Result<Self, SheetError> {
        Self::with_scrollable(config, runtime, Rc::new(ScrollState::default()))
    }

    /// Creates a sheet that drives the host's own scrollable.
    pub fn with_scrollable(
        config: SheetConfig,
        runtime: RuntimeHandle,
        scroll: Rc<dyn ScrollableState>,
    ) -> Result<Self, SheetError> {
        config.validate()?;
        let geometry = SheetGeometry {
            dynamic_size: config.dynamic_size,
            ..SheetGeometry::default()
        };
        let extent = Extent::new(&config.snap_spec, geometry, config.is_dialog());
        let mut inner = CoordinatorInner {
            config,
            extent,
            scroll,
            frame_clock: runtime.frame_clock(),
            phase: Phase::Idle,
            drag: None,
            task: None,
            registration: None,
            last_state: None,
            disposed: false,
        };
        inner.last_state = Some(inner.snapshot());
        Ok(Self {
            inner: Rc::new(RefCell::new(inner)),
            hooks: Rc::new(SheetHooks::default()),
        })
    }

    pub(crate) fn downgrade(&self) -> WeakCoordinator {
        WeakCoordinator {
            inner: Rc::downgrade(&self.inner),
            hooks: Rc::downgrade(&self.hooks),
        }
    }

    /// Binds `controller` to this sheet, replacing any previous binding.
    pub fn attach(&self, controller: &SheetController) {
        controller.bind(self.downgrade());
    }

    pub fn config(&self) -> SheetConfig {
        self.inner.borrow().config.clone()
    }

    pub fn state(&self) -> SheetState {
        self.inner.borrow().snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.inner.borrow().phase
    }

    pub fn extent(&self) -> f32 {
        self.inner.borrow().extent.current()
    }

    /// Resolved snap extents, ascending.
    pub fn snappings(&self) -> Vec<f32> {
        self.inner.borrow().extent.snappings().to_vec()
    }

    /// Pixel height of the sheet at its largest snap.
    pub fn target_height(&self) -> f32 {
        self.inner.borrow().extent.target_height()
    }

    pub fn scrollable(&self) -> Rc<dyn ScrollableState> {
        Rc::clone(&self.inner.borrow().scroll)
    }

    pub fn is_animating(&self) -> bool {
        self.inner.borrow().task.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.borrow().disposed
    }

    pub fn add_state_listener(&self, listener: impl Fn(&SheetState) + 'static) -> ListenerId {
        self.hooks.state.add(listener)
    }

    pub fn add_snap_listener(&self, listener: impl Fn(&SnapEvent) + 'static) -> ListenerId {
        self.hooks.snap.add(listener)
    }

    pub fn add_dismiss_prevented_listener(
        &self,
        listener: impl Fn(&DismissPrevented) + 'static,
    ) -> ListenerId {
        self.hooks.dismiss_prevented.add(listener)
    }

    /// Called when a dialog sheet settles hidden.
    pub fn add_dismissed_listener(&self, listener: impl Fn() + 'static) -> ListenerId {
        self.hooks.dismissed.add(move |_| listener())
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.hooks.remove(id)
    }

    /// Feeds a layout pass. The first valid one resolves the snaps and,
    /// for dialogs, starts the opening animation.
    pub fn on_layout(&self, measurements: SheetMeasurements) {
        self.mutate(|inner, outbox| inner.on_layout(measurements, outbox));
    }

    /// Replaces the snap configuration. A sheet resting inside the new
    /// range stays put; one left outside settles at the nearest snap.
    pub fn update_snap_spec(&self, spec: SnapSpec) -> Result<(), SheetError> {
        {
            let inner = self.inner.borrow();
            spec.validate_parts(inner.config.has_header, inner.config.has_footer)?;
        }
        self.mutate(|inner, outbox| inner.update_snap_spec(spec, outbox));
        Ok(())
    }

    pub fn handle_drag(&self, event: DragEvent) {
        match event {
            DragEvent::Start(start) => self.drag_start(start),
            DragEvent::Update(update) => self.drag_update(update),
            DragEvent::End(end) => self.drag_end(end),
            DragEvent::Cancel => self.drag_cancel(),
        }
    }

    /// Cancels running animations and starts routing deltas.
    pub fn drag_start(&self, start: DragStart) {
        self.mutate(|inner, outbox| inner.on_drag_start(start, outbox));
    }

    pub fn drag_update(&self, update: DragUpdate) {
        self.mutate(|inner, _| inner.on_drag_update(update));
    }

    pub fn drag_end(&self, end: DragEnd) {
        self.mutate(|inner, outbox| inner.on_drag_end(Some(end), outbox));
    }

    pub fn drag_cancel(&self) {
        self.mutate(|inner, outbox| inner.on_drag_end(None, outbox));
    }

    /// Animates to `extent`, scrolling the content back to the top first.
    pub fn snap_to_extent(&self, extent: f32, options: SnapOptions) -> Settle {
        self.mutate(|inner, outbox| inner.snap_to_extent(extent, options, outbox))
    }

    /// Scrolls the content to `offset`, expanding the sheet first.
    pub fn scroll_to(
        &self,
        offset: f32,
        duration_millis: Option<u64>,
        easing: Option<Easing>,
    ) -> Settle {
        self.mutate(|inner, outbox| inner.scroll_to(offset, duration_millis, easing, outbox))
    }

    pub fn expand(&self) -> Settle {
        self.mutate(|inner, outbox| {
            let max = inner.extent.max_extent();
            inner.snap_to_extent(max, SnapOptions::default(), outbox)
        })
    }

    pub fn collapse(&self) -> Settle {
        self.mutate(|inner, outbox| {
            let min = inner.extent.min_extent();
            inner.snap_to_extent(min, SnapOptions::default(), outbox)
        })
    }

    /// Opens a hidden sheet at its initial snap.
    pub fn show(&self) -> Settle {
        self.mutate(|inner, outbox| inner.show(outbox))
    }

    pub fn hide(&self) -> Settle {
        self.mutate(|inner, outbox| {
            inner.snap_to_extent(0.0, SnapOptions::default().unclamped(), outbox)
        })
    }

    /// Re-sends the current state to state listeners.
    pub fn rebuild(&self) {
        self.mutate(|inner, _| inner.last_state = None);
    }

    /// Returns whether the back press was consumed by the sheet.
    pub fn handle_back_button(&self) -> bool {
        self.mutate(|inner, outbox| inner.request_dismiss(DismissCause::BackButton, outbox))
    }

    /// Returns whether the tap was consumed by the sheet.
    pub fn handle_backdrop_tap(&self) -> bool {
        self.mutate(|inner, outbox| inner.request_dismiss(DismissCause::Backdrop, outbox))
    }

    /// Cancels animations and detaches every listener. Later calls are no-ops.
    pub fn dispose(&self) {
        let mut outbox = Outbox::default();
        {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return;
            }
            inner.cancel_task(&mut outbox);
            inner.drag = None;
            inner.set_phase(Phase::Idle);
            inner.disposed = true;
        }
        log::debug!("sheet disposed");
        self.hooks.clear();
        outbox.events.clear();
        self.hooks.deliver(outbox);
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut CoordinatorInner, &mut Outbox) -> R) -> R {
        let mut outbox = Outbox::default();
        let result = {
            let mut inner = self.inner.borrow_mut();
            inner.frame_clock.runtime().assert_ui_thread();
            let result = f(&mut inner, &mut outbox);
            if !inner.disposed {
                inner.publish_state(&mut outbox);
            }
            result
        };
        schedule_frame(&self.inner, &self.hooks);
        self.hooks.deliver(outbox);
        result
    }
}

impl std::fmt::Debug for SheetCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SheetCoordinator")
            .field("phase", &inner.phase)
            .field("extent", &inner.extent.current())
            .field("snappings", &inner.extent.snappings())
            .field("disposed", &inner.disposed)
            .finish()
    }
}

fn schedule_frame(inner: &Rc<RefCell<CoordinatorInner>>, hooks: &Rc<SheetHooks>) {
    let mut guard = inner.borrow_mut();
    if guard.disposed || guard.task.is_none() || guard.registration.is_some() {
        return;
    }
    let weak_inner = Rc::downgrade(inner);
    let weak_hooks = Rc::downgrade(hooks);
    let registration = guard.frame_clock.with_frame_nanos(move |frame_time_nanos| {
        if let (Some(inner), Some(hooks)) = (weak_inner.upgrade(), weak_hooks.upgrade()) {
            run_frame(&inner, &hooks, frame_time_nanos);
        }
    });
    guard.registration = Some(registration);
}

fn run_frame(inner: &Rc<RefCell<CoordinatorInner>>, hooks: &Rc<SheetHooks>, frame_time_nanos: u64) {
    let mut outbox = Outbox::default();
    {
        let mut guard = inner.borrow_mut();
        guard.registration = None;
        if guard.disposed {
            return;
        }
        guard.advance(frame_time_nanos, &mut outbox);
        guard.publish_state(&mut outbox);
    }
    schedule_frame(inner, hooks);
    hooks.deliver(outbox);
}

impl CoordinatorInner {
    fn is_ready(&self) -> bool {
        !self.disposed && self.extent.geometry().is_measured()
    }

    fn snapshot(&self) -> SheetState {
        SheetState::new(
            self.extent.current(),
            self.extent.min_extent(),
            self.extent.max_extent(),
            self.extent.geometry().is_measured(),
            self.scroll.offset(),
            self.scroll.max_offset(),
            self.scroll.is_at_top(),
            self.scroll.is_at_bottom(),
        )
    }

    fn publish_state(&mut self, outbox: &mut Outbox) {
        let state = self.snapshot();
        if self.last_state != Some(state) {
            self.last_state = Some(state);
            outbox.push(SheetEvent::State(state));
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            log::debug!("sheet phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn on_layout(&mut self, measurements: SheetMeasurements, outbox: &mut Outbox) {
        if self.disposed {
            return;
        }
        if !measurements.is_valid() {
            log::warn!("ignoring invalid layout {measurements:?}");
            return;
        }
        self.scroll.update_max_offset(measurements.max_scroll_extent);
        let geometry = SheetGeometry {
            available_height: measurements.available_height,
            header_height: measurements.header_height,
            child_height: measurements.content_height,
            footer_height: measurements.footer_height,
            is_laid_out: true,
            dynamic_size: self.config.dynamic_size,
        };
        if geometry == *self.extent.geometry() {
            return;
        }
        let outcome = self.extent.resync(&self.config.snap_spec, geometry);
        if outcome.first_layout && self.config.is_dialog() && self.task.is_none() {
            let target = self.extent.initial_extent(&self.config.snap_spec);
            log::debug!("opening dialog sheet at {target:.3}");
            let spec = AnimationSpec::tween(self.config.duration_millis, Easing::FastOutSlowIn);
            let steps = VecDeque::from([Step::Extent {
                target,
                spec,
                report_snap: true,
            }]);
            self.start_task(steps, None, false, outbox);
        }
    }

    fn update_snap_spec(&mut self, spec: SnapSpec, outbox: &mut Outbox) {
        let geometry = *self.extent.geometry();
        self.extent.resync(&spec, geometry);
        self.config.snap_spec = spec;
        if !self.is_ready() || self.task.is_some() || self.drag.is_some() {
            return;
        }
        let current = self.extent.current();
        let (min, max) = (self.extent.min_extent(), self.extent.max_extent());
        let outside = current < min - EXTENT_EPSILON || current > max + EXTENT_EPSILON;
        if current > EXTENT_EPSILON && outside {
            let target = self.extent.nearest_snap(current).clamp(min, max);
            let range = max - self.extent.floor_extent();
            let spec = settle_spec(
                target - current,
                0.0,
                geometry.available_height,
                range,
                self.config.duration_millis,
                &self.config.fling,
            );
            let steps = VecDeque::from([Step::Extent {
                target,
                spec,
                report_snap: true,
            }]);
            self.start_task(steps, None, false, outbox);
        }
    }

    fn on_drag_start(&mut self, start: DragStart, outbox: &mut Outbox) {
        if !self.is_ready() {
            log::debug!("ignoring drag before layout");
            return;
        }
        if !start.position_y.is_finite() {
            log::warn!("ignoring drag start at non-finite position");
            return;
        }
        self.cancel_task(outbox);
        let mut tracker = VelocityTracker1D::new();
        tracker.add_position(start.time_ms, start.position_y);
        self.drag = Some(DragSession {
            origin: start.origin,
            tracker,
            position_y: start.position_y,
        });

        let at_max = self.extent.current() >= self.extent.max_extent() - EXTENT_EPSILON;
        let scrolled = self.scroll.offset() > SCROLL_EPSILON;
        let phase = if start.origin == DragOrigin::Content && (at_max || scrolled) {
            Phase::ScrollingContent
        } else {
            Phase::DraggingSheet
        };
        self.set_phase(phase);
    }

    fn on_drag_update(&mut self, update: DragUpdate) {
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        if !update.delta_y.is_finite() {
            log::warn!("ignoring non-finite drag delta {}", update.delta_y);
            return;
        }
        session.position_y += update.delta_y;
        session.tracker.add_position(update.time_ms, session.position_y);
        let origin = session.origin;
        // Screen deltas grow downward; the sheet grows upward.
        self.route_delta(-update.delta_y, origin);
    }

    /// Splits `delta` (pixels, positive toward a taller sheet) between the
    /// extent and the content scroll.
    fn route_delta(&mut self, delta: f32, origin: DragOrigin) {
        if delta == 0.0 {
            return;
        }
        let geometry = *self.extent.geometry();
        let max = self.extent.max_extent();
        let current = self.extent.current();

        if origin == DragOrigin::Handle {
            let next = (current + geometry.pixels_to_extent(delta)).clamp(0.0, max);
            self.extent.set_current(next);
            self.set_phase(Phase::DraggingSheet);
            return;
        }

        if delta > 0.0 {
            let mut remaining = delta;
            if current < max {
                let room = geometry.extent_to_pixels(max - current);
                let used = remaining.min(room);
                self.extent
                    .set_current((current + geometry.pixels_to_extent(used)).min(max));
                remaining -= used;
                self.set_phase(Phase::DraggingSheet);
            }
            if remaining > DELTA_EPSILON {
                self.scroll.consume_scroll_delta(remaining);
                self.set_phase(Phase::ScrollingContent);
            }
        } else {
            let mut remaining = delta;
            let offset = self.scroll.offset();
            if offset > 0.0 {
                let consumed = self.scroll.consume_scroll_delta(remaining.max(-offset));
                remaining -= consumed;
                self.set_phase(Phase::ScrollingContent);
            }
            if remaining < -DELTA_EPSILON {
                let next = (current + geometry.pixels_to_extent(remaining)).max(0.0);
                self.extent.set_current(next);
                self.set_phase(Phase::DraggingSheet);
            }
        }
    }

    /// `end` is `None` for a cancelled drag, which settles without velocity.
    fn on_drag_end(&mut self, end: Option<DragEnd>, outbox: &mut Outbox) {
        let Some(session) = self.drag.take() else {
            return;
        };
        let fling = self.config.fling;
        let velocity_y = match end {
            Some(end) => end
                .velocity_y
                .filter(|velocity| velocity.is_finite())
                .unwrap_or_else(|| session.tracker.velocity_with_max(fling.max_fling_velocity)),
            None => 0.0,
        };
        let velocity = fling.clamp_velocity(-velocity_y);

        let at_max = self.extent.current() >= self.extent.max_extent() - EXTENT_EPSILON;
        if self.phase == Phase::ScrollingContent && at_max {
            if fling.is_fling(velocity) && self.scroll.max_offset() > 0.0 {
                log::debug!("content fling at {velocity:.0} px/s");
                let steps = VecDeque::from([Step::ContentFling { velocity }]);
                self.start_task(steps, None, false, outbox);
            } else {
                self.set_phase(Phase::Idle);
            }
            return;
        }
        self.settle_sheet(velocity, outbox);
    }

    fn settle_sheet(&mut self, velocity: f32, outbox: &mut Outbox) {
        let current = self.extent.current();
        let min = self.extent.min_extent();
        let max = self.extent.max_extent();
        let available = self.extent.geometry().available_height;
        let fling = self.config.fling;
        let snapping = self.config.snap_spec.snaps_enabled();

        let mut target = if snapping {
            fling_target(&self.extent.snappings(), current, velocity, available, &fling)
        } else {
            let lower = if self.config.is_dialog() { 0.0 } else { min };
            free_target(current, velocity, available, &fling, lower, max)
        };
        if !self.config.dismissable
            && (target < min - EXTENT_EPSILON || current < min - EXTENT_EPSILON)
        {
            log::debug!("dismiss prevented, returning to {min:.3}");
            target = min;
            outbox.push(SheetEvent::DismissPrevented(DismissCause::DragRelease.into()));
        }

        let range = max - self.extent.floor_extent();
        let spec = settle_spec(
            target - current,
            velocity,
            available,
            range,
            self.config.duration_millis,
            &fling,
        );
        log::debug!(
            "release at {current:.3} with {velocity:.0} px/s settles at {target:.3} over {} ms",
            spec.duration_millis
        );
        let dismiss = self.config.is_dialog() && target <= EXTENT_EPSILON;
        let steps = VecDeque::from([Step::Extent {
            target,
            spec,
            report_snap: snapping,
        }]);
        self.start_task(steps, None, dismiss, outbox);
    }

    fn snap_to_extent(&mut self, extent: f32, options: SnapOptions, outbox: &mut Outbox) -> Settle {
        if !self.is_ready() {
            return Settle::skipped();
        }
        if !extent.is_finite() {
            log::warn!("ignoring snap to non-finite extent {extent}");
            return Settle::skipped();
        }
        self.end_drag_for_command();
        let (min, max) = (self.extent.min_extent(), self.extent.max_extent());
        let target = if options.clamp {
            extent.clamp(min, max)
        } else {
            extent.clamp(0.0, 1.0)
        };
        let spec = self.command_spec(target, options);

        let mut steps = VecDeque::new();
        if self.scroll.offset() > SCROLL_EPSILON {
            steps.push_back(Step::Scroll {
                target: 0.0,
                spec: spec.scaled(0.5),
            });
        }
        let report_snap = self
            .extent
            .points()
            .iter()
            .any(|point| (point.extent - target).abs() <= EXTENT_EPSILON);
        steps.push_back(Step::Extent {
            target,
            spec,
            report_snap,
        });

        let dismiss = self.config.is_dialog() && target <= EXTENT_EPSILON;
        let (settle, signal) = Settle::pending();
        self.start_task(steps, Some(signal), dismiss, outbox);
        settle
    }

    /// A command started mid-drag owns the extent from then on. Later moves
    /// and the release of that pointer are ignored.
    fn end_drag_for_command(&mut self) {
        if self.drag.take().is_some() {
            log::debug!("command takes over from the active drag");
        }
    }

    fn command_spec(&self, target: f32, options: SnapOptions) -> AnimationSpec {
        let base = options.duration_millis.unwrap_or(self.config.duration_millis);
        let velocity = options.velocity.unwrap_or(0.0);
        if options.duration_millis.is_some() && !self.config.fling.is_fling(velocity) {
            return AnimationSpec::tween(base, Easing::FastOutSlowIn);
        }
        settle_spec(
            target - self.extent.current(),
            velocity,
            self.extent.geometry().available_height,
            self.extent.max_extent() - self.extent.floor_extent(),
            base,
            &self.config.fling,
        )
    }

    fn scroll_to(
        &mut self,
        offset: f32,
        duration_millis: Option<u64>,
        easing: Option<Easing>,
        outbox: &mut Outbox,
    ) -> Settle {
        if !self.is_ready() {
            return Settle::skipped();
        }
        if !offset.is_finite() {
            log::warn!("ignoring scroll to non-finite offset {offset}");
            return Settle::skipped();
        }
        self.end_drag_for_command();
        let target = offset.clamp(0.0, self.scroll.max_offset());
        let spec = AnimationSpec::tween(
            duration_millis.unwrap_or(self.config.duration_millis),
            easing.unwrap_or(Easing::FastOutSlowIn),
        );
        let mut steps = VecDeque::new();
        let max = self.extent.max_extent();
        if self.extent.current() < max - EXTENT_EPSILON {
            steps.push_back(Step::Extent {
                target: max,
                spec,
                report_snap: true,
            });
        }
        steps.push_back(Step::Scroll { target, spec });

        let (settle, signal) = Settle::pending();
        self.start_task(steps, Some(signal), false, outbox);
        settle
    }

    fn show(&mut self, outbox: &mut Outbox) -> Settle {
        if !self.is_ready() {
            return Settle::skipped();
        }
        if self.extent.current() > EXTENT_EPSILON && self.task.is_none() {
            return Settle::ready(SettleOutcome::Completed);
        }
        let target = self.extent.initial_extent(&self.config.snap_spec);
        self.snap_to_extent(target, SnapOptions::default(), outbox)
    }

    fn request_dismiss(&mut self, cause: DismissCause, outbox: &mut Outbox) -> bool {
        if !self.is_ready() || !self.config.is_dialog() {
            return false;
        }
        if self.extent.current() <= EXTENT_EPSILON {
            return false;
        }
        if self.config.dismissable {
            log::debug!("dismissing sheet ({cause:?})");
            // The returned future is not needed: dismissal is reported to
            // dismissed listeners.
            let _ = self.snap_to_extent(0.0, SnapOptions::default().unclamped(), outbox);
        } else {
            log::debug!("dismiss prevented ({cause:?})");
            outbox.push(SheetEvent::DismissPrevented(cause.into()));
        }
        true
    }

    fn start_task(
        &mut self,
        steps: VecDeque<Step>,
        settle: Option<SettleSignal>,
        dismiss_when_hidden: bool,
        outbox: &mut Outbox,
    ) {
        self.cancel_task(outbox);
        let content_fling = steps
            .iter()
            .any(|step| matches!(step, Step::ContentFling { .. }));
        let target = steps
            .iter()
            .rev()
            .find_map(|step| match step {
                Step::Extent { target, .. } => Some(*target),
                _ => None,
            })
            .unwrap_or(self.extent.current());
        self.task = Some(Task {
            steps,
            motion: None,
            settle,
            dismiss_when_hidden,
        });
        self.set_phase(if content_fling {
            Phase::FlingingContent
        } else {
            Phase::Animating { target }
        });
        // Steps that are already satisfied complete without waiting a frame.
        self.ensure_motion(outbox);
    }

    fn cancel_task(&mut self, outbox: &mut Outbox) {
        self.registration = None;
        if let Some(task) = self.task.take() {
            log::debug!("cancelling {:?}", self.phase);
            outbox.settle(task.settle, SettleOutcome::Cancelled);
        }
        if matches!(self.phase, Phase::Animating { .. } | Phase::FlingingContent) {
            self.set_phase(Phase::Idle);
        }
    }

    fn finish_task(&mut self, outbox: &mut Outbox) {
        let Some(task) = self.task.take() else {
            return;
        };
        self.registration = None;
        self.set_phase(Phase::Idle);
        if task.dismiss_when_hidden && self.extent.current() <= EXTENT_EPSILON {
            log::debug!("sheet dismissed");
            self.publish_state(outbox);
            outbox.push(SheetEvent::Dismissed);
        }
        outbox.settle(task.settle, SettleOutcome::Completed);
    }

    /// Starts the next unsatisfied step if nothing is running. Finishes the
    /// task when no steps remain. Returns whether a motion is running.
    fn ensure_motion(&mut self, outbox: &mut Outbox) -> bool {
        loop {
            let Some(task) = self.task.as_mut() else {
                return false;
            };
            if task.motion.is_some() {
                return true;
            }
            let Some(step) = task.steps.pop_front() else {
                self.finish_task(outbox);
                return false;
            };
            match step {
                Step::Extent {
                    target,
                    spec,
                    report_snap,
                } => {
                    let start = self.extent.current();
                    if (target - start).abs() <= EXTENT_EPSILON {
                        self.extent.set_current(target);
                        if report_snap {
                            self.report_snap(target, outbox);
                        }
                        continue;
                    }
                    log::debug!(
                        "animating extent {start:.3} -> {target:.3} over {} ms",
                        spec.duration_millis
                    );
                    task.motion = Some(Motion::Extent {
                        tween: TweenAnimation::new(start, target, spec),
                        report_snap,
                    });
                }
                Step::Scroll { target, spec } => {
                    let start = self.scroll.offset();
                    if (target - start).abs() <= SCROLL_EPSILON {
                        self.scroll.scroll_to(target);
                        continue;
                    }
                    log::debug!(
                        "animating scroll {start:.1} -> {target:.1} over {} ms",
                        spec.duration_millis
                    );
                    task.motion = Some(Motion::Scroll(TweenAnimation::new(start, target, spec)));
                }
                Step::ContentFling { velocity } => {
                    let origin = self.scroll.offset();
                    task.motion = Some(Motion::ContentFling {
                        decay: FlingDecay::new(origin, velocity, self.config.fling.calculator()),
                        last: origin,
                    });
                }
            }
        }
    }

    fn advance(&mut self, frame_time_nanos: u64, outbox: &mut Outbox) {
        while self.ensure_motion(outbox) {
            let Some(motion) = self.task.as_mut().and_then(|task| task.motion.as_mut()) else {
                return;
            };
            let done = match motion {
                Motion::Extent { tween, .. } => {
                    let frame = tween.sample(frame_time_nanos);
                    self.extent.set_current(frame.value);
                    frame.finished
                }
                Motion::Scroll(tween) => {
                    let frame = tween.sample(frame_time_nanos);
                    self.scroll.scroll_to(frame.value);
                    frame.finished
                }
                Motion::ContentFling { decay, last } => {
                    let (value, finished) = decay.sample(frame_time_nanos);
                    let delta = value - *last;
                    *last = value;
                    let consumed = self.scroll.consume_scroll_delta(delta);
                    // Hitting either end of the content stops the fling.
                    finished || (delta - consumed).abs() > SCROLL_EPSILON
                }
            };
            log::trace!(
                "frame {frame_time_nanos}: extent {:.4} offset {:.1}",
                self.extent.current(),
                self.scroll.offset()
            );
            if !done {
                return;
            }
            let finished = self.task.as_mut().and_then(|task| task.motion.take());
            if let Some(Motion::Extent {
                tween,
                report_snap: true,
            }) = finished
            {
                self.report_snap(*tween.target(), outbox);
            }
        }
    }

    fn report_snap(&mut self, extent: f32, outbox: &mut Outbox) {
        self.publish_state(outbox);
        let snap = reverse_normalize(
            extent,
            self.config.snap_spec.positioning(),
            self.extent.geometry(),
        );
        log::debug!("settled on snap {snap:.3} (extent {extent:.3})");
        outbox.push(SheetEvent::Snapped(SnapEvent {
            state: self.snapshot(),
            snap,
        }));
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
