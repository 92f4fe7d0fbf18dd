use super::*;
use crate::Listeners;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct CountingScheduler {
    requests: AtomicUsize,
}

impl RuntimeScheduler for CountingScheduler {
    fn schedule_frame(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn frame_callback_runs_once_with_frame_time() {
    let runtime = Runtime::default();
    let clock = runtime.frame_clock();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let seen_in_callback = Rc::clone(&seen);
    let _registration =
        clock.with_frame_nanos(move |time| seen_in_callback.borrow_mut().push(time));
    assert!(runtime.needs_frame());

    let handle = runtime.handle();
    handle.drain_frame_callbacks(16_000_000);
    handle.drain_frame_callbacks(32_000_000);

    assert_eq!(seen.borrow().as_slice(), &[16_000_000]);
    assert!(!runtime.needs_frame());
}

#[test]
fn dropping_registration_cancels_callback() {
    let runtime = Runtime::default();
    let fired = Rc::new(Cell::new(false));
    let fired_flag = Rc::clone(&fired);

    let registration = runtime
        .frame_clock()
        .with_frame_nanos(move |_| fired_flag.set(true));
    assert!(registration.is_active());
    drop(registration);

    runtime.handle().drain_frame_callbacks(0);
    assert!(!fired.get());
    assert!(!runtime.handle().has_frame_callbacks());
}

#[test]
fn callbacks_registered_while_draining_wait_for_next_frame() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    let frames = Rc::new(RefCell::new(Vec::new()));
    let keep_alive = Rc::new(RefCell::new(Vec::new()));

    let clock = runtime.frame_clock();
    let frames_outer = Rc::clone(&frames);
    let keep_alive_outer = Rc::clone(&keep_alive);
    let outer_clock = clock.clone();
    let registration = outer_clock.with_frame_nanos(move |time| {
        frames_outer.borrow_mut().push(("outer", time));
        let frames_inner = Rc::clone(&frames_outer);
        let inner =
            clock.with_frame_nanos(move |time| frames_inner.borrow_mut().push(("inner", time)));
        keep_alive_outer.borrow_mut().push(inner);
    });
    keep_alive.borrow_mut().push(registration);

    handle.drain_frame_callbacks(1);
    assert_eq!(frames.borrow().as_slice(), &[("outer", 1)]);
    handle.drain_frame_callbacks(2);
    assert_eq!(frames.borrow().as_slice(), &[("outer", 1), ("inner", 2)]);
}

#[test]
fn scheduler_is_asked_for_frames() {
    let scheduler = Arc::new(CountingScheduler::default());
    let runtime = Runtime::new(scheduler.clone());
    let _first = runtime.frame_clock().with_frame_millis(|_| {});
    let _second = runtime.frame_clock().with_frame_millis(|_| {});
    assert_eq!(scheduler.requests.load(Ordering::SeqCst), 2);
}

#[test]
fn registration_after_runtime_drop_is_inactive() {
    let runtime = Runtime::default();
    let clock = runtime.frame_clock();
    drop(runtime);
    let registration = clock.with_frame_nanos(|_| {});
    assert!(!registration.is_active());
    assert!(!clock.runtime().is_alive());
}

#[test]
fn ui_thread_check_passes_on_creating_thread() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    handle.assert_ui_thread();
    handle.clone().frame_clock().runtime().assert_ui_thread();
}

#[test]
fn listeners_can_remove_themselves_during_dispatch() {
    let listeners: Rc<Listeners<u32>> = Rc::new(Listeners::new());
    let calls = Rc::new(Cell::new(0));
    let own_id = Rc::new(Cell::new(None));

    let calls_in_listener = Rc::clone(&calls);
    let registry = Rc::clone(&listeners);
    let own_id_in_listener = Rc::clone(&own_id);
    let id = listeners.add(move |value| {
        calls_in_listener.set(calls_in_listener.get() + value);
        if let Some(id) = own_id_in_listener.get() {
            registry.remove(id);
        }
    });
    own_id.set(Some(id));

    listeners.dispatch(&5);
    listeners.dispatch(&5);

    assert_eq!(calls.get(), 5);
    assert!(listeners.is_empty());
}
