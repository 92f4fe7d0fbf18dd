//! Drives a few sheets through scripted pointer traces and logs what they
//! report. Run with `RUST_LOG=debug` to see phase changes and settle plans.

use snapsheet::{
    Positioning, SettleOutcome, SheetConfig, SheetController, SheetCoordinator,
    SheetMeasurements, Snap, SnapSpec,
};
use snapsheet_core::{Runtime, NANOS_PER_MILLI};
use snapsheet_foundation::{DragGesture, DragOrigin, PointerPhase};
use web_time::Instant;

const FRAME_MILLIS: u64 = 16;

const SCREEN: SheetMeasurements = SheetMeasurements {
    available_height: 1600.0,
    header_height: 72.0,
    content_height: 4200.0,
    footer_height: 0.0,
    max_scroll_extent: 2672.0,
};

/// Stand-in for a windowing host: owns the clock and turns pointer samples
/// into drag events.
struct Host {
    runtime: Runtime,
    sheet: SheetCoordinator,
    gesture: DragGesture,
    now_ms: u64,
    frames: u64,
}

impl Host {
    fn new(name: &'static str, config: SheetConfig) -> Result<Self, snapsheet::SheetError> {
        let runtime = Runtime::default();
        let sheet = SheetCoordinator::new(config, runtime.handle())?;
        sheet.add_snap_listener(move |event| {
            log::info!(
                "[{name}] snapped to {:.2} (extent {:.3}, progress {:.2})",
                event.snap,
                event.state.extent,
                event.state.progress
            );
        });
        sheet.add_dismiss_prevented_listener(move |event| {
            log::info!("[{name}] dismiss prevented: {:?}", event.cause());
        });
        sheet.add_dismissed_listener(move || log::info!("[{name}] dismissed"));
        sheet.on_layout(SCREEN);
        Ok(Self {
            runtime,
            sheet,
            gesture: DragGesture::new(),
            now_ms: 0,
            frames: 0,
        })
    }

    fn frame(&mut self) {
        self.now_ms += FRAME_MILLIS;
        self.frames += 1;
        self.runtime
            .handle()
            .drain_frame_callbacks(self.now_ms * NANOS_PER_MILLI);
    }

    fn pointer(&mut self, phase: PointerPhase, y: f32, origin: DragOrigin) {
        if let Some(event) = self.gesture.on_pointer(phase, y, self.now_ms, origin) {
            self.sheet.handle_drag(event);
        }
    }

    /// Presses at `from_y`, moves to `to_y` over `millis` and lifts.
    fn swipe(&mut self, origin: DragOrigin, from_y: f32, to_y: f32, millis: u64) {
        self.pointer(PointerPhase::Down, from_y, origin);
        let steps = (millis / FRAME_MILLIS).max(1);
        for step in 1..=steps {
            self.frame();
            let y = from_y + (to_y - from_y) * step as f32 / steps as f32;
            self.pointer(PointerPhase::Move, y, origin);
        }
        self.pointer(PointerPhase::Up, to_y, origin);
    }

    /// Runs frames until the sheet stops moving.
    fn settle(&mut self) -> u64 {
        let start = self.frames;
        while self.sheet.is_animating() {
            self.frame();
        }
        self.frames - start
    }

    fn report(&self, label: &str) {
        let state = self.sheet.state();
        log::info!(
            "{label}: extent {:.3} offset {:.0} expanded={} collapsed={} hidden={}",
            state.extent,
            state.scroll_offset,
            state.is_expanded,
            state.is_collapsed,
            state.is_hidden
        );
    }
}

fn inline_walkthrough() -> Result<u64, snapsheet::SheetError> {
    let spec = SnapSpec::new(
        [Snap::Header, Snap::Value(0.5), Snap::Expanded],
        Positioning::RelativeToAvailableSpace,
    )?
    .with_initial_snap(Snap::Value(0.5))?;
    let mut host = Host::new("inline", SheetConfig::new(spec).with_header(true))?;
    host.report("laid out");

    // A quick flick from the middle of the content.
    host.swipe(DragOrigin::Content, 1200.0, 1000.0, 64);
    host.settle();
    host.report("after upward flick");

    // Now fully open: the same gesture scrolls the list and coasts.
    host.swipe(DragOrigin::Content, 1200.0, 900.0, 48);
    host.settle();
    host.report("after content fling");

    // Dragging the handle ignores the scroll position.
    host.swipe(DragOrigin::Handle, 200.0, 900.0, 400);
    host.settle();
    host.report("after slow handle drag");

    let controller = SheetController::new();
    host.sheet.attach(&controller);
    let settle = controller.scroll_to(800.0, Some(500), None);
    host.settle();
    log::info!("scroll_to finished: {:?}", settle.outcome());

    let settle = controller.collapse();
    host.settle();
    log::info!("collapse finished: {:?}", settle.outcome());
    host.report("collapsed to header");

    // Rotating the device keeps the header peeking at the same height.
    host.sheet.on_layout(SheetMeasurements {
        available_height: 900.0,
        ..SCREEN
    });
    host.report("after resize");
    Ok(host.frames)
}

fn dialog_walkthrough() -> Result<u64, snapsheet::SheetError> {
    let spec = SnapSpec::new([0.4, 0.9], Positioning::RelativeToAvailableSpace)?;
    let mut host = Host::new(
        "locked dialog",
        SheetConfig::dialog(spec.clone()).with_dismissable(false),
    )?;
    host.settle();
    host.report("opened");
    host.sheet.handle_back_button();
    host.swipe(DragOrigin::Handle, 900.0, 1500.0, 200);
    host.settle();
    host.report("after pull down");
    let mut frames = host.frames;

    let mut host = Host::new("dialog", SheetConfig::dialog(spec))?;
    host.settle();
    host.sheet.handle_backdrop_tap();
    host.settle();
    host.report("after backdrop tap");
    if host.sheet.show().outcome() == Some(SettleOutcome::Skipped) {
        log::warn!("show skipped");
    }
    host.settle();
    host.report("shown again");
    frames += host.frames;
    Ok(frames)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== snapsheet headless demo ===");
    let started = Instant::now();
    let frames = inline_walkthrough().and_then(|inline| Ok(inline + dialog_walkthrough()?));
    match frames {
        Ok(frames) => println!(
            "simulated {frames} frames ({} ms of sheet time) in {:?}",
            frames * FRAME_MILLIS,
            started.elapsed()
        ),
        Err(err) => {
            log::error!("demo configuration rejected: {err}");
            std::process::exit(1);
        }
    }
}
