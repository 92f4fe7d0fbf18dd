use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use snapsheet::fling::fling_target;
use snapsheet::{
    DragEnd, DragOrigin, DragStart, DragUpdate, FlingConfig, Positioning, Runtime, SheetConfig,
    SheetCoordinator, SheetMeasurements, SnapSpec,
};

const FRAME_NANOS: u64 = 16_000_000;
const MOVE_SAMPLES: &[usize] = &[16, 128, 1024];
const SNAP_COUNT_SAMPLES: &[usize] = &[2, 8, 32];

const MEASUREMENTS: SheetMeasurements = SheetMeasurements {
    available_height: 1920.0,
    header_height: 96.0,
    content_height: 6000.0,
    footer_height: 0.0,
    max_scroll_extent: 4000.0,
};

struct Fixture {
    runtime: Runtime,
    sheet: SheetCoordinator,
    now_nanos: u64,
}

impl Fixture {
    fn new() -> Self {
        let runtime = Runtime::default();
        let spec = SnapSpec::new([0.25, 0.5, 1.0], Positioning::RelativeToAvailableSpace)
            .expect("valid spec");
        let sheet =
            SheetCoordinator::new(SheetConfig::new(spec), runtime.handle()).expect("valid config");
        sheet.on_layout(MEASUREMENTS);
        Self {
            runtime,
            sheet,
            now_nanos: 0,
        }
    }

    fn frame(&mut self) {
        self.now_nanos += FRAME_NANOS;
        self.runtime.handle().drain_frame_callbacks(self.now_nanos);
    }

    /// Drags up through the whole sheet into the content and back down.
    fn sweep(&mut self, moves: usize) {
        let step = 8000.0 / moves as f32;
        let mut time_ms = self.now_nanos / 1_000_000;
        self.sheet.drag_start(DragStart {
            origin: DragOrigin::Content,
            position_y: 1500.0,
            time_ms,
        });
        for index in 0..moves {
            time_ms += 8;
            let delta_y = if index < moves / 2 { -step } else { step };
            self.sheet.drag_update(DragUpdate { delta_y, time_ms });
        }
        self.sheet.drag_end(DragEnd {
            velocity_y: Some(0.0),
            time_ms,
        });
    }
}

fn bench_drag_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_routing");
    for &moves in MOVE_SAMPLES {
        group.bench_with_input(BenchmarkId::from_parameter(moves), &moves, |b, &moves| {
            let mut fixture = Fixture::new();
            b.iter(|| {
                fixture.sweep(black_box(moves));
                black_box(fixture.sheet.extent());
            });
        });
    }
    group.finish();
}

fn bench_settle_animation(c: &mut Criterion) {
    c.bench_function("settle_animation", |b| {
        let mut fixture = Fixture::new();
        b.iter(|| {
            let _ = fixture.sheet.expand();
            while fixture.sheet.is_animating() {
                fixture.frame();
            }
            let _ = fixture.sheet.collapse();
            while fixture.sheet.is_animating() {
                fixture.frame();
            }
            black_box(fixture.sheet.extent());
        });
    });
}

fn bench_fling_target(c: &mut Criterion) {
    let mut group = c.benchmark_group("fling_target");
    let config = FlingConfig::default();
    for &count in SNAP_COUNT_SAMPLES {
        let snaps: Vec<f32> = (1..=count).map(|index| index as f32 / count as f32).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &snaps, |b, snaps| {
            b.iter(|| {
                fling_target(
                    black_box(snaps),
                    black_box(0.37),
                    black_box(4200.0),
                    1920.0,
                    &config,
                )
            });
        });
    }
    group.finish();
}

criterion_group!(
    drag_routing,
    bench_drag_routing,
    bench_settle_animation,
    bench_fling_target
);
criterion_main!(drag_routing);
