//! Property-based invariant tests for sheet geometry and gestures.
//!
//! 1. Normalized snaps always land in `[0, 1]`
//! 2. Reverse normalization round-trips every reachable extent
//! 3. Resolved snappings are sorted and distinct, dialogs start at 0
//! 4. No operation sequence drives the extent outside `[0, 1]`
//! 5. Expanded and collapsed only coincide when there is no range
//! 6. A non-dismissable sheet never settles below its lowest snap

use proptest::prelude::*;
use snapsheet::{
    normalize, reverse_normalize, DragOrigin, Positioning, SheetConfig, SheetGeometry,
    SnapOptions, SnapSpec, Snap, EXTENT_EPSILON,
};
use snapsheet_testing::SheetRobot;

// ── Strategies ──────────────────────────────────────────────────────────

fn positioning_strategy() -> impl Strategy<Value = Positioning> {
    prop_oneof![
        Just(Positioning::RelativeToAvailableSpace),
        Just(Positioning::RelativeToSheetHeight),
        Just(Positioning::PixelOffset),
    ]
}

fn geometry_strategy() -> impl Strategy<Value = SheetGeometry> {
    (100.0f32..2000.0, 0.0f32..200.0, 50.0f32..3000.0, 0.0f32..200.0, any::<bool>()).prop_map(
        |(available, header, child, footer, dynamic_size)| SheetGeometry {
            available_height: available,
            header_height: header,
            child_height: child,
            footer_height: footer,
            is_laid_out: true,
            dynamic_size,
        },
    )
}

fn snap_strategy() -> impl Strategy<Value = Snap> {
    prop_oneof![
        4 => (0.0f32..=1.0).prop_map(Snap::Value),
        1 => Just(Snap::Header),
        1 => Just(Snap::Footer),
        1 => Just(Snap::HeaderAndFooter),
        1 => Just(Snap::Expanded),
    ]
}

fn relative_snaps_strategy() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(0.05f32..=1.0, 1..5)
}

#[derive(Debug, Clone)]
enum Op {
    Press(DragOrigin),
    Move(f32),
    Release(f32),
    ReleaseEstimated,
    Cancel,
    Frames(u8),
    Expand,
    Collapse,
    Hide,
    Show,
    SnapTo(f32),
    ScrollTo(f32),
    Layout(f32),
    Back,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop_oneof![Just(DragOrigin::Handle), Just(DragOrigin::Content)].prop_map(Op::Press),
        (-400.0f32..400.0).prop_map(Op::Move),
        (-9000.0f32..9000.0).prop_map(Op::Release),
        Just(Op::ReleaseEstimated),
        Just(Op::Cancel),
        (1u8..40).prop_map(Op::Frames),
        Just(Op::Expand),
        Just(Op::Collapse),
        Just(Op::Hide),
        Just(Op::Show),
        (-0.5f32..1.5).prop_map(Op::SnapTo),
        (-100.0f32..1500.0).prop_map(Op::ScrollTo),
        (200.0f32..2000.0).prop_map(Op::Layout),
        Just(Op::Back),
    ]
}

fn apply(robot: &mut SheetRobot, op: &Op) {
    match op {
        Op::Press(origin) => robot.press(*origin),
        Op::Move(dy) => robot.move_by(*dy),
        Op::Release(velocity) => robot.release_with_velocity(*velocity),
        Op::ReleaseEstimated => robot.release(),
        Op::Cancel => robot.cancel(),
        Op::Frames(count) => robot.advance_time(u64::from(*count) * 16),
        Op::Expand => drop(robot.sheet().expand()),
        Op::Collapse => drop(robot.sheet().collapse()),
        Op::Hide => drop(robot.sheet().hide()),
        Op::Show => drop(robot.sheet().show()),
        Op::SnapTo(extent) => drop(robot.sheet().snap_to_extent(*extent, SnapOptions::default())),
        Op::ScrollTo(offset) => drop(robot.sheet().scroll_to(*offset, Some(300), None)),
        Op::Layout(available) => robot.layout_simple(*available, 2000.0, 1000.0),
        Op::Back => {
            robot.sheet().handle_back_button();
        }
    }
}

fn spec(snaps: &[f32]) -> SnapSpec {
    SnapSpec::new(snaps.iter().copied(), Positioning::RelativeToAvailableSpace)
        .expect("generated snaps are in range")
}

fn check_state(robot: &SheetRobot) -> Result<(), TestCaseError> {
    let extent = robot.extent();
    prop_assert!((0.0..=1.0).contains(&extent), "extent {extent} out of range");

    let snaps = robot.sheet().snappings();
    for pair in snaps.windows(2) {
        prop_assert!(pair[0] < pair[1], "snappings not strictly sorted: {snaps:?}");
    }

    let state = robot.state();
    if state.is_expanded && state.is_collapsed {
        prop_assert!(state.max_extent - state.min_extent <= EXTENT_EPSILON);
    }
    prop_assert!((0.0..=1.0).contains(&state.progress));
    prop_assert_eq!(state.is_hidden, !state.is_shown);

    let offset = robot.scroll_offset();
    prop_assert!(offset >= 0.0 && offset <= state.max_scroll_extent + 0.01);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// 1–2. Normalization
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn normalized_snaps_stay_in_unit_range(
        snap in snap_strategy(),
        positioning in positioning_strategy(),
        geometry in geometry_strategy(),
    ) {
        let extent = normalize(snap, positioning, &geometry);
        prop_assert!((0.0..=1.0).contains(&extent), "{snap:?} -> {extent}");
        prop_assert!(extent <= geometry.max_possible_extent() + 1e-6);
    }

    #[test]
    fn pixel_snaps_beyond_the_screen_clamp(
        pixels in 0.0f32..10_000.0,
        geometry in geometry_strategy(),
    ) {
        let extent = normalize(Snap::Value(pixels), Positioning::PixelOffset, &geometry);
        prop_assert!((0.0..=1.0).contains(&extent));
    }

    #[test]
    fn reverse_normalize_round_trips(
        fraction in 0.0f32..=1.0,
        positioning in positioning_strategy(),
        geometry in geometry_strategy(),
    ) {
        let extent = fraction * geometry.max_possible_extent();
        let host = reverse_normalize(extent, positioning, &geometry);
        let back = normalize(Snap::Value(host), positioning, &geometry);
        prop_assert!((back - extent).abs() <= 1e-4, "{extent} -> {host} -> {back}");
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Resolved snappings
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn dialog_snappings_start_at_zero(
        snaps in relative_snaps_strategy(),
        available in 200.0f32..2000.0,
    ) {
        let mut robot = SheetRobot::new(SheetConfig::dialog(spec(&snaps)));
        robot.layout_simple(available, 3000.0, 1000.0);
        let resolved = robot.sheet().snappings();
        prop_assert_eq!(resolved.first().copied(), Some(0.0));
        for pair in resolved.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn inline_sheet_opens_at_lowest_snap(snaps in relative_snaps_strategy()) {
        let mut robot = SheetRobot::new(SheetConfig::new(spec(&snaps)));
        robot.layout_simple(1000.0, 3000.0, 1000.0);
        let lowest = snaps.iter().copied().fold(f32::INFINITY, f32::min);
        prop_assert!((robot.extent() - lowest).abs() <= EXTENT_EPSILON);
        prop_assert!(robot.state().progress <= EXTENT_EPSILON);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4–6. Arbitrary operation sequences
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn inline_sheet_stays_in_bounds(
        snaps in relative_snaps_strategy(),
        dismissable in any::<bool>(),
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let config = SheetConfig::new(spec(&snaps)).with_dismissable(dismissable);
        let mut robot = SheetRobot::new(config);
        robot.layout_simple(1000.0, 2000.0, 1000.0);
        for op in &ops {
            apply(&mut robot, op);
            check_state(&robot)?;
        }
        robot.cancel();
        robot.wait_for_idle();
        check_state(&robot)?;
    }

    #[test]
    fn dialog_sheet_stays_in_bounds(
        snaps in relative_snaps_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let mut robot = SheetRobot::new(SheetConfig::dialog(spec(&snaps)));
        robot.layout_simple(1000.0, 2000.0, 1000.0);
        for op in &ops {
            apply(&mut robot, op);
            check_state(&robot)?;
        }
    }

    #[test]
    fn non_dismissable_release_never_rests_below_min(
        snaps in relative_snaps_strategy(),
        pull in 0.0f32..1500.0,
        velocity in 0.0f32..9000.0,
    ) {
        let config = SheetConfig::dialog(spec(&snaps)).with_dismissable(false);
        let mut robot = SheetRobot::new(config);
        robot.layout_simple(1000.0, 2000.0, 1000.0);
        robot.wait_for_idle();

        robot.drag_and_release(DragOrigin::Handle, pull, velocity);
        robot.wait_for_idle();
        let min = robot.state().min_extent;
        prop_assert!(robot.extent() >= min - EXTENT_EPSILON, "{} < {min}", robot.extent());
        prop_assert_eq!(robot.dismissed_count(), 0);
    }
}
