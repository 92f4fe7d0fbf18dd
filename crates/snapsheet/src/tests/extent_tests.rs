use super::*;
use crate::snap::Positioning;

fn measured(available: f32, header: f32, child: f32) -> SheetGeometry {
    SheetGeometry {
        available_height: available,
        header_height: header,
        child_height: child,
        footer_height: 0.0,
        is_laid_out: true,
        dynamic_size: false,
    }
}

fn relative(snaps: &[f32]) -> SnapSpec {
    SnapSpec::new(snaps.iter().copied(), Positioning::RelativeToAvailableSpace).expect("valid spec")
}

#[test]
fn snaps_are_sorted_and_deduplicated() {
    let spec = relative(&[1.0, 0.4, 0.4005, 0.0]);
    let extent = Extent::new(&spec, measured(1000.0, 0.0, 2000.0), false);
    assert_eq!(extent.snappings().as_slice(), &[0.0, 0.4, 1.0]);
    assert_eq!(extent.min_extent(), 0.0);
    assert_eq!(extent.max_extent(), 1.0);
}

#[test]
fn dialog_gets_a_zero_floor_and_starts_hidden() {
    let spec = relative(&[0.5, 1.0]);
    let extent = Extent::new(&spec, measured(1000.0, 0.0, 2000.0), true);
    assert_eq!(extent.snappings().as_slice(), &[0.0, 0.5, 1.0]);
    assert_eq!(extent.min_extent(), 0.5);
    assert_eq!(extent.floor_extent(), 0.0);
    assert_eq!(extent.current(), 0.0);
}

#[test]
fn inline_starts_at_initial_snap() {
    let spec = relative(&[0.2, 0.6, 1.0]).with_initial_snap(0.6).expect("in range");
    let extent = Extent::new(&spec, measured(1000.0, 0.0, 2000.0), false);
    assert_eq!(extent.current(), 0.6);

    let spec = relative(&[0.2, 0.6, 1.0]);
    let extent = Extent::new(&spec, measured(1000.0, 0.0, 2000.0), false);
    assert_eq!(extent.current(), 0.2);
}

#[test]
fn set_current_clamps() {
    let spec = relative(&[0.4, 1.0]);
    let mut extent = Extent::new(&spec, measured(1000.0, 0.0, 2000.0), false);
    assert_eq!(extent.set_current(1.7), 1.0);
    assert_eq!(extent.set_current(-3.0), 0.0);
    assert_eq!(extent.set_current(f32::NAN), 0.0);
}

#[test]
fn first_layout_resolves_initial_snap() {
    let spec = SnapSpec::new([Snap::Header, Snap::Expanded], Positioning::RelativeToAvailableSpace)
        .expect("valid");
    let mut extent = Extent::new(&spec, SheetGeometry::default(), false);
    assert_eq!(extent.current(), 0.0);

    let outcome = extent.resync(&spec, measured(1000.0, 100.0, 2000.0));
    assert!(outcome.first_layout);
    assert!((extent.current() - 0.1).abs() < 1e-5);
    assert!((extent.target_height() - 1000.0).abs() < 1e-3);
}

#[test]
fn resize_keeps_pixel_height_at_fixed_snap() {
    let spec = SnapSpec::new(
        [Snap::Header, Snap::Value(1.0)],
        Positioning::RelativeToAvailableSpace,
    )
    .expect("valid");
    let mut extent = Extent::new(&spec, SheetGeometry::default(), false);
    extent.resync(&spec, measured(1000.0, 100.0, 2000.0));
    assert!((extent.current() - 0.1).abs() < 1e-5);

    let outcome = extent.resync(&spec, measured(500.0, 100.0, 2000.0));
    assert!(outcome.extent_changed);
    assert!((extent.current() - 0.2).abs() < 1e-5);
    assert!((extent.geometry().extent_to_pixels(extent.current()) - 100.0).abs() < 1e-2);
}

#[test]
fn resize_leaves_relative_snap_alone() {
    let spec = relative(&[0.4, 1.0]);
    let mut extent = Extent::new(&spec, SheetGeometry::default(), false);
    extent.resync(&spec, measured(1000.0, 0.0, 2000.0));
    assert_eq!(extent.current(), 0.4);

    let outcome = extent.resync(&spec, measured(700.0, 0.0, 2000.0));
    assert!(!outcome.extent_changed);
    assert_eq!(extent.current(), 0.4);
}

#[test]
fn shrinking_content_pulls_extent_down_to_max() {
    let spec = SnapSpec::new(
        [Snap::Value(0.2), Snap::Expanded],
        Positioning::RelativeToAvailableSpace,
    )
    .expect("valid");
    let mut extent = Extent::new(&spec, SheetGeometry::default(), false);
    extent.resync(&spec, measured(1000.0, 0.0, 800.0));
    extent.set_current(0.8);

    extent.resync(&spec, measured(1000.0, 0.0, 500.0));
    assert!((extent.max_extent() - 0.5).abs() < 1e-5);
    assert!((extent.current() - 0.5).abs() < 1e-5);
}

#[test]
fn nearest_snap_picks_closest_point() {
    let spec = relative(&[0.0, 0.4, 1.0]);
    let extent = Extent::new(&spec, measured(1000.0, 0.0, 2000.0), false);
    assert_eq!(extent.nearest_snap(0.15), 0.0);
    assert_eq!(extent.nearest_snap(0.6), 0.4);
    assert_eq!(extent.nearest_snap(0.75), 1.0);
}
