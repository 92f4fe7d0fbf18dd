use super::*;

fn geometry(available: f32, header: f32, child: f32, footer: f32) -> SheetGeometry {
    SheetGeometry {
        available_height: available,
        header_height: header,
        child_height: child,
        footer_height: footer,
        is_laid_out: true,
        dynamic_size: false,
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn empty_spec_is_rejected() {
    let err = SnapSpec::new(Vec::<f32>::new(), Positioning::RelativeToAvailableSpace);
    assert_eq!(err, Err(SnapSpecError::Empty));
}

#[test]
fn relative_values_must_be_fractions() {
    let err = SnapSpec::new([0.2, 1.5], Positioning::RelativeToAvailableSpace);
    assert_eq!(err, Err(SnapSpecError::OutOfRange { value: 1.5 }));

    let err = SnapSpec::new([-0.1], Positioning::RelativeToSheetHeight);
    assert_eq!(err, Err(SnapSpecError::OutOfRange { value: -0.1 }));
}

#[test]
fn pixel_values_may_exceed_one_but_not_go_negative() {
    assert!(SnapSpec::new([120.0, 480.0], Positioning::PixelOffset).is_ok());
    let err = SnapSpec::new([-4.0], Positioning::PixelOffset);
    assert_eq!(err, Err(SnapSpecError::NegativeOffset { value: -4.0 }));
}

#[test]
fn infinity_is_expanded_and_nan_is_rejected() {
    let spec = SnapSpec::new([0.3, f32::INFINITY], Positioning::RelativeToAvailableSpace)
        .expect("valid spec");
    assert_eq!(spec.snappings()[1], Snap::Expanded);

    let err = SnapSpec::new([f32::NAN], Positioning::RelativeToAvailableSpace);
    assert!(matches!(err, Err(SnapSpecError::NotFinite { .. })));
}

#[test]
fn initial_snap_must_lie_inside_plain_range() {
    let spec = SnapSpec::new([0.3, 0.8], Positioning::RelativeToAvailableSpace).expect("valid");
    let err = spec.clone().with_initial_snap(0.9);
    assert_eq!(
        err,
        Err(SnapSpecError::InitialOutOfRange {
            initial: 0.9,
            min: 0.3,
            max: 0.8,
        })
    );
    let spec = spec.with_initial_snap(0.5).expect("inside range");
    assert_eq!(spec.initial_snap(), Some(Snap::Value(0.5)));
}

#[test]
fn sentinels_need_their_sheet_part() {
    let spec = SnapSpec::new(
        [Snap::Header, Snap::Expanded],
        Positioning::RelativeToAvailableSpace,
    )
    .expect("valid");
    assert_eq!(
        spec.validate_parts(false, true),
        Err(SnapSpecError::MissingHeader { snap: Snap::Header })
    );
    assert!(spec.validate_parts(true, false).is_ok());

    let spec = SnapSpec::new([Snap::HeaderAndFooter], Positioning::RelativeToAvailableSpace)
        .expect("valid");
    assert!(matches!(
        spec.validate_parts(true, false),
        Err(SnapSpecError::MissingFooter { .. })
    ));
}

#[test]
fn normalize_each_positioning() {
    let geometry = geometry(1000.0, 50.0, 400.0, 50.0);

    let relative = normalize(Snap::Value(0.4), Positioning::RelativeToAvailableSpace, &geometry);
    assert!(approx(relative, 0.4));

    // A 500 px sheet in 1000 px of space: half the sheet is a quarter of the space.
    let sheet = normalize(Snap::Value(0.5), Positioning::RelativeToSheetHeight, &geometry);
    assert!(approx(sheet, 0.25));

    let pixels = normalize(Snap::Value(200.0), Positioning::PixelOffset, &geometry);
    assert!(approx(pixels, 0.2));
}

#[test]
fn normalize_sentinels() {
    let geometry = geometry(1000.0, 80.0, 600.0, 40.0);
    let positioning = Positioning::RelativeToAvailableSpace;
    assert!(approx(normalize(Snap::Header, positioning, &geometry), 0.08));
    assert!(approx(normalize(Snap::Footer, positioning, &geometry), 0.04));
    assert!(approx(normalize(Snap::HeaderAndFooter, positioning, &geometry), 0.12));
    assert!(approx(normalize(Snap::Expanded, positioning, &geometry), 0.72));

    let dynamic = SheetGeometry {
        dynamic_size: true,
        ..geometry
    };
    assert_eq!(normalize(Snap::Expanded, positioning, &dynamic), 1.0);
}

#[test]
fn short_sheet_caps_relative_snaps() {
    let geometry = geometry(1000.0, 0.0, 300.0, 0.0);
    let value = normalize(Snap::Value(0.9), Positioning::RelativeToAvailableSpace, &geometry);
    assert!(approx(value, 0.3));
}

#[test]
fn unmeasured_geometry_clamps_raw_values() {
    let geometry = SheetGeometry::default();
    assert_eq!(normalize(Snap::Value(0.6), Positioning::PixelOffset, &geometry), 0.6);
    assert_eq!(normalize(Snap::Value(300.0), Positioning::PixelOffset, &geometry), 1.0);
    assert_eq!(normalize(Snap::Header, Positioning::PixelOffset, &geometry), 0.0);
    assert_eq!(normalize(Snap::Expanded, Positioning::PixelOffset, &geometry), 1.0);
    assert_eq!(reverse_normalize(0.3, Positioning::PixelOffset, &geometry), 0.3);
}

#[test]
fn reverse_normalize_inverts_each_mode() {
    let geometry = geometry(800.0, 40.0, 500.0, 60.0);
    let cases = [
        (Positioning::RelativeToAvailableSpace, 0.35),
        (Positioning::RelativeToSheetHeight, 0.6),
        (Positioning::PixelOffset, 240.0),
    ];
    for (positioning, value) in cases {
        let extent = normalize(Snap::Value(value), positioning, &geometry);
        let back = reverse_normalize(extent, positioning, &geometry);
        assert!((back - value).abs() < 1e-3, "{positioning:?}: {value} -> {back}");
    }
}

#[test]
fn fixed_snaps() {
    let geometry = geometry(800.0, 40.0, 500.0, 60.0);
    assert!(is_fixed(Snap::Header, Positioning::RelativeToAvailableSpace, &geometry));
    assert!(is_fixed(Snap::Value(100.0), Positioning::PixelOffset, &geometry));
    assert!(!is_fixed(Snap::Value(0.4), Positioning::RelativeToAvailableSpace, &geometry));
    assert!(is_fixed(Snap::Expanded, Positioning::RelativeToAvailableSpace, &geometry));
}
