//! Assertion helpers for sheet tests.

/// Assert that a value is within `tolerance` of `expected`.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

/// Assert that an extent matches to within a thousandth.
pub fn assert_extent(actual: f32, expected: f32) {
    assert_approx_eq(actual, expected, 1e-3, "extent");
}

/// Assert that `values` never decrease.
pub fn assert_non_decreasing(values: &[f32], msg: &str) {
    for pair in values.windows(2) {
        assert!(
            pair[1] >= pair[0] - 1e-4,
            "{}: {} followed by {} in {:?}",
            msg,
            pair[0],
            pair[1],
            values
        );
    }
}
