use super::*;

#[test]
fn delta_is_clamped_to_range() {
    let state = ScrollState::new(0.0);
    state.set_max_value(200.0);

    assert_eq!(state.dispatch_raw_delta(150.0), 150.0);
    assert_eq!(state.dispatch_raw_delta(150.0), 50.0);
    assert_eq!(state.value(), 200.0);
    assert!(state.is_at_bottom());

    assert_eq!(state.dispatch_raw_delta(-500.0), -200.0);
    assert!(state.is_at_top());
    assert_eq!(state.dispatch_raw_delta(-10.0), 0.0);
}

#[test]
fn shrinking_range_pulls_offset_back() {
    let state = ScrollState::new(0.0);
    state.set_max_value(300.0);
    state.scroll_to(250.0);
    state.set_max_value(100.0);
    assert_eq!(state.value(), 100.0);
}

#[test]
fn clones_share_position_and_notify() {
    let state = ScrollState::default();
    let clone = state.clone();
    state.set_max_value(100.0);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_in_callback = Rc::clone(&seen);
    let id = state.add_change_callback(move |value| seen_in_callback.borrow_mut().push(value));

    clone.consume_scroll_delta(40.0);
    assert_eq!(state.offset(), 40.0);
    assert_eq!(state.id(), clone.id());

    state.remove_change_callback(id);
    clone.scroll_to(10.0);
    assert_eq!(seen.borrow().as_slice(), &[40.0]);
}

#[test]
fn non_finite_input_is_ignored() {
    let state = ScrollState::new(0.0);
    state.set_max_value(f32::INFINITY);
    assert_eq!(state.max_value(), 0.0);
    state.set_max_value(50.0);
    assert_eq!(state.dispatch_raw_delta(f32::NAN), 0.0);
    state.scroll_to(f32::NAN);
    assert_eq!(state.value(), 0.0);
}
