use super::*;

#[test]
fn linear_tween_interpolates_over_duration() {
    let t = Tween::new(0.0, 100.0, TimeMs(1000.0), 500.0, Ease::Linear);
    assert_eq!(t.value_at(TimeMs(900.0)), 0.0);
    assert_eq!(t.value_at(TimeMs(1250.0)), 50.0);
    assert_eq!(t.value_at(TimeMs(2000.0)), 100.0);
    assert!(t.is_complete(TimeMs(1500.0)));
}

#[test]
fn zero_duration_lands_immediately() {
    let t = Tween::new(3.0, 7.0, TimeMs(10.0), 0.0, Ease::Power3Out);
    assert_eq!(t.value_at(TimeMs(10.0)), 7.0);
}

#[test]
fn retarget_starts_from_current_value() {
    let mut slot = TweenSlot::new(0.0);
    slot.retarget(100.0, TimeMs(0.0), 1000.0, Ease::Linear);
    assert_eq!(slot.value_at(TimeMs(400.0)), 40.0);

    slot.retarget(0.0, TimeMs(400.0), 1000.0, Ease::Linear);
    assert_eq!(slot.value_at(TimeMs(400.0)), 40.0);
    assert_eq!(slot.target(), 0.0);
    assert_eq!(slot.value_at(TimeMs(900.0)), 20.0);
}

#[test]
fn overwrite_never_queues_behind_old_tween() {
    let mut slot = TweenSlot::new(0.0);
    slot.retarget(10.0, TimeMs(0.0), 1000.0, Ease::Linear);
    slot.retarget(-10.0, TimeMs(100.0), 100.0, Ease::Linear);
    assert_eq!(slot.value_at(TimeMs(200.0)), -10.0);
    assert!(slot.settle(TimeMs(200.0)));
}

#[test]
fn settle_retires_completed_tween() {
    let mut slot = TweenSlot::new(1.0);
    slot.retarget(5.0, TimeMs(0.0), 10.0, Ease::Linear);
    assert!(!slot.settle(TimeMs(5.0)));
    assert!(slot.settle(TimeMs(10.0)));
    assert_eq!(slot.value_at(TimeMs(0.0)), 5.0);
    assert!(!slot.settle(TimeMs(20.0)));
}

#[test]
fn set_discards_in_flight_and_bumps_generation() {
    let mut slot = TweenSlot::new(0.0);
    slot.retarget(10.0, TimeMs(0.0), 1000.0, Ease::Linear);
    let g = slot.generation();
    slot.set(3.0);
    assert!(slot.generation() != g);
    assert_eq!(slot.value_at(TimeMs(500.0)), 3.0);
}

#[test]
fn delayed_retarget_holds_start_value() {
    let mut slot = TweenSlot::new(0.0);
    slot.retarget_delayed(1.0, TimeMs(0.0), 100.0, 100.0, Ease::Linear);
    assert_eq!(slot.value_at(TimeMs(50.0)), 0.0);
    assert_eq!(slot.value_at(TimeMs(150.0)), 0.5);
}
