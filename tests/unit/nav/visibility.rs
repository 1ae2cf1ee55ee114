use super::*;
use proptest::prelude::*;

fn sample(offset: f64, direction: ScrollDirection, at: f64) -> ScrollSample {
    ScrollSample {
        offset,
        velocity: 0.0,
        direction,
        timestamp: TimeMs(at),
    }
}

fn controller() -> NavVisibilityController {
    NavVisibilityController::new(NavConfig::default())
}

#[test]
fn scroll_down_past_threshold_hides_then_up_shows() {
    let mut nav = controller();
    nav.on_sample(&sample(60.0, ScrollDirection::Down, 16.0));
    assert_eq!(nav.state(), NavState::Hidden);

    nav.on_sample(&sample(50.0, ScrollDirection::Up, 32.0));
    assert_eq!(nav.state(), NavState::Visible);
    assert_eq!(nav.transitions(), 2);
}

#[test]
fn scroll_down_within_threshold_keeps_bar() {
    let mut nav = controller();
    nav.on_sample(&sample(40.0, ScrollDirection::Down, 16.0));
    nav.on_sample(&sample(50.0, ScrollDirection::Down, 32.0));
    assert_eq!(nav.state(), NavState::Visible);
}

#[test]
fn lock_freezes_state_in_both_directions() {
    let mut nav = controller();
    nav.set_locked(true);
    nav.on_sample(&sample(500.0, ScrollDirection::Down, 16.0));
    assert_eq!(nav.state(), NavState::Visible);

    nav.set_locked(false);
    nav.on_sample(&sample(600.0, ScrollDirection::Down, 32.0));
    assert_eq!(nav.state(), NavState::Hidden);

    nav.set_locked(true);
    nav.on_sample(&sample(100.0, ScrollDirection::Up, 48.0));
    assert_eq!(nav.state(), NavState::Hidden);
}

#[test]
fn show_near_top_restores_hidden_bar_within_threshold() {
    let mut nav = controller();
    nav.on_sample(&sample(600.0, ScrollDirection::Down, 16.0));
    assert_eq!(nav.state(), NavState::Hidden);

    assert!(!nav.show_near_top(400.0, TimeMs(32.0)));
    assert_eq!(nav.state(), NavState::Hidden);

    nav.set_locked(true);
    assert!(!nav.show_near_top(0.0, TimeMs(48.0)));
    assert_eq!(nav.state(), NavState::Hidden);

    nav.set_locked(false);
    assert!(nav.show_near_top(50.0, TimeMs(64.0)));
    assert_eq!(nav.state(), NavState::Visible);
    assert!(!nav.show_near_top(0.0, TimeMs(80.0)));
    assert_eq!(nav.transitions(), 2);
}

#[test]
fn opposite_transition_cancels_in_flight_animation() {
    let mut nav = controller();
    nav.on_sample(&sample(80.0, ScrollDirection::Down, 0.0));
    let partway = nav.translate_y(TimeMs(100.0));
    assert!(partway < 0.0 && partway > -100.0);

    nav.on_sample(&sample(70.0, ScrollDirection::Up, 100.0));
    assert_eq!(nav.translate_y(TimeMs(100.0)), partway);
    assert_eq!(nav.translate_y(TimeMs(500.0)), 0.0);
}

#[test]
fn entry_animation_runs_once() {
    let mut nav = controller();
    nav.mount(TimeMs(0.0));
    assert_eq!(nav.translate_y(TimeMs(0.0)), -100.0);
    assert_eq!(nav.opacity(TimeMs(0.0)), 0.0);
    assert_eq!(nav.translate_y(TimeMs(1000.0)), 0.0);
    assert_eq!(nav.opacity(TimeMs(1000.0)), 1.0);

    nav.mount(TimeMs(2000.0));
    assert_eq!(nav.translate_y(TimeMs(2000.0)), 0.0);
    assert_eq!(nav.state(), NavState::Visible);
}

proptest! {
    #[test]
    fn no_transition_while_locked(
        start_hidden in any::<bool>(),
        steps in proptest::collection::vec((0.0f64..5000.0, 0u8..3), 0..64),
    ) {
        let mut nav = controller();
        if start_hidden {
            nav.on_sample(&sample(1000.0, ScrollDirection::Down, 0.0));
        }
        let before = nav.visibility();
        nav.set_locked(true);
        for (i, (offset, d)) in steps.into_iter().enumerate() {
            let direction = match d {
                0 => ScrollDirection::Up,
                1 => ScrollDirection::Down,
                _ => ScrollDirection::None,
            };
            nav.on_sample(&sample(offset, direction, 16.0 * (i + 1) as f64));
        }
        prop_assert_eq!(nav.state(), before.state);
    }
}
