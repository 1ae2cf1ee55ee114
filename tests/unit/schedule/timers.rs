use super::*;

#[test]
fn drain_returns_only_due_actions_in_order() {
    let mut timers = Timers::new();
    timers.schedule(TimeMs(30.0), "c");
    timers.schedule(TimeMs(10.0), "a");
    timers.schedule(TimeMs(10.0), "b");
    timers.schedule(TimeMs(99.0), "late");

    let fired: Vec<_> = timers
        .drain_due(TimeMs(30.0))
        .into_iter()
        .map(|(_, a)| a)
        .collect();
    assert_eq!(fired, vec!["a", "b", "c"]);
    assert_eq!(timers.len(), 1);
    assert_eq!(timers.next_due(), Some(TimeMs(99.0)));
}

#[test]
fn cancelled_action_never_fires() {
    let mut timers = Timers::new();
    let t = timers.schedule(TimeMs(5.0), 1);
    assert!(timers.is_pending(t));
    assert!(timers.cancel(t));
    assert!(!timers.cancel(t));
    assert!(timers.drain_due(TimeMs(100.0)).is_empty());
}

#[test]
fn take_removes_and_returns_action() {
    let mut timers = Timers::new();
    let t = timers.schedule(TimeMs(50.0), "nav");
    assert_eq!(timers.take(t), Some("nav"));
    assert_eq!(timers.take(t), None);
    assert!(timers.is_empty());
}
