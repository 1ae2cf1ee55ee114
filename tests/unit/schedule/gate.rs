use super::*;

#[test]
fn waiters_release_once_on_open() {
    let mut gate = ReadyGate::new();
    assert_eq!(gate.wait(1), None);
    assert_eq!(gate.wait(2), None);
    assert_eq!(gate.pending(), 2);

    assert_eq!(gate.open(TimeMs(40.0)), vec![1, 2]);
    assert!(gate.is_open());
    assert!(gate.open(TimeMs(80.0)).is_empty());
    assert_eq!(gate.opened_at(), Some(TimeMs(40.0)));
}

#[test]
fn late_waiter_passes_through() {
    let mut gate = ReadyGate::new();
    gate.open(TimeMs(0.0));
    assert_eq!(gate.wait("band"), Some("band"));
    assert_eq!(gate.pending(), 0);
}
