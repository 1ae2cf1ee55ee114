use std::{cell::RefCell, rc::Rc};

use super::*;

const DESKTOP: Viewport = Viewport {
    width: 1280.0,
    height: 800.0,
};
const PHONE: Viewport = Viewport {
    width: 390.0,
    height: 844.0,
};

fn intent(route: &str, theme: Theme) -> NavigationIntent {
    NavigationIntent {
        destination: Destination::Route(route.to_string()),
        theme,
    }
}

fn recorded(c: &mut TransitionChoreographer) -> Rc<RefCell<Vec<TransitionRequest>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    c.bus_mut().subscribe(move |r| sink.borrow_mut().push(*r));
    log
}

fn choreographer(config: TransitionConfig) -> TransitionChoreographer {
    TransitionChoreographer::new(config, Breakpoint::default())
}

#[test]
fn desktop_emits_once_and_defers_by_grace() {
    let mut c = choreographer(TransitionConfig::default());
    let log = recorded(&mut c);

    let outcome = c.request(intent("/work", Theme::Dark), DESKTOP, TimeMs(1000.0));
    let RequestOutcome::Deferred { execute_at, .. } = outcome else {
        panic!("expected deferral, got {outcome:?}");
    };
    assert_eq!(execute_at, TimeMs(1200.0));
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(log.borrow()[0].theme, Theme::Dark);
    assert!(c.in_flight().is_some());
    assert_eq!(c.deadline(), Some(TimeMs(1200.0)));

    assert!(c.poll(TimeMs(1199.0)).is_empty());
    assert_eq!(
        c.poll(TimeMs(1200.0)),
        vec![Destination::Route("/work".into())]
    );
    assert!(c.in_flight().is_none());
    assert_eq!(c.deadline(), None);
    assert!(c.poll(TimeMs(5000.0)).is_empty());
}

#[test]
fn narrow_viewport_navigates_immediately_without_events() {
    let mut c = choreographer(TransitionConfig::default());
    let log = recorded(&mut c);

    let outcome = c.request(intent("/about", Theme::Light), PHONE, TimeMs(0.0));
    assert_eq!(
        outcome,
        RequestOutcome::Immediate(Destination::Route("/about".into()))
    );
    assert!(log.borrow().is_empty());
    assert_eq!(c.emitted(), 0);
    assert!(c.poll(TimeMs(1000.0)).is_empty());
}

#[test]
fn second_request_supersedes_the_first() {
    let mut c = choreographer(TransitionConfig::default());
    let log = recorded(&mut c);

    c.request(intent("/a", Theme::Light), DESKTOP, TimeMs(0.0));
    c.request(intent("/b", Theme::Dark), DESKTOP, TimeMs(100.0));
    assert_eq!(c.superseded(), 1);
    assert_eq!(log.borrow().len(), 2);

    assert!(c.poll(TimeMs(250.0)).is_empty());
    assert_eq!(c.poll(TimeMs(300.0)), vec![Destination::Route("/b".into())]);
}

#[test]
fn acknowledgment_runs_navigation_early_when_waiting() {
    let mut c = choreographer(TransitionConfig {
        wait_for_reveal: true,
        ..TransitionConfig::default()
    });
    let outcome = c.request(intent("/x", Theme::Dark), DESKTOP, TimeMs(0.0));
    assert!(matches!(
        outcome,
        RequestOutcome::Deferred { execute_at, .. } if execute_at == TimeMs(1000.0)
    ));

    assert_eq!(c.revealed(TimeMs(350.0)), Some(Destination::Route("/x".into())));
    assert!(c.in_flight().is_none());
    assert!(c.poll(TimeMs(2000.0)).is_empty());
    assert_eq!(c.revealed(TimeMs(2100.0)), None);
}

#[test]
fn acknowledgment_falls_back_to_timeout() {
    let mut c = choreographer(TransitionConfig {
        wait_for_reveal: true,
        ..TransitionConfig::default()
    });
    c.request(intent("/x", Theme::Dark), DESKTOP, TimeMs(0.0));
    assert_eq!(c.poll(TimeMs(1000.0)).len(), 1);
}

#[test]
fn acknowledgment_ignored_with_fixed_grace() {
    let mut c = choreographer(TransitionConfig::default());
    c.request(intent("/x", Theme::Dark), DESKTOP, TimeMs(0.0));
    assert_eq!(c.revealed(TimeMs(50.0)), None);
    assert_eq!(c.poll(TimeMs(200.0)).len(), 1);
}

#[test]
fn unsubscribed_listener_stops_receiving() {
    let mut c = choreographer(TransitionConfig::default());
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    let id = c.bus_mut().subscribe(move |_| *sink.borrow_mut() += 1);

    c.request(intent("/a", Theme::Light), DESKTOP, TimeMs(0.0));
    assert!(c.bus_mut().unsubscribe(id));
    c.request(intent("/b", Theme::Light), DESKTOP, TimeMs(10.0));
    assert_eq!(*count.borrow(), 1);
    assert!(c.bus_mut().is_empty());
}

#[test]
fn destination_serde_shape() {
    let d: Destination = serde_json::from_str(r#"{"kind":"section","id":"contact"}"#).unwrap();
    assert_eq!(d, Destination::Section("contact".into()));
    let top: Destination = serde_json::from_str(r#"{"kind":"top"}"#).unwrap();
    assert_eq!(top, Destination::Top);
}
