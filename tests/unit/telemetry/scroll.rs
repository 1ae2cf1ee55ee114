use super::*;

#[derive(Default)]
struct Recorder {
    seen: Vec<ScrollSample>,
}

impl ScrollObserver for Recorder {
    fn on_sample(&mut self, sample: &ScrollSample) {
        self.seen.push(*sample);
    }
}

fn telemetry() -> ScrollTelemetry {
    ScrollTelemetry::new(TelemetryConfig::default())
}

#[test]
fn first_sample_has_no_direction() {
    let mut t = telemetry();
    let s = t.sample(120.0, TimeMs(0.0));
    assert_eq!(s.direction, ScrollDirection::None);
    assert_eq!(s.velocity, 0.0);
}

#[test]
fn direction_follows_offset_delta() {
    let mut t = telemetry();
    t.sample(0.0, TimeMs(0.0));
    assert_eq!(t.sample(10.0, TimeMs(16.0)).direction, ScrollDirection::Down);
    assert_eq!(t.sample(10.0, TimeMs(32.0)).direction, ScrollDirection::None);
    assert_eq!(t.sample(4.0, TimeMs(48.0)).direction, ScrollDirection::Up);
}

#[test]
fn single_frame_spike_is_attenuated() {
    let mut t = telemetry();
    t.sample(0.0, TimeMs(0.0));
    let s = t.sample(100.0, TimeMs(16.0));
    let raw = 100.0 / 0.016;
    assert!(s.velocity > 0.0);
    assert!(s.velocity < raw * 0.5);
}

#[test]
fn steady_scroll_converges_to_true_rate() {
    let mut t = telemetry();
    let mut last = t.sample(0.0, TimeMs(0.0));
    for i in 1..=120 {
        last = t.sample(i as f64 * 10.0, TimeMs(i as f64 * 10.0));
    }
    assert!((last.velocity - 1000.0).abs() < 1.0);
}

#[test]
fn every_subscriber_sees_the_same_sample() {
    let mut t = telemetry();
    let a = Rc::new(RefCell::new(Recorder::default()));
    let b = Rc::new(RefCell::new(Recorder::default()));
    t.subscribe(&a);
    t.subscribe(&b);

    t.tick(0.0, TimeMs(0.0));
    t.tick(30.0, TimeMs(16.0));

    assert_eq!(a.borrow().seen, b.borrow().seen);
    assert_eq!(a.borrow().seen.len(), 2);
}

#[test]
fn unsubscribed_observer_stops_receiving() {
    let mut t = telemetry();
    let a = Rc::new(RefCell::new(Recorder::default()));
    let id = t.subscribe(&a);
    t.tick(0.0, TimeMs(0.0));
    assert!(t.unsubscribe(id));
    t.tick(5.0, TimeMs(16.0));
    assert_eq!(a.borrow().seen.len(), 1);
}

#[test]
fn dropped_observer_is_pruned_silently() {
    let mut t = telemetry();
    {
        let gone = Rc::new(RefCell::new(Recorder::default()));
        t.subscribe(&gone);
    }
    let alive = Rc::new(RefCell::new(Recorder::default()));
    t.subscribe(&alive);
    let sample = t.sample(0.0, TimeMs(0.0));
    assert_eq!(t.publish(&sample), 1);
    assert_eq!(t.subscriber_count(), 1);
}

#[test]
fn commanded_scroll_reads_as_no_input() {
    let mut t = telemetry();
    t.sample(0.0, TimeMs(0.0));
    t.begin_commanded_scroll(2000.0, TimeMs(10.0));

    let mid = t.sample(900.0, TimeMs(26.0));
    assert_eq!(mid.direction, ScrollDirection::None);
    assert_eq!(mid.velocity, 0.0);
    assert!(t.is_suppressed());

    let arrived = t.sample(2000.0, TimeMs(42.0));
    assert_eq!(arrived.direction, ScrollDirection::None);
    assert!(!t.is_suppressed());

    let after = t.sample(2010.0, TimeMs(58.0));
    assert_eq!(after.direction, ScrollDirection::Down);
}

#[test]
fn commanded_scroll_times_out() {
    let mut t = telemetry();
    t.sample(0.0, TimeMs(0.0));
    t.begin_commanded_scroll(5000.0, TimeMs(0.0));
    t.sample(10.0, TimeMs(2000.0));
    assert!(!t.is_suppressed());
}

#[derive(Default)]
struct Counter(u32);

impl ScrollObserver for Counter {
    fn on_sample(&mut self, _: &ScrollSample) {
        self.0 += 1;
    }
}

#[test]
fn observers_of_different_types_share_one_fan_out() {
    let mut t = telemetry();
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let counter = Rc::new(RefCell::new(Counter::default()));
    t.subscribe(&recorder);
    t.subscribe(&counter);

    let sample = t.sample(5.0, TimeMs(0.0));
    assert_eq!(t.publish(&sample), 2);
    assert_eq!(recorder.borrow().seen.len(), 1);
    assert_eq!(counter.borrow().0, 1);
}
