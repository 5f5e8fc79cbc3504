use super::*;

#[test]
fn clamps_at_duration_and_stops_ticking() {
    let mut p = ProgressPredictor::default();
    let start = Instant::now();
    p.sync(10.0, 12.0, true, start);
    assert!(p.is_ticking());

    p.tick();
    assert_eq!(p.displayed(), 11.0);
    p.tick();
    assert_eq!(p.displayed(), 12.0);
    assert!(!p.is_ticking());
    p.tick();
    assert_eq!(p.displayed(), 12.0);
}

#[test]
fn poll_fires_one_tick_per_second() {
    let mut p = ProgressPredictor::default();
    let start = Instant::now();
    p.sync(10.0, 100.0, true, start);

    assert!(!p.poll(start + Duration::from_millis(999)));
    assert_eq!(p.displayed(), 10.0);

    assert!(p.poll(start + Duration::from_millis(1000)));
    assert_eq!(p.displayed(), 11.0);

    // A late frame catches up on every missed tick.
    assert!(p.poll(start + Duration::from_millis(3500)));
    assert_eq!(p.displayed(), 13.0);
}

#[test]
fn three_ticks_from_ten_clamp_at_twelve() {
    let mut p = ProgressPredictor::default();
    let start = Instant::now();
    p.sync(10.0, 12.0, true, start);
    p.poll(start + Duration::from_secs(3));
    assert_eq!(p.displayed(), 12.0);
    assert!(!p.is_ticking());
    p.poll(start + Duration::from_secs(10));
    assert_eq!(p.displayed(), 12.0);
}

#[test]
fn holds_when_not_playing() {
    let mut p = ProgressPredictor::default();
    let start = Instant::now();
    p.sync(42.0, 100.0, false, start);
    assert!(!p.is_ticking());
    p.poll(start + Duration::from_secs(5));
    assert_eq!(p.displayed(), 42.0);
}

#[test]
fn unknown_duration_does_not_tick() {
    let mut p = ProgressPredictor::default();
    let start = Instant::now();
    p.sync(3.0, 0.0, true, start);
    assert!(!p.is_ticking());
    p.poll(start + Duration::from_secs(5));
    assert_eq!(p.displayed(), 3.0);
}

#[test]
fn sync_cancels_previous_ticker_and_restarts_from_fresh_value() {
    let mut p = ProgressPredictor::default();
    let start = Instant::now();
    p.sync(0.0, 100.0, true, start);
    p.poll(start + Duration::from_secs(2));
    assert_eq!(p.displayed(), 2.0);

    // Server says 30s at t=2.5; the old schedule (next tick at t=3) is dropped.
    let resync = start + Duration::from_millis(2500);
    p.sync(30.0, 100.0, true, resync);
    assert!(!p.poll(start + Duration::from_millis(3000)));
    assert_eq!(p.displayed(), 30.0);
    assert!(p.poll(start + Duration::from_millis(3500)));
    assert_eq!(p.displayed(), 31.0);
}

#[test]
fn progress_beyond_duration_is_clamped_and_not_ticking() {
    let mut p = ProgressPredictor::default();
    p.sync(500.0, 200.0, true, Instant::now());
    assert_eq!(p.displayed(), 200.0);
    assert!(!p.is_ticking());
}

#[test]
fn non_finite_values_are_sanitized() {
    let mut p = ProgressPredictor::default();
    p.sync(f64::NAN, f64::INFINITY, true, Instant::now());
    assert_eq!(p.displayed(), 0.0);
    assert_eq!(p.duration(), 0.0);
    assert!(!p.is_ticking());
}
