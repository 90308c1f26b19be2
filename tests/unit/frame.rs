use super::*;

#[test]
fn manual_clock_only_moves_forward() {
    let clock = ManualClock::new(10.0);
    assert_eq!(clock.now_ms(), 10.0);
    assert_eq!(clock.advance(16.0), 26.0);
    assert_eq!(clock.advance(-5.0), 26.0);
    clock.set(5.0);
    assert_eq!(clock.now_ms(), 26.0);
    clock.set(100.0);
    assert_eq!(clock.now_ms(), 100.0);
}

#[test]
fn frames_count_and_measure_deltas() {
    let f = FrameInfo::first(100.0);
    let g = f.next(116.0);
    assert_eq!(g.index, 1);
    assert_eq!(g.delta_ms, 16.0);
    let h = g.next(50.0);
    assert_eq!(h.now_ms, 116.0);
    assert_eq!(h.delta_ms, 0.0);
}

#[test]
fn system_clock_is_monotonic() {
    let clock = SystemClock::start();
    let a = clock.now_ms();
    let b = clock.now_ms();
    assert!(b >= a);
    assert!(a >= 0.0);
}
