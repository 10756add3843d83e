//! Tick clock tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ecg_heart_monitor::clock::{elapsed, CatchUpTicker, TickClock};

#[test]
fn test_clock_starts_at_zero() {
    let clock = TickClock::new();
    assert_eq!(clock.now(), 0);
}

#[test]
fn test_elapsed_since() {
    let clock = TickClock::new();
    let start = clock.now();
    clock.advance(250);
    assert_eq!(clock.elapsed_since(start), 250);
}

#[test]
fn test_counter_wraps() {
    let clock = TickClock::starting_at(u32::MAX);
    clock.tick();
    assert_eq!(clock.now(), 0);
}

#[test]
fn test_elapsed_across_wrap() {
    let t1 = u32::MAX - 5;
    let t2 = t1.wrapping_add(20);
    assert!(t2 < t1);
    assert_eq!(elapsed(t1, t2), 20);

    let clock = TickClock::starting_at(t1);
    clock.advance(20);
    assert_eq!(clock.elapsed_since(t1), 20);
}

#[test]
fn test_wait_ms_stops_early() {
    let clock = TickClock::new();
    let stop = AtomicBool::new(false);
    let mut polls = 0;

    // Nobody ticks; only the stop flag can end the wait
    let finished = clock.wait_ms(100, &stop, || {
        polls += 1;
        if polls == 10 {
            stop.store(true, Ordering::Release);
        }
    });

    assert!(!finished);
    assert_eq!(polls, 10);
}

#[test]
fn test_concurrent_tick_source() {
    let clock = Arc::new(TickClock::new());
    let done = Arc::new(AtomicBool::new(false));

    let ticker = {
        let clock = Arc::clone(&clock);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            while !done.load(Ordering::Acquire) {
                thread::sleep(Duration::from_millis(1));
                clock.tick();
            }
        })
    };

    let stop = AtomicBool::new(false);
    let start = clock.now();
    assert!(clock.wait_ms(20, &stop, thread::yield_now));
    assert!(clock.elapsed_since(start) >= 20);

    done.store(true, Ordering::Release);
    ticker.join().unwrap();
}

#[test]
fn test_catch_up_repays_late_wakeups() {
    let clock = TickClock::new();
    let mut ticker = CatchUpTicker::new();

    // Wake-ups at irregular elapsed readings, some far past the 1 ms
    // deadline; the clock must still land exactly on the reading.
    let mut total = 0;
    for elapsed_ms in [0, 1, 3, 7, 8, 20, 1000] {
        total += ticker.catch_up(&clock, elapsed_ms);
        assert_eq!(clock.now() as u64, elapsed_ms);
    }

    assert_eq!(total, 1000);
    assert_eq!(ticker.issued(), 1000);
}

#[test]
fn test_catch_up_ignores_stale_reading() {
    let clock = TickClock::new();
    let mut ticker = CatchUpTicker::new();

    assert_eq!(ticker.catch_up(&clock, 50), 50);
    assert_eq!(ticker.catch_up(&clock, 40), 0);
    assert_eq!(ticker.catch_up(&clock, 50), 0);
    assert_eq!(clock.now(), 50);
}

#[test]
fn test_deadline_ticker_keeps_wall_time() {
    let clock = Arc::new(TickClock::new());
    let done = Arc::new(AtomicBool::new(false));
    let start = Instant::now();

    let ticker = {
        let clock = Arc::clone(&clock);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut ticker = CatchUpTicker::new();
            while !done.load(Ordering::Acquire) {
                let deadline = start + Duration::from_millis(ticker.issued() + 1);
                thread::sleep(deadline.saturating_duration_since(Instant::now()));
                ticker.catch_up(&clock, start.elapsed().as_millis() as u64);
            }
        })
    };

    thread::sleep(Duration::from_millis(200));
    done.store(true, Ordering::Release);
    ticker.join().unwrap();

    // Never ahead of wall time; a plain 1 ms sleep loop falls well behind
    let wall = start.elapsed().as_millis() as u64;
    let ticks = clock.now() as u64;
    assert!(ticks <= wall);
    assert!(ticks >= 195, "clock fell behind: {} ticks in {} ms", ticks, wall);
}
