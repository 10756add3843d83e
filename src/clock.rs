//! Millisecond tick clock.
//!
//! ```text
//! Timer ISR / task          TickClock           Sampling loop
//! ────────────────          ─────────           ─────────────
//!
//! tick() every 1 ms ──────▶ AtomicU32 ────────▶ now(), elapsed_since()
//! single writer             wraps               single reader
//! ```
//!
//! The counter wraps after ~49.7 days. Never compare ticks with `<`;
//! always measure intervals with [`TickClock::elapsed_since`] or
//! [`elapsed`].

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Milliseconds since start, wrapping.
pub type Tick = u32;

/// Wraparound-safe interval from `earlier` to `later`.
#[inline]
pub const fn elapsed(earlier: Tick, later: Tick) -> u32 {
    later.wrapping_sub(earlier)
}

/// Process-wide monotonic millisecond counter.
///
/// Advanced by an independent periodic source (hardware timer, RTOS timer
/// task, or a host thread). The sampling loop only reads it.
pub struct TickClock {
    ticks: AtomicU32,
}

impl TickClock {
    /// Create a clock starting at zero.
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a clock starting at an arbitrary tick (useful to exercise wrap).
    pub const fn starting_at(start: Tick) -> Self {
        Self {
            ticks: AtomicU32::new(start),
        }
    }

    /// Advance by one millisecond.
    ///
    /// Called from the periodic source only. `fetch_add` wraps on overflow.
    #[inline]
    pub fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::Release);
    }

    /// Advance by `ms` milliseconds at once (simulated time).
    #[inline]
    pub fn advance(&self, ms: u32) {
        self.ticks.fetch_add(ms, Ordering::Release);
    }

    /// Current tick.
    #[inline]
    pub fn now(&self) -> Tick {
        self.ticks.load(Ordering::Acquire)
    }

    /// Milliseconds elapsed since `since`.
    #[inline]
    pub fn elapsed_since(&self, since: Tick) -> u32 {
        elapsed(since, self.now())
    }

    /// Wait until `ms` milliseconds have elapsed on this clock.
    ///
    /// `relax` runs on every poll: `core::hint::spin_loop` on bare metal,
    /// a task delay under an RTOS, `thread::yield_now` on a host.
    /// Returns early with `false` if `stop` is raised while waiting.
    pub fn wait_ms(&self, ms: u32, stop: &AtomicBool, mut relax: impl FnMut()) -> bool {
        let start = self.now();
        while self.elapsed_since(start) < ms {
            if stop.load(Ordering::Acquire) {
                return false;
            }
            relax();
        }
        true
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives a [`TickClock`] from a monotonic elapsed-time reading.
///
/// A tick source that sleeps 1 ms per tick runs slow by the scheduler's
/// overshoot on every sleep. This issues however many ticks the reading
/// says are owed, so overshoot is repaid on the next call instead of lost.
#[derive(Debug, Default)]
pub struct CatchUpTicker {
    issued: u64,
}

impl CatchUpTicker {
    pub const fn new() -> Self {
        Self { issued: 0 }
    }

    /// Tick `clock` until `elapsed_ms` ticks have been issued in total.
    ///
    /// Returns the number of ticks issued by this call. A reading behind
    /// the ticks already issued issues nothing.
    pub fn catch_up(&mut self, clock: &TickClock, elapsed_ms: u64) -> u32 {
        let mut issued = 0;
        while self.issued < elapsed_ms {
            clock.tick();
            self.issued += 1;
            issued += 1;
        }
        issued
    }

    /// Ticks issued since creation.
    #[inline]
    pub fn issued(&self) -> u64 {
        self.issued
    }
}
