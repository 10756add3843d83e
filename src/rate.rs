//! Beat interval to heart rate.

use crate::detector::PeakEvent;

/// Milliseconds per minute.
const MS_PER_MINUTE: u32 = 60_000;

/// Beats per minute for a peak-to-peak interval, truncating.
///
/// The detector only reports intervals above the refractory window, so
/// `interval_ms` is never zero in the loop. A zero interval yields 0
/// rather than panicking.
#[inline]
pub const fn estimate_bpm(interval_ms: u32) -> u32 {
    match MS_PER_MINUTE.checked_div(interval_ms) {
        Some(bpm) => bpm,
        None => 0,
    }
}

/// Holds the most recent heart rate estimate.
///
/// The value persists until the next beat; it never expires. Zero means
/// no beat has been reported yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RateTracker {
    bpm: u32,
    beats: u32,
}

impl RateTracker {
    /// Tracker with no beats yet.
    pub const fn new() -> Self {
        Self { bpm: 0, beats: 0 }
    }

    /// Update from a reported peak. Returns the new estimate.
    #[inline]
    pub fn record(&mut self, event: &PeakEvent) -> u32 {
        self.bpm = estimate_bpm(event.interval_ms);
        self.beats = self.beats.wrapping_add(1);
        self.bpm
    }

    /// Latest estimate (0 before the first beat).
    #[inline]
    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// Beats recorded since start.
    #[inline]
    pub fn beats(&self) -> u32 {
        self.beats
    }
}
