//! Threshold peak detector with refractory gate.
//!
//! Pure logic, no hardware dependencies. Consumes conditioned samples
//! paired with the current tick, produces beat events. Fully testable on host.
//!
//! # Transitions
//!
//! ```text
//!              s > threshold, disarmed
//!   ┌────────┐ ─────────────────────────▶ ┌───────┐
//!   │Disarmed│                            │ Armed │
//!   └────────┘ ◀───────────────────────── └───────┘
//!                   s < threshold
//! ```
//!
//! Arming reports a peak only if more than the refractory window has passed
//! since the last *reported* peak. `s == threshold` never transitions.

use crate::clock::{elapsed, Tick};
use crate::config::{MonitorConfig, PEAK_THRESHOLD, REFRACTORY_MS};
use crate::sample::Sample;

/// A reported heartbeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeakEvent {
    /// Tick at which the rising crossing was observed.
    pub at: Tick,

    /// Milliseconds since the previous reported peak. Always > refractory.
    pub interval_ms: u32,
}

/// Outcome of feeding one sample to the detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Detection {
    /// No rising crossing on this sample.
    Quiet,

    /// Rising crossing, reported as a beat.
    Peak(PeakEvent),

    /// Rising crossing inside the refractory window. Detector armed,
    /// nothing reported, last peak time unchanged.
    Refractory {
        /// Milliseconds since the last reported peak.
        interval_ms: u32,
    },
}

impl Detection {
    /// The reported beat, if any.
    #[inline]
    pub fn peak(self) -> Option<PeakEvent> {
        match self {
            Detection::Peak(event) => Some(event),
            _ => None,
        }
    }
}

/// Peak detector state.
///
/// Owns the two pieces of state the loop carries between samples: the
/// `armed` flag and the tick of the last reported peak.
#[derive(Clone, Debug)]
pub struct PeakDetector {
    threshold: Sample,
    refractory_ms: u32,

    armed: bool,
    last_peak_time: Tick,
}

impl PeakDetector {
    /// Detector with the stock threshold (200) and refractory window (300 ms).
    pub const fn new() -> Self {
        Self::with_limits(PEAK_THRESHOLD, REFRACTORY_MS)
    }

    /// Detector using the limits from `config`.
    pub const fn from_config(config: &MonitorConfig) -> Self {
        Self::with_limits(config.peak_threshold, config.refractory_ms)
    }

    /// Detector with explicit limits.
    ///
    /// The last peak time starts at tick 0. That origin is synthetic: the
    /// first crossing after more than `refractory_ms` of uptime is reported
    /// against it.
    pub const fn with_limits(threshold: Sample, refractory_ms: u32) -> Self {
        Self {
            threshold,
            refractory_ms,
            armed: false,
            last_peak_time: 0,
        }
    }

    /// Feed one conditioned sample observed at `now`.
    pub fn step(&mut self, sample: Sample, now: Tick) -> Detection {
        if sample > self.threshold && !self.armed {
            self.armed = true;

            let interval_ms = elapsed(self.last_peak_time, now);
            if interval_ms > self.refractory_ms {
                self.last_peak_time = now;
                Detection::Peak(PeakEvent { at: now, interval_ms })
            } else {
                Detection::Refractory { interval_ms }
            }
        } else if sample < self.threshold {
            self.armed = false;
            Detection::Quiet
        } else {
            // Equal to threshold, or still above it while armed.
            Detection::Quiet
        }
    }

    /// True while waiting for the signal to fall back below threshold.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Tick of the last reported peak (0 until the first report).
    #[inline]
    pub fn last_peak_time(&self) -> Tick {
        self.last_peak_time
    }

    /// Threshold in use.
    #[inline]
    pub fn threshold(&self) -> Sample {
        self.threshold
    }

    /// Refractory window in use.
    #[inline]
    pub fn refractory_ms(&self) -> u32 {
        self.refractory_ms
    }
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self::new()
    }
}
