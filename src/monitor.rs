//! The sampling loop.
//!
//! One iteration:
//!
//! ```text
//! SampleSource ─▶ condition ─▶ PeakDetector ─▶ RateTracker ─▶ Transport
//!                                   ▲             (on beat)
//!                                   │
//!                              TickClock::now()
//! ```
//!
//! followed by a pause of `sample_period_ms` measured on the tick clock.
//! All state the loop carries lives in [`HeartMonitor`]; the only shared
//! values are the clock, the fault state and the log stream.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::clock::{Tick, TickClock};
use crate::conditioner::condition_with;
use crate::config::MonitorConfig;
use crate::detector::{Detection, PeakDetector};
use crate::fault::{FaultCode, FaultSnapshot, FaultState};
use crate::hal::{SampleSource, Transport};
use crate::logging::{LogStream, LOG_BUFFER_SIZE};
use crate::rate::RateTracker;
use crate::sample::Sample;
use crate::telemetry::TelemetryFrame;
use crate::{rt_debug, rt_error, rt_info};

/// What one iteration did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Iteration {
    /// Tick the sample was paired with.
    pub now: Tick,
    /// Conditioned sample.
    pub sample: Sample,
    /// Detector outcome.
    pub detection: Detection,
    /// Bytes sent.
    pub frame: TelemetryFrame,
}

/// Sampling loop state and collaborators.
pub struct HeartMonitor<'a, S, T, const N: usize = LOG_BUFFER_SIZE> {
    config: MonitorConfig,
    clock: &'a TickClock,
    fault: &'a FaultState,
    log: &'a LogStream<N>,

    source: S,
    transport: T,

    detector: PeakDetector,
    rate: RateTracker,
    iterations: u32,
}

impl<'a, S, T, const N: usize> HeartMonitor<'a, S, T, N>
where
    S: SampleSource,
    T: Transport,
{
    pub fn new(
        config: MonitorConfig,
        clock: &'a TickClock,
        fault: &'a FaultState,
        log: &'a LogStream<N>,
        source: S,
        transport: T,
    ) -> Self {
        Self {
            detector: PeakDetector::from_config(&config),
            rate: RateTracker::new(),
            iterations: 0,
            config,
            clock,
            fault,
            log,
            source,
            transport,
        }
    }

    /// Run one iteration without pacing.
    ///
    /// Blocks on the source and on each telemetry byte. A failure of either
    /// is recorded in the fault state and returned; the monitor must not be
    /// stepped again.
    pub fn step(&mut self) -> Result<Iteration, FaultCode> {
        let raw = match self.source.next_sample() {
            Ok(raw) => raw,
            Err(code) => return Err(self.trip(code)),
        };
        let sample = condition_with(&self.config, raw);
        let now = self.clock.now();

        let detection = self.detector.step(sample, now);
        let frame = match detection {
            Detection::Peak(event) => {
                let bpm = self.rate.record(&event);
                rt_info!(
                    self.log,
                    now,
                    "beat interval={}ms bpm={}",
                    event.interval_ms,
                    bpm
                );
                TelemetryFrame::beat(self.config.marker, bpm, sample)
            }
            Detection::Refractory { interval_ms } => {
                rt_debug!(
                    self.log,
                    now,
                    "crossing ignored, {}ms since last beat",
                    interval_ms
                );
                TelemetryFrame::sample(sample)
            }
            Detection::Quiet => TelemetryFrame::sample(sample),
        };

        if let Err(code) = frame.send(&mut self.transport) {
            return Err(self.trip(code));
        }

        self.iterations = self.iterations.wrapping_add(1);
        Ok(Iteration {
            now,
            sample,
            detection,
            frame,
        })
    }

    /// Loop until `stop` is raised or a fault occurs.
    ///
    /// `relax` is called while waiting out the sample period.
    /// Returns the number of completed iterations.
    pub fn run(&mut self, stop: &AtomicBool, mut relax: impl FnMut()) -> Result<u32, FaultCode> {
        rt_info!(
            self.log,
            self.clock.now(),
            "monitor started: threshold={} refractory={}ms period={}ms",
            self.config.peak_threshold,
            self.config.refractory_ms,
            self.config.sample_period_ms
        );

        while !stop.load(Ordering::Acquire) {
            self.step()?;

            let period = self.config.sample_period_ms;
            if period > 0 && !self.clock.wait_ms(period, stop, &mut relax) {
                break;
            }
        }

        rt_info!(
            self.log,
            self.clock.now(),
            "monitor stopped after {} iterations, {} beats",
            self.iterations,
            self.rate.beats()
        );
        Ok(self.iterations)
    }

    fn trip(&self, code: FaultCode) -> FaultCode {
        let now = self.clock.now();
        self.fault.set(code, now);
        rt_error!(self.log, now, "FAULT: {}", code.as_str());
        code
    }

    /// Latest heart rate estimate (0 before the first beat).
    #[inline]
    pub fn heart_rate(&self) -> u32 {
        self.rate.bpm()
    }

    /// Detector state.
    #[inline]
    pub fn detector(&self) -> &PeakDetector {
        &self.detector
    }

    /// Completed iterations.
    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// Log the fault that ended [`HeartMonitor::run`].
///
/// Call once after `run` returns `Err(code)`, before parking or exiting,
/// so the reason reaches the console through the drain. The entry is
/// stamped with the fault tick.
pub fn report_halt<const N: usize>(
    log: &LogStream<N>,
    code: FaultCode,
    fault: &FaultState,
) -> FaultSnapshot {
    let snapshot = fault.snapshot();
    rt_error!(
        log,
        snapshot.data,
        "halted: {} at tick {} (faults since boot: {})",
        code.as_str(),
        snapshot.data,
        snapshot.count
    );
    snapshot
}
