//! # ECG Heart Monitor
//!
//! Single-lead ECG sampler: detects heartbeats on the conditioned waveform,
//! estimates heart rate and streams both over a byte-oriented serial link.
//!
//! ## Architecture
//!
//! - [`TickClock`] is advanced by an independent 1 ms source
//! - [`HeartMonitor`] owns all loop state and runs one iteration at a time
//! - Hardware sits behind [`SampleSource`] and [`Transport`]
//! - Logs go to a lock-free [`LogStream`], never to the telemetry link
//!
//! Everything here is host-testable; the board binary only wires drivers in.

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod conditioner;
pub mod config;
pub mod detector;
pub mod fault;
pub mod hal;
pub mod log_drain;
pub mod log_globals;
pub mod logging;
pub mod monitor;
pub mod rate;
pub mod sample;
pub mod telemetry;

pub use clock::{CatchUpTicker, Tick, TickClock};
pub use conditioner::condition;
pub use config::{MonitorConfig, CONFIG};
pub use detector::{Detection, PeakDetector, PeakEvent};
pub use fault::{FaultCode, FaultSnapshot, FaultState};
pub use hal::{SampleSource, Transport};
pub use log_globals::MONITOR_LOG_STREAM;
pub use logging::LogStream;
pub use monitor::{report_halt, HeartMonitor, Iteration};
pub use rate::{estimate_bpm, RateTracker};
pub use sample::Sample;
pub use telemetry::{TelemetryDecoder, TelemetryFrame};
