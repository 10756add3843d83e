//! Module: config
//!
//! Purpose: Configuration for the ECG heart monitor.
//!
//! Architecture:
//! - Detection constants are named here and nowhere else
//! - `MonitorConfig`: everything the sampling loop needs, `Copy`, const-constructible
//! - `BoardConfig`: baud and tick settings used by the board binary only
//!
//! Safety: RT-safe. Plain data, no interior mutability.

/// Peak detection threshold (conditioned sample units).
pub const PEAK_THRESHOLD: u16 = 200;

/// Minimum interval between two reported peaks, in milliseconds.
///
/// 300 ms caps the reportable rate below 200 BPM.
pub const REFRACTORY_MS: u32 = 300;

/// Lower bound of the noisy dead-band (exclusive).
pub const DEAD_BAND_LOW: u16 = 100;

/// Upper bound of the noisy dead-band (exclusive).
pub const DEAD_BAND_HIGH: u16 = 150;

/// Value substituted for any sample inside the dead-band.
pub const DEAD_BAND_VALUE: u16 = 125;

/// Telemetry marker announcing that the next byte is a BPM value.
pub const MARKER_BYTE: u8 = 130;

/// Pause between loop iterations, in milliseconds.
///
/// Measured on the tick clock. Earlier firmware paced with an uncalibrated
/// counting loop of roughly this length on a 16 MHz core.
pub const SAMPLE_PERIOD_MS: u32 = 50;

/// Sampling loop configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Samples strictly above this value are peak candidates.
    pub peak_threshold: u16,

    /// Crossings closer than this to the last reported peak are ignored.
    pub refractory_ms: u32,

    /// Dead-band lower bound (exclusive).
    pub dead_band_low: u16,

    /// Dead-band upper bound (exclusive).
    pub dead_band_high: u16,

    /// Replacement for samples inside the dead-band.
    pub dead_band_value: u16,

    /// Telemetry marker byte.
    pub marker: u8,

    /// Pacing interval between iterations. Zero disables pacing.
    pub sample_period_ms: u32,
}

impl MonitorConfig {
    /// Configuration with the stock constants.
    pub const fn new() -> Self {
        Self {
            peak_threshold: PEAK_THRESHOLD,
            refractory_ms: REFRACTORY_MS,
            dead_band_low: DEAD_BAND_LOW,
            dead_band_high: DEAD_BAND_HIGH,
            dead_band_value: DEAD_BAND_VALUE,
            marker: MARKER_BYTE,
            sample_period_ms: SAMPLE_PERIOD_MS,
        }
    }

    /// Same configuration with a different pacing interval.
    pub const fn with_sample_period_ms(self, sample_period_ms: u32) -> Self {
        Self {
            sample_period_ms,
            ..self
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Default configuration used by the firmware.
pub static CONFIG: MonitorConfig = MonitorConfig::new();

/// Board settings for the ESP32-S3 build.
///
/// Wiring: analog front-end on GPIO2 (ADC1), telemetry TX on GPIO17 (UART1).
#[derive(Clone, Copy, Debug)]
pub struct BoardConfig {
    /// Telemetry baud rate. Must match the receiving side.
    pub telemetry_baud: u32,

    /// Tick source period in microseconds.
    pub tick_period_us: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            telemetry_baud: 9600,
            tick_period_us: 1000,
        }
    }
}
