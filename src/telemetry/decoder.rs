//! Receiver side of the telemetry link.
//!
//! Mirrors what the PC viewer does with the byte stream: split waveform
//! bytes from heart rate updates and sound an alarm on a slow heart.

use crate::config::MARKER_BYTE;

/// Heart rate below which the alarm sounds (BPM).
pub const LOW_RATE_ALARM_BPM: u8 = 30;

/// One decoded item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decoded {
    /// Waveform byte.
    Sample(u8),
    /// Heart rate update.
    HeartRate(u8),
}

/// Byte stream parser.
///
/// Tracks the single bit of state the protocol needs: whether the previous
/// byte was an unconsumed marker.
#[derive(Clone, Copy, Debug)]
pub struct TelemetryDecoder {
    marker: u8,
    expecting_rate: bool,
    heart_rate: u8,
}

impl TelemetryDecoder {
    /// Decoder for the stock marker.
    pub const fn new() -> Self {
        Self::with_marker(MARKER_BYTE)
    }

    /// Decoder for a custom marker.
    pub const fn with_marker(marker: u8) -> Self {
        Self {
            marker,
            expecting_rate: false,
            heart_rate: 0,
        }
    }

    /// Feed one byte. Returns `None` for the marker itself.
    pub fn push(&mut self, byte: u8) -> Option<Decoded> {
        if self.expecting_rate {
            self.expecting_rate = false;
            self.heart_rate = byte;
            Some(Decoded::HeartRate(byte))
        } else if byte == self.marker {
            self.expecting_rate = true;
            None
        } else {
            Some(Decoded::Sample(byte))
        }
    }

    /// True if the last byte was a marker awaiting its BPM byte.
    #[inline]
    pub fn is_expecting_rate(&self) -> bool {
        self.expecting_rate
    }

    /// Last heart rate received (0 before any).
    #[inline]
    pub fn heart_rate(&self) -> u8 {
        self.heart_rate
    }
}

impl Default for TelemetryDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Alarm state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlarmEdge {
    Raised,
    Cleared,
}

/// Bradycardia alarm.
///
/// Active while the reported rate is non-zero and below the threshold.
/// Zero means "no beat yet" and never alarms.
#[derive(Clone, Copy, Debug)]
pub struct LowRateAlarm {
    threshold: u8,
    active: bool,
}

impl LowRateAlarm {
    /// Alarm at the stock threshold.
    pub const fn new() -> Self {
        Self::with_threshold(LOW_RATE_ALARM_BPM)
    }

    /// Alarm at a custom threshold.
    pub const fn with_threshold(threshold: u8) -> Self {
        Self {
            threshold,
            active: false,
        }
    }

    /// Evaluate the current heart rate. Returns the edge, if any.
    pub fn update(&mut self, bpm: u8) -> Option<AlarmEdge> {
        let low = bpm > 0 && bpm < self.threshold;
        match (self.active, low) {
            (false, true) => {
                self.active = true;
                Some(AlarmEdge::Raised)
            }
            (true, false) => {
                self.active = false;
                Some(AlarmEdge::Cleared)
            }
            _ => None,
        }
    }

    /// Force the alarm off (link closed).
    pub fn silence(&mut self) {
        self.active = false;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for LowRateAlarm {
    fn default() -> Self {
        Self::new()
    }
}
