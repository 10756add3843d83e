//! Telemetry framing for the serial link.
//!
//! # Wire format
//!
//! ```text
//! plain iteration:   [sample]
//! beat iteration:    [130][bpm][sample]
//! ```
//!
//! There is no other framing. A receiver treats every `130` as "next byte
//! is BPM" and everything else as a waveform byte. A conditioned sample
//! whose low byte is 130 is indistinguishable from the marker; the link
//! accepts that ambiguity.

pub mod decoder;

pub use decoder::{AlarmEdge, Decoded, LowRateAlarm, TelemetryDecoder};

use crate::fault::FaultCode;
use crate::hal::Transport;
use crate::sample::{wire_byte, Sample};

/// Longest frame: marker, BPM, sample.
pub const MAX_FRAME_LEN: usize = 3;

/// Bytes produced by one loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TelemetryFrame {
    bytes: [u8; MAX_FRAME_LEN],
    len: u8,
}

impl TelemetryFrame {
    /// Frame carrying only a sample.
    #[inline]
    pub const fn sample(sample: Sample) -> Self {
        Self {
            bytes: [wire_byte(sample), 0, 0],
            len: 1,
        }
    }

    /// Frame announcing a new heart rate, followed by the sample.
    #[inline]
    pub const fn beat(marker: u8, bpm: u32, sample: Sample) -> Self {
        Self {
            bytes: [marker, (bpm & 0xFF) as u8, wire_byte(sample)],
            len: 3,
        }
    }

    /// Bytes to send, in order.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// True if this frame carries a heart rate update.
    #[inline]
    pub fn has_rate(&self) -> bool {
        self.len as usize == MAX_FRAME_LEN
    }

    /// Write every byte, blocking on the transport. Stops at the first error.
    pub fn send<T: Transport + ?Sized>(&self, transport: &mut T) -> Result<(), FaultCode> {
        for &byte in self.as_bytes() {
            transport.send(byte)?;
        }
        Ok(())
    }
}
