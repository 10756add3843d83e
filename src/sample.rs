//! Module: sample
//!
//! Purpose: Sample representation shared by every stage of the loop.
//!
//! Architecture:
//! - A sample is one 12-bit ADC reading, taken once per loop iteration
//! - Samples carry no timestamp; the loop pairs each with the current tick
//! - On the wire everything is one byte: the low 8 bits
//!
//! Safety: Safe. No unsafe blocks. Copy types only.

/// One raw or conditioned ADC reading.
pub type Sample = u16;

/// Largest value a 12-bit converter produces.
pub const SAMPLE_MAX: Sample = 4095;

/// Byte carried on the telemetry link for a sample or BPM value.
///
/// Truncates to the low 8 bits, so 300 goes out as 44. Values from 256
/// upwards alias smaller ones; the receiver plots the waveform modulo 256.
#[inline]
pub const fn wire_byte(value: u16) -> u8 {
    (value & 0xFF) as u8
}
