//! Hardware boundary for the heart monitor.
//!
//! Thin traits around the converter and the serial link.
//! Business logic stays in core modules, HAL is just I/O.
//!
//! Both traits are implemented for closures so the board binary can wrap
//! its drivers inline and tests can script them.

use crate::fault::FaultCode;
use crate::sample::Sample;

/// Produces raw samples, blocking until a conversion completes.
pub trait SampleSource {
    /// Next raw reading.
    ///
    /// Errors with [`FaultCode::AcquisitionFailed`]. There is no retry.
    fn next_sample(&mut self) -> Result<Sample, FaultCode>;
}

/// Accepts telemetry bytes, blocking until the link is ready.
pub trait Transport {
    /// Send one byte. No buffering, no partial writes.
    ///
    /// Errors with [`FaultCode::TransportUnavailable`]. There is no retry.
    fn send(&mut self, byte: u8) -> Result<(), FaultCode>;
}

impl<F> SampleSource for F
where
    F: FnMut() -> Result<Sample, FaultCode>,
{
    #[inline]
    fn next_sample(&mut self) -> Result<Sample, FaultCode> {
        self()
    }
}

impl<F> Transport for F
where
    F: FnMut(u8) -> Result<(), FaultCode>,
{
    #[inline]
    fn send(&mut self, byte: u8) -> Result<(), FaultCode> {
        self(byte)
    }
}
