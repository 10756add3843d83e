//! Global log stream instance.
//!
//! The sampling loop is the only producer; the drain thread in the board
//! binary is the only consumer.

use crate::logging::LogStream;

/// Log stream written by the sampling loop.
pub static MONITOR_LOG_STREAM: LogStream = LogStream::new();
