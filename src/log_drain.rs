//! Log output formatting and draining.
//!
//! The board binary runs a background thread that pulls entries from
//! [`MONITOR_LOG_STREAM`](crate::MONITOR_LOG_STREAM) and writes them to the
//! console. The telemetry UART is never used for log text.
//!
//! # Output
//!
//! ```text
//! [     12345] INFO: beat interval=812ms bpm=73
//! ```

use core::fmt::Write;

use crate::logging::{BufWriter, LogEntry, LogStream};

/// Scratch size for one formatted line.
pub const LINE_BUF_LEN: usize = 160;

/// Interval between dropped-message reports (ms).
pub const DROPPED_REPORT_INTERVAL_MS: u32 = 10_000;

/// Format log entry to text.
///
/// Format: `[tick_ms] LEVEL: message\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = BufWriter::new(buf);
    let _ = write!(
        writer,
        "[{:10}] {}: {}\n",
        entry.timestamp_ms,
        entry.level.as_str(),
        core::str::from_utf8(&entry.msg[..entry.len as usize]).unwrap_or("<invalid utf8>")
    );
    writer.len()
}

/// Format the dropped-messages warning.
pub fn format_dropped(dropped: u32, buf: &mut [u8]) -> usize {
    let mut writer = BufWriter::new(buf);
    let _ = write!(writer, "[WARN] Dropped log messages: {}\n", dropped);
    writer.len()
}

/// Write every pending entry to `sink`. Returns the number written.
pub fn drain_to<const N: usize>(stream: &LogStream<N>, mut sink: impl FnMut(&[u8])) -> usize {
    let mut line = [0u8; LINE_BUF_LEN];
    let mut written = 0;
    while let Some(entry) = stream.drain() {
        let len = format_log_entry(&entry, &mut line);
        sink(&line[..len]);
        written += 1;
    }
    written
}

/// Periodic dropped-count reporter.
pub struct DroppedReporter {
    last_report_ms: u32,
}

impl DroppedReporter {
    pub const fn new(now_ms: u32) -> Self {
        Self {
            last_report_ms: now_ms,
        }
    }

    /// Report and reset the stream's dropped counter at most once per
    /// [`DROPPED_REPORT_INTERVAL_MS`]. Returns true if a report was written.
    pub fn poll<const N: usize>(
        &mut self,
        stream: &LogStream<N>,
        now_ms: u32,
        mut sink: impl FnMut(&[u8]),
    ) -> bool {
        if now_ms.wrapping_sub(self.last_report_ms) < DROPPED_REPORT_INTERVAL_MS {
            return false;
        }
        self.last_report_ms = now_ms;

        let dropped = stream.dropped();
        if dropped == 0 {
            return false;
        }
        let mut msg = [0u8; 64];
        let len = format_dropped(dropped, &mut msg);
        sink(&msg[..len]);
        stream.reset_dropped();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MAX_MSG_LEN};

    #[test]
    fn test_format_log_entry() {
        let entry = LogEntry {
            timestamp_ms: 1234567,
            level: LogLevel::Info,
            len: 11,
            msg: {
                let mut msg = [0u8; MAX_MSG_LEN];
                msg[..11].copy_from_slice(b"Hello world");
                msg
            },
        };

        let mut buf = [0u8; 256];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert_eq!(formatted, "[   1234567] INFO: Hello world\n");
    }

    #[test]
    fn test_format_truncated_message() {
        let entry = LogEntry {
            timestamp_ms: 999,
            level: LogLevel::Error,
            len: 5,
            msg: {
                let mut msg = [0u8; MAX_MSG_LEN];
                msg[..10].copy_from_slice(b"TEST12345X");  // Only first 5 used
                msg
            },
        };

        let mut buf = [0u8; 256];
        let len = format_log_entry(&entry, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("TEST1"));  // Only 5 chars
        assert!(!formatted.contains("X"));  // 10th char not included
    }

    #[test]
    fn test_drain_to_writes_all_pending() {
        let stream = LogStream::<8>::new();
        stream.push(1, LogLevel::Info, b"one");
        stream.push(2, LogLevel::Debug, b"two");

        let mut out = Vec::new();
        let n = drain_to(&stream, |line| out.extend_from_slice(line));

        assert_eq!(n, 2);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("INFO: one\n"));
        assert!(text.contains("DEBUG: two\n"));
        assert!(!stream.has_entries());
    }

    #[test]
    fn test_dropped_reporter_rate_limited() {
        let stream = LogStream::<2>::new();
        for i in 0..5 {
            stream.push(i, LogLevel::Info, b"x");
        }
        assert_eq!(stream.dropped(), 3);

        let mut reporter = DroppedReporter::new(0);
        let mut lines = 0;
        assert!(!reporter.poll(&stream, 5_000, |_| lines += 1));
        assert!(reporter.poll(&stream, 10_000, |_| lines += 1));
        assert_eq!(lines, 1);
        assert_eq!(stream.dropped(), 0);

        // Nothing dropped since: no report
        assert!(!reporter.poll(&stream, 20_000, |_| lines += 1));
        assert_eq!(lines, 1);
    }
}
