//! ECG Heart Monitor - Main entry point
//!
//! On the board:
//! 1. Start the 1 ms tick timer
//! 2. Start the log drain thread (console, never the telemetry UART)
//! 3. Bring up ADC1 and UART1
//! 4. Run the sampling loop; on fault, log the reason and halt
//!
//! On a host the same loop runs against a synthetic waveform and writes
//! telemetry bytes to stdout for a bounded time.

use core::sync::atomic::AtomicBool;

use ecg_heart_monitor::{FaultState, TickClock};

static CLOCK: TickClock = TickClock::new();
static FAULT: FaultState = FaultState::new();
static STOP: AtomicBool = AtomicBool::new(false);

#[cfg(target_os = "espidf")]
fn main() -> Result<(), esp_idf_svc::sys::EspError> {
    use std::io::Write;
    use std::time::Duration;

    use esp_idf_svc::hal::adc::attenuation::DB_11;
    use esp_idf_svc::hal::adc::oneshot::config::AdcChannelConfig;
    use esp_idf_svc::hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::gpio::AnyIOPin;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::{self, UartTxDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::timer::EspTaskTimerService;

    use ecg_heart_monitor::config::BoardConfig;
    use ecg_heart_monitor::log_drain::{drain_to, DroppedReporter};
    use ecg_heart_monitor::{
        report_halt, rt_info, FaultCode, HeartMonitor, CONFIG, MONITOR_LOG_STREAM,
    };

    // Initialize ESP-IDF
    esp_idf_svc::sys::link_patches();

    let board = BoardConfig::default();
    let peripherals = Peripherals::take()?;

    // Tick source: independent of loop latency
    let timer_service = EspTaskTimerService::new()?;
    let tick_timer = timer_service.timer(|| CLOCK.tick())?;
    tick_timer.every(Duration::from_micros(board.tick_period_us))?;

    // Log drain (console UART0)
    std::thread::Builder::new()
        .name("log-drain".into())
        .stack_size(4096)
        .spawn(|| {
            let mut reporter = DroppedReporter::new(CLOCK.now());
            let mut out = std::io::stdout();
            loop {
                let written = drain_to(&MONITOR_LOG_STREAM, |line| {
                    let _ = out.write_all(line);
                });
                reporter.poll(&MONITOR_LOG_STREAM, CLOCK.now(), |line| {
                    let _ = out.write_all(line);
                });
                if written == 0 {
                    FreeRtos::delay_ms(10);
                }
            }
        })
        .expect("failed to spawn log drain");

    rt_info!(MONITOR_LOG_STREAM, CLOCK.now(), "{}", env!("VERSION_STRING"));

    // Sample source: ADC1 on GPIO2, full 0-3.1 V range, 12 bit
    let adc = AdcDriver::new(peripherals.adc1)?;
    let adc_config = AdcChannelConfig {
        attenuation: DB_11,
        ..Default::default()
    };
    let mut channel = AdcChannelDriver::new(&adc, peripherals.pins.gpio2, &adc_config)?;

    // Telemetry: UART1 TX-only on GPIO17
    let uart_config = uart::config::Config::default().baudrate(Hertz(board.telemetry_baud));
    let mut uart = UartTxDriver::new(
        peripherals.uart1,
        peripherals.pins.gpio17,
        Option::<AnyIOPin>::None, // CTS
        Option::<AnyIOPin>::None, // RTS
        &uart_config,
    )?;

    let source = || {
        adc.read(&mut channel)
            .map_err(|_| FaultCode::AcquisitionFailed)
    };
    let transport = |byte: u8| {
        uart.write(&[byte])
            .map(|_| ())
            .map_err(|_| FaultCode::TransportUnavailable)
    };

    let mut monitor = HeartMonitor::new(
        CONFIG,
        &CLOCK,
        &FAULT,
        &MONITOR_LOG_STREAM,
        source,
        transport,
    );

    // STOP is never raised on the board, so run only returns on a fault
    match monitor.run(&STOP, || FreeRtos::delay_ms(1)) {
        Ok(iterations) => {
            rt_info!(
                MONITOR_LOG_STREAM,
                CLOCK.now(),
                "loop exited after {} iterations",
                iterations
            );
        }
        Err(code) => {
            report_halt(&MONITOR_LOG_STREAM, code, &FAULT);
        }
    }

    // No recovery path. Keep the drain alive so the halt is visible.
    loop {
        FreeRtos::delay_ms(1000);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    host::run();
}

/// Host simulation: synthetic ECG into the real loop.
#[cfg(not(target_os = "espidf"))]
mod host {
    use std::io::Write;
    use std::sync::atomic::Ordering;
    use std::thread;
    use std::time::{Duration, Instant};

    use ecg_heart_monitor::log_drain::{drain_to, DroppedReporter};
    use ecg_heart_monitor::sample::Sample;
    use ecg_heart_monitor::{
        report_halt, rt_info, CatchUpTicker, FaultCode, HeartMonitor, CONFIG, MONITOR_LOG_STREAM,
    };

    use super::{CLOCK, FAULT, STOP};

    /// Simulated heart rate.
    const SIM_BPM: u32 = 72;

    /// Default run length when no argument is given.
    const DEFAULT_RUN_SECS: u64 = 10;

    /// R-wave width in the synthetic waveform (ms).
    const R_WAVE_MS: u32 = 60;

    /// Synthetic lead: quiet baseline inside the dead-band, one tall R wave
    /// per beat.
    fn synthetic_sample(now_ms: u32) -> Sample {
        let period = 60_000 / SIM_BPM;
        let phase = now_ms % period;
        if phase < R_WAVE_MS {
            320
        } else {
            // Baseline wander, 110..140
            110 + ((now_ms / 7) % 30) as Sample
        }
    }

    pub fn run() {
        let secs = std::env::args()
            .nth(1)
            .and_then(|arg| arg.parse().ok())
            .unwrap_or(DEFAULT_RUN_SECS);

        // Tick source: paced on Instant deadlines so sleep overshoot
        // does not slow the clock down
        thread::spawn(|| {
            let start = Instant::now();
            let mut ticker = CatchUpTicker::new();
            loop {
                let deadline = start + Duration::from_millis(ticker.issued() + 1);
                thread::sleep(deadline.saturating_duration_since(Instant::now()));
                ticker.catch_up(&CLOCK, start.elapsed().as_millis() as u64);
            }
        });

        // Stop signal
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(secs));
            STOP.store(true, Ordering::Release);
        });

        // Log drain on stderr
        let drain = thread::spawn(|| {
            let mut reporter = DroppedReporter::new(CLOCK.now());
            let mut err = std::io::stderr();
            loop {
                let written = drain_to(&MONITOR_LOG_STREAM, |line| {
                    let _ = err.write_all(line);
                });
                reporter.poll(&MONITOR_LOG_STREAM, CLOCK.now(), |line| {
                    let _ = err.write_all(line);
                });
                if written == 0 {
                    if STOP.load(Ordering::Acquire) && !MONITOR_LOG_STREAM.has_entries() {
                        break;
                    }
                    thread::sleep(Duration::from_millis(10));
                }
            }
        });

        rt_info!(
            MONITOR_LOG_STREAM,
            CLOCK.now(),
            "{} (host simulation)",
            env!("VERSION_STRING")
        );

        let source = || -> Result<Sample, FaultCode> { Ok(synthetic_sample(CLOCK.now())) };
        let mut stdout = std::io::stdout().lock();
        let transport = |byte: u8| {
            stdout
                .write_all(&[byte])
                .and_then(|_| stdout.flush())
                .map_err(|_| FaultCode::TransportUnavailable)
        };

        let mut monitor = HeartMonitor::new(
            CONFIG,
            &CLOCK,
            &FAULT,
            &MONITOR_LOG_STREAM,
            source,
            transport,
        );
        let result = monitor.run(&STOP, thread::yield_now);
        if let Err(code) = result {
            report_halt(&MONITOR_LOG_STREAM, code, &FAULT);
        }

        // A fault halts the loop; make sure the drain sees the stop too
        STOP.store(true, Ordering::Release);
        let _ = drain.join();

        if result.is_err() {
            std::process::exit(1);
        }
    }
}
