//! Log drain to a serial sink.
//!
//! The control loop calls [`drain_to`] only right before its low-power
//! sleep, so formatting and blocking UART writes never land inside a sound.
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32 GPIO43 (U0TXD) ──────▶ USB-UART RX
//!                               └─▶ PC Serial Monitor
//! ```

use core::fmt::Write;

use crate::logging::{LogEntry, LogStream};

/// UART configuration for logging.
pub struct UartLoggerConfig {
    pub baud_rate: u32,
    pub tx_pin: u8,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            tx_pin: 43,
        }
    }
}

/// Write one entry as `[timestamp_ms] LEVEL: message\n`.
pub fn write_entry<W: Write + ?Sized>(sink: &mut W, entry: &LogEntry) -> core::fmt::Result {
    writeln!(
        sink,
        "[{:10}] {}: {}",
        entry.timestamp_ms,
        entry.level.as_str(),
        entry.message()
    )
}

/// Drain every pending entry into `sink`, then report drops if any.
///
/// Returns the number of entries written.
pub fn drain_to<W: Write + ?Sized, const N: usize>(stream: &LogStream<N>, sink: &mut W) -> usize {
    let mut written = 0;

    while let Some(entry) = stream.drain() {
        // A failing sink just loses lines; the ring keeps moving.
        let _ = write_entry(sink, &entry);
        written += 1;
    }

    let dropped = stream.dropped();
    if dropped > 0 {
        let _ = writeln!(sink, "[WARN] Dropped: {}", dropped);
        stream.reset_dropped();
    }

    written
}

/// UART1 TX-only sink for device builds.
#[cfg(target_os = "espidf")]
pub mod esp {
    use esp_idf_svc::hal::gpio;
    use esp_idf_svc::hal::peripheral::Peripheral;
    use esp_idf_svc::hal::uart::{self, UartTxDriver};

    use super::UartLoggerConfig;

    /// `core::fmt::Write` over a UART TX driver.
    pub struct UartSink<'d> {
        uart: UartTxDriver<'d>,
    }

    impl<'d> UartSink<'d> {
        /// Initialize UART1 TX-only for logging output.
        pub fn new(
            uart: impl Peripheral<P = uart::UART1> + 'd,
            tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
            config: &UartLoggerConfig,
        ) -> Result<Self, esp_idf_svc::sys::EspError> {
            let uart_config = uart::config::Config::default()
                .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

            let uart = UartTxDriver::new(
                uart,
                tx_pin,
                Option::<gpio::AnyIOPin>::None, // CTS
                Option::<gpio::AnyIOPin>::None, // RTS
                &uart_config,
            )?;

            Ok(Self { uart })
        }
    }

    impl core::fmt::Write for UartSink<'_> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            self.uart.write(s.as_bytes()).map(|_| ()).map_err(|_| core::fmt::Error)
        }
    }
}
