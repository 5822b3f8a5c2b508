//! Serial LED indicator
//!
//! Single-byte protocol: `R` lights the presence LED, `N` turns it off.
//! The device is optional; a missing board leaves the rest of the
//! observer running.

use std::io::Write;
use std::time::Duration;

use crate::config::DeviceConfig;
use crate::error::{DeviceError, FacecueError};

/// LED state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// A face is present
    Active,
    Off,
}

impl Indicator {
    pub fn command_byte(&self) -> u8 {
        match self {
            Self::Active => b'R',
            Self::Off => b'N',
        }
    }
}

/// Remote presence indicator
pub trait DeviceSignal {
    fn set_indicator(&mut self, indicator: Indicator) -> Result<(), FacecueError>;
}

/// An absent device accepts every signal and does nothing
impl<D: DeviceSignal> DeviceSignal for Option<D> {
    fn set_indicator(&mut self, indicator: Indicator) -> Result<(), FacecueError> {
        match self {
            Some(device) => device.set_indicator(indicator),
            None => Ok(()),
        }
    }
}

/// LED driven over a serial link. Turned off when dropped.
pub struct SerialIndicator<W: Write = Box<dyn serialport::SerialPort>> {
    port: W,
    name: String,
}

impl SerialIndicator {
    /// Open the configured serial port
    pub fn open(config: &DeviceConfig) -> Result<Self, FacecueError> {
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(Duration::from_millis(500))
            .open()
            .map_err(|e| DeviceError::Open {
                port: config.port.clone(),
                message: e.to_string(),
            })?;

        Ok(Self::from_writer(port, &config.port))
    }

    /// Open the port, let the board settle after its reset, and switch the LED
    /// off. Any failure is logged and yields `None`.
    pub async fn connect(config: &DeviceConfig) -> Option<Self> {
        if !config.enabled {
            tracing::info!("Serial indicator disabled");
            return None;
        }

        let mut device = match Self::open(config) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("Could not connect to indicator device, continuing without it: {}", e);
                return None;
            }
        };

        tokio::time::sleep(Duration::from_millis(config.settle_ms)).await;

        if let Err(e) = device.set_indicator(Indicator::Off) {
            tracing::warn!("Indicator device not responding, continuing without it: {}", e);
            return None;
        }

        tracing::info!("Indicator connected on {} at {} baud", config.port, config.baud_rate);
        Some(device)
    }
}

impl<W: Write> SerialIndicator<W> {
    pub fn from_writer(port: W, name: &str) -> Self {
        Self {
            port,
            name: name.to_string(),
        }
    }
}

impl<W: Write> DeviceSignal for SerialIndicator<W> {
    fn set_indicator(&mut self, indicator: Indicator) -> Result<(), FacecueError> {
        self.port
            .write_all(&[indicator.command_byte()])
            .and_then(|_| self.port.flush())
            .map_err(|e| DeviceError::Write(format!("{}: {}", self.name, e)))?;

        tracing::debug!("Indicator {} set to {:?}", self.name, indicator);
        Ok(())
    }
}

impl<W: Write> Drop for SerialIndicator<W> {
    fn drop(&mut self) {
        if let Err(e) = self.set_indicator(Indicator::Off) {
            tracing::warn!("Failed to switch indicator off on shutdown: {}", e);
        }
    }
}
