//! Serial port transport implementation

use crate::stream::{TransportLayer, YncaStream};
use async_trait::async_trait;
use tokio_serial::SerialStream;
use ynca_core::{YncaError, YncaResult};

/// Baud rate used by receivers on their RS-232 port
pub const YNCA_BAUD_RATE: u32 = 9600;

/// Serial port transport layer settings
#[derive(Debug, Clone)]
pub struct SerialSettings {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: tokio_serial::DataBits,
    pub stop_bits: tokio_serial::StopBits,
    pub parity: tokio_serial::Parity,
    pub flow_control: tokio_serial::FlowControl,
}

impl SerialSettings {
    /// Create new serial settings with the YNCA line parameters (9600 8N1)
    pub fn new(port_name: &str) -> Self {
        Self::with_baud_rate(port_name, YNCA_BAUD_RATE)
    }

    /// Create serial settings with a non-standard baud rate
    pub fn with_baud_rate(port_name: &str, baud_rate: u32) -> Self {
        Self {
            port_name: port_name.to_string(),
            baud_rate,
            data_bits: tokio_serial::DataBits::Eight,
            stop_bits: tokio_serial::StopBits::One,
            parity: tokio_serial::Parity::None,
            flow_control: tokio_serial::FlowControl::None,
        }
    }
}

/// Serial port transport layer implementation
#[derive(Debug)]
pub struct SerialTransport {
    settings: SerialSettings,
}

impl SerialTransport {
    /// Create a new serial transport layer
    pub fn new(settings: SerialSettings) -> Self {
        Self { settings }
    }

    /// Create serial transport for a device path with default line parameters
    pub fn new_simple(port_name: &str) -> Self {
        Self::new(SerialSettings::new(port_name))
    }

    /// Get the settings
    pub fn settings(&self) -> &SerialSettings {
        &self.settings
    }
}

#[async_trait]
impl TransportLayer for SerialTransport {
    async fn open(&mut self) -> YncaResult<Box<dyn YncaStream>> {
        let builder = tokio_serial::new(&self.settings.port_name, self.settings.baud_rate)
            .data_bits(self.settings.data_bits)
            .stop_bits(self.settings.stop_bits)
            .parity(self.settings.parity)
            .flow_control(self.settings.flow_control);

        let stream = SerialStream::open(&builder).map_err(|e| {
            YncaError::Connection(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Failed to open serial port {}: {}", self.settings.port_name, e),
            ))
        })?;

        Ok(Box::new(stream))
    }

    fn description(&self) -> String {
        format!("{}@{}", self.settings.port_name, self.settings.baud_rate)
    }
}
