//! Connection builder for YNCA clients
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use ynca_client::ConnectionBuilder;
//!
//! # async fn run() -> ynca_core::YncaResult<()> {
//! // Network module of a receiver
//! let conn = ConnectionBuilder::new()
//!     .address("socket://192.168.1.50:50000")
//!     .communication_log_size(100)
//!     .connect()
//!     .await?;
//!
//! // RS-232 port
//! let conn = ConnectionBuilder::new()
//!     .address("/dev/ttyUSB0")
//!     .keep_alive_interval(Duration::from_secs(20))
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use super::connection::Connection;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use ynca_core::protocol::{COMMAND_SPACING, KEEP_ALIVE_INTERVAL};
use ynca_core::{YncaError, YncaResult};
use ynca_transport::{TransportLayer, YNCA_BAUD_RATE, transport_for};

/// Callback invoked when the link drops without the caller closing it
pub type DisconnectNotifier = Arc<dyn Fn() + Send + Sync>;

/// Tunables of a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Minimum time between two transmitted lines
    pub command_spacing: Duration,
    /// Idle time after which a keep-alive probe is sent
    pub keep_alive_interval: Duration,
    /// Number of lines kept in the diagnostic log, 0 disables it
    pub communication_log_size: usize,
    /// How long `close` waits for the writer task
    pub shutdown_timeout: Duration,
    /// Baud rate used for serial device addresses
    pub serial_baud_rate: u32,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            command_spacing: COMMAND_SPACING,
            keep_alive_interval: KEEP_ALIVE_INTERVAL,
            communication_log_size: 0,
            shutdown_timeout: Duration::from_secs(2),
            serial_baud_rate: YNCA_BAUD_RATE,
        }
    }
}

/// Connection builder for creating YNCA connections
///
/// Either an address string or a ready-made transport must be given before
/// calling [`connect`](Self::connect). A transport takes precedence over an
/// address.
pub struct ConnectionBuilder {
    address: Option<String>,
    transport: Option<Box<dyn TransportLayer>>,
    settings: ConnectionSettings,
    disconnect_notifier: Option<DisconnectNotifier>,
}

impl ConnectionBuilder {
    /// Create a new connection builder with default settings
    ///
    /// # Default Settings
    /// - Command spacing: 100 ms
    /// - Keep-alive interval: 30 s
    /// - Communication log: disabled
    /// - Shutdown timeout: 2 s
    /// - Serial baud rate: 9600
    pub fn new() -> Self {
        Self {
            address: None,
            transport: None,
            settings: ConnectionSettings::default(),
            disconnect_notifier: None,
        }
    }

    /// Connect to an address
    ///
    /// # Arguments
    /// * `address` - `socket://host:port` or a serial device path
    pub fn address(mut self, address: &str) -> Self {
        self.address = Some(address.to_string());
        self
    }

    /// Connect over an already configured transport
    pub fn transport(mut self, transport: Box<dyn TransportLayer>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace all settings at once
    pub fn settings(mut self, settings: ConnectionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn command_spacing(mut self, spacing: Duration) -> Self {
        self.settings.command_spacing = spacing;
        self
    }

    pub fn keep_alive_interval(mut self, interval: Duration) -> Self {
        self.settings.keep_alive_interval = interval;
        self
    }

    pub fn communication_log_size(mut self, size: usize) -> Self {
        self.settings.communication_log_size = size;
        self
    }

    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.settings.shutdown_timeout = timeout;
        self
    }

    pub fn serial_baud_rate(mut self, baud_rate: u32) -> Self {
        self.settings.serial_baud_rate = baud_rate;
        self
    }

    /// Register the disconnect notifier
    ///
    /// It is called at most once per connection, when the link drops. A
    /// caller-initiated close never triggers it.
    pub fn on_disconnect<F>(mut self, notifier: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.disconnect_notifier = Some(Arc::new(notifier));
        self
    }

    /// Resolve the transport and hand out the configured parts
    ///
    /// # Errors
    /// Returns `YncaError::InvalidAddress` if neither an address nor a
    /// transport was configured, or if the address cannot be parsed
    pub(crate) fn into_parts(
        self,
    ) -> YncaResult<(
        Box<dyn TransportLayer>,
        ConnectionSettings,
        Option<DisconnectNotifier>,
    )> {
        let transport = match (self.transport, self.address) {
            (Some(transport), _) => transport,
            (None, Some(address)) => transport_for(&address, self.settings.serial_baud_rate)?,
            (None, None) => {
                return Err(YncaError::InvalidAddress(
                    "No address or transport configured".to_string(),
                ));
            }
        };
        Ok((transport, self.settings, self.disconnect_notifier))
    }

    /// Open the transport and start the connection tasks
    ///
    /// # Errors
    /// - `YncaError::InvalidAddress` if the address cannot be interpreted
    /// - `YncaError::Connection` if the transport cannot be opened
    /// - `YncaError::ConnectionFailed` if no tokio runtime is available
    pub async fn connect(self) -> YncaResult<Connection> {
        let (mut transport, settings, notifier) = self.into_parts()?;
        Connection::open(transport.as_mut(), settings, notifier).await
    }
}

impl Default for ConnectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConnectionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionBuilder")
            .field("address", &self.address)
            .field(
                "transport",
                &self.transport.as_ref().map(|t| t.description()),
            )
            .field("settings", &self.settings)
            .field("disconnect_notifier", &self.disconnect_notifier.is_some())
            .finish()
    }
}
