//! TCP transport implementation

use crate::stream::{TransportLayer, YncaStream};
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use ynca_core::{YncaError, YncaResult};

/// TCP port of the YNCA service on networked receivers
pub const YNCA_PORT: u16 = 50000;

/// TCP transport layer settings
#[derive(Debug, Clone)]
pub struct TcpSettings {
    pub host: String,
    pub port: u16,
    /// Timeout for connection establishment. None means no timeout.
    pub connect_timeout: Option<Duration>,
}

impl TcpSettings {
    /// Create new TCP settings
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            connect_timeout: Some(Duration::from_secs(10)),
        }
    }

    /// Create TCP settings with a connect timeout
    pub fn with_timeout(host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.to_string(),
            port,
            connect_timeout: Some(timeout),
        }
    }
}

/// TCP transport layer implementation
///
/// Receivers with a network port accept YNCA on TCP port [`YNCA_PORT`].
#[derive(Debug)]
pub struct TcpTransport {
    settings: TcpSettings,
}

impl TcpTransport {
    /// Create a new TCP transport layer
    pub fn new(settings: TcpSettings) -> Self {
        Self { settings }
    }

    /// Create TCP transport from a `host[:port]` string
    ///
    /// The port defaults to [`YNCA_PORT`].
    pub fn from_address(address: &str) -> YncaResult<Self> {
        let (host, port) = match address.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|e| {
                    YncaError::InvalidAddress(format!("Invalid TCP port in {}: {}", address, e))
                })?;
                (host, port)
            }
            None => (address, YNCA_PORT),
        };
        if host.is_empty() {
            return Err(YncaError::InvalidAddress(format!("Missing host in {}", address)));
        }
        Ok(Self::new(TcpSettings::new(host, port)))
    }

    /// Get the settings
    pub fn settings(&self) -> &TcpSettings {
        &self.settings
    }
}

#[async_trait]
impl TransportLayer for TcpTransport {
    async fn open(&mut self) -> YncaResult<Box<dyn YncaStream>> {
        let target = (self.settings.host.as_str(), self.settings.port);

        let stream = if let Some(timeout) = self.settings.connect_timeout {
            tokio::time::timeout(timeout, TcpStream::connect(target))
                .await
                .map_err(|_| {
                    YncaError::Connection(std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        format!("Timed out connecting to {}", self.description()),
                    ))
                })??
        } else {
            TcpStream::connect(target).await?
        };

        // Commands are single short lines, do not let Nagle hold them back
        if let Err(e) = stream.set_nodelay(true) {
            log::debug!("Could not disable Nagle on {}: {}", self.description(), e);
        }

        Ok(Box::new(stream))
    }

    fn description(&self) -> String {
        format!("socket://{}:{}", self.settings.host, self.settings.port)
    }
}
