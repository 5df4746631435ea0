//! Connection address parsing
//!
//! A receiver is addressed with a single string: `socket://host[:port]` for a
//! network link (port 50000 when omitted), anything else is taken as a serial
//! device path.

use crate::serial::{SerialSettings, SerialTransport};
use crate::stream::TransportLayer;
use crate::tcp::TcpTransport;
use std::fmt;
use ynca_core::{YncaError, YncaResult};

const SOCKET_SCHEME: &str = "socket://";

/// Parsed connection address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Tcp { host: String, port: u16 },
    Serial { port_name: String },
}

impl Address {
    /// Parse an address string
    ///
    /// # Errors
    ///
    /// Returns `YncaError::InvalidAddress` for empty strings and malformed
    /// `socket://` addresses
    pub fn parse(address: &str) -> YncaResult<Self> {
        let address = address.trim();
        if address.is_empty() {
            return Err(YncaError::InvalidAddress("Address is empty".to_string()));
        }

        match address.strip_prefix(SOCKET_SCHEME) {
            Some(rest) => {
                let transport = TcpTransport::from_address(rest.trim_end_matches('/'))?;
                Ok(Address::Tcp {
                    host: transport.settings().host.clone(),
                    port: transport.settings().port,
                })
            }
            None => Ok(Address::Serial {
                port_name: address.to_string(),
            }),
        }
    }

    /// Build the transport for this address
    pub fn transport(&self, baud_rate: u32) -> Box<dyn TransportLayer> {
        match self {
            Address::Tcp { host, port } => Box::new(TcpTransport::new(
                crate::tcp::TcpSettings::new(host, *port),
            )),
            Address::Serial { port_name } => Box::new(SerialTransport::new(
                SerialSettings::with_baud_rate(port_name, baud_rate),
            )),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Tcp { host, port } => write!(f, "{}{}:{}", SOCKET_SCHEME, host, port),
            Address::Serial { port_name } => write!(f, "{}", port_name),
        }
    }
}

/// Parse an address string and build its transport
pub fn transport_for(address: &str, baud_rate: u32) -> YncaResult<Box<dyn TransportLayer>> {
    Ok(Address::parse(address)?.transport(baud_rate))
}
