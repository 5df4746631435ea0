//! Transport layer module for the YNCA protocol
//!
//! This crate opens the physical link to a receiver: a serial port or a raw
//! TCP socket. Both hand back a duplex byte stream; line framing is done by
//! the connection on top of it.

pub mod address;
pub mod serial;
pub mod stream;
pub mod tcp;

pub use address::{transport_for, Address};
pub use serial::{SerialSettings, SerialTransport, YNCA_BAUD_RATE};
pub use stream::{TransportLayer, YncaStream};
pub use tcp::{TcpSettings, TcpTransport, YNCA_PORT};
