//! Stream traits for the transport layer

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use ynca_core::YncaResult;

/// Duplex byte stream to a receiver
///
/// Anything readable and writable qualifies, which lets tests hand an
/// in-memory `tokio::io::DuplexStream` to the connection.
pub trait YncaStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T> YncaStream for T where T: AsyncRead + AsyncWrite + Send + Unpin {}

/// Transport layer interface to open a physical link to a receiver
#[async_trait]
pub trait TransportLayer: Send + Sync {
    /// Open the physical layer connection
    ///
    /// # Returns
    ///
    /// The opened stream. Ownership moves to the caller, which splits it
    /// into a reader and a writer half.
    ///
    /// # Errors
    ///
    /// Returns `YncaError::Connection` when the device cannot be reached
    async fn open(&mut self) -> YncaResult<Box<dyn YncaStream>>;

    /// Human readable description of the link, used in log messages
    fn description(&self) -> String;
}
