//! ynca - Rust client for the YNCA protocol of Yamaha A/V receivers
//!
//! YNCA is a line-based ASCII protocol spoken over a serial port or a TCP
//! socket (port 50000). Every line addresses one function of one subunit,
//! e.g. `@MAIN:VOL=-30.5`.
//!
//! # Architecture
//!
//! - `ynca-core`: line protocol, subunit ids, error handling
//! - `ynca-transport`: serial and TCP transports, address parsing
//! - `ynca-function`: converters, function descriptors, subunit schemas
//! - `ynca-client`: connection with paced writer and keep-alive, subunit
//!   engine, discovery and initialization
//!
//! # Usage
//!
//! ```no_run
//! use ynca::Ynca;
//! use ynca::subunits::zone;
//!
//! # async fn run() -> ynca::YncaResult<()> {
//! let mut ynca = Ynca::builder("/dev/ttyUSB0").build()?;
//! ynca.initialize().await?;
//! if let Some(main) = ynca.main() {
//!     main.set(&zone::VOL, -35.0)?;
//! }
//! ynca.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Demos
//!
//! See `demos/status.rs` (`cargo run --example status -- <address>`).

// Re-export core types
pub use ynca_core::{Message, Status, SubunitId, YncaError, YncaResult};

// Re-export the client API
pub use ynca_client::{
    CallbackId, CommunicationLog, Connection, ConnectionBuilder, ConnectionSettings, Direction,
    InitSettings, LinkState, ListenerId, LogEntry, MessageListener, Subunit, Ynca, YncaBuilder,
};

// Re-export function schemas
pub use ynca_function::{enums, subunits};
pub use ynca_function::{Converter, Function, FunctionSpec, SubunitSchema};

pub mod transport {
    pub use ynca_transport::*;
}
