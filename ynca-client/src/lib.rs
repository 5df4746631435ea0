//! YNCA client implementation
//!
//! This crate owns the physical link to a receiver and everything built on
//! top of it:
//!
//! - [`Connection`]: one transport, a paced writer task with keep-alive, a
//!   reader task that parses lines and fans them out to listeners
//! - [`Subunit`]: per-subunit value cache driven by a static schema
//! - [`Ynca`]: discovery of the present subunits and their initialization

pub mod api;
pub mod connection;
pub mod subunit;
mod sync;

pub use api::{Ynca, YncaBuilder};
pub use connection::{
    CommunicationLog, Connection, ConnectionBuilder, ConnectionSettings, Direction, LinkState,
    ListenerId, LogEntry, MessageListener,
};
pub use subunit::{CallbackId, Subunit};
pub use sync::InitSettings;
