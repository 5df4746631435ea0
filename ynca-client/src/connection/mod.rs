//! Connection management module

pub mod builder;
pub mod comm_log;
pub mod connection;
pub mod listener;
mod scheduler;

pub use builder::{ConnectionBuilder, ConnectionSettings};
pub use comm_log::{CommunicationLog, Direction, LogEntry};
pub use connection::{Connection, LinkState};
pub use listener::{ListenerId, MessageListener};
