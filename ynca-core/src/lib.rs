//! Core types and utilities for the YNCA protocol
//!
//! This crate provides the error type, subunit identifiers and the line
//! protocol used throughout the YNCA implementation.

pub mod error;
pub mod protocol;
pub mod subunit_id;

pub use error::{YncaError, YncaResult};
pub use protocol::{Message, Status};
pub use subunit_id::SubunitId;
