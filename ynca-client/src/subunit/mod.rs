//! Subunit engine module

pub mod engine;

pub use engine::{CallbackId, Subunit, UpdateCallback};
