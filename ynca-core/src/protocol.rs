//! YNCA line protocol
//!
//! Every line on the wire has one of these shapes:
//!
//! ```text
//! @<SUBUNIT>:<FUNCTION>=<VALUE>        request or normal response
//! @<SUBUNIT>:<FUNCTION>=?              GET request
//! @UNDEFINED                           function not supported
//! @RESTRICTED                          function currently inaccessible
//! ```
//!
//! Failed requests are not echoed by the device, so `UNDEFINED` and
//! `RESTRICTED` carry no subunit, function or value.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Minimum spacing between two transmitted lines
pub const COMMAND_SPACING: Duration = Duration::from_millis(100);

/// Idle time after which a keep-alive probe is sent.
///
/// Receivers drop the link after 40 seconds without traffic.
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Value used in a GET request
pub const GET_VALUE: &str = "?";

/// Subunit and function queried as keep-alive probe
pub const KEEP_ALIVE_SUBUNIT: &str = "SYS";
pub const KEEP_ALIVE_FUNCTION: &str = "MODELNAME";

/// Subunit and function used as end-of-burst synchronization marker
pub const SYNC_SUBUNIT: &str = "SYS";
pub const SYNC_FUNCTION: &str = "VERSION";

/// Function answered by every present subunit
pub const AVAILABLE_FUNCTION: &str = "AVAIL";

/// Line terminator written after every command
pub const LINE_TERMINATOR: &str = "\r\n";

const UNDEFINED_LINE: &str = "@UNDEFINED";
const RESTRICTED_LINE: &str = "@RESTRICTED";

static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@(?P<subunit>[^:]+?):(?P<function>[^=]+?)=(?P<value>.*)$")
        .expect("line pattern is a valid regex")
});

/// Status carried by a received line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Ok,
    /// Function not supported by this device or subunit
    Undefined,
    /// Function exists but is currently inaccessible
    Restricted,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "OK"),
            Status::Undefined => write!(f, "UNDEFINED"),
            Status::Restricted => write!(f, "RESTRICTED"),
        }
    }
}

/// One parsed protocol line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub status: Status,
    pub subunit: Option<String>,
    pub function: Option<String>,
    pub value: Option<String>,
}

impl Message {
    /// Create an `OK` message for a subunit/function/value triple
    pub fn new(subunit: &str, function: &str, value: &str) -> Self {
        Self {
            status: Status::Ok,
            subunit: Some(subunit.to_string()),
            function: Some(function.to_string()),
            value: Some(value.to_string()),
        }
    }

    /// Create a bare status message without subunit, function or value
    pub fn bare(status: Status) -> Self {
        Self {
            status,
            subunit: None,
            function: None,
            value: None,
        }
    }

    /// Parse a received line
    ///
    /// Lines that match neither the command grammar nor one of the error
    /// tokens yield an `OK` message with all fields empty, so unknown device
    /// chatter never becomes an error.
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);

        match line {
            UNDEFINED_LINE => return Self::bare(Status::Undefined),
            RESTRICTED_LINE => return Self::bare(Status::Restricted),
            _ => {}
        }

        match LINE_PATTERN.captures(line) {
            Some(caps) => Self {
                status: Status::Ok,
                subunit: caps.name("subunit").map(|m| m.as_str().to_string()),
                function: caps.name("function").map(|m| m.as_str().to_string()),
                value: caps.name("value").map(|m| m.as_str().to_string()),
            },
            None => Self::bare(Status::Ok),
        }
    }

    /// Whether this is an `OK` message that carries no fields
    pub fn is_unrecognized(&self) -> bool {
        self.status == Status::Ok
            && self.subunit.is_none()
            && self.function.is_none()
            && self.value.is_none()
    }

    /// Whether this message is addressed to the given subunit and function
    pub fn is(&self, subunit: &str, function: &str) -> bool {
        self.status == Status::Ok
            && self.subunit.as_deref() == Some(subunit)
            && self.function.as_deref() == Some(function)
    }

    /// Whether this message is the synchronization marker response
    pub fn is_sync_marker(&self) -> bool {
        self.is(SYNC_SUBUNIT, SYNC_FUNCTION)
    }

    /// Whether this message is a response to the keep-alive probe
    pub fn is_keep_alive_response(&self) -> bool {
        self.is(KEEP_ALIVE_SUBUNIT, KEEP_ALIVE_FUNCTION)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.subunit, &self.function, &self.value) {
            (Some(subunit), Some(function), Some(value)) => {
                write!(f, "{}", format_command(subunit, function, value))
            }
            _ => write!(f, "@{}", self.status),
        }
    }
}

/// Serialize a PUT command (without line terminator)
pub fn format_command(subunit: &str, function: &str, value: &str) -> String {
    format!("@{}:{}={}", subunit, function, value)
}

/// Serialize a GET command (without line terminator)
pub fn format_get(subunit: &str, function: &str) -> String {
    format_command(subunit, function, GET_VALUE)
}

/// The keep-alive probe line
pub fn keep_alive_command() -> String {
    format_get(KEEP_ALIVE_SUBUNIT, KEEP_ALIVE_FUNCTION)
}
