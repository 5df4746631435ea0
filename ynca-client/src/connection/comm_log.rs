//! Bounded diagnostic log of sent and received lines

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Direction of a logged line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Sent,
    Received,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Sent => write!(f, "=>"),
            Direction::Received => write!(f, "<="),
        }
    }
}

/// One logged line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    pub line: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.direction,
            self.line
        )
    }
}

/// Ring buffer holding the last `capacity` lines
///
/// A capacity of zero disables logging.
#[derive(Debug)]
pub struct CommunicationLog {
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
}

impl CommunicationLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record(&self, direction: Direction, line: &str) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(LogEntry {
            timestamp: Utc::now(),
            direction,
            line: line.to_string(),
        });
    }

    /// Copy of the logged entries, oldest first
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.lock().iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_log_records_nothing() {
        let log = CommunicationLog::new(0);
        log.record(Direction::Sent, "@SYS:MODELNAME=?");
        assert!(log.snapshot().is_empty());
    }

    #[test]
    fn test_log_keeps_newest_entries() {
        let log = CommunicationLog::new(2);
        log.record(Direction::Sent, "@MAIN:VOL=?");
        log.record(Direction::Received, "@MAIN:VOL=-30.5");
        log.record(Direction::Sent, "@MAIN:PWR=?");

        let lines: Vec<_> = log.snapshot().into_iter().map(|e| (e.direction, e.line)).collect();
        assert_eq!(
            lines,
            vec![
                (Direction::Received, "@MAIN:VOL=-30.5".to_string()),
                (Direction::Sent, "@MAIN:PWR=?".to_string()),
            ]
        );
    }

    #[test]
    fn test_entry_display() {
        let log = CommunicationLog::new(1);
        log.record(Direction::Received, "@RESTRICTED");
        let text = log.snapshot()[0].to_string();
        assert!(text.ends_with("<= @RESTRICTED"));
    }
}
