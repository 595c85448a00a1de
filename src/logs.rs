// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! In-app diagnostic log.
//!
//! Every service and screen appends here; the log viewer reads it back.
//! Entries are kept in memory only and are never trimmed.

use chrono::{DateTime, Local};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single timestamped entry.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Append-only store of diagnostic entries.
#[derive(Debug, Default)]
pub struct LogStore {
    entries: RwLock<Vec<LogEntry>>,
}

impl LogStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Append an entry and mirror it to the tracing subscriber.
    pub fn add_log(&self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();

        match level {
            LogLevel::Info => info!(target: "garbot_companion::log", "{}", message),
            LogLevel::Warning => warn!(target: "garbot_companion::log", "{}", message),
            LogLevel::Error => error!(target: "garbot_companion::log", "{}", message),
            LogLevel::Debug => debug!(target: "garbot_companion::log", "{}", message),
        }

        self.entries.write().push(LogEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Local::now(),
            message,
            level,
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.add_log(LogLevel::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.add_log(LogLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.add_log(LogLevel::Error, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.add_log(LogLevel::Debug, message);
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Snapshot of all entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Most recent entry, if any.
    pub fn last(&self) -> Option<LogEntry> {
        self.entries.read().last().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let logs = LogStore::new();
        logs.info("first");
        logs.warning("second");
        logs.error("third");

        let entries = logs.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].level, LogLevel::Warning);
        assert_eq!(entries[2].message, "third");
        assert_ne!(entries[0].id, entries[1].id);
    }

    #[test]
    fn test_clear_empties_any_size() {
        let logs = LogStore::new();
        logs.clear();
        assert!(logs.is_empty());

        for i in 0..500 {
            logs.debug(format!("entry {}", i));
        }
        assert_eq!(logs.len(), 500);

        logs.clear();
        assert!(logs.is_empty());
        assert!(logs.last().is_none());
    }
}
