//! Event log - structured vault history
//!
//! Entries carry their category as data; the bracketed `[COMBAT]` style
//! prefix is only produced when an entry is displayed.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::Tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogCategory {
    System,
    Day,
    Season,
    Mission,
    Combat,
    Roster,
    Production,
    Hydro,
    Challenge,
}

impl LogCategory {
    pub fn tag(&self) -> &'static str {
        match self {
            LogCategory::System => "SYSTEM",
            LogCategory::Day => "DAY",
            LogCategory::Season => "SEASON",
            LogCategory::Mission => "MISSION",
            LogCategory::Combat => "COMBAT",
            LogCategory::Roster => "ROSTER",
            LogCategory::Production => "PRODUCTION",
            LogCategory::Hydro => "HYDRO",
            LogCategory::Challenge => "CHALLENGE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u32,
    pub category: LogCategory,
    pub message: String,
    pub tick: Tick,
    pub day: u64,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            LogCategory::Day => write!(f, "[DAY {}] {}", self.day, self.message),
            other => write!(f, "[{}] {}", other.tag(), self.message),
        }
    }
}

/// Append-only vault event log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    pub entries: Vec<LogEntry>,
    next_entry_id: u32,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        category: LogCategory,
        message: impl Into<String>,
        tick: Tick,
        day: u64,
    ) -> u32 {
        let id = self.next_entry_id;
        self.next_entry_id += 1;

        self.entries.push(LogEntry {
            id,
            category,
            message: message.into(),
            tick,
            day,
        });

        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn recent(&self, count: usize) -> impl Iterator<Item = &LogEntry> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip)
    }

    pub fn entries_for(&self, category: LogCategory) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }
}
