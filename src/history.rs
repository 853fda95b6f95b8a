//! Execution trace of a machine run: one record per step that moved the machine forward.

use crate::types::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single recorded step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// 1-based number of the step.
    pub step_number: usize,
    pub from_state: String,
    pub to_state: String,
    pub read_symbol: char,
    pub write_symbol: char,
    pub move_direction: Direction,
    /// Head position before the step was applied.
    pub head_position: usize,
    /// Set when no rule existed for the pair and the machine was rejected.
    pub is_error: bool,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_error {
            write!(
                f,
                "No transition found for ({}, {})",
                self.from_state, self.read_symbol
            )
        } else {
            write!(
                f,
                "({}, {}) → ({}, {}, {})",
                self.from_state,
                self.read_symbol,
                self.to_state,
                self.write_symbol,
                self.move_direction
            )
        }
    }
}

/// Append-only list of [`HistoryEntry`] values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl std::ops::Index<usize> for History {
    type Output = HistoryEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{:>4}. {}", entry.step_number, entry)?;
        }
        Ok(())
    }
}
