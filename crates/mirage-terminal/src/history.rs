//! Bounded input history with up/down browsing.
//!
//! Entries are kept newest-first. The cursor is `None` while the user is
//! not browsing and `Some(i)` (always `< len`) while they are.

use std::collections::VecDeque;

/// Ring buffer of past input lines.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<String>,
    capacity: usize,
    cursor: Option<usize>,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
            cursor: None,
        }
    }

    /// Record a submitted line and stop browsing.
    pub fn push(&mut self, line: &str) {
        self.entries.push_front(line.to_string());
        self.entries.truncate(self.capacity);
        self.cursor = None;
    }

    /// Step to the next older entry; clamps at the oldest.
    pub fn up(&mut self) -> Option<&str> {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next < self.entries.len() {
            self.cursor = Some(next);
            self.entries.get(next).map(String::as_str)
        } else {
            self.entries.back().map(String::as_str)
        }
    }

    /// Step to the next newer entry; never moves past the newest.
    pub fn down(&mut self) -> Option<&str> {
        match self.cursor {
            Some(c) if c >= 1 => {
                self.cursor = Some(c - 1);
                self.entries.get(c - 1).map(String::as_str)
            },
            None if !self.entries.is_empty() => {
                self.cursor = Some(0);
                self.entries.front().map(String::as_str)
            },
            _ => self.entries.front().map(String::as_str),
        }
    }

    /// Change the cap, dropping the oldest entries if it shrank.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.entries.truncate(capacity);
        if self.cursor.is_some_and(|c| c >= self.entries.len()) {
            self.cursor = self.entries.len().checked_sub(1);
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries newest-first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
