//! Scrollback: bounded, append-only record of emitted output.

use std::collections::VecDeque;

/// One rendered entry in the scrollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputRecord {
    /// A plain text line.
    Line(String),
    /// An empty spacer line.
    Blank,
    /// An echoed command line, prefixed by the prompt at submission time.
    Command {
        user: String,
        symbol: String,
        input: String,
    },
    /// An error raised by a command or by the terminal itself.
    Error {
        source: String,
        code: Option<String>,
        details: String,
    },
    /// The final contents of a completed sub-prompt.
    Input { label: Option<String>, text: String },
}

impl OutputRecord {
    pub fn line(text: impl Into<String>) -> Self {
        Self::Line(text.into())
    }

    /// Plain-text rendering, one string per visual line.
    pub fn to_lines(&self) -> Vec<String> {
        match self {
            Self::Line(text) => vec![text.clone()],
            Self::Blank => vec![String::new()],
            Self::Command {
                user,
                symbol,
                input,
            } => vec![format!("[{user}] {symbol} {input}")],
            Self::Error {
                source,
                code,
                details,
            } => {
                let mut lines = vec![format!("[{source}]")];
                if let Some(code) = code {
                    lines.push(format!("[Error Code: {code}]"));
                }
                lines.push(details.clone());
                lines
            },
            Self::Input { label, text } => {
                let mut lines: Vec<String> = label.iter().cloned().collect();
                lines.extend(text.lines().map(str::to_string));
                lines
            },
        }
    }
}

/// FIFO buffer of output records capped at `capacity`.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    records: VecDeque<OutputRecord>,
    capacity: usize,
}

impl OutputBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity,
        }
    }

    /// Append a record, returning the evicted oldest record if the cap was exceeded.
    pub fn append(&mut self, record: OutputRecord) -> Option<OutputRecord> {
        self.records.push_back(record);
        if self.records.len() > self.capacity {
            self.records.pop_front()
        } else {
            None
        }
    }

    /// Change the cap, returning how many oldest records were evicted.
    pub fn set_capacity(&mut self, capacity: usize) -> usize {
        self.capacity = capacity;
        let excess = self.records.len().saturating_sub(capacity);
        self.records.drain(..excess);
        excess
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records oldest-first.
    pub fn records(&self) -> impl Iterator<Item = &OutputRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&OutputRecord> {
        self.records.back()
    }
}
