//! Line History Module
//!
//! Committed lines with circular up/down navigation. Index 0 always holds
//! an empty sentinel, so the store is never empty and stepping back from
//! a fresh prompt lands on the most recent line.

use std::collections::VecDeque;

use tracing::debug;

/// Line history owned by the caller and shared across `read_line` calls
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    max_size: usize,
    offset: usize,
}

impl History {
    /// Create a history keeping at most `max_size` committed lines
    pub fn new(max_size: usize) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(String::new());
        Self {
            entries,
            max_size,
            offset: 0,
        }
    }

    /// Record a committed line.
    /// Empty lines and repeats of the most recent line are ignored.
    /// Returns whether the line was stored.
    pub fn add_line(&mut self, line: &str) -> bool {
        self.offset = 0;

        if self.max_size == 0
            || line.is_empty()
            || self.entries.back().is_some_and(|last| last == line)
        {
            return false;
        }

        // Drop the oldest real entry; the sentinel stays at index 0
        if self.len() >= self.max_size {
            self.entries.remove(1);
        }
        self.entries.push_back(line.to_string());
        debug!(entries = self.len(), "history line added");
        true
    }

    /// Step to the previous entry (up arrow), wrapping past the sentinel
    pub fn previous(&mut self) -> &str {
        let count = self.entries.len();
        self.offset = (self.offset + count - 1) % count;
        &self.entries[self.offset]
    }

    /// Step to the next entry (down arrow), wrapping past the newest line
    pub fn next(&mut self) -> &str {
        let count = self.entries.len();
        self.offset = (self.offset + 1) % count;
        &self.entries[self.offset]
    }

    /// Current navigation offset
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Reset navigation back to the sentinel
    pub fn reset_navigation(&mut self) {
        self.offset = 0;
    }

    /// Committed lines in chronological order (oldest first), sentinel excluded
    pub fn get_chronological(&self) -> Vec<String> {
        self.entries.iter().skip(1).cloned().collect()
    }

    /// Get the most recent committed line
    pub fn last_line(&self) -> Option<&str> {
        if self.is_empty() {
            None
        } else {
            self.entries.back().map(String::as_str)
        }
    }

    /// Number of slots navigation cycles through, sentinel included
    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of committed lines
    pub fn len(&self) -> usize {
        self.entries.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every committed line
    pub fn clear(&mut self) {
        self.entries.truncate(1);
        self.offset = 0;
    }

    /// Get history summary for display
    pub fn get_summary(&self, limit: Option<usize>) -> Vec<String> {
        let mut summary = vec![format!("History ({} lines)", self.len())];

        let display_limit = limit.unwrap_or(20);
        let lines = self.get_chronological();
        let skipped = lines.len().saturating_sub(display_limit);

        if skipped > 0 {
            summary.push(format!("... {} older lines", skipped));
        }
        for (i, line) in lines.iter().enumerate().skip(skipped) {
            summary.push(format!("{:4}  {}", i + 1, line));
        }

        summary
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(1000)
    }
}
