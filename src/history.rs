//! Chat input-history store: a bounded, deduped sequence of input lines
//! with a navigation cursor and an escape-based persistence format.
//!
//! Independent of the bus and the providers — it's addressed only by the
//! UI collaborator (see `spec.md` §2's data-flow paragraph) but ships as
//! part of this crate's public surface because every invariant it needs
//! is independently testable.

use std::io;
use std::path::Path;

/// Maximum number of retained history entries.
const MAX_ENTRIES: usize = 50;

/// A bounded, deduped sequence of input lines with a navigation cursor.
///
/// The cursor is `-1` ("no selection"), `0` ("most recent"), increasing
/// toward older entries — the same convention a shell's reverse-search
/// uses.
#[derive(Debug, Clone, Default)]
pub struct InputHistory {
    entries: Vec<String>,
    cursor: i64,
}

impl InputHistory {
    /// An empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: -1,
        }
    }

    /// The entries, most recent last.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Append `line`. No-op for `""`. An earlier equal entry is removed
    /// first so every entry is unique; if the history then exceeds
    /// [`MAX_ENTRIES`], the oldest is dropped. Always resets the cursor —
    /// a mutation invalidates whatever the caller was navigating.
    pub fn push(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        self.entries.retain(|existing| existing != line);
        self.entries.push(line.to_string());
        if self.entries.len() > MAX_ENTRIES {
            self.entries.remove(0);
        }
        self.reset_cursor();
    }

    /// Move the cursor toward older entries (`-1` → `0` → `1` → ...).
    /// Returns `None`, leaving the cursor unmoved, once past the oldest
    /// entry.
    pub fn older(&mut self) -> Option<&str> {
        let next = self.cursor.saturating_add(1);
        if next >= i64::try_from(self.entries.len()).unwrap_or(i64::MAX) {
            return None;
        }
        self.cursor = next;
        self.at_cursor()
    }

    /// Move the cursor toward newer entries. Reaching `-1` again returns
    /// `None` (back to an empty line), matching `older`'s symmetry.
    pub fn newer(&mut self) -> Option<&str> {
        if self.cursor < 0 {
            return None;
        }
        self.cursor = self.cursor.saturating_sub(1);
        if self.cursor < 0 {
            return None;
        }
        self.at_cursor()
    }

    /// Reset the cursor to "no selection".
    pub fn reset_cursor(&mut self) {
        self.cursor = -1;
    }

    fn at_cursor(&self) -> Option<&str> {
        if self.cursor < 0 {
            return None;
        }
        let index = self.entries.len().checked_sub(1)?.checked_sub(
            usize::try_from(self.cursor).ok()?,
        )?;
        self.entries.get(index).map(String::as_str)
    }

    /// Serialize and write the history, one escaped line per entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let body = self
            .entries
            .iter()
            .map(|line| escape(line))
            .collect::<Vec<_>>()
            .join("\n");
        std::fs::write(path, body)
    }

    /// Load a history previously written by [`InputHistory::save`].
    /// Entries beyond [`MAX_ENTRIES`] are dropped, oldest first, matching
    /// `push`'s cap.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(path: &Path) -> io::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut entries: Vec<String> = raw
            .lines()
            .map(unescape)
            .filter(|line| !line.is_empty())
            .collect();
        if entries.len() > MAX_ENTRIES {
            let drop = entries.len() - MAX_ENTRIES;
            entries.drain(0..drop);
        }
        Ok(Self { entries, cursor: -1 })
    }
}

/// Escape `\` as `\\` and newlines as the two-character sequence `\n`.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

/// Reverse [`escape`]: `\\` → `\`, `\n` → newline, unknown `\x` kept
/// verbatim (both characters).
#[must_use]
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
