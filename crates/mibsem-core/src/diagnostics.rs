//! Source locations and the per-load diagnostic log.
//!
//! Resolution does not stop at the first problem. Every error and warning is
//! appended to a [`MibLog`] together with the location of the declaration
//! that caused it, and mirrored as a `tracing` event.

use std::fmt;

use crate::error::SemanticError;

/// A position in a MIB source file.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileLocation {
    /// File identifier (path, URL or module name for built-ins).
    pub file: String,
    /// 1-based line, 0 when unknown.
    pub line: u32,
    /// 1-based column, 0 when unknown.
    pub column: u32,
}

impl FileLocation {
    /// Create a new location.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Location used for definitions that have no source text.
    #[must_use]
    pub fn synthetic(file: impl Into<String>) -> Self {
        Self::new(file, 0, 0)
    }

    /// Check if this location points into real source text.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for FileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_synthetic() {
            write!(f, "{}", self.file)
        } else {
            write!(f, "{}:{}:{}", self.file, self.line, self.column)
        }
    }
}

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// The declaration could not be resolved.
    Error,
    /// Resolution continued, but the input is suspicious.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Severity level.
    pub severity: Severity,
    /// Where the problem was found.
    pub location: FileLocation,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.severity, self.message)
    }
}

/// Ordered collection of diagnostics from one load or unload operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MibLog {
    entries: Vec<LogEntry>,
}

impl MibLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error.
    pub fn add_error(&mut self, location: FileLocation, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(
            file = %location.file,
            line = location.line,
            column = location.column,
            "{message}"
        );
        self.entries.push(LogEntry {
            severity: Severity::Error,
            location,
            message,
        });
    }

    /// Append a warning.
    pub fn add_warning(&mut self, location: FileLocation, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(
            file = %location.file,
            line = location.line,
            column = location.column,
            "{message}"
        );
        self.entries.push(LogEntry {
            severity: Severity::Warning,
            location,
            message,
        });
    }

    /// Append a semantic error, using the error's own location when it has one.
    pub fn add_semantic_error(&mut self, fallback: &FileLocation, err: &SemanticError) {
        let location = err.location().unwrap_or(fallback).clone();
        self.add_error(location, err.to_string());
    }

    /// Append all entries of another log.
    pub fn extend(&mut self, other: MibLog) {
        self.entries.extend(other.entries);
    }

    /// All entries in the order they were recorded.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Iterate over error entries.
    pub fn errors(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.severity == Severity::Error)
    }

    /// Iterate over warning entries.
    pub fn warnings(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.severity == Severity::Warning)
    }

    /// Number of errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Number of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Check if any error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for MibLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let loc = FileLocation::new("IF-MIB", 12, 5);
        assert_eq!(loc.to_string(), "IF-MIB:12:5");
        assert_eq!(FileLocation::synthetic("SNMPv2-SMI").to_string(), "SNMPv2-SMI");
    }

    #[test]
    fn test_log_counts() {
        let mut log = MibLog::new();
        assert!(log.is_empty());
        log.add_warning(FileLocation::new("A", 1, 1), "missing import");
        log.add_error(FileLocation::new("A", 2, 1), "undefined symbol");
        log.add_warning(FileLocation::new("A", 3, 1), "renamed");

        assert_eq!(log.warning_count(), 2);
        assert_eq!(log.error_count(), 1);
        assert!(log.has_errors());
        assert_eq!(log.entries()[1].message, "undefined symbol");
    }

    #[test]
    fn test_log_display() {
        let mut log = MibLog::new();
        log.add_error(FileLocation::new("A", 2, 7), "boom");
        assert_eq!(log.to_string(), "A:2:7: error: boom\n");
    }

    #[test]
    fn test_log_extend_preserves_order() {
        let mut first = MibLog::new();
        first.add_warning(FileLocation::new("A", 1, 1), "one");
        let mut second = MibLog::new();
        second.add_error(FileLocation::new("B", 1, 1), "two");

        first.extend(second);
        let messages: Vec<_> = first.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["one", "two"]);
    }
}
