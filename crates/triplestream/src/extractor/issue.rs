//! Issue accumulation.
//!
//! Issues are a purely additive log attached to an extraction run; they
//! never mutate statements and never silently disappear. Recoverable
//! extractor failures surface here rather than as errors.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueLevel {
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for IssueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueLevel::Warning => write!(f, "WARNING"),
            IssueLevel::Error => write!(f, "ERROR"),
            IssueLevel::Fatal => write!(f, "FATAL"),
        }
    }
}

/// One problem noticed during an extraction run, optionally located in the
/// input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub level: IssueLevel,
    pub message: String,
    pub row: Option<u64>,
    pub col: Option<u64>,
}

impl Issue {
    pub fn new(level: IssueLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            row: None,
            col: None,
        }
    }

    pub fn at(level: IssueLevel, message: impl Into<String>, row: u64, col: u64) -> Self {
        Self {
            level,
            message: message.into(),
            row: Some(row),
            col: Some(col),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.row, self.col) {
            (Some(row), Some(col)) => write!(f, "[{}] {} ({row},{col})", self.level, self.message),
            _ => write!(f, "[{}] {}", self.level, self.message),
        }
    }
}

/// Issues of one document's extraction, grouped per extractor in the order
/// the extractors ran.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueReport {
    issues: IndexMap<String, Vec<Issue>>,
}

impl IssueReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, extractor_name: impl Into<String>, issue: Issue) {
        self.issues.entry(extractor_name.into()).or_default().push(issue);
    }

    /// Issues reported by one extractor, empty when it reported none.
    pub fn issues_for(&self, extractor_name: &str) -> &[Issue] {
        self.issues.get(extractor_name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Issue])> {
        self.issues.iter().map(|(n, i)| (n.as_str(), i.as_slice()))
    }

    pub fn total(&self) -> usize {
        self.issues.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn has_fatal(&self) -> bool {
        self.issues
            .values()
            .flatten()
            .any(|i| i.level == IssueLevel::Fatal)
    }
}
