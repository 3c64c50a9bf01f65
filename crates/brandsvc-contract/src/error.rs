//! # Validation Failures
//!
//! The structured failure value raised by schema load and dump. Carries a
//! path and one or more messages per offending field, aggregated into a
//! single all-or-nothing failure — partial success never yields a partial
//! result.

use serde::{Deserialize, Serialize};

/// One offending field: a dotted path (`data.0.code`) and its messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub path: String,
    pub messages: Vec<String>,
}

/// Aggregated validation failure for a single load or dump.
///
/// Always propagated to the caller; the boundary error translator decides
/// whether it surfaces as a client error (load) or a server error (dump).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub issues: Vec<FieldIssue>,
}

impl ValidationFailure {
    /// Failure with a single issue.
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue {
                path: path.into(),
                messages: vec![message.into()],
            }],
        }
    }

    /// True when any issue's path starts with the given field path.
    pub fn cites(&self, path: &str) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.path == path || issue.path.starts_with(&format!("{path}.")))
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for issue in &self.issues {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            let path = if issue.path.is_empty() {
                "<input>"
            } else {
                &issue.path
            };
            write!(f, "{}: {}", path, issue.messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Accumulates issues during a load or dump pass so every offending field
/// is reported in one failure.
#[derive(Debug, Default)]
pub(crate) struct IssueCollector {
    issues: Vec<FieldIssue>,
}

impl IssueCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, path: &str, message: impl Into<String>) {
        let message = message.into();
        if let Some(existing) = self.issues.iter_mut().find(|i| i.path == path) {
            existing.messages.push(message);
        } else {
            self.issues.push(FieldIssue {
                path: path.to_string(),
                messages: vec![message],
            });
        }
    }

    pub(crate) fn into_result<T>(self, value: T) -> Result<T, ValidationFailure> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(ValidationFailure {
                issues: self.issues,
            })
        }
    }
}
