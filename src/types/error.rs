use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::path::NodePath;

/// Why a single rule could not be resolved during evaluation.
///
/// Under lenient evaluation these are folded into `false` for the affected
/// rule; [`Condition::try_evaluate`](super::Condition::try_evaluate) surfaces
/// them instead.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalError {
    /// The fact set has no entry for a field the rule references.
    #[error("missing fact '{0}'")]
    MissingFact(String),

    /// A formula produced no usable number (division by zero, non-numeric
    /// base, or a non-finite result).
    #[error("formula error: {0}")]
    Arithmetic(String),

    /// The operands cannot be related by the rule's operator.
    #[error("invalid comparison: {0}")]
    InvalidComparison(String),
}

/// One problem found during validation: where it is and what to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: NodePath,
    pub message: String,
}

impl ValidationIssue {
    pub(crate) fn new(path: NodePath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} (at {})", self.message, self.path)
        }
    }
}

/// Everything wrong with a condition tree, in discovery order.
///
/// Validation never stops at the first problem; this collects the full list
/// so an editor can show it in one pass. [`fmt::Display`] renders the
/// bulleted list the editors use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
#[must_use]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub(crate) fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter()
    }

    /// The display strings alone, without paths, in discovery order.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.message.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, issue) in self.issues.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "- {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationIssue;
    type IntoIter = std::slice::Iter<'a, ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}
