use thiserror::Error;

use crate::types::NodePath;

/// Errors produced when decoding a condition document.
///
/// Every structural variant carries the path of the offending node, so a
/// rule editor can point at the exact row that broke.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected an object at {path}")]
    NotAnObject { path: NodePath },

    #[error("node at {path} is neither a group nor a rule")]
    UnknownShape { path: NodePath },

    #[error("missing '{name}' at {path}")]
    MissingField { path: NodePath, name: &'static str },

    #[error("unknown operator '{op}' at {path}")]
    BadOperator { path: NodePath, op: String },

    #[error("'{name}' at {path} must be {expected}")]
    BadValue {
        path: NodePath,
        name: &'static str,
        expected: &'static str,
    },

    #[error("rule at {path} has both a value and a formula")]
    BothValueAndFormula { path: NodePath },

    #[error("rule at {path} has neither a value nor a formula")]
    NeitherValueNorFormula { path: NodePath },

    #[error("group at {path} has no rules")]
    EmptyRules { path: NodePath },

    #[error("condition at {path} exceeds the nesting limit of {max}")]
    MaxDepthExceeded { path: NodePath, max: usize },
}

impl ParseError {
    /// Stable machine-readable tag for the failure class, independent of
    /// the rendered message.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Json(_) => "bad_json",
            Self::NotAnObject { .. } => "not_an_object",
            Self::UnknownShape { .. } => "unknown_shape",
            Self::MissingField { .. } => "missing_field",
            Self::BadOperator { .. } => "bad_operator",
            Self::BadValue { .. } => "bad_value",
            Self::BothValueAndFormula { .. } => "both_value_and_formula",
            Self::NeitherValueNorFormula { .. } => "neither_value_nor_formula",
            Self::EmptyRules { .. } => "empty_rules",
            Self::MaxDepthExceeded { .. } => "max_depth_exceeded",
        }
    }

    /// Where in the document the failure sits. `None` for JSON syntax
    /// errors, which precede any tree.
    #[must_use]
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            Self::Json(_) => None,
            Self::NotAnObject { path }
            | Self::UnknownShape { path }
            | Self::MissingField { path, .. }
            | Self::BadOperator { path, .. }
            | Self::BadValue { path, .. }
            | Self::BothValueAndFormula { path }
            | Self::NeitherValueNorFormula { path }
            | Self::EmptyRules { path }
            | Self::MaxDepthExceeded { path, .. } => Some(path),
        }
    }
}
