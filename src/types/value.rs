use std::fmt;

use serde::{Deserialize, Serialize};

use super::condition::CompareOp;
use super::error::EvalError;

/// A single observed metric: the kind of value a [`FactSet`](super::FactSet) holds.
///
/// Facts arrive as plain JSON scalars from the member's tracking data, so the
/// only shapes are numbers and booleans. Numbers are IEEE-754 `f64`
/// throughout and equality is exact; there is no epsilon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Number(f64),
    Bool(bool),
}

impl FactValue {
    /// Apply `op` with `self` on the left-hand side.
    ///
    /// Booleans only support `=` and `!=`; ordering a boolean or relating
    /// mixed types is an [`EvalError::InvalidComparison`]. NaN operands
    /// follow IEEE-754: every ordered comparison and `=` is false, `!=`
    /// is true.
    pub fn compare(self, op: CompareOp, other: FactValue) -> Result<bool, EvalError> {
        match (self, other) {
            (Self::Number(lhs), Self::Number(rhs)) => Ok(compare_numbers(lhs, op, rhs)),
            (Self::Bool(lhs), Self::Bool(rhs)) => match op {
                CompareOp::Eq => Ok(lhs == rhs),
                CompareOp::Neq => Ok(lhs != rhs),
                _ => Err(EvalError::InvalidComparison(format!(
                    "'{op}' is not defined for booleans"
                ))),
            },
            (lhs, rhs) => Err(EvalError::InvalidComparison(format!(
                "cannot relate {} and {} with '{op}'",
                lhs.kind(),
                rhs.kind()
            ))),
        }
    }

    #[must_use]
    pub fn as_number(self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n),
            Self::Bool(_) => None,
        }
    }

    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(b),
            Self::Number(_) => None,
        }
    }

    pub(crate) fn kind(self) -> &'static str {
        match self {
            Self::Number(_) => "a number",
            Self::Bool(_) => "a boolean",
        }
    }
}

fn compare_numbers(lhs: f64, op: CompareOp, rhs: f64) -> bool {
    match op {
        CompareOp::Gte => lhs >= rhs,
        CompareOp::Lte => lhs <= rhs,
        CompareOp::Gt => lhs > rhs,
        CompareOp::Lt => lhs < rhs,
        CompareOp::Eq => lhs == rhs,
        CompareOp::Neq => lhs != rhs,
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<f64> for FactValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for FactValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for FactValue {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for FactValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for FactValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_numbers_all_ops() {
        let seven = FactValue::Number(7.0);
        let eight = FactValue::Number(8.0);
        assert_eq!(seven.compare(CompareOp::Lte, eight), Ok(true));
        assert_eq!(seven.compare(CompareOp::Lt, eight), Ok(true));
        assert_eq!(seven.compare(CompareOp::Gte, eight), Ok(false));
        assert_eq!(seven.compare(CompareOp::Gt, eight), Ok(false));
        assert_eq!(seven.compare(CompareOp::Eq, seven), Ok(true));
        assert_eq!(seven.compare(CompareOp::Neq, eight), Ok(true));
        assert_eq!(seven.compare(CompareOp::Gte, seven), Ok(true));
        assert_eq!(seven.compare(CompareOp::Lte, seven), Ok(true));
    }

    #[test]
    fn number_equality_is_exact() {
        let sum = FactValue::Number(0.1 + 0.2);
        let expected = FactValue::Number(0.3);
        assert_eq!(sum.compare(CompareOp::Eq, expected), Ok(false));
        assert_eq!(sum.compare(CompareOp::Neq, expected), Ok(true));
    }

    #[test]
    fn booleans_support_identity_only() {
        let yes = FactValue::Bool(true);
        let no = FactValue::Bool(false);
        assert_eq!(yes.compare(CompareOp::Eq, yes), Ok(true));
        assert_eq!(yes.compare(CompareOp::Eq, no), Ok(false));
        assert_eq!(yes.compare(CompareOp::Neq, no), Ok(true));
        assert!(matches!(
            yes.compare(CompareOp::Gt, no),
            Err(EvalError::InvalidComparison(_))
        ));
        assert!(matches!(
            yes.compare(CompareOp::Lte, no),
            Err(EvalError::InvalidComparison(_))
        ));
    }

    #[test]
    fn mixed_types_cannot_be_related() {
        let n = FactValue::Number(1.0);
        let b = FactValue::Bool(true);
        assert!(matches!(
            n.compare(CompareOp::Eq, b),
            Err(EvalError::InvalidComparison(_))
        ));
        assert!(matches!(
            b.compare(CompareOp::Neq, n),
            Err(EvalError::InvalidComparison(_))
        ));
    }

    #[test]
    fn nan_follows_ieee() {
        let nan = FactValue::Number(f64::NAN);
        let eight = FactValue::Number(8.0);
        assert_eq!(nan.compare(CompareOp::Lte, eight), Ok(false));
        assert_eq!(nan.compare(CompareOp::Gte, eight), Ok(false));
        assert_eq!(nan.compare(CompareOp::Eq, nan), Ok(false));
        assert_eq!(nan.compare(CompareOp::Neq, nan), Ok(true));
    }

    #[test]
    fn from_conversions() {
        assert_eq!(FactValue::from(85_i32), FactValue::Number(85.0));
        assert_eq!(FactValue::from(85_i64), FactValue::Number(85.0));
        assert_eq!(FactValue::from(0.8_f64), FactValue::Number(0.8));
        assert_eq!(FactValue::from(true), FactValue::Bool(true));
    }

    #[test]
    fn display() {
        assert_eq!(FactValue::Number(7.5).to_string(), "7.5");
        assert_eq!(FactValue::Number(10.0).to_string(), "10");
        assert_eq!(FactValue::Bool(false).to_string(), "false");
    }

    #[test]
    fn deserializes_untagged() {
        let n: FactValue = serde_json::from_str("42.5").unwrap();
        let b: FactValue = serde_json::from_str("true").unwrap();
        assert_eq!(n, FactValue::Number(42.5));
        assert_eq!(b, FactValue::Bool(true));
    }
}
