mod error;
mod evaluate;
mod parse;
mod types;
mod validate;

pub use error::QuitgateError;
pub use parse::ParseError;
pub use types::{
    ArithOp, CompareOp, Condition, EvalError, EvalReport, FactSet, FactValue, FieldCond,
    FieldSpec, FieldTable, FieldType, Formula, Group, Literal, Logic, MAX_DEPTH, NodePath, Rhs,
    Rule, TraceDetail, TraceEvent, ValidationErrors, ValidationIssue, all, any, field, percent_of,
};
