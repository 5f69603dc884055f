mod condition;
mod error;
mod facts;
mod fields;
mod path;
mod report;
mod value;

pub use condition::{
    ArithOp, CompareOp, Condition, FieldCond, Formula, Group, Literal, Logic, MAX_DEPTH, Rhs,
    Rule, all, any, field, percent_of,
};
pub use error::{EvalError, ValidationErrors, ValidationIssue};
pub use facts::FactSet;
pub use fields::{FieldSpec, FieldTable, FieldType};
pub use path::NodePath;
pub use report::{EvalReport, TraceDetail, TraceEvent};
pub use value::FactValue;
