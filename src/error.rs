use thiserror::Error;

use crate::parse::ParseError;
use crate::types::{EvalError, ValidationErrors};

/// Unified error type covering parsing, validation, evaluation, and I/O.
///
/// Returned by convenience methods like
/// [`Condition::from_file()`](crate::Condition::from_file) that cross more
/// than one of those layers.
#[derive(Debug, Error)]
pub enum QuitgateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
