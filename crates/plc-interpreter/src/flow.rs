//! Control flow for the interpreter.

use crate::value::Value;

/// Outcome of executing one statement.
#[derive(Debug)]
pub(crate) enum Flow {
    /// Fall through to the next statement
    Completed,
    /// Unwind to the enclosing call with the given value
    Return(Value),
}
