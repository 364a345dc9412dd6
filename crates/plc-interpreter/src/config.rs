//! Interpreter configuration.

/// How `Integer ^ negative` is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativeExponent {
    /// Raise a runtime error.
    #[default]
    Reject,
    /// `1 / base^|n|` with truncating integer division.
    Truncate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Nested user function calls allowed before execution is aborted. The
    /// native stack grows as needed, so this bounds memory, not the thread.
    pub max_call_depth: usize,
    pub negative_exponent: NegativeExponent,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 10_000,
            negative_exponent: NegativeExponent::Reject,
        }
    }
}
