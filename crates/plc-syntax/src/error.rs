//! Error types for the three phases of the PLC toolchain.
//!
//! Each phase fails fast with exactly one kind of error:
//!
//! - [`SyntaxError`] from the parser, located by token index and source offset
//! - [`TypeError`] from the analyzer, optionally naming the expected and
//!   received types
//! - [`RuntimeError`] from the interpreter
//!
//! None of them is caught inside the toolchain; they propagate to the host.
//!
//! # Examples
//!
//! ```rust
//! use plc_syntax::error::{type_mismatch, TypeResult};
//! use plc_syntax::Type;
//!
//! fn require_integer(ty: Type) -> TypeResult<()> {
//!     if ty == Type::Integer {
//!         Ok(())
//!     } else {
//!         type_mismatch(Type::Integer, ty)
//!     }
//! }
//!
//! let err = require_integer(Type::String).unwrap_err();
//! assert_eq!(err.to_string(), "expected type Integer, received String");
//! assert_eq!(err.expected, Some(Type::Integer));
//! ```

use thiserror::Error;

use crate::types::Type;

/// A parse failure at a specific token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{msg} at token {index} (offset {offset})")]
pub struct SyntaxError {
    /// Human-readable error message
    pub msg: String,

    /// Zero-based index of the offending token; `tokens.len()` at end of input
    pub index: usize,

    /// Source offset of the offending token
    pub offset: usize,
}

/// A static typing or resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{msg}")]
pub struct TypeError {
    pub msg: String,
    pub expected: Option<Type>,
    pub received: Option<Type>,
}

/// A failure while executing a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{msg}")]
pub struct RuntimeError {
    pub msg: String,
}

impl SyntaxError {
    pub fn new(msg: impl Into<String>, index: usize, offset: usize) -> Self {
        Self {
            msg: msg.into(),
            index,
            offset,
        }
    }
}

impl TypeError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            expected: None,
            received: None,
        }
    }

    pub fn mismatch(expected: Type, received: Type) -> Self {
        Self {
            msg: format!("expected type {}, received {}", expected, received),
            expected: Some(expected),
            received: Some(received),
        }
    }
}

impl RuntimeError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

impl From<String> for RuntimeError {
    fn from(s: String) -> Self {
        RuntimeError::new(s)
    }
}

impl From<&str> for RuntimeError {
    fn from(s: &str) -> Self {
        RuntimeError::new(s)
    }
}

pub type ParseResult<T> = std::result::Result<T, SyntaxError>;
pub type TypeResult<T> = std::result::Result<T, TypeError>;
pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;

/// Shorthand for `Err(SyntaxError::new(msg, index, offset))`.
pub fn syntax_error<T>(index: usize, offset: usize, msg: impl Into<String>) -> ParseResult<T> {
    Err(SyntaxError::new(msg, index, offset))
}

/// Shorthand for `Err(TypeError::new(msg))`.
pub fn type_error<T>(msg: impl Into<String>) -> TypeResult<T> {
    Err(TypeError::new(msg))
}

/// Shorthand for `Err(TypeError::mismatch(expected, received))`.
pub fn type_mismatch<T>(expected: Type, received: Type) -> TypeResult<T> {
    Err(TypeError::mismatch(expected, received))
}

/// Shorthand for `Err(RuntimeError::new(msg))`.
pub fn runtime_error<T>(msg: impl Into<String>) -> RuntimeResult<T> {
    Err(RuntimeError::new(msg))
}
