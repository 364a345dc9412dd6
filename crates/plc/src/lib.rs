//! PLC: parser, static analyzer and tree-walking interpreter for a small
//! imperative scripting language.
//!
//! Programs come in as tokens (see [`Token`]), are parsed into a [`Source`]
//! tree, annotated by the [`Analyzer`] and executed by the [`Interpreter`].
//! Each phase fails fast with its own error type; [`Error`] unifies them.
//!
//! # Examples
//!
//! ```rust
//! let (result, output) = plc::run_with_output(
//!     "FUN main(): Integer DO print(\"a\" + 1); RETURN 2 ^ 3; END",
//!     Vec::new(),
//! )
//! .unwrap();
//! assert_eq!(result, 8.into());
//! assert_eq!(String::from_utf8(output).unwrap(), "a1\n");
//! ```

pub mod pipeline;

pub use pipeline::{compile, compile_str, compile_with, execute, run, run_file, run_with_output, to_json};
pub use plc_analyzer::{Analyzer, AnalyzerConfig, TypeRegistry};
pub use plc_interpreter::{Interpreter, InterpreterConfig, NegativeExponent, Value};
pub use plc_parser::Parser;
pub use plc_syntax::{RuntimeError, Source, SyntaxError, Token, TokenKind, Type, TypeError};

use thiserror::Error;

/// Any failure along the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("type error: {0}")]
    Type(#[from] TypeError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
