//! The parse -> analyze -> execute pipeline.

use std::fs;
use std::io::Write;
use std::path::Path;

use num_bigint::BigInt;
use plc_analyzer::Analyzer;
use plc_interpreter::Interpreter;
use plc_syntax::{Source, Token};
use tracing::debug;

use crate::Result;

/// Parses and analyzes `tokens` with a default analyzer.
pub fn compile(tokens: Vec<Token>) -> Result<Source> {
    compile_with(tokens, &mut Analyzer::new())
}

/// Parses `tokens` and analyzes the tree with `analyzer`, which may carry
/// extra type aliases or a non-default config.
pub fn compile_with(tokens: Vec<Token>, analyzer: &mut Analyzer) -> Result<Source> {
    let mut source = plc_parser::parse(tokens)?;
    analyzer.analyze(&mut source)?;
    debug!(functions = source.functions.len(), "compiled");
    Ok(source)
}

/// Compiles pre-spaced source text split with [`Token::split`].
pub fn compile_str(src: &str) -> Result<Source> {
    compile(Token::split(src))
}

/// Runs an analyzed program and returns main's result.
pub fn execute<W: Write>(source: &Source, interpreter: &Interpreter<W>) -> Result<BigInt> {
    Ok(interpreter.run(source)?)
}

/// Compiles and runs `src`, printing to stdout.
pub fn run(src: &str) -> Result<BigInt> {
    let source = compile_str(src)?;
    execute(&source, &Interpreter::new())
}

/// Compiles and runs `src`, printing into `output`, and hands `output` back.
pub fn run_with_output<W: Write>(src: &str, output: W) -> Result<(BigInt, W)> {
    let source = compile_str(src)?;
    let interpreter = Interpreter::with_output(output);
    let result = execute(&source, &interpreter)?;
    Ok((result, interpreter.into_output()))
}

/// Reads a pre-spaced program from `path` and runs it like [`run_with_output`].
pub fn run_file<W: Write>(path: impl AsRef<Path>, output: W) -> Result<(BigInt, W)> {
    let src = fs::read_to_string(path.as_ref())?;
    run_with_output(&src, output)
}

/// The annotated tree as JSON, for backends that generate code from it.
pub fn to_json(source: &Source) -> Result<String> {
    Ok(serde_json::to_string_pretty(source)?)
}
