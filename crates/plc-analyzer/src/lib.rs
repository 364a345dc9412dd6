//! PLC analyzer: resolves names and checks types, annotating the AST in place.
//!
//! Analysis is a single depth-first pass. Every block gets its own child
//! [`StaticScope`], so a name declared in a branch or loop body is gone once
//! that body has been checked.

pub mod analyzer;
pub mod config;
pub mod registry;
pub mod rules;

pub use analyzer::{Analyzer, StaticScope};
pub use config::AnalyzerConfig;
pub use registry::TypeRegistry;
pub use rules::{binary_type, is_assignable, require_assignable};
