pub mod ast;
pub mod error;
pub mod scope;
pub mod token;
pub mod types;

pub use ast::*;
pub use error::*;
pub use scope::Scope;
pub use token::*;
pub use types::Type;
