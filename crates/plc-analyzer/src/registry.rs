//! Type name resolution.

use std::collections::HashMap;

use plc_syntax::error::{type_error, TypeResult};
use plc_syntax::Type;

/// Maps type names written in source to [`Type`]s. Owned by one analyzer.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, Type>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// A registry holding the eight built-in type names.
    pub fn new() -> Self {
        let types = Type::NAMED
            .iter()
            .map(|ty| (ty.name().to_string(), *ty))
            .collect();
        Self { types }
    }

    /// Adds an alias, returning the type it previously named, if any.
    pub fn register(&mut self, name: impl Into<String>, ty: Type) -> Option<Type> {
        self.types.insert(name.into(), ty)
    }

    pub fn get(&self, name: &str) -> Option<Type> {
        self.types.get(name).copied()
    }

    pub fn resolve(&self, name: &str) -> TypeResult<Type> {
        match self.get(name) {
            Some(ty) => Ok(ty),
            None => type_error(format!("unknown type '{}'", name)),
        }
    }
}
