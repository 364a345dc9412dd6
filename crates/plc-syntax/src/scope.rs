//! Chained symbol tables.
//!
//! A [`Scope`] maps variable names to `V` and `(name, arity)` pairs to `F`,
//! with a borrowed link to its parent. The analyzer instantiates it with
//! static bindings (types and signatures) and the interpreter with runtime
//! bindings (value cells and callables); lookup is identical for both.
//!
//! A child borrows its parent, so the borrow checker guarantees that a block's
//! scope is gone before control leaves the block that created it.

use std::collections::HashMap;

#[derive(Debug)]
pub struct Scope<'p, V, F> {
    variables: HashMap<String, V>,
    functions: HashMap<(String, usize), F>,
    parent: Option<&'p Scope<'p, V, F>>,
}

impl<V, F> Default for Scope<'_, V, F> {
    fn default() -> Self {
        Self::root()
    }
}

impl<'p, V, F> Scope<'p, V, F> {
    pub fn root() -> Self {
        Self {
            variables: HashMap::new(),
            functions: HashMap::new(),
            parent: None,
        }
    }

    /// A fresh, empty scope whose lookups fall back to `self`.
    pub fn child(&self) -> Scope<'_, V, F> {
        Scope {
            variables: HashMap::new(),
            functions: HashMap::new(),
            parent: Some(self),
        }
    }

    /// Number of ancestors; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.parent.map_or(0, |p| p.depth() + 1)
    }

    /// Binds `name` in this scope. Returns `false` and leaves the scope
    /// untouched if the name is already bound here.
    pub fn define_variable(&mut self, name: impl Into<String>, binding: V) -> bool {
        let name = name.into();
        if self.variables.contains_key(&name) {
            return false;
        }
        self.variables.insert(name, binding);
        true
    }

    /// Binds `(name, arity)` in this scope. Returns `false` if that pair is
    /// already bound here.
    pub fn define_function(&mut self, name: impl Into<String>, arity: usize, binding: F) -> bool {
        let key = (name.into(), arity);
        if self.functions.contains_key(&key) {
            return false;
        }
        self.functions.insert(key, binding);
        true
    }

    /// Innermost binding of `name`, walking outward.
    pub fn lookup_variable(&self, name: &str) -> Option<&V> {
        match self.variables.get(name) {
            Some(binding) => Some(binding),
            None => self.parent.and_then(|p| p.lookup_variable(name)),
        }
    }

    /// Innermost binding of `(name, arity)` together with the scope that holds
    /// it, which is the scope a function value closes over.
    pub fn lookup_function(&self, name: &str, arity: usize) -> Option<(&F, &Self)> {
        match self.functions.get(&(name.to_string(), arity)) {
            Some(binding) => Some((binding, self)),
            None => self.parent.and_then(|p| p.lookup_function(name, arity)),
        }
    }

    /// Binding of `name` in this scope only.
    pub fn local_variable(&self, name: &str) -> Option<&V> {
        self.variables.get(name)
    }

    /// Mutable binding of `(name, arity)` in this scope only.
    pub fn local_function_mut(&mut self, name: &str, arity: usize) -> Option<&mut F> {
        self.functions.get_mut(&(name.to_string(), arity))
    }
}
