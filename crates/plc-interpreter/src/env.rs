//! Runtime bindings held by the interpreter's scope chain.

use std::cell::RefCell;

use plc_syntax::ast::Function;
use plc_syntax::Scope;

use crate::value::Value;

/// Runtime scope: variables and callables keyed by name and arity.
pub type RuntimeScope<'p, 's> = Scope<'p, Variable, Callable<'s>>;

/// A named value cell. Scopes are shared immutably down the chain, so the
/// cell itself carries the mutability.
#[derive(Debug)]
pub struct Variable {
    mutable: bool,
    value: RefCell<Value>,
}

impl Variable {
    pub fn new(mutable: bool, value: Value) -> Self {
        Self {
            mutable,
            value: RefCell::new(value),
        }
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    pub fn get(&self) -> Value {
        self.value.borrow().clone()
    }

    /// Replaces the held value. Callers check [`Variable::is_mutable`].
    pub(crate) fn set(&self, value: Value) {
        *self.value.borrow_mut() = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `print(Any) -> Nil`
    Print,
}

/// Something a call expression can invoke.
#[derive(Debug, Clone, Copy)]
pub enum Callable<'s> {
    /// A function from the program, closing over the scope it is bound in
    User(&'s Function),
    Builtin(Builtin),
}
