//! Value types for the PLC interpreter.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use plc_syntax::ast::Literal;
use plc_syntax::error::{runtime_error, RuntimeResult};

use crate::numeric;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absence of a value
    Nil,
    Boolean(bool),
    /// Arbitrary-precision integer
    Integer(BigInt),
    /// Arbitrary-precision base-10 decimal that keeps its scale
    Decimal(BigDecimal),
    Character(char),
    String(String),
    /// A mutable list shared by every binding that holds it
    List(Rc<RefCell<Vec<Value>>>),
}

impl Value {
    pub fn list(values: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(values)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::Decimal(_) => "Decimal",
            Value::Character(_) => "Character",
            Value::String(_) => "String",
            Value::List(_) => "List",
        }
    }

    pub fn as_boolean(&self) -> RuntimeResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            other => runtime_error(format!("expected Boolean, received {}", other.type_name())),
        }
    }

    /// Natural ordering between two values of the same kind.
    pub fn compare(&self, other: &Value) -> RuntimeResult<Ordering> {
        Ok(match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => a.cmp(b),
            (Value::Character(a), Value::Character(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (a, b) => {
                return runtime_error(format!(
                    "cannot compare {} with {}",
                    a.type_name(),
                    b.type_name()
                ))
            }
        })
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Nil => Value::Nil,
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Character(c) => Value::Character(*c),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Integer(n) => Value::Integer(n.clone()),
            Literal::Decimal(d) => Value::Decimal(d.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Decimal(d) => f.write_str(&numeric::plain_string(d)),
            Value::Character(c) => write!(f, "{}", c),
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) => write_list(f, items, &mut Vec::new()),
        }
    }
}

/// Writes `[a, b]`. A list nested inside itself is written `(this list)`.
fn write_list(
    f: &mut fmt::Formatter<'_>,
    list: &Rc<RefCell<Vec<Value>>>,
    open: &mut Vec<Rc<RefCell<Vec<Value>>>>,
) -> fmt::Result {
    open.push(Rc::clone(list));
    write!(f, "[")?;
    for (i, item) in list.borrow().iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        match item {
            Value::List(inner) if open.iter().any(|o| Rc::ptr_eq(o, inner)) => {
                write!(f, "(this list)")?
            }
            Value::List(inner) => write_list(f, inner, open)?,
            other => write!(f, "{}", other)?,
        }
    }
    open.pop();
    write!(f, "]")
}
