//! Assignability and the binary operator rule table.

use plc_syntax::ast::BinaryOp;
use plc_syntax::error::{type_mismatch, TypeResult};
use plc_syntax::Type;

/// Whether a value of type `source` may be stored where `target` is expected.
pub fn is_assignable(target: Type, source: Type) -> bool {
    target == source
        || target == Type::Any
        || (target == Type::Comparable && source.is_comparable())
}

pub fn require_assignable(target: Type, source: Type) -> TypeResult<()> {
    if is_assignable(target, source) {
        Ok(())
    } else {
        type_mismatch(target, source)
    }
}

/// Result type of `left op right`.
pub fn binary_type(operator: BinaryOp, left: Type, right: Type) -> TypeResult<Type> {
    use BinaryOp::*;
    match operator {
        And | Or => {
            require_exact(Type::Boolean, left)?;
            require_exact(Type::Boolean, right)?;
            Ok(Type::Boolean)
        }
        Less | Greater | Equal | NotEqual => {
            require_assignable(Type::Comparable, left)?;
            require_assignable(Type::Comparable, right)?;
            Ok(Type::Boolean)
        }
        Add if left == Type::String || right == Type::String => Ok(Type::String),
        Add | Subtract | Multiply | Divide => same_numeric(left, right),
        Power => {
            require_numeric(left)?;
            require_exact(Type::Integer, right)?;
            Ok(left)
        }
    }
}

fn require_exact(expected: Type, received: Type) -> TypeResult<()> {
    if expected == received {
        Ok(())
    } else {
        type_mismatch(expected, received)
    }
}

fn require_numeric(ty: Type) -> TypeResult<()> {
    if ty.is_numeric() {
        Ok(())
    } else {
        type_mismatch(Type::Integer, ty)
    }
}

fn same_numeric(left: Type, right: Type) -> TypeResult<Type> {
    require_numeric(left)?;
    require_exact(left, right)?;
    Ok(left)
}
