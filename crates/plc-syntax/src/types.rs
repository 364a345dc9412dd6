//! The closed set of static types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Static types known to the analyzer.
///
/// `Any` accepts every other type and `Comparable` accepts exactly the
/// ordered scalar types. `List` is never written by users; it is the type of
/// a `LIST` global and of list literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Nil,
    Boolean,
    Integer,
    Decimal,
    Character,
    String,
    Any,
    Comparable,
    List,
}

impl Type {
    /// The eight types a program can name, in declaration order.
    pub const NAMED: [Type; 8] = [
        Type::Nil,
        Type::Boolean,
        Type::Integer,
        Type::Decimal,
        Type::Character,
        Type::String,
        Type::Any,
        Type::Comparable,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Type::Nil => "Nil",
            Type::Boolean => "Boolean",
            Type::Integer => "Integer",
            Type::Decimal => "Decimal",
            Type::Character => "Character",
            Type::String => "String",
            Type::Any => "Any",
            Type::Comparable => "Comparable",
            Type::List => "List",
        }
    }

    /// Whether values of this type have a natural ordering.
    pub fn is_comparable(self) -> bool {
        matches!(
            self,
            Type::Integer | Type::Decimal | Type::Character | Type::String
        )
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Integer | Type::Decimal)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
