//! AST (abstract syntax tree) types for PLC programs.
//!
//! The tree is built once by the parser and is structurally immutable after
//! that. The analyzer fills in the annotation slots (`ty` on every
//! [`Expression`], `binding` on accesses, calls, globals and declarations,
//! `signature` on functions); the interpreter and any backend read them.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::types::Type;

/// Root of a program: globals first, then functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub globals: Vec<Global>,
    pub functions: Vec<Function>,
}

/// A `LIST`, `VAR` or `VAL` declaration at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Global {
    pub name: String,
    pub type_name: Option<String>,
    pub mutable: bool,
    pub value: Option<Expression>,
    /// Filled by the analyzer
    pub binding: Option<VariableBinding>,
}

/// Function parameter; the type name is mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
}

/// Function definition. Functions are identified by name and arity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type_name: Option<String>,
    pub body: Vec<Statement>,
    /// Filled by the analyzer
    pub signature: Option<FunctionBinding>,
}

impl Function {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// Statements inside function bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// A call evaluated for its side effects: `print(x);`
    Expression(Expression),
    Declaration {
        name: String,
        type_name: Option<String>,
        value: Option<Expression>,
        binding: Option<VariableBinding>,
    },
    /// `receiver = value;` where the receiver is an access expression
    Assignment {
        receiver: Expression,
        value: Expression,
    },
    If {
        condition: Expression,
        then_body: Vec<Statement>,
        else_body: Vec<Statement>,
    },
    /// The last case is the default and carries no value.
    Switch {
        condition: Expression,
        cases: Vec<Case>,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    Return(Expression),
}

/// One arm of a switch; `value` is `None` only for the trailing default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub value: Option<Expression>,
    pub body: Vec<Statement>,
}

/// An expression together with its analyzer-resolved type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    /// Filled by the analyzer
    pub ty: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    Literal(Literal),
    Group(Box<Expression>),
    Binary {
        operator: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// A variable read, optionally indexed: `x`, `xs[i]`
    Access {
        name: String,
        index: Option<Box<Expression>>,
        binding: Option<VariableBinding>,
    },
    Call {
        name: String,
        arguments: Vec<Expression>,
        binding: Option<FunctionBinding>,
    },
    List(Vec<Expression>),
}

/// Literal values as written in source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Nil,
    Boolean(bool),
    Character(char),
    String(String),
    Integer(BigInt),
    Decimal(BigDecimal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    And,
    Or,
    Less,
    Greater,
    Equal,
    NotEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<BinaryOp> {
        Some(match symbol {
            "&&" => BinaryOp::And,
            "||" => BinaryOp::Or,
            "<" => BinaryOp::Less,
            ">" => BinaryOp::Greater,
            "==" => BinaryOp::Equal,
            "!=" => BinaryOp::NotEqual,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "^" => BinaryOp::Power,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Power => "^",
        }
    }
}

/// Resolved variable binding recorded on the AST by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableBinding {
    pub name: String,
    pub ty: Type,
    /// Element type when the variable holds a list
    pub element: Option<Type>,
    pub mutable: bool,
}

/// Resolved function signature recorded on the AST by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionBinding {
    pub name: String,
    pub parameters: Vec<Type>,
    pub returns: Type,
}

impl Expression {
    pub fn new(kind: ExpressionKind) -> Self {
        Self { kind, ty: None }
    }

    pub fn literal(literal: Literal) -> Self {
        Self::new(ExpressionKind::Literal(literal))
    }

    pub fn group(inner: Expression) -> Self {
        Self::new(ExpressionKind::Group(Box::new(inner)))
    }

    pub fn binary(operator: BinaryOp, left: Expression, right: Expression) -> Self {
        Self::new(ExpressionKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn access(name: impl Into<String>, index: Option<Expression>) -> Self {
        Self::new(ExpressionKind::Access {
            name: name.into(),
            index: index.map(Box::new),
            binding: None,
        })
    }

    pub fn call(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self::new(ExpressionKind::Call {
            name: name.into(),
            arguments,
            binding: None,
        })
    }

    pub fn list(values: Vec<Expression>) -> Self {
        Self::new(ExpressionKind::List(values))
    }

    pub fn is_call(&self) -> bool {
        matches!(self.kind, ExpressionKind::Call { .. })
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Integer(BigInt::from(n))
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}

impl From<char> for Literal {
    fn from(c: char) -> Self {
        Literal::Character(c)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}
