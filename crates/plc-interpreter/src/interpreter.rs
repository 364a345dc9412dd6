//! Main interpreter engine and builtins.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::io::{self, Stdout, Write};
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use plc_syntax::ast::*;
use plc_syntax::error::{runtime_error, RuntimeError, RuntimeResult};
use tracing::{debug, trace};

use crate::config::InterpreterConfig;
use crate::env::{Builtin, Callable, RuntimeScope, Variable};
use crate::flow::Flow;
use crate::numeric;
use crate::value::Value;

/// Native stack that must remain before evaluation recurses further.
const RED_ZONE: usize = 64 * 1024;
/// Size of each stack segment allocated once the red zone is reached.
const STACK_SEGMENT: usize = 1024 * 1024;

pub struct Interpreter<W: Write = Stdout> {
    config: InterpreterConfig,
    /// Sink for `print`
    output: RefCell<W>,
    /// Nested user function calls currently active
    depth: Cell<usize>,
}

impl Default for Interpreter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter<Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(output: W) -> Self {
        Self::with_config(output, InterpreterConfig::default())
    }

    pub fn with_config(output: W, config: InterpreterConfig) -> Self {
        Self {
            config,
            output: RefCell::new(output),
            depth: Cell::new(0),
        }
    }

    pub fn into_output(self) -> W {
        self.output.into_inner()
    }

    /// A global scope holding only the built-in `print`.
    pub fn root_scope<'s>(&self) -> RuntimeScope<'static, 's> {
        let mut scope = RuntimeScope::root();
        scope.define_function("print", 1, Callable::Builtin(Builtin::Print));
        scope
    }

    /// Binds every function, evaluates the globals in order and returns the
    /// Integer produced by `main()`.
    #[tracing::instrument(skip_all)]
    pub fn run(&self, source: &Source) -> RuntimeResult<BigInt> {
        let mut global = self.root_scope();
        for function in &source.functions {
            if !global.define_function(function.name.clone(), function.arity(), Callable::User(function)) {
                return runtime_error(format!(
                    "function {}/{} is already defined",
                    function.name,
                    function.arity()
                ));
            }
        }
        for item in &source.globals {
            let value = match &item.value {
                Some(value) => self.evaluate(&global, value)?,
                None => Value::Nil,
            };
            self.define(&mut global, &item.name, Variable::new(item.mutable, value))?;
        }
        debug!(
            globals = source.globals.len(),
            functions = source.functions.len(),
            "starting main"
        );
        match self.call(&global, "main", Vec::new())? {
            Value::Integer(n) => Ok(n),
            other => runtime_error(format!(
                "main must return an Integer, received {}",
                other.type_name()
            )),
        }
    }

    /// Invokes the function bound to `(name, arguments.len())` as seen from `scope`.
    pub fn call(&self, scope: &RuntimeScope<'_, '_>, name: &str, arguments: Vec<Value>) -> RuntimeResult<Value> {
        let Some((callable, home)) = scope.lookup_function(name, arguments.len()) else {
            return runtime_error(format!("undefined function {}/{}", name, arguments.len()));
        };
        trace!(function = name, arity = arguments.len(), "call");
        match *callable {
            Callable::Builtin(builtin) => self.call_builtin(builtin, arguments),
            Callable::User(function) => {
                let depth = self.depth.get();
                if depth >= self.config.max_call_depth {
                    return runtime_error(format!(
                        "maximum call depth of {} exceeded calling {}",
                        self.config.max_call_depth, name
                    ));
                }
                self.depth.set(depth + 1);
                let result = self.invoke(home, function, arguments);
                self.depth.set(depth);
                result
            }
        }
    }

    fn invoke(&self, home: &RuntimeScope<'_, '_>, function: &Function, arguments: Vec<Value>) -> RuntimeResult<Value> {
        let mut scope = home.child();
        for (parameter, value) in function.parameters.iter().zip(arguments) {
            self.define(&mut scope, &parameter.name, Variable::new(true, value))?;
        }
        match self.execute_statements(&mut scope, &function.body)? {
            Flow::Return(value) => Ok(value),
            Flow::Completed => Ok(Value::Nil),
        }
    }

    fn call_builtin(&self, builtin: Builtin, arguments: Vec<Value>) -> RuntimeResult<Value> {
        match builtin {
            Builtin::Print => {
                let mut output = self.output.borrow_mut();
                for value in &arguments {
                    writeln!(output, "{}", value)
                        .map_err(|e| RuntimeError::new(format!("print failed: {}", e)))?;
                }
                Ok(Value::Nil)
            }
        }
    }

    fn execute_block(&self, scope: &RuntimeScope<'_, '_>, body: &[Statement]) -> RuntimeResult<Flow> {
        let mut child = scope.child();
        self.execute_statements(&mut child, body)
    }

    fn execute_statements(&self, scope: &mut RuntimeScope<'_, '_>, body: &[Statement]) -> RuntimeResult<Flow> {
        for statement in body {
            if let Flow::Return(value) = self.execute(scope, statement)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Completed)
    }

    fn execute(&self, scope: &mut RuntimeScope<'_, '_>, statement: &Statement) -> RuntimeResult<Flow> {
        stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || self.execute_statement(scope, statement))
    }

    fn execute_statement(&self, scope: &mut RuntimeScope<'_, '_>, statement: &Statement) -> RuntimeResult<Flow> {
        match statement {
            Statement::Expression(expression) => {
                self.evaluate(scope, expression)?;
            }
            Statement::Declaration { name, value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(scope, value)?,
                    None => Value::Nil,
                };
                self.define(scope, name, Variable::new(true, value))?;
            }
            Statement::Assignment { receiver, value } => self.assign(scope, receiver, value)?,
            Statement::If {
                condition,
                then_body,
                else_body,
            } => {
                let branch = if self.evaluate(scope, condition)?.as_boolean()? {
                    then_body
                } else {
                    else_body
                };
                return self.execute_block(scope, branch);
            }
            Statement::Switch { condition, cases } => {
                let selector = self.evaluate(scope, condition)?;
                for case in cases {
                    let selected = match &case.value {
                        Some(value) => selector.compare(&self.evaluate(scope, value)?)? == Ordering::Equal,
                        None => true,
                    };
                    if selected {
                        return self.execute_block(scope, &case.body);
                    }
                }
            }
            Statement::While { condition, body } => {
                while self.evaluate(scope, condition)?.as_boolean()? {
                    if let Flow::Return(value) = self.execute_block(scope, body)? {
                        return Ok(Flow::Return(value));
                    }
                }
            }
            Statement::Return(value) => return Ok(Flow::Return(self.evaluate(scope, value)?)),
        }
        Ok(Flow::Completed)
    }

    fn assign(&self, scope: &RuntimeScope<'_, '_>, receiver: &Expression, value: &Expression) -> RuntimeResult<()> {
        let ExpressionKind::Access { name, index, .. } = &receiver.kind else {
            return runtime_error("assignment receiver must be a variable access");
        };
        let variable = lookup(scope, name)?;
        if !variable.is_mutable() {
            return runtime_error(format!("cannot assign to immutable variable '{}'", name));
        }
        match index {
            None => {
                let value = self.evaluate(scope, value)?;
                variable.set(value);
                Ok(())
            }
            Some(index) => {
                let items = list_items(name, variable.get())?;
                let position = self.evaluate(scope, index)?;
                let value = self.evaluate(scope, value)?;
                let slot = checked_index(name, &position, items.borrow().len())?;
                items.borrow_mut()[slot] = value;
                Ok(())
            }
        }
    }

    /// Evaluates `expression` in `scope`. Annotations are not required.
    ///
    /// Deep recursion grows the native stack on demand, so nesting is bounded
    /// by [`InterpreterConfig::max_call_depth`] rather than the thread's stack.
    pub fn evaluate(&self, scope: &RuntimeScope<'_, '_>, expression: &Expression) -> RuntimeResult<Value> {
        stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || self.evaluate_expression(scope, expression))
    }

    fn evaluate_expression(&self, scope: &RuntimeScope<'_, '_>, expression: &Expression) -> RuntimeResult<Value> {
        match &expression.kind {
            ExpressionKind::Literal(literal) => Ok(Value::from(literal)),
            ExpressionKind::Group(inner) => self.evaluate(scope, inner),
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => self.binary(scope, *operator, left, right),
            ExpressionKind::Access { name, index, .. } => {
                let value = lookup(scope, name)?.get();
                let Some(index) = index else {
                    return Ok(value);
                };
                let items = list_items(name, value)?;
                let position = self.evaluate(scope, index)?;
                let borrowed = items.borrow();
                let slot = checked_index(name, &position, borrowed.len())?;
                Ok(borrowed[slot].clone())
            }
            ExpressionKind::Call { name, arguments, .. } => {
                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate(scope, argument)?);
                }
                self.call(scope, name, values)
            }
            ExpressionKind::List(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.evaluate(scope, element)?);
                }
                Ok(Value::list(values))
            }
        }
    }

    /// `left operator right`. The right operand of `&&` and `||` is only
    /// evaluated when the left one does not decide the result.
    fn binary(
        &self,
        scope: &RuntimeScope<'_, '_>,
        operator: BinaryOp,
        left: &Expression,
        right: &Expression,
    ) -> RuntimeResult<Value> {
        let l = self.evaluate(scope, left)?;
        let r = || self.evaluate(scope, right);
        match operator {
            BinaryOp::And => Ok(Value::Boolean(l.as_boolean()? && r()?.as_boolean()?)),
            BinaryOp::Or => Ok(Value::Boolean(l.as_boolean()? || r()?.as_boolean()?)),
            BinaryOp::Less => Ok(Value::Boolean(l.compare(&r()?)? == Ordering::Less)),
            BinaryOp::Greater => Ok(Value::Boolean(l.compare(&r()?)? == Ordering::Greater)),
            BinaryOp::Equal => Ok(Value::Boolean(l.compare(&r()?)? == Ordering::Equal)),
            BinaryOp::NotEqual => Ok(Value::Boolean(l.compare(&r()?)? != Ordering::Equal)),
            BinaryOp::Add => match (l, r()?) {
                (l @ Value::String(_), r) | (l, r @ Value::String(_)) => {
                    Ok(Value::String(format!("{}{}", l, r)))
                }
                (Value::Integer(x), Value::Integer(y)) => Ok(Value::Integer(x + y)),
                (Value::Decimal(x), Value::Decimal(y)) => Ok(Value::Decimal(x + y)),
                (x, y) => mismatch("add", &x, &y),
            },
            BinaryOp::Subtract => match (l, r()?) {
                (Value::Integer(x), Value::Integer(y)) => Ok(Value::Integer(x - y)),
                (Value::Decimal(x), Value::Decimal(y)) => Ok(Value::Decimal(x - y)),
                (x, y) => mismatch("subtract", &x, &y),
            },
            BinaryOp::Multiply => match (l, r()?) {
                (Value::Integer(x), Value::Integer(y)) => Ok(Value::Integer(x * y)),
                (Value::Decimal(x), Value::Decimal(y)) => Ok(Value::Decimal(x * y)),
                (x, y) => mismatch("multiply", &x, &y),
            },
            BinaryOp::Divide => match (l, r()?) {
                (Value::Integer(x), Value::Integer(y)) => {
                    numeric::divide_integer(&x, &y).map(Value::Integer)
                }
                (Value::Decimal(x), Value::Decimal(y)) => {
                    numeric::divide_decimal(&x, &y).map(Value::Decimal)
                }
                (x, y) => mismatch("divide", &x, &y),
            },
            BinaryOp::Power => match (l, r()?) {
                (Value::Integer(x), Value::Integer(n)) => {
                    numeric::integer_power(&x, &n, self.config.negative_exponent).map(Value::Integer)
                }
                (Value::Decimal(x), Value::Integer(n)) => {
                    numeric::decimal_power(&x, &n).map(Value::Decimal)
                }
                (x, y) => mismatch("raise", &x, &y),
            },
        }
    }

    fn define(&self, scope: &mut RuntimeScope<'_, '_>, name: &str, variable: Variable) -> RuntimeResult<()> {
        if scope.define_variable(name, variable) {
            Ok(())
        } else {
            runtime_error(format!("variable '{}' is already defined in this scope", name))
        }
    }
}

fn lookup<'a>(scope: &'a RuntimeScope<'_, '_>, name: &str) -> RuntimeResult<&'a Variable> {
    scope
        .lookup_variable(name)
        .ok_or_else(|| RuntimeError::new(format!("undeclared identifier '{}'", name)))
}

fn list_items(name: &str, value: Value) -> RuntimeResult<Rc<RefCell<Vec<Value>>>> {
    match value {
        Value::List(items) => Ok(items),
        other => runtime_error(format!("cannot index '{}' holding {}", name, other.type_name())),
    }
}

fn checked_index(name: &str, position: &Value, len: usize) -> RuntimeResult<usize> {
    let Value::Integer(position) = position else {
        return runtime_error(format!("index must be an Integer, received {}", position.type_name()));
    };
    match position.to_usize() {
        Some(slot) if slot < len => Ok(slot),
        _ => runtime_error(format!(
            "index {} out of range for '{}' of length {}",
            position, name, len
        )),
    }
}

fn mismatch<T>(action: &str, left: &Value, right: &Value) -> RuntimeResult<T> {
    runtime_error(format!(
        "cannot {} {} and {}",
        action,
        left.type_name(),
        right.type_name()
    ))
}
