//! Name resolution and type checking over the AST.

use num_traits::ToPrimitive;
use plc_syntax::ast::*;
use plc_syntax::error::{type_error, type_mismatch, TypeResult};
use plc_syntax::{Scope, Type};
use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::registry::TypeRegistry;
use crate::rules::{binary_type, require_assignable};

/// Static scope: variable bindings and function signatures.
pub type StaticScope<'p> = Scope<'p, VariableBinding, FunctionBinding>;

/// Return type bookkeeping for the function whose body is being analyzed.
#[derive(Debug)]
struct FunctionContext {
    /// Declared type, or the type fixed by the first `return` when inferring
    returns: Option<Type>,
}

pub struct Analyzer {
    registry: TypeRegistry,
    config: AnalyzerConfig,
    function: Option<FunctionContext>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self {
            registry: TypeRegistry::new(),
            config,
            function: None,
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    /// A global scope holding only the built-in `print(Any) -> Nil`.
    pub fn root_scope(&self) -> StaticScope<'static> {
        let mut scope = StaticScope::root();
        scope.define_function(
            "print",
            1,
            FunctionBinding {
                name: "print".to_string(),
                parameters: vec![Type::Any],
                returns: Type::Nil,
            },
        );
        scope
    }

    /// Resolves every name and type in `source`, filling in the annotation
    /// slots. Fails on the first error.
    #[tracing::instrument(skip_all)]
    pub fn analyze(&mut self, source: &mut Source) -> TypeResult<()> {
        let mut global = self.root_scope();

        for function in &mut source.functions {
            self.register_function(&mut global, function)?;
        }
        for item in &mut source.globals {
            self.analyze_global(&mut global, item)?;
        }
        for function in &mut source.functions {
            self.analyze_function(&mut global, function)?;
        }

        match global.lookup_function("main", 0) {
            Some((main, _)) if main.returns == Type::Integer => {}
            Some((main, _)) => return type_mismatch(Type::Integer, main.returns),
            None => return type_error("missing entry point main/0"),
        }
        debug!(
            globals = source.globals.len(),
            functions = source.functions.len(),
            "analysis complete"
        );
        Ok(())
    }

    /// Binds the signature of `function` in `scope` without looking at its
    /// body. Without a declared return type the signature returns `Any` until
    /// [`Analyzer::analyze_function`] infers it.
    pub fn register_function(
        &mut self,
        scope: &mut StaticScope<'_>,
        function: &mut Function,
    ) -> TypeResult<()> {
        let parameters = function
            .parameters
            .iter()
            .map(|p| self.registry.resolve(&p.type_name))
            .collect::<TypeResult<Vec<_>>>()?;
        let returns = match &function.return_type_name {
            Some(name) => self.registry.resolve(name)?,
            None => Type::Any,
        };
        let signature = FunctionBinding {
            name: function.name.clone(),
            parameters,
            returns,
        };
        if !scope.define_function(function.name.clone(), function.arity(), signature.clone()) {
            return type_error(format!(
                "function {}/{} is already defined",
                function.name,
                function.arity()
            ));
        }
        debug!(name = %function.name, arity = function.arity(), "registered function");
        function.signature = Some(signature);
        Ok(())
    }

    pub fn analyze_global(&mut self, scope: &mut StaticScope<'_>, global: &mut Global) -> TypeResult<()> {
        let declared = self.resolve_optional(global.type_name.as_deref())?;
        let (ty, element) = match &mut global.value {
            Some(value) if matches!(value.kind, ExpressionKind::List(_)) => {
                self.analyze_expression(scope, value)?;
                let element = declared.unwrap_or(Type::Any);
                if let ExpressionKind::List(values) = &value.kind {
                    check_elements(values, element)?;
                }
                (Type::List, Some(element))
            }
            Some(value) => {
                let received = self.analyze_expression(scope, value)?;
                let ty = match declared {
                    Some(ty) => {
                        require_assignable(ty, received)?;
                        ty
                    }
                    None => received,
                };
                (ty, element_of(value))
            }
            None => match declared {
                Some(ty) => (ty, None),
                None => {
                    return type_error(format!(
                        "global '{}' needs a type or an initial value",
                        global.name
                    ))
                }
            },
        };
        let binding = VariableBinding {
            name: global.name.clone(),
            ty,
            element,
            mutable: global.mutable,
        };
        self.define(scope, binding.clone())?;
        debug!(name = %global.name, ty = %ty, "registered global");
        global.binding = Some(binding);
        Ok(())
    }

    /// Checks the body of a function registered in `scope`. A function
    /// without a declared return type gets the type of its first `return`,
    /// or `Nil` if it never returns a value.
    pub fn analyze_function(
        &mut self,
        scope: &mut StaticScope<'_>,
        function: &mut Function,
    ) -> TypeResult<()> {
        let Some(signature) = function.signature.clone() else {
            return type_error(format!(
                "function {}/{} has not been registered",
                function.name,
                function.arity()
            ));
        };
        let declared = function.return_type_name.is_some();
        let enclosing = self.function.replace(FunctionContext {
            returns: declared.then_some(signature.returns),
        });

        let result = {
            let mut body_scope = scope.child();
            self.analyze_body(&mut body_scope, function, &signature)
        };
        let context = std::mem::replace(&mut self.function, enclosing);
        result?;

        if !declared {
            let returns = context.and_then(|c| c.returns).unwrap_or(Type::Nil);
            if let Some(binding) = scope.local_function_mut(&function.name, function.arity()) {
                binding.returns = returns;
            }
            if let Some(signature) = &mut function.signature {
                signature.returns = returns;
            }
            debug!(name = %function.name, returns = %returns, "inferred return type");
        }
        Ok(())
    }

    fn analyze_body(
        &mut self,
        scope: &mut StaticScope<'_>,
        function: &mut Function,
        signature: &FunctionBinding,
    ) -> TypeResult<()> {
        for (parameter, ty) in function.parameters.iter().zip(&signature.parameters) {
            self.define(
                scope,
                VariableBinding {
                    name: parameter.name.clone(),
                    ty: *ty,
                    element: None,
                    mutable: true,
                },
            )?;
        }
        for statement in &mut function.body {
            self.analyze_statement(scope, statement)?;
        }
        Ok(())
    }

    fn analyze_block(&mut self, scope: &StaticScope<'_>, body: &mut [Statement]) -> TypeResult<()> {
        let mut child = scope.child();
        for statement in body {
            self.analyze_statement(&mut child, statement)?;
        }
        Ok(())
    }

    pub fn analyze_statement(
        &mut self,
        scope: &mut StaticScope<'_>,
        statement: &mut Statement,
    ) -> TypeResult<()> {
        match statement {
            Statement::Expression(expression) => {
                if !expression.is_call() {
                    return type_error("expression statement must be a function call");
                }
                self.analyze_expression(scope, expression)?;
                Ok(())
            }
            Statement::Declaration {
                name,
                type_name,
                value,
                binding,
            } => {
                let declared = self.resolve_optional(type_name.as_deref())?;
                let (ty, element) = match (declared, value) {
                    (None, None) => {
                        return type_error(format!(
                            "declaration of '{}' needs a type or an initial value",
                            name
                        ))
                    }
                    (Some(ty), None) => (ty, None),
                    (declared, Some(value)) => {
                        let received = self.analyze_expression(scope, value)?;
                        if let Some(ty) = declared {
                            require_assignable(ty, received)?;
                        }
                        (declared.unwrap_or(received), element_of(value))
                    }
                };
                let resolved = VariableBinding {
                    name: name.clone(),
                    ty,
                    element,
                    mutable: true,
                };
                self.define(scope, resolved.clone())?;
                *binding = Some(resolved);
                Ok(())
            }
            Statement::Assignment { receiver, value } => {
                if !matches!(receiver.kind, ExpressionKind::Access { .. }) {
                    return type_error("assignment receiver must be a variable access");
                }
                let target = self.analyze_expression(scope, receiver)?;
                let received = self.analyze_expression(scope, value)?;
                require_assignable(target, received)
            }
            Statement::If {
                condition,
                then_body,
                else_body,
            } => {
                self.require_condition(scope, condition)?;
                self.analyze_block(scope, then_body)?;
                self.analyze_block(scope, else_body)
            }
            Statement::Switch { condition, cases } => {
                let ty = self.analyze_expression(scope, condition)?;
                let last = cases.len().checked_sub(1);
                if last.is_none() {
                    return type_error("switch requires a default case");
                }
                for (i, case) in cases.iter_mut().enumerate() {
                    match (&mut case.value, Some(i) == last) {
                        (Some(_), true) => return type_error("default case must not have a value"),
                        (None, false) => return type_error("switch is missing its default case"),
                        (Some(value), false) => {
                            let received = self.analyze_expression(scope, value)?;
                            require_assignable(ty, received)?;
                        }
                        (None, true) => {}
                    }
                    self.analyze_block(scope, &mut case.body)?;
                }
                Ok(())
            }
            Statement::While { condition, body } => {
                self.require_condition(scope, condition)?;
                self.analyze_block(scope, body)
            }
            Statement::Return(value) => {
                let received = self.analyze_expression(scope, value)?;
                match &mut self.function {
                    Some(FunctionContext {
                        returns: Some(expected),
                    }) => require_assignable(*expected, received),
                    Some(context) => {
                        context.returns = Some(received);
                        Ok(())
                    }
                    None => type_error("return outside of a function"),
                }
            }
        }
    }

    /// Resolves and records the type of `expression` and everything under it.
    pub fn analyze_expression(
        &mut self,
        scope: &StaticScope<'_>,
        expression: &mut Expression,
    ) -> TypeResult<Type> {
        let ty = match &mut expression.kind {
            ExpressionKind::Literal(literal) => literal_type(literal)?,
            ExpressionKind::Group(inner) => {
                if self.config.strict_groups && !matches!(inner.kind, ExpressionKind::Binary { .. }) {
                    return type_error("only binary expressions may be parenthesized");
                }
                self.analyze_expression(scope, inner)?
            }
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => {
                let left = self.analyze_expression(scope, left)?;
                let right = self.analyze_expression(scope, right)?;
                binary_type(*operator, left, right)?
            }
            ExpressionKind::Access {
                name,
                index,
                binding,
            } => {
                let Some(found) = scope.lookup_variable(name).cloned() else {
                    return type_error(format!("undeclared identifier '{}'", name));
                };
                let ty = match index {
                    None => found.ty,
                    Some(index) => {
                        let index_ty = self.analyze_expression(scope, index)?;
                        if index_ty != Type::Integer {
                            return type_mismatch(Type::Integer, index_ty);
                        }
                        match found.ty {
                            Type::List => found.element.unwrap_or(Type::Any),
                            Type::Any => Type::Any,
                            other => {
                                return type_error(format!(
                                    "cannot index '{}' of type {}",
                                    name, other
                                ))
                            }
                        }
                    }
                };
                *binding = Some(found);
                ty
            }
            ExpressionKind::Call {
                name,
                arguments,
                binding,
            } => {
                let Some((signature, _)) = scope.lookup_function(name, arguments.len()) else {
                    return type_error(format!(
                        "undefined function {}/{}",
                        name,
                        arguments.len()
                    ));
                };
                let signature = signature.clone();
                for (argument, expected) in arguments.iter_mut().zip(&signature.parameters) {
                    let received = self.analyze_expression(scope, argument)?;
                    require_assignable(*expected, received)?;
                }
                let returns = signature.returns;
                *binding = Some(signature);
                returns
            }
            ExpressionKind::List(values) => {
                for value in values.iter_mut() {
                    self.analyze_expression(scope, value)?;
                }
                Type::List
            }
        };
        expression.ty = Some(ty);
        Ok(ty)
    }

    fn require_condition(&mut self, scope: &StaticScope<'_>, condition: &mut Expression) -> TypeResult<()> {
        let ty = self.analyze_expression(scope, condition)?;
        if ty == Type::Boolean {
            Ok(())
        } else {
            type_mismatch(Type::Boolean, ty)
        }
    }

    fn resolve_optional(&self, name: Option<&str>) -> TypeResult<Option<Type>> {
        name.map(|name| self.registry.resolve(name)).transpose()
    }

    fn define(&self, scope: &mut StaticScope<'_>, binding: VariableBinding) -> TypeResult<()> {
        let name = binding.name.clone();
        if scope.define_variable(name.clone(), binding) {
            Ok(())
        } else {
            type_error(format!("variable '{}' is already defined in this scope", name))
        }
    }
}

fn literal_type(literal: &Literal) -> TypeResult<Type> {
    Ok(match literal {
        Literal::Nil => Type::Nil,
        Literal::Boolean(_) => Type::Boolean,
        Literal::Character(_) => Type::Character,
        Literal::String(_) => Type::String,
        Literal::Integer(n) => {
            if n.to_i32().is_none() {
                return type_error(format!("integer literal {} does not fit in 32 bits", n));
            }
            Type::Integer
        }
        Literal::Decimal(d) => {
            if !d.to_f64().is_some_and(f64::is_finite) {
                return type_error(format!("decimal literal {} is out of range", d));
            }
            Type::Decimal
        }
    })
}

/// Element type carried over when a list variable is copied by name.
fn element_of(value: &Expression) -> Option<Type> {
    match &value.kind {
        ExpressionKind::Access {
            index: None,
            binding: Some(binding),
            ..
        } => binding.element,
        _ => None,
    }
}

fn check_elements(values: &[Expression], element: Type) -> TypeResult<()> {
    if element == Type::Any {
        return Ok(());
    }
    for value in values {
        require_assignable(element, value.ty.unwrap_or(Type::Any))?;
    }
    Ok(())
}
