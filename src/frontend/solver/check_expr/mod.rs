//! Solve expressions.
//!
//! This module owns the expression entrypoint (`solve_expr`) and delegates to themed submodules. Solving is
//! error-accumulating: an expression that cannot be typed reports a diagnostic and yields `Any`.
//!
//! ## Notes
//!
//! - The optional `hint` is the type the context expects. It steers inference (display item types, lambda
//!   parameter types, generic type arguments) but is never itself checked here; callers check assignability.
//!
//! ## See also
//! - [`super::check_stmt`]: statements that contain expressions

use mtots_syntax::ast::{Expr, Expression, Ident, Lambda, Operation};

use super::Solver;
use crate::frontend::ide::{CompletionPoint, ScopeFilter};
use crate::frontend::ir::{ConstValue, FunctionType, Parameter, TypeId, Variable};

mod access;
mod calls;
mod collections;

impl Solver<'_> {
    // ========================================================================
    // Expressions
    // ========================================================================

    /// Solve an expression and return its type.
    pub(super) fn solve_expr(&mut self, expression: &Expression, hint: Option<TypeId>) -> TypeId {
        let location = &expression.location;
        match &expression.node {
            Expr::Error => TypeId::ANY,
            Expr::GetVariable(identifier) => self.solve_get_variable(expression, identifier),
            Expr::SetVariable { identifier, value } => self.solve_set_variable(expression, identifier, value),
            Expr::Nil => self.types.literal(TypeId::NIL, ConstValue::Nil),
            Expr::Bool(value) => self.types.literal(TypeId::BOOL, ConstValue::Bool(*value)),
            Expr::Number(value) => self.types.literal(TypeId::NUMBER, ConstValue::Number(*value)),
            Expr::String(value) => self.types.literal(TypeId::STRING, ConstValue::String(value.clone())),
            Expr::TypeAssertion { expression, type_expr } => {
                let asserted = self.solve_type(type_expr);
                self.solve_expr(expression, Some(asserted));
                asserted
            }
            Expr::List(items) => self.solve_list(items, hint),
            Expr::FrozenList(items) => self.solve_frozen_list(items, hint),
            Expr::Tuple { items, .. } => self.solve_tuple(items, hint),
            Expr::Dict(pairs) => self.solve_dict(pairs, hint),
            Expr::FrozenDict(pairs) => self.solve_frozen_dict(pairs, hint),
            Expr::Lambda(lambda) => self.solve_lambda(lambda, hint),
            Expr::FunctionCall(call) => self.solve_function_call(location, call, hint),
            Expr::MethodCall(call) => self.solve_method_call(location, call, hint),
            Expr::GetField { owner, identifier } => self.solve_get_field(owner, identifier),
            Expr::SetField {
                owner,
                identifier,
                value,
            } => self.solve_set_field(owner, identifier, value),
            Expr::Dot(dot) => self.solve_dot(dot),
            Expr::Operation(operation) => self.solve_operation(operation, hint),
            Expr::Raise(exception) => {
                self.solve_expr(exception, None);
                TypeId::NEVER
            }
        }
    }

    // ========================================================================
    // Variables
    // ========================================================================

    fn solve_get_variable(&mut self, expression: &Expression, identifier: &Ident) -> TypeId {
        self.push_completion_point(CompletionPoint::scope(
            identifier.location.clone(),
            self.scopes.current(),
            ScopeFilter::Default,
        ));
        match self.scopes.lookup(&identifier.name).cloned() {
            Some(variable) => {
                self.declare_usage(identifier, &variable);
                variable.type_id
            }
            None => {
                self.variable_not_found(expression, identifier);
                TypeId::ANY
            }
        }
    }

    fn solve_set_variable(&mut self, expression: &Expression, identifier: &Ident, value: &Expression) -> TypeId {
        let Some(variable) = self.scopes.lookup(&identifier.name).cloned() else {
            self.variable_not_found(expression, identifier);
            self.solve_expr(value, None);
            return TypeId::ANY;
        };
        self.solve_expr(value, Some(variable.type_id));
        self.declare_usage(identifier, &variable);
        if variable.is_final {
            self.error(
                &expression.location,
                format!("Assign to final variable \"{}\"", identifier.name),
            );
        }
        variable.type_id
    }

    fn variable_not_found(&mut self, expression: &Expression, identifier: &Ident) {
        self.error(
            &expression.location,
            format!("Variable \"{}\" not found", identifier.name),
        );
    }

    // ========================================================================
    // Lambdas
    // ========================================================================

    /// Unannotated parameters and return type are taken from a function-typed hint of the same arity.
    fn solve_lambda(&mut self, lambda: &Lambda, hint: Option<TypeId>) -> TypeId {
        let function_hint = hint
            .and_then(|hint| self.types.as_function_type(hint))
            .and_then(|function| self.types.function(function).cloned())
            .filter(|function| !function.is_generic() && function.parameters.len() == lambda.parameters.len());

        let mut parameters = Vec::with_capacity(lambda.parameters.len());
        for (i, parameter) in lambda.parameters.iter().enumerate() {
            let type_id = match &parameter.type_expr {
                Some(type_expr) => self.solve_type(type_expr),
                None => function_hint
                    .as_ref()
                    .map_or(TypeId::ANY, |function| function.parameters[i].type_id),
            };
            let default = parameter
                .default
                .as_ref()
                .and_then(|default| self.solve_const_expr(default));
            parameters.push(Parameter::new(parameter.identifier.clone(), type_id, default));
        }
        let prior_return = match &lambda.return_type {
            Some(type_expr) => Some(self.solve_type(type_expr)),
            None => function_hint.as_ref().map(|function| function.return_type),
        };

        let body = self.with_scope(|s| {
            for parameter in &parameters {
                s.declare_variable(Variable::new(true, parameter.identifier.clone(), parameter.type_id, None));
            }
            s.solve_expr(&lambda.body, prior_return)
        });
        let return_type = prior_return.unwrap_or(body);
        self.types.function_type(FunctionType::new(parameters, return_type))
    }

    // ========================================================================
    // Operations
    // ========================================================================

    fn solve_operation(&mut self, operation: &Operation, hint: Option<TypeId>) -> TypeId {
        match operation {
            Operation::Is(lhs, rhs) => {
                self.solve_expr(lhs, None);
                self.solve_expr(rhs, None);
                TypeId::BOOL
            }
            Operation::Not(operand) => {
                self.solve_expr(operand, None);
                TypeId::BOOL
            }
            Operation::And(lhs, rhs) => {
                let lhs = self.solve_expr(lhs, hint);
                let rhs = self.solve_expr(rhs, hint);
                let lhs = self.types.assume_false(lhs);
                self.types.merge(lhs, rhs)
            }
            Operation::Or(lhs, rhs) => {
                let lhs = self.solve_expr(lhs, hint);
                let rhs = self.solve_expr(rhs, hint);
                let lhs = self.types.assume_true(lhs);
                self.types.merge(lhs, rhs)
            }
            Operation::If(condition, then, otherwise) => {
                self.solve_expr(condition, None);
                let then = self.solve_expr(then, hint);
                let otherwise = self.solve_expr(otherwise, hint);
                self.types.merge(then, otherwise)
            }
        }
    }
}
