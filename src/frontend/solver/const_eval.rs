//! Compile-time evaluation of constant expressions.
//!
//! Used for parameter defaults and to narrow `final` variables to literal types. Only literals, `final` literal
//! variables (local or `module.NAME`) and a small set of numeric and string operators fold; anything else is not a
//! constant.

use mtots_core::lang::magic_methods::{self, MagicMethodId};
use mtots_core::numeric::{float_mod, floor_div};
use mtots_syntax::ast::{Expr, Expression};

use super::Solver;
use crate::frontend::ir::{ConstValue, TypeData, TypeId};

impl Solver<'_> {
    /// Like [`Solver::solve_const_expr`], but reports a non-constant and falls back to `0`.
    pub(super) fn require_const_expr(&mut self, expression: &Expression) -> ConstValue {
        match self.solve_const_expr(expression) {
            Some(value) => value,
            None => {
                self.error(&expression.location, "Expected constexpr");
                ConstValue::Number(0.0)
            }
        }
    }

    pub(super) fn solve_const_expr(&self, expression: &Expression) -> Option<ConstValue> {
        match &expression.node {
            Expr::Nil => Some(ConstValue::Nil),
            Expr::Bool(value) => Some(ConstValue::Bool(*value)),
            Expr::Number(value) => Some(ConstValue::Number(*value)),
            Expr::String(value) => Some(ConstValue::String(value.clone())),
            Expr::GetVariable(identifier) => {
                let variable = self.scopes.lookup(&identifier.name)?;
                self.literal_value(variable.type_id)
            }
            Expr::GetField { owner, identifier } => {
                let Expr::GetVariable(owner) = &owner.node else {
                    return None;
                };
                let owner = self.scopes.lookup(&owner.name)?;
                let module = self.types.module_type(owner.type_id)?;
                let variable = module.lookup(&identifier.name)?;
                self.literal_value(variable.type_id)
            }
            Expr::MethodCall(call) => {
                let owner = self.solve_const_expr(&call.owner)?;
                let args = call
                    .args
                    .iter()
                    .map(|arg| self.solve_const_expr(arg))
                    .collect::<Option<Vec<_>>>()?;
                fold_operator(owner, magic_methods::from_str(&call.identifier.name)?, &args)
            }
            _ => None,
        }
    }

    fn literal_value(&self, type_id: TypeId) -> Option<ConstValue> {
        match self.types.get(type_id) {
            TypeData::Literal(literal) => Some(literal.value.clone()),
            _ => None,
        }
    }
}

fn fold_operator(owner: ConstValue, method: MagicMethodId, args: &[ConstValue]) -> Option<ConstValue> {
    match (owner, args) {
        (ConstValue::Number(value), []) => match method {
            MagicMethodId::Neg => Some(ConstValue::Number(-value)),
            _ => None,
        },
        (ConstValue::Number(lhs), [ConstValue::Number(rhs)]) => {
            let rhs = *rhs;
            let folded = match method {
                MagicMethodId::Add => lhs + rhs,
                MagicMethodId::Sub => lhs - rhs,
                MagicMethodId::Mul => lhs * rhs,
                MagicMethodId::Mod => float_mod(lhs, rhs),
                MagicMethodId::Div => lhs / rhs,
                MagicMethodId::FloorDiv => floor_div(lhs, rhs),
                _ => return None,
            };
            Some(ConstValue::Number(folded))
        }
        (ConstValue::String(lhs), [ConstValue::String(rhs)]) => match method {
            MagicMethodId::Add => Some(ConstValue::String(lhs + rhs)),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_number_and_string_operators() {
        let number = |v| ConstValue::Number(v);
        assert_eq!(
            fold_operator(number(7.0), MagicMethodId::FloorDiv, &[number(2.0)]),
            Some(number(3.0))
        );
        assert_eq!(fold_operator(number(2.0), MagicMethodId::Neg, &[]), Some(number(-2.0)));
        assert_eq!(
            fold_operator(
                ConstValue::String("a".into()),
                MagicMethodId::Add,
                &[ConstValue::String("b".into())]
            ),
            Some(ConstValue::String("ab".into()))
        );
        assert_eq!(fold_operator(number(1.0), MagicMethodId::Lt, &[number(2.0)]), None);
        assert_eq!(
            fold_operator(number(1.0), MagicMethodId::Add, &[ConstValue::String("x".into())]),
            None
        );
    }
}
