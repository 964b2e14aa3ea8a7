//! Field access, field assignment and the bare `owner.` completion anchor.

use mtots_syntax::ast::{Dot, Expression, Ident};

use super::super::Solver;
use crate::frontend::ide::{CompletionPoint, MemberFilter};
use crate::frontend::ir::TypeId;

impl Solver<'_> {
    pub(super) fn solve_get_field(&mut self, owner: &Expression, identifier: &Ident) -> TypeId {
        let owner_type = self.solve_expr(owner, None);
        let point = CompletionPoint::member(identifier.location.clone(), owner_type, MemberFilter::Default);
        self.push_completion_point(point);
        match self.types.get_field(owner_type, &identifier.name) {
            Some(field) => {
                self.declare_usage(identifier, &field);
                field.type_id
            }
            None => {
                self.field_not_found(identifier, owner_type);
                TypeId::ANY
            }
        }
    }

    pub(super) fn solve_set_field(&mut self, owner: &Expression, identifier: &Ident, value: &Expression) -> TypeId {
        let owner_type = self.solve_expr(owner, None);
        match self.types.get_field(owner_type, &identifier.name) {
            Some(field) => {
                if field.is_final {
                    self.error(&identifier.location, "Cannot assign to final value");
                }
                self.declare_usage(identifier, &field);
                self.solve_expr(value, Some(field.type_id));
                field.type_id
            }
            None => {
                self.field_not_found(identifier, owner_type);
                self.solve_expr(value, None);
                TypeId::ANY
            }
        }
    }

    fn field_not_found(&mut self, identifier: &Ident, owner_type: TypeId) {
        let message = format!("{} not found in {}", identifier.name, self.types.display(owner_type));
        self.error(&identifier.location, message);
    }

    pub(super) fn solve_dot(&mut self, dot: &Dot) -> TypeId {
        let owner_type = self.solve_expr(&dot.owner, None);
        let point = CompletionPoint::member(dot.dot_location.clone(), owner_type, MemberFilter::Default);
        self.push_completion_point(point);
        TypeId::ANY
    }
}
