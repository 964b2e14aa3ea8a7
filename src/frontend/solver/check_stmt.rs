//! Statements that are not declarations.

use mtots_syntax::ast::{ForStmt, Statement, Stmt, VariableDecl};

use super::{SolveError, Solver};
use crate::frontend::ir::{TypeData, TypeId, Variable};

impl Solver<'_> {
    pub(super) fn solve_stmt(&mut self, statement: &Statement) -> Result<(), SolveError> {
        match &statement.node {
            Stmt::Nop | Stmt::Trait(_) => {}
            Stmt::Function(function) => {
                return Err(self.internal(
                    &statement.location,
                    format!("function {} reached outside of a statement list", function.identifier.name),
                ));
            }
            Stmt::Class(class) => {
                return Err(self.internal(
                    &statement.location,
                    format!("class {} reached outside of a statement list", class.identifier.name),
                ));
            }
            Stmt::Variable(declaration) => self.solve_variable_decl(declaration),
            Stmt::While(stmt) => {
                self.solve_expr(&stmt.condition, None);
                self.solve_block(&stmt.body)?;
            }
            Stmt::For(stmt) => self.solve_for(stmt)?,
            Stmt::If(stmt) => {
                for (condition, body) in &stmt.branches {
                    self.solve_expr(condition, None);
                    self.solve_block(body)?;
                }
                if let Some(fallback) = &stmt.fallback {
                    self.solve_block(fallback)?;
                }
            }
            Stmt::Block(block) => {
                self.with_scope(|s| s.solve_block_body(&block.statements))?;
            }
            Stmt::Return(expression) | Stmt::Expression(expression) => {
                self.solve_expr(expression, None);
            }
        }
        Ok(())
    }

    /// `var`/`final` declarations. A `final` primitive with a constant initializer narrows to a literal type;
    /// `var` always widens.
    fn solve_variable_decl(&mut self, declaration: &VariableDecl) {
        let implicit = self.solve_expr(&declaration.value, None);
        let mut type_id = match &declaration.type_expr {
            Some(type_expr) => self.solve_type(type_expr),
            None => implicit,
        };
        if declaration.is_final {
            if matches!(self.types.get(type_id), TypeData::Primitive(_)) {
                if let Some(value) = self.solve_const_expr(&declaration.value) {
                    type_id = self.types.literal(type_id, value);
                }
            }
        } else {
            type_id = self.types.to_non_literal(type_id);
        }
        self.declare_variable(Variable::new(
            declaration.is_final,
            declaration.identifier.clone(),
            type_id,
            declaration.documentation.clone(),
        ));
    }

    fn solve_for(&mut self, stmt: &ForStmt) -> Result<(), SolveError> {
        self.with_scope(|s| {
            let container = s.solve_expr(&stmt.container, None);
            let item = match s.types.get_iter_type(container) {
                Some(item) => item,
                None => {
                    let message = format!("{} is not iterable", s.types.display(container));
                    s.error(&stmt.container.location, message);
                    TypeId::ANY
                }
            };
            s.declare_variable(Variable::new(false, stmt.variable.clone(), item, None));
            s.solve_block(&stmt.body)
        })
    }
}
