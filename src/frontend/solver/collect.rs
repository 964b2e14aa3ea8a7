//! Seeding a module's scopes: the builtin scope and imports.

use mtots_core::lang::conventions::{BUILTIN_MODULE, MAIN_MODULE};
use mtots_syntax::ast::{File, Import};

use super::Solver;
use crate::frontend::ir::Variable;

impl Solver<'_> {
    /// Copy the builtin module's top-level bindings into the builtin scope.
    pub(super) fn merge_builtin_scope(&mut self) {
        let deps = self.deps;
        match deps.get(BUILTIN_MODULE) {
            Some(builtin) => {
                for (name, variable) in builtin.globals.iter() {
                    self.scopes.define_builtin(name.clone(), variable.clone());
                }
            }
            None if self.name == BUILTIN_MODULE || self.name == MAIN_MODULE => {}
            None => tracing::warn!(module = self.name, "Builtin module not found (processing {})", self.name),
        }
    }

    pub(super) fn solve_imports(&mut self, file: &File) {
        for import in &file.imports {
            self.solve_import(import);
        }
    }

    /// `import a.b [as c]` binds the module value; `from a.b import c [as d]` binds the member's own binding.
    fn solve_import(&mut self, import: &Import) {
        let module_name = import.module.to_string();
        let deps = self.deps;
        let Some(dep) = deps.get(&module_name) else {
            self.error(&import.location, format!("Module {module_name} not found"));
            return;
        };
        let module_type = dep.module_type(self.types);
        let module_variable = Variable::new(
            true,
            import.module.identifier.clone(),
            module_type,
            dep.documentation().map(str::to_string),
        );
        self.declare_usage(&import.module.identifier, &module_variable);

        let alias = &import.alias;
        match &import.member {
            Some(member) => match dep.lookup(&member.name) {
                Some(member_variable) => {
                    let member_variable = member_variable.clone();
                    self.declare_variable_as(&alias.name, &alias.location, member_variable.clone());
                    self.declare_usage(member, &member_variable);
                    self.declare_usage(alias, &member_variable);
                }
                None => {
                    self.error(&import.location, format!("{} not found in {module_name}", member.name));
                }
            },
            None => {
                self.declare_variable_as(&alias.name, &alias.location, module_variable.clone());
                self.declare_usage(alias, &module_variable);
            }
        }
    }
}
