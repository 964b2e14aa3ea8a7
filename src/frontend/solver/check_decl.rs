//! Statement lists and declarations.
//!
//! A statement list is solved in three passes so declarations in it may refer to each other in any order:
//!
//! 1. every class and trait gets a placeholder instance type (type parameters and bases resolved) bound in scope;
//! 2. member signatures are filled in: static methods, inherited members, own fields and methods, and plain
//!    function signatures;
//! 3. bodies are checked, along with every statement that is not a declaration.

use mtots_core::lang::conventions::BUILTIN_MODULE;
use mtots_syntax::ast::{
    Block, ClassDecl, Field, FunctionDecl, Ident, Located, Statement, Stmt, TraitDecl, TypeExpr, TypeParameter,
};

use super::{SolveError, Solver};
use crate::frontend::ir::{FunctionType, Parameter, TypeData, TypeId, Variable};

/// The parts of a class or trait declaration the passes share.
struct ClassLike<'s> {
    is_trait: bool,
    identifier: &'s Ident,
    type_parameters: &'s [TypeParameter],
    bases: &'s [TypeExpr],
    documentation: &'s Option<String>,
    static_methods: &'s [Located<FunctionDecl>],
    fields: &'s [Field],
    methods: &'s [Located<FunctionDecl>],
}

impl<'s> From<&'s ClassDecl> for ClassLike<'s> {
    fn from(class: &'s ClassDecl) -> Self {
        Self {
            is_trait: false,
            identifier: &class.identifier,
            type_parameters: &class.type_parameters,
            bases: &class.bases,
            documentation: &class.documentation,
            static_methods: &class.static_methods,
            fields: &class.fields,
            methods: &class.methods,
        }
    }
}

impl<'s> From<&'s TraitDecl> for ClassLike<'s> {
    fn from(declaration: &'s TraitDecl) -> Self {
        Self {
            is_trait: true,
            identifier: &declaration.identifier,
            type_parameters: &declaration.type_parameters,
            bases: &declaration.bases,
            documentation: &declaration.documentation,
            static_methods: &[],
            fields: &declaration.fields,
            methods: &declaration.methods,
        }
    }
}

/// Which member table of an instance a method goes into.
#[derive(Clone, Copy)]
enum MethodSlot {
    Instance,
    Static,
}

impl Solver<'_> {
    /// Solve `block` in a fresh scope.
    pub(super) fn solve_block(&mut self, block: &Located<Block>) -> Result<(), SolveError> {
        self.with_scope(|s| s.solve_block_body(&block.node.statements))
    }

    /// Solve a statement list in the current scope.
    pub(super) fn solve_block_body(&mut self, statements: &[Statement]) -> Result<(), SolveError> {
        for statement in statements {
            match &statement.node {
                Stmt::Class(class) => self.declare_class(&ClassLike::from(class)),
                Stmt::Trait(declaration) => self.declare_class(&ClassLike::from(declaration)),
                _ => {}
            }
        }

        for statement in statements {
            match &statement.node {
                Stmt::Class(class) => self.solve_class_members(&ClassLike::from(class))?,
                Stmt::Trait(declaration) => self.solve_class_members(&ClassLike::from(declaration))?,
                Stmt::Function(function) => {
                    let variable = self.function_variable(function);
                    self.function_types.insert(function.identifier.id, variable.type_id);
                    self.declare_variable(variable);
                }
                _ => {}
            }
        }

        for statement in statements {
            match &statement.node {
                Stmt::Class(class) => self.solve_class_bodies(class)?,
                Stmt::Function(function) => self.solve_function_body(function)?,
                _ => self.solve_stmt(statement)?,
            }
        }
        Ok(())
    }

    // ========================================================================
    // Pass 1: placeholders
    // ========================================================================

    fn declare_class(&mut self, class: &ClassLike<'_>) {
        let type_parameters = self.solve_type_parameters(class.type_parameters);
        let bases = self.with_scope(|s| {
            s.declare_type_parameters(&type_parameters);
            let mut bases = Vec::new();
            for base in class.bases {
                let base_type = s.solve_type(base);
                let inheritable = matches!(
                    s.types.get(base_type),
                    TypeData::Any | TypeData::Instance(_) | TypeData::BoundInstance(_)
                );
                if !inheritable {
                    let message = format!("{} is not inheritable", s.types.display(base_type));
                    s.error(&base.location, message);
                } else if base_type != TypeId::ANY {
                    bases.push(base_type);
                }
            }
            bases
        });
        let builtin = if self.name == BUILTIN_MODULE {
            match class.identifier.name.as_str() {
                "Nil" => Some(TypeId::NIL),
                "Bool" => Some(TypeId::BOOL),
                "Number" => Some(TypeId::NUMBER),
                "String" => Some(TypeId::STRING),
                _ => None,
            }
        } else {
            None
        };
        let instance = self.types.new_instance(
            class.is_trait,
            class.identifier.clone(),
            type_parameters,
            bases,
            class.documentation.clone(),
            builtin,
        );
        self.class_types.insert(class.identifier.id, instance);
        if let Some(variable) = self.types.as_variable(instance) {
            self.declare_variable(variable);
        }
    }

    fn placeholder(&self, identifier: &Ident) -> Result<TypeId, SolveError> {
        self.class_types
            .get(&identifier.id)
            .copied()
            .ok_or_else(|| self.internal(&identifier.location, format!("no placeholder type for {}", identifier.name)))
    }

    // ========================================================================
    // Pass 2: signatures
    // ========================================================================

    fn solve_class_members(&mut self, class: &ClassLike<'_>) -> Result<(), SolveError> {
        let instance = self.placeholder(class.identifier)?;
        for method in class.static_methods {
            let variable = self.function_variable(&method.node);
            self.function_types.insert(method.node.identifier.id, variable.type_id);
            self.add_method(instance, MethodSlot::Static, variable);
        }

        let (type_parameters, bases) = match self.types.instance(instance) {
            Some(data) => (data.type_parameters.clone(), data.bases.clone()),
            None => return Err(self.internal(&class.identifier.location, "placeholder is not an instance type")),
        };
        self.with_scope(|s| {
            s.declare_type_parameters(&type_parameters);
            for base in bases {
                s.inherit(instance, base);
            }
            for field in class.fields {
                let type_id = s.solve_type(&field.type_expr);
                let variable = Variable::new(
                    field.is_final,
                    field.identifier.clone(),
                    type_id,
                    field.documentation.clone(),
                );
                s.declare_usage(&field.identifier, &variable);
                if let Some(data) = s.types.instance_mut(instance) {
                    data.fields.insert(field.identifier.name.clone(), variable);
                }
            }
            for method in class.methods {
                let variable = s.function_variable(&method.node);
                s.function_types.insert(method.node.identifier.id, variable.type_id);
                s.add_method(instance, MethodSlot::Instance, variable);
            }
        });
        Ok(())
    }

    /// Copy the members of `base` into `instance`. Members of a generic base are bound to its arguments.
    fn inherit(&mut self, instance: TypeId, base: TypeId) {
        let generic = match self.types.get(base) {
            TypeData::Instance(_) => None,
            TypeData::BoundInstance(bound) => Some(bound.instance),
            _ => return,
        };
        let (fields, methods): (Vec<Variable>, Vec<Variable>) = match generic {
            None => match self.types.instance(base) {
                Some(data) => (data.fields.values().cloned().collect(), data.methods.values().cloned().collect()),
                None => return,
            },
            Some(generic) => {
                let (field_names, method_names): (Vec<String>, Vec<String>) = match self.types.instance(generic) {
                    Some(data) => (data.fields.keys().cloned().collect(), data.methods.keys().cloned().collect()),
                    None => return,
                };
                let fields = field_names
                    .iter()
                    .filter_map(|name| self.types.get_field(base, name))
                    .collect();
                let methods = method_names
                    .iter()
                    .filter_map(|name| self.types.get_method(base, name))
                    .collect();
                (fields, methods)
            }
        };
        if let Some(data) = self.types.instance_mut(instance) {
            for field in fields {
                data.fields.insert(field.identifier.name.clone(), field);
            }
            for method in methods {
                data.methods.insert(method.identifier.name.clone(), method);
            }
        }
    }

    /// Add a method to `instance`, mirroring it onto the backing primitive when compiling the builtin module.
    fn add_method(&mut self, instance: TypeId, slot: MethodSlot, variable: Variable) {
        let name = variable.identifier.name.clone();
        let Some(data) = self.types.instance_mut(instance) else {
            return;
        };
        let builtin = data.builtin;
        match slot {
            MethodSlot::Instance => data.methods.insert(name.clone(), variable.clone()),
            MethodSlot::Static => data.static_methods.insert(name.clone(), variable.clone()),
        };
        if let Some(primitive) = builtin.and_then(|id| self.types.primitive_mut(id)) {
            match slot {
                MethodSlot::Instance => primitive.methods.insert(name, variable),
                MethodSlot::Static => primitive.static_methods.insert(name, variable),
            };
        }
    }

    /// The binding a `def` introduces; its identifier is recorded as a usage of itself.
    fn function_variable(&mut self, function: &FunctionDecl) -> Variable {
        let type_id = self.function_signature(function);
        let variable = Variable::new(true, function.identifier.clone(), type_id, function.documentation.clone());
        self.declare_usage(&function.identifier, &variable);
        variable
    }

    fn function_signature(&mut self, function: &FunctionDecl) -> TypeId {
        let type_parameters = self.solve_type_parameters(&function.type_parameters);
        let (parameters, return_type) = self.with_scope(|s| {
            s.declare_type_parameters(&type_parameters);
            let parameters: Vec<Parameter> = function
                .parameters
                .iter()
                .map(|parameter| {
                    let type_id = s.solve_optional_type(parameter.type_expr.as_ref());
                    let default = parameter.default.as_ref().map(|default| s.require_const_expr(default));
                    Parameter::new(parameter.identifier.clone(), type_id, default)
                })
                .collect();
            (parameters, s.solve_optional_type(function.return_type.as_ref()))
        });
        self.types.function_type(FunctionType {
            type_parameters,
            parameters,
            return_type,
            documentation: function.documentation.clone(),
        })
    }

    // ========================================================================
    // Pass 3: bodies
    // ========================================================================

    fn solve_class_bodies(&mut self, class: &ClassDecl) -> Result<(), SolveError> {
        let instance = self.placeholder(&class.identifier)?;
        for method in &class.static_methods {
            self.solve_function_body(&method.node)?;
        }
        let (type_parameters, first_base) = match self.types.instance(instance) {
            Some(data) => (data.type_parameters.clone(), data.bases.first().copied()),
            None => return Err(self.internal(&class.identifier.location, "placeholder is not an instance type")),
        };
        self.with_scope(|s| {
            s.declare_type_parameters(&type_parameters);
            let this_type = if type_parameters.is_empty() {
                instance
            } else {
                s.types.bound_instance(instance, type_parameters.clone())
            };
            let location = &class.identifier.location;
            s.declare_variable_as("this", location, Variable::new(true, class.identifier.clone(), this_type, None));
            if let Some(base) = first_base {
                s.declare_variable_as("super", location, Variable::new(true, class.identifier.clone(), base, None));
            }
            for method in &class.methods {
                s.solve_function_body(&method.node)?;
            }
            Ok(())
        })
    }

    fn solve_function_body(&mut self, function: &FunctionDecl) -> Result<(), SolveError> {
        let signature = self
            .function_types
            .get(&function.identifier.id)
            .and_then(|type_id| self.types.function(*type_id))
            .cloned();
        let Some(signature) = signature else {
            return Err(self.internal(
                &function.identifier.location,
                format!("no signature for function {}", function.identifier.name),
            ));
        };
        self.with_scope(|s| {
            s.declare_type_parameters(&signature.type_parameters);
            for (parameter, declared) in function.parameters.iter().zip(&signature.parameters) {
                s.declare_variable(Variable::new(false, parameter.identifier.clone(), declared.type_id, None));
            }
            s.solve_block(&function.body)
        })
    }
}
