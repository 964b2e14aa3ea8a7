//! Resolving type expressions and type parameter lists.

use mtots_core::lang::builtin_types::{self, BuiltinTypeId};
use mtots_syntax::ast::{Ident, TypeExpr, TypeParameter};

use super::Solver;
use crate::frontend::ide::{CompletionPoint, MemberFilter, ScopeFilter};
use crate::frontend::ir::{FunctionType, Parameter, TypeData, TypeId};

impl Solver<'_> {
    pub(super) fn solve_optional_type(&mut self, type_expr: Option<&TypeExpr>) -> TypeId {
        match type_expr {
            Some(type_expr) => self.solve_type(type_expr),
            None => TypeId::ANY,
        }
    }

    /// Resolve a type expression. Unknown names are reported and resolve to `Any`.
    pub(super) fn solve_type(&mut self, type_expr: &TypeExpr) -> TypeId {
        let args: Vec<TypeId> = type_expr.args.iter().map(|arg| self.solve_type(arg)).collect();
        let identifier = &type_expr.identifier;

        let Some(qualifier) = &type_expr.qualifier else {
            self.push_completion_point(CompletionPoint::scope(
                identifier.location.clone(),
                self.scopes.current(),
                ScopeFilter::TypesAndModulesOnly,
            ));
            if let Some(builtin) = builtin_types::from_str(&identifier.name) {
                return self.solve_builtin_type(type_expr, builtin, args);
            }
            let found = self.scopes.lookup(&identifier.name).map(|v| v.type_id);
            return match found {
                Some(value_type) => self.resolve_value_type(identifier, value_type, args),
                None => {
                    self.error(&type_expr.location, format!("Type {} not found", identifier.name));
                    TypeId::ANY
                }
            };
        };

        let Some(parent) = self.scopes.lookup(&qualifier.name).cloned() else {
            self.error(&qualifier.location, format!("{} not found", qualifier.name));
            return TypeId::ANY;
        };
        let point = CompletionPoint::member(identifier.location.clone(), parent.type_id, MemberFilter::TypesOnly);
        self.push_completion_point(point);
        self.declare_usage(qualifier, &parent);
        let Some(module) = self.types.module_type(parent.type_id) else {
            return TypeId::ANY;
        };
        let found = module.lookup(&identifier.name).map(|v| v.type_id);
        match found {
            Some(value_type) => self.resolve_value_type(identifier, value_type, args),
            None => {
                let message = format!("{} not found in {}", identifier.name, self.types.display(parent.type_id));
                self.error(&type_expr.location, message);
                TypeId::ANY
            }
        }
    }

    /// The type a name bound to `value_type` denotes in type position.
    fn resolve_value_type(&mut self, identifier: &Ident, value_type: TypeId, args: Vec<TypeId>) -> TypeId {
        match *self.types.get(value_type) {
            TypeData::ClassType(instance) => {
                if let Some(variable) = self.types.as_variable(instance) {
                    self.declare_usage(identifier, &variable);
                }
                if args.is_empty() {
                    instance
                } else {
                    self.types.bound_instance(instance, args)
                }
            }
            TypeData::TypeVariableType(variable_type) => {
                if let Some(variable) = self.types.as_variable(variable_type) {
                    self.declare_usage(identifier, &variable);
                }
                variable_type
            }
            _ => TypeId::ANY,
        }
    }

    fn solve_builtin_type(&mut self, type_expr: &TypeExpr, builtin: BuiltinTypeId, args: Vec<TypeId>) -> TypeId {
        let name = builtin_types::as_str(builtin);
        match builtin {
            BuiltinTypeId::Nil => TypeId::NIL,
            BuiltinTypeId::Bool => TypeId::BOOL,
            BuiltinTypeId::Int | BuiltinTypeId::Float | BuiltinTypeId::Number => TypeId::NUMBER,
            BuiltinTypeId::String => TypeId::STRING,
            BuiltinTypeId::Any => TypeId::ANY,
            BuiltinTypeId::Never => TypeId::NEVER,
            BuiltinTypeId::Class => TypeId::CLASS,
            BuiltinTypeId::Tuple => self.types.tuple_of(args),
            BuiltinTypeId::Union => self.types.union_of(args),
            BuiltinTypeId::List if args.is_empty() => TypeId::UNTYPED_LIST,
            BuiltinTypeId::List
            | BuiltinTypeId::FrozenList
            | BuiltinTypeId::Optional
            | BuiltinTypeId::Iteration
            | BuiltinTypeId::Iterable => {
                let item = match args.as_slice() {
                    [] => TypeId::ANY,
                    [item] => *item,
                    _ => {
                        self.error(&type_expr.location, format!("{name} expects 1 arg but got {}", args.len()));
                        return TypeId::ANY;
                    }
                };
                match builtin {
                    BuiltinTypeId::List => self.types.list_of(item),
                    BuiltinTypeId::FrozenList => self.types.frozen_list_of(item),
                    BuiltinTypeId::Optional => self.types.optional_of(item),
                    BuiltinTypeId::Iteration => self.types.iteration_of(item),
                    _ => self.types.iterable_of(item),
                }
            }
            BuiltinTypeId::Dict | BuiltinTypeId::FrozenDict => {
                let (key, value) = match args.as_slice() {
                    [] => (TypeId::ANY, TypeId::ANY),
                    [key, value] => (*key, *value),
                    _ => {
                        self.error(&type_expr.location, format!("{name} expects 2 args but got {}", args.len()));
                        return TypeId::ANY;
                    }
                };
                if builtin == BuiltinTypeId::Dict {
                    self.types.dict_of(key, value)
                } else {
                    self.types.frozen_dict_of(key, value)
                }
            }
            BuiltinTypeId::Function => {
                let Some((return_type, parameter_types)) = args.split_last() else {
                    self.error(
                        &type_expr.location,
                        "Function requires at least 1 arg for the return type but got 0",
                    );
                    return TypeId::ANY;
                };
                let parameters = parameter_types
                    .iter()
                    .zip(&type_expr.args)
                    .enumerate()
                    .map(|(i, (type_id, arg))| {
                        Parameter::new(Ident::synthetic(format!("a{i}"), arg.location.clone()), *type_id, None)
                    })
                    .collect();
                self.types.function_type(FunctionType::new(parameters, *return_type))
            }
        }
    }

    /// Create a type variable per parameter. The variables are not bound in scope here.
    pub(super) fn solve_type_parameters(&mut self, type_parameters: &[TypeParameter]) -> Vec<TypeId> {
        type_parameters
            .iter()
            .map(|parameter| {
                let bound = parameter.bound.as_ref().map(|bound| self.solve_type(bound));
                self.types.new_type_variable(parameter.identifier.clone(), bound)
            })
            .collect()
    }

    /// Bind each type variable's metatype under its name in the current scope.
    pub(super) fn declare_type_parameters(&mut self, type_parameters: &[TypeId]) {
        for type_parameter in type_parameters {
            if let Some(variable) = self.types.as_variable(*type_parameter) {
                self.declare_variable(variable);
            }
        }
    }
}
