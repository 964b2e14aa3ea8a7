//! Function calls, method calls and generic argument inference.

use mtots_syntax::ast::{Expr, Expression, FunctionCall, Ident, MethodCall};
use mtots_syntax::position::Location;

use super::super::Solver;
use crate::frontend::ide::SignatureHelp;
use crate::frontend::ir::{Binder, FunctionType, Parameter, TypeData, TypeId};

/// What a call site contributes to applying a function type.
struct CallSite<'e> {
    location: &'e Location,
    /// The name the callee was reached through, for signature help and the reified usage type.
    callee: Option<&'e Ident>,
    args: &'e [Expression],
    arg_locations: Option<&'e [Location]>,
}

impl Solver<'_> {
    pub(super) fn solve_function_call(
        &mut self,
        location: &Location,
        call: &FunctionCall,
        hint: Option<TypeId>,
    ) -> TypeId {
        let callable = self.solve_expr(&call.function, None);
        let callee = match &call.function.node {
            Expr::GetVariable(identifier) => Some(identifier),
            _ => None,
        };
        match self.types.as_function_type(callable) {
            Some(function) => {
                let site = CallSite {
                    location,
                    callee,
                    args: &call.args,
                    arg_locations: call.arg_locations.as_deref(),
                };
                self.apply_function(&site, function, hint)
            }
            None => {
                if callable != TypeId::ANY {
                    let message = format!("{} is not callable", self.types.display(callable));
                    self.error(location, message);
                }
                self.solve_exprs(&call.args);
                TypeId::ANY
            }
        }
    }

    pub(super) fn solve_method_call(&mut self, location: &Location, call: &MethodCall, hint: Option<TypeId>) -> TypeId {
        let owner = self.solve_expr(&call.owner, None);
        let Some(method) = self.types.get_method(owner, &call.identifier.name) else {
            let message = match self.types.module_type(owner) {
                Some(module) => format!("Function {} not found on module {}", call.identifier.name, module.name),
                None => format!("Method {} not found on {}", call.identifier.name, self.types.display(owner)),
            };
            self.error(&call.identifier.location, message);
            self.solve_exprs(&call.args);
            return TypeId::ANY;
        };
        self.declare_usage(&call.identifier, &method);
        match self.types.as_function_type(method.type_id) {
            Some(function) => {
                let site = CallSite {
                    location,
                    callee: Some(&call.identifier),
                    args: &call.args,
                    arg_locations: call.arg_locations.as_deref(),
                };
                self.apply_function(&site, function, hint)
            }
            None => {
                if method.type_id != TypeId::ANY {
                    let message = format!("{} is not callable", self.types.display(method.type_id));
                    self.error(location, message);
                }
                self.solve_exprs(&call.args);
                TypeId::ANY
            }
        }
    }

    fn solve_exprs(&mut self, expressions: &[Expression]) {
        for expression in expressions {
            self.solve_expr(expression, None);
        }
    }

    /// Check a call's arguments against `function` and return the call's type.
    ///
    /// ## Notes
    /// - With the wrong number of arguments the arguments are still solved, and the declared return type is used
    ///   unless the function is generic.
    /// - Type arguments of a generic function are inferred from the return hint first, then from each argument
    ///   left to right. The first inference for a variable wins.
    fn apply_function(&mut self, site: &CallSite<'_>, function: TypeId, hint: Option<TypeId>) -> TypeId {
        let Some(signature) = self.types.function(function).cloned() else {
            self.solve_exprs(site.args);
            return TypeId::ANY;
        };

        if let Some(arg_locations) = site.arg_locations {
            let parameter_types: Vec<TypeId> = signature.parameters.iter().map(|p| p.type_id).collect();
            let parameter_names: Vec<String> = signature
                .parameters
                .iter()
                .map(|p| p.identifier.name.clone())
                .collect();
            for (index, arg_location) in arg_locations.iter().enumerate() {
                self.push_signature_help(SignatureHelp {
                    location: arg_location.clone(),
                    function_name: site.callee.map(|callee| callee.name.clone()),
                    function_documentation: signature.documentation.clone(),
                    parameter_types: parameter_types.clone(),
                    parameter_names: Some(parameter_names.clone()),
                    parameter_index: index,
                    return_type: Some(signature.return_type),
                });
            }
        }

        let argc = site.args.len();
        let arity_error = if argc < signature.min_argc() {
            Some(format!("At least {} args are required but got {argc}", signature.min_argc()))
        } else if argc > signature.max_argc() {
            Some(format!("Up to {} args are allowed but got {argc}", signature.max_argc()))
        } else {
            None
        };
        if let Some(message) = arity_error {
            self.solve_exprs(site.args);
            self.error(site.location, message);
            return if signature.is_generic() {
                TypeId::ANY
            } else {
                signature.return_type
            };
        }

        if !signature.is_generic() {
            for (arg, parameter) in site.args.iter().zip(&signature.parameters) {
                let arg_type = self.solve_expr(arg, Some(parameter.type_id));
                self.check_argument(arg, arg_type, parameter.type_id);
            }
            return signature.return_type;
        }

        let mut binder = Binder::new(signature.type_parameters.iter().copied());
        if let Some(hint) = hint {
            self.infer(&mut binder, signature.return_type, hint);
        }
        let mut arg_types = Vec::with_capacity(argc);
        for (arg, parameter) in site.args.iter().zip(&signature.parameters) {
            let guess = binder.bind(self.types, parameter.type_id);
            let arg_type = self.solve_expr(arg, Some(guess));
            self.infer(&mut binder, parameter.type_id, arg_type);
            arg_types.push(arg_type);
        }
        let mut bound_parameters = Vec::with_capacity(argc);
        for ((arg, parameter), arg_type) in site.args.iter().zip(&signature.parameters).zip(arg_types) {
            let parameter_type = binder.bind(self.types, parameter.type_id);
            self.check_argument(arg, arg_type, parameter_type);
            bound_parameters.push(Parameter::new(parameter.identifier.clone(), parameter_type, None));
        }
        let return_type = binder.bind(self.types, signature.return_type);

        if let Some(callee) = site.callee {
            let bound_type = self.types.function_type(FunctionType::new(bound_parameters, return_type));
            if let Some(usage) = self.usage_mut(callee) {
                usage.bound_type = Some(bound_type);
            }
        }
        return_type
    }

    fn check_argument(&mut self, arg: &Expression, arg_type: TypeId, parameter_type: TypeId) {
        if !self.types.is_assignable(arg_type, parameter_type) {
            let message = format!(
                "Expected argument to be {} but got {}",
                self.types.display(parameter_type),
                self.types.display(arg_type)
            );
            self.error(&arg.location, message);
        }
    }

    /// Match `parameter` against `actual` structurally, binding unbound type variables on the way.
    fn infer(&mut self, binder: &mut Binder, parameter: TypeId, actual: TypeId) {
        if self.types.equals(parameter, actual) {
            return;
        }
        let mut bind_here = false;
        let pairs: Vec<(TypeId, TypeId)> = match (self.types.get(parameter), self.types.get(actual)) {
            (TypeData::List(p), TypeData::List(a))
            | (TypeData::FrozenList(p), TypeData::FrozenList(a))
            | (TypeData::Iterable(p), TypeData::Iterable(a))
            | (TypeData::Iteration(p), TypeData::Iteration(a)) => vec![(*p, *a)],
            (TypeData::Dict(pk, pv), TypeData::Dict(ak, av))
            | (TypeData::FrozenDict(pk, pv), TypeData::FrozenDict(ak, av)) => vec![(*pk, *ak), (*pv, *av)],
            (TypeData::Union(ps), TypeData::Union(actuals)) if ps.len() == actuals.len() => {
                ps.iter().copied().zip(actuals.iter().copied()).collect()
            }
            // `T?` against a plain value infers `T` from the value.
            (TypeData::Union(ps), _) => {
                let rest: Vec<TypeId> = ps.iter().copied().filter(|p| *p != TypeId::NIL).collect();
                match rest.as_slice() {
                    [p] => vec![(*p, actual)],
                    _ => Vec::new(),
                }
            }
            (TypeData::Function(p), TypeData::Function(a)) if !a.is_generic() => p
                .parameters
                .iter()
                .zip(&a.parameters)
                .map(|(pp, ap)| (pp.type_id, ap.type_id))
                .chain(std::iter::once((p.return_type, a.return_type)))
                .collect(),
            (TypeData::TypeVariable(_), _) => {
                bind_here = true;
                Vec::new()
            }
            _ => Vec::new(),
        };
        if bind_here && binder.is_bindable(parameter) && binder.get(parameter).is_none() {
            let concrete = self.types.to_non_literal(actual);
            binder.insert(parameter, concrete);
        }
        for (p, a) in pairs {
            self.infer(binder, p, a);
        }
    }
}
