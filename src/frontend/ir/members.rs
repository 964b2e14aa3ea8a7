//! Member lookup, callable views and iteration protocol.
//!
//! Container shapes (`List`, `Dict`, ...) have no declared class; their methods are synthesized here the first time
//! a type is asked for one and then cached on the arena.

use std::sync::Arc;

use indexmap::IndexMap;
use mtots_core::lang::magic_methods::{self, MagicMethodId};

use super::binder::Binder;
use super::store::{FunctionType, MemberKind, TypeData, TypeId, Types};
use super::{ConstValue, Parameter, Variable, builtin_ident};

/// What `Any` answers for every member name.
fn any_property() -> Variable {
    Variable::new(false, builtin_ident("(any)"), TypeId::ANY, None)
}

fn magic(id: MagicMethodId) -> &'static str {
    magic_methods::as_str(id)
}

impl Types {
    // ========================================================================
    // Fields and methods
    // ========================================================================

    pub fn get_field(&mut self, id: TypeId, name: &str) -> Option<Variable> {
        match self.get(id) {
            TypeData::Any => Some(any_property()),
            TypeData::Module(module) => module.globals.get(name).cloned(),
            TypeData::Instance(instance) => {
                if instance.is_generic() {
                    None
                } else {
                    instance.fields.get(name).cloned()
                }
            }
            TypeData::BoundInstance(_) => self.bound_member(id, MemberKind::Field, name),
            TypeData::TypeVariable(variable) => {
                let bound = variable.bound?;
                self.get_field(bound, name)
            }
            TypeData::FrozenDictLiteral(literal) => {
                if let Some(field) = literal.fields.get(name) {
                    return Some(field.clone());
                }
                let backing = literal.backing;
                self.get_field(backing, name)
            }
            _ => None,
        }
    }

    pub fn get_method(&mut self, id: TypeId, name: &str) -> Option<Variable> {
        match self.get(id) {
            TypeData::Any => Some(any_property()),
            TypeData::Primitive(primitive) => primitive.methods.get(name).cloned(),
            TypeData::Literal(literal) => {
                let primitive = literal.primitive;
                self.get_method(primitive, name)
            }
            TypeData::PrimitiveTypeType(primitive) => {
                self.primitive(*primitive)?.static_methods.get(name).cloned()
            }
            TypeData::Module(module) => module.globals.get(name).cloned(),
            TypeData::Instance(instance) => {
                if instance.is_generic() {
                    None
                } else {
                    instance.methods.get(name).cloned()
                }
            }
            TypeData::BoundInstance(_) => self.bound_member(id, MemberKind::Method, name),
            TypeData::ClassType(instance) => self.instance(*instance)?.static_methods.get(name).cloned(),
            TypeData::TypeVariable(variable) => {
                let bound = variable.bound?;
                self.get_method(bound, name)
            }
            TypeData::FrozenDictLiteral(literal) => {
                let backing = literal.backing;
                self.get_method(backing, name)
            }
            TypeData::Iterable(_)
            | TypeData::List(_)
            | TypeData::FrozenList(_)
            | TypeData::Tuple(_)
            | TypeData::Dict(..)
            | TypeData::FrozenDict(..) => self.member_table(id).get(name).cloned(),
            TypeData::Never
            | TypeData::ClassTypeType
            | TypeData::TypeVariableType(_)
            | TypeData::Iteration(_)
            | TypeData::Function(_)
            | TypeData::Union(_) => None,
        }
    }

    pub fn field_names(&self, id: TypeId) -> Vec<String> {
        match self.get(id) {
            TypeData::Module(module) => module.globals.keys().cloned().collect(),
            TypeData::Instance(instance) => instance.fields.keys().cloned().collect(),
            TypeData::BoundInstance(bound) => self.field_names(bound.instance),
            TypeData::TypeVariable(variable) => variable.bound.map(|b| self.field_names(b)).unwrap_or_default(),
            TypeData::FrozenDictLiteral(literal) => {
                let mut names: Vec<String> = literal.fields.keys().cloned().collect();
                names.extend(self.field_names(literal.backing));
                names
            }
            _ => Vec::new(),
        }
    }

    pub fn method_names(&mut self, id: TypeId) -> Vec<String> {
        match self.get(id) {
            TypeData::Primitive(primitive) => primitive.methods.keys().cloned().collect(),
            TypeData::Literal(literal) => {
                let primitive = literal.primitive;
                self.method_names(primitive)
            }
            TypeData::PrimitiveTypeType(primitive) => self
                .primitive(*primitive)
                .map(|p| p.static_methods.keys().cloned().collect())
                .unwrap_or_default(),
            TypeData::Module(module) => module.globals.keys().cloned().collect(),
            TypeData::Instance(instance) => instance.methods.keys().cloned().collect(),
            TypeData::BoundInstance(bound) => {
                let instance = bound.instance;
                self.method_names(instance)
            }
            TypeData::ClassType(instance) => self
                .instance(*instance)
                .map(|i| i.static_methods.keys().cloned().collect())
                .unwrap_or_default(),
            TypeData::TypeVariable(variable) => match variable.bound {
                Some(bound) => self.method_names(bound),
                None => Vec::new(),
            },
            TypeData::FrozenDictLiteral(literal) => {
                let backing = literal.backing;
                self.method_names(backing)
            }
            TypeData::Iterable(_)
            | TypeData::List(_)
            | TypeData::FrozenList(_)
            | TypeData::Tuple(_)
            | TypeData::Dict(..)
            | TypeData::FrozenDict(..) => self.member_table(id).keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Bind a generic member of a bound instance, memoized per (type, kind, name).
    fn bound_member(&mut self, id: TypeId, kind: MemberKind, name: &str) -> Option<Variable> {
        let key = (id, kind, name.to_string());
        if let Some(cached) = self.bound_members.get(&key) {
            return cached.clone();
        }
        let TypeData::BoundInstance(bound) = self.get(id) else {
            return None;
        };
        let bound = bound.clone();
        let instance = self.instance(bound.instance)?;
        let unbound = match kind {
            MemberKind::Field => instance.fields.get(name).cloned(),
            MemberKind::Method => instance.methods.get(name).cloned(),
        };
        let result = match unbound {
            None => None,
            Some(unbound) => {
                let binder = Binder::for_bound_instance(self, &bound);
                let type_id = binder.bind(self, unbound.type_id);
                match kind {
                    MemberKind::Field => Some(Variable { type_id, ..unbound }),
                    MemberKind::Method => match self.as_function_type(type_id) {
                        Some(function) => Some(Variable {
                            type_id: function,
                            ..unbound
                        }),
                        None => {
                            tracing::warn!(method = name, "bound method is no longer a function type");
                            None
                        }
                    },
                }
            }
        };
        self.bound_members.insert(key, result.clone());
        result
    }

    // ========================================================================
    // Synthesized container methods
    // ========================================================================

    fn member_table(&mut self, id: TypeId) -> Arc<IndexMap<String, Variable>> {
        if let Some(table) = self.member_tables.get(&id) {
            return table.clone();
        }
        let table = Arc::new(self.build_member_table(id));
        self.member_tables.insert(id, table.clone());
        table
    }

    fn build_member_table(&mut self, id: TypeId) -> IndexMap<String, Variable> {
        let mut table = MethodTable::default();
        match self.get(id).clone() {
            TypeData::Iterable(item) => {
                let step = self.step_function(item);
                table.add(self, magic(MagicMethodId::Iter), vec![], step);
            }
            TypeData::List(item) => {
                let optional_number = self.optional_of(TypeId::NUMBER);
                let items = self.iterable_of(item);
                let step = self.step_function(item);
                table.add(self, magic(MagicMethodId::Bmon), vec![], TypeId::ANY);
                table.add(self, magic(MagicMethodId::Eq), vec![arg("other", id)], TypeId::BOOL);
                table.add(self, magic(MagicMethodId::Lt), vec![arg("other", id)], TypeId::BOOL);
                table.add(self, magic(MagicMethodId::Len), vec![], TypeId::NUMBER);
                table.add(self, magic(MagicMethodId::Mul), vec![arg("n", TypeId::NUMBER)], id);
                table.add(self, magic(MagicMethodId::Add), vec![arg("other", id)], id);
                table.add(self, magic(MagicMethodId::GetItem), vec![arg("index", TypeId::NUMBER)], item);
                table.add(
                    self,
                    magic(MagicMethodId::SetItem),
                    vec![arg("index", TypeId::NUMBER), arg("value", item)],
                    TypeId::NIL,
                );
                table.add(
                    self,
                    magic(MagicMethodId::Slice),
                    vec![
                        optional_arg("start", optional_number, ConstValue::Number(0.0)),
                        optional_arg("end", optional_number, ConstValue::Number(0.0)),
                    ],
                    id,
                );
                table.add(self, magic(MagicMethodId::Contains), vec![arg("item", item)], TypeId::BOOL);
                table.add(self, "clear", vec![], TypeId::NIL);
                table.add(self, "append", vec![arg("item", item)], TypeId::NIL);
                table.add(self, "extend", vec![arg("items", items)], TypeId::NIL);
                table.add(self, "pop", vec![], item);
                table.add(self, "insert", vec![arg("index", optional_number)], item);
                table.add(self, "reverse", vec![], TypeId::NIL);
                table.add(self, magic(MagicMethodId::Iter), vec![], step);
                if matches!(self.get(item), TypeData::List(_)) {
                    table.add(self, "flatten", vec![], item);
                }
            }
            TypeData::FrozenList(item) => {
                let optional_number = self.optional_of(TypeId::NUMBER);
                let step = self.step_function(item);
                table.add(self, magic(MagicMethodId::Eq), vec![arg("other", id)], TypeId::BOOL);
                table.add(self, magic(MagicMethodId::Lt), vec![arg("other", id)], TypeId::BOOL);
                table.add(self, magic(MagicMethodId::Len), vec![], TypeId::NUMBER);
                table.add(self, magic(MagicMethodId::Mul), vec![arg("n", TypeId::NUMBER)], id);
                table.add(self, magic(MagicMethodId::Add), vec![arg("other", id)], id);
                table.add(self, magic(MagicMethodId::GetItem), vec![arg("index", TypeId::NUMBER)], item);
                table.add(
                    self,
                    magic(MagicMethodId::Slice),
                    vec![
                        optional_arg("start", optional_number, ConstValue::Number(0.0)),
                        optional_arg("end", optional_number, ConstValue::Number(0.0)),
                    ],
                    id,
                );
                table.add(self, magic(MagicMethodId::Contains), vec![arg("item", item)], TypeId::BOOL);
                table.add(self, magic(MagicMethodId::Iter), vec![], step);
                for getter in ["get0", "get1", "get2", "get3"] {
                    table.add(self, getter, vec![], item);
                }
            }
            TypeData::Tuple(items) => {
                let step = self.step_function(TypeId::ANY);
                table.add(self, magic(MagicMethodId::Eq), vec![arg("other", id)], TypeId::BOOL);
                table.add(self, magic(MagicMethodId::Lt), vec![arg("other", id)], TypeId::BOOL);
                table.add(self, magic(MagicMethodId::Len), vec![], TypeId::NUMBER);
                table.add(self, magic(MagicMethodId::Mul), vec![arg("n", TypeId::NUMBER)], id);
                table.add(self, magic(MagicMethodId::Contains), vec![arg("item", TypeId::ANY)], TypeId::BOOL);
                table.add(self, magic(MagicMethodId::GetItem), vec![arg("index", TypeId::NUMBER)], TypeId::ANY);
                table.add(self, magic(MagicMethodId::Iter), vec![], step);
                // Getters exist for the first four items and are listed last-first.
                if items.len() <= 4 {
                    for (index, item) in items.iter().enumerate().rev() {
                        table.add(self, &format!("get{index}"), vec![], *item);
                    }
                }
            }
            TypeData::Dict(key, value) => {
                self.add_mapping_methods(&mut table, id, key, value);
                let frozen = self.frozen_dict_of(key, value);
                table.add(self, magic(MagicMethodId::Bmon), vec![], TypeId::ANY);
                table.add(self, magic(MagicMethodId::SetItem), vec![arg("key", key)], value);
                table.add(self, "freeze", vec![], frozen);
            }
            TypeData::FrozenDict(key, value) => {
                self.add_mapping_methods(&mut table, id, key, value);
            }
            _ => {}
        }
        table.entries
    }

    /// Methods shared by `Dict` and `FrozenDict`.
    fn add_mapping_methods(&mut self, table: &mut MethodTable, id: TypeId, key: TypeId, value: TypeId) {
        let optional_value = self.optional_of(value);
        let step = self.step_function(key);
        table.add(self, magic(MagicMethodId::Len), vec![], TypeId::NUMBER);
        table.add(self, magic(MagicMethodId::Eq), vec![arg("other", id)], TypeId::BOOL);
        table.add(self, "getOrNil", vec![arg("key", key)], optional_value);
        table.add(self, "get", vec![arg("key", key), arg("default", value)], value);
        table.add(self, magic(MagicMethodId::GetItem), vec![arg("key", key)], value);
        table.add(self, magic(MagicMethodId::Contains), vec![arg("key", key)], TypeId::BOOL);
        table.add(self, magic(MagicMethodId::Iter), vec![], step);
        table.add(
            self,
            "rget",
            vec![arg("rkey", value), optional_arg("default", key, ConstValue::Nil)],
            key,
        );
    }

    /// `Function[Iteration[item]]`, the shape `__iter__` returns.
    fn step_function(&mut self, item: TypeId) -> TypeId {
        let iteration = self.iteration_of(item);
        self.function_type(FunctionType::new(Vec::new(), iteration))
    }

    // ========================================================================
    // Protocols
    // ========================================================================

    /// The function type describing how a value of this type is called, if it can be.
    ///
    /// ## Notes
    /// - A class is callable when it is neither a trait nor a builtin-backed class. Its signature comes from a
    ///   non-generic `__init__`, else it takes no arguments.
    pub fn as_function_type(&mut self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            TypeData::Function(_) => Some(id),
            TypeData::ClassType(instance) => {
                let instance = *instance;
                if let Some(cached) = self.callables.get(&id) {
                    return *cached;
                }
                let callable = self.constructor_signature(instance);
                self.callables.insert(id, callable);
                callable
            }
            _ => None,
        }
    }

    fn constructor_signature(&mut self, instance: TypeId) -> Option<TypeId> {
        if !self.instance(instance)?.is_instantiable() {
            return None;
        }
        let init = self
            .get_method(instance, magic(MagicMethodId::Init))
            .and_then(|init| self.as_function_type(init.type_id))
            .and_then(|init| self.function(init).cloned())
            .filter(|init| !init.is_generic());
        let signature = match init {
            Some(init) => FunctionType {
                type_parameters: Vec::new(),
                parameters: init.parameters,
                return_type: instance,
                documentation: init.documentation,
            },
            None => FunctionType::new(Vec::new(), instance),
        };
        Some(self.function_type(signature))
    }

    /// The item type a `for` loop over this type binds.
    ///
    /// ## Returns
    /// - `Some(item)` for `Any`, `Iterable[item]`, a step function, or a type whose `__iter__` returns a step
    ///   function.
    /// - `None` when the type is not iterable.
    pub fn get_iter_type(&mut self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            TypeData::Any => return Some(TypeId::ANY),
            TypeData::Iterable(item) => return Some(*item),
            TypeData::Function(_) => {
                if let Some(item) = self.step_item(id) {
                    return Some(item);
                }
            }
            _ => {}
        }
        let getter = self.get_method(id, magic(MagicMethodId::Iter))?;
        let getter = self.as_function_type(getter.type_id)?;
        let getter = self.function(getter)?;
        if getter.is_generic() || !getter.parameters.is_empty() {
            return None;
        }
        let iterator = getter.return_type;
        let iterator = self.as_function_type(iterator)?;
        self.step_item(iterator)
    }

    /// `Some(T)` when `id` is a non-generic, parameterless function returning `Iteration[T]`.
    fn step_item(&self, id: TypeId) -> Option<TypeId> {
        let function = self.function(id)?;
        if function.is_generic() || !function.parameters.is_empty() {
            return None;
        }
        match self.get(function.return_type) {
            TypeData::Iteration(item) => Some(*item),
            _ => None,
        }
    }

    // ========================================================================
    // Narrowing
    // ========================================================================

    /// Type of a value known to be truthy. A truthy step result is the item itself.
    pub fn assume_true(&self, id: TypeId) -> TypeId {
        match self.get(id) {
            TypeData::Iteration(item) => *item,
            _ => id,
        }
    }

    pub fn assume_false(&self, id: TypeId) -> TypeId {
        id
    }

    /// Strip literal knowledge: `Literal` becomes its primitive, a frozen dict literal its backing dict type.
    pub fn to_non_literal(&self, id: TypeId) -> TypeId {
        match self.get(id) {
            TypeData::Literal(literal) => literal.primitive,
            TypeData::FrozenDictLiteral(literal) => literal.backing,
            _ => id,
        }
    }
}

// ============================================================================
// Table building
// ============================================================================

#[derive(Default)]
struct MethodTable {
    entries: IndexMap<String, Variable>,
}

impl MethodTable {
    fn add(&mut self, types: &mut Types, name: &str, parameters: Vec<Parameter>, return_type: TypeId) {
        let function = types.function_type(FunctionType::new(parameters, return_type));
        self.entries
            .insert(name.to_string(), Variable::new(true, builtin_ident(name), function, None));
    }
}

fn arg(name: &str, type_id: TypeId) -> Parameter {
    Parameter::new(builtin_ident(name), type_id, None)
}

fn optional_arg(name: &str, type_id: TypeId, default: ConstValue) -> Parameter {
    Parameter::new(builtin_ident(name), type_id, Some(default))
}
