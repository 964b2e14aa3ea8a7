//! The type arena and the shapes it stores.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use mtots_syntax::ast::Ident;
use mtots_syntax::position::Location;

use super::{ConstValue, Parameter, Variable};

// ============================================================================
// Handles
// ============================================================================

/// Handle to a type in a [`Types`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    // Reserved ids, allocated in this order by `Types::new`.
    pub const ANY: TypeId = TypeId(0);
    pub const NEVER: TypeId = TypeId(1);
    pub const NIL: TypeId = TypeId(2);
    pub const BOOL: TypeId = TypeId(3);
    pub const NUMBER: TypeId = TypeId(4);
    pub const STRING: TypeId = TypeId(5);
    /// Sentinel a step function returns when iteration is over.
    pub const STOP_ITERATION: TypeId = TypeId(6);
    /// The `Class` metatype every class metatype is assignable to.
    pub const CLASS: TypeId = TypeId(7);
    /// `List` written without arguments. Behaves like `List[Any]` but renders as `List`, and list displays
    /// checked against it are not narrowed.
    pub const UNTYPED_LIST: TypeId = TypeId(8);

    const PRIMITIVES: [TypeId; 5] = [
        TypeId::NIL,
        TypeId::BOOL,
        TypeId::NUMBER,
        TypeId::STRING,
        TypeId::STOP_ITERATION,
    ];

    pub fn index(self) -> u32 {
        self.0
    }
}

/// Identity of one solved module. A module re-solved from scratch gets a new key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleKey(u64);

static NEXT_MODULE_KEY: AtomicU64 = AtomicU64::new(1);

impl ModuleKey {
    pub fn fresh() -> Self {
        Self(NEXT_MODULE_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

// ============================================================================
// Shapes
// ============================================================================

/// One node of the type universe.
#[derive(Debug, Clone)]
pub enum TypeData {
    Any,
    Never,
    Primitive(PrimitiveType),
    Literal(LiteralType),
    /// Metatype of a primitive; its methods are the primitive's static methods.
    PrimitiveTypeType(TypeId),
    Module(ModuleType),
    Instance(InstanceType),
    BoundInstance(BoundInstanceType),
    /// Metatype of a class or trait (`class Foo`).
    ClassType(TypeId),
    ClassTypeType,
    TypeVariable(TypeVariable),
    /// Metatype of a type variable (`typevar T`).
    TypeVariableType(TypeId),
    Iteration(TypeId),
    Iterable(TypeId),
    List(TypeId),
    FrozenList(TypeId),
    Tuple(Vec<TypeId>),
    Dict(TypeId, TypeId),
    FrozenDict(TypeId, TypeId),
    FrozenDictLiteral(FrozenDictLiteralType),
    Function(FunctionType),
    /// Always canonical; build through [`Types::union_of`].
    Union(Vec<TypeId>),
}

#[derive(Debug, Clone)]
pub struct PrimitiveType {
    pub name: &'static str,
    /// Filled in while solving `__builtin__`, from the class of the same name.
    pub methods: IndexMap<String, Variable>,
    pub static_methods: IndexMap<String, Variable>,
    pub type_type: TypeId,
}

#[derive(Debug, Clone)]
pub struct LiteralType {
    pub primitive: TypeId,
    pub value: ConstValue,
}

/// The type of an imported module value.
#[derive(Debug, Clone)]
pub struct ModuleType {
    pub key: ModuleKey,
    pub name: String,
    /// The whole source file of the module.
    pub location: Location,
    pub documentation: Option<String>,
    /// The module's own top-level bindings.
    pub globals: Arc<IndexMap<String, Variable>>,
    /// Builtin bindings the module saw; consulted after `globals` by scope-style lookups.
    pub builtins: Arc<IndexMap<String, Variable>>,
}

impl ModuleType {
    /// Scope-style lookup: own bindings, then builtins.
    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.globals.get(name).or_else(|| self.builtins.get(name))
    }
}

/// A class or trait.
#[derive(Debug, Clone)]
pub struct InstanceType {
    pub is_trait: bool,
    pub identifier: Ident,
    /// Type variables, in declaration order.
    pub type_parameters: Vec<TypeId>,
    /// Each base is an instance or a bound instance.
    pub bases: Vec<TypeId>,
    pub documentation: Option<String>,
    pub class_type: TypeId,
    pub fields: IndexMap<String, Variable>,
    pub methods: IndexMap<String, Variable>,
    pub static_methods: IndexMap<String, Variable>,
    /// For the `__builtin__` classes that back a primitive.
    pub builtin: Option<TypeId>,
}

impl InstanceType {
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    pub fn is_instantiable(&self) -> bool {
        !self.is_trait && self.builtin.is_none()
    }
}

/// A generic instance applied to type arguments.
#[derive(Debug, Clone)]
pub struct BoundInstanceType {
    pub instance: TypeId,
    pub args: Vec<TypeId>,
}

#[derive(Debug, Clone)]
pub struct TypeVariable {
    pub identifier: Ident,
    pub bound: Option<TypeId>,
    pub type_type: TypeId,
}

#[derive(Debug, Clone)]
pub struct FrozenDictLiteralType {
    pub backing: TypeId,
    /// Statically known string keys, usable as fields.
    pub fields: IndexMap<String, Variable>,
}

#[derive(Debug, Clone)]
pub struct FunctionType {
    /// Type variables, in declaration order.
    pub type_parameters: Vec<TypeId>,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeId,
    pub documentation: Option<String>,
}

impl FunctionType {
    pub fn new(parameters: Vec<Parameter>, return_type: TypeId) -> Self {
        Self {
            type_parameters: Vec::new(),
            parameters,
            return_type,
            documentation: None,
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    pub fn max_argc(&self) -> usize {
        self.parameters.len()
    }

    /// Parameters without a default.
    pub fn min_argc(&self) -> usize {
        self.parameters.len() - self.optional_argc()
    }

    pub fn optional_argc(&self) -> usize {
        self.parameters.iter().filter(|p| p.default.is_some()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Derived {
    List,
    FrozenList,
    Iteration,
    Iterable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum MemberKind {
    Field,
    Method,
}

// ============================================================================
// Arena
// ============================================================================

/// The type arena.
///
/// Cloning copies the whole arena; ids stay valid in the clone.
#[derive(Debug, Clone)]
pub struct Types {
    data: Vec<TypeData>,
    derived: HashMap<(TypeId, Derived), TypeId>,
    dicts: HashMap<(TypeId, TypeId, bool), TypeId>,
    /// Synthesized method tables of container shapes.
    pub(super) member_tables: HashMap<TypeId, Arc<IndexMap<String, Variable>>>,
    /// Members of bound instances, bound on first request.
    pub(super) bound_members: HashMap<(TypeId, MemberKind, String), Option<Variable>>,
    /// Callable views of class metatypes.
    pub(super) callables: HashMap<TypeId, Option<TypeId>>,
}

impl Default for Types {
    fn default() -> Self {
        Self::new()
    }
}

impl Types {
    pub fn new() -> Self {
        let mut types = Self {
            data: Vec::new(),
            derived: HashMap::new(),
            dicts: HashMap::new(),
            member_tables: HashMap::new(),
            bound_members: HashMap::new(),
            callables: HashMap::new(),
        };
        types.alloc(TypeData::Any);
        types.alloc(TypeData::Never);
        for name in ["nil", "Bool", "Number", "String", "StopIteration"] {
            types.alloc(TypeData::Primitive(PrimitiveType {
                name,
                methods: IndexMap::new(),
                static_methods: IndexMap::new(),
                type_type: TypeId::ANY,
            }));
        }
        types.alloc(TypeData::ClassTypeType);
        types.alloc(TypeData::List(TypeId::ANY));
        for primitive in TypeId::PRIMITIVES {
            let type_type = types.alloc(TypeData::PrimitiveTypeType(primitive));
            if let Some(data) = types.primitive_mut(primitive) {
                data.type_type = type_type;
            }
        }
        types
    }

    fn alloc(&mut self, data: TypeData) -> TypeId {
        let id = TypeId(self.data.len() as u32);
        self.data.push(data);
        id
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drop every type allocated at or after `len`, along with the memo entries that mention one.
    ///
    /// Nothing still in use may hold a dropped id. Types are never mutated after the solve that allocated them,
    /// so cutting back to a length recorded between two solves leaves the earlier solves intact.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.data.len() {
            return;
        }
        self.data.truncate(len);
        let live = move |id: TypeId| (id.0 as usize) < len;
        self.derived.retain(|(item, _), id| live(*item) && live(*id));
        self.dicts.retain(|(key, value, _), id| live(*key) && live(*value) && live(*id));
        self.member_tables
            .retain(|owner, members| live(*owner) && members.values().all(|member| live(member.type_id)));
        self.bound_members
            .retain(|(owner, _, _), member| live(*owner) && member.as_ref().is_none_or(|m| live(m.type_id)));
        self.callables
            .retain(|owner, view| live(*owner) && view.is_none_or(|v| live(v)));
    }

    pub fn get(&self, id: TypeId) -> &TypeData {
        &self.data[id.0 as usize]
    }

    // ------------------------------------------------------------------------
    // Typed accessors
    // ------------------------------------------------------------------------

    pub fn instance(&self, id: TypeId) -> Option<&InstanceType> {
        match self.get(id) {
            TypeData::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn instance_mut(&mut self, id: TypeId) -> Option<&mut InstanceType> {
        match &mut self.data[id.0 as usize] {
            TypeData::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn primitive(&self, id: TypeId) -> Option<&PrimitiveType> {
        match self.get(id) {
            TypeData::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    pub fn primitive_mut(&mut self, id: TypeId) -> Option<&mut PrimitiveType> {
        match &mut self.data[id.0 as usize] {
            TypeData::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    /// The function shape stored at `id` itself (not a callable view; see [`Types::as_function_type`]).
    pub fn function(&self, id: TypeId) -> Option<&FunctionType> {
        match self.get(id) {
            TypeData::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn type_variable(&self, id: TypeId) -> Option<&TypeVariable> {
        match self.get(id) {
            TypeData::TypeVariable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn module_type(&self, id: TypeId) -> Option<&ModuleType> {
        match self.get(id) {
            TypeData::Module(module) => Some(module),
            _ => None,
        }
    }

    pub fn is_class_type(&self, id: TypeId) -> bool {
        matches!(self.get(id), TypeData::ClassType(_))
    }

    pub fn is_module_type(&self, id: TypeId) -> bool {
        matches!(self.get(id), TypeData::Module(_))
    }

    /// `Some` for a trait.
    pub fn trait_instance(&self, id: TypeId) -> Option<&InstanceType> {
        self.instance(id).filter(|instance| instance.is_trait)
    }

    // ------------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------------

    pub fn literal(&mut self, primitive: TypeId, value: ConstValue) -> TypeId {
        self.alloc(TypeData::Literal(LiteralType { primitive, value }))
    }

    fn derived(&mut self, item: TypeId, kind: Derived) -> TypeId {
        if let Some(id) = self.derived.get(&(item, kind)) {
            return *id;
        }
        let id = self.alloc(match kind {
            Derived::List => TypeData::List(item),
            Derived::FrozenList => TypeData::FrozenList(item),
            Derived::Iteration => TypeData::Iteration(item),
            Derived::Iterable => TypeData::Iterable(item),
        });
        self.derived.insert((item, kind), id);
        id
    }

    pub fn list_of(&mut self, item: TypeId) -> TypeId {
        self.derived(item, Derived::List)
    }

    pub fn frozen_list_of(&mut self, item: TypeId) -> TypeId {
        self.derived(item, Derived::FrozenList)
    }

    pub fn iteration_of(&mut self, item: TypeId) -> TypeId {
        self.derived(item, Derived::Iteration)
    }

    pub fn iterable_of(&mut self, item: TypeId) -> TypeId {
        self.derived(item, Derived::Iterable)
    }

    pub fn dict_of(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.dict_like(key, value, false)
    }

    pub fn frozen_dict_of(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.dict_like(key, value, true)
    }

    fn dict_like(&mut self, key: TypeId, value: TypeId, frozen: bool) -> TypeId {
        if let Some(id) = self.dicts.get(&(key, value, frozen)) {
            return *id;
        }
        let id = self.alloc(if frozen {
            TypeData::FrozenDict(key, value)
        } else {
            TypeData::Dict(key, value)
        });
        self.dicts.insert((key, value, frozen), id);
        id
    }

    pub fn tuple_of(&mut self, items: Vec<TypeId>) -> TypeId {
        self.alloc(TypeData::Tuple(items))
    }

    pub fn function_type(&mut self, function: FunctionType) -> TypeId {
        self.alloc(TypeData::Function(function))
    }

    pub fn module(&mut self, module: ModuleType) -> TypeId {
        self.alloc(TypeData::Module(module))
    }

    pub fn bound_instance(&mut self, instance: TypeId, args: Vec<TypeId>) -> TypeId {
        self.alloc(TypeData::BoundInstance(BoundInstanceType { instance, args }))
    }

    pub fn frozen_dict_literal(&mut self, backing: TypeId, fields: IndexMap<String, Variable>) -> TypeId {
        self.alloc(TypeData::FrozenDictLiteral(FrozenDictLiteralType { backing, fields }))
    }

    /// Store an already canonical member list.
    pub(super) fn union_raw(&mut self, members: Vec<TypeId>) -> TypeId {
        self.alloc(TypeData::Union(members))
    }

    /// Create a class or trait together with its metatype. Members are added later through
    /// [`Types::instance_mut`].
    pub fn new_instance(
        &mut self,
        is_trait: bool,
        identifier: Ident,
        type_parameters: Vec<TypeId>,
        bases: Vec<TypeId>,
        documentation: Option<String>,
        builtin: Option<TypeId>,
    ) -> TypeId {
        let id = self.alloc(TypeData::Instance(InstanceType {
            is_trait,
            identifier,
            type_parameters,
            bases,
            documentation,
            class_type: TypeId::ANY,
            fields: IndexMap::new(),
            methods: IndexMap::new(),
            static_methods: IndexMap::new(),
            builtin,
        }));
        let class_type = self.alloc(TypeData::ClassType(id));
        if let Some(instance) = self.instance_mut(id) {
            instance.class_type = class_type;
        }
        id
    }

    /// Create a type variable together with its metatype.
    pub fn new_type_variable(&mut self, identifier: Ident, bound: Option<TypeId>) -> TypeId {
        let id = self.alloc(TypeData::TypeVariable(TypeVariable {
            identifier,
            bound,
            type_type: TypeId::ANY,
        }));
        let type_type = self.alloc(TypeData::TypeVariableType(id));
        if let TypeData::TypeVariable(variable) = &mut self.data[id.0 as usize] {
            variable.type_type = type_type;
        }
        id
    }

    /// The binding a class, trait or type variable introduces into scope.
    ///
    /// ## Returns
    /// - `Some(Variable)` whose type is the metatype of `id`.
    /// - `None` for any other shape.
    pub fn as_variable(&self, id: TypeId) -> Option<Variable> {
        match self.get(id) {
            TypeData::Instance(instance) => Some(Variable::new(
                true,
                instance.identifier.clone(),
                instance.class_type,
                instance.documentation.clone(),
            )),
            TypeData::TypeVariable(variable) => Some(Variable::new(
                true,
                variable.identifier.clone(),
                variable.type_type,
                None,
            )),
            _ => None,
        }
    }
}
