//! Generic substitution.

use std::collections::{HashMap, HashSet};

use super::store::{BoundInstanceType, FunctionType, TypeData, TypeId, Types};
use super::Parameter;

/// Substitutes type variables with concrete types.
///
/// Only variables in the bind set are rewritten. A bindable variable with no mapping becomes `Never`.
#[derive(Debug, Clone, Default)]
pub struct Binder {
    map: HashMap<TypeId, TypeId>,
    bind_set: HashSet<TypeId>,
}

impl Binder {
    pub fn new(bind_set: impl IntoIterator<Item = TypeId>) -> Self {
        Self {
            map: HashMap::new(),
            bind_set: bind_set.into_iter().collect(),
        }
    }

    /// Binder mapping a generic instance's type parameters to the bound instance's arguments, pairwise.
    pub fn for_bound_instance(types: &Types, bound: &BoundInstanceType) -> Self {
        let type_parameters = types
            .instance(bound.instance)
            .map(|instance| instance.type_parameters.clone())
            .unwrap_or_default();
        let mut binder = Self::new(type_parameters.iter().copied());
        for (variable, arg) in type_parameters.iter().zip(&bound.args) {
            binder.map.insert(*variable, *arg);
        }
        binder
    }

    pub fn is_bindable(&self, variable: TypeId) -> bool {
        self.bind_set.contains(&variable)
    }

    pub fn get(&self, variable: TypeId) -> Option<TypeId> {
        self.map.get(&variable).copied()
    }

    pub fn insert(&mut self, variable: TypeId, type_id: TypeId) {
        self.map.insert(variable, type_id);
    }

    pub fn bind(&self, types: &mut Types, id: TypeId) -> TypeId {
        match types.get(id) {
            TypeData::List(item) => {
                let item = *item;
                let item = self.bind(types, item);
                types.list_of(item)
            }
            TypeData::FrozenList(item) => {
                let item = *item;
                let item = self.bind(types, item);
                types.frozen_list_of(item)
            }
            TypeData::Iterable(item) => {
                let item = *item;
                let item = self.bind(types, item);
                types.iterable_of(item)
            }
            TypeData::Iteration(item) => {
                let item = *item;
                let item = self.bind(types, item);
                types.iteration_of(item)
            }
            TypeData::Dict(key, value) => {
                let (key, value) = (*key, *value);
                let key = self.bind(types, key);
                let value = self.bind(types, value);
                types.dict_of(key, value)
            }
            TypeData::FrozenDict(key, value) => {
                let (key, value) = (*key, *value);
                let key = self.bind(types, key);
                let value = self.bind(types, value);
                types.frozen_dict_of(key, value)
            }
            TypeData::Union(members) => {
                let members = members.clone();
                let members = members.into_iter().map(|member| self.bind(types, member)).collect();
                types.union_of(members)
            }
            TypeData::Function(function) => {
                let function = function.clone();
                let parameters = function
                    .parameters
                    .into_iter()
                    .map(|p| {
                        let type_id = self.bind(types, p.type_id);
                        Parameter { type_id, ..p }
                    })
                    .collect();
                let return_type = self.bind(types, function.return_type);
                types.function_type(FunctionType {
                    type_parameters: function.type_parameters,
                    parameters,
                    return_type,
                    documentation: None,
                })
            }
            TypeData::TypeVariable(_) => {
                if self.is_bindable(id) {
                    self.get(id).unwrap_or(TypeId::NEVER)
                } else {
                    id
                }
            }
            _ => id,
        }
    }
}
