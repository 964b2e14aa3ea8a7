//! Structural equality, assignability, merging and union canonicalization.
//!
//! ## Notes
//!
//! - Assignability is a fixed list of rules where the first rule that applies decides. It is not a unifier:
//!   type variables only relate to themselves (and through their bound, for member lookup).
//! - [`Types::union_of`] is the only way a `Union` is built, so every stored union is canonical.

use super::store::{TypeData, TypeId, Types};

impl Types {
    /// Structural equality. Class-like shapes, literals and type variables compare by identity.
    pub fn equals(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        match (self.get(a), self.get(b)) {
            (TypeData::List(x), TypeData::List(y))
            | (TypeData::FrozenList(x), TypeData::FrozenList(y))
            | (TypeData::Iterable(x), TypeData::Iterable(y))
            | (TypeData::Iteration(x), TypeData::Iteration(y)) => self.equals(*x, *y),
            (TypeData::Dict(k1, v1), TypeData::Dict(k2, v2))
            | (TypeData::FrozenDict(k1, v1), TypeData::FrozenDict(k2, v2)) => {
                self.equals(*k1, *k2) && self.equals(*v1, *v2)
            }
            (TypeData::Tuple(xs), TypeData::Tuple(ys)) | (TypeData::Union(xs), TypeData::Union(ys)) => {
                self.all_equal(xs, ys)
            }
            (TypeData::BoundInstance(x), TypeData::BoundInstance(y)) => {
                x.instance == y.instance && self.all_equal(&x.args, &y.args)
            }
            (TypeData::Module(x), TypeData::Module(y)) => x.key == y.key,
            (TypeData::Function(f), TypeData::Function(g)) => {
                f.type_parameters == g.type_parameters
                    && f.parameters.len() == g.parameters.len()
                    && f
                        .parameters
                        .iter()
                        .zip(&g.parameters)
                        .all(|(p, q)| self.equals(p.type_id, q.type_id))
                    && self.equals(f.return_type, g.return_type)
            }
            _ => false,
        }
    }

    fn all_equal(&self, xs: &[TypeId], ys: &[TypeId]) -> bool {
        xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| self.equals(*x, *y))
    }

    /// Whether a value of type `source` may be used where `target` is expected.
    ///
    /// Takes `&mut self` because answering may synthesize container methods or callable views.
    pub fn is_assignable(&mut self, source: TypeId, target: TypeId) -> bool {
        if let TypeData::Literal(literal) = self.get(source) {
            let primitive = literal.primitive;
            return self.is_assignable(primitive, target);
        }
        if target == TypeId::ANY || source == TypeId::NEVER || self.equals(source, target) {
            return true;
        }
        // A target union is matched whole before a source union is split, so `A|B` only fits a
        // target union through one of its members.
        if let TypeData::Union(members) = self.get(target) {
            let members = members.clone();
            return members.into_iter().any(|member| self.is_assignable(source, member));
        }
        if let TypeData::Union(members) = self.get(source) {
            let members = members.clone();
            return members.into_iter().all(|member| self.is_assignable(member, target));
        }
        if let TypeData::Iteration(target_item) = self.get(target) {
            let target_item = *target_item;
            if self.equals(source, TypeId::STOP_ITERATION) {
                return true;
            }
            if let TypeData::Iteration(source_item) = self.get(source) {
                let source_item = *source_item;
                return self.is_assignable(source_item, target_item);
            }
            return self.is_assignable(source, target_item);
        }
        if target == TypeId::CLASS && self.is_class_type(source) {
            return true;
        }
        if let TypeData::Iterable(target_item) = self.get(target) {
            let target_item = *target_item;
            return match self.get_iter_type(source) {
                Some(item) => self.is_assignable(item, target_item),
                None => false,
            };
        }
        if let TypeData::Function(expected) = self.get(target) {
            if expected.is_generic() {
                return false;
            }
            let expected = expected.clone();
            let Some(actual) = self.as_function_type(source) else {
                return false;
            };
            let Some(actual) = self.function(actual).cloned() else {
                return false;
            };
            if expected.max_argc() > actual.max_argc() || expected.min_argc() < actual.min_argc() {
                return false;
            }
            if !self.is_assignable(actual.return_type, expected.return_type) {
                return false;
            }
            return expected
                .parameters
                .iter()
                .zip(&actual.parameters)
                .all(|(e, a)| self.is_assignable(e.type_id, a.type_id));
        }
        if let Some(required) = self.trait_instance(target) {
            let required: Vec<_> = required.methods.values().cloned().collect();
            for spec in required {
                let Some(method) = self.get_method(source, spec.name()) else {
                    return false;
                };
                if !self.is_assignable(method.type_id, spec.type_id) {
                    return false;
                }
            }
            return true;
        }
        if let (TypeData::FrozenDict(..), TypeData::FrozenDictLiteral(literal)) =
            (self.get(target), self.get(source))
        {
            let backing = literal.backing;
            return self.is_assignable(backing, target);
        }
        if let Some(instance) = self.instance(source) {
            let bases = instance.bases.clone();
            return bases.into_iter().any(|base| self.is_assignable(base, target));
        }
        false
    }

    /// Unify the types of two branches: the broader of the two, else `Any`.
    pub fn merge(&mut self, a: TypeId, b: TypeId) -> TypeId {
        let lhs = self.to_non_literal(a);
        let rhs = self.to_non_literal(b);
        if self.is_assignable(lhs, rhs) {
            rhs
        } else if self.is_assignable(rhs, lhs) {
            lhs
        } else {
            TypeId::ANY
        }
    }

    /// Build a canonical union.
    ///
    /// ## Notes
    /// - Candidates are taken from the end of `types` first. Nested unions are flattened in place.
    /// - Any `Any` member makes the whole union `Any`; `Never` members disappear.
    /// - A candidate assignable to an accepted member is dropped; accepted members assignable to the candidate
    ///   are evicted. Of the surviving members, those with the same rendering are kept once.
    /// - Survivors are sorted by rendering. No survivors yields `Never`, one yields itself.
    pub fn union_of(&mut self, mut types: Vec<TypeId>) -> TypeId {
        let mut accepted: Vec<Option<(TypeId, String)>> = Vec::new();
        while let Some(entry) = types.pop() {
            match self.get(entry) {
                TypeData::Any => return TypeId::ANY,
                TypeData::Never => continue,
                TypeData::Union(members) => {
                    types.extend(members.iter().copied());
                    continue;
                }
                _ => {}
            }
            let mut subsumed = false;
            for (member, _) in accepted.iter().flatten() {
                if self.is_assignable(entry, *member) {
                    subsumed = true;
                    break;
                }
            }
            if subsumed {
                continue;
            }
            for slot in accepted.iter_mut() {
                if let Some((member, _)) = slot {
                    if self.is_assignable(*member, entry) {
                        *slot = None;
                    }
                }
            }
            let rendered = self.render(entry);
            if !accepted.iter().flatten().any(|(_, r)| *r == rendered) {
                accepted.push(Some((entry, rendered)));
            }
        }
        let mut members: Vec<(TypeId, String)> = accepted.into_iter().flatten().collect();
        members.sort_by(|a, b| a.1.cmp(&b.1));
        match members.len() {
            0 => TypeId::NEVER,
            1 => members[0].0,
            _ => self.union_raw(members.into_iter().map(|(member, _)| member).collect()),
        }
    }

    /// `T?`, which is `Union[T, nil]`.
    pub fn optional_of(&mut self, id: TypeId) -> TypeId {
        self.union_of(vec![id, TypeId::NIL])
    }
}
