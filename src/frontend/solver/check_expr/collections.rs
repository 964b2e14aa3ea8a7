//! List, tuple and dict displays.

use indexmap::IndexMap;
use mtots_syntax::ast::{Expr, Expression, Ident};

use super::super::Solver;
use crate::frontend::ir::{ConstValue, TypeData, TypeId, Variable};

impl Solver<'_> {
    /// Solve display items that share one item type.
    ///
    /// ## Returns
    /// The shared type and each item's own type. The shared type is the hint if every item fits it, else the first
    /// item's type if every later item fits that, else `Any`. Without a hint, the first item's widened type serves
    /// as the hint for the rest.
    pub(super) fn solve_homogeneous<'e>(
        &mut self,
        items: impl IntoIterator<Item = &'e Expression>,
        hint: Option<TypeId>,
    ) -> (TypeId, Vec<TypeId>) {
        let mut item_types = Vec::new();
        let mut rest = items.into_iter();
        let bound = match hint {
            Some(hint) => hint,
            None => match rest.next() {
                None => TypeId::NEVER,
                Some(first) => {
                    let first_type = self.solve_expr(first, None);
                    item_types.push(first_type);
                    self.types.to_non_literal(first_type)
                }
            },
        };
        let mut all_in_bound = true;
        for item in rest {
            let item_type = self.solve_expr(item, Some(bound));
            if !self.types.is_assignable(item_type, bound) {
                all_in_bound = false;
            }
            item_types.push(item_type);
        }
        if all_in_bound {
            return (bound, item_types);
        }
        let first = item_types[0];
        for item_type in &item_types[1..] {
            if !self.types.is_assignable(*item_type, first) {
                return (TypeId::ANY, item_types);
            }
        }
        (first, item_types)
    }

    pub(super) fn solve_list(&mut self, items: &[Expression], hint: Option<TypeId>) -> TypeId {
        if hint == Some(TypeId::UNTYPED_LIST) {
            for item in items {
                self.solve_expr(item, None);
            }
            return TypeId::UNTYPED_LIST;
        }
        let item_hint = hint.and_then(|hint| match self.types.get(hint) {
            TypeData::List(item) => Some(*item),
            _ => None,
        });
        let (item, _) = self.solve_homogeneous(items, item_hint);
        self.types.list_of(item)
    }

    pub(super) fn solve_frozen_list(&mut self, items: &[Expression], hint: Option<TypeId>) -> TypeId {
        let item_hint = hint.and_then(|hint| match self.types.get(hint) {
            TypeData::List(item) | TypeData::FrozenList(item) => Some(*item),
            _ => None,
        });
        let (item, _) = self.solve_homogeneous(items, item_hint);
        self.types.frozen_list_of(item)
    }

    pub(super) fn solve_tuple(&mut self, items: &[Expression], hint: Option<TypeId>) -> TypeId {
        let item_hints = match hint.map(|hint| self.types.get(hint)) {
            Some(TypeData::Tuple(hints)) if hints.len() == items.len() => hints.clone(),
            _ => Vec::new(),
        };
        let item_types = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.solve_expr(item, item_hints.get(i).copied()))
            .collect();
        self.types.tuple_of(item_types)
    }

    fn dict_hint(&self, hint: Option<TypeId>, frozen: bool) -> (Option<TypeId>, Option<TypeId>) {
        match hint.map(|hint| self.types.get(hint)) {
            Some(TypeData::Dict(key, value)) if !frozen => (Some(*key), Some(*value)),
            Some(TypeData::FrozenDict(key, value)) if frozen => (Some(*key), Some(*value)),
            _ => (None, None),
        }
    }

    pub(super) fn solve_dict(&mut self, pairs: &[(Expression, Expression)], hint: Option<TypeId>) -> TypeId {
        let (key_hint, value_hint) = self.dict_hint(hint, false);
        let (key, _) = self.solve_homogeneous(pairs.iter().map(|(key, _)| key), key_hint);
        let (value, _) = self.solve_homogeneous(pairs.iter().map(|(_, value)| value), value_hint);
        self.types.dict_of(key, value)
    }

    /// A frozen dict display also records each string key as a final field, narrowed to a literal when the value is
    /// a primitive constant, so `d.key` and hover on the key work.
    pub(super) fn solve_frozen_dict(&mut self, pairs: &[(Expression, Expression)], hint: Option<TypeId>) -> TypeId {
        let (key_hint, value_hint) = self.dict_hint(hint, true);
        let (key, _) = self.solve_homogeneous(pairs.iter().map(|(key, _)| key), key_hint);
        let (value, value_types) = self.solve_homogeneous(pairs.iter().map(|(_, value)| value), value_hint);
        let backing = self.types.frozen_dict_of(key, value);

        let mut fields = IndexMap::new();
        for ((key_expr, value_expr), value_type) in pairs.iter().zip(value_types) {
            let Some(ConstValue::String(name)) = self.solve_const_expr(key_expr) else {
                continue;
            };
            let mut field_type = value_type;
            if matches!(self.types.get(field_type), TypeData::Primitive(_)) {
                if let Some(value) = self.solve_const_expr(value_expr) {
                    field_type = self.types.literal(field_type, value);
                }
            }
            let variable = Variable::new(
                true,
                Ident::synthetic(name.clone(), key_expr.location.clone()),
                field_type,
                None,
            );
            if let Expr::String(literal) = &key_expr.node {
                let identifier = Ident::synthetic(literal.clone(), key_expr.location.clone());
                self.declare_usage(&identifier, &variable);
            }
            fields.insert(name, variable);
        }
        self.types.frozen_dict_literal(backing, fields)
    }
}
