use indexmap::IndexMap;
use mtots_syntax::position::{Location, Position, Range, SourceId};
use proptest::prelude::*;

use super::*;

fn ident(name: &str) -> Ident {
    let start = Position::new(0, 0, 0);
    let location = Location::new(SourceId::new("test.mtots"), Range::new(start, start));
    Ident::synthetic(name, location)
}

fn method(types: &mut Types, name: &str, parameters: Vec<(&str, TypeId)>, return_type: TypeId) -> Variable {
    let parameters = parameters
        .into_iter()
        .map(|(n, t)| Parameter::new(ident(n), t, None))
        .collect();
    let function = types.function_type(FunctionType::new(parameters, return_type));
    Variable::new(true, ident(name), function, None)
}

/// `class Box[T]` with a `value T` field and a `get() T` method.
fn generic_box(types: &mut Types) -> (TypeId, TypeId) {
    let t = types.new_type_variable(ident("T"), None);
    let instance = types.new_instance(false, ident("Box"), vec![t], vec![], None, None);
    let get = method(types, "get", vec![], t);
    let box_type = types.instance_mut(instance).expect("instance");
    box_type
        .fields
        .insert("value".to_string(), Variable::new(false, ident("value"), t, None));
    box_type.methods.insert("get".to_string(), get);
    (instance, t)
}

#[test]
fn reserved_ids_render() {
    let types = Types::new();
    let rendered: Vec<String> = [
        TypeId::ANY,
        TypeId::NEVER,
        TypeId::NIL,
        TypeId::BOOL,
        TypeId::NUMBER,
        TypeId::STRING,
        TypeId::STOP_ITERATION,
        TypeId::CLASS,
        TypeId::UNTYPED_LIST,
    ]
    .iter()
    .map(|id| types.render(*id))
    .collect();
    insta::assert_snapshot!(rendered.join(" "), @"Any Never nil Bool Number String StopIteration Class List");
}

#[test]
fn derived_types_are_memoized() {
    let mut types = Types::new();
    assert_eq!(types.list_of(TypeId::NUMBER), types.list_of(TypeId::NUMBER));
    assert_eq!(
        types.dict_of(TypeId::STRING, TypeId::NUMBER),
        types.dict_of(TypeId::STRING, TypeId::NUMBER)
    );
    let any_list = types.list_of(TypeId::ANY);
    assert_ne!(any_list, TypeId::UNTYPED_LIST);
    assert!(types.equals(any_list, TypeId::UNTYPED_LIST));
}

#[test]
fn union_canonicalization() {
    let mut types = Types::new();
    assert_eq!(types.union_of(vec![TypeId::NUMBER, TypeId::NUMBER]), TypeId::NUMBER);
    assert_eq!(types.union_of(vec![TypeId::ANY, TypeId::NUMBER]), TypeId::ANY);
    assert_eq!(types.union_of(vec![]), TypeId::NEVER);
    assert_eq!(types.union_of(vec![TypeId::NEVER, TypeId::STRING]), TypeId::STRING);

    let union = types.union_of(vec![TypeId::STRING, TypeId::NUMBER, TypeId::NUMBER]);
    match types.get(union) {
        TypeData::Union(members) => assert_eq!(members, &vec![TypeId::NUMBER, TypeId::STRING]),
        other => panic!("expected union, got {other:?}"),
    }

    // Nested unions flatten and the literal is subsumed by its primitive.
    let one = types.literal(TypeId::NUMBER, ConstValue::Number(1.0));
    let flat = types.union_of(vec![one, union]);
    assert!(types.equals(flat, union));
}

#[test]
fn optional_renders_with_question_mark() {
    let mut types = Types::new();
    let optional = types.optional_of(TypeId::NUMBER);
    assert_eq!(types.render(optional), "Number?");
    let either = types.union_of(vec![TypeId::STRING, TypeId::NIL, TypeId::NUMBER]);
    assert_eq!(types.render(either), "Number|String?");
}

#[test]
fn union_assignability_is_disjunctive_on_target_and_conjunctive_on_source() {
    let mut types = Types::new();
    let either = types.union_of(vec![TypeId::STRING, TypeId::NUMBER]);
    assert!(types.is_assignable(TypeId::NUMBER, either));
    assert!(!types.is_assignable(either, TypeId::NUMBER));
    assert!(!types.is_assignable(TypeId::BOOL, either));
}

#[test]
fn target_union_is_matched_before_source_union_is_split() {
    let mut types = Types::new();
    let narrow = types.union_of(vec![TypeId::NUMBER, TypeId::STRING]);
    let wide = types.union_of(vec![TypeId::BOOL, TypeId::NUMBER, TypeId::STRING]);
    assert!(!types.is_assignable(narrow, wide));
    assert!(types.is_assignable(narrow, narrow));
    assert!(types.is_assignable(TypeId::NUMBER, wide));
}

#[test]
fn literals_assign_through_their_primitive() {
    let mut types = Types::new();
    let one = types.literal(TypeId::NUMBER, ConstValue::Number(1.0));
    assert!(types.is_assignable(one, TypeId::NUMBER));
    assert!(!types.is_assignable(one, TypeId::STRING));
    assert_eq!(types.to_non_literal(one), TypeId::NUMBER);
}

#[test]
fn iteration_accepts_bare_values_and_stop_iteration() {
    let mut types = Types::new();
    let step = types.iteration_of(TypeId::NUMBER);
    assert!(types.is_assignable(TypeId::STOP_ITERATION, step));
    assert!(types.is_assignable(TypeId::NUMBER, step));
    assert!(!types.is_assignable(TypeId::STRING, step));
    assert_eq!(types.assume_true(step), TypeId::NUMBER);
}

#[test]
fn list_iterates_its_items_and_is_iterable() {
    let mut types = Types::new();
    let list = types.list_of(TypeId::STRING);
    assert_eq!(types.get_iter_type(list), Some(TypeId::STRING));
    let iterable = types.iterable_of(TypeId::STRING);
    assert!(types.is_assignable(list, iterable));
    let numbers = types.iterable_of(TypeId::NUMBER);
    assert!(!types.is_assignable(list, numbers));
    assert_eq!(types.get_iter_type(TypeId::NUMBER), None);
}

#[test]
fn list_methods_follow_item_type() {
    let mut types = Types::new();
    let nested = types.list_of(TypeId::NUMBER);
    let outer = types.list_of(nested);
    let names = types.method_names(outer);
    assert_eq!(names.first().map(String::as_str), Some("__bmon__"));
    assert_eq!(names.last().map(String::as_str), Some("flatten"));

    let pop = types.get_method(nested, "pop").expect("pop");
    let pop = types.function(pop.type_id).expect("function");
    assert_eq!(pop.return_type, TypeId::NUMBER);
    assert!(types.get_method(nested, "flatten").is_none());
}

#[test]
fn tuple_getters_follow_arity() {
    let mut types = Types::new();
    let pair = types.tuple_of(vec![TypeId::NUMBER, TypeId::STRING]);
    let get1 = types.get_method(pair, "get1").expect("get1");
    assert_eq!(types.function(get1.type_id).map(|f| f.return_type), Some(TypeId::STRING));
    assert!(types.get_method(pair, "get2").is_none());
    assert_eq!(types.render(pair), "Tuple[Number, String]");
}

#[test]
fn binding_a_generic_list() {
    let mut types = Types::new();
    let t = types.new_type_variable(ident("T"), None);
    let list = types.list_of(t);
    let mut binder = Binder::new([t]);
    binder.insert(t, TypeId::NUMBER);
    let bound = binder.bind(&mut types, list);
    assert_eq!(bound, types.list_of(TypeId::NUMBER));

    let getitem = types.get_method(bound, "__getitem__").expect("__getitem__");
    let getitem = types.function(getitem.type_id).expect("function");
    assert_eq!(getitem.return_type, TypeId::NUMBER);

    // Bindable but unmapped becomes Never; unrelated variables are untouched.
    let u = types.new_type_variable(ident("U"), None);
    assert_eq!(Binder::new([t]).bind(&mut types, t), TypeId::NEVER);
    assert_eq!(binder.bind(&mut types, u), u);
}

#[test]
fn bound_instance_members_are_bound_and_memoized() {
    let mut types = Types::new();
    let (instance, _) = generic_box(&mut types);
    let bound = types.bound_instance(instance, vec![TypeId::STRING]);

    let value = types.get_field(bound, "value").expect("value");
    assert_eq!(value.type_id, TypeId::STRING);
    let get = types.get_method(bound, "get").expect("get");
    assert_eq!(types.function(get.type_id).map(|f| f.return_type), Some(TypeId::STRING));
    let again = types.get_method(bound, "get").expect("get");
    assert_eq!(get.type_id, again.type_id);

    // The unbound generic exposes nothing directly.
    assert!(types.get_field(instance, "value").is_none());
    assert_eq!(types.render(bound), "Box[String]");
}

#[test]
fn bound_instances_compare_structurally() {
    let mut types = Types::new();
    let (instance, _) = generic_box(&mut types);
    let a = types.bound_instance(instance, vec![TypeId::NUMBER]);
    let b = types.bound_instance(instance, vec![TypeId::NUMBER]);
    let c = types.bound_instance(instance, vec![TypeId::STRING]);
    assert!(types.equals(a, b));
    assert!(!types.equals(a, c));
}

#[test]
fn functions_are_contravariant_in_parameters() {
    let mut types = Types::new();
    let optional = types.optional_of(TypeId::NUMBER);
    let wide = method(&mut types, "wide", vec![("x", optional)], TypeId::NUMBER);
    let narrow = method(&mut types, "narrow", vec![("x", TypeId::NUMBER)], TypeId::NUMBER);
    assert!(types.is_assignable(wide.type_id, narrow.type_id));
    assert!(!types.is_assignable(narrow.type_id, wide.type_id));
    assert_eq!(types.render(narrow.type_id), "Function[Number,Number]");
}

#[test]
fn class_constructor_signature_comes_from_init() {
    let mut types = Types::new();
    let point = types.new_instance(false, ident("Point"), vec![], vec![], None, None);
    let init = method(&mut types, "__init__", vec![("x", TypeId::NUMBER)], TypeId::NIL);
    types
        .instance_mut(point)
        .expect("instance")
        .methods
        .insert("__init__".to_string(), init);
    let class_type = types.instance(point).expect("instance").class_type;

    let ctor = types.as_function_type(class_type).expect("callable");
    let ctor = types.function(ctor).expect("function");
    assert_eq!(ctor.parameters.len(), 1);
    assert_eq!(ctor.return_type, point);
    assert!(types.is_assignable(class_type, TypeId::CLASS));

    let shape = types.new_instance(true, ident("Shape"), vec![], vec![], None, None);
    let shape_class = types.instance(shape).expect("instance").class_type;
    assert_eq!(types.as_function_type(shape_class), None);
}

#[test]
fn traits_are_satisfied_structurally() {
    let mut types = Types::new();
    let area = method(&mut types, "area", vec![], TypeId::NUMBER);
    let shape = types.new_instance(true, ident("Shape"), vec![], vec![], None, None);
    types
        .instance_mut(shape)
        .expect("trait")
        .methods
        .insert("area".to_string(), area.clone());

    let square = types.new_instance(false, ident("Square"), vec![], vec![], None, None);
    types
        .instance_mut(square)
        .expect("class")
        .methods
        .insert("area".to_string(), area);
    let circle = types.new_instance(false, ident("Circle"), vec![], vec![], None, None);

    assert!(types.is_assignable(square, shape));
    assert!(!types.is_assignable(circle, shape));
}

#[test]
fn instances_assign_to_their_bases() {
    let mut types = Types::new();
    let base = types.new_instance(false, ident("Base"), vec![], vec![], None, None);
    let derived = types.new_instance(false, ident("Derived"), vec![], vec![base], None, None);
    assert!(types.is_assignable(derived, base));
    assert!(!types.is_assignable(base, derived));
}

#[test]
fn merge_picks_the_broader_type() {
    let mut types = Types::new();
    let one = types.literal(TypeId::NUMBER, ConstValue::Number(1.0));
    assert_eq!(types.merge(one, TypeId::NUMBER), TypeId::NUMBER);
    assert_eq!(types.merge(TypeId::NEVER, TypeId::STRING), TypeId::STRING);
    assert_eq!(types.merge(TypeId::NUMBER, TypeId::STRING), TypeId::ANY);
}

#[test]
fn frozen_dict_literal_fields() {
    let mut types = Types::new();
    let backing = types.frozen_dict_of(TypeId::STRING, TypeId::NUMBER);
    let mut fields = IndexMap::new();
    fields.insert("x".to_string(), Variable::new(true, ident("x"), TypeId::NUMBER, None));
    let literal = types.frozen_dict_literal(backing, fields);

    assert_eq!(types.get_field(literal, "x").map(|v| v.type_id), Some(TypeId::NUMBER));
    assert!(types.get_method(literal, "rget").is_some());
    assert!(types.is_assignable(literal, backing));
    assert_eq!(types.render(literal), "FrozenDict[String, Number]");
}

#[test]
fn hover_formatting() {
    let mut types = Types::new();
    let t = types.new_type_variable(ident("T"), None);
    let list = types.list_of(t);
    let function = types.function_type(FunctionType {
        type_parameters: vec![t],
        parameters: vec![
            Parameter::new(ident("xs"), list, None),
            Parameter::new(ident("i"), TypeId::NUMBER, Some(ConstValue::Number(0.0))),
        ],
        return_type: t,
        documentation: None,
    });
    let get = Variable::new(true, ident("get"), function, None);
    assert_eq!(format_variable(&types, &get), "def get[T](xs List[T], i Number=0) T");
    assert_eq!(types.render(function), "def[T](xs List[T],i Number)T");

    let ten = types.literal(TypeId::NUMBER, ConstValue::Number(10.0));
    let limit = Variable::new(true, ident("LIMIT"), ten, None);
    assert_eq!(format_variable(&types, &limit), "final LIMIT Number = 10");

    let greeting = types.literal(TypeId::STRING, ConstValue::String("hi \"you\"".to_string()));
    let greeting = Variable::new(true, ident("GREETING"), greeting, None);
    assert_eq!(format_variable(&types, &greeting), r#"final GREETING String = "hi \"you\"""#);

    let name = Variable::new(false, ident("name"), TypeId::STRING, None);
    assert_eq!(format_variable(&types, &name), "var name String");
}

// ============================================================================
// Properties
// ============================================================================

/// A pool of types built in a fresh arena, indexed by the strategy.
fn sample_pool(types: &mut Types) -> Vec<TypeId> {
    let numbers = types.list_of(TypeId::NUMBER);
    let strings = types.frozen_list_of(TypeId::STRING);
    let dict = types.dict_of(TypeId::STRING, numbers);
    let optional = types.optional_of(TypeId::BOOL);
    let function = types.function_type(FunctionType::new(vec![], TypeId::STRING));
    let tuple = types.tuple_of(vec![TypeId::NUMBER, TypeId::NIL]);
    let one = types.literal(TypeId::NUMBER, ConstValue::Number(1.0));
    let class = types.new_instance(false, ident("C"), vec![], vec![], None, None);
    vec![
        TypeId::ANY,
        TypeId::NEVER,
        TypeId::NIL,
        TypeId::BOOL,
        TypeId::NUMBER,
        TypeId::STRING,
        TypeId::UNTYPED_LIST,
        numbers,
        strings,
        dict,
        optional,
        function,
        tuple,
        one,
        class,
    ]
}

proptest! {
    #[test]
    fn everything_is_assignable_to_any_and_from_never(index in 0usize..15) {
        let mut types = Types::new();
        let pool = sample_pool(&mut types);
        let t = pool[index];
        prop_assert!(types.is_assignable(t, TypeId::ANY));
        prop_assert!(types.is_assignable(TypeId::NEVER, t));
        prop_assert!(types.is_assignable(t, t));
    }

    #[test]
    fn union_of_is_idempotent(picks in prop::collection::vec(0usize..15, 0..6)) {
        let mut types = Types::new();
        let pool = sample_pool(&mut types);
        let members: Vec<TypeId> = picks.iter().map(|i| pool[*i]).collect();
        let once = types.union_of(members.clone());
        let twice = types.union_of(vec![once]);
        prop_assert!(types.equals(once, twice));
        // A union member only fits through a single member of `once`, so check its parts.
        let mut parts = Vec::new();
        for member in members {
            match types.get(member) {
                TypeData::Union(inner) => parts.extend(inner.iter().copied()),
                _ => parts.push(member),
            }
        }
        for part in parts {
            prop_assert!(types.is_assignable(part, once));
        }
    }
}
