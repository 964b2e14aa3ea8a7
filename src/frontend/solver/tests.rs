//! Solver unit tests.

use std::sync::Arc;

use indexmap::IndexMap;
use mtots_core::lang::conventions::{BUILTIN_MODULE, MAIN_MODULE};
use mtots_syntax::parser;
use mtots_syntax::position::{Position, SourceId};

use super::*;
use crate::frontend::ide::{CompletionKind, MemberFilter};
use crate::frontend::ir::{ConstValue, LiteralType, TypeData};

const PRELUDE: &str = r#"
class Number:
  def __add__(other Number) Number:
    return this
  def __lt__(other Number) Bool:
    return true
  def __neg__() Number:
    return this
class String:
  def __add__(other String) String:
    return this
def print(x Any):
  pass
def identity[T](x T) T:
  return x
"#;

struct Checked {
    module: Module,
    types: Types,
}

fn solve_source(types: &mut Types, name: &str, source: &str, deps: &IndexMap<String, Arc<Module>>) -> Module {
    let file = Arc::new(parser::parse(&SourceId::new(format!("{name}.mtots")), source));
    solve(name, file, deps, types).expect("solver invariant")
}

fn check_with(source: &str, extra: &[(&str, &str)]) -> Checked {
    let mut types = Types::new();
    let mut deps = IndexMap::new();
    let builtin = solve_source(&mut types, BUILTIN_MODULE, PRELUDE, &deps);
    assert!(builtin.errors.is_empty(), "prelude errors: {:?}", builtin.errors);
    deps.insert(BUILTIN_MODULE.to_string(), Arc::new(builtin));
    for (name, text) in extra {
        let module = solve_source(&mut types, name, text, &deps);
        deps.insert(name.to_string(), Arc::new(module));
    }
    let module = solve_source(&mut types, MAIN_MODULE, source, &deps);
    Checked { module, types }
}

fn check(source: &str) -> Checked {
    check_with(source, &[])
}

fn check_str(source: &str) -> Vec<String> {
    check(source)
        .module
        .errors
        .into_iter()
        .map(|error| error.message)
        .collect()
}

impl Checked {
    fn global_type(&self, name: &str) -> TypeId {
        self.module.globals.get(name).expect("global").type_id
    }

    fn literal(&self, name: &str) -> Option<&ConstValue> {
        match self.types.get(self.global_type(name)) {
            TypeData::Literal(LiteralType { value, .. }) => Some(value),
            _ => None,
        }
    }
}

// ========================================
// Names and scopes
// ========================================

#[test]
fn annotated_declaration_is_clean() {
    assert!(check_str("var x Number = 1\n").is_empty());
}

#[test]
fn unknown_variable() {
    assert_eq!(check_str("var x = y\n"), vec!["Variable \"y\" not found"]);
}

#[test]
fn duplicate_declaration_in_one_scope() {
    assert_eq!(
        check_str("var x = 1\nvar x = 2\n"),
        vec!["Variable with name \"x\" already declared in this scope"]
    );
}

#[test]
fn shadowing_in_a_nested_block_is_allowed() {
    let source = "var x = 1\nif true:\n  var x = \"s\"\n";
    assert!(check_str(source).is_empty());
}

#[test]
fn assigning_a_final_variable() {
    assert_eq!(check_str("final x = 1\nx = 2\n"), vec!["Assign to final variable \"x\""]);
}

#[test]
fn functions_can_be_called_before_their_declaration() {
    let source = "def a() Number:\n  return b()\ndef b() Number:\n  return 1\n";
    assert!(check_str(source).is_empty());
}

// ========================================
// Calls
// ========================================

#[test]
fn arity_errors() {
    let source = "def add(a Number, b Number) Number:\n  return a\nadd(1)\nadd(1, 2, 3)\n";
    insta::assert_debug_snapshot!(check_str(source), @r#"
    [
        "At least 2 args are required but got 1",
        "Up to 2 args are allowed but got 3",
    ]
    "#);
}

#[test]
fn argument_type_mismatch() {
    let source = "var s = \"x\"\ndef f(a Number):\n  pass\nf(s)\n";
    assert_eq!(check_str(source), vec!["Expected argument to be Number but got String"]);
}

#[test]
fn calling_a_non_callable() {
    assert_eq!(check_str("var s = \"x\"\ns()\n"), vec!["String is not callable"]);
}

#[test]
fn generic_function_infers_from_argument() {
    let checked = check("final n = identity(1)\n");
    assert!(checked.module.errors.is_empty());
    assert_eq!(checked.global_type("n"), TypeId::NUMBER);
    let usage = checked
        .module
        .usages
        .iter()
        .find(|usage| usage.identifier.name == "identity")
        .expect("identity usage");
    let bound = usage.bound_type.expect("bound type");
    assert_eq!(checked.types.render(bound), "Function[Number,Number]");
}

#[test]
fn lambda_parameters_come_from_the_expected_function_type() {
    let source = "def apply(f Function[Number, Number]) Number:\n  return f(1)\napply(def(x): x + 1)\n";
    assert!(check_str(source).is_empty());
}

#[test]
fn missing_method() {
    assert_eq!(check_str("var s = \"a\"\ns.foo()\n"), vec!["Method foo not found on String"]);
}

// ========================================
// Constants
// ========================================

#[test]
fn final_arithmetic_folds_to_a_literal() {
    let checked = check("final k = 1 + 2\nfinal s = \"a\" + \"b\"\nvar v = 1 + 2\n");
    assert!(checked.module.errors.is_empty());
    assert_eq!(checked.literal("k"), Some(&ConstValue::Number(3.0)));
    assert_eq!(checked.literal("s"), Some(&ConstValue::String("ab".to_string())));
    assert_eq!(checked.literal("v"), None);
    assert_eq!(checked.global_type("v"), TypeId::NUMBER);
}

// ========================================
// Classes and traits
// ========================================

#[test]
fn class_with_constructor_and_methods() {
    let source = r#"
class Point:
  var x Number
  var y Number
  def __init__(x Number, y Number):
    this.x = x
    this.y = y
  def sum() Number:
    return this.x + this.y
final p = Point(1, 2)
final n = p.sum()
"#;
    let checked = check(source);
    assert!(checked.module.errors.is_empty(), "{:?}", checked.module.errors);
    assert_eq!(checked.global_type("n"), TypeId::NUMBER);
    assert_eq!(checked.types.render(checked.global_type("p")), "Point");
}

#[test]
fn primitives_are_not_inheritable() {
    assert_eq!(
        check_str("class A(Number):\n  var x Number\n"),
        vec!["Number is not inheritable"]
    );
}

#[test]
fn classes_satisfy_traits_structurally() {
    let source = r#"
trait Shape:
  def area() Number
class Square:
  def area() Number:
    return 1
def total(s Shape) Number:
  return s.area()
total(Square())
total(1)
"#;
    assert_eq!(check_str(source), vec!["Expected argument to be Shape but got Number"]);
}

#[test]
fn generic_class_members_are_bound() {
    let source = r#"
class Box[T]:
  var value T
  def get() T:
    return this.value
def get_box() Box[Number]:
  return get_box()
final n = get_box().get()
"#;
    let checked = check(source);
    assert!(checked.module.errors.is_empty(), "{:?}", checked.module.errors);
    assert_eq!(checked.global_type("n"), TypeId::NUMBER);
}

// ========================================
// Types
// ========================================

#[test]
fn unknown_type() {
    assert_eq!(check_str("var x Foo = 1\n"), vec!["Type Foo not found"]);
}

#[test]
fn builtin_type_arity() {
    assert_eq!(
        check_str("var xs List[Number, String] = []\n"),
        vec!["List expects 1 arg but got 2"]
    );
}

#[test]
fn for_loop_variable_takes_the_item_type() {
    let source = "for s in [\"a\", \"b\"]:\n  s.foo()\n";
    assert_eq!(check_str(source), vec!["Method foo not found on String"]);
}

#[test]
fn for_loop_over_a_non_iterable_is_reported_at_the_container() {
    let checked = check("for i in 5:\n  print(i)\n");
    let errors = &checked.module.errors;
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors[0].message, "Number is not iterable");
    assert_eq!(errors[0].location.range.start, Position::new(0, 9, 9));
}

// ========================================
// Imports
// ========================================

const LIB: &str = "final value = 42\ndef helper() Number:\n  return value\n";

#[test]
fn import_errors() {
    let source = "import nope\nfrom lib import missing\n";
    let checked = check_with(source, &[("lib", LIB)]);
    let messages: Vec<&str> = checked.module.errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["Module nope not found", "missing not found in lib"]);
}

#[test]
fn imported_constants_fold() {
    let source = "import lib\nfrom lib import helper\nfinal k = lib.value + 1\nfinal h = helper()\nlib.nothing\n";
    let checked = check_with(source, &[("lib", LIB)]);
    let messages: Vec<&str> = checked.module.errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["nothing not found in import lib"]);
    assert_eq!(checked.literal("k"), Some(&ConstValue::Number(43.0)));
    assert_eq!(checked.global_type("h"), TypeId::NUMBER);
}

// ========================================
// Editor side tables
// ========================================

#[test]
fn definition_of_a_usage() {
    let checked = check("var value = 1\nprint(value)\n");
    let location = checked
        .module
        .find_definition(&checked.types, Position::new(1, 8, 0))
        .expect("definition");
    assert_eq!(location.range.start, Position::new(0, 4, 4));
    // No name under a literal.
    assert!(checked.module.find_definition(&checked.types, Position::new(0, 12, 0)).is_none());
}

#[test]
fn compiler_provided_members_have_no_definition() {
    let checked = check("var xs = [1]\nxs.pop()\n");
    let position = Position::new(1, 4, 0);
    assert_eq!(checked.module.find_usage(position).map(|u| u.variable.name()), Some("pop"));
    assert!(checked.module.find_definition(&checked.types, position).is_none());
}

#[test]
fn builtin_module_names_lead_to_the_builtin_source() {
    let checked = check("print(1)\n");
    let location = checked
        .module
        .find_definition(&checked.types, Position::new(0, 2, 0))
        .expect("definition");
    assert_eq!(location.source.as_str(), "__builtin__.mtots");
}

#[test]
fn imported_module_definition_is_its_file() {
    let checked = check_with("import lib\nprint(lib)\n", &[("lib", "final x = 1\n")]);
    for position in [Position::new(0, 8, 0), Position::new(1, 7, 0)] {
        let location = checked
            .module
            .find_definition(&checked.types, position)
            .expect("definition");
        assert_eq!(location.source.as_str(), "lib.mtots");
    }
}

#[test]
fn signature_help_tracks_the_argument_slot() {
    let checked = check("def add(a Number, b Number) Number:\n  return a\nadd(1, 2)\n");
    let help = checked
        .module
        .find_signature_help(Position::new(2, 7, 0))
        .expect("signature help");
    assert_eq!(help.parameter_index, 1);
    assert_eq!(help.function_name.as_deref(), Some("add"));
    assert_eq!(help.parameter_names.as_deref(), Some(&["a".to_string(), "b".to_string()][..]));
}

#[test]
fn scope_completion_offers_globals() {
    let checked = check("var abc = 1\nab\n");
    let point = checked
        .module
        .find_completion_point(Position::new(1, 2, 0))
        .expect("completion point");
    let entries = point.entries(&checked.types, &checked.module.scopes);
    assert!(entries.iter().any(|entry| entry.name == "abc"));
    assert!(entries.iter().any(|entry| entry.name == "print"));
}

#[test]
fn member_completion_is_computed_on_request() {
    let checked = check("var xs = [1]\nxs.\n");
    let point = checked
        .module
        .find_completion_point(Position::new(1, 3, 0))
        .expect("completion point");
    assert!(matches!(point.kind, CompletionKind::Member { filter: MemberFilter::Default, .. }));
    let before = checked.types.len();
    let entries = point.entries(&checked.types, &checked.module.scopes);
    assert!(entries.iter().any(|entry| entry.name == "pop"), "{entries:?}");
    assert_eq!(checked.types.len(), before);
}

#[test]
fn member_completion_after_a_dot() {
    let source = "class P:\n  var x Number\n  def m() Number:\n    return 1\ndef make() P:\n  return make()\nmake().\n";
    let checked = check(source);
    let point = checked
        .module
        .find_completion_point(Position::new(6, 7, 0))
        .expect("completion point");
    let names: Vec<String> = point
        .entries(&checked.types, &checked.module.scopes)
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    assert_eq!(names, vec!["x", "m"]);
}
