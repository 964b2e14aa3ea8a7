#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on the desugared shape of specific syntactic forms and on the parser’s
/// error recovery behavior (reporting and continuing rather than giving up).
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;

    fn parse_str(source: &str) -> File {
        parse(&SourceId::new("test.mtots"), source)
    }

    fn parse_ok(source: &str) -> File {
        let file = parse_str(source);
        assert!(file.syntax_errors.is_empty(), "unexpected errors: {:?}", file.syntax_errors);
        file
    }

    /// The expression of the first statement, which must be an expression statement.
    fn first_expression(source: &str) -> Expression {
        let file = parse_ok(source);
        match &file.statements[0].node {
            Stmt::Expression(e) => e.clone(),
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    fn as_method_call(e: &Expression) -> &MethodCall {
        match &e.node {
            Expr::MethodCall(call) => call,
            other => panic!("expected method call, got {other:?}"),
        }
    }

    fn variable_name(e: &Expression) -> &str {
        match &e.node {
            Expr::GetVariable(ident) => &ident.name,
            other => panic!("expected variable, got {other:?}"),
        }
    }

    fn messages(file: &File) -> Vec<&str> {
        file.syntax_errors.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_variable_declaration_leaves_delimiter_as_nop() {
        let file = parse_ok("var x = 1\n");
        assert_eq!(file.statements.len(), 2);
        match &file.statements[0].node {
            Stmt::Variable(v) => {
                assert_eq!(v.identifier.name, "x");
                assert!(!v.is_final);
                assert!(v.type_expr.is_none());
                assert_eq!(v.value.node, Expr::Number(1.0));
            }
            other => panic!("expected variable, got {other:?}"),
        }
        assert_eq!(file.statements[1].node, Stmt::Nop);
    }

    #[test]
    fn test_binary_operators_desugar_to_magic_methods() {
        let e = first_expression("a + b * c\n");
        let add = as_method_call(&e);
        assert_eq!(add.identifier.name, "__add__");
        assert_eq!(variable_name(&add.owner), "a");
        let mul = as_method_call(&add.args[0]);
        assert_eq!(mul.identifier.name, "__mul__");
        assert_eq!(variable_name(&mul.owner), "b");
        assert_eq!(variable_name(&mul.args[0]), "c");
    }

    #[test]
    fn test_comparisons_swap_and_negate() {
        let gt = first_expression("a > b\n");
        let call = as_method_call(&gt);
        assert_eq!(call.identifier.name, "__lt__");
        assert_eq!(variable_name(&call.owner), "b");
        assert_eq!(variable_name(&call.args[0]), "a");

        let le = first_expression("a <= b\n");
        let Expr::Operation(Operation::Not(inner)) = &le.node else {
            panic!("expected negation, got {:?}", le.node);
        };
        let call = as_method_call(inner);
        assert_eq!(call.identifier.name, "__lt__");
        assert_eq!(variable_name(&call.owner), "b");

        let ne = first_expression("a != b\n");
        let Expr::Operation(Operation::Not(inner)) = &ne.node else {
            panic!("expected negation, got {:?}", ne.node);
        };
        assert_eq!(as_method_call(inner).identifier.name, "__eq__");
    }

    #[test]
    fn test_power_is_right_associative() {
        let e = first_expression("2 ** 3 ** 4\n");
        let outer = as_method_call(&e);
        assert_eq!(outer.owner.node, Expr::Number(2.0));
        let inner = as_method_call(&outer.args[0]);
        assert_eq!(inner.owner.node, Expr::Number(3.0));
        assert_eq!(inner.args[0].node, Expr::Number(4.0));
    }

    #[test]
    fn test_not_in_is_negated_contains_on_container() {
        let e = first_expression("x not in y\n");
        let Expr::Operation(Operation::Not(inner)) = &e.node else {
            panic!("expected negation, got {:?}", e.node);
        };
        let call = as_method_call(inner);
        assert_eq!(call.identifier.name, "__contains__");
        assert_eq!(variable_name(&call.owner), "y");
        assert_eq!(variable_name(&call.args[0]), "x");
    }

    #[test]
    fn test_unary_minus_binds_tighter_than_multiplication() {
        let e = first_expression("-a * b\n");
        let mul = as_method_call(&e);
        assert_eq!(mul.identifier.name, "__mul__");
        let neg = as_method_call(&mul.owner);
        assert_eq!(neg.identifier.name, "__neg__");
        assert!(neg.args.is_empty());
    }

    #[test]
    fn test_subscript_forms() {
        let get = first_expression("a[1]\n");
        let call = as_method_call(&get);
        assert_eq!(call.identifier.name, "__getitem__");
        assert_eq!(call.args.len(), 1);

        let set = first_expression("a[1] = 2\n");
        let call = as_method_call(&set);
        assert_eq!(call.identifier.name, "__setitem__");
        assert_eq!(call.args.len(), 2);

        let head = first_expression("a[:2]\n");
        let call = as_method_call(&head);
        assert_eq!(call.identifier.name, "__slice__");
        assert_eq!(call.args[0].node, Expr::Nil);
        assert_eq!(call.args[1].node, Expr::Number(2.0));

        let tail = first_expression("a[1:]\n");
        let call = as_method_call(&tail);
        assert_eq!(call.args[0].node, Expr::Number(1.0));
        assert_eq!(call.args[1].node, Expr::Nil);
    }

    #[test]
    fn test_subscript_identifier_sits_on_open_bracket() {
        let e = first_expression("ab[0]\n");
        let call = as_method_call(&e);
        assert_eq!(call.identifier.location.range.start.column, 2);
        assert_eq!(call.identifier.location.range.end.column, 3);
    }

    #[test]
    fn test_call_argument_slots() {
        let e = first_expression("f(a, b)\n");
        let Expr::FunctionCall(call) = &e.node else {
            panic!("expected call, got {:?}", e.node);
        };
        let slots = call.arg_locations.as_ref().expect("call has argument slots");
        assert_eq!(slots.len(), 2);
        assert_eq!((slots[0].range.start.column, slots[0].range.end.column), (2, 3));
        assert_eq!((slots[1].range.start.column, slots[1].range.end.column), (5, 6));

        let empty = first_expression("f()\n");
        let Expr::FunctionCall(call) = &empty.node else {
            panic!("expected call, got {:?}", empty.node);
        };
        let slots = call.arg_locations.as_ref().expect("call has argument slots");
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].range.start, slots[0].range.end);
    }

    #[test]
    fn test_keyword_arguments() {
        let e = first_expression("f(a, k=1)\n");
        let Expr::FunctionCall(call) = &e.node else {
            panic!("expected call, got {:?}", e.node);
        };
        assert_eq!(call.args.len(), 1);
        assert_eq!(call.kwargs.len(), 1);
        assert_eq!(call.kwargs[0].0.name, "k");
    }

    #[test]
    fn test_positional_after_keyword_is_reported() {
        let file = parse_str("f(k=1, a)\n");
        assert!(messages(&file).contains(&"Positional arguments cannot follow keyword arguments"));
    }

    #[test]
    fn test_parenthesized_expression_keeps_inner_location() {
        let e = first_expression("(a)\n");
        assert_eq!(variable_name(&e), "a");
        assert_eq!(e.location.range.start.column, 1);
    }

    #[test]
    fn test_type_expression_sugar() {
        let file = parse_ok("var x Int? = nil\nvar y Int | String = 1\n");
        let types: Vec<&TypeExpr> = file
            .statements
            .iter()
            .filter_map(|s| match &s.node {
                Stmt::Variable(v) => v.type_expr.as_ref(),
                _ => None,
            })
            .collect();
        assert_eq!(types[0].identifier.name, "Optional");
        assert_eq!(types[0].args[0].identifier.name, "Int");
        assert_eq!(types[1].identifier.name, "Union");
        assert_eq!(types[1].args.len(), 2);
        assert_eq!(types[1].args[1].identifier.name, "String");
    }

    #[test]
    fn test_dangling_qualified_type_keeps_member_anchor() {
        let file = parse_ok("def f(p m.):\n  pass\n");
        let Stmt::Function(function) = &file.statements[0].node else {
            panic!("expected function");
        };
        let type_expr = function.parameters[0].type_expr.as_ref().expect("parameter type");
        assert_eq!(type_expr.qualifier.as_ref().map(|q| q.name.as_str()), Some("m"));
        assert_eq!(type_expr.identifier.name, " ");
    }

    #[test]
    fn test_class_declaration() {
        let source = r#"class Point:
  "A point"
  var x Int
  var y Int
  def __init__(x Int, y Int):
    this.x = x
"#;
        let file = parse_ok(source);
        assert_eq!(file.statements.len(), 1);
        let Stmt::Class(class) = &file.statements[0].node else {
            panic!("expected class, got {:?}", file.statements[0].node);
        };
        assert_eq!(class.identifier.name, "Point");
        assert_eq!(class.documentation.as_deref(), Some("A point"));
        assert_eq!(class.fields.len(), 2);
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.methods[0].node.parameters.len(), 2);
    }

    #[test]
    fn test_trait_stub_with_body_is_reported() {
        let source = "trait Shape:\n  def area() Number:\n    \"doc\"\n    return 1\n";
        let file = parse_str(source);
        let Stmt::Trait(trait_decl) = &file.statements[0].node else {
            panic!("expected trait, got {:?}", file.statements[0].node);
        };
        assert_eq!(trait_decl.methods[0].node.documentation.as_deref(), Some("doc"));
        assert_eq!(
            messages(&file),
            vec![
                "Body of a function stub must be empty (potentially aside from documentation), \
                 but found a non-empty body"
            ]
        );
    }

    #[test]
    fn test_function_documentation_stays_in_body() {
        let file = parse_ok("def f():\n  \"Does things\"\n  return 1\n");
        let Stmt::Function(function) = &file.statements[0].node else {
            panic!("expected function");
        };
        assert_eq!(function.documentation.as_deref(), Some("Does things"));
        assert_eq!(function.body.node.statements.len(), 2);
    }

    #[test]
    fn test_imports_and_aliases() {
        let file = parse_ok("import a.b\nfrom c import d as e\nfrom f import g\n");
        assert_eq!(file.imports.len(), 3);
        assert_eq!(file.imports[0].module.to_string(), "a.b");
        assert_eq!(file.imports[0].alias.name, "b");
        assert_eq!(file.imports[1].member.as_ref().map(|m| m.name.as_str()), Some("d"));
        assert_eq!(file.imports[1].alias.name, "e");
        let member = file.imports[2].member.as_ref().expect("member import");
        assert_eq!(file.imports[2].alias.id, member.id);
    }

    #[test]
    fn test_decorator_desugars_to_block() {
        let file = parse_ok("@dec\ndef f():\n  pass\n");
        let Stmt::Block(block) = &file.statements[0].node else {
            panic!("expected block, got {:?}", file.statements[0].node);
        };
        assert_eq!(block.statements.len(), 2);
        let Stmt::Function(function) = &block.statements[0].node else {
            panic!("expected function");
        };
        let Stmt::Expression(application) = &block.statements[1].node else {
            panic!("expected application");
        };
        let Expr::FunctionCall(call) = &application.node else {
            panic!("expected call, got {:?}", application.node);
        };
        assert_eq!(variable_name(&call.function), "dec");
        let Expr::GetVariable(argument) = &call.args[0].node else {
            panic!("expected function reference");
        };
        assert_eq!(argument.id, function.identifier.id);
    }

    #[test]
    fn test_missing_block_is_empty_with_error() {
        let file = parse_str("def f():\nx\n");
        assert_eq!(messages(&file), vec!["Expected INDENT after \":\""]);
        let Stmt::Function(function) = &file.statements[0].node else {
            panic!("expected function");
        };
        assert!(function.body.node.statements.is_empty());
    }

    #[test]
    fn test_if_expression_without_then() {
        let file = parse_str("x = if a b\n");
        assert!(messages(&file).contains(&"Expected 'then' for 'if' expression"));
    }

    #[test]
    fn test_lexical_errors_surface_as_diagnostics() {
        let file = parse_str("x = $\n");
        assert_eq!(file.syntax_errors[0].kind, DiagnosticKind::Lexical);
        assert_eq!(file.syntax_errors[0].message, "Unrecognized token $");
        assert!(messages(&file).contains(&"Expected expression but got 'NEWLINE'"));
    }

    #[test]
    fn test_dangling_dot_parses_as_dot_node() {
        let file = parse_str("a.\n");
        let Stmt::Expression(e) = &file.statements[0].node else {
            panic!("expected expression statement");
        };
        let Expr::Dot(dot) = &e.node else {
            panic!("expected dot, got {:?}", e.node);
        };
        assert_eq!(variable_name(&dot.owner), "a");
        assert_eq!(dot.dot_location.range.start.column, 1);
    }

    #[test]
    fn test_control_flow_statements() {
        let source = "while x:\n  x = x - 1\nfor i in xs:\n  pass\nif a:\n  pass\nelif b:\n  pass\nelse:\n  pass\n";
        let file = parse_ok(source);
        let kinds: Vec<&str> = file
            .statements
            .iter()
            .map(|s| match &s.node {
                Stmt::While(_) => "while",
                Stmt::For(_) => "for",
                Stmt::If(_) => "if",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["while", "for", "if"]);
        let Stmt::If(if_stmt) = &file.statements[2].node else {
            panic!("expected if");
        };
        assert_eq!(if_stmt.branches.len(), 2);
        assert!(if_stmt.fallback.is_some());
    }

    #[test]
    fn test_lambda_and_displays() {
        let e = first_expression("f(def(a Int) Int: a, [1, 2], {1: 2}, final[3], Tuple(1, 'a'))\n");
        let Expr::FunctionCall(call) = &e.node else {
            panic!("expected call");
        };
        assert!(matches!(call.args[0].node, Expr::Lambda(_)));
        assert!(matches!(&call.args[1].node, Expr::List(items) if items.len() == 2));
        assert!(matches!(&call.args[2].node, Expr::Dict(pairs) if pairs.len() == 1));
        assert!(matches!(&call.args[3].node, Expr::FrozenList(items) if items.len() == 1));
        assert!(matches!(&call.args[4].node, Expr::Tuple { items, .. } if items.len() == 2));
    }

    #[test]
    fn test_file_documentation() {
        let file = parse_ok("\"Module docs\"\nvar x = 1\n");
        assert_eq!(file.documentation.as_deref(), Some("Module docs"));
    }
}
