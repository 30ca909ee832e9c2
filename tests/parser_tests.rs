// tests/parser_tests.rs

use std::str::FromStr;

use mdx_lang::ast::{
    CallExpression, CallType, CaseExpression, CompoundId, Expression, KeyObjectIdentifier,
    NameObjectIdentifier, ObjectIdentifier, Quoting,
};
use mdx_lang::lexer::Lexer;
use mdx_lang::parser::{ParseError, ParseOptions, Parser};
use mdx_lang::output::{expression_to_json, to_json_string};
use mdx_lang::parse_expression;
use rust_decimal::Decimal;

fn parse(input: &str) -> Expression {
    parse_expression(input).unwrap()
}

fn num(s: &str) -> Expression {
    Expression::NumericLiteral(Decimal::from_str(s).unwrap())
}

fn name(s: &str) -> Expression {
    CompoundId::from(NameObjectIdentifier::unquoted(s)).into()
}

fn quoted(s: &str) -> Expression {
    CompoundId::from(NameObjectIdentifier::quoted(s)).into()
}

fn call(call_type: CallType, name: &str, args: Vec<Expression>) -> Expression {
    Expression::call(call_type, name, args)
}

fn infix(op: &str, left: Expression, right: Expression) -> Expression {
    call(CallType::TermInfix, op, vec![left, right])
}

fn prefix(op: &str, operand: Expression) -> Expression {
    call(CallType::TermPrefix, op, vec![operand])
}

fn empty() -> Expression {
    CallExpression::empty().into()
}

fn expect_call(expr: &Expression) -> &CallExpression {
    match expr {
        Expression::Call(call) => call,
        other => panic!("Expected a call, got {:?}", other),
    }
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numeric_literals() {
    assert_eq!(parse("10"), num("10"));
    assert_eq!(parse("10.25"), num("10.25"));
    assert_eq!(parse("10e+5"), num("1000000"));
    assert_eq!(parse("10e-5"), num("0.0001"));
}

#[test]
fn test_negative_number_is_prefix_call() {
    assert_eq!(parse("-10.25"), prefix("-", num("10.25")));
}

#[test]
fn test_string_literals() {
    assert_eq!(
        parse("\"String'Literal\""),
        Expression::StringLiteral("String'Literal".to_string())
    );
    assert_eq!(
        parse("'StringLiteral'"),
        Expression::StringLiteral("StringLiteral".to_string())
    );
}

#[test]
fn test_null_in_any_case() {
    for input in ["null", "Null", "NULL"] {
        assert_eq!(parse(input), Expression::NullLiteral, "input: {}", input);
    }
}

// ============================================================================
// Calls
// ============================================================================

#[test]
fn test_function_arity() {
    let cases = [
        ("FunctionName()", 0),
        ("FunctionName(arg)", 1),
        ("FunctionName(arg1,arg2)", 2),
        ("FunctionName(arg1, ,arg2)", 3),
    ];
    for (input, arity) in cases {
        let expr = parse(input);
        let call = expect_call(&expr);
        assert_eq!(call.call_type, CallType::Function, "input: {}", input);
        assert_eq!(call.name, "FunctionName");
        assert_eq!(call.args.len(), arity, "input: {}", input);
    }
}

#[test]
fn test_elided_argument() {
    assert_eq!(
        parse("FunctionName(arg1, ,arg2)"),
        call(
            CallType::Function,
            "FunctionName",
            vec![name("arg1"), empty(), name("arg2")]
        )
    );
}

#[test]
fn test_elided_trailing_argument() {
    assert_eq!(
        parse("IIf(a, b, )"),
        call(CallType::Function, "IIf", vec![name("a"), name("b"), empty()])
    );
}

#[test]
fn test_empty_call_has_no_name_or_args() {
    let expr = parse("f(a,,b)");
    let placeholder = expect_call(&expr).args[1].clone();
    let placeholder = expect_call(&placeholder).clone();
    assert_eq!(placeholder.call_type, CallType::Empty);
    assert!(placeholder.name.is_empty());
    assert!(placeholder.args.is_empty());
}

#[test]
fn test_bracketed_argument_is_one_identifier() {
    let expr = parse("f([arg1, arg2])");
    let call = expect_call(&expr);
    assert_eq!(call.args.len(), 1);
    assert_eq!(call.args[0], quoted("arg1, arg2"));
}

#[test]
fn test_nested_calls() {
    assert_eq!(
        parse("Filter(Members(x), Count(y) > 0)"),
        call(
            CallType::Function,
            "Filter",
            vec![
                call(CallType::Function, "Members", vec![name("x")]),
                infix(
                    ">",
                    call(CallType::Function, "Count", vec![name("y")]),
                    num("0")
                ),
            ]
        )
    );
}

#[test]
fn test_elision_not_allowed_outside_calls() {
    assert!(parse_expression("{a, , b}").is_err());
    assert!(parse_expression("(a, , b)").is_err());
}

// ============================================================================
// Properties and methods
// ============================================================================

#[test]
fn test_property_forms() {
    assert_eq!(
        parse("object.PROPERTY"),
        call(CallType::Property, "PROPERTY", vec![name("object")])
    );
    assert_eq!(
        parse("object.&PROPERTY"),
        call(CallType::PropertyQuoted, "PROPERTY", vec![name("object")])
    );
    assert_eq!(
        parse("object.[&PROPERTY]"),
        call(CallType::PropertyAmpersAndQuoted, "PROPERTY", vec![name("object")])
    );
}

#[test]
fn test_method_without_arguments() {
    assert_eq!(
        parse("object.FunctionName()"),
        call(CallType::Method, "FunctionName", vec![name("object"), empty()])
    );
}

#[test]
fn test_method_with_arguments() {
    assert_eq!(
        parse("[Time].[2024].Lag(1, x)"),
        call(
            CallType::Method,
            "Lag",
            vec![
                CompoundId::from(NameObjectIdentifier::quoted("Time"))
                    .append(ObjectIdentifier::Name(NameObjectIdentifier::quoted("2024")))
                    .into(),
                num("1"),
                name("x"),
            ]
        )
    );
}

#[test]
fn test_chained_access() {
    assert_eq!(
        parse("a.Children.Count"),
        call(
            CallType::Property,
            "Count",
            vec![call(CallType::Property, "Children", vec![name("a")])]
        )
    );
}

#[test]
fn test_bracketed_segment_on_call_is_property() {
    assert_eq!(
        parse("f(x).[Caption]"),
        call(
            CallType::PropertyQuoted,
            "Caption",
            vec![call(CallType::Function, "f", vec![name("x")])]
        )
    );
}

#[test]
fn test_method_receiver_is_first_argument() {
    let expr = parse("{a, b}.Item(0)");
    let call = expect_call(&expr);
    assert_eq!(call.call_type, CallType::Method);
    assert_eq!(
        call.args[0],
        Expression::from(CallExpression::braces(vec![name("a"), name("b")]))
    );
    assert_eq!(call.args[1], num("0"));
}

// ============================================================================
// Compound identifiers
// ============================================================================

#[test]
fn test_compound_id_with_key() {
    let expr = parse("[x].&foo&[1]&bar.[y]");
    let Expression::CompoundId(id) = expr else {
        panic!("Expected a compound identifier");
    };
    assert_eq!(
        id.segments(),
        &[
            ObjectIdentifier::Name(NameObjectIdentifier::quoted("x")),
            ObjectIdentifier::Key(KeyObjectIdentifier {
                parts: vec![
                    NameObjectIdentifier::unquoted("foo"),
                    NameObjectIdentifier::quoted("1"),
                    NameObjectIdentifier::unquoted("bar"),
                ]
            }),
            ObjectIdentifier::Name(NameObjectIdentifier::quoted("y")),
        ]
    );
}

#[test]
fn test_compound_id_with_single_quoted_key() {
    let expr = parse("[Time].&[2024]");
    let id = expr.as_compound_id().unwrap();
    assert_eq!(id.len(), 2);
    assert_eq!(
        id.segments()[1],
        ObjectIdentifier::Key(KeyObjectIdentifier {
            parts: vec![NameObjectIdentifier::quoted("2024")]
        })
    );
}

#[test]
fn test_unquoted_then_quoted_segments() {
    let expr = parse("Measures.[Unit Sales]");
    let id = expr.as_compound_id().unwrap();
    assert_eq!(
        id.segments(),
        &[
            ObjectIdentifier::Name(NameObjectIdentifier::new("Measures", Quoting::Unquoted)),
            ObjectIdentifier::Name(NameObjectIdentifier::new("Unit Sales", Quoting::Quoted)),
        ]
    );
}

#[test]
fn test_non_reserved_keyword_as_name() {
    assert_eq!(parse("Dimension"), name("Dimension"));
    assert_eq!(
        parse("x.Properties(\"Key\")"),
        call(
            CallType::Method,
            "Properties",
            vec![name("x"), Expression::StringLiteral("Key".to_string())]
        )
    );
}

#[test]
fn test_reserved_word_after_dot() {
    let err = parse_expression("x.Cube").unwrap_err();
    assert!(matches!(err, ParseError::ReservedWord { ref word, .. } if word == "Cube"));
    assert!(err.to_string().contains("Reserved word"));
}

#[test]
fn test_empty_bracketed_identifier() {
    assert!(matches!(
        parse_expression("[]"),
        Err(ParseError::EmptyIdentifier { .. })
    ));
    assert!(matches!(
        parse_expression("[a].[]"),
        Err(ParseError::EmptyIdentifier { .. })
    ));
}

// ============================================================================
// Braces and parentheses
// ============================================================================

#[test]
fn test_braces_any_arity() {
    assert_eq!(
        parse("{ e }"),
        Expression::from(CallExpression::braces(vec![name("e")]))
    );
    assert_eq!(
        parse("{ e1, e2 }"),
        Expression::from(CallExpression::braces(vec![name("e1"), name("e2")]))
    );
    assert_eq!(parse("{}"), Expression::from(CallExpression::braces(vec![])));
}

#[test]
fn test_parentheses_tuple_and_grouping() {
    assert_eq!(
        parse("( e1, e2 )"),
        Expression::from(CallExpression::parentheses(vec![name("e1"), name("e2")]))
    );
    assert_eq!(parse("( e )"), name("e"));
    assert_eq!(parse("((( e )))"), name("e"));
}

#[test]
fn test_braces_and_parentheses_names() {
    let braces = parse("{a}");
    assert_eq!(expect_call(&braces).name, "{}");
    let parens = parse("(a, b)");
    assert_eq!(expect_call(&parens).name, "()");
}

#[test]
fn test_unclosed_brace() {
    let err = parse_expression("{a, b").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    assert!(err.to_string().contains("end of input"));
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(
        parse("1 + 2 * 3"),
        infix("+", num("1"), infix("*", num("2"), num("3")))
    );
    assert_eq!(
        parse("(1 + 2) * 3"),
        infix("*", infix("+", num("1"), num("2")), num("3"))
    );
}

#[test]
fn test_left_associativity() {
    assert_eq!(
        parse("a - b - c"),
        infix("-", infix("-", name("a"), name("b")), name("c"))
    );
    assert_eq!(
        parse("a / b * c"),
        infix("*", infix("/", name("a"), name("b")), name("c"))
    );
}

#[test]
fn test_logical_precedence() {
    assert_eq!(
        parse("a OR b AND c"),
        infix("OR", name("a"), infix("AND", name("b"), name("c")))
    );
    assert_eq!(
        parse("NOT a = b"),
        prefix("NOT", infix("=", name("a"), name("b")))
    );
    assert_eq!(
        parse("NOT a AND b"),
        infix("AND", prefix("NOT", name("a")), name("b"))
    );
}

#[test]
fn test_operator_names_use_canonical_case() {
    assert_eq!(
        parse("a and b"),
        infix("AND", name("a"), name("b"))
    );
}

#[test]
fn test_unary_minus_binds_tightly() {
    assert_eq!(
        parse("-a * b"),
        infix("*", prefix("-", name("a")), name("b"))
    );
    assert_eq!(
        parse("a * -b"),
        infix("*", name("a"), prefix("-", name("b")))
    );
    assert_eq!(parse("- - 1"), prefix("-", prefix("-", num("1"))));
}

#[test]
fn test_comparison_and_concat() {
    assert_eq!(
        parse("a || b = c"),
        infix("=", infix("||", name("a"), name("b")), name("c"))
    );
    assert_eq!(
        parse("a <> b"),
        infix("<>", name("a"), name("b"))
    );
}

#[test]
fn test_range_operator() {
    assert_eq!(
        parse("[a] : [b]"),
        infix(":", quoted("a"), quoted("b"))
    );
}

#[test]
fn test_postfix_is_empty() {
    assert_eq!(
        parse("x IS EMPTY"),
        call(CallType::TermPostfix, "IS EMPTY", vec![name("x")])
    );
    assert_eq!(
        parse("a + b IS NOT NULL"),
        call(
            CallType::TermPostfix,
            "IS NOT NULL",
            vec![infix("+", name("a"), name("b"))]
        )
    );
}

#[test]
fn test_is_between_objects() {
    assert_eq!(parse("a IS b"), infix("IS", name("a"), name("b")));
}

#[test]
fn test_not_in_wraps_in() {
    assert_eq!(
        parse("a NOT IN b"),
        prefix("NOT", infix("IN", name("a"), name("b")))
    );
    assert_eq!(
        parse("a MATCHES \"x.*\""),
        infix("MATCHES", name("a"), Expression::StringLiteral("x.*".to_string()))
    );
}

#[test]
fn test_existing_prefix() {
    assert_eq!(
        parse("EXISTING a.Members"),
        prefix(
            "EXISTING",
            call(CallType::Property, "Members", vec![name("a")])
        )
    );
}

#[test]
fn test_alias() {
    assert_eq!(
        parse("a + b AS [Total]"),
        infix("AS", infix("+", name("a"), name("b")), quoted("Total"))
    );
}

#[test]
fn test_missing_operand() {
    assert!(matches!(
        parse_expression("1 +"),
        Err(ParseError::UnexpectedToken { .. })
    ));
    assert!(parse_expression("* 2").is_err());
}

#[test]
fn test_trailing_tokens_rejected() {
    assert!(matches!(
        parse_expression("a b"),
        Err(ParseError::UnexpectedToken { ref expected, .. }) if expected == "end of input"
    ));
}

// ============================================================================
// CASE and CAST
// ============================================================================

#[test]
fn test_simple_case_flattens_to_case_match() {
    let expr = parse("CASE a WHEN b THEN c END");
    let Expression::Case(case) = &expr else {
        panic!("Expected CASE, got {:?}", expr);
    };
    assert_eq!(
        case.to_call(),
        CallExpression::new(
            CallType::TermCase,
            "_CaseMatch",
            vec![name("a"), name("b"), name("c")]
        )
    );
}

#[test]
fn test_searched_case_with_else() {
    let expr = parse("CASE WHEN x > 0 THEN 1 WHEN x < 0 THEN -1 ELSE 0 END");
    let Expression::Case(case) = expr else {
        panic!("Expected CASE");
    };
    assert!(case.operand.is_none());
    assert_eq!(case.branches.len(), 2);
    assert_eq!(case.branches[1].result, prefix("-", num("1")));
    assert_eq!(case.else_result.as_deref(), Some(&num("0")));

    let flat = case.to_call();
    assert_eq!(flat.name, CaseExpression::TEST_NAME);
    assert_eq!(flat.args.len(), 5);
}

#[test]
fn test_nested_case() {
    let expr = parse("CASE WHEN a THEN CASE b WHEN 1 THEN 2 END END");
    let Expression::Case(outer) = expr else {
        panic!("Expected CASE");
    };
    assert!(matches!(outer.branches[0].result, Expression::Case(_)));
}

#[test]
fn test_case_requires_end() {
    assert!(parse_expression("CASE WHEN a THEN b").is_err());
    assert!(parse_expression("CASE a THEN b END").is_err());
}

#[test]
fn test_cast() {
    assert_eq!(
        parse("cast(\"the_date\" as DATE)"),
        call(
            CallType::Cast,
            "CAST",
            vec![
                Expression::StringLiteral("the_date".to_string()),
                Expression::SymbolLiteral("DATE".to_string()),
            ]
        )
    );
}

#[test]
fn test_cast_rejects_two_values() {
    let err = parse_expression("cast(a, \"the_date\" as DATE)").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { .. }));
}

#[test]
fn test_cast_value_is_full_expression() {
    assert_eq!(
        parse("CAST(a + 1 AS Integer)"),
        call(
            CallType::Cast,
            "CAST",
            vec![
                infix("+", name("a"), num("1")),
                Expression::SymbolLiteral("Integer".to_string()),
            ]
        )
    );
}

// ============================================================================
// Nesting
// ============================================================================

#[test]
fn test_deep_parentheses_do_not_overflow() {
    let depth = 100_000;
    let input = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    let options = ParseOptions {
        max_nesting_depth: depth + 1,
    };
    let mut parser = Parser::with_options(Lexer::new(&input), options).unwrap();
    assert_eq!(parser.parse_expression().unwrap(), num("1"));
}

/// Runs `f` on a thread with a 2 MiB stack, the size spawned threads get by
/// default.
fn on_small_stack(f: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap();
}

/// Every recursive operation on the tree: clone, compare, render, drop.
fn clone_render_and_drop(expr: Expression) {
    let copy = expr.clone();
    assert_eq!(copy, expr);
    let tree = expression_to_json(&expr);
    assert!(to_json_string(&tree, true).starts_with('{'));
    drop(tree);
    drop(copy);
    drop(expr);
}

fn too_deep(input: &str) -> bool {
    matches!(
        parse_expression(input),
        Err(ParseError::NestingTooDeep { limit }) if limit == DEFAULT_DEPTH
    )
}

const DEFAULT_DEPTH: usize = ParseOptions::DEFAULT_MAX_NESTING_DEPTH;

#[test]
fn test_deep_braces() {
    on_small_stack(|| {
        let input = format!("{}x{}", "{".repeat(DEFAULT_DEPTH), "}".repeat(DEFAULT_DEPTH));
        let expr = parse(&input);
        let mut current = &expr;
        for _ in 0..DEFAULT_DEPTH {
            let call = expect_call(current);
            assert_eq!(call.call_type, CallType::Braces);
            assert_eq!(call.args.len(), 1);
            current = &call.args[0];
        }
        assert_eq!(*current, name("x"));
        clone_render_and_drop(expr);
    });
}

#[test]
fn test_braces_past_default_limit() {
    let depth = DEFAULT_DEPTH + 1;
    assert!(too_deep(&format!("{}x{}", "{".repeat(depth), "}".repeat(depth))));
}

#[test]
fn test_deep_calls_at_default_limit() {
    on_small_stack(|| {
        let input = format!("{}1{}", "f(".repeat(DEFAULT_DEPTH), ")".repeat(DEFAULT_DEPTH));
        clone_render_and_drop(parse(&input));

        let depth = DEFAULT_DEPTH + 1;
        assert!(too_deep(&format!("{}1{}", "f(".repeat(depth), ")".repeat(depth))));
    });
}

#[test]
fn test_prefix_chain_at_default_limit() {
    on_small_stack(|| {
        let expr = parse(&format!("{}1", "NOT ".repeat(DEFAULT_DEPTH)));
        let outer = expect_call(&expr);
        assert_eq!(outer.call_type, CallType::TermPrefix);
        assert_eq!(outer.name, "NOT");
        clone_render_and_drop(expr);

        assert!(too_deep(&format!("{}1", "NOT ".repeat(DEFAULT_DEPTH + 1))));
    });
}

#[test]
fn test_long_prefix_chains_are_rejected() {
    on_small_stack(|| {
        assert!(too_deep(&format!("{}1", "- ".repeat(100_000))));
        assert!(too_deep(&format!("{}1", "NOT ".repeat(100_000))));
        assert!(too_deep(&format!("{}1", "NOT a = ".repeat(100_000))));
    });
}

#[test]
fn test_infix_chain_counts_toward_limit() {
    on_small_stack(|| {
        // `1 + 1 + ..` is left-nested, one level per operator
        let expr = parse(&format!("1{}", " + 1".repeat(DEFAULT_DEPTH)));
        clone_render_and_drop(expr);

        assert!(too_deep(&format!("1{}", " + 1".repeat(DEFAULT_DEPTH + 1))));
        assert!(too_deep(&format!("1{}", " + 1".repeat(100_000))));
    });
}

#[test]
fn test_property_chain_counts_toward_limit() {
    on_small_stack(|| {
        let expr = parse(&format!("x{}", ".Parent".repeat(DEFAULT_DEPTH)));
        clone_render_and_drop(expr);

        assert!(too_deep(&format!("x{}", ".Parent".repeat(100_000))));
    });
}

#[test]
fn test_identifier_segments_do_not_count_toward_limit() {
    let expr = parse(&format!("x{}", ".[y]".repeat(10_000)));
    let id = expr.as_compound_id().unwrap();
    assert_eq!(id.len(), 10_001);
}

#[test]
fn test_nesting_limit() {
    let options = ParseOptions {
        max_nesting_depth: 3,
    };
    let mut parser = Parser::with_options(Lexer::new("f(g(h(1)))"), options).unwrap();
    assert!(parser.parse_expression().is_ok());

    let mut parser = Parser::with_options(Lexer::new("f(g(h(i(1))))"), options).unwrap();
    assert_eq!(
        parser.parse_expression().unwrap_err(),
        ParseError::NestingTooDeep { limit: 3 }
    );
}

#[test]
fn test_default_nesting_limit() {
    let depth = ParseOptions::DEFAULT_MAX_NESTING_DEPTH + 1;
    let input = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert!(matches!(
        parse_expression(&input),
        Err(ParseError::NestingTooDeep { .. })
    ));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_lex_errors_surface_as_parse_errors() {
    let err = parse_expression("[abc").unwrap_err();
    assert!(matches!(err, ParseError::Lex(_)));
    assert!(err.to_string().contains("Unterminated"));
}

#[test]
fn test_error_position() {
    let err = parse_expression("f(a,\n  })").unwrap_err();
    match err {
        ParseError::UnexpectedToken { position, found, .. } => {
            assert_eq!(found, "'}'");
            assert_eq!(position.line, 2);
            assert_eq!(position.column, 3);
        }
        other => panic!("Unexpected error {:?}", other),
    }
}
