//! Evaluator integration tests

mod common;

use axo_runtime::{RuntimeError, Value};
use common::{run_capture, run_expect_output, run_source};
use pretty_assertions::assert_eq;
use rstest::rstest;

// === Arithmetic and operators ===

#[rstest]
#[case("1 + 2;", Value::Int(3))]
#[case("7 - 10;", Value::Int(-3))]
#[case("6 * 7;", Value::Int(42))]
#[case("7 / 2;", Value::Int(3))]
#[case("7 % 3;", Value::Int(1))]
#[case("1.5 + 2.25;", Value::Float(3.75))]
#[case("2.0 * 3.5;", Value::Float(7.0))]
fn test_arithmetic(#[case] source: &str, #[case] expected: Value) {
    assert_eq!(run_source(source).unwrap(), expected);
}

#[rstest]
#[case("1 < 2;", true)]
#[case("2 <= 2;", true)]
#[case("3 > 4;", false)]
#[case("1 == 1;", true)]
#[case("1 != 1;", false)]
#[case("1.5 < 2.5;", true)]
fn test_comparisons(#[case] source: &str, #[case] expected: bool) {
    assert_eq!(run_source(source).unwrap(), Value::Bool(expected));
}

#[test]
fn test_string_concatenation() {
    assert_eq!(
        run_source("\"a\" + \"b\";").unwrap(),
        Value::string("ab")
    );
    // Any string operand pulls `+` into canonical concatenation
    assert_eq!(run_source("\"n = \" + 42;").unwrap(), Value::string("n = 42"));
    assert_eq!(run_source("1 + \"x\";").unwrap(), Value::string("1x"));
}

#[test]
fn test_integer_division_by_zero() {
    assert!(matches!(
        run_source("1 / 0;").unwrap_err(),
        RuntimeError::DivideByZero { .. }
    ));
    assert!(matches!(
        run_source("1 % 0;").unwrap_err(),
        RuntimeError::DivideByZero { .. }
    ));
}

#[test]
fn test_equality_is_canonical_outside_fast_paths() {
    assert_eq!(run_source("[1, 2] == [1, 2];").unwrap(), Value::Bool(true));
    assert_eq!(run_source("\"1\" == 1;").unwrap(), Value::Bool(true));
}

#[rstest]
#[case("!true;", false)]
#[case("!0;", true)]
#[case("!\"\";", true)]
#[case("!\"x\";", false)]
fn test_not_truthiness(#[case] source: &str, #[case] expected: bool) {
    assert_eq!(run_source(source).unwrap(), Value::Bool(expected));
}

#[test]
fn test_logical_operators_use_truthiness() {
    assert_eq!(run_source("1 && \"x\";").unwrap(), Value::Bool(true));
    assert_eq!(run_source("0 || [];").unwrap(), Value::Bool(false));
    assert_eq!(run_source("0 || 3;").unwrap(), Value::Bool(true));
}

#[test]
fn test_unary_negation() {
    assert_eq!(run_source("-3;").unwrap(), Value::Int(-3));
    assert_eq!(run_source("-2.5;").unwrap(), Value::Float(-2.5));
    assert!(run_source("-\"x\";").is_err());
}

// === Variables and scoping ===

#[test]
fn test_declaration_defaults() {
    assert_eq!(run_source("var n: int; n;").unwrap(), Value::Int(0));
    assert_eq!(run_source("var s: string; s;").unwrap(), Value::string(""));
    assert_eq!(
        run_source("var o: object; o;").unwrap().canonical(),
        "{}"
    );
}

#[test]
fn test_const_rejects_reassignment() {
    let err = run_source("const k: int = 1; k = 2;").unwrap_err();
    assert!(matches!(err, RuntimeError::Type { .. }));
}

#[test]
fn test_undefined_variable_is_name_error() {
    assert!(matches!(
        run_source("missing;").unwrap_err(),
        RuntimeError::UndefinedVariable { .. }
    ));
}

#[test]
fn test_block_scoping_and_shadowing() {
    let output = run_expect_output(
        "var x: int = 1;\n{ var x: int = 2; print(x); }\nprint(x);",
    );
    assert_eq!(output, "2\n1\n");
}

#[test]
fn test_assignment_walks_out_of_block() {
    assert_eq!(
        run_source("var x: int = 1; { x = 5; } x;").unwrap(),
        Value::Int(5)
    );
}

// === Functions ===

#[test]
fn test_fibonacci_end_to_end() {
    let output =
        run_expect_output("func f(n: int) -> int { if (n < 2) { return n; } return f(n - 1) + f(n - 2); } print(f(10));");
    assert_eq!(output, "55\n");
}

#[test]
fn test_function_without_return_yields_unit() {
    assert_eq!(
        run_source("func f() -> void { } f();").unwrap(),
        Value::Int(0)
    );
}

#[test]
fn test_function_expression_value() {
    assert_eq!(
        run_source("var double: (int)->int = func(n: int) -> int { return n * 2; }; double(21);")
            .unwrap(),
        Value::Int(42)
    );
}

#[test]
fn test_function_passed_as_argument() {
    let source = "
        func apply(f: (int)->int, n: int) -> int { return f(n); }
        func inc(n: int) -> int { return n + 1; }
        apply(inc, 41);
    ";
    assert_eq!(run_source(source).unwrap(), Value::Int(42));
}

#[test]
fn test_call_non_function_fails() {
    let err = run_source("var n: int = 3; n();").unwrap_err();
    assert!(matches!(err, RuntimeError::Kind { .. }));
}

#[test]
fn test_arity_must_match_exactly() {
    let err = run_source("func f(a: int, b: int) -> int { return a; } f(1);").unwrap_err();
    assert!(matches!(err, RuntimeError::Type { .. }));
}

// === Control flow ===

#[test]
fn test_while_with_break_and_continue() {
    let source = "
        var total: int = 0;
        var i: int = 0;
        while (true) {
            i = i + 1;
            if (i > 10) { break; }
            if (i % 2 == 0) { continue; }
            total = total + i;
        }
        total;
    ";
    // 1 + 3 + 5 + 7 + 9
    assert_eq!(run_source(source).unwrap(), Value::Int(25));
}

#[test]
fn test_for_loop_accumulates() {
    let source = "
        var total: int = 0;
        for (var i: int = 0; i < 5; i = i + 1) { total = total + i; }
        total;
    ";
    assert_eq!(run_source(source).unwrap(), Value::Int(10));
}

#[test]
fn test_for_loop_variable_is_scoped() {
    assert!(run_source("for (var i: int = 0; i < 3; i = i + 1) { } i;").is_err());
}

#[test]
fn test_else_if_chain() {
    let source = "
        func grade(n: int) -> string {
            if (n > 89) { return \"A\"; }
            else if (n > 79) { return \"B\"; }
            else { return \"C\"; }
        }
        grade(85);
    ";
    assert_eq!(run_source(source).unwrap(), Value::string("B"));
}

#[test]
fn test_return_unwinds_nested_loops() {
    let source = "
        func f() -> int {
            for (var i: int = 0; i < 10; i = i + 1) {
                while (true) { return i + 40; }
            }
            return -1;
        }
        f();
    ";
    assert_eq!(run_source(source).unwrap(), Value::Int(40));
}

// === Arrays, objects, reference semantics ===

#[test]
fn test_push_and_len_end_to_end() {
    let output = run_expect_output("var a: [int] = [1, 2, 3]; push(a, 4); print(len(a));");
    assert_eq!(output, "4\n");
}

#[test]
fn test_array_aliasing_is_observable() {
    let source = "
        var a: [int] = [1];
        var b: any = a;
        push(a, 2);
        len(b);
    ";
    assert_eq!(run_source(source).unwrap(), Value::Int(2));
}

#[test]
fn test_array_index_out_of_bounds() {
    assert!(matches!(
        run_source("var a: [int] = [1]; a[5];").unwrap_err(),
        RuntimeError::IndexOutOfBounds { .. }
    ));
    assert!(matches!(
        run_source("var a: [int] = [1]; a[-1];").unwrap_err(),
        RuntimeError::IndexOutOfBounds { .. }
    ));
}

#[test]
fn test_index_assignment() {
    assert_eq!(
        run_source("var a: [int] = [1, 2]; a[1] = 9; a[1];").unwrap(),
        Value::Int(9)
    );
}

#[test]
fn test_index_into_non_indexable_is_kind_error() {
    assert!(matches!(
        run_source("var n: int = 1; n[0];").unwrap_err(),
        RuntimeError::Kind { .. }
    ));
}

#[test]
fn test_string_indexing() {
    assert_eq!(run_source("\"abc\"[1];").unwrap(), Value::string("b"));
    assert!(matches!(
        run_source("\"abc\"[7];").unwrap_err(),
        RuntimeError::IndexOutOfBounds { .. }
    ));
}

#[test]
fn test_object_field_access_and_assignment() {
    let source = "
        var o: object = {name: \"A\"};
        o.name = \"B\";
        o.extra = 1;
        o.name + o.extra;
    ";
    assert_eq!(run_source(source).unwrap(), Value::string("B1"));
}

#[test]
fn test_object_index_with_string_key() {
    assert_eq!(
        run_source("var o: object = {a: 5}; o[\"a\"];").unwrap(),
        Value::Int(5)
    );
    // Missing key reads as the unit value
    assert_eq!(
        run_source("var o: object = {}; o[\"nope\"];").unwrap(),
        Value::Int(0)
    );
}

#[test]
fn test_object_insertion_order_printing() {
    let output = run_expect_output("print({b: 1, a: 2});");
    assert_eq!(output, "{b: 1, a: 2}\n");
}

#[test]
fn test_cyclic_array_prints_with_ellipsis() {
    let output = run_expect_output("var a: any = [1]; push(a, a); print(a);");
    assert_eq!(output, "[1, [...]]\n");
}

// === typeof ===

#[rstest]
#[case("typeof 1;", "int")]
#[case("typeof 1.5;", "float")]
#[case("typeof \"s\";", "string")]
#[case("typeof true;", "bool")]
#[case("typeof [1];", "array")]
#[case("typeof {};", "object")]
fn test_typeof_runtime_values(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(run_source(source).unwrap(), Value::string(expected));
}

#[test]
fn test_typeof_prefers_declared_type() {
    assert_eq!(
        run_source("var a: [int] = [1]; typeof a;").unwrap(),
        Value::string("[int]")
    );
    assert_eq!(
        run_source("type P = {name:string}; var p: P = {name: \"A\"}; typeof p;").unwrap(),
        Value::string("P")
    );
    assert_eq!(
        run_source("func f() -> int { return 1; } typeof f;").unwrap(),
        Value::string("function")
    );
}

#[test]
fn test_typeof_metadata_cleared_after_use() {
    // The second typeof sees a literal, not the stale identifier metadata
    let source = "var a: [int] = [1]; typeof a; typeof 1;";
    assert_eq!(run_source(source).unwrap(), Value::string("int"));
}

#[test]
fn test_typeof_undeclared_is_name_error() {
    assert!(matches!(
        run_source("typeof undeclared;").unwrap_err(),
        RuntimeError::UndefinedVariable { .. }
    ));
}

// === throw / try / catch / finally ===

#[test]
fn test_try_catch_finally_end_to_end() {
    let output =
        run_expect_output("try { throw \"e\"; } catch(v) { print(v); } finally { print(\"f\"); }");
    assert_eq!(output, "e\nf\n");
}

#[test]
fn test_uncaught_throw_is_fatal() {
    assert!(matches!(
        run_source("throw 42;").unwrap_err(),
        RuntimeError::Thrown { value: Value::Int(42), .. }
    ));
}

#[test]
fn test_catch_does_not_intercept_runtime_errors() {
    // An undefined variable inside try must stay fatal
    let err = run_source("try { missing; } catch(v) { print(\"caught\"); }").unwrap_err();
    assert!(matches!(err, RuntimeError::UndefinedVariable { .. }));
}

#[test]
fn test_finally_runs_on_fatal_error() {
    let (result, output) = run_capture("try { missing; } finally { print(\"f\"); }");
    assert!(result.is_err());
    assert_eq!(output, "f\n");
}

#[test]
fn test_finally_runs_on_return_path() {
    let source = "
        func f() -> int {
            try { return 1; } finally { print(\"f\"); }
            return 2;
        }
        print(f());
    ";
    let output = run_expect_output(source);
    assert_eq!(output, "f\n1\n");
}

#[test]
fn test_catch_can_rethrow() {
    let err = run_source("try { throw \"a\"; } catch(v) { throw v + \"b\"; }").unwrap_err();
    assert!(matches!(err, RuntimeError::Thrown { value, .. } if value == Value::string("ab")));
}

#[test]
fn test_thrown_value_can_be_aggregate() {
    let output = run_expect_output(
        "try { throw {code: 7, msg: \"bad\"}; } catch(e) { print(e.code); }",
    );
    assert_eq!(output, "7\n");
}

// === switch ===

#[test]
fn test_switch_matches_and_breaks() {
    let source = "
        var x: int = 2;
        switch (x) {
            case 1: print(\"one\"); break;
            case 2: print(\"two\"); break;
            case 3: print(\"three\"); break;
        }
    ";
    assert_eq!(run_expect_output(source), "two\n");
}

#[test]
fn test_switch_falls_through_without_break() {
    let source = "
        var x: int = 1;
        switch (x) {
            case 1: print(\"one\");
            case 2: print(\"two\");
            default: print(\"rest\");
        }
    ";
    // No implicit break: execution falls into later cases and default
    assert_eq!(run_expect_output(source), "one\ntwo\nrest\n");
}

#[test]
fn test_switch_default_joins_ordered_match() {
    let source = "
        var x: int = 99;
        switch (x) {
            case 1: print(\"one\"); break;
            default: print(\"other\");
            case 2: print(\"two\");
        }
    ";
    // Default matches in order, then falls through into the next case
    assert_eq!(run_expect_output(source), "other\ntwo\n");
}

#[test]
fn test_switch_matches_on_canonical_form() {
    let source = "
        switch (\"2\") {
            case 2: print(\"canonical\"); break;
            default: print(\"nope\");
        }
    ";
    assert_eq!(run_expect_output(source), "canonical\n");
}

// === Template strings ===

#[test]
fn test_template_interpolation() {
    let output = run_expect_output("var x: int = 41; print(\"x + 1 = ${x + 1}\");");
    assert_eq!(output, "x + 1 = 42\n");
}

#[test]
fn test_template_nested_braces() {
    let output = run_expect_output("print(\"obj: ${ {a: 1} }\");");
    assert_eq!(output, "obj: {a: 1}\n");
}

#[test]
fn test_template_unbalanced_stays_literal() {
    let output = run_expect_output("print(\"half ${open\");");
    assert_eq!(output, "half ${open\n");
}

#[test]
fn test_template_unparsable_stays_literal() {
    let output = run_expect_output("print(\"${;;}\");");
    assert_eq!(output, "${;;}\n");
}

#[test]
fn test_template_error_propagates() {
    assert!(matches!(
        run_source("print(\"${missing}\");").unwrap_err(),
        RuntimeError::UndefinedVariable { .. }
    ));
}

// === print ===

#[test]
fn test_print_multiple_arguments() {
    assert_eq!(run_expect_output("print(1, \"a\", true);"), "1 a true\n");
}

#[test]
fn test_print_array_and_function() {
    let output = run_expect_output("func f() -> void { } print([1, 2], f);");
    assert_eq!(output, "[1, 2] [function]\n");
}
