//! Program declarations and `await`

mod common;

use axo_runtime::{RuntimeError, Value};
use common::{run_expect_output, run_source};
use pretty_assertions::assert_eq;

#[test]
fn test_await_runs_program_and_returns_value() {
    let source = "
        program job(n: int) { return n * 2; }
        print(await job(21));
    ";
    assert_eq!(run_expect_output(source), "42\n");
}

#[test]
fn test_plain_call_is_synchronous() {
    let source = "
        program job() { print(\"inside\"); }
        job();
        print(\"after\");
    ";
    assert_eq!(run_expect_output(source), "inside\nafter\n");
}

#[test]
fn test_awaited_program_sees_environment_snapshot() {
    let source = "
        var base: int = 10;
        program job(n: int) { print(base + n); }
        await job(5);
    ";
    assert_eq!(run_expect_output(source), "15\n");
}

#[test]
fn test_awaited_program_bindings_do_not_leak_back() {
    let source = "
        var x: int = 1;
        program job() { x = 99; }
        await job();
        print(x);
    ";
    // The body worked on a snapshot; the caller's binding is untouched
    assert_eq!(run_expect_output(source), "1\n");
}

#[test]
fn test_plain_call_mutates_caller_environment() {
    let source = "
        var x: int = 1;
        program job() { x = 99; }
        job();
        print(x);
    ";
    // A synchronous call runs in the caller's own environment
    assert_eq!(run_expect_output(source), "99\n");
}

#[test]
fn test_aggregates_keep_reference_semantics_across_await() {
    let source = "
        var xs: [int] = [1];
        program job() { push(xs, 2); }
        await job();
        print(len(xs));
    ";
    // The snapshot copies bindings, not aggregate storage
    assert_eq!(run_expect_output(source), "2\n");
}

#[test]
fn test_program_arity_checked() {
    let err = run_source("program job(n: int) { } await job();").unwrap_err();
    assert!(matches!(err, RuntimeError::Type { .. }));
}

#[test]
fn test_await_non_program_falls_back_to_plain_evaluation() {
    assert_eq!(run_source("await (1 + 2);").unwrap(), Value::Int(3));
    assert_eq!(
        run_source("func f() -> int { return 4; } await f();").unwrap(),
        Value::Int(4)
    );
}

#[test]
fn test_program_resolves_before_function() {
    let source = "
        program job() { return 1; }
        job();
    ";
    assert_eq!(run_source(source).unwrap(), Value::Int(1));
}

#[test]
fn test_caller_environment_restored_after_error() {
    let source = "
        var x: int = 7;
        program job() { throw \"boom\"; }
        try { await job(); } catch(e) { print(e); }
        print(x);
    ";
    assert_eq!(run_expect_output(source), "boom\n7\n");
}
