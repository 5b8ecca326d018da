//! End-to-end tests: source text in, `Object::inspect()` output out, through
//! the real lexer → parser → evaluator pipeline (no hand-built AST nodes).

use gorilla::{run, RunOutcome};

fn eval(src: &str) -> String {
    match run(src) {
        RunOutcome::Evaluated(result) => result.inspect(),
        RunOutcome::ParseFailed(errors) => panic!("unexpected parse errors for {src:?}: {errors:?}"),
    }
}

#[test]
fn fibonacci_via_recursion() {
    let src = r#"
        let fibonacci = fn(x) {
            if (x == 0) {
                0
            } else {
                if (x == 1) {
                    1
                } else {
                    fibonacci(x - 1) + fibonacci(x - 2)
                }
            }
        };
        fibonacci(10);
    "#;
    assert_eq!(eval(src), "55");
}

#[test]
fn closures_capture_and_retain_outer_bindings() {
    let src = r#"
        let makeCounter = fn() {
            let count = 0;
            fn() { count }
        };
        let counter = makeCounter();
        counter();
    "#;
    assert_eq!(eval(src), "0");
}

#[test]
fn higher_order_functions_compose() {
    let src = r#"
        let map = fn(arr, f) {
            let iter = fn(arr, accumulated) {
                if (len(arr) == 0) {
                    accumulated
                } else {
                    iter(rest(arr), push(accumulated, f(first(arr))))
                }
            };
            iter(arr, [])
        };
        let double = fn(x) { x * 2 };
        map([1, 2, 3, 4], double);
    "#;
    assert_eq!(eval(src), "[2, 4, 6, 8]");
}

#[test]
fn reduce_built_from_the_same_map_style_recursion() {
    let src = r#"
        let reduce = fn(arr, initial, f) {
            let iter = fn(arr, result) {
                if (len(arr) == 0) {
                    result
                } else {
                    iter(rest(arr), f(result, first(arr)))
                }
            };
            iter(arr, initial)
        };
        let sum = fn(arr) {
            reduce(arr, 0, fn(acc, el) { acc + el })
        };
        sum([1, 2, 3, 4, 5]);
    "#;
    assert_eq!(eval(src), "15");
}

#[test]
fn hash_and_array_literals_nest_and_index() {
    let src = r#"
        let people = [{"name": "Alice", "age": 30}, {"name": "Bob", "age": 24}];
        people[1]["name"];
    "#;
    assert_eq!(eval(src), "Bob");
}

#[test]
fn error_values_propagate_out_of_nested_expressions_and_halt_evaluation() {
    let src = r#"
        let x = 5;
        let y = x + true;
        let z = 10;
        z;
    "#;
    // `z` is never reached: the error from evaluating `y`'s initializer
    // aborts the whole program, matching the ReturnValue/Error unwinding
    // rule used by block and program evaluation alike.
    assert_eq!(eval(src), "ERROR: type mismatch: INTEGER + BOOLEAN");
}

#[test]
fn while_loops_retain_the_last_body_value_on_normal_exit() {
    let src = r#"
        let countdown = fn(n) {
            while (n > 0) {
                let n = n - 1;
                n
            }
        };
        countdown(3);
    "#;
    assert_eq!(eval(src), "0");
}

#[test]
fn mutual_recursion_through_a_shared_environment() {
    let src = r#"
        let isEven = fn(n) {
            if (n == 0) { true } else { isOdd(n - 1) }
        };
        let isOdd = fn(n) {
            if (n == 0) { false } else { isEven(n - 1) }
        };
        isEven(10);
    "#;
    assert_eq!(eval(src), "true");
}

#[test]
fn puts_output_is_captured_when_a_sink_is_supplied() {
    use gorilla::builtins::{BuiltinsRegistry, CapturingSink};
    use gorilla::{run_with_env, Environment};

    let env = Environment::new();
    let registry = BuiltinsRegistry::with_core();
    let mut sink = CapturingSink::default();

    let outcome = run_with_env(r#"puts("hello", 1 + 1);"#, &env, &registry, &mut sink);
    assert!(matches!(outcome, RunOutcome::Evaluated(_)));
    assert_eq!(sink.lines, vec!["hello".to_string(), "2".to_string()]);
}

#[test]
fn concrete_scenario_basic_let_and_arithmetic() {
    assert_eq!(eval("let a = 5; let b = a * 2; b"), "10");
}

#[test]
fn concrete_scenario_recursive_fibonacci_with_early_return() {
    let src = "let f = fn(x) { if (x < 2) { return x; } f(x-1) + f(x-2); }; f(10)";
    assert_eq!(eval(src), "55");
}

#[test]
fn concrete_scenario_tail_recursive_counter() {
    let src = "let counter = fn(n) { if (n > 3) { return n; } counter(n+1); }; counter(0)";
    assert_eq!(eval(src), "4");
}

#[test]
fn concrete_scenario_out_of_range_index_then_type_mismatch_pins_operand_order() {
    // a[5] is out of range -> Null; (a[1] + a[2]) is Integer; left-to-right
    // evaluation means the mismatch is reported as INTEGER on the left.
    assert_eq!(eval("let a = [1, 2, 3]; a[1] + a[2] + a[5]"), "ERROR: type mismatch: INTEGER + NULL");
}

#[test]
fn concrete_scenario_hash_lookup_hit_and_miss() {
    assert_eq!(eval(r#"let h = {"k": 10}; h["k"]"#), "10");
    assert_eq!(eval(r#"let h = {"k": 10}; h["missing"]"#), "null");
}

#[test]
fn concrete_scenario_string_concatenation() {
    assert_eq!(eval(r#""hello" + " " + "world""#), "hello world");
}

#[test]
fn concrete_scenario_if_else_branches() {
    assert_eq!(eval("if (1 < 2) { 10 } else { 20 }"), "10");
    assert_eq!(eval("if (false) { 10 }"), "null");
}

#[test]
fn concrete_scenario_immediately_invoked_function_literal() {
    assert_eq!(eval("fn(x){x+1}(41)"), "42");
}

#[test]
fn parse_errors_are_reported_without_panicking() {
    match run("let x 5;") {
        RunOutcome::ParseFailed(errors) => assert!(!errors.is_empty()),
        RunOutcome::Evaluated(result) => panic!("expected a parse failure, got {result:?}"),
    }
}
