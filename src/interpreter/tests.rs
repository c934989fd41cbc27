//! Unit tests for the interpreter module.
//!
//! This module runs small programs and checks their values, their output
//! and the errors they raise.

use pretty_assertions::assert_eq;

use crate::{config::Config, errors::errors::Error, value::value::Value};

use super::{include::sanitize, interpreter::Interpreter, output::SharedBuffer};

fn interpreter() -> (Interpreter, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let interpreter = Interpreter::new(Config::default()).with_output(buffer.clone());
    (interpreter, buffer)
}

fn evaluate(source: &str) -> Result<Value, Error> {
    interpreter().0.run("test.brisk", source)
}

/// The printed form of the program's value.
fn value_of(source: &str) -> String {
    match evaluate(source) {
        Ok(value) => value.to_string(),
        Err(error) => panic!("unexpected error:\n{}", error.render()),
    }
}

fn error_of(source: &str) -> Error {
    match evaluate(source) {
        Ok(value) => panic!("expected an error, got {}", value),
        Err(error) => error,
    }
}

#[test]
fn test_program_value_is_the_last_statement() {
    assert_eq!(value_of("1 + 2 * 3"), "7");
    assert_eq!(value_of("x : 2\nx ^ 3"), "8");
    assert_eq!(value_of(""), "nothing");
}

#[test]
fn test_show_writes_to_the_output_sink() {
    let (mut interpreter, buffer) = interpreter();

    let value = interpreter
        .run("test.brisk", "show(\"hi\")\nshow(1.0)\nshow([1, \"a\"])")
        .unwrap();

    assert!(value.is_nothing());
    assert_eq!(buffer.contents(), "hi\n1.0\n[1, \"a\"]\n");
}

#[test]
fn test_definitions_persist_across_runs() {
    let (mut interpreter, _) = interpreter();

    interpreter.run("first.brisk", "x : 4").unwrap();
    let value = interpreter.run("second.brisk", "x * 2").unwrap();

    assert_eq!(value, Value::integer(8));
    assert_eq!(interpreter.get_global("x"), Some(Value::integer(4)));
}

#[test]
fn test_functions() {
    assert_eq!(value_of("function add with a, b do a + b\nadd(2, 3)"), "5");
    assert_eq!(value_of("(function with x do x * 2)(21)"), "42");

    let source = "\
function fact with n do
    if n < 2 do
        return 1
    end
    return n * fact(n - 1)
end
fact(10)";
    assert_eq!(value_of(source), "3628800");
}

#[test]
fn test_block_functions_return_nothing_by_default() {
    assert_eq!(value_of("function f do\n    1\nend\nf()"), "nothing");
}

#[test]
fn test_argument_count_is_checked() {
    let error = error_of("function add with a, b do a + b\nadd(1)");

    assert_eq!(error.get_error_name(), "arguments-error");
    assert_eq!(error.get_detail(), "'add' takes 2 arguments, 1 given");
}

#[test]
fn test_assignment_inside_a_function_is_local() {
    let source = "\
x : 1
function f do
    x : 2
end
f()
x";
    assert_eq!(value_of(source), "1");
}

#[test]
fn test_global_assignment_reaches_the_program() {
    let source = "\
counter : 0
function bump do
    global counter :+ 1
end
bump()
bump()
counter";
    assert_eq!(value_of(source), "2");
}

#[test]
fn test_count_collects_results() {
    assert_eq!(value_of("count from 1 to 4 as i do i * 2"), "(2, 4, 6)");
    assert_eq!(value_of("count from 5 to 0 step -2 as i do i"), "(5, 3, 1)");
    assert_eq!(value_of("count from 0 to 1 step 0.5 as i do i"), "(0.0, 0.5)");
    assert_eq!(value_of("count to 3 do\n    1\nend"), "nothing");
}

#[test]
fn test_skip_and_stop() {
    assert_eq!(
        value_of("count to 10 as i do if i % 2 = 0 do skip else do i"),
        "(1, 3, 5, 7, 9)"
    );
    assert_eq!(
        value_of("count to 10 as i do if i = 3 do stop else do i"),
        "(0, 1, 2)"
    );
}

#[test]
fn test_count_step_zero() {
    let error = error_of("count to 3 step 0 do 1");

    assert_eq!(error.get_error_name(), "math-error");
    assert_eq!(error.get_detail(), "count step cannot be zero");
}

#[test]
fn test_while() {
    assert_eq!(value_of("x : 0\nwhile x < 5 do\n    x :+ 1\nend\nx"), "5");
    assert_eq!(value_of("x : 0\nwhile x < 3 do x :+ 1"), "(1, 2, 3)");
}

#[test]
fn test_try_binds_the_error_tag() {
    assert_eq!(
        value_of("try do 1 / 0 error \"math-error\" as err do err"),
        "math-error"
    );
    assert_eq!(
        value_of("try do show_error(\"custom\", \"boom\") error \"custom\" as t do t"),
        "custom"
    );
    assert_eq!(value_of("try do 1 / 0 error \"key-error\" do 1 error do 2"), "2");
    assert_eq!(value_of("try do missing"), "nothing");
}

#[test]
fn test_unmatched_error_propagates() {
    let error = error_of("try do 1 / 0 error \"type-error\" do 0");

    assert_eq!(error.get_error_name(), "math-error");
}

#[test]
fn test_error_tags_must_be_strings() {
    let error = error_of("try do 1 / 0 error 5 do 0");

    assert_eq!(error.get_error_name(), "type-error");
}

#[test]
fn test_undefined_name() {
    let error = error_of("missing + 1");

    assert_eq!(error.get_error_name(), "undefined-error");
    assert_eq!(error.get_detail(), "'missing' is not defined");
}

#[test]
fn test_stray_flow_statements() {
    assert_eq!(error_of("return 1").get_error_name(), "run-error");
    assert_eq!(error_of("skip").get_detail(), "'skip' used outside of a loop");

    let error = error_of("function f do stop\nf()");
    assert_eq!(error.get_detail(), "'stop' used outside of a loop");
}

#[test]
fn test_objects() {
    let source = "\
object Counter with start do
    total : start
    function increment do
        global total :+ 1
        return total
    end
end
c : Counter(5)
c.increment()
c.increment()
c.total";
    assert_eq!(value_of(source), "7");
    assert_eq!(value_of(&format!("{}\nc.total : 100\nc.total", source)), "100");
    assert_eq!(value_of(&format!("{}\ntype_of(c)", source)), "Counter");
}

#[test]
fn test_missing_member() {
    let error = error_of("object P do\n    a : 1\nend\nP().b");

    assert_eq!(error.get_error_name(), "undefined-error");
    assert_eq!(error.get_detail(), "'P' has no member 'b'");
}

#[test]
fn test_objects_have_the_common_members() {
    let definition = "object A do\n    a : 1\nend\n";

    assert_eq!(value_of(&format!("{}A().type", definition)), "A");
    assert_eq!(value_of(&format!("{}A().as_bool()", definition)), "true");
    assert_eq!(value_of(&format!("{}A().as_string()", definition)), "<object A>");
    assert_eq!(
        value_of("object B do\n    type : \"custom\"\nend\nB().type"),
        "custom"
    );
}

#[test]
fn test_inheritance() {
    let source = "\
object Base with x do
    doubled : x * 2
end
object Child with x, y from Base do
    sum : doubled + y
end
Child(3, 1).sum";
    assert_eq!(value_of(source), "7");

    let error = error_of("object Base with x do 0\nobject Bad with y from Base do 0");
    assert_eq!(error.get_error_name(), "type-error");
    assert_eq!(
        error.get_detail(),
        "'Bad' must declare the parameter 'x' of its parent 'Base'"
    );
}

#[test]
fn test_special_methods() {
    let source = "\
object Vector with x do
    function added_to with other do
        return Vector(x + other.x)
    end
    function is_true do
        return x > 0
    end
end
(Vector(1) + Vector(2)).x";
    assert_eq!(value_of(source), "3");
    assert_eq!(
        value_of(&format!("{}\nif Vector(0) do 1 else do 2", source)),
        "2"
    );
}

#[test]
fn test_special_method_arity_is_checked() {
    let error = error_of("object W do\n    function is_true with a do a\nend\nif W() do 1 else do 2");

    assert_eq!(error.get_error_name(), "arguments-error");
}

#[test]
fn test_boolean_operators_evaluate_both_operands() {
    let source = "\
calls : 0
function touch do
    global calls :+ 1
    return true
end
false and touch()
calls";
    assert_eq!(value_of(source), "1");
}

#[test]
fn test_compound_assignment_keeps_containers() {
    assert_eq!(value_of("items : [1]\nitems :+ 2\nitems"), "[1, 2]");
    assert_eq!(value_of("text : \"a\"\ntext :+ \"b\"\ntext"), "ab");
}

#[test]
fn test_containers() {
    assert_eq!(value_of("{\"a\": 1, \"b\": 2} <= \"b\""), "2");
    assert_eq!(value_of("[10, 20, 30] <= 1"), "20");
    assert_eq!(value_of("\"hello\".length"), "5");
    assert_eq!(value_of("5.as_string() + \"!\""), "5!");
    assert_eq!(value_of("2 in (1, 2, 3)"), "true");

    let error = error_of("{\"a\": 1} <= \"z\"");
    assert_eq!(error.get_error_name(), "key-error");
}

#[test]
fn test_builtin_names() {
    assert_eq!(value_of("type_of(1.5)"), "float");
    assert_eq!(value_of("type_of(nothing)"), "nothing");
    assert_eq!(value_of("true and invert false"), "true");
}

#[test]
fn test_traceback_lists_frames_innermost_first() {
    let error = error_of("function divide with a do\n    return a / 0\nend\ndivide(1)");
    let frames: Vec<(usize, &str)> = error
        .get_traceback()
        .iter()
        .map(|frame| (frame.line, frame.context.as_str()))
        .collect();

    assert_eq!(frames, vec![(2, "divide"), (4, "<program>")]);
    assert!(error
        .render()
        .ends_with("(error) math-error: division by zero -> File 'test.brisk', line 2\n    return a / 0\n           ~~~~~"));
}

#[test]
fn test_depth_limit_is_fatal() {
    let buffer = SharedBuffer::new();
    let mut interpreter = Interpreter::new(Config::default().with_max_depth(50)).with_output(buffer);

    let source = "function f do\n    return f()\nend\ntry do f() error do 0";
    let error = interpreter.run("test.brisk", source).unwrap_err();

    assert_eq!(error.get_error_name(), "stack-exhaustion");
    assert!(error.is_fatal());
}

#[test]
fn test_sanitize() {
    assert_eq!(sanitize("lib/math.brisk"), "math");
    assert_eq!(sanitize("my-module"), "my_module");
    assert_eq!(sanitize("2d"), "_2d");
}
