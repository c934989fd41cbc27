//! Integration tests for end-to-end evaluation.
//!
//! These tests drive the public API from source text through lexing, parsing
//! and evaluation, including includes resolved on disk, native extensions
//! and error rendering.

use std::fs;

use pretty_assertions::assert_eq;

use brisk::{
    errors::errors::Error,
    interpreter::output::SharedBuffer,
    render_error,
    value::dictionary::Dictionary,
    Config, Interpreter, Value,
};

fn interpreter_with(config: Config) -> (Interpreter, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let interpreter = Interpreter::new(config).with_output(buffer.clone());
    (interpreter, buffer)
}

fn run(source: &str) -> Result<Value, Error> {
    interpreter_with(Config::default()).0.run("main.brisk", source)
}

fn value_of(source: &str) -> String {
    match run(source) {
        Ok(value) => value.to_string(),
        Err(error) => panic!("unexpected error:\n{}", render_error(&error)),
    }
}

fn error_of(source: &str) -> Error {
    match run(source) {
        Ok(value) => panic!("expected an error, got {}", value),
        Err(error) => error,
    }
}

#[test]
fn test_arithmetic_result_follows_left_operand() {
    assert_eq!(value_of("type_of(3 + 0.5)"), "integer");
    assert_eq!(value_of("type_of(3.0 + 1)"), "float");
    assert_eq!(value_of("3 + 0.5"), "3");
    assert_eq!(value_of("1.5 * 2"), "3.0");

    for source in ["1 / 0", "1 / 0.0", "1.0 / 0", "1 % 0", "2.5 % 0.0"] {
        assert_eq!(error_of(source).get_error_name(), "math-error", "{}", source);
    }
}

#[test]
fn test_indexing_every_container() {
    assert_eq!(value_of("(1, 2, 3) <= 2"), "3");
    assert_eq!(value_of("[1, 2, 3] <= 0"), "1");
    assert_eq!(value_of("\"abc\" <= 1"), "b");
    assert_eq!(value_of("'abc' <= 2"), "c");
    assert_eq!(value_of("{1: \"one\"} <= 1.0"), "one");

    for source in ["(1, 2) <= 2", "[1] <= -1", "\"\" <= 0", "'ab' <= 5"] {
        let error = error_of(source);
        assert_eq!(error.get_error_name(), "index-error", "{}", source);
        assert_eq!(error.get_span().start.line, 0);
    }
}

#[test]
fn test_escapes_are_decoded() {
    assert_eq!(value_of("\"a\\nb\".length"), "3");
    assert_eq!(value_of("\"\\u0041\\U01F600\".length"), "2");
    assert_eq!(value_of("\"\\u0041\""), "A");
}

#[test]
fn test_global_scope_is_shared_between_sibling_calls() {
    let source = "\
function outer do
    function set_it do
        global shared : 5
    end
    function get_it do
        return shared
    end
    set_it()
    return get_it()
end
outer()";
    assert_eq!(value_of(source), "5");
    assert_eq!(value_of(&format!("{}\nshared", source)), "5");

    let error = error_of("function f do\n    hidden : 1\nend\nf()\nhidden");
    assert_eq!(error.get_error_name(), "undefined-error");
}

#[test]
fn test_try_error() {
    assert_eq!(
        value_of("try do (1/0) error \"math-error\" as e do (e)"),
        "math-error"
    );
    assert_eq!(value_of("try do (1/0) error do (0)"), "0");

    let error = error_of("try do (1/0) error \"key-error\" do (0)");
    assert_eq!(error.get_error_name(), "math-error");
}

#[test]
fn test_loops_with_stop_and_skip_terminate() {
    assert_eq!(value_of("count from 1 to 4 do stop"), "()");
    assert_eq!(value_of("count from 1 to 4 do skip"), "()");
    assert_eq!(
        value_of("count from 1 to 4 as i do if i = 3 do skip else do i"),
        "(1, 2)"
    );
    assert_eq!(
        value_of("x : 0\nwhile true do if x = 3 do stop else do x :+ 1"),
        "(1, 2, 3)"
    );
}

#[test]
fn test_child_must_declare_parent_parameters_at_definition() {
    let source = "\
object Shape with sides do
    corners : sides
end
object Square from Shape do
    area : 4
end";
    let error = error_of(source);

    assert_eq!(error.get_error_name(), "type-error");
    assert_eq!(error.get_span().start.line, 3);
}

#[test]
fn test_quick_syntax() {
    let source = "\
!fd double v x: x * 2
!c 1 -> 4 v k: double(k)";
    assert_eq!(value_of(source), "(2, 4, 6)");

    assert_eq!(value_of("!f 1 < 2: \"yes\" l: \"no\""), "yes");
    assert_eq!(value_of("!t: 1 / 0 e \"math-error\" v err: err"), "math-error");
    assert_eq!(
        value_of("total : 0\n!w total < 3:\n    total :+ 1\nd\ntotal"),
        "3"
    );
    assert_eq!(value_of("f : !fd v x: x + 1\nf(1)"), "2");
}

#[test]
fn test_show_output() {
    let (mut interpreter, buffer) = interpreter_with(Config::default());

    interpreter
        .run("main.brisk", "count from 1 to 3 as i do\n    show(i)\nend")
        .unwrap();
    interpreter.run("main.brisk", "show({\"a\": 'b'})").unwrap();

    assert_eq!(buffer.contents(), "1\n2\n{\"a\": 'b'}\n");
}

fn write_module(directory: &std::path::Path) {
    let module = "\
pi : 3
function area with r do pi * r * r
function twice with x do x * 2";
    fs::write(directory.join("geometry.brisk"), module).unwrap();
}

#[test]
fn test_include_from_search_path() {
    let directory = tempfile::tempdir().unwrap();
    write_module(directory.path());

    let config = Config::default().with_search_path(directory.path());
    let (mut interpreter, _) = interpreter_with(config);

    let value = interpreter
        .run("main.brisk", "include geometry\ngeometry.area(2)")
        .unwrap();
    assert_eq!(value, Value::integer(12));

    let value = interpreter
        .run("main.brisk", "include \"geometry\" as geo\ngeo.pi")
        .unwrap();
    assert_eq!(value, Value::integer(3));

    let value = interpreter
        .run("main.brisk", "include twice from geometry as double\ndouble(4)")
        .unwrap();
    assert_eq!(value, Value::integer(8));
}

#[test]
fn test_include_dump_and_quick_include() {
    let directory = tempfile::tempdir().unwrap();
    write_module(directory.path());

    let config = Config::default().with_search_path(directory.path());
    let (mut interpreter, _) = interpreter_with(config);

    let value = interpreter
        .run("main.brisk", "include geometry dump\narea(1)")
        .unwrap();
    assert_eq!(value, Value::integer(3));

    let value = interpreter
        .run("main.brisk", "!i \"geometry\" v geo\ngeo.twice(5)")
        .unwrap();
    assert_eq!(value, Value::integer(10));
}

#[test]
fn test_include_by_literal_path() {
    let directory = tempfile::tempdir().unwrap();
    write_module(directory.path());
    let path = directory.path().join("geometry.brisk");

    let source = format!("include {:?}\ngeometry.pi", path.display().to_string());
    assert_eq!(value_of(&source), "3");
}

#[test]
fn test_missing_module() {
    let error = error_of("include nowhere_to_be_found");

    assert_eq!(error.get_error_name(), "io-error");
    assert_eq!(error.get_detail(), "could not find module 'nowhere_to_be_found'");
}

fn constants() -> Value {
    Value::dictionary(
        Dictionary::from_pairs(vec![(Value::string("answer"), Value::integer(42))]).unwrap(),
    )
}

#[test]
fn test_native_extension() {
    let (mut interpreter, _) = interpreter_with(Config::default());
    interpreter.register_extension("constants", constants);

    let value = interpreter
        .run("main.brisk", "include constants\nconstants <= \"answer\"")
        .unwrap();
    assert_eq!(value, Value::integer(42));

    let value = interpreter
        .run("main.brisk", "include keys from constants\nkeys()")
        .unwrap();
    assert_eq!(value.to_string(), "[\"answer\"]");
}

#[test]
fn test_run_builtin_shares_the_program_context() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("setup.brisk");
    fs::write(&path, "shared_value : 10").unwrap();

    let source = format!("run({:?})\nshared_value + 1", path.display().to_string());
    assert_eq!(value_of(&source), "11");
}

#[test]
fn test_runtime_error_rendering() {
    let error = error_of("x : 1\ny : x / 0");

    assert_eq!(
        render_error(&error),
        "File 'main.brisk', line 2 - In '<program>'\n\
         (error) math-error: division by zero -> File 'main.brisk', line 2\n\
         y : x / 0\n    ~~~~~"
    );
}

#[test]
fn test_grammar_error_rendering() {
    let error = error_of("show(1 2)");

    assert_eq!(
        render_error(&error),
        "(error) invalid-grammar-error: expected ',' or ')' -> File 'main.brisk', line 1\n\
         show(1 2)\n       ~"
    );
}

#[test]
fn test_lexical_error() {
    let error = error_of("x : 1 @ 2");

    assert_eq!(error.get_error_name(), "unknown-character-error");
}

#[test]
fn test_deep_recursion_exhausts_the_stack() {
    let source = "\
function forever with n do
    return forever(n + 1)
end
try do forever(0) error do \"caught\"";
    let error = error_of(source);

    assert_eq!(error.get_error_name(), "stack-exhaustion");
    assert!(error.is_fatal());
}

#[test]
fn test_recursion_within_the_limit() {
    let source = "\
function depth with n do
    if n = 0 do
        return 0
    end
    return 1 + depth(n - 1)
end
depth(1000)";
    assert_eq!(value_of(source), "1000");
}
