//! Names every program starts with. They live in the locked root context.

use std::{fs, rc::Rc};

use crate::{
    errors::errors::{Error, IO_ERROR, TYPE_ERROR},
    value::{
        callable::{BuiltinFunction, NativeBuiltin},
        value::{Value, ValueKind},
    },
    Position, Span,
};

use super::{
    context::Context,
    interpreter::Interpreter,
    result::{RuntimeResult, Signal},
};

fn builtin(name: &str, arity: usize, function: NativeBuiltin) -> Value {
    Value::new(ValueKind::BuiltinFunction(Rc::new(BuiltinFunction::builtin(
        name,
        Some(arity),
        function,
    ))))
}

/// Creates the locked root context.
pub fn create_root() -> Context {
    let root = Context::new("<root>", None, Position::null(), true);

    root.set("true", Value::boolean(true));
    root.set("false", Value::boolean(false));
    root.set("nothing", Value::nothing());

    root.set("show", builtin("show", 1, show));
    root.set("show_error", builtin("show_error", 2, show_error));
    root.set("type_of", builtin("type_of", 1, type_of));
    root.set("run", builtin("run", 1, run));

    root
}

fn string_argument<'a>(
    value: &'a Value,
    what: &str,
    span: &Span,
    context: &Context,
) -> Result<&'a str, Signal> {
    match &value.kind {
        ValueKind::String(text) => Ok(text.as_ref()),
        _ => Err(Signal::error(
            TYPE_ERROR,
            format!("{} must be a string, not {}", what, value.type_name()),
            span,
            context,
        )),
    }
}

/// `show(value)`: writes the value and a new line to the output sink.
fn show(
    interpreter: &mut Interpreter,
    arguments: &[Value],
    span: &Span,
    context: &Context,
) -> RuntimeResult {
    interpreter
        .write_output(&format!("{}\n", arguments[0]))
        .map_err(|error| {
            Signal::error(IO_ERROR, format!("could not write output: {}", error), span, context)
        })?;
    Ok(Value::nothing())
}

/// `show_error(tag, detail)`: raises an error with a chosen tag.
fn show_error(
    _: &mut Interpreter,
    arguments: &[Value],
    span: &Span,
    context: &Context,
) -> RuntimeResult {
    let tag = string_argument(&arguments[0], "error tag", span, context)?;
    Err(Signal::Error(Error::runtime(
        tag,
        arguments[1].to_string(),
        span.clone(),
        context,
    )))
}

fn type_of(_: &mut Interpreter, arguments: &[Value], _: &Span, _: &Context) -> RuntimeResult {
    Ok(Value::string(arguments[0].type_name()))
}

/// `run(path)`: runs another script in the program context and returns its
/// value.
fn run(
    interpreter: &mut Interpreter,
    arguments: &[Value],
    span: &Span,
    context: &Context,
) -> RuntimeResult {
    let path = string_argument(&arguments[0], "script path", span, context)?;
    let source = fs::read_to_string(path).map_err(|error| {
        Signal::error(
            IO_ERROR,
            format!("could not read '{}': {}", path, error),
            span,
            context,
        )
    })?;

    let program = interpreter.program_context().clone();
    interpreter.enter(span, |interpreter| {
        interpreter
            .run_in(path, &source, &program)
            .map_err(Signal::Error)
    })
}
