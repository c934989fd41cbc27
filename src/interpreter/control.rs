use crate::{
    ast::{
        ast::Node,
        statements::{CountExpr, IfExpr, TryExpr, WhileExpr},
    },
    errors::errors::{Error, MATH_ERROR, RUN_ERROR, TYPE_ERROR},
    value::value::{Value, ValueKind},
};

use super::{
    calls::truthy,
    context::Context,
    interpreter::Interpreter,
    result::{RuntimeResult, Signal},
};

/// Turns a signal that escaped every construct able to handle it into an
/// error.
pub fn escaped(signal: Signal, context: &Context) -> Error {
    let (span, detail) = match signal {
        Signal::Error(error) => return error,
        Signal::Return(_, span) => (span, "'return' used outside of a function"),
        Signal::Skip(span) => (span, "'skip' used outside of a loop"),
        Signal::Stop(span) => (span, "'stop' used outside of a loop"),
    };
    Error::runtime(RUN_ERROR, detail, span, context)
}

fn finish(value: Value, discard_results: bool) -> RuntimeResult {
    Ok(if discard_results { Value::nothing() } else { value })
}

pub fn eval_if(interpreter: &mut Interpreter, expr: &IfExpr, context: &Context) -> RuntimeResult {
    for (condition, body) in &expr.cases {
        let value = interpreter.evaluate(condition, context)?;
        if truthy(interpreter, &value, &condition.span, context)? {
            let result = interpreter.evaluate(body, context)?;
            return finish(result, expr.discard_results);
        }
    }

    match &expr.else_case {
        Some(body) => {
            let result = interpreter.evaluate(body, context)?;
            finish(result, expr.discard_results)
        }
        None => Ok(Value::nothing()),
    }
}

/// What a loop does after one pass over its body.
enum Flow {
    /// Carry on, keeping the iteration's value if there is one.
    Continue(Option<Value>),
    Stop,
}

fn run_iteration(
    interpreter: &mut Interpreter,
    body: &Node,
    discard_results: bool,
    context: &Context,
) -> Result<Flow, Signal> {
    match interpreter.evaluate(body, context) {
        Ok(value) => Ok(Flow::Continue((!discard_results).then_some(value))),
        Err(Signal::Skip(_)) => Ok(Flow::Continue(None)),
        Err(Signal::Stop(_)) => Ok(Flow::Stop),
        Err(signal) => Err(signal),
    }
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Integer(i64),
    Float(f64),
}

impl Bound {
    fn as_f64(self) -> f64 {
        match self {
            Bound::Integer(value) => value as f64,
            Bound::Float(value) => value,
        }
    }
}

fn eval_bound(
    interpreter: &mut Interpreter,
    node: &Node,
    role: &str,
    context: &Context,
) -> Result<Bound, Signal> {
    let value = interpreter.evaluate(node, context)?;
    match value.kind {
        ValueKind::Integer(value) => Ok(Bound::Integer(value)),
        ValueKind::Float(value) => Ok(Bound::Float(value)),
        _ => Err(Signal::error(
            TYPE_ERROR,
            format!("count {} must be a number, not {}", role, value.type_name()),
            &node.span,
            context,
        )),
    }
}

/// `count`: the end is exclusive. The loop variable is an integer when the
/// step is one, a float otherwise.
pub fn eval_count(
    interpreter: &mut Interpreter,
    expr: &CountExpr,
    node: &Node,
    context: &Context,
) -> RuntimeResult {
    let start = match &expr.start {
        Some(start) => eval_bound(interpreter, start, "start", context)?,
        None => Bound::Integer(0),
    };
    let end = eval_bound(interpreter, &expr.end, "end", context)?;
    let step = match &expr.step {
        Some(step) => eval_bound(interpreter, step, "step", context)?,
        None => Bound::Integer(1),
    };

    if step.as_f64() == 0.0 {
        let span = expr.step.as_ref().map_or(&node.span, |step| &step.span);
        return Err(Signal::error(MATH_ERROR, "count step cannot be zero", span, context));
    }

    let mut results = vec![];
    let mut iterate = |interpreter: &mut Interpreter, current: Value| -> Result<bool, Signal> {
        if let Some(variable) = &expr.variable {
            context.set(variable, current);
        }
        match run_iteration(interpreter, &expr.body, expr.discard_results, context)? {
            Flow::Continue(value) => {
                results.extend(value.map(|value| value.detached()));
                Ok(true)
            }
            Flow::Stop => Ok(false),
        }
    };

    if let (Bound::Integer(start), Bound::Integer(end), Bound::Integer(step)) = (start, end, step) {
        let mut current = start;
        while (step > 0 && current < end) || (step < 0 && current > end) {
            if !iterate(interpreter, Value::integer(current))? {
                break;
            }
            match current.checked_add(step) {
                Some(next) => current = next,
                None => break,
            }
        }
    } else {
        let (end, increment) = (end.as_f64(), step.as_f64());
        let mut current = start.as_f64();
        while (increment > 0.0 && current < end) || (increment < 0.0 && current > end) {
            let variable = match step {
                Bound::Integer(_) => Value::integer(current as i64),
                Bound::Float(_) => Value::float(current),
            };
            if !iterate(interpreter, variable)? {
                break;
            }
            current += increment;
        }
    }

    finish(Value::array(results), expr.discard_results)
}

pub fn eval_while(
    interpreter: &mut Interpreter,
    expr: &WhileExpr,
    context: &Context,
) -> RuntimeResult {
    let mut results = vec![];

    loop {
        let condition = interpreter.evaluate(&expr.condition, context)?;
        if !truthy(interpreter, &condition, &expr.condition.span, context)? {
            break;
        }

        match run_iteration(interpreter, &expr.body, expr.discard_results, context)? {
            Flow::Continue(value) => results.extend(value.map(|value| value.detached())),
            Flow::Stop => break,
        }
    }

    finish(Value::array(results), expr.discard_results)
}

/// `try`: handlers are tried in order against the error's tag. Fatal errors
/// pass through untouched. A `try` without handlers swallows the error.
pub fn eval_try(interpreter: &mut Interpreter, expr: &TryExpr, context: &Context) -> RuntimeResult {
    let error = match interpreter.evaluate(&expr.body, context) {
        Ok(value) => return finish(value, expr.discard_results),
        Err(Signal::Error(error)) if !error.is_fatal() => error,
        Err(signal) => return Err(signal),
    };

    if expr.handlers.is_empty() {
        return Ok(Value::nothing());
    }

    let tag = error.get_error_name().to_string();
    tracing::trace!(tag = %tag, "caught error");

    for handler in &expr.handlers {
        let matches = match &handler.tag {
            None => true,
            Some(tag_node) => {
                let expected = interpreter.evaluate(tag_node, context)?;
                match &expected.kind {
                    ValueKind::String(expected) => **expected == *tag,
                    _ => {
                        return Err(Signal::error(
                            TYPE_ERROR,
                            format!("error tags must be strings, not {}", expected.type_name()),
                            &tag_node.span,
                            context,
                        ))
                    }
                }
            }
        };

        if matches {
            if let Some(variable) = &handler.variable {
                context.set(variable, Value::string(&tag));
            }
            let result = interpreter.evaluate(&handler.body, context)?;
            return finish(result, expr.discard_results);
        }
    }

    Err(Signal::Error(error))
}
