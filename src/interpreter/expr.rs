use crate::{
    ast::{
        ast::{Node, NodeKind},
        expressions::{AssignOperator, VariableAccess, VariableAssign},
    },
    errors::errors::{RUN_ERROR, TYPE_ERROR, UNDEFINED_ERROR},
    value::{
        dictionary::Dictionary,
        value::{Value, ValueKind},
    },
    Span,
};

use super::{
    calls::{binary_operation, call_value, define_function, define_object, retrieve, unary_operation},
    context::Context,
    control::{eval_count, eval_if, eval_try, eval_while},
    include::eval_include,
    interpreter::Interpreter,
    result::{RuntimeResult, Signal},
};

/// Evaluates `node` in `context`, dispatching on the node kind.
pub fn eval_node(interpreter: &mut Interpreter, node: &Node, context: &Context) -> RuntimeResult {
    let value = match &node.kind {
        NodeKind::Integer(value) => Value::integer(*value),
        NodeKind::Float(value) => Value::float(*value),
        NodeKind::String(value) => Value::string(value),
        NodeKind::CharacterList(value) => Value::character_list(value.chars().collect()),

        NodeKind::Array(elements) => Value::array(eval_elements(interpreter, elements, context)?),
        NodeKind::List(elements) => Value::list(eval_elements(interpreter, elements, context)?),
        NodeKind::Dictionary(pairs) => eval_dictionary(interpreter, pairs, context)?,

        NodeKind::VariableAccess(access) => eval_access(access, node, context)?,
        NodeKind::VariableAssign(assign) => eval_assign(interpreter, assign, node, context)?,
        NodeKind::Binary(binary) => {
            let left = interpreter.evaluate(&binary.left, context)?;
            let right = interpreter.evaluate(&binary.right, context)?;
            binary_operation(interpreter, left, binary.operator, right, &node.span, context)?
        }
        NodeKind::Unary(unary) => {
            let operand = interpreter.evaluate(&unary.operand, context)?;
            unary_operation(interpreter, operand, unary.operator, &node.span, context)?
        }
        NodeKind::Attribute(attribute) => {
            let object = interpreter.evaluate(&attribute.object, context)?;
            retrieve(interpreter, object, &attribute.member, context)?
        }
        NodeKind::Call(call) => {
            let callee = interpreter.evaluate(&call.callee, context)?;
            let arguments = eval_elements(interpreter, &call.arguments, context)?;
            call_value(interpreter, callee, arguments, &node.span, context)?
        }

        NodeKind::If(expr) => eval_if(interpreter, expr, context)?,
        NodeKind::Count(expr) => eval_count(interpreter, expr, node, context)?,
        NodeKind::While(expr) => eval_while(interpreter, expr, context)?,
        NodeKind::Try(expr) => eval_try(interpreter, expr, context)?,
        NodeKind::Function(definition) => define_function(definition, context),
        NodeKind::Object(definition) => define_object(interpreter, definition, context)?,
        NodeKind::Include(include) => eval_include(interpreter, include, node, context)?,

        NodeKind::Return(value) => {
            let value = match value {
                Some(value) => interpreter.evaluate(value, context)?,
                None => Value::nothing(),
            };
            return Err(Signal::Return(value, node.span.clone()));
        }
        NodeKind::Skip => return Err(Signal::Skip(node.span.clone())),
        NodeKind::Stop => return Err(Signal::Stop(node.span.clone())),

        NodeKind::Statements(statements) => {
            let mut last = Value::nothing();
            for statement in statements {
                last = interpreter.evaluate(statement, context)?;
            }
            last
        }
    };

    Ok(value.with_span(node.span.clone()))
}

/// Evaluates each node left to right. Elements are stored, so they lose
/// their context stamps.
pub fn eval_elements(
    interpreter: &mut Interpreter,
    nodes: &[Node],
    context: &Context,
) -> Result<Vec<Value>, Signal> {
    nodes
        .iter()
        .map(|node| interpreter.evaluate(node, context).map(|value| value.detached()))
        .collect()
}

fn eval_dictionary(
    interpreter: &mut Interpreter,
    pairs: &[(Node, Node)],
    context: &Context,
) -> RuntimeResult {
    let mut dictionary = Dictionary::new();

    for (key_node, value_node) in pairs {
        let key = interpreter.evaluate(key_node, context)?;
        let value = interpreter.evaluate(value_node, context)?;
        dictionary
            .insert(key, value)
            .map_err(|error| Signal::Error(error.at(&key_node.span, context)))?;
    }

    Ok(Value::dictionary(dictionary))
}

pub fn undefined(name: &str, span: &Span, context: &Context) -> Signal {
    Signal::error(
        UNDEFINED_ERROR,
        format!("'{}' is not defined", name),
        span,
        context,
    )
}

/// Builtin names in the root win; anything else comes from the innermost
/// unlocked scope outward.
fn lookup_global(context: &Context, name: &str) -> Option<Value> {
    context
        .root()
        .get_local(name)
        .or_else(|| context.global_scope().get(name))
}

fn eval_access(access: &VariableAccess, node: &Node, context: &Context) -> RuntimeResult {
    let found = if access.is_global {
        lookup_global(context, &access.name)
    } else {
        context.get(&access.name)
    };

    match found {
        Some(value) => Ok(value.with_context(context)),
        None => Err(undefined(&access.name, &node.span, context)),
    }
}

fn eval_assign(
    interpreter: &mut Interpreter,
    assign: &VariableAssign,
    node: &Node,
    context: &Context,
) -> RuntimeResult {
    let value = interpreter.evaluate(&assign.value, context)?;
    let (scope, name) = assignment_scope(assign, node, context)?;

    let value = match assign.operator {
        AssignOperator::Assign => value,
        AssignOperator::Compound(operator) => {
            let old = if assign.target.len() > 1 {
                scope.get_local(name)
            } else if assign.is_global {
                lookup_global(context, name)
            } else {
                context.get(name)
            };
            let Some(old) = old else {
                return Err(undefined(name, &node.span, context));
            };

            let result =
                binary_operation(interpreter, old.clone(), operator, value, &node.span, context)?;
            // In-place operators hand back Nothing; the container itself
            // stays bound.
            if result.is_nothing() && old.is_mutable_container() {
                old
            } else {
                result
            }
        }
    };

    scope.set(name, value.clone());
    Ok(value)
}

/// The context an assignment writes to, and the name it writes.
fn assignment_scope<'a>(
    assign: &'a VariableAssign,
    node: &Node,
    context: &Context,
) -> Result<(Context, &'a str), Signal> {
    let Some((last, path)) = assign.target.split_last() else {
        return Err(Signal::error(RUN_ERROR, "empty assignment target", &node.span, context));
    };

    if path.is_empty() {
        let scope = if assign.is_global {
            context.global_scope()
        } else {
            context.clone()
        };
        return Ok((scope, last.as_str()));
    }

    if assign.is_global {
        return Err(Signal::error(
            RUN_ERROR,
            "'global' cannot be used when assigning to an attribute",
            &node.span,
            context,
        ));
    }

    let mut owner = context
        .get(&path[0])
        .ok_or_else(|| undefined(&path[0], &node.span, context))?;
    for name in &path[1..] {
        owner = object_scope(&owner, node, context)?
            .get_local(name)
            .ok_or_else(|| {
                Signal::error(
                    UNDEFINED_ERROR,
                    format!("'{}' has no member '{}'", owner.type_name(), name),
                    &node.span,
                    context,
                )
            })?;
    }

    Ok((object_scope(&owner, node, context)?, last.as_str()))
}

fn object_scope(owner: &Value, node: &Node, context: &Context) -> Result<Context, Signal> {
    match &owner.kind {
        ValueKind::Object(object) => Ok(object.internal.clone()),
        _ => Err(Signal::error(
            TYPE_ERROR,
            format!("cannot assign attributes of a value of type {}", owner.type_name()),
            &node.span,
            context,
        )),
    }
}
