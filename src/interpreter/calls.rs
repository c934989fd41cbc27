use std::rc::Rc;

use crate::{
    ast::{
        ast::{Node, NodeKind},
        expressions::{BinaryOperator, UnaryOperator},
        statements::{FunctionDefinition, ObjectDefinition},
    },
    errors::errors::{ARGUMENTS_ERROR, TYPE_ERROR, UNDEFINED_ERROR},
    value::{
        callable::{BuiltinFunction, Class, Function, Native, Object},
        members::lookup_member,
        value::{Value, ValueKind},
    },
    Span,
};

use super::{
    context::Context,
    control::escaped,
    expr::eval_elements,
    interpreter::Interpreter,
    result::{RuntimeResult, Signal},
};

fn check_arity(
    name: &str,
    expected: usize,
    given: usize,
    span: &Span,
    context: &Context,
) -> Result<(), Signal> {
    if expected == given {
        return Ok(());
    }

    let plural = if expected == 1 { "" } else { "s" };
    Err(Signal::error(
        ARGUMENTS_ERROR,
        format!(
            "'{}' takes {} argument{}, {} given",
            name, expected, plural, given
        ),
        span,
        context,
    ))
}

/// Calls `callee` with already evaluated arguments.
///
/// Functions run in a fresh locked context chained under the context the
/// callee was accessed from. Definitions build objects. Any other value
/// called without arguments is returned as it is.
pub fn call_value(
    interpreter: &mut Interpreter,
    callee: Value,
    arguments: Vec<Value>,
    span: &Span,
    context: &Context,
) -> RuntimeResult {
    let scope = callee.context.clone().unwrap_or_else(|| context.clone());

    match &callee.kind {
        ValueKind::Function(function) => {
            call_function(interpreter, Rc::clone(function), &scope, arguments, span, context)
        }
        ValueKind::Class(class) => {
            instantiate(interpreter, Rc::clone(class), &scope, arguments, span, context)
        }
        ValueKind::BuiltinFunction(builtin) => {
            call_builtin(interpreter, Rc::clone(builtin), arguments, span, context)
        }
        _ if arguments.is_empty() => Ok(callee.detached()),
        _ => Err(Signal::error(
            TYPE_ERROR,
            format!("a value of type {} cannot be called with arguments", callee.type_name()),
            span,
            context,
        )),
    }
}

#[tracing::instrument(level = "trace", skip_all, fields(function = function.display_name()))]
fn call_function(
    interpreter: &mut Interpreter,
    function: Rc<Function>,
    scope: &Context,
    arguments: Vec<Value>,
    span: &Span,
    context: &Context,
) -> RuntimeResult {
    check_arity(
        function.display_name(),
        function.parameters.len(),
        arguments.len(),
        span,
        context,
    )?;

    let local = Context::new(function.display_name(), Some(scope), span.start.clone(), true);
    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        local.set(parameter, argument);
    }

    let result = interpreter.enter(span, |interpreter| interpreter.evaluate(&function.body, &local));

    match result {
        Ok(_) if function.auto_return_null => Ok(Value::nothing()),
        Ok(value) => Ok(value),
        Err(Signal::Return(value, _)) => Ok(value),
        Err(signal) => Err(Signal::Error(escaped(signal, &local))),
    }
}

#[tracing::instrument(level = "trace", skip_all, fields(class = %class.name))]
fn instantiate(
    interpreter: &mut Interpreter,
    class: Rc<Class>,
    scope: &Context,
    arguments: Vec<Value>,
    span: &Span,
    context: &Context,
) -> RuntimeResult {
    check_arity(&class.name, class.parameters.len(), arguments.len(), span, context)?;

    let internal = Context::new(class.name.as_str(), Some(scope), span.start.clone(), false);
    for (parameter, argument) in class.parameters.iter().zip(arguments) {
        internal.set(parameter, argument);
    }

    interpreter.enter(span, |interpreter| run_class_body(interpreter, &class, &internal))?;

    Ok(Value::new(ValueKind::Object(Rc::new(Object {
        class,
        internal,
    }))))
}

/// Runs the bodies of every ancestor, then the class's own body, all in the
/// object's internal context.
fn run_class_body(interpreter: &mut Interpreter, class: &Class, internal: &Context) -> RuntimeResult {
    for parent in &class.parents {
        run_class_body(interpreter, parent, internal)?;
    }

    match interpreter.evaluate(&class.body, internal) {
        Ok(_) => Ok(Value::nothing()),
        Err(signal) => Err(Signal::Error(escaped(signal, internal))),
    }
}

fn call_builtin(
    interpreter: &mut Interpreter,
    builtin: Rc<BuiltinFunction>,
    arguments: Vec<Value>,
    span: &Span,
    context: &Context,
) -> RuntimeResult {
    if let Some(arity) = builtin.arity {
        check_arity(&builtin.name, arity, arguments.len(), span, context)?;
    }

    match builtin.native {
        Native::Method(function) => {
            let receiver = builtin.receiver.clone().unwrap_or_else(Value::nothing);
            function(&receiver, &arguments).map_err(|error| Signal::Error(error.at(span, context)))
        }
        Native::Builtin(function) => function(interpreter, &arguments, span, context),
    }
}

/// Creates a function value and binds it if the definition is named.
pub fn define_function(definition: &FunctionDefinition, context: &Context) -> Value {
    let function = Value::new(ValueKind::Function(Rc::new(Function {
        name: definition.name.clone(),
        parameters: definition.parameters.clone(),
        body: Rc::clone(&definition.body),
        auto_return_null: definition.auto_return_null,
    })));

    if let Some(name) = &definition.name {
        context.set(name, function.clone());
    }
    function.with_context(context)
}

/// Creates an object definition. Parents are resolved now, and each must
/// declare only parameters the child declares too.
pub fn define_object(
    interpreter: &mut Interpreter,
    definition: &ObjectDefinition,
    context: &Context,
) -> RuntimeResult {
    let name = definition
        .name
        .clone()
        .unwrap_or_else(|| String::from("<anonymous>"));

    let mut parents = vec![];
    for parent_node in &definition.parents {
        let parent = interpreter.evaluate(parent_node, context)?;
        let ValueKind::Class(parent) = &parent.kind else {
            return Err(Signal::error(
                TYPE_ERROR,
                format!("cannot inherit from a value of type {}", parent.type_name()),
                &parent_node.span,
                context,
            ));
        };

        let missing = parent
            .parameters
            .iter()
            .find(|parameter| !definition.parameters.contains(*parameter));
        if let Some(missing) = missing {
            return Err(Signal::error(
                TYPE_ERROR,
                format!(
                    "'{}' must declare the parameter '{}' of its parent '{}'",
                    name, missing, parent.name
                ),
                &parent_node.span,
                context,
            ));
        }

        parents.push(Rc::clone(parent));
    }

    let class = Value::new(ValueKind::Class(Rc::new(Class {
        name,
        parameters: definition.parameters.clone(),
        parents,
        body: Rc::clone(&definition.body),
    })));

    if let Some(name) = &definition.name {
        context.set(name, class.clone());
    }
    Ok(class.with_context(context))
}

/// Resolves the right-hand side of `.` against `target`. Member names are
/// looked up on the target; call arguments are evaluated in `context`.
pub fn retrieve(
    interpreter: &mut Interpreter,
    target: Value,
    member: &Node,
    context: &Context,
) -> RuntimeResult {
    match &member.kind {
        NodeKind::VariableAccess(access) => member_of(&target, &access.name, &member.span, context),
        NodeKind::Call(call) => {
            let callee = retrieve(interpreter, target, &call.callee, context)?;
            let arguments = eval_elements(interpreter, &call.arguments, context)?;
            call_value(interpreter, callee, arguments, &member.span, context)
        }
        NodeKind::Attribute(attribute) => {
            let inner = retrieve(interpreter, target, &attribute.object, context)?;
            retrieve(interpreter, inner, &attribute.member, context)
        }
        _ => Err(Signal::error(
            TYPE_ERROR,
            format!("cannot access a {} as a member", member.kind.describe()),
            &member.span,
            context,
        )),
    }
}

fn member_of(target: &Value, name: &str, span: &Span, context: &Context) -> RuntimeResult {
    let found = match &target.kind {
        ValueKind::Object(object) => object
            .internal
            .get_local(name)
            .map(|value| value.with_context(&object.internal))
            .or_else(|| lookup_member(target, name)),
        _ => lookup_member(target, name),
    };

    found.map(|value| value.with_span(span.clone())).ok_or_else(|| {
        Signal::error(
            UNDEFINED_ERROR,
            format!("'{}' has no member '{}'", target.type_name(), name),
            span,
            context,
        )
    })
}

/// The special method `name` of an object, ready to be called.
fn special_method(receiver: &Value, name: &str) -> Option<Value> {
    match &receiver.kind {
        ValueKind::Object(object) => object
            .internal
            .get_local(name)
            .map(|method| method.with_context(&object.internal)),
        _ => None,
    }
}

fn call_special(
    interpreter: &mut Interpreter,
    method: Value,
    name: &str,
    arguments: Vec<Value>,
    span: &Span,
    context: &Context,
) -> RuntimeResult {
    let declared = match &method.kind {
        ValueKind::Function(function) => function.parameters.len(),
        ValueKind::Class(class) => class.parameters.len(),
        ValueKind::BuiltinFunction(builtin) => builtin.arity.unwrap_or(arguments.len()),
        _ => {
            return Err(Signal::error(
                TYPE_ERROR,
                format!("special method '{}' must be callable", name),
                span,
                context,
            ))
        }
    };

    if declared != arguments.len() {
        let plural = if arguments.len() == 1 { "" } else { "s" };
        return Err(Signal::error(
            ARGUMENTS_ERROR,
            format!(
                "special method '{}' must take {} argument{}, it takes {}",
                name,
                arguments.len(),
                plural,
                declared
            ),
            span,
            context,
        ));
    }

    call_value(interpreter, method, arguments, span, context)
}

/// Truthiness, honouring an object's `is_true` special method.
pub fn truthy(
    interpreter: &mut Interpreter,
    value: &Value,
    span: &Span,
    context: &Context,
) -> Result<bool, Signal> {
    match special_method(value, "is_true") {
        Some(method) => {
            Ok(call_special(interpreter, method, "is_true", vec![], span, context)?.is_true())
        }
        None => Ok(value.is_true()),
    }
}

/// Applies a binary operator, letting an object operand override it. The
/// container of `in` is its right operand.
pub fn binary_operation(
    interpreter: &mut Interpreter,
    left: Value,
    operator: BinaryOperator,
    right: Value,
    span: &Span,
    context: &Context,
) -> RuntimeResult {
    let name = operator.special_method();
    let (receiver, argument) = match operator {
        BinaryOperator::In => (&right, &left),
        _ => (&left, &right),
    };

    if let Some(method) = special_method(receiver, name) {
        let argument = argument.detached();
        return call_special(interpreter, method, name, vec![argument], span, context);
    }

    match operator {
        BinaryOperator::And | BinaryOperator::Or => {
            let left = truthy(interpreter, &left, span, context)?;
            let right = truthy(interpreter, &right, span, context)?;
            let result = match operator {
                BinaryOperator::And => left && right,
                _ => left || right,
            };
            Ok(Value::boolean(result))
        }
        _ => left
            .binary(operator, &right)
            .map_err(|error| Signal::Error(error.at(span, context))),
    }
}

pub fn unary_operation(
    interpreter: &mut Interpreter,
    operand: Value,
    operator: UnaryOperator,
    span: &Span,
    context: &Context,
) -> RuntimeResult {
    let name = match operator {
        UnaryOperator::BitwiseNot => Some("bitwise_not"),
        UnaryOperator::Invert => Some("invert"),
        UnaryOperator::Plus | UnaryOperator::Negate => None,
    };

    if let Some(name) = name {
        if let Some(method) = special_method(&operand, name) {
            return call_special(interpreter, method, name, vec![], span, context);
        }
    }

    match operator {
        UnaryOperator::Invert => Ok(Value::boolean(!truthy(interpreter, &operand, span, context)?)),
        _ => operand
            .unary(operator)
            .map_err(|error| Signal::Error(error.at(span, context))),
    }
}
