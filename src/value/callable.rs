use std::{fmt, rc::Rc};

use crate::{
    ast::ast::Node,
    interpreter::{context::Context, interpreter::Interpreter, result::RuntimeResult},
    Span,
};

use super::{operations::OperationError, value::Value};

/// A user-defined function.
#[derive(Debug)]
pub struct Function {
    pub name: Option<String>,
    pub parameters: Vec<String>,
    pub body: Rc<Node>,
    /// Block-bodied functions evaluate to Nothing unless they `return`.
    pub auto_return_null: bool,
}

impl Function {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

/// An object definition. Calling it builds an [`Object`].
#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub parameters: Vec<String>,
    /// Parents are resolved when the definition is evaluated.
    pub parents: Vec<Rc<Class>>,
    pub body: Rc<Node>,
}

/// An instantiated class. Fields and methods live in `internal`.
#[derive(Debug)]
pub struct Object {
    pub class: Rc<Class>,
    pub internal: Context,
}

/// Native code that only needs its receiver and arguments.
pub type NativeMethod = fn(&Value, &[Value]) -> Result<Value, OperationError>;

/// Native code that needs the running interpreter, such as `show` and `run`.
pub type NativeBuiltin = fn(&mut Interpreter, &[Value], &Span, &Context) -> RuntimeResult;

#[derive(Clone, Copy)]
pub enum Native {
    Method(NativeMethod),
    Builtin(NativeBuiltin),
}

impl fmt::Debug for Native {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Native::Method(_) => write!(f, "Native::Method"),
            Native::Builtin(_) => write!(f, "Native::Builtin"),
        }
    }
}

/// A callable implemented in Rust, optionally bound to a receiver.
#[derive(Debug)]
pub struct BuiltinFunction {
    pub name: String,
    /// `None` accepts any number of arguments.
    pub arity: Option<usize>,
    pub receiver: Option<Value>,
    pub native: Native,
}

impl BuiltinFunction {
    pub fn method(
        name: &str,
        arity: Option<usize>,
        receiver: Option<Value>,
        function: NativeMethod,
    ) -> Self {
        BuiltinFunction {
            name: String::from(name),
            arity,
            receiver,
            native: Native::Method(function),
        }
    }

    pub fn builtin(name: &str, arity: Option<usize>, function: NativeBuiltin) -> Self {
        BuiltinFunction {
            name: String::from(name),
            arity,
            receiver: None,
            native: Native::Builtin(function),
        }
    }
}
