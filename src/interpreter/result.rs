use crate::{errors::errors::Error, value::value::Value, Span};

use super::context::Context;

/// Anything that stops normal evaluation and unwinds to whoever handles it:
/// `try` takes errors, loops take `skip` and `stop`, calls take `return`.
#[derive(Debug, Clone)]
pub enum Signal {
    Error(Error),
    Return(Value, Span),
    Skip(Span),
    Stop(Span),
}

impl Signal {
    /// A tagged runtime error raised at `span` inside `context`.
    pub fn error(tag: &str, detail: impl Into<String>, span: &Span, context: &Context) -> Self {
        Signal::Error(Error::runtime(tag, detail, span.clone(), context))
    }
}

impl From<Error> for Signal {
    fn from(error: Error) -> Self {
        Signal::Error(error)
    }
}

pub type RuntimeResult = Result<Value, Signal>;
