//! Tree-walking interpreter.
//!
//! This module evaluates the AST produced by the parser:
//!
//! - `interpreter` - the Interpreter, its entry points and the depth limit
//! - `context` - lexical scopes and tracebacks
//! - `expr`, `control`, `calls`, `include` - evaluation by node kind
//! - `builtins` - the root context
//! - `result` - control-flow signals
//! - `output` - an in-memory output sink

pub mod builtins;
pub mod calls;
pub mod context;
pub mod control;
pub mod expr;
pub mod include;
pub mod interpreter;
pub mod output;
pub mod result;

#[cfg(test)]
mod tests;
