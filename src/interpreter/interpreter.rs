//! Main interpreter module.
//!
//! This module contains the Interpreter structure and the entry points that
//! take source text through lexing, parsing and evaluation. Evaluation itself
//! is split by concern:
//!
//! - `expr` - literals, variables, assignments, operators and attributes
//! - `control` - `if`, `count`, `while`, `try` and the flow signals
//! - `calls` - functions, object definitions, instantiation and members
//! - `include` - module resolution and binding
//! - `builtins` - the names every program starts with

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use rustc_hash::FxHashMap;

use crate::{
    ast::ast::Node,
    config::Config,
    errors::errors::{Error, ErrorImpl, IO_ERROR},
    lexer::lexer::tokenize,
    parser::parser::parse,
    stack::ensure_sufficient_stack,
    value::value::Value,
    Position, Span,
};

use super::{
    builtins::create_root,
    context::Context,
    control::escaped,
    expr::eval_node,
    result::{RuntimeResult, Signal},
};

/// Constructor of a native extension, called when it is included.
pub type ExtensionConstructor = fn() -> Value;

/// The tree-walking interpreter.
///
/// One interpreter owns a locked root context with the builtins and a
/// program context below it. Every call to [`Interpreter::run`] evaluates in
/// that program context, so definitions persist across runs.
pub struct Interpreter {
    /// Settings for includes and the depth limit
    pub config: Config,
    /// Locked root context holding the builtin names
    root: Context,
    /// Context shared by every run
    program: Context,
    /// Nesting of calls, instantiations and includes currently active
    depth: usize,
    /// Native extensions by the name they are included under
    extensions: FxHashMap<String, ExtensionConstructor>,
    /// Where `show` writes
    output: Box<dyn Write>,
}

impl Interpreter {
    /// Creates an interpreter writing `show` output to stdout.
    pub fn new(config: Config) -> Self {
        let root = create_root();
        let program = Context::new("<program>", Some(&root), Position::null(), false);

        Interpreter {
            config,
            root,
            program,
            depth: 0,
            extensions: FxHashMap::default(),
            output: Box::new(io::stdout()),
        }
    }

    /// Redirects `show` output.
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Makes `include NAME` resolve to `constructor` when no script named
    /// `NAME` is found. Extensions are registered here in-process instead of
    /// being loaded from shared libraries.
    pub fn register_extension(&mut self, name: impl Into<String>, constructor: ExtensionConstructor) {
        self.extensions.insert(name.into(), constructor);
    }

    pub fn get_extension(&self, name: &str) -> Option<ExtensionConstructor> {
        self.extensions.get(name).copied()
    }

    pub fn root_context(&self) -> &Context {
        &self.root
    }

    pub fn program_context(&self) -> &Context {
        &self.program
    }

    /// Reads a name from the program context.
    pub fn get_global(&self, name: &str) -> Option<Value> {
        self.program.get(name)
    }

    /// Lexes, parses and evaluates `source` in the program context. The
    /// result is the value of the last statement.
    #[tracing::instrument(level = "debug", skip(self, source))]
    pub fn run(&mut self, file_name: &str, source: &str) -> Result<Value, Error> {
        let context = self.program.clone();
        self.run_in(file_name, source, &context)
    }

    /// Runs the script at `path` in the program context.
    pub fn run_file(&mut self, path: impl AsRef<Path>) -> Result<Value, Error> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|error| {
            Error::new(
                ErrorImpl::Runtime {
                    tag: String::from(IO_ERROR),
                    detail: format!("could not read '{}': {}", path.display(), error),
                },
                Span::null(),
            )
        })?;

        self.run(&path.display().to_string(), &source)
    }

    pub(crate) fn run_in(
        &mut self,
        file_name: &str,
        source: &str,
        context: &Context,
    ) -> Result<Value, Error> {
        let tree = parse_source(file_name, source)?;
        self.evaluate(&tree, context)
            .map_err(|signal| escaped(signal, context))
    }

    /// Evaluates one node.
    pub fn evaluate(&mut self, node: &Node, context: &Context) -> RuntimeResult {
        ensure_sufficient_stack(|| eval_node(self, node, context))
    }

    /// Runs `activation` one level deeper, failing fatally past the
    /// configured depth.
    pub(crate) fn enter(
        &mut self,
        span: &Span,
        activation: impl FnOnce(&mut Interpreter) -> RuntimeResult,
    ) -> RuntimeResult {
        if self.depth >= self.config.max_depth {
            tracing::debug!(depth = self.depth, "activation depth exhausted");
            return Err(Signal::Error(Error::new(
                ErrorImpl::StackExhausted {
                    limit: self.config.max_depth,
                },
                span.clone(),
            )));
        }

        self.depth += 1;
        let result = activation(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn write_output(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()
    }
}

/// Lexes and parses `source` into a statement list.
pub fn parse_source(file_name: &str, source: &str) -> Result<Node, Error> {
    let tokens = tokenize(source.to_string(), Some(file_name.to_string()))?;
    parse(tokens)
}
