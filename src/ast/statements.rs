use std::rc::Rc;

use super::ast::Node;

// CONTROL FLOW

/// `if` with its `else if` chain. `discard_results` is set for block-form
/// constructs, which evaluate to nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub cases: Vec<(Node, Node)>,
    pub else_case: Option<Box<Node>>,
    pub discard_results: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountExpr {
    pub start: Option<Box<Node>>,
    pub end: Box<Node>,
    pub step: Option<Box<Node>>,
    pub variable: Option<String>,
    pub body: Box<Node>,
    pub discard_results: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileExpr {
    pub condition: Box<Node>,
    pub body: Box<Node>,
    pub discard_results: bool,
}

/// One `error [TAG] [as NAME] do ...` clause. A missing tag catches
/// everything.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorHandler {
    pub tag: Option<Node>,
    pub variable: Option<String>,
    pub body: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryExpr {
    pub body: Box<Node>,
    pub handlers: Vec<ErrorHandler>,
    pub discard_results: bool,
}

// DEFINITIONS

/// Function bodies are shared with every function value created from the
/// definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: Option<String>,
    pub parameters: Vec<String>,
    pub body: Rc<Node>,
    /// Block bodies return nothing unless they `return` explicitly.
    pub auto_return_null: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDefinition {
    pub name: Option<String>,
    pub parameters: Vec<String>,
    pub parents: Vec<Node>,
    pub body: Rc<Node>,
}

// MODULES

#[derive(Debug, Clone, PartialEq)]
pub enum IncludeTarget {
    /// A quoted path, used as written.
    Path(String),
    /// A bare name, resolved against the search paths and the registered
    /// native extensions.
    Name(String),
}

impl IncludeTarget {
    pub fn as_str(&self) -> &str {
        match self {
            IncludeTarget::Path(path) => path,
            IncludeTarget::Name(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncludeStmt {
    pub target: IncludeTarget,
    /// Binds only this member of the module.
    pub member: Option<String>,
    pub nickname: Option<String>,
    /// Copies every module member into the including scope.
    pub dump_all: bool,
}
