use crate::Span;

use super::{
    expressions::{AttributeExpr, BinaryExpr, CallExpr, UnaryExpr, VariableAccess, VariableAssign},
    statements::{
        CountExpr, FunctionDefinition, IfExpr, IncludeStmt, ObjectDefinition, TryExpr, WhileExpr,
    },
};

/// A syntax tree node.
///
/// Equality compares structure only; spans are ignored so trees parsed from
/// differently formatted sources can be compared.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    /// Whether this node is a statement list, i.e. the body of a block-form
    /// construct or a whole program.
    pub fn is_block(&self) -> bool {
        matches!(self.kind, NodeKind::Statements(_))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// Every syntactic construct of the language.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Integer(i64),
    Float(f64),
    String(String),
    CharacterList(String),

    Array(Vec<Node>),
    List(Vec<Node>),
    Dictionary(Vec<(Node, Node)>),

    VariableAccess(VariableAccess),
    VariableAssign(VariableAssign),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Attribute(AttributeExpr),
    Call(CallExpr),

    If(IfExpr),
    Count(CountExpr),
    While(WhileExpr),
    Try(TryExpr),
    Function(FunctionDefinition),
    Object(ObjectDefinition),
    Include(IncludeStmt),

    Return(Option<Box<Node>>),
    Skip,
    Stop,

    Statements(Vec<Node>),
}

impl NodeKind {
    /// Short human readable name, used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            NodeKind::Integer(_) => "integer",
            NodeKind::Float(_) => "float",
            NodeKind::String(_) => "string",
            NodeKind::CharacterList(_) => "character list",
            NodeKind::Array(_) => "array",
            NodeKind::List(_) => "list",
            NodeKind::Dictionary(_) => "dictionary",
            NodeKind::VariableAccess(_) => "variable access",
            NodeKind::VariableAssign(_) => "assignment",
            NodeKind::Binary(_) => "binary operation",
            NodeKind::Unary(_) => "unary operation",
            NodeKind::Attribute(_) => "attribute access",
            NodeKind::Call(_) => "call",
            NodeKind::If(_) => "if",
            NodeKind::Count(_) => "count",
            NodeKind::While(_) => "while",
            NodeKind::Try(_) => "try",
            NodeKind::Function(_) => "function definition",
            NodeKind::Object(_) => "object definition",
            NodeKind::Include(_) => "include",
            NodeKind::Return(_) => "return",
            NodeKind::Skip => "skip",
            NodeKind::Stop => "stop",
            NodeKind::Statements(_) => "statements",
        }
    }
}
