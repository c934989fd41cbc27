/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The node type and the tagged union of every construct
/// - expressions: Operators, variables, operations, attribute access and calls
/// - statements: Control flow, definitions and includes
/// - printer: Renders a tree back to verbose source
pub mod ast;
pub mod expressions;
pub mod printer;
pub mod statements;
