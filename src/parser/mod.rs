//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. Expressions climb a fixed ladder of
//! precedence levels; atoms and statements are dispatched through lookup
//! tables. It handles:
//!
//! - Statement parsing (return/skip/stop, assignments, expressions)
//! - Expression parsing (binary and unary operations, attribute access,
//!   calls, literals)
//! - The verbose `do ... end` constructs and their quick syntax twins
//! - Backtracking between assignment and expression with the most
//!   specific error kept

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod quick;
pub mod stmt;
