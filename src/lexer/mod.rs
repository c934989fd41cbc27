//! Lexical analysis module.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a flat stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using an ordered table of anchored regex patterns
//! - Recognition of keywords, quick keywords, identifiers, literals, and operators
//! - Escape decoding for string and character list literals
//! - Token position tracking for error reporting
//! - Comments and whitespace handling

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
