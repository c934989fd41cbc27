//! Error types and error rendering.
//!
//! This module defines the single error type shared by every phase:
//!
//! - Lexical errors (unknown characters, bad escapes, unterminated literals)
//! - Grammar errors carrying an "expected ..." message and a priority used
//!   when the parser chooses between failed alternatives
//! - Tagged runtime errors carrying a traceback snapshot
//! - The fatal stack-exhaustion condition

pub mod errors;

#[cfg(test)]
mod tests;
