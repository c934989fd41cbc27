#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::Error;

pub mod ast;
pub mod config;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod stack;
pub mod value;

extern crate regex;

pub use config::Config;
pub use interpreter::interpreter::Interpreter;
pub use value::value::Value;

/// A location inside a source text.
///
/// `line` and `column` are zero-based; `column` counts characters, not bytes.
/// The full source text is kept so errors can be rendered without touching
/// the file system again.
#[derive(Debug, Clone)]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub column: usize,
    pub file: Rc<str>,
    pub source: Rc<str>,
}

impl Position {
    pub fn new(file: Rc<str>, source: Rc<str>) -> Self {
        Position {
            index: 0,
            line: 0,
            column: 0,
            file,
            source,
        }
    }

    pub fn null() -> Self {
        Position::new(Rc::from("<null>"), Rc::from(""))
    }

    /// Moves past `character`, which must be the character at `index`.
    pub fn advance(&mut self, character: char) {
        self.index += character.len_utf8();

        if character == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    pub fn null() -> Self {
        Span::new(Position::null(), Position::null())
    }

    /// Span from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span::new(self.start.clone(), other.end.clone())
    }
}

/// Returns the 1-based line number and the text of the line holding `position`.
pub fn get_line_at_position(position: &Position) -> (usize, String) {
    let line = position
        .source
        .split('\n')
        .nth(position.line)
        .unwrap_or("")
        .trim_end_matches('\r');

    (position.line + 1, line.to_string())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{get_line_at_position, Position};

    #[test]
    fn test_get_line_at_position() {
        let source: Rc<str> = Rc::from("Hello, world!\nsecond line\n\nTesting { }\n");
        let mut position = Position::new(Rc::from("test.brisk"), Rc::clone(&source));
        for character in source.chars().take(10) {
            position.advance(character);
        }

        let (line_number, line) = get_line_at_position(&position);
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!");
        assert_eq!(position.column, 10);

        for character in source.chars().skip(10).take(34 - 10) {
            position.advance(character);
        }

        let (line_number, line) = get_line_at_position(&position);
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }");
        assert_eq!(position.column, 7);
    }

    #[test]
    fn test_advance_counts_characters_not_bytes() {
        let mut position = Position::new(Rc::from("test.brisk"), Rc::from("é!"));
        position.advance('é');

        assert_eq!(position.index, 2);
        assert_eq!(position.column, 1);
    }
}

/// Renders an error with its traceback, the offending line and tildes
/// under the span.
pub fn render_error(error: &Error) -> String {
    error.render()
}

/// Prints a rendered error to stderr.
pub fn display_error(error: &Error) {
    eprintln!("{}", render_error(error));
}

/// Runs `source` on a fresh interpreter with the default configuration.
pub fn run(file_name: &str, source: &str) -> Result<Value, Error> {
    Interpreter::new(Config::default()).run(file_name, source)
}
