use std::rc::Rc;

use thiserror::Error;

use crate::{get_line_at_position, interpreter::context::Context, Span};

pub const TYPE_ERROR: &str = "type-error";
pub const MATH_ERROR: &str = "math-error";
pub const KEY_ERROR: &str = "key-error";
pub const INDEX_ERROR: &str = "index-error";
pub const UNDEFINED_ERROR: &str = "undefined-error";
pub const ARGUMENTS_ERROR: &str = "arguments-error";
pub const IO_ERROR: &str = "io-error";
pub const RUN_ERROR: &str = "run-error";

/// One line of a runtime traceback.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub file: Rc<str>,
    pub line: usize,
    pub context: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
    traceback: Vec<Frame>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
            traceback: vec![],
        }
    }

    /// Creates a tagged runtime error and snapshots the traceback of `context`.
    pub fn runtime(
        tag: impl Into<String>,
        detail: impl Into<String>,
        span: Span,
        context: &Context,
    ) -> Self {
        let traceback = context.traceback(&span.start);

        Error {
            internal_error: ErrorImpl::Runtime {
                tag: tag.into(),
                detail: detail.into(),
            },
            span,
            traceback,
        }
    }

    pub fn grammar(expected: impl Into<String>, priority: u8, span: Span) -> Self {
        Error::new(
            ErrorImpl::InvalidGrammar {
                expected: expected.into(),
                priority,
            },
            span,
        )
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_traceback(&self) -> &[Frame] {
        &self.traceback
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnknownCharacter { .. } => "unknown-character-error",
            ErrorImpl::UnterminatedString { .. } => "unterminated-string-error",
            ErrorImpl::InvalidEscape { .. } => "invalid-escape-error",
            ErrorImpl::InvalidNumber { .. } => "invalid-number-error",
            ErrorImpl::InvalidGrammar { .. } => "invalid-grammar-error",
            ErrorImpl::Runtime { tag, .. } => tag,
            ErrorImpl::StackExhausted { .. } => "stack-exhaustion",
        }
    }

    pub fn get_detail(&self) -> String {
        self.internal_error.to_string()
    }

    /// Backtracking tie-break weight; only grammar errors carry one.
    pub fn get_priority(&self) -> u8 {
        match &self.internal_error {
            ErrorImpl::InvalidGrammar { priority, .. } => *priority,
            _ => 0,
        }
    }

    /// Fatal errors abort the run and are never caught by `try`.
    pub fn is_fatal(&self) -> bool {
        matches!(self.internal_error, ErrorImpl::StackExhausted { .. })
    }

    /// Renders the error for display:
    ///
    /// ```text
    /// File 'main.brisk', line 3 - In 'divide'
    /// (error) math-error: division by zero -> File 'main.brisk', line 3
    /// item : a / 0
    ///        ~~~~~
    /// ```
    pub fn render(&self) -> String {
        let mut rendered = String::new();

        for frame in &self.traceback {
            rendered.push_str(&format!(
                "File '{}', line {} - In '{}'\n",
                frame.file, frame.line, frame.context
            ));
        }

        let start = &self.span.start;
        let end = &self.span.end;
        let (line_number, line_text) = get_line_at_position(start);

        let line_length = line_text.chars().count();
        let width = if end.line == start.line && end.column > start.column {
            end.column - start.column
        } else if end.line > start.line && line_length > start.column {
            line_length - start.column
        } else {
            1
        };

        rendered.push_str(&format!(
            "(error) {}: {} -> File '{}', line {}\n{}\n{}{}",
            self.get_error_name(),
            self.get_detail(),
            start.file,
            line_number,
            line_text,
            " ".repeat(start.column),
            "~".repeat(width)
        ));

        rendered
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl std::error::Error for Error {}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unknown character '{character}'")]
    UnknownCharacter { character: char },
    #[error("unterminated {literal} literal")]
    UnterminatedString { literal: String },
    #[error("{message}")]
    InvalidEscape { message: String },
    #[error("invalid number literal '{token}'")]
    InvalidNumber { token: String },
    #[error("expected {expected}")]
    InvalidGrammar { expected: String, priority: u8 },
    #[error("{detail}")]
    Runtime { tag: String, detail: String },
    #[error("maximum activation depth of {limit} exceeded")]
    StackExhausted { limit: usize },
}
