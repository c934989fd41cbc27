//! Unit tests for error handling.
//!
//! This module contains tests for error names, details and rendering.

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorImpl};
use crate::{Position, Span};

fn span_over(source: &str, start: usize, end: usize) -> Span {
    let source: Rc<str> = Rc::from(source);
    let mut position = Position::new(Rc::from("test.brisk"), Rc::clone(&source));
    let mut chars = source.chars();

    for _ in 0..start {
        position.advance(chars.next().unwrap());
    }
    let begin = position.clone();

    for _ in start..end {
        position.advance(chars.next().unwrap());
    }

    Span::new(begin, position)
}

#[test]
fn test_error_names() {
    let span = Span::null();

    let cases = vec![
        (ErrorImpl::UnknownCharacter { character: '@' }, "unknown-character-error"),
        (
            ErrorImpl::UnterminatedString { literal: String::from("string") },
            "unterminated-string-error",
        ),
        (ErrorImpl::InvalidEscape { message: String::new() }, "invalid-escape-error"),
        (ErrorImpl::InvalidNumber { token: String::from("9") }, "invalid-number-error"),
        (
            ErrorImpl::InvalidGrammar { expected: String::from("'end'"), priority: 0 },
            "invalid-grammar-error",
        ),
        (
            ErrorImpl::Runtime { tag: String::from("math-error"), detail: String::new() },
            "math-error",
        ),
        (ErrorImpl::StackExhausted { limit: 3 }, "stack-exhaustion"),
    ];

    for (error_impl, name) in cases {
        assert_eq!(Error::new(error_impl, span.clone()).get_error_name(), name);
    }
}

#[test]
fn test_error_detail() {
    let error = Error::grammar("'do'", 1, Span::null());

    assert_eq!(error.get_detail(), "expected 'do'");
    assert_eq!(error.get_priority(), 1);
}

#[test]
fn test_unknown_character_detail() {
    let error = Error::new(ErrorImpl::UnknownCharacter { character: '@' }, Span::null());

    assert_eq!(error.get_detail(), "unknown character '@'");
}

#[test]
fn test_only_stack_exhaustion_is_fatal() {
    assert!(Error::new(ErrorImpl::StackExhausted { limit: 1 }, Span::null()).is_fatal());
    assert!(!Error::grammar("expression", 0, Span::null()).is_fatal());
}

#[test]
fn test_render_single_line() {
    let error = Error::new(
        ErrorImpl::UnknownCharacter { character: '@' },
        span_over("x : @", 4, 5),
    );

    assert_eq!(
        error.render(),
        "(error) unknown-character-error: unknown character '@' -> File 'test.brisk', line 1\nx : @\n    ~"
    );
}

#[test]
fn test_render_second_line_span() {
    let error = Error::grammar("'end'", 0, span_over("a : 1\nb : 1 / 0\n", 10, 15));

    assert_eq!(
        error.render(),
        "(error) invalid-grammar-error: expected 'end' -> File 'test.brisk', line 2\nb : 1 / 0\n    ~~~~~"
    );
}

#[test]
fn test_render_multi_line_span_stops_at_line_end() {
    let error = Error::grammar("'end'", 0, span_over("if a do\n  b\n", 3, 10));

    assert!(error.render().ends_with("if a do\n   ~~~~"));
}

#[test]
fn test_render_empty_span_has_one_tilde() {
    let error = Error::grammar("expression", 0, span_over("a :", 3, 3));

    assert!(error.render().ends_with("a :\n   ~"));
}
