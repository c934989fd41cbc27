//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords, quick keywords and identifiers
//! - Numeric literals (integers and floats)
//! - String and character list literals with escape sequences
//! - Operators, assignment symbols and punctuation
//! - Comments and statement separators
//! - Error cases

use pretty_assertions::assert_eq;

use crate::errors::errors::ErrorImpl;

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.brisk".to_string()))
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    use TokenKind::*;

    assert_eq!(
        kinds("if else do end count from to step as while try error function with object include dump return skip stop global and or invert in"),
        vec![
            If, Else, Do, End, Count, From, To, Step, As, While, Try, Error, Function, With,
            Object, Include, Dump, Return, Skip, Stop, Global, And, Or, Invert, In, EOF
        ]
    );
}

#[test]
fn test_tokenize_quick_keywords() {
    use TokenKind::*;

    assert_eq!(
        kinds("f l e c w t fd sd od i g d v n s"),
        vec![
            QuickIf, QuickElse, QuickError, QuickCount, QuickWhile, QuickTry, QuickFunction,
            QuickStop, QuickObject, QuickInclude, QuickGlobal, QuickDone, QuickAs, QuickReturn,
            QuickSkip, EOF
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo bar baz_123 _underscore CamelCase fdx".to_string();
    let tokens = tokenize(source, Some("test.brisk".to_string())).unwrap();

    let values: Vec<&str> = tokens.iter().take(6).map(|token| token.value.as_str()).collect();
    assert_eq!(values, vec!["foo", "bar", "baz_123", "_underscore", "CamelCase", "fdx"]);
    assert!(tokens.iter().take(6).all(|token| token.kind == TokenKind::Identifier));
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 3.14 0 100.5".to_string();
    let tokens = tokenize(source, Some("test.brisk".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Integer);
    assert_eq!(tokens[3].kind, TokenKind::Float);
    assert_eq!(tokens[3].value, "100.5");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_trailing_point_is_not_consumed() {
    use TokenKind::*;

    assert_eq!(
        kinds("5.as_string()"),
        vec![Integer, Dot, Identifier, OpenParen, CloseParen, EOF]
    );
    assert_eq!(kinds("1.2.3"), vec![Float, Dot, Integer, EOF]);
}

#[test]
fn test_tokenize_strings_and_character_lists() {
    let source = r#""hello" 'world'"#.to_string();
    let tokens = tokenize(source, Some("test.brisk".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].kind, TokenKind::CharacterList);
    assert_eq!(tokens[1].value, "world");
    assert_eq!(tokens[2].kind, TokenKind::EOF);
}

#[test]
fn test_escape_decoding() {
    let source = r#""a\nb" "\t\r\b\f\v\0" "quote\"s" 'it\'s' "back\\slash""#.to_string();
    let tokens = tokenize(source, Some("test.brisk".to_string())).unwrap();

    assert_eq!(tokens[0].value, "a\nb");
    assert_eq!(tokens[0].value.chars().count(), 3);
    assert_eq!(tokens[1].value, "\t\r\u{8}\u{c}\u{b}\0");
    assert_eq!(tokens[2].value, "quote\"s");
    assert_eq!(tokens[3].value, "it's");
    assert_eq!(tokens[4].value, "back\\slash");
}

#[test]
fn test_unicode_escapes() {
    let source = r#""\u00e9" "\U01F600""#.to_string();
    let tokens = tokenize(source, Some("test.brisk".to_string())).unwrap();

    assert_eq!(tokens[0].value, "é");
    assert_eq!(tokens[1].value, "😀");
}

#[test]
fn test_unicode_escape_needs_exact_digit_count() {
    let result = tokenize(r#""\u00g9""#.to_string(), Some("test.brisk".to_string()));

    let error = result.unwrap_err();
    assert_eq!(error.get_error_name(), "invalid-escape-error");
}

#[test]
fn test_unicode_escape_out_of_range() {
    let result = tokenize(r#""\U110000""#.to_string(), Some("test.brisk".to_string()));
    assert!(matches!(
        result.unwrap_err().get_impl(),
        ErrorImpl::InvalidEscape { .. }
    ));

    let surrogate = tokenize(r#""\uD800""#.to_string(), Some("test.brisk".to_string()));
    assert!(surrogate.is_err());
}

#[test]
fn test_unterminated_string() {
    let result = tokenize("x : \"abc".to_string(), Some("test.brisk".to_string()));

    let error = result.unwrap_err();
    assert_eq!(error.get_error_name(), "unterminated-string-error");
    assert_eq!(error.get_span().start.column, 4);
}

#[test]
fn test_tokenize_operators() {
    use TokenKind::*;

    assert_eq!(
        kinds("+ - * / % ^ & | \\ ~ << >> = ! < > <= >= ->"),
        vec![
            Plus, Dash, Star, Slash, Percent, Caret, Ampersand, Pipe, Backslash, Tilde,
            LeftShift, RightShift, Equals, Exclamation, Less, Greater, LessEquals,
            GreaterEquals, Arrow, EOF
        ]
    );
}

#[test]
fn test_tokenize_assignment_symbols() {
    use TokenKind::*;

    let tokens = kinds(": :+ :- :* :/ :% :^ :& :| :\\ :<< :>>");
    assert_eq!(
        tokens,
        vec![
            Colon, ColonPlus, ColonDash, ColonStar, ColonSlash, ColonPercent, ColonCaret,
            ColonAmpersand, ColonPipe, ColonBackslash, ColonLeftShift, ColonRightShift, EOF
        ]
    );
    assert!(tokens[..12].iter().all(|kind| kind.is_assignment()));
}

#[test]
fn test_tokenize_punctuation() {
    use TokenKind::*;

    assert_eq!(
        kinds("( ) [ ] { } . ,"),
        vec![
            OpenParen, CloseParen, OpenBracket, CloseBracket, OpenCurly, CloseCurly, Dot, Comma,
            EOF
        ]
    );
}

#[test]
fn test_semicolons_and_newlines_are_separators() {
    use TokenKind::*;

    assert_eq!(
        kinds("a; b\nc"),
        vec![Identifier, Newline, Identifier, Newline, Identifier, EOF]
    );
}

#[test]
fn test_tokenize_comments() {
    use TokenKind::*;

    assert_eq!(
        kinds("x : 5 # this is a comment\ny : 10"),
        vec![Identifier, Colon, Integer, Newline, Identifier, Colon, Integer, EOF]
    );
}

#[test]
fn test_tokenize_unknown_character() {
    let result = tokenize("x : @".to_string(), Some("test.brisk".to_string()));

    let error = result.unwrap_err();
    assert_eq!(error.get_impl(), &ErrorImpl::UnknownCharacter { character: '@' });
    assert_eq!(error.get_span().start.column, 4);
}

#[test]
fn test_positions_track_lines_and_columns() {
    let source = "a\n  bb".to_string();
    let tokens = tokenize(source, Some("test.brisk".to_string())).unwrap();

    let bb = &tokens[2];
    assert_eq!(bb.span.start.line, 1);
    assert_eq!(bb.span.start.column, 2);
    assert_eq!(bb.span.end.column, 4);
    assert_eq!(&*bb.span.start.file, "test.brisk");
}

#[test]
fn test_default_file_name_is_shell() {
    let tokens = tokenize("1".to_string(), None).unwrap();

    assert_eq!(&*tokens[0].span.start.file, "shell");
}

#[test]
fn test_tokenize_empty_string() {
    let tokens = tokenize(r#""""#.to_string(), Some("test.brisk".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "");
    assert_eq!(tokens[1].kind, TokenKind::EOF);
}
