//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the parse entry point.
//! Expressions are parsed by one function per precedence level; atoms and
//! statements are dispatched through lookup tables keyed by token kind.
//!
//! It maintains lookup tables for:
//! - Statement handlers (verbose and quick syntax)
//! - NUD (null denotation) handlers for atoms (verbose and quick syntax)
//! - Binary operators with the precedence level they belong to
//!
//! A mode flag records whether quick syntax is active. It decides which
//! keyword set closes bodies and statement lists, and whether the quick
//! keywords are keywords or plain names.

use std::collections::HashMap;

use crate::{
    ast::{
        ast::{Node, NodeKind},
        expressions::BinaryOperator,
    },
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind, QUICK_LOOKUP, RESERVED_LOOKUP},
    Position, Span,
};

use super::{
    lookups::{
        create_token_lookups, BindingPower, LEDLookup, NUDHandler, NUDLookup, StmtHandler,
        StmtLookup, Syntax, QUICK, VERBOSE,
    },
    stmt::parse_stmt,
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The list of tokens to parse, always ending with EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Whether quick syntax is active
    quick: bool,
    stmt_lookup: StmtLookup,
    quick_stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    quick_nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
}

/// A failed parse attempt and how far it got.
#[derive(Debug)]
pub struct Failure {
    pub error: Error,
    pub consumed: usize,
}

/// Keeps the most specific failure among several alternatives.
///
/// A failure that consumed tokens is never replaced by one that consumed
/// fewer. A failure that consumed nothing is always replaced. Ties go to the
/// error with the higher priority, then to the earlier alternative.
#[derive(Debug, Default)]
pub struct Attempts {
    best: Option<Failure>,
}

impl Attempts {
    pub fn record(&mut self, failure: Failure) {
        let replace = match &self.best {
            None => true,
            Some(best) if best.consumed == 0 => true,
            Some(best) => {
                failure.consumed > best.consumed
                    || (failure.consumed == best.consumed
                        && failure.error.get_priority() > best.error.get_priority())
            }
        };

        if replace {
            self.best = Some(failure);
        }
    }

    pub fn best(&self) -> Option<&Failure> {
        self.best.as_ref()
    }

    pub fn into_error(self) -> Option<Error> {
        self.best.map(|failure| failure.error)
    }
}

impl Parser {
    /// Creates a parser over `tokens`, which must end with an EOF token.
    pub fn new(tokens: Vec<Token>) -> Self {
        let tokens = if tokens.last().map(|token| token.kind) == Some(TokenKind::EOF) {
            tokens
        } else {
            let mut tokens = tokens;
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(Position::null);
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span::new(end.clone(), end),
            });
            tokens
        };

        Parser {
            tokens,
            pos: 0,
            quick: false,
            stmt_lookup: HashMap::new(),
            quick_stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            quick_nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Kind of the token `offset` places after the current one.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        self.tokens[index].kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            return Err(error.unwrap_or_else(|| {
                self.error_here(&describe_kind(expected_kind), 0)
            }));
        }

        Ok(self.advance().clone())
    }

    /// Expects a token of the specified kind with the default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Whether the current token can be used as a name in the active mode.
    pub fn at_name(&self) -> bool {
        let kind = self.current_token_kind();
        kind == TokenKind::Identifier || (!self.quick && kind.is_quick_keyword())
    }

    /// Consumes a name, or fails with `expected <description>`.
    pub fn expect_name(&mut self, description: &str) -> Result<String, Error> {
        if !self.at_name() {
            return Err(self.error_here(description, 0));
        }
        Ok(self.advance().value.clone())
    }

    pub fn skip_newlines(&mut self) {
        while self.current_token_kind() == TokenKind::Newline {
            self.advance();
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn is_quick(&self) -> bool {
        self.quick
    }

    /// Keywords of the active mode.
    pub fn syntax(&self) -> &'static Syntax {
        if self.quick {
            &QUICK
        } else {
            &VERBOSE
        }
    }

    /// Whether the current token closes the statement list being parsed.
    pub fn at_terminator(&self) -> bool {
        let kind = self.current_token_kind();
        let syntax = self.syntax();
        kind == TokenKind::EOF
            || kind == syntax.closer
            || kind == syntax.otherwise
            || kind == syntax.catch
    }

    /// Whether the current token ends a statement.
    pub fn at_statement_end(&self) -> bool {
        self.current_token_kind() == TokenKind::Newline || self.at_terminator()
    }

    /// Runs `parse` with quick syntax switched on or off, restoring the
    /// previous mode afterwards.
    pub fn with_mode<T>(
        &mut self,
        quick: bool,
        parse: impl FnOnce(&mut Parser) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let saved = self.quick;
        self.quick = quick;
        let result = parse(self);
        self.quick = saved;
        result
    }

    /// Runs `parse`, rewinding to the starting token if it fails.
    pub fn attempt<T>(
        &mut self,
        parse: impl FnOnce(&mut Parser) -> Result<T, Error>,
    ) -> Result<T, Failure> {
        let start = self.pos;
        let quick = self.quick;

        match parse(self) {
            Ok(value) => Ok(value),
            Err(error) => {
                let consumed = self.pos - start;
                self.pos = start;
                self.quick = quick;
                Err(Failure { error, consumed })
            }
        }
    }

    /// Index of the current token, used to measure attempts.
    pub fn get_pos(&self) -> usize {
        self.pos
    }

    /// A grammar error located at the current token.
    pub fn error_here(&self, expected: &str, priority: u8) -> Error {
        Error::grammar(expected, priority, self.current_token().span.clone())
    }

    /// Returns the start of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Returns the end of the last consumed token.
    pub fn previous_end(&self) -> Position {
        match self.pos.checked_sub(1) {
            Some(index) => self.tokens[index].span.end.clone(),
            None => self.get_position(),
        }
    }

    pub fn get_stmt_handler(&self, kind: TokenKind) -> Option<StmtHandler> {
        if self.quick {
            if let Some(handler) = self.quick_stmt_lookup.get(&kind) {
                return Some(*handler);
            }
        }
        self.stmt_lookup.get(&kind).copied()
    }

    pub fn get_nud_handler(&self, kind: TokenKind) -> Option<NUDHandler> {
        if self.quick {
            if let Some(handler) = self.quick_nud_lookup.get(&kind) {
                return Some(*handler);
            }
        }
        self.nud_lookup.get(&kind).copied()
    }

    /// Binary operator for `kind` if it belongs to precedence level `bp`.
    pub fn get_led(&self, kind: TokenKind, bp: BindingPower) -> Option<BinaryOperator> {
        self.led_lookup
            .get(&kind)
            .filter(|(power, _)| *power == bp)
            .map(|(_, operator)| *operator)
    }

    /// Registers a binary operator at a precedence level.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, operator: BinaryOperator) {
        self.led_lookup.insert(kind, (binding_power, operator));
    }

    /// Registers an atom handler.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers an atom handler that only applies in quick syntax.
    pub fn quick_nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.quick_nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a statement handler that only applies in quick syntax.
    pub fn quick_stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.quick_stmt_lookup.insert(kind, stmt_fn);
    }
}

/// Human readable form of a token kind for `expected ...` messages.
pub fn describe_kind(kind: TokenKind) -> String {
    let keyword = RESERVED_LOOKUP
        .iter()
        .chain(QUICK_LOOKUP.iter())
        .find(|(_, candidate)| **candidate == kind)
        .map(|(text, _)| *text);
    if let Some(text) = keyword {
        return format!("'{}'", text);
    }

    let description = match kind {
        TokenKind::EOF => "end of file",
        TokenKind::Newline => "new line",
        TokenKind::Integer | TokenKind::Float => "number",
        TokenKind::String => "string",
        TokenKind::CharacterList => "character list",
        TokenKind::Identifier => "name",
        TokenKind::OpenParen => "'('",
        TokenKind::CloseParen => "')'",
        TokenKind::OpenBracket => "'['",
        TokenKind::CloseBracket => "']'",
        TokenKind::OpenCurly => "'{'",
        TokenKind::CloseCurly => "'}'",
        TokenKind::Comma => "','",
        TokenKind::Dot => "'.'",
        TokenKind::Arrow => "'->'",
        TokenKind::Colon => "':'",
        _ => "symbol",
    };
    String::from(description)
}

/// Parses a stream of tokens into an Abstract Syntax Tree.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses statements until EOF. The root
/// is always a statement list.
pub fn parse(tokens: Vec<Token>) -> Result<Node, Error> {
    let mut parser = Parser::new(tokens);
    create_token_lookups(&mut parser);

    let start = parser.get_position();
    let mut body = vec![];

    parser.skip_newlines();
    while parser.has_tokens() {
        body.push(parse_stmt(&mut parser)?);

        if parser.has_tokens() {
            parser.expect_error(
                TokenKind::Newline,
                Some(parser.error_here("new line or end of file", 0)),
            )?;
        }
        parser.skip_newlines();
    }

    let end = parser.get_position();
    Ok(Node::new(NodeKind::Statements(body), Span::new(start, end)))
}
