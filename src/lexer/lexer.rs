use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, QUICK_LOOKUP, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(regex).expect("token patterns are valid regular expressions"),
        handler,
    }
}

lazy_static! {
    /// Anchored token patterns, tried in order. Longer symbols come before
    /// their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern("^[0-9]+(\\.[0-9]+)?", number_handler),
        pattern("^[ \\t\\r]+", skip_handler),
        pattern("^#[^\\n]*", skip_handler),
        pattern("^[\\n;]", newline_handler),
        pattern("^[\"']", string_handler),
        pattern("^:<<", MK_DEFAULT_HANDLER!(TokenKind::ColonLeftShift, ":<<")),
        pattern("^:>>", MK_DEFAULT_HANDLER!(TokenKind::ColonRightShift, ":>>")),
        pattern("^:\\+", MK_DEFAULT_HANDLER!(TokenKind::ColonPlus, ":+")),
        pattern("^:-", MK_DEFAULT_HANDLER!(TokenKind::ColonDash, ":-")),
        pattern("^:\\*", MK_DEFAULT_HANDLER!(TokenKind::ColonStar, ":*")),
        pattern("^:/", MK_DEFAULT_HANDLER!(TokenKind::ColonSlash, ":/")),
        pattern("^:%", MK_DEFAULT_HANDLER!(TokenKind::ColonPercent, ":%")),
        pattern("^:\\^", MK_DEFAULT_HANDLER!(TokenKind::ColonCaret, ":^")),
        pattern("^:&", MK_DEFAULT_HANDLER!(TokenKind::ColonAmpersand, ":&")),
        pattern("^:\\|", MK_DEFAULT_HANDLER!(TokenKind::ColonPipe, ":|")),
        pattern("^:\\\\", MK_DEFAULT_HANDLER!(TokenKind::ColonBackslash, ":\\")),
        pattern("^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern("^->", MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->")),
        pattern("^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern("^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern("^<<", MK_DEFAULT_HANDLER!(TokenKind::LeftShift, "<<")),
        pattern("^>>", MK_DEFAULT_HANDLER!(TokenKind::RightShift, ">>")),
        pattern("^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern("^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern("^=", MK_DEFAULT_HANDLER!(TokenKind::Equals, "=")),
        pattern("^!", MK_DEFAULT_HANDLER!(TokenKind::Exclamation, "!")),
        pattern("^\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern("^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern("^\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern("^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern("^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        pattern("^\\^", MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")),
        pattern("^&", MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&")),
        pattern("^\\|", MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|")),
        pattern("^\\\\", MK_DEFAULT_HANDLER!(TokenKind::Backslash, "\\")),
        pattern("^~", MK_DEFAULT_HANDLER!(TokenKind::Tilde, "~")),
        pattern("^\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern("^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern("^\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern("^\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern("^\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        pattern("^\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        pattern("^\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern("^\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: Rc<str>,
    position: Position,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name: Rc<str> = match file {
            Some(file) => Rc::from(file),
            None => Rc::from("shell"),
        };
        let source: Rc<str> = Rc::from(source);

        Lexer {
            tokens: vec![],
            position: Position::new(file_name, Rc::clone(&source)),
            source,
        }
    }

    pub fn position(&self) -> Position {
        self.position.clone()
    }

    pub fn advance(&mut self, character: char) {
        self.position.advance(character);
    }

    /// Moves past `text`, which must be the text at the current position.
    pub fn advance_over(&mut self, text: &str) {
        for character in text.chars() {
            self.position.advance(character);
        }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.position.index..]
    }

    pub fn at_eof(&self) -> bool {
        self.position.index >= self.source.len()
    }

    fn matched(&self, regex: &Regex) -> String {
        regex
            .find(self.remainder())
            .map(|found| found.as_str().to_owned())
            .unwrap_or_default()
    }
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    let kind = if matched.contains('.') {
        TokenKind::Float
    } else {
        TokenKind::Integer
    };

    let start = lexer.position();
    lexer.advance_over(&matched);
    lexer.push(MK_TOKEN!(kind, matched, Span::new(start, lexer.position())));
    Ok(())
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    lexer.advance_over(&matched);
    Ok(())
}

fn newline_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    let start = lexer.position();
    lexer.advance_over(&matched);
    lexer.push(MK_TOKEN!(TokenKind::Newline, matched, Span::new(start, lexer.position())));
    Ok(())
}

fn string_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let start = lexer.position();
    let Some(quote) = lexer.at() else {
        return Ok(());
    };
    let (kind, literal) = if quote == '"' {
        (TokenKind::String, "string")
    } else {
        (TokenKind::CharacterList, "character list")
    };
    lexer.advance(quote);

    let unterminated = |lexer: &Lexer| {
        Error::new(
            ErrorImpl::UnterminatedString {
                literal: String::from(literal),
            },
            Span::new(start.clone(), lexer.position()),
        )
    };

    let mut content = String::new();
    loop {
        let Some(character) = lexer.at() else {
            return Err(unterminated(lexer));
        };

        if character == quote {
            lexer.advance(character);
            break;
        }

        if character != '\\' {
            content.push(character);
            lexer.advance(character);
            continue;
        }

        let escape_start = lexer.position();
        lexer.advance('\\');
        let Some(escaped) = lexer.at() else {
            return Err(unterminated(lexer));
        };
        lexer.advance(escaped);

        let decoded = match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' => '\0',
            'u' => unicode_escape(lexer, 4, escape_start)?,
            'U' => unicode_escape(lexer, 6, escape_start)?,
            other => other,
        };
        content.push(decoded);
    }

    lexer.push(MK_TOKEN!(kind, content, Span::new(start, lexer.position())));
    Ok(())
}

fn unicode_escape(lexer: &mut Lexer, digits: usize, escape_start: Position) -> Result<char, Error> {
    let mut hex = String::new();

    for _ in 0..digits {
        match lexer.at() {
            Some(character) if character.is_ascii_hexdigit() => {
                hex.push(character);
                lexer.advance(character);
            }
            _ => {
                return Err(Error::new(
                    ErrorImpl::InvalidEscape {
                        message: format!(
                            "expected {} hexadecimal digits in unicode escape",
                            digits
                        ),
                    },
                    Span::new(escape_start, lexer.position()),
                ))
            }
        }
    }

    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::InvalidEscape {
                    message: format!("'{}' is not a valid unicode codepoint", hex),
                },
                Span::new(escape_start, lexer.position()),
            )
        })
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = lexer.matched(regex);
    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .or_else(|| QUICK_LOOKUP.get(value.as_str()))
        .copied()
        .unwrap_or(TokenKind::Identifier);

    let start = lexer.position();
    lexer.advance_over(&value);
    lexer.push(MK_TOKEN!(kind, value, Span::new(start, lexer.position())));
    Ok(())
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let handler = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()));

        match handler {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex)?,
            None => {
                let start = lex.position();
                let character = lex.at().unwrap_or('\0');
                lex.advance(character);
                return Err(Error::new(
                    ErrorImpl::UnknownCharacter { character },
                    Span::new(start, lex.position()),
                ));
            }
        }
    }

    let end = lex.position();
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), Span::new(end.clone(), end)));
    Ok(lex.tokens)
}
