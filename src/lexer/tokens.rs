use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("invert", TokenKind::Invert);
        map.insert("in", TokenKind::In);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("do", TokenKind::Do);
        map.insert("end", TokenKind::End);
        map.insert("count", TokenKind::Count);
        map.insert("from", TokenKind::From);
        map.insert("to", TokenKind::To);
        map.insert("step", TokenKind::Step);
        map.insert("as", TokenKind::As);
        map.insert("while", TokenKind::While);
        map.insert("try", TokenKind::Try);
        map.insert("error", TokenKind::Error);
        map.insert("function", TokenKind::Function);
        map.insert("with", TokenKind::With);
        map.insert("object", TokenKind::Object);
        map.insert("include", TokenKind::Include);
        map.insert("dump", TokenKind::Dump);
        map.insert("return", TokenKind::Return);
        map.insert("skip", TokenKind::Skip);
        map.insert("stop", TokenKind::Stop);
        map.insert("global", TokenKind::Global);
        map
    };

    /// Single and double letter aliases, only meaningful in quick syntax.
    pub static ref QUICK_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("f", TokenKind::QuickIf);
        map.insert("l", TokenKind::QuickElse);
        map.insert("e", TokenKind::QuickError);
        map.insert("c", TokenKind::QuickCount);
        map.insert("w", TokenKind::QuickWhile);
        map.insert("t", TokenKind::QuickTry);
        map.insert("fd", TokenKind::QuickFunction);
        map.insert("sd", TokenKind::QuickStop);
        map.insert("od", TokenKind::QuickObject);
        map.insert("i", TokenKind::QuickInclude);
        map.insert("g", TokenKind::QuickGlobal);
        map.insert("d", TokenKind::QuickDone);
        map.insert("v", TokenKind::QuickAs);
        map.insert("n", TokenKind::QuickReturn);
        map.insert("s", TokenKind::QuickSkip);
        map
    };
}

/// Broad classification of a token kind.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenCategory {
    Value,
    Keyword,
    QuickKeyword,
    Symbol,
    AssignmentSymbol,
    Structural,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Newline,

    Integer,
    Float,
    String,
    CharacterList,
    Identifier,

    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    Comma,
    Dot,
    Arrow,

    Plus,
    Dash,
    Star,
    Slash,
    Percent,
    Caret,
    Ampersand,
    Pipe,
    Backslash,
    Tilde,
    LeftShift,
    RightShift,

    Equals,      // =
    Exclamation, // ! (not-equal, or the quick syntax sentinel)
    Less,
    Greater,
    LessEquals,
    GreaterEquals,

    Colon, // plain assignment
    ColonPlus,
    ColonDash,
    ColonStar,
    ColonSlash,
    ColonPercent,
    ColonCaret,
    ColonAmpersand,
    ColonPipe,
    ColonBackslash,
    ColonLeftShift,
    ColonRightShift,

    // Reserved
    And,
    Or,
    Invert,
    In,
    If,
    Else,
    Do,
    End,
    Count,
    From,
    To,
    Step,
    As,
    While,
    Try,
    Error,
    Function,
    With,
    Object,
    Include,
    Dump,
    Return,
    Skip,
    Stop,
    Global,

    // Quick syntax
    QuickIf,
    QuickElse,
    QuickError,
    QuickCount,
    QuickWhile,
    QuickTry,
    QuickFunction,
    QuickStop,
    QuickObject,
    QuickInclude,
    QuickGlobal,
    QuickDone,
    QuickAs,
    QuickReturn,
    QuickSkip,
}

impl TokenKind {
    pub fn category(&self) -> TokenCategory {
        use TokenKind::*;

        match self {
            Integer | Float | String | CharacterList | Identifier => TokenCategory::Value,
            EOF | Newline | OpenParen | CloseParen | OpenBracket | CloseBracket | OpenCurly
            | CloseCurly | Comma => TokenCategory::Structural,
            Colon | ColonPlus | ColonDash | ColonStar | ColonSlash | ColonPercent | ColonCaret
            | ColonAmpersand | ColonPipe | ColonBackslash | ColonLeftShift | ColonRightShift => {
                TokenCategory::AssignmentSymbol
            }
            And | Or | Invert | In | If | Else | Do | End | Count | From | To | Step | As
            | While | Try | Error | Function | With | Object | Include | Dump | Return | Skip
            | Stop | Global => TokenCategory::Keyword,
            QuickIf | QuickElse | QuickError | QuickCount | QuickWhile | QuickTry
            | QuickFunction | QuickStop | QuickObject | QuickInclude | QuickGlobal | QuickDone
            | QuickAs | QuickReturn | QuickSkip => TokenCategory::QuickKeyword,
            _ => TokenCategory::Symbol,
        }
    }

    pub fn is_quick_keyword(&self) -> bool {
        self.category() == TokenCategory::QuickKeyword
    }

    pub fn is_assignment(&self) -> bool {
        self.category() == TokenCategory::AssignmentSymbol
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    /// Whether the token names something, including quick keywords used as
    /// plain identifiers outside quick syntax.
    pub fn is_name(&self) -> bool {
        self.kind == TokenKind::Identifier || self.kind.is_quick_keyword()
    }
}
