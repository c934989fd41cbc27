use std::collections::HashMap;

use crate::{
    ast::{
        ast::Node,
        expressions::{AssignOperator, BinaryOperator},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, quick::*, stmt::*};

/// Binary precedence levels, loosest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Junction,
    Comparison,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Shift,
    Arithmetic,
    Term,
}

impl BindingPower {
    /// The next tighter level. `Term` is the tightest binary level.
    pub fn next(self) -> BindingPower {
        match self {
            BindingPower::Junction => BindingPower::Comparison,
            BindingPower::Comparison => BindingPower::BitwiseOr,
            BindingPower::BitwiseOr => BindingPower::BitwiseXor,
            BindingPower::BitwiseXor => BindingPower::BitwiseAnd,
            BindingPower::BitwiseAnd => BindingPower::Shift,
            BindingPower::Shift => BindingPower::Arithmetic,
            BindingPower::Arithmetic => BindingPower::Term,
            BindingPower::Term => BindingPower::Term,
        }
    }
}

/// The keywords a construct is spelled with, per surface syntax.
#[derive(Debug)]
pub struct Syntax {
    /// Opens a body: `do` or `:`.
    pub opener: TokenKind,
    /// Closes a block-form construct: `end` or `d`.
    pub closer: TokenKind,
    /// `else` or `l`.
    pub otherwise: TokenKind,
    /// `if` or `f`, after `otherwise`.
    pub condition: TokenKind,
    /// Starts a try handler: `error` or `e`.
    pub catch: TokenKind,
    /// Binds a name in loops, handlers and includes: `as` or `v`.
    pub binder: TokenKind,
    /// Introduces a parameter list: `with` or `v`.
    pub parameters: TokenKind,
    /// Introduces parent classes: `from` or `->`.
    pub parents: TokenKind,
}

pub static VERBOSE: Syntax = Syntax {
    opener: TokenKind::Do,
    closer: TokenKind::End,
    otherwise: TokenKind::Else,
    condition: TokenKind::If,
    catch: TokenKind::Error,
    binder: TokenKind::As,
    parameters: TokenKind::With,
    parents: TokenKind::From,
};

pub static QUICK: Syntax = Syntax {
    opener: TokenKind::Colon,
    closer: TokenKind::QuickDone,
    otherwise: TokenKind::QuickElse,
    condition: TokenKind::QuickIf,
    catch: TokenKind::QuickError,
    binder: TokenKind::QuickAs,
    parameters: TokenKind::QuickAs,
    parents: TokenKind::Arrow,
};

pub type StmtHandler = fn(&mut Parser) -> Result<Node, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Node, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Junction
    parser.led(TokenKind::And, BindingPower::Junction, BinaryOperator::And);
    parser.led(TokenKind::Or, BindingPower::Junction, BinaryOperator::Or);

    // Comparison
    parser.led(TokenKind::Equals, BindingPower::Comparison, BinaryOperator::Equal);
    parser.led(TokenKind::Exclamation, BindingPower::Comparison, BinaryOperator::NotEqual);
    parser.led(TokenKind::Less, BindingPower::Comparison, BinaryOperator::LessThan);
    parser.led(TokenKind::Greater, BindingPower::Comparison, BinaryOperator::GreaterThan);
    parser.led(TokenKind::LessEquals, BindingPower::Comparison, BinaryOperator::LessOrEqual);
    parser.led(TokenKind::GreaterEquals, BindingPower::Comparison, BinaryOperator::GreaterOrEqual);
    parser.led(TokenKind::In, BindingPower::Comparison, BinaryOperator::In);

    // Bitwise
    parser.led(TokenKind::Pipe, BindingPower::BitwiseOr, BinaryOperator::BitwiseOr);
    parser.led(TokenKind::Backslash, BindingPower::BitwiseXor, BinaryOperator::BitwiseXor);
    parser.led(TokenKind::Ampersand, BindingPower::BitwiseAnd, BinaryOperator::BitwiseAnd);
    parser.led(TokenKind::LeftShift, BindingPower::Shift, BinaryOperator::LeftShift);
    parser.led(TokenKind::RightShift, BindingPower::Shift, BinaryOperator::RightShift);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Arithmetic, BinaryOperator::Add);
    parser.led(TokenKind::Dash, BindingPower::Arithmetic, BinaryOperator::Subtract);
    parser.led(TokenKind::Star, BindingPower::Term, BinaryOperator::Multiply);
    parser.led(TokenKind::Slash, BindingPower::Term, BinaryOperator::Divide);
    parser.led(TokenKind::Percent, BindingPower::Term, BinaryOperator::Modulo);

    // Literals and symbols
    parser.nud(TokenKind::Integer, parse_primary_expr);
    parser.nud(TokenKind::Float, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::CharacterList, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_primary_expr);
    parser.nud(TokenKind::Global, parse_global_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::OpenBracket, parse_list_expr);
    parser.nud(TokenKind::OpenCurly, parse_dictionary_expr);
    parser.nud(TokenKind::Exclamation, parse_quick_atom);

    // Constructs
    parser.nud(TokenKind::If, parse_if_expr);
    parser.nud(TokenKind::Count, parse_count_expr);
    parser.nud(TokenKind::While, parse_while_expr);
    parser.nud(TokenKind::Try, parse_try_expr);
    parser.nud(TokenKind::Function, parse_function_expr);
    parser.nud(TokenKind::Object, parse_object_expr);
    parser.nud(TokenKind::Include, parse_include_expr);

    parser.quick_nud(TokenKind::QuickGlobal, parse_global_expr);
    parser.quick_nud(TokenKind::QuickIf, parse_if_expr);
    parser.quick_nud(TokenKind::QuickCount, parse_quick_count_expr);
    parser.quick_nud(TokenKind::QuickWhile, parse_while_expr);
    parser.quick_nud(TokenKind::QuickTry, parse_try_expr);
    parser.quick_nud(TokenKind::QuickFunction, parse_function_expr);
    parser.quick_nud(TokenKind::QuickObject, parse_object_expr);
    parser.quick_nud(TokenKind::QuickInclude, parse_quick_include_expr);

    // Statements
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::Skip, parse_skip_stmt);
    parser.stmt(TokenKind::Stop, parse_stop_stmt);
    parser.stmt(TokenKind::Exclamation, parse_quick_stmt);

    parser.quick_stmt(TokenKind::QuickReturn, parse_return_stmt);
    parser.quick_stmt(TokenKind::QuickSkip, parse_skip_stmt);
    parser.quick_stmt(TokenKind::QuickStop, parse_stop_stmt);
}

/// The operator behind an assignment symbol.
pub fn assignment_operator(kind: TokenKind) -> Option<AssignOperator> {
    let operator = match kind {
        TokenKind::Colon => return Some(AssignOperator::Assign),
        TokenKind::ColonPlus => BinaryOperator::Add,
        TokenKind::ColonDash => BinaryOperator::Subtract,
        TokenKind::ColonStar => BinaryOperator::Multiply,
        TokenKind::ColonSlash => BinaryOperator::Divide,
        TokenKind::ColonPercent => BinaryOperator::Modulo,
        TokenKind::ColonCaret => BinaryOperator::Power,
        TokenKind::ColonAmpersand => BinaryOperator::BitwiseAnd,
        TokenKind::ColonPipe => BinaryOperator::BitwiseOr,
        TokenKind::ColonBackslash => BinaryOperator::BitwiseXor,
        TokenKind::ColonLeftShift => BinaryOperator::LeftShift,
        TokenKind::ColonRightShift => BinaryOperator::RightShift,
        _ => return None,
    };
    Some(AssignOperator::Compound(operator))
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, (BindingPower, BinaryOperator)>;
