//! Quick syntax entry points and the constructs whose quick headers differ
//! from their verbose form. Everything else is shared with the verbose
//! parsers, which read their keywords from the active syntax.

use crate::{
    ast::{
        ast::{Node, NodeKind},
        statements::IncludeStmt,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    expr::{parse_atom, parse_binary_expr},
    lookups::BindingPower,
    parser::Parser,
    stmt::{finish_count, parse_binding, parse_include_target, parse_stmt},
};

/// `! statement`
pub fn parse_quick_stmt(parser: &mut Parser) -> Result<Node, Error> {
    parser.advance();
    parser.with_mode(true, parse_stmt)
}

/// `! atom`, e.g. a quick function literal inside a verbose expression.
pub fn parse_quick_atom(parser: &mut Parser) -> Result<Node, Error> {
    parser.advance();
    parser.with_mode(true, parse_atom)
}

/// `c [FROM] -> TO [, STEP] [v NAME]: ...`
pub fn parse_quick_count_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();

    let from = if parser.current_token_kind() == TokenKind::Arrow {
        None
    } else {
        Some(Box::new(parse_binary_expr(parser, BindingPower::Junction)?))
    };

    parser.expect(TokenKind::Arrow)?;
    let end = parse_binary_expr(parser, BindingPower::Junction)?;

    let step = if parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        Some(Box::new(parse_binary_expr(parser, BindingPower::Junction)?))
    } else {
        None
    };

    let variable = parse_binding(parser)?;

    finish_count(parser, start, from, end, step, variable)
}

/// `i TARGET [-> MEMBER] [v NICKNAME | *]`
pub fn parse_quick_include_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();

    let target = parse_include_target(parser)?;

    let member = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        Some(parser.expect_name("member name")?)
    } else {
        None
    };

    let nickname = parse_binding(parser)?;
    let dump_all = nickname.is_none()
        && member.is_none()
        && parser.current_token_kind() == TokenKind::Star;
    if dump_all {
        parser.advance();
    }

    Ok(Node::new(
        NodeKind::Include(IncludeStmt {
            target,
            member,
            nickname,
            dump_all,
        }),
        Span::new(start, parser.previous_end()),
    ))
}
