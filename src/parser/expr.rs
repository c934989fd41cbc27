use crate::{
    ast::{
        ast::{Node, NodeKind},
        expressions::{
            AttributeExpr, BinaryExpr, BinaryOperator, CallExpr, UnaryExpr, UnaryOperator, VariableAccess,
            VariableAssign,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{TokenCategory, TokenKind},
    stack::ensure_sufficient_stack,
    Span,
};

use super::{
    lookups::{assignment_operator, BindingPower},
    parser::{Attempts, Parser},
};

/// Parses an assignment or, failing that, a junction.
///
/// An assignment that failed after consuming more tokens than the junction
/// parse that succeeded is reported instead, so `x : ` complains about the
/// missing value rather than the stray `:`.
pub fn parse_expr(parser: &mut Parser) -> Result<Node, Error> {
    ensure_sufficient_stack(|| parse_expr_inner(parser))
}

fn parse_expr_inner(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.get_pos();

    let assignment = match parser.attempt(parse_assignment_expr) {
        Ok(node) => return Ok(node),
        Err(failure) => failure,
    };

    match parser.attempt(|parser| parse_binary_expr(parser, BindingPower::Junction)) {
        Ok(_) if assignment.consumed > parser.get_pos() - start => Err(assignment.error),
        Ok(node) => Ok(node),
        Err(failure) => {
            let mut attempts = Attempts::default();
            attempts.record(assignment);
            attempts.record(failure);
            Err(attempts
                .into_error()
                .unwrap_or_else(|| parser.error_here("expression", 0)))
        }
    }
}

pub fn parse_assignment_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.get_position();

    let global_kind = if parser.is_quick() {
        TokenKind::QuickGlobal
    } else {
        TokenKind::Global
    };
    let is_global = parser.current_token_kind() == global_kind;
    if is_global {
        parser.advance();
    }

    let mut target = vec![parser.expect_name("variable name")?];
    while parser.current_token_kind() == TokenKind::Dot {
        parser.advance();
        target.push(parser.expect_name("attribute name")?);
    }

    let Some(operator) = assignment_operator(parser.current_token_kind()) else {
        return Err(parser.error_here("assignment symbol", 0));
    };
    parser.advance();

    let value = parse_expr(parser)?;

    Ok(Node::new(
        NodeKind::VariableAssign(VariableAssign {
            target,
            operator,
            value: Box::new(value),
            is_global,
        }),
        Span::new(start, parser.previous_end()),
    ))
}

/// Parses one binary precedence level, folding to the left.
pub fn parse_binary_expr(parser: &mut Parser, bp: BindingPower) -> Result<Node, Error> {
    let mut left = parse_operand(parser, bp)?;

    while let Some(operator) = parser.get_led(parser.current_token_kind(), bp) {
        parser.advance();
        let right = parse_operand(parser, bp)?;
        let span = left.span.to(&right.span);

        left = Node::new(
            NodeKind::Binary(BinaryExpr {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            }),
            span,
        );
    }

    Ok(left)
}

fn parse_operand(parser: &mut Parser, bp: BindingPower) -> Result<Node, Error> {
    match bp {
        BindingPower::Junction => parse_inversion_expr(parser),
        BindingPower::Term => parse_prefix_expr(parser),
        _ => parse_binary_expr(parser, bp.next()),
    }
}

pub fn parse_inversion_expr(parser: &mut Parser) -> Result<Node, Error> {
    if parser.current_token_kind() != TokenKind::Invert {
        return parse_binary_expr(parser, BindingPower::Comparison);
    }

    let start = parser.advance().span.start.clone();
    let operand = parse_inversion_expr(parser)?;
    let span = Span::new(start, operand.span.end.clone());

    Ok(Node::new(
        NodeKind::Unary(UnaryExpr {
            operator: UnaryOperator::Invert,
            operand: Box::new(operand),
        }),
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Node, Error> {
    let operator = match parser.current_token_kind() {
        TokenKind::Plus => UnaryOperator::Plus,
        TokenKind::Dash => UnaryOperator::Negate,
        TokenKind::Tilde => UnaryOperator::BitwiseNot,
        _ => return parse_power_expr(parser),
    };

    let start = parser.advance().span.start.clone();
    let operand = parse_prefix_expr(parser)?;
    let span = Span::new(start, operand.span.end.clone());

    Ok(Node::new(
        NodeKind::Unary(UnaryExpr {
            operator,
            operand: Box::new(operand),
        }),
        span,
    ))
}

pub fn parse_power_expr(parser: &mut Parser) -> Result<Node, Error> {
    let mut left = parse_attribute_expr(parser)?;

    while parser.current_token_kind() == TokenKind::Caret {
        parser.advance();
        let right = parse_prefix_expr(parser)?;
        let span = left.span.to(&right.span);

        left = Node::new(
            NodeKind::Binary(BinaryExpr {
                left: Box::new(left),
                operator: BinaryOperator::Power,
                right: Box::new(right),
            }),
            span,
        );
    }

    Ok(left)
}

/// `call ('.' member)?`, with the member chain nested to the right.
pub fn parse_attribute_expr(parser: &mut Parser) -> Result<Node, Error> {
    let object = parse_call_expr(parser)?;

    if parser.current_token_kind() != TokenKind::Dot {
        return Ok(object);
    }

    parser.advance();
    let member = parse_member_expr(parser)?;
    let span = object.span.to(&member.span);

    Ok(Node::new(
        NodeKind::Attribute(AttributeExpr {
            object: Box::new(object),
            member: Box::new(member),
        }),
        span,
    ))
}

/// The right-hand side of `.`: a name, optionally called, optionally
/// followed by further members.
fn parse_member_expr(parser: &mut Parser) -> Result<Node, Error> {
    let token = parser.current_token().clone();
    let name = parser.expect_name("attribute name")?;

    let access = Node::new(
        NodeKind::VariableAccess(VariableAccess {
            name,
            is_global: false,
        }),
        token.span,
    );
    let member = parse_call_suffix(parser, access)?;

    if parser.current_token_kind() != TokenKind::Dot {
        return Ok(member);
    }

    parser.advance();
    let inner = parse_member_expr(parser)?;
    let span = member.span.to(&inner.span);

    Ok(Node::new(
        NodeKind::Attribute(AttributeExpr {
            object: Box::new(member),
            member: Box::new(inner),
        }),
        span,
    ))
}

pub fn parse_call_expr(parser: &mut Parser) -> Result<Node, Error> {
    let callee = parse_atom(parser)?;
    parse_call_suffix(parser, callee)
}

fn parse_call_suffix(parser: &mut Parser, callee: Node) -> Result<Node, Error> {
    let mut callee = callee;

    while parser.current_token_kind() == TokenKind::OpenParen {
        parser.advance();
        let arguments = parse_sequence(parser, TokenKind::CloseParen, "',' or ')'")?;
        let span = Span::new(callee.span.start.clone(), parser.previous_end());

        callee = Node::new(
            NodeKind::Call(CallExpr {
                callee: Box::new(callee),
                arguments,
            }),
            span,
        );
    }

    Ok(callee)
}

/// Parses comma separated expressions up to and including `closer`.
/// Newlines and a trailing comma are allowed.
fn parse_sequence(
    parser: &mut Parser,
    closer: TokenKind,
    expected: &str,
) -> Result<Vec<Node>, Error> {
    let mut elements = vec![];

    parser.skip_newlines();
    while parser.current_token_kind() != closer {
        elements.push(parse_expr(parser)?);
        parser.skip_newlines();

        match parser.current_token_kind() {
            TokenKind::Comma => {
                parser.advance();
                parser.skip_newlines();
            }
            kind if kind == closer => {}
            _ => return Err(parser.error_here(expected, 0)),
        }
    }
    parser.advance();

    Ok(elements)
}

/// Dispatches on the current token through the atom lookup tables. Keyword
/// constructs switch the parser into their own syntax while they parse.
pub fn parse_atom(parser: &mut Parser) -> Result<Node, Error> {
    let kind = parser.current_token_kind();

    if let Some(handler) = parser.get_nud_handler(kind) {
        return match kind.category() {
            TokenCategory::Keyword => parser.with_mode(false, handler),
            TokenCategory::QuickKeyword => parser.with_mode(true, handler),
            _ => handler(parser),
        };
    }

    if parser.at_name() {
        return parse_primary_expr(parser);
    }

    Err(parser.error_here("expression", 0))
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Node, Error> {
    let token = parser.advance().clone();

    let kind = match token.kind {
        TokenKind::Integer => match token.value.parse::<i64>() {
            Ok(value) => NodeKind::Integer(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::InvalidNumber { token: token.value },
                    token.span,
                ))
            }
        },
        TokenKind::Float => match token.value.parse::<f64>() {
            Ok(value) => NodeKind::Float(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::InvalidNumber { token: token.value },
                    token.span,
                ))
            }
        },
        TokenKind::String => NodeKind::String(token.value),
        TokenKind::CharacterList => NodeKind::CharacterList(token.value),
        _ => NodeKind::VariableAccess(VariableAccess {
            name: token.value,
            is_global: false,
        }),
    };

    Ok(Node::new(kind, token.span))
}

/// `global NAME`
pub fn parse_global_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();
    let name = parser.expect_name("variable name")?;

    Ok(Node::new(
        NodeKind::VariableAccess(VariableAccess {
            name,
            is_global: true,
        }),
        Span::new(start, parser.previous_end()),
    ))
}

/// `()` and `(a, ...)` are arrays; `(a)` is a parenthesized expression.
pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();
    parser.skip_newlines();

    if parser.current_token_kind() == TokenKind::CloseParen {
        parser.advance();
        return Ok(Node::new(
            NodeKind::Array(vec![]),
            Span::new(start, parser.previous_end()),
        ));
    }

    let first = parse_expr(parser)?;
    parser.skip_newlines();

    match parser.current_token_kind() {
        TokenKind::CloseParen => {
            parser.advance();
            Ok(first)
        }
        TokenKind::Comma => {
            parser.advance();
            let mut elements = vec![first];
            elements.extend(parse_sequence(parser, TokenKind::CloseParen, "',' or ')'")?);

            Ok(Node::new(
                NodeKind::Array(elements),
                Span::new(start, parser.previous_end()),
            ))
        }
        _ => Err(parser.error_here("',' or ')'", 1)),
    }
}

pub fn parse_list_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();
    let elements = parse_sequence(parser, TokenKind::CloseBracket, "',' or ']'")?;

    Ok(Node::new(
        NodeKind::List(elements),
        Span::new(start, parser.previous_end()),
    ))
}

pub fn parse_dictionary_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();
    let mut pairs = vec![];

    parser.skip_newlines();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        let key = parse_binary_expr(parser, BindingPower::Junction)?;
        parser.skip_newlines();
        parser.expect(TokenKind::Colon)?;
        parser.skip_newlines();
        let value = parse_binary_expr(parser, BindingPower::Junction)?;
        pairs.push((key, value));
        parser.skip_newlines();

        match parser.current_token_kind() {
            TokenKind::Comma => {
                parser.advance();
                parser.skip_newlines();
            }
            TokenKind::CloseCurly => {}
            _ => return Err(parser.error_here("',' or '}'", 0)),
        }
    }
    parser.advance();

    Ok(Node::new(
        NodeKind::Dictionary(pairs),
        Span::new(start, parser.previous_end()),
    ))
}
