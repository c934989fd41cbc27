use std::rc::Rc;

use crate::{
    ast::{
        ast::{Node, NodeKind},
        statements::{
            CountExpr, ErrorHandler, FunctionDefinition, IfExpr, IncludeStmt, IncludeTarget,
            ObjectDefinition, TryExpr, WhileExpr,
        },
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{
        expr::{parse_attribute_expr, parse_binary_expr, parse_expr},
        lookups::BindingPower,
    },
    Position, Span,
};

use super::parser::Parser;

pub fn parse_stmt(parser: &mut Parser) -> Result<Node, Error> {
    if let Some(handler) = parser.get_stmt_handler(parser.current_token_kind()) {
        return handler(parser);
    }

    parse_expr(parser)
}

/// Statements up to a terminator of the active syntax. The terminator itself
/// is left for the enclosing construct.
pub fn parse_block(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.get_position();
    let mut body = vec![];

    parser.skip_newlines();
    while !parser.at_terminator() {
        body.push(parse_stmt(parser)?);

        if !parser.at_terminator() {
            parser.expect_error(TokenKind::Newline, Some(parser.error_here("new line", 0)))?;
        }
        parser.skip_newlines();
    }

    Ok(Node::new(
        NodeKind::Statements(body),
        Span::new(start, parser.previous_end()),
    ))
}

/// Parses a body opener and its body. A line break right after the opener
/// makes the body a block; the flag returned says which form was used.
pub fn parse_body(parser: &mut Parser) -> Result<(Node, bool), Error> {
    parser.expect(parser.syntax().opener)?;

    if parser.current_token_kind() == TokenKind::Newline {
        Ok((parse_block(parser)?, true))
    } else {
        Ok((parse_stmt(parser)?, false))
    }
}

/// Parses a later body of a construct, which must use the same form as the
/// first one.
pub fn parse_body_as(parser: &mut Parser, block: bool) -> Result<Node, Error> {
    parser.expect(parser.syntax().opener)?;
    let on_new_line = parser.current_token_kind() == TokenKind::Newline;

    match (block, on_new_line) {
        (true, true) => parse_block(parser),
        (false, false) => parse_stmt(parser),
        (true, false) => Err(parser.error_here("new line to continue the block", 1)),
        (false, true) => Err(parser.error_here("statement on the same line", 1)),
    }
}

fn close_construct(parser: &mut Parser, block: bool) -> Result<(), Error> {
    if block {
        parser.expect(parser.syntax().closer)?;
    }
    Ok(())
}

/// Comma separated names.
pub fn parse_names(parser: &mut Parser, description: &str) -> Result<Vec<String>, Error> {
    let mut names = vec![parser.expect_name(description)?];

    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        names.push(parser.expect_name(description)?);
    }

    Ok(names)
}

/// `as NAME` / `v NAME`, if present.
pub fn parse_binding(parser: &mut Parser) -> Result<Option<String>, Error> {
    if parser.current_token_kind() != parser.syntax().binder {
        return Ok(None);
    }

    parser.advance();
    Ok(Some(parser.expect_name("name")?))
}

pub fn parse_if_expr(parser: &mut Parser) -> Result<Node, Error> {
    let syntax = parser.syntax();
    let start = parser.advance().span.start.clone();

    let condition = parse_binary_expr(parser, BindingPower::Junction)?;
    let (body, block) = parse_body(parser)?;

    let mut cases = vec![(condition, body)];
    let mut else_case = None;

    while parser.current_token_kind() == syntax.otherwise {
        parser.advance();

        if parser.current_token_kind() == syntax.condition {
            parser.advance();
            let condition = parse_binary_expr(parser, BindingPower::Junction)?;
            let body = parse_body_as(parser, block)?;
            cases.push((condition, body));
        } else {
            else_case = Some(Box::new(parse_body_as(parser, block)?));
            break;
        }
    }

    close_construct(parser, block)?;

    Ok(Node::new(
        NodeKind::If(IfExpr {
            cases,
            else_case,
            discard_results: block,
        }),
        Span::new(start, parser.previous_end()),
    ))
}

/// `count [from X] to Y [step S] [as NAME] do ...`
pub fn parse_count_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();

    let from = if parser.current_token_kind() == TokenKind::From {
        parser.advance();
        Some(Box::new(parse_binary_expr(parser, BindingPower::Junction)?))
    } else {
        None
    };

    parser.expect(TokenKind::To)?;
    let end = parse_binary_expr(parser, BindingPower::Junction)?;

    let step = if parser.current_token_kind() == TokenKind::Step {
        parser.advance();
        Some(Box::new(parse_binary_expr(parser, BindingPower::Junction)?))
    } else {
        None
    };

    let variable = parse_binding(parser)?;

    finish_count(parser, start, from, end, step, variable)
}

/// Shared tail of both count headers: the body and the closing keyword.
pub fn finish_count(
    parser: &mut Parser,
    start: Position,
    from: Option<Box<Node>>,
    end: Node,
    step: Option<Box<Node>>,
    variable: Option<String>,
) -> Result<Node, Error> {
    let (body, block) = parse_body(parser)?;
    close_construct(parser, block)?;

    Ok(Node::new(
        NodeKind::Count(CountExpr {
            start: from,
            end: Box::new(end),
            step,
            variable,
            body: Box::new(body),
            discard_results: block,
        }),
        Span::new(start, parser.previous_end()),
    ))
}

pub fn parse_while_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_binary_expr(parser, BindingPower::Junction)?;
    let (body, block) = parse_body(parser)?;
    close_construct(parser, block)?;

    Ok(Node::new(
        NodeKind::While(WhileExpr {
            condition: Box::new(condition),
            body: Box::new(body),
            discard_results: block,
        }),
        Span::new(start, parser.previous_end()),
    ))
}

/// `try do ... [error [TAG] [as NAME] do ...]*`. A tag-less handler catches
/// everything and must come last.
pub fn parse_try_expr(parser: &mut Parser) -> Result<Node, Error> {
    let syntax = parser.syntax();
    let start = parser.advance().span.start.clone();

    let (body, block) = parse_body(parser)?;
    let mut handlers: Vec<ErrorHandler> = vec![];

    while parser.current_token_kind() == syntax.catch {
        if handlers.last().is_some_and(|handler| handler.tag.is_none()) {
            return Err(parser.error_here("no handlers after the catch-all handler", 1));
        }
        parser.advance();

        let kind = parser.current_token_kind();
        let tag = if kind != syntax.binder && kind != syntax.opener {
            Some(parse_binary_expr(parser, BindingPower::Junction)?)
        } else {
            None
        };
        let variable = parse_binding(parser)?;
        let body = parse_body_as(parser, block)?;

        handlers.push(ErrorHandler {
            tag,
            variable,
            body,
        });
    }

    close_construct(parser, block)?;

    Ok(Node::new(
        NodeKind::Try(TryExpr {
            body: Box::new(body),
            handlers,
            discard_results: block,
        }),
        Span::new(start, parser.previous_end()),
    ))
}

/// `function [NAME] [with a, b] do ...`
pub fn parse_function_expr(parser: &mut Parser) -> Result<Node, Error> {
    let syntax = parser.syntax();
    let start = parser.advance().span.start.clone();

    let name = if parser.at_name() {
        Some(parser.advance().value.clone())
    } else {
        None
    };

    let parameters = if parser.current_token_kind() == syntax.parameters {
        parser.advance();
        parse_names(parser, "parameter name")?
    } else {
        vec![]
    };

    let (body, block) = parse_body(parser)?;
    close_construct(parser, block)?;

    Ok(Node::new(
        NodeKind::Function(FunctionDefinition {
            name,
            parameters,
            body: Rc::new(body),
            auto_return_null: block,
        }),
        Span::new(start, parser.previous_end()),
    ))
}

/// `object [NAME] [with a, b] [from Parent, ...] do ...`
pub fn parse_object_expr(parser: &mut Parser) -> Result<Node, Error> {
    let syntax = parser.syntax();
    let start = parser.advance().span.start.clone();

    let name = if parser.at_name() {
        Some(parser.advance().value.clone())
    } else {
        None
    };

    let parameters = if parser.current_token_kind() == syntax.parameters {
        parser.advance();
        parse_names(parser, "parameter name")?
    } else {
        vec![]
    };

    let mut parents = vec![];
    if parser.current_token_kind() == syntax.parents {
        parser.advance();
        parents.push(parse_attribute_expr(parser)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            parents.push(parse_attribute_expr(parser)?);
        }
    }

    let (body, block) = parse_body(parser)?;
    close_construct(parser, block)?;

    Ok(Node::new(
        NodeKind::Object(ObjectDefinition {
            name,
            parameters,
            parents,
            body: Rc::new(body),
        }),
        Span::new(start, parser.previous_end()),
    ))
}

/// A quoted module path or a bare module name.
pub fn parse_include_target(parser: &mut Parser) -> Result<IncludeTarget, Error> {
    if parser.current_token_kind() == TokenKind::String {
        return Ok(IncludeTarget::Path(parser.advance().value.clone()));
    }

    if parser.at_name() {
        return Ok(IncludeTarget::Name(parser.advance().value.clone()));
    }

    Err(parser.error_here("module path or name", 0))
}

/// `include [NAME from] TARGET [as NICKNAME | dump]`
pub fn parse_include_expr(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();

    let member = if parser.at_name() && parser.peek_kind(1) == TokenKind::From {
        let member = parser.advance().value.clone();
        parser.advance();
        Some(member)
    } else {
        None
    };

    let target = parse_include_target(parser)?;

    let nickname = parse_binding(parser)?;
    let dump_all = nickname.is_none()
        && member.is_none()
        && parser.current_token_kind() == TokenKind::Dump;
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

/// `return [value]`
pub fn parse_return_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser.at_statement_end() {
        None
    } else {
        Some(Box::new(parse_expr(parser)?))
    };

    Ok(Node::new(
        NodeKind::Return(value),
        Span::new(start, parser.previous_end()),
    ))
}

pub fn parse_skip_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let span = parser.advance().span.clone();
    Ok(Node::new(NodeKind::Skip, span))
}

pub fn parse_stop_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let span = parser.advance().span.clone();
    Ok(Node::new(NodeKind::Stop, span))
}
