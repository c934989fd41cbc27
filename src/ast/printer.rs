//! Renders a tree back to verbose source.
//!
//! Binary and unary operations are fully parenthesized, so printing a parsed
//! program and parsing the output again yields a structurally equal tree.

use std::fmt::{self, Display};

use super::{
    ast::{Node, NodeKind},
    statements::{IncludeStmt, IncludeTarget},
};

const INDENT: &str = "    ";

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer::default();
        match &self.kind {
            NodeKind::Statements(statements) => {
                for (index, statement) in statements.iter().enumerate() {
                    if index > 0 {
                        printer.out.push('\n');
                    }
                    printer.node(statement);
                }
            }
            _ => printer.node(self),
        }
        f.write_str(&printer.out)
    }
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn list(&mut self, nodes: &[Node]) {
        for (index, node) in nodes.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.node(node);
        }
    }

    fn names(&mut self, names: &[String]) {
        self.push(&names.join(", "));
    }

    /// Prints `do` and the body. Block bodies are indented one level and
    /// leave the cursor after their last statement.
    fn body(&mut self, body: &Node) {
        self.push("do");
        match &body.kind {
            NodeKind::Statements(statements) => {
                self.depth += 1;
                for statement in statements {
                    self.newline();
                    self.node(statement);
                }
                self.depth -= 1;
                self.newline();
            }
            _ => {
                self.push(" ");
                self.node(body);
            }
        }
    }

    /// Closes a construct whose bodies were printed by `body`.
    fn close(&mut self, block: bool) {
        if block {
            self.push("end");
        }
    }

    /// Single-line bodies need a separating space before the next keyword.
    fn separate(&mut self, block: bool) {
        if !block {
            self.push(" ");
        }
    }

    /// Operands of `.` and calls are wrapped when they are not atoms.
    fn operand(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Integer(_)
            | NodeKind::Float(_)
            | NodeKind::String(_)
            | NodeKind::CharacterList(_)
            | NodeKind::Array(_)
            | NodeKind::List(_)
            | NodeKind::Dictionary(_)
            | NodeKind::VariableAccess(_)
            | NodeKind::Binary(_)
            | NodeKind::Unary(_)
            | NodeKind::Call(_) => self.node(node),
            _ => {
                self.push("(");
                self.node(node);
                self.push(")");
            }
        }
    }

    fn node(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Integer(value) => self.push(&value.to_string()),
            NodeKind::Float(value) => self.push(&format_float(*value)),
            NodeKind::String(value) => self.push(&quote(value, '"')),
            NodeKind::CharacterList(value) => self.push(&quote(value, '\'')),

            NodeKind::Array(elements) => {
                self.push("(");
                self.list(elements);
                if elements.len() == 1 {
                    self.push(",");
                }
                self.push(")");
            }
            NodeKind::List(elements) => {
                self.push("[");
                self.list(elements);
                self.push("]");
            }
            NodeKind::Dictionary(pairs) => {
                self.push("{");
                for (index, (key, value)) in pairs.iter().enumerate() {
                    if index > 0 {
                        self.push(", ");
                    }
                    self.node(key);
                    self.push(": ");
                    self.node(value);
                }
                self.push("}");
            }

            NodeKind::VariableAccess(access) => {
                if access.is_global {
                    self.push("global ");
                }
                self.push(&access.name);
            }
            NodeKind::VariableAssign(assign) => {
                if assign.is_global {
                    self.push("global ");
                }
                self.push(&assign.target.join("."));
                self.push(" ");
                self.push(&assign.operator.symbol());
                self.push(" ");
                self.node(&assign.value);
            }
            NodeKind::Binary(binary) => {
                self.push("(");
                self.node(&binary.left);
                self.push(" ");
                self.push(binary.operator.symbol());
                self.push(" ");
                self.node(&binary.right);
                self.push(")");
            }
            NodeKind::Unary(unary) => {
                self.push("(");
                self.push(unary.operator.symbol());
                if unary.operator.symbol().len() > 1 {
                    self.push(" ");
                }
                self.node(&unary.operand);
                self.push(")");
            }
            NodeKind::Attribute(attribute) => {
                self.operand(&attribute.object);
                self.push(".");
                self.node(&attribute.member);
            }
            NodeKind::Call(call) => {
                self.operand(&call.callee);
                self.push("(");
                self.list(&call.arguments);
                self.push(")");
            }

            NodeKind::If(if_expr) => {
                let block = if_expr.discard_results;
                for (index, (condition, body)) in if_expr.cases.iter().enumerate() {
                    if index > 0 {
                        self.separate(block);
                        self.push("else ");
                    }
                    self.push("if ");
                    self.node(condition);
                    self.push(" ");
                    self.body(body);
                }
                if let Some(else_case) = &if_expr.else_case {
                    self.separate(block);
                    self.push("else ");
                    self.body(else_case);
                }
                self.close(block);
            }
            NodeKind::Count(count) => {
                self.push("count ");
                if let Some(start) = &count.start {
                    self.push("from ");
                    self.node(start);
                    self.push(" ");
                }
                self.push("to ");
                self.node(&count.end);
                self.push(" ");
                if let Some(step) = &count.step {
                    self.push("step ");
                    self.node(step);
                    self.push(" ");
                }
                if let Some(variable) = &count.variable {
                    self.push("as ");
                    self.push(variable);
                    self.push(" ");
                }
                self.body(&count.body);
                self.close(count.discard_results);
            }
            NodeKind::While(while_expr) => {
                self.push("while ");
                self.node(&while_expr.condition);
                self.push(" ");
                self.body(&while_expr.body);
                self.close(while_expr.discard_results);
            }
            NodeKind::Try(try_expr) => {
                let block = try_expr.discard_results;
                self.push("try ");
                self.body(&try_expr.body);
                for handler in &try_expr.handlers {
                    self.separate(block);
                    self.push("error ");
                    if let Some(tag) = &handler.tag {
                        self.node(tag);
                        self.push(" ");
                    }
                    if let Some(variable) = &handler.variable {
                        self.push("as ");
                        self.push(variable);
                        self.push(" ");
                    }
                    self.body(&handler.body);
                }
                self.close(block);
            }
            NodeKind::Function(function) => {
                self.push("function ");
                if let Some(name) = &function.name {
                    self.push(name);
                    self.push(" ");
                }
                if !function.parameters.is_empty() {
                    self.push("with ");
                    self.names(&function.parameters);
                    self.push(" ");
                }
                self.body(&function.body);
                self.close(function.body.is_block());
            }
            NodeKind::Object(object) => {
                self.push("object ");
                if let Some(name) = &object.name {
                    self.push(name);
                    self.push(" ");
                }
                if !object.parameters.is_empty() {
                    self.push("with ");
                    self.names(&object.parameters);
                    self.push(" ");
                }
                if !object.parents.is_empty() {
                    self.push("from ");
                    self.list(&object.parents);
                    self.push(" ");
                }
                self.body(&object.body);
                self.close(object.body.is_block());
            }
            NodeKind::Include(include) => self.include(include),

            NodeKind::Return(value) => {
                self.push("return");
                if let Some(value) = value {
                    self.push(" ");
                    self.node(value);
                }
            }
            NodeKind::Skip => self.push("skip"),
            NodeKind::Stop => self.push("stop"),

            NodeKind::Statements(statements) => {
                // Only reachable for nested statement lists; keep them on
                // separate lines at the current depth.
                for (index, statement) in statements.iter().enumerate() {
                    if index > 0 {
                        self.newline();
                    }
                    self.node(statement);
                }
            }
        }
    }

    fn include(&mut self, include: &IncludeStmt) {
        self.push("include ");
        if let Some(member) = &include.member {
            self.push(member);
            self.push(" from ");
        }
        match &include.target {
            IncludeTarget::Path(path) => self.push(&quote(path, '"')),
            IncludeTarget::Name(name) => self.push(name),
        }
        if let Some(nickname) = &include.nickname {
            self.push(" as ");
            self.push(nickname);
        } else if include.dump_all {
            self.push(" dump");
        }
    }
}

/// Floats always print with a decimal point so they lex back as floats.
pub fn format_float(value: f64) -> String {
    let text = format!("{}", value);
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        format!("{}.0", text)
    }
}

fn quote(value: &str, delimiter: char) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push(delimiter);
    for character in value.chars() {
        match character {
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            '\u{8}' => quoted.push_str("\\b"),
            '\u{c}' => quoted.push_str("\\f"),
            '\u{b}' => quoted.push_str("\\v"),
            '\0' => quoted.push_str("\\0"),
            c if c == delimiter => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xFFFF {
                    quoted.push_str(&format!("\\u{:04x}", code));
                } else {
                    quoted.push_str(&format!("\\U{:06x}", code));
                }
            }
            c => quoted.push(c),
        }
    }
    quoted.push(delimiter);
    quoted
}
