use super::ast::Node;

// OPERATORS

/// Binary operators, in the order of the operation contract they dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,

    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,

    And,
    Or,

    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    LeftShift,
    RightShift,

    In,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Power => "^",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "!",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessOrEqual => "<=",
            BinaryOperator::GreaterOrEqual => ">=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseXor => "\\",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
            BinaryOperator::In => "in",
        }
    }

    /// Name of the object member that overloads this operator.
    pub fn special_method(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "added_to",
            BinaryOperator::Subtract => "subbed_by",
            BinaryOperator::Multiply => "multiplied_by",
            BinaryOperator::Divide => "divided_by",
            BinaryOperator::Modulo => "modulo_by",
            BinaryOperator::Power => "powered_by",
            BinaryOperator::Equal => "compare_equal",
            BinaryOperator::NotEqual => "compare_not_equal",
            BinaryOperator::LessThan => "compare_less_than",
            BinaryOperator::GreaterThan => "compare_greater_than",
            BinaryOperator::LessOrEqual => "compare_less_than_equal",
            BinaryOperator::GreaterOrEqual => "compare_greater_than_equal",
            BinaryOperator::And => "compare_and",
            BinaryOperator::Or => "compare_or",
            BinaryOperator::BitwiseOr => "bitwise_or",
            BinaryOperator::BitwiseXor => "bitwise_xor",
            BinaryOperator::BitwiseAnd => "bitwise_and",
            BinaryOperator::LeftShift => "bitwise_left_shift",
            BinaryOperator::RightShift => "bitwise_right_shift",
            BinaryOperator::In => "check_in",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Plus,
    Negate,
    BitwiseNot,
    Invert,
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Negate => "-",
            UnaryOperator::BitwiseNot => "~",
            UnaryOperator::Invert => "invert",
        }
    }
}

/// `:` or one of the compound `:<op>` symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOperator {
    Assign,
    Compound(BinaryOperator),
}

impl AssignOperator {
    pub fn symbol(&self) -> String {
        match self {
            AssignOperator::Assign => String::from(":"),
            AssignOperator::Compound(operator) => format!(":{}", operator.symbol()),
        }
    }
}

// VARIABLES

/// Reads a name, optionally from the global scope.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableAccess {
    pub name: String,
    pub is_global: bool,
}

/// Writes a name or a dotted attribute chain (`a.b.c : value`).
#[derive(Debug, Clone, PartialEq)]
pub struct VariableAssign {
    /// Never empty. More than one element means an attribute chain.
    pub target: Vec<String>,
    pub operator: AssignOperator,
    pub value: Box<Node>,
    pub is_global: bool,
}

// OPERATIONS

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Node>,
    pub operator: BinaryOperator,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: UnaryOperator,
    pub operand: Box<Node>,
}

/// `object.member`, where `member` is a variable access, a call on one, or
/// another attribute access.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeExpr {
    pub object: Box<Node>,
    pub member: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Node>,
    pub arguments: Vec<Node>,
}
