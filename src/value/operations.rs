//! The operator contract shared by every value.
//!
//! Each operation either produces a value or an [`OperationError`] carrying
//! the runtime tag to raise. Anything a value kind does not support is an
//! illegal operation. Special methods on objects are dispatched by the
//! interpreter before these run.

use std::rc::Rc;

use crate::{
    ast::expressions::{BinaryOperator, UnaryOperator},
    errors::errors::{Error, INDEX_ERROR, KEY_ERROR, MATH_ERROR, TYPE_ERROR},
    interpreter::context::Context,
    Span,
};

use super::value::{Value, ValueKind};

#[derive(Debug, Clone, PartialEq)]
pub struct OperationError {
    pub tag: String,
    pub detail: String,
}

impl OperationError {
    pub fn new(tag: impl Into<String>, detail: impl Into<String>) -> Self {
        OperationError {
            tag: tag.into(),
            detail: detail.into(),
        }
    }

    pub fn illegal(left: &Value, symbol: &str, right: &Value) -> Self {
        OperationError::new(
            TYPE_ERROR,
            format!(
                "illegal operation: {} {} {}",
                left.type_name(),
                symbol,
                right.type_name()
            ),
        )
    }

    pub fn illegal_unary(symbol: &str, operand: &Value) -> Self {
        let separator = if symbol.chars().all(char::is_alphabetic) { " " } else { "" };
        OperationError::new(
            TYPE_ERROR,
            format!("illegal operation: {}{}{}", symbol, separator, operand.type_name()),
        )
    }

    /// Raises this error at `span` with the traceback of `context`.
    pub fn at(self, span: &Span, context: &Context) -> Error {
        Error::runtime(self.tag, self.detail, span.clone(), context)
    }
}

type Outcome = Result<Value, OperationError>;

#[derive(Debug, Clone, Copy)]
enum Number {
    Integer(i64),
    Float(f64),
}

fn number(value: &Value) -> Option<Number> {
    match value.kind {
        ValueKind::Integer(value) => Some(Number::Integer(value)),
        ValueKind::Float(value) => Some(Number::Float(value)),
        _ => None,
    }
}

fn as_f64(number: Number) -> f64 {
    match number {
        Number::Integer(value) => value as f64,
        Number::Float(value) => value,
    }
}

fn overflow() -> OperationError {
    OperationError::new(MATH_ERROR, "integer overflow")
}

/// Truncates a float result back into an integer.
pub fn float_to_integer(value: f64) -> Outcome {
    if value.is_nan() {
        return Err(OperationError::new(MATH_ERROR, "result is not a number"));
    }
    if !value.is_finite() || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(overflow());
    }
    Ok(Value::integer(value.trunc() as i64))
}

/// Applies a numeric operation. The result follows the left operand: an
/// integer on the left produces an integer, a float produces a float.
fn arithmetic(
    left: &Value,
    right: &Value,
    symbol: &str,
    integer: fn(i64, i64) -> Option<i64>,
    float: fn(f64, f64) -> f64,
) -> Outcome {
    match (number(left), number(right)) {
        (Some(Number::Integer(a)), Some(Number::Integer(b))) => {
            integer(a, b).map(Value::integer).ok_or_else(overflow)
        }
        (Some(Number::Integer(a)), Some(b)) => float_to_integer(float(a as f64, as_f64(b))),
        (Some(Number::Float(a)), Some(b)) => Ok(Value::float(float(a, as_f64(b)))),
        _ => Err(OperationError::illegal(left, symbol, right)),
    }
}

fn is_zero(value: &Value) -> bool {
    match value.kind {
        ValueKind::Integer(value) => value == 0,
        ValueKind::Float(value) => value == 0.0,
        _ => false,
    }
}

fn characters(value: &Value) -> Option<Vec<char>> {
    match &value.kind {
        ValueKind::String(text) => Some(text.chars().collect()),
        ValueKind::CharacterList(characters) => Some(characters.borrow().clone()),
        _ => None,
    }
}

/// Converts an index operand into a position inside a sequence of `length`.
pub fn checked_index(index: &Value, length: usize) -> Result<usize, OperationError> {
    match index.kind {
        ValueKind::Integer(position) if position >= 0 && (position as usize) < length => {
            Ok(position as usize)
        }
        ValueKind::Integer(position) => Err(OperationError::new(
            INDEX_ERROR,
            format!("index {} is out of range for length {}", position, length),
        )),
        _ => Err(OperationError::new(
            TYPE_ERROR,
            format!("indices must be integers, not {}", index.type_name()),
        )),
    }
}

/// Largest number of elements (or string bytes) a repetition may produce.
const MAX_REPEATED_LENGTH: usize = 1 << 28;

/// How many times `left`, holding `length` items, is repeated by `* count`.
fn repeat_count(count: &Value, left: &Value, length: usize) -> Result<usize, OperationError> {
    let count = match count.kind {
        ValueKind::Integer(count) => count as f64,
        ValueKind::Float(count) => count,
        _ => return Err(OperationError::illegal(left, "*", count)),
    };

    if count < 0.0 || !count.is_finite() {
        return Err(OperationError::new(
            MATH_ERROR,
            "cannot repeat a negative number of times",
        ));
    }

    if length == 0 {
        return Ok(0);
    }
    let count = count as usize;
    match length.checked_mul(count) {
        Some(total) if total <= MAX_REPEATED_LENGTH => Ok(count),
        _ => Err(OperationError::new(MATH_ERROR, "repeated sequence is too large")),
    }
}

/// How many leading elements survive `/ divisor`.
fn kept_length(length: usize, divisor: &Value, left: &Value) -> Result<usize, OperationError> {
    let divisor = match divisor.kind {
        ValueKind::Integer(divisor) => divisor as f64,
        ValueKind::Float(divisor) => divisor,
        _ => return Err(OperationError::illegal(left, "/", divisor)),
    };

    if divisor == 0.0 {
        return Err(OperationError::new(MATH_ERROR, "division by zero"));
    }
    if divisor < 0.0 {
        return Err(OperationError::new(
            MATH_ERROR,
            "cannot divide a sequence by a negative number",
        ));
    }
    Ok(((length as f64 / divisor) as usize).min(length))
}

fn repeated<T: Clone>(items: &[T], count: usize) -> Vec<T> {
    let mut result = Vec::with_capacity(items.len() * count);
    for _ in 0..count {
        result.extend_from_slice(items);
    }
    result
}

/// Structural equality. Numbers compare across kinds; functions, classes
/// and objects compare by identity; anything else of differing kinds is
/// unequal.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    if let (Some(a), Some(b)) = (number(left), number(right)) {
        return match (a, b) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            _ => as_f64(a) == as_f64(b),
        };
    }

    match (&left.kind, &right.kind) {
        (ValueKind::Nothing, ValueKind::Nothing) => true,
        (ValueKind::Boolean(a), ValueKind::Boolean(b)) => a == b,
        (ValueKind::String(a), ValueKind::String(b)) => a == b,
        (ValueKind::CharacterList(a), ValueKind::CharacterList(b)) => {
            Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
        }
        (ValueKind::Array(a), ValueKind::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
        }
        (ValueKind::List(a), ValueKind::List(b)) => {
            Rc::ptr_eq(a, b) || {
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
            }
        }
        (ValueKind::Dictionary(a), ValueKind::Dictionary(b)) => {
            Rc::ptr_eq(a, b) || a.borrow().equals(&b.borrow())
        }
        (ValueKind::Function(a), ValueKind::Function(b)) => Rc::ptr_eq(a, b),
        (ValueKind::Class(a), ValueKind::Class(b)) => Rc::ptr_eq(a, b),
        (ValueKind::Object(a), ValueKind::Object(b)) => Rc::ptr_eq(a, b),
        (ValueKind::BuiltinFunction(a), ValueKind::BuiltinFunction(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

impl Value {
    /// Applies a binary operator. `in` takes the container on the right.
    pub fn binary(&self, operator: BinaryOperator, other: &Value) -> Outcome {
        match operator {
            BinaryOperator::Add => self.added_to(other),
            BinaryOperator::Subtract => self.subbed_by(other),
            BinaryOperator::Multiply => self.multiplied_by(other),
            BinaryOperator::Divide => self.divided_by(other),
            BinaryOperator::Modulo => self.modulo_by(other),
            BinaryOperator::Power => self.powered_by(other),
            BinaryOperator::Equal => Ok(Value::boolean(values_equal(self, other))),
            BinaryOperator::NotEqual => Ok(Value::boolean(!values_equal(self, other))),
            BinaryOperator::LessThan => self.less_than(other),
            BinaryOperator::GreaterThan => self.greater_than(other),
            BinaryOperator::LessOrEqual => self.less_or_equal(other),
            BinaryOperator::GreaterOrEqual => self.greater_or_equal(other),
            BinaryOperator::And => Ok(Value::boolean(self.is_true() && other.is_true())),
            BinaryOperator::Or => Ok(Value::boolean(self.is_true() || other.is_true())),
            BinaryOperator::BitwiseOr => self.bitwise(other, "|", |a, b| Some(a | b)),
            BinaryOperator::BitwiseXor => self.bitwise(other, "\\", |a, b| Some(a ^ b)),
            BinaryOperator::BitwiseAnd => self.bitwise(other, "&", |a, b| Some(a & b)),
            BinaryOperator::LeftShift => self.shift(other, "<<", i64::checked_shl),
            BinaryOperator::RightShift => self.shift(other, ">>", i64::checked_shr),
            BinaryOperator::In => other.check_in(self),
        }
    }

    pub fn unary(&self, operator: UnaryOperator) -> Outcome {
        match (operator, &self.kind) {
            (UnaryOperator::Plus, ValueKind::Integer(_) | ValueKind::Float(_)) => Ok(self.detached()),
            (UnaryOperator::Negate, ValueKind::Integer(value)) => {
                value.checked_neg().map(Value::integer).ok_or_else(overflow)
            }
            (UnaryOperator::Negate, ValueKind::Float(value)) => Ok(Value::float(-value)),
            (UnaryOperator::BitwiseNot, ValueKind::Integer(value)) => Ok(Value::integer(!value)),
            (UnaryOperator::Invert, _) => Ok(Value::boolean(!self.is_true())),
            _ => Err(OperationError::illegal_unary(operator.symbol(), self)),
        }
    }

    /// `+`: numeric addition, string concatenation, array concatenation,
    /// or an in-place append/merge on mutable containers that yields Nothing.
    pub fn added_to(&self, other: &Value) -> Outcome {
        match (&self.kind, &other.kind) {
            (ValueKind::String(text), _) => match characters(other) {
                Some(extra) => {
                    let mut text = text.to_string();
                    text.extend(extra);
                    Ok(Value::string(text))
                }
                None => Err(OperationError::illegal(self, "+", other)),
            },
            (ValueKind::CharacterList(buffer), _) => match characters(other) {
                Some(extra) => {
                    buffer.borrow_mut().extend(extra);
                    Ok(Value::nothing())
                }
                None => Err(OperationError::illegal(self, "+", other)),
            },
            (ValueKind::Array(elements), ValueKind::Array(extra)) => {
                let mut elements = elements.to_vec();
                elements.extend(extra.iter().cloned());
                Ok(Value::array(elements))
            }
            (ValueKind::List(elements), _) => {
                elements.borrow_mut().push(other.detached());
                Ok(Value::nothing())
            }
            (ValueKind::Dictionary(dictionary), ValueKind::Dictionary(extra)) => {
                let entries: Vec<(Value, Value)> = extra.borrow().iter().cloned().collect();
                let mut dictionary = dictionary.borrow_mut();
                for (key, value) in entries {
                    dictionary.insert(key, value)?;
                }
                Ok(Value::nothing())
            }
            _ => arithmetic(self, other, "+", i64::checked_add, |a, b| a + b),
        }
    }

    /// `-`: numeric subtraction, or removal from a list, character list or
    /// dictionary that returns the removed element.
    pub fn subbed_by(&self, other: &Value) -> Outcome {
        match &self.kind {
            ValueKind::List(elements) => {
                let position = checked_index(other, elements.borrow().len())?;
                Ok(elements.borrow_mut().remove(position))
            }
            ValueKind::CharacterList(buffer) => {
                let position = checked_index(other, buffer.borrow().len())?;
                let character = buffer.borrow_mut().remove(position);
                Ok(Value::string(character.to_string()))
            }
            ValueKind::Dictionary(dictionary) => {
                let removed = dictionary.borrow_mut().remove(other)?;
                removed.ok_or_else(|| {
                    OperationError::new(KEY_ERROR, format!("key {} not found", other.repr()))
                })
            }
            _ => arithmetic(self, other, "-", i64::checked_sub, |a, b| a - b),
        }
    }

    /// `*`: numeric multiplication or repetition of a sequence.
    pub fn multiplied_by(&self, other: &Value) -> Outcome {
        match &self.kind {
            ValueKind::String(text) => {
                let count = repeat_count(other, self, text.len())?;
                Ok(Value::string(text.repeat(count)))
            }
            ValueKind::CharacterList(buffer) => {
                let buffer = buffer.borrow();
                let count = repeat_count(other, self, buffer.len())?;
                Ok(Value::character_list(repeated(&buffer, count)))
            }
            ValueKind::Array(elements) => {
                let count = repeat_count(other, self, elements.len())?;
                Ok(Value::array(repeated(elements, count)))
            }
            ValueKind::List(elements) => {
                let elements = elements.borrow();
                let count = repeat_count(other, self, elements.len())?;
                Ok(Value::list(repeated(&elements, count)))
            }
            _ => arithmetic(self, other, "*", i64::checked_mul, |a, b| a * b),
        }
    }

    /// `/`: numeric division, or keeping the leading `length / n` elements
    /// of a sequence.
    pub fn divided_by(&self, other: &Value) -> Outcome {
        match &self.kind {
            ValueKind::String(text) => {
                let kept = kept_length(text.chars().count(), other, self)?;
                Ok(Value::string(text.chars().take(kept).collect::<String>()))
            }
            ValueKind::CharacterList(buffer) => {
                let buffer = buffer.borrow();
                let kept = kept_length(buffer.len(), other, self)?;
                Ok(Value::character_list(buffer[..kept].to_vec()))
            }
            ValueKind::Array(elements) => {
                let kept = kept_length(elements.len(), other, self)?;
                Ok(Value::array(elements[..kept].to_vec()))
            }
            ValueKind::List(elements) => {
                let elements = elements.borrow();
                let kept = kept_length(elements.len(), other, self)?;
                Ok(Value::list(elements[..kept].to_vec()))
            }
            ValueKind::Integer(_) | ValueKind::Float(_) if is_zero(other) => {
                Err(OperationError::new(MATH_ERROR, "division by zero"))
            }
            _ => arithmetic(self, other, "/", i64::checked_div, |a, b| a / b),
        }
    }

    pub fn modulo_by(&self, other: &Value) -> Outcome {
        if number(self).is_some() && is_zero(other) {
            return Err(OperationError::new(MATH_ERROR, "modulo by zero"));
        }
        arithmetic(self, other, "%", i64::checked_rem, |a, b| a % b)
    }

    pub fn powered_by(&self, other: &Value) -> Outcome {
        arithmetic(
            self,
            other,
            "^",
            |base, exponent| {
                if exponent >= 0 {
                    u32::try_from(exponent)
                        .ok()
                        .and_then(|exponent| base.checked_pow(exponent))
                } else {
                    float_to_integer((base as f64).powf(exponent as f64))
                        .ok()
                        .and_then(|value| match value.kind {
                            ValueKind::Integer(value) => Some(value),
                            _ => None,
                        })
                }
            },
            f64::powf,
        )
    }

    fn compare(
        &self,
        other: &Value,
        symbol: &str,
        integer: fn(&i64, &i64) -> bool,
        float: fn(&f64, &f64) -> bool,
        text: fn(&str, &str) -> bool,
    ) -> Outcome {
        if let (Some(a), Some(b)) = (number(self), number(other)) {
            let result = match (a, b) {
                (Number::Integer(a), Number::Integer(b)) => integer(&a, &b),
                _ => float(&as_f64(a), &as_f64(b)),
            };
            return Ok(Value::boolean(result));
        }

        match (&self.kind, &other.kind) {
            (ValueKind::String(a), ValueKind::String(b)) => Ok(Value::boolean(text(a, b))),
            _ => Err(OperationError::illegal(self, symbol, other)),
        }
    }

    pub fn less_than(&self, other: &Value) -> Outcome {
        self.compare(other, "<", i64::lt, f64::lt, |a, b| a < b)
    }

    pub fn greater_than(&self, other: &Value) -> Outcome {
        self.compare(other, ">", i64::gt, f64::gt, |a, b| a > b)
    }

    pub fn greater_or_equal(&self, other: &Value) -> Outcome {
        self.compare(other, ">=", i64::ge, f64::ge, |a, b| a >= b)
    }

    /// `<=` compares numbers, and strings with strings, but indexes
    /// containers.
    pub fn less_or_equal(&self, other: &Value) -> Outcome {
        match (&self.kind, &other.kind) {
            (ValueKind::String(_), ValueKind::String(_)) => {
                self.compare(other, "<=", i64::le, f64::le, |a, b| a <= b)
            }
            (ValueKind::String(text), _) => {
                let position = checked_index(other, text.chars().count())?;
                let character = text.chars().nth(position).unwrap_or_default();
                Ok(Value::string(character.to_string()))
            }
            (ValueKind::CharacterList(buffer), _) => {
                let buffer = buffer.borrow();
                let position = checked_index(other, buffer.len())?;
                Ok(Value::string(buffer[position].to_string()))
            }
            (ValueKind::Array(elements), _) => {
                let position = checked_index(other, elements.len())?;
                Ok(elements[position].clone())
            }
            (ValueKind::List(elements), _) => {
                let elements = elements.borrow();
                let position = checked_index(other, elements.len())?;
                Ok(elements[position].clone())
            }
            (ValueKind::Dictionary(dictionary), _) => match dictionary.borrow().get(other)? {
                Some(value) => Ok(value.clone()),
                None => Err(OperationError::new(
                    KEY_ERROR,
                    format!("key {} not found", other.repr()),
                )),
            },
            _ => self.compare(other, "<=", i64::le, f64::le, |a, b| a <= b),
        }
    }

    /// Membership with `self` as the container.
    pub fn check_in(&self, element: &Value) -> Outcome {
        let found = match &self.kind {
            ValueKind::Array(elements) => elements.iter().any(|item| values_equal(item, element)),
            ValueKind::List(elements) => elements
                .borrow()
                .iter()
                .any(|item| values_equal(item, element)),
            ValueKind::Dictionary(dictionary) => dictionary.borrow().contains_key(element)?,
            ValueKind::String(_) | ValueKind::CharacterList(_) => {
                match (characters(self), characters(element)) {
                    (Some(haystack), Some(needle)) => {
                        let haystack: String = haystack.into_iter().collect();
                        let needle: String = needle.into_iter().collect();
                        haystack.contains(&needle)
                    }
                    _ => return Err(OperationError::illegal(element, "in", self)),
                }
            }
            _ => return Err(OperationError::illegal(element, "in", self)),
        };

        Ok(Value::boolean(found))
    }

    fn bitwise(&self, other: &Value, symbol: &str, operation: fn(i64, i64) -> Option<i64>) -> Outcome {
        match (&self.kind, &other.kind) {
            (ValueKind::Integer(a), ValueKind::Integer(b)) => {
                operation(*a, *b).map(Value::integer).ok_or_else(overflow)
            }
            _ => Err(OperationError::illegal(self, symbol, other)),
        }
    }

    fn shift(&self, other: &Value, symbol: &str, operation: fn(i64, u32) -> Option<i64>) -> Outcome {
        match (&self.kind, &other.kind) {
            (ValueKind::Integer(a), ValueKind::Integer(b)) => u32::try_from(*b)
                .ok()
                .and_then(|amount| operation(*a, amount))
                .map(Value::integer)
                .ok_or_else(|| OperationError::new(MATH_ERROR, "shift amount out of range")),
            _ => Err(OperationError::illegal(self, symbol, other)),
        }
    }
}
