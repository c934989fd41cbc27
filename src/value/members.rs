//! Members of builtin values: `5.as_string()`, `items.length` and so on.
//!
//! Tables are built once per value type. Properties are computed on access;
//! methods come back as builtin functions bound to their receiver.

use std::collections::HashMap;

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

use crate::errors::errors::{INDEX_ERROR, TYPE_ERROR};

use super::{
    callable::{BuiltinFunction, NativeMethod},
    operations::{checked_index, float_to_integer, OperationError},
    value::{Value, ValueKind, ValueType},
};

pub enum Member {
    Property(fn(&Value) -> Value),
    Method { arity: usize, function: NativeMethod },
}

type MemberTable = FxHashMap<&'static str, Member>;

lazy_static! {
    static ref MEMBER_TABLES: HashMap<ValueType, MemberTable> = build_tables();
}

fn build_tables() -> HashMap<ValueType, MemberTable> {
    use ValueType::*;

    let mut tables = HashMap::new();
    for value_type in [
        Nothing,
        Boolean,
        Integer,
        Float,
        String,
        CharacterList,
        Array,
        List,
        Dictionary,
        Function,
        Class,
        Object,
    ] {
        let mut table = MemberTable::default();
        table.insert("as_string", Member::Method { arity: 0, function: as_string });
        table.insert("as_bool", Member::Method { arity: 0, function: as_bool });
        table.insert("type", Member::Property(type_property));

        if matches!(value_type, Integer | Float | String) {
            table.insert("as_int", Member::Method { arity: 0, function: as_int });
            table.insert("as_float", Member::Method { arity: 0, function: as_float });
        }

        if matches!(value_type, String | CharacterList | Array | List | Dictionary) {
            table.insert("length", Member::Property(length));
        }

        if matches!(value_type, String | CharacterList | Array | List) {
            table.insert("slice", Member::Method { arity: 2, function: slice });
            table.insert("as_array", Member::Method { arity: 0, function: as_array });
            table.insert("as_list", Member::Method { arity: 0, function: as_list });
        }

        match value_type {
            String => {
                table.insert(
                    "as_character_list",
                    Member::Method { arity: 0, function: as_character_list },
                );
                table.insert("upper", Member::Method { arity: 0, function: upper });
                table.insert("lower", Member::Method { arity: 0, function: lower });
            }
            List => {
                table.insert("insert", Member::Method { arity: 2, function: insert });
                table.insert("remove", Member::Method { arity: 1, function: remove });
            }
            Dictionary => {
                table.insert("keys", Member::Method { arity: 0, function: keys });
                table.insert("values", Member::Method { arity: 0, function: values });
                table.insert("get", Member::Method { arity: 1, function: get });
                table.insert("remove", Member::Method { arity: 1, function: remove });
            }
            _ => {}
        }

        tables.insert(value_type, table);
    }

    tables
}

/// Looks up `name` on a builtin value. Objects only get the members every
/// value has; their own context is searched first.
pub fn lookup_member(receiver: &Value, name: &str) -> Option<Value> {
    let member = MEMBER_TABLES.get(&receiver.get_type())?.get(name)?;

    Some(match member {
        Member::Property(property) => property(receiver),
        Member::Method { arity, function } => Value::new(ValueKind::BuiltinFunction(
            std::rc::Rc::new(BuiltinFunction::method(
                name,
                Some(*arity),
                Some(receiver.detached()),
                *function,
            )),
        )),
    })
}

fn unsupported(receiver: &Value, name: &str) -> OperationError {
    OperationError::new(
        TYPE_ERROR,
        format!("{} has no member '{}'", receiver.type_name(), name),
    )
}

fn type_property(receiver: &Value) -> Value {
    Value::string(receiver.type_name())
}

fn length(receiver: &Value) -> Value {
    let length = match &receiver.kind {
        ValueKind::String(text) => text.chars().count(),
        ValueKind::CharacterList(buffer) => buffer.borrow().len(),
        ValueKind::Array(elements) => elements.len(),
        ValueKind::List(elements) => elements.borrow().len(),
        ValueKind::Dictionary(dictionary) => dictionary.borrow().len(),
        _ => 0,
    };
    Value::integer(length as i64)
}

fn as_string(receiver: &Value, _: &[Value]) -> Result<Value, OperationError> {
    Ok(Value::string(receiver.to_string()))
}

fn as_bool(receiver: &Value, _: &[Value]) -> Result<Value, OperationError> {
    Ok(Value::boolean(receiver.is_true()))
}

fn as_int(receiver: &Value, _: &[Value]) -> Result<Value, OperationError> {
    match &receiver.kind {
        ValueKind::Integer(value) => Ok(Value::integer(*value)),
        ValueKind::Float(value) => float_to_integer(*value),
        ValueKind::String(text) => text.trim().parse::<i64>().map(Value::integer).map_err(|_| {
            OperationError::new(TYPE_ERROR, format!("cannot convert {:?} to an integer", text))
        }),
        _ => Err(unsupported(receiver, "as_int")),
    }
}

fn as_float(receiver: &Value, _: &[Value]) -> Result<Value, OperationError> {
    match &receiver.kind {
        ValueKind::Integer(value) => Ok(Value::float(*value as f64)),
        ValueKind::Float(value) => Ok(Value::float(*value)),
        ValueKind::String(text) => text.trim().parse::<f64>().map(Value::float).map_err(|_| {
            OperationError::new(TYPE_ERROR, format!("cannot convert {:?} to a float", text))
        }),
        _ => Err(unsupported(receiver, "as_float")),
    }
}

/// Elements of a sequence, with characters as one-character strings.
fn elements(receiver: &Value) -> Option<Vec<Value>> {
    match &receiver.kind {
        ValueKind::String(text) => Some(text.chars().map(|c| Value::string(c.to_string())).collect()),
        ValueKind::CharacterList(buffer) => Some(
            buffer
                .borrow()
                .iter()
                .map(|c| Value::string(c.to_string()))
                .collect(),
        ),
        ValueKind::Array(elements) => Some(elements.to_vec()),
        ValueKind::List(elements) => Some(elements.borrow().clone()),
        _ => None,
    }
}

fn bound(value: &Value, what: &str) -> Result<i64, OperationError> {
    match value.kind {
        ValueKind::Integer(value) => Ok(value),
        _ => Err(OperationError::new(
            TYPE_ERROR,
            format!("slice {} must be an integer, not {}", what, value.type_name()),
        )),
    }
}

fn slice(receiver: &Value, arguments: &[Value]) -> Result<Value, OperationError> {
    let start = bound(&arguments[0], "start")?;
    let end = bound(&arguments[1], "end")?;
    let items = elements(receiver).ok_or_else(|| unsupported(receiver, "slice"))?;

    if start < 0 || end < start || end as usize > items.len() {
        return Err(OperationError::new(
            INDEX_ERROR,
            format!(
                "slice {}..{} is out of range for length {}",
                start,
                end,
                items.len()
            ),
        ));
    }
    let (start, end) = (start as usize, end as usize);

    Ok(match &receiver.kind {
        ValueKind::String(text) => {
            Value::string(text.chars().skip(start).take(end - start).collect::<String>())
        }
        ValueKind::CharacterList(buffer) => Value::character_list(buffer.borrow()[start..end].to_vec()),
        ValueKind::Array(_) => Value::array(items[start..end].to_vec()),
        _ => Value::list(items[start..end].to_vec()),
    })
}

fn as_array(receiver: &Value, _: &[Value]) -> Result<Value, OperationError> {
    elements(receiver)
        .map(Value::array)
        .ok_or_else(|| unsupported(receiver, "as_array"))
}

fn as_list(receiver: &Value, _: &[Value]) -> Result<Value, OperationError> {
    elements(receiver)
        .map(Value::list)
        .ok_or_else(|| unsupported(receiver, "as_list"))
}

fn as_character_list(receiver: &Value, _: &[Value]) -> Result<Value, OperationError> {
    match &receiver.kind {
        ValueKind::String(text) => Ok(Value::character_list(text.chars().collect())),
        _ => Err(unsupported(receiver, "as_character_list")),
    }
}

fn upper(receiver: &Value, _: &[Value]) -> Result<Value, OperationError> {
    match &receiver.kind {
        ValueKind::String(text) => Ok(Value::string(text.to_uppercase())),
        _ => Err(unsupported(receiver, "upper")),
    }
}

fn lower(receiver: &Value, _: &[Value]) -> Result<Value, OperationError> {
    match &receiver.kind {
        ValueKind::String(text) => Ok(Value::string(text.to_lowercase())),
        _ => Err(unsupported(receiver, "lower")),
    }
}

fn insert(receiver: &Value, arguments: &[Value]) -> Result<Value, OperationError> {
    let ValueKind::List(elements) = &receiver.kind else {
        return Err(unsupported(receiver, "insert"));
    };

    let length = elements.borrow().len();
    // Inserting at the very end is allowed.
    let position = checked_index(&arguments[0], length + 1)?;
    elements
        .borrow_mut()
        .insert(position, arguments[1].detached());
    Ok(Value::nothing())
}

fn remove(receiver: &Value, arguments: &[Value]) -> Result<Value, OperationError> {
    receiver.subbed_by(&arguments[0])
}

fn keys(receiver: &Value, _: &[Value]) -> Result<Value, OperationError> {
    match &receiver.kind {
        ValueKind::Dictionary(dictionary) => Ok(Value::list(dictionary.borrow().keys())),
        _ => Err(unsupported(receiver, "keys")),
    }
}

fn values(receiver: &Value, _: &[Value]) -> Result<Value, OperationError> {
    match &receiver.kind {
        ValueKind::Dictionary(dictionary) => Ok(Value::list(dictionary.borrow().values())),
        _ => Err(unsupported(receiver, "values")),
    }
}

fn get(receiver: &Value, arguments: &[Value]) -> Result<Value, OperationError> {
    match &receiver.kind {
        ValueKind::Dictionary(dictionary) => Ok(dictionary
            .borrow()
            .get(&arguments[0])?
            .cloned()
            .unwrap_or_else(Value::nothing)),
        _ => Err(unsupported(receiver, "get")),
    }
}
