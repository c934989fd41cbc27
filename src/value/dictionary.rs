use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::errors::errors::TYPE_ERROR;

use super::{
    operations::OperationError,
    value::{Value, ValueKind},
};

/// Hashable projection of a value.
///
/// Keys compare the way `=` does: an integral float hashes like the integer
/// it equals. Functions, classes and objects hash by identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Nothing,
    Boolean(bool),
    Integer(i64),
    Float(u64),
    String(Rc<str>),
    Array(Vec<HashKey>),
    Identity(usize),
}

impl HashKey {
    pub fn from_value(value: &Value) -> Result<HashKey, OperationError> {
        let key = match &value.kind {
            ValueKind::Nothing => HashKey::Nothing,
            ValueKind::Boolean(value) => HashKey::Boolean(*value),
            ValueKind::Integer(value) => HashKey::Integer(*value),
            ValueKind::Float(value) => {
                let integral = value.fract() == 0.0
                    && *value >= i64::MIN as f64
                    && *value < i64::MAX as f64;
                if integral {
                    HashKey::Integer(*value as i64)
                } else {
                    HashKey::Float(value.to_bits())
                }
            }
            ValueKind::String(value) => HashKey::String(Rc::clone(value)),
            ValueKind::Array(elements) => HashKey::Array(
                elements
                    .iter()
                    .map(HashKey::from_value)
                    .collect::<Result<_, _>>()?,
            ),
            ValueKind::Function(function) => HashKey::Identity(Rc::as_ptr(function) as *const () as usize),
            ValueKind::Class(class) => HashKey::Identity(Rc::as_ptr(class) as *const () as usize),
            ValueKind::Object(object) => HashKey::Identity(Rc::as_ptr(object) as *const () as usize),
            ValueKind::BuiltinFunction(builtin) => {
                HashKey::Identity(Rc::as_ptr(builtin) as *const () as usize)
            }
            ValueKind::CharacterList(_) | ValueKind::List(_) | ValueKind::Dictionary(_) => {
                return Err(OperationError::new(
                    TYPE_ERROR,
                    format!("unhashable type: {}", value.type_name()),
                ))
            }
        };

        Ok(key)
    }
}

/// An insertion-ordered map from hashable values to values.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<(Value, Value)>,
    index: FxHashMap<HashKey, usize>,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary::default()
    }

    pub fn from_pairs(pairs: Vec<(Value, Value)>) -> Result<Self, OperationError> {
        let mut dictionary = Dictionary::new();
        for (key, value) in pairs {
            dictionary.insert(key, value)?;
        }
        Ok(dictionary)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Value) -> Result<Option<&Value>, OperationError> {
        let hash_key = HashKey::from_value(key)?;
        Ok(self
            .index
            .get(&hash_key)
            .map(|position| &self.entries[*position].1))
    }

    pub fn contains_key(&self, key: &Value) -> Result<bool, OperationError> {
        Ok(self.get(key)?.is_some())
    }

    /// Inserts or overwrites. An overwritten entry keeps its position.
    pub fn insert(&mut self, key: Value, value: Value) -> Result<(), OperationError> {
        let hash_key = HashKey::from_value(&key)?;
        let value = value.detached();

        match self.index.get(&hash_key) {
            Some(position) => self.entries[*position].1 = value,
            None => {
                self.index.insert(hash_key, self.entries.len());
                self.entries.push((key.detached(), value));
            }
        }
        Ok(())
    }

    pub fn remove(&mut self, key: &Value) -> Result<Option<Value>, OperationError> {
        let hash_key = HashKey::from_value(key)?;
        let Some(position) = self.index.remove(&hash_key) else {
            return Ok(None);
        };

        let (_, value) = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Ok(Some(value))
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> Vec<Value> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.entries.iter().map(|(_, value)| value.clone()).collect()
    }

    /// Same keys mapping to equal values, in any order.
    pub fn equals(&self, other: &Dictionary) -> bool {
        self.len() == other.len()
            && self.entries.iter().all(|(key, value)| {
                matches!(other.get(key), Ok(Some(candidate)) if candidate == value)
            })
    }
}
