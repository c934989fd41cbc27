use std::{cell::RefCell, fmt, rc::Rc};

use crate::{ast::printer::format_float, interpreter::context::Context, Span};

use super::{
    callable::{BuiltinFunction, Class, Function, NativeMethod, Object},
    dictionary::Dictionary,
    operations::values_equal,
};

/// Type tag of a value, used for member tables and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
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
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Nothing => "nothing",
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::CharacterList => "character-list",
            ValueType::Array => "array",
            ValueType::List => "list",
            ValueType::Dictionary => "dictionary",
            ValueType::Function => "function",
            ValueType::Class => "object-definition",
            ValueType::Object => "object",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ValueKind {
    Nothing,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(Rc<str>),
    CharacterList(Rc<RefCell<Vec<char>>>),
    Array(Rc<Vec<Value>>),
    List(Rc<RefCell<Vec<Value>>>),
    Dictionary(Rc<RefCell<Dictionary>>),
    Function(Rc<Function>),
    Class(Rc<Class>),
    Object(Rc<Object>),
    BuiltinFunction(Rc<BuiltinFunction>),
}

/// A runtime value.
///
/// Besides its payload a value remembers where it was produced and the
/// context it was accessed from. Both are stamped while a value is in flight
/// and dropped when it is stored, so symbol tables never own contexts.
#[derive(Debug, Clone)]
pub struct Value {
    pub kind: ValueKind,
    pub span: Option<Span>,
    pub context: Option<Context>,
}

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Value {
            kind,
            span: None,
            context: None,
        }
    }

    pub fn nothing() -> Self {
        Value::new(ValueKind::Nothing)
    }

    pub fn boolean(value: bool) -> Self {
        Value::new(ValueKind::Boolean(value))
    }

    pub fn integer(value: i64) -> Self {
        Value::new(ValueKind::Integer(value))
    }

    pub fn float(value: f64) -> Self {
        Value::new(ValueKind::Float(value))
    }

    pub fn string(value: impl AsRef<str>) -> Self {
        Value::new(ValueKind::String(Rc::from(value.as_ref())))
    }

    pub fn character_list(characters: Vec<char>) -> Self {
        Value::new(ValueKind::CharacterList(Rc::new(RefCell::new(characters))))
    }

    pub fn array(elements: Vec<Value>) -> Self {
        Value::new(ValueKind::Array(Rc::new(elements)))
    }

    pub fn list(elements: Vec<Value>) -> Self {
        Value::new(ValueKind::List(Rc::new(RefCell::new(elements))))
    }

    pub fn dictionary(dictionary: Dictionary) -> Self {
        Value::new(ValueKind::Dictionary(Rc::new(RefCell::new(dictionary))))
    }

    /// A free native function, as handed out by native extensions.
    pub fn native_function(name: &str, arity: Option<usize>, function: NativeMethod) -> Self {
        Value::new(ValueKind::BuiltinFunction(Rc::new(BuiltinFunction::method(
            name, arity, None, function,
        ))))
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_context(mut self, context: &Context) -> Self {
        self.context = Some(context.clone());
        self
    }

    /// The same value without its position and context stamps.
    pub fn detached(&self) -> Value {
        Value::new(self.kind.clone())
    }

    pub fn get_type(&self) -> ValueType {
        match &self.kind {
            ValueKind::Nothing => ValueType::Nothing,
            ValueKind::Boolean(_) => ValueType::Boolean,
            ValueKind::Integer(_) => ValueType::Integer,
            ValueKind::Float(_) => ValueType::Float,
            ValueKind::String(_) => ValueType::String,
            ValueKind::CharacterList(_) => ValueType::CharacterList,
            ValueKind::Array(_) => ValueType::Array,
            ValueKind::List(_) => ValueType::List,
            ValueKind::Dictionary(_) => ValueType::Dictionary,
            ValueKind::Function(_) | ValueKind::BuiltinFunction(_) => ValueType::Function,
            ValueKind::Class(_) => ValueType::Class,
            ValueKind::Object(_) => ValueType::Object,
        }
    }

    /// Name reported by `type` and `type_of`. Objects report their class.
    pub fn type_name(&self) -> String {
        match &self.kind {
            ValueKind::Object(object) => object.class.name.clone(),
            _ => String::from(self.get_type().name()),
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self.kind, ValueKind::Nothing)
    }

    /// Containers whose `+` mutates in place.
    pub fn is_mutable_container(&self) -> bool {
        matches!(
            self.kind,
            ValueKind::CharacterList(_) | ValueKind::List(_) | ValueKind::Dictionary(_)
        )
    }

    /// Truthiness used by conditions and the boolean operators.
    pub fn is_true(&self) -> bool {
        match &self.kind {
            ValueKind::Nothing => false,
            ValueKind::Boolean(value) => *value,
            ValueKind::Integer(value) => *value != 0,
            ValueKind::Float(value) => *value != 0.0,
            ValueKind::String(value) => !value.is_empty(),
            ValueKind::CharacterList(value) => !value.borrow().is_empty(),
            ValueKind::Array(value) => !value.is_empty(),
            ValueKind::List(value) => !value.borrow().is_empty(),
            ValueKind::Dictionary(value) => !value.borrow().is_empty(),
            ValueKind::Function(_)
            | ValueKind::Class(_)
            | ValueKind::Object(_)
            | ValueKind::BuiltinFunction(_) => true,
        }
    }

    /// The form used inside containers: strings are quoted.
    pub fn repr(&self) -> String {
        match &self.kind {
            ValueKind::String(value) => format!("{:?}", value),
            ValueKind::CharacterList(value) => {
                let text: String = value.borrow().iter().collect();
                format!("'{}'", text.escape_debug())
            }
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::Nothing => write!(f, "nothing"),
            ValueKind::Boolean(value) => write!(f, "{}", value),
            ValueKind::Integer(value) => write!(f, "{}", value),
            ValueKind::Float(value) => write!(f, "{}", format_float(*value)),
            ValueKind::String(value) => write!(f, "{}", value),
            ValueKind::CharacterList(value) => {
                write!(f, "{}", value.borrow().iter().collect::<String>())
            }
            ValueKind::Array(elements) => {
                let items: Vec<String> = elements.iter().map(Value::repr).collect();
                match items.len() {
                    1 => write!(f, "({},)", items[0]),
                    _ => write!(f, "({})", items.join(", ")),
                }
            }
            ValueKind::List(elements) => {
                let items: Vec<String> = elements.borrow().iter().map(Value::repr).collect();
                write!(f, "[{}]", items.join(", "))
            }
            ValueKind::Dictionary(dictionary) => {
                let items: Vec<String> = dictionary
                    .borrow()
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key.repr(), value.repr()))
                    .collect();
                write!(f, "{{{}}}", items.join(", "))
            }
            ValueKind::Function(function) => write!(f, "<function {}>", function.display_name()),
            ValueKind::Class(class) => write!(f, "<object-definition {}>", class.name),
            ValueKind::Object(object) => write!(f, "<object {}>", object.class.name),
            ValueKind::BuiltinFunction(builtin) => write!(f, "<builtin-function {}>", builtin.name),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        values_equal(self, other)
    }
}
