use std::{cell::RefCell, fmt, rc::Rc};

use rustc_hash::FxHashMap;

use crate::{errors::errors::Frame, value::value::Value, Position};

/// Name to value mapping owned by one context.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: FxHashMap<String, Value>,
}

impl SymbolTable {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.symbols.get(name)
    }

    pub fn set(&mut self, name: String, value: Value) {
        self.symbols.insert(name, value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.symbols.remove(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

struct ContextData {
    name: String,
    parent: Option<Context>,
    entry: Position,
    locked: bool,
    symbols: RefCell<SymbolTable>,
}

/// A scope activation: a named symbol table chained to its parent.
///
/// Contexts are shared handles. Children keep their parent alive; values
/// stored in a table are detached first, so a table never keeps its own
/// context alive.
#[derive(Clone)]
pub struct Context(Rc<ContextData>);

impl Context {
    /// Creates a context. `entry` is where it was entered from, inside the
    /// parent's source. A locked context is function-internal: `global`
    /// looks past it.
    pub fn new(name: impl Into<String>, parent: Option<&Context>, entry: Position, locked: bool) -> Self {
        Context(Rc::new(ContextData {
            name: name.into(),
            parent: parent.cloned(),
            entry,
            locked,
            symbols: RefCell::new(SymbolTable::default()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&Context> {
        self.0.parent.as_ref()
    }

    pub fn entry(&self) -> &Position {
        &self.0.entry
    }

    pub fn is_locked(&self) -> bool {
        self.0.locked
    }

    pub fn ptr_eq(&self, other: &Context) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Looks `name` up here, then in each parent in turn.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut current = Some(self);
        while let Some(context) = current {
            if let Some(value) = context.get_local(name) {
                return Some(value);
            }
            current = context.parent();
        }
        None
    }

    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.0.symbols.borrow().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.0.symbols.borrow_mut().set(name.into(), value.detached());
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.0.symbols.borrow_mut().remove(name)
    }

    /// Snapshot of the local symbols, sorted by name.
    pub fn symbols(&self) -> Vec<(String, Value)> {
        let mut symbols: Vec<(String, Value)> = self
            .0
            .symbols
            .borrow()
            .symbols
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        symbols.sort_by(|a, b| a.0.cmp(&b.0));
        symbols
    }

    /// The innermost unlocked context, walking outward from `self`. Falls
    /// back to the outermost context when every context is locked.
    pub fn global_scope(&self) -> Context {
        let mut current = self;
        loop {
            if !current.is_locked() {
                return current.clone();
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return current.clone(),
            }
        }
    }

    /// The outermost context of the chain.
    pub fn root(&self) -> Context {
        let mut current = self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current.clone()
    }

    /// Frames from `position` in this context out to, but excluding, the
    /// root. Each frame reports where its context was executing: the error
    /// position for the innermost one, the entry point of the inner context
    /// for the rest.
    pub fn traceback(&self, position: &Position) -> Vec<Frame> {
        let mut frames = vec![];
        let mut current = self;
        let mut at = position;

        while let Some(parent) = current.parent() {
            frames.push(Frame {
                file: Rc::clone(&at.file),
                line: at.line + 1,
                context: current.name().to_string(),
            });
            at = current.entry();
            current = parent;
        }

        frames
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("name", &self.0.name)
            .field("locked", &self.0.locked)
            .finish()
    }
}
