//! Runtime values.
//!
//! - `value` - the Value type, its kinds and how values print
//! - `operations` - operator semantics between values
//! - `dictionary` - insertion-ordered dictionaries and key hashing
//! - `members` - the properties and helper methods of builtin kinds
//! - `callable` - functions, object definitions, objects and natives

pub mod callable;
pub mod dictionary;
pub mod members;
pub mod operations;
pub mod value;

#[cfg(test)]
mod tests;
