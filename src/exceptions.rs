//! Exceptional situations and conditions

use std::fmt;

use crate::symbols::Symbol;

/// Every failure a factory, a record type or a record can produce.
///
/// Failures are programmer errors surfaced immediately; nothing is retried.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Wrong number of positional values or method arguments.
    #[error("wrong number of arguments: expected {expected}, provided {provided}")]
    Arity { expected: usize, provided: usize },
    /// Too few arguments to a method that accepts a variable number of them.
    #[error("wrong number of arguments: expected at least {min}, provided {provided}")]
    VarArity { min: usize, provided: usize },
    #[error("no member `{field}` in {type_name}")]
    UnknownField { field: String, type_name: String },
    #[error("invalid index of {index} into record of size {len}")]
    InvalidIndex { index: i64, len: usize },
    #[error("{0}")]
    Argument(String),
    #[error("field `{0}` declared more than once")]
    DuplicateField(Symbol),
    #[error("`{0}` is not a valid name")]
    InvalidName(String),
    #[error("`{0}` is already bound")]
    AlreadyBound(String),
    #[error("expected value of type {expected}, provided {provided}")]
    TypeError {
        expected: &'static str,
        provided: &'static str,
    },
    #[error("undefined method `{name}` for {type_name}")]
    NoMethod { name: String, type_name: String },
    #[error("{0}")]
    Error(String),
}

impl Condition {
    pub fn error(message: impl fmt::Display) -> Self {
        Self::Error(message.to_string())
    }

    pub fn wrong_num_of_args(expected: usize, provided: usize) -> Self {
        Self::Arity { expected, provided }
    }

    pub fn wrong_num_of_var_args(min: usize, provided: usize) -> Self {
        Self::VarArity { min, provided }
    }

    pub fn unknown_field(field: impl fmt::Display, type_name: impl fmt::Display) -> Self {
        Self::UnknownField {
            field: field.to_string(),
            type_name: type_name.to_string(),
        }
    }

    pub fn invalid_index(index: i64, len: usize) -> Self {
        Self::InvalidIndex { index, len }
    }

    pub fn type_error(expected: &'static str, provided: &'static str) -> Self {
        Self::TypeError { expected, provided }
    }

    pub fn no_method(name: impl fmt::Display, type_name: impl fmt::Display) -> Self {
        Self::NoMethod {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }

    pub fn argument(message: impl fmt::Display) -> Self {
        Self::Argument(message.to_string())
    }

    pub fn invalid_name(name: impl fmt::Display) -> Self {
        Self::InvalidName(name.to_string())
    }
}
