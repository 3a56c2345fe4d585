use std::{
    fmt,
    hash::{Hash, Hasher},
    mem,
    sync::Arc,
};

use by_address::ByAddress;
use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::{
    exceptions::Condition,
    proc::Procedure,
    records::{FieldKey, Record, RecordType},
    symbols::Symbol,
};

/// A dynamically typed value, as stored in the slots of a [`Record`].
#[derive(Clone, PartialEq, Eq)]
pub enum Value {
    /// The absent value.
    Null,
    Boolean(bool),
    Integer(i64),
    Float(OrderedFloat<f64>),
    String(Arc<str>),
    Symbol(Symbol),
    Vector(Vec<Value>),
    Map(IndexMap<Value, Value>),
    Record(Record),
    RecordType(ByAddress<Arc<RecordType>>),
    Procedure(Procedure),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Null and false are false, everything else is true
    pub fn is_true(&self) -> bool {
        !matches!(self, Self::Null | Self::Boolean(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "nil",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Vector(_) => "vector",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
            Self::RecordType(_) => "record type",
            Self::Procedure(_) => "procedure",
        }
    }

    /// One step of `dig`. Values that cannot be indexed any further yield
    /// [`Value::Null`].
    pub(crate) fn dig_step(&self, key: &Value) -> Result<Value, Condition> {
        match self {
            Self::Record(record) => record.get(FieldKey::try_from(key)?).cloned(),
            Self::Vector(vec) => {
                let index: i64 = key.try_into()?;
                Ok(resolve_index(index, vec.len())
                    .map(|i| vec[i].clone())
                    .unwrap_or(Value::Null))
            }
            Self::Map(map) => Ok(map.get(key).cloned().unwrap_or(Value::Null)),
            _ => Ok(Value::Null),
        }
    }
}

/// Resolves a possibly negative index against a sequence of length `len`.
pub(crate) fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        (len as i64).checked_add(index)?
    } else {
        index
    };
    (0..len as i64).contains(&resolved).then_some(resolved as usize)
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Self::Null => (),
            Self::Boolean(b) => b.hash(state),
            Self::Integer(i) => i.hash(state),
            Self::Float(f) => f.hash(state),
            Self::String(s) => s.hash(state),
            Self::Symbol(sym) => sym.hash(state),
            Self::Vector(vec) => vec.hash(state),
            // Map equality ignores order, so only the length is hashed.
            Self::Map(map) => map.len().hash(state),
            Self::Record(record) => record.hash(state),
            Self::RecordType(rt) => rt.hash(state),
            Self::Procedure(proc) => proc.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("nil"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(n) => write!(f, "{:?}", n.0),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Symbol(sym) => write!(f, ":{sym}"),
            Self::Vector(vec) => {
                f.write_str("[")?;
                for (i, item) in vec.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (i, (key, val)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key} => {val}")?;
                }
                f.write_str("}")
            }
            Self::Record(record) => write!(f, "{record}"),
            Self::RecordType(rt) => write!(f, "{}", rt.name_or_anonymous()),
            Self::Procedure(_) => f.write_str("#<procedure>"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

macro_rules! impl_from_for_value {
    ($($for:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$for> for Value {
                fn from(v: $for) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Boolean,
    i32 => Integer,
    i64 => Integer,
    u8 => Integer,
    u32 => Integer,
    f64 => Float,
    &str => String,
    String => String,
    Arc<str> => String,
    Symbol => Symbol,
    Vec<Value> => Vector,
    IndexMap<Value, Value> => Map,
    Record => Record,
    Procedure => Procedure,
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl From<Arc<RecordType>> for Value {
    fn from(rt: Arc<RecordType>) -> Self {
        Self::RecordType(ByAddress(rt))
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<'a> TryFrom<&'a Value> for bool {
    type Error = Condition;

    fn try_from(v: &'a Value) -> Result<bool, Self::Error> {
        match v {
            Value::Boolean(b) => Ok(*b),
            x => Err(Condition::type_error("boolean", x.type_name())),
        }
    }
}

impl<'a> TryFrom<&'a Value> for i64 {
    type Error = Condition;

    fn try_from(v: &'a Value) -> Result<i64, Self::Error> {
        match v {
            Value::Integer(i) => Ok(*i),
            x => Err(Condition::type_error("integer", x.type_name())),
        }
    }
}

impl<'a> TryFrom<&'a Value> for f64 {
    type Error = Condition;

    fn try_from(v: &'a Value) -> Result<f64, Self::Error> {
        match v {
            Value::Float(f) => Ok(f.0),
            Value::Integer(i) => Ok(*i as f64),
            x => Err(Condition::type_error("float", x.type_name())),
        }
    }
}

impl<'a> TryFrom<&'a Value> for &'a str {
    type Error = Condition;

    fn try_from(v: &'a Value) -> Result<&'a str, Self::Error> {
        match v {
            Value::String(s) => Ok(&**s),
            x => Err(Condition::type_error("string", x.type_name())),
        }
    }
}

impl<'a> TryFrom<&'a Value> for Symbol {
    type Error = Condition;

    /// Strings are interned, so either spelling of a name is accepted.
    fn try_from(v: &'a Value) -> Result<Symbol, Self::Error> {
        match v {
            Value::Symbol(sym) => Ok(*sym),
            Value::String(s) => Ok(Symbol::intern(s)),
            x => Err(Condition::type_error("symbol", x.type_name())),
        }
    }
}

impl<'a> TryFrom<&'a Value> for &'a Procedure {
    type Error = Condition;

    fn try_from(v: &'a Value) -> Result<&'a Procedure, Self::Error> {
        match v {
            Value::Procedure(proc) => Ok(proc),
            x => Err(Condition::type_error("procedure", x.type_name())),
        }
    }
}

impl<'a> TryFrom<&'a Value> for &'a Record {
    type Error = Condition;

    fn try_from(v: &'a Value) -> Result<&'a Record, Self::Error> {
        match v {
            Value::Record(record) => Ok(record),
            x => Err(Condition::type_error("record", x.type_name())),
        }
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, rhs: &i64) -> bool {
        matches!(self, Self::Integer(i) if i == rhs)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, rhs: &i32) -> bool {
        matches!(self, Self::Integer(i) if *i == i64::from(*rhs))
    }
}

impl PartialEq<&'_ str> for Value {
    fn eq(&self, rhs: &&str) -> bool {
        matches!(self, Self::String(s) if s.as_ref() == *rhs)
    }
}
