//! Record types and their instances.
//!
//! A [`RecordType`] maps each field name to a slot index. A [`Record`] is an
//! ordered vector of values, one per slot, tagged with the type that created
//! it. Names and indexes both resolve through the type's schema.

use std::{
    fmt, mem, slice,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use by_address::ByAddress;
use indexmap::{IndexMap, IndexSet};

use crate::{
    builtin::{Builtin, builtin, check_arity},
    exceptions::Condition,
    extension::Extension,
    proc::{Method, MethodFn, Procedure},
    symbols::Symbol,
    value::{Value, resolve_index},
};

pub(crate) type MethodTable = IndexMap<Symbol, Method>;

static NEXT_TYPE_ID: AtomicU64 = AtomicU64::new(0);

/// Type declaration for a record.
#[derive(derive_more::Debug)]
pub struct RecordType {
    id: u64,
    name: Option<Symbol>,
    fields: IndexSet<Symbol>,
    #[debug(skip)]
    methods: MethodTable,
    constants: IndexMap<Symbol, Value>,
}

impl RecordType {
    /// Synthesize an anonymous record type over `fields`, in order.
    ///
    /// Every call produces a distinct type, even for identical field lists.
    pub fn synthesize<I, S>(
        fields: I,
        extension: Option<&Extension>,
    ) -> Result<Arc<Self>, Condition>
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        Self::build(None, fields.into_iter().map(Into::into).collect(), extension)
    }

    pub(crate) fn build(
        name: Option<Symbol>,
        fields: Vec<Symbol>,
        extension: Option<&Extension>,
    ) -> Result<Arc<Self>, Condition> {
        let mut schema = IndexSet::with_capacity(fields.len());
        for field in fields {
            if !field.is_identifier() {
                return Err(Condition::invalid_name(field));
            }
            if !schema.insert(field) {
                return Err(Condition::DuplicateField(field));
            }
        }

        let mut methods = MethodTable::new();
        install_accessors(&schema, &mut methods);
        for builtin in inventory::iter::<Builtin>() {
            builtin.install(&mut methods);
        }

        let mut constants = IndexMap::new();
        if let Some(extension) = extension {
            extension.apply(&mut methods, &mut constants)?;
        }

        let rt = Arc::new(Self {
            id: NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed),
            name,
            fields: schema,
            methods,
            constants,
        });
        tracing::debug!(
            record_type = %rt.name_or_anonymous(),
            fields = rt.fields.len(),
            methods = rt.methods.len(),
            "synthesized record type"
        );
        Ok(rt)
    }

    /// Construct a record from exactly one value per field, in declaration
    /// order.
    pub fn instantiate<I, V>(self: &Arc<Self>, values: I) -> Result<Record, Condition>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.len() != self.fields.len() {
            return Err(Condition::wrong_num_of_args(self.fields.len(), values.len()));
        }
        Ok(Record {
            record_type: ByAddress(self.clone()),
            fields: values,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> Option<Symbol> {
        self.name
    }

    pub fn name_or_anonymous(&self) -> String {
        match self.name {
            Some(name) => name.to_string(),
            None => format!("#<record type {}>", self.id),
        }
    }

    pub fn fields(&self) -> &IndexSet<Symbol> {
        &self.fields
    }

    pub fn members(&self) -> Vec<Symbol> {
        self.fields.iter().copied().collect()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn index_of(&self, field: &str) -> Option<usize> {
        Symbol::lookup(field).and_then(|field| self.fields.get_index_of(&field))
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        Symbol::lookup(name).and_then(|name| self.methods.get(&name))
    }

    pub fn method_names(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.methods.keys().copied()
    }

    pub fn constant(&self, name: &str) -> Option<&Value> {
        Symbol::lookup(name).and_then(|name| self.constants.get(&name))
    }
}

fn install_accessors(schema: &IndexSet<Symbol>, methods: &mut MethodTable) {
    for (slot, &field) in schema.iter().enumerate() {
        let reader: Method = Arc::new(
            move |record: &mut Record, args: &[Value]| -> Result<Value, Condition> {
                check_arity(0, false, args.len())?;
                Ok(record.fields[slot].clone())
            },
        );
        let writer: Method = Arc::new(
            move |record: &mut Record, args: &[Value]| -> Result<Value, Condition> {
                check_arity(1, false, args.len())?;
                record.fields[slot] = args[0].clone();
                Ok(args[0].clone())
            },
        );
        methods.insert(field, reader);
        methods.insert(Symbol::intern(&format!("{field}=")), writer);
    }
}

/// Identifies a field either by position or by name.
///
/// Negative positions count back from the last field.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum FieldKey {
    Index(i64),
    Name(Symbol),
    /// A name that has never been interned, so no record type declares it.
    #[from(skip)]
    Unknown(Box<str>),
}

impl FieldKey {
    fn from_name(name: &str) -> Self {
        Symbol::lookup(name).map_or_else(|| Self::Unknown(name.into()), Self::Name)
    }
}

impl From<i32> for FieldKey {
    fn from(i: i32) -> Self {
        Self::Index(i.into())
    }
}

impl From<usize> for FieldKey {
    fn from(i: usize) -> Self {
        Self::Index(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<String> for FieldKey {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl<'a> TryFrom<&'a Value> for FieldKey {
    type Error = Condition;

    fn try_from(v: &'a Value) -> Result<Self, Self::Error> {
        match v {
            Value::Integer(i) => Ok(Self::Index(*i)),
            Value::Symbol(sym) => Ok(Self::Name(*sym)),
            Value::String(s) => Ok(Self::from_name(s)),
            x => Err(Condition::type_error("integer, string or symbol", x.type_name())),
        }
    }
}

/// An instance of a [`RecordType`].
///
/// Two records are equal when they were created by the same record type and
/// hold equal values.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Record {
    record_type: ByAddress<Arc<RecordType>>,
    fields: Vec<Value>,
}

impl Record {
    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    fn slot(&self, key: FieldKey) -> Result<usize, Condition> {
        match key {
            FieldKey::Index(index) => resolve_index(index, self.fields.len())
                .ok_or_else(|| Condition::invalid_index(index, self.fields.len())),
            FieldKey::Name(name) => self.record_type.fields.get_index_of(&name).ok_or_else(|| {
                Condition::unknown_field(name, self.record_type.name_or_anonymous())
            }),
            FieldKey::Unknown(name) => Err(Condition::unknown_field(
                name,
                self.record_type.name_or_anonymous(),
            )),
        }
    }

    pub fn get(&self, key: impl Into<FieldKey>) -> Result<&Value, Condition> {
        let slot = self.slot(key.into())?;
        Ok(&self.fields[slot])
    }

    /// Overwrite a field, returning the value it held.
    pub fn set(
        &mut self,
        key: impl Into<FieldKey>,
        value: impl Into<Value>,
    ) -> Result<Value, Condition> {
        let slot = self.slot(key.into())?;
        Ok(mem::replace(&mut self.fields[slot], value.into()))
    }

    pub fn iter(&self) -> slice::Iter<'_, Value> {
        self.fields.iter()
    }

    pub fn each(&self, visit: impl FnMut(&Value)) {
        self.fields.iter().for_each(visit)
    }

    pub fn pairs(&self) -> impl Iterator<Item = (Symbol, &Value)> {
        self.record_type.fields.iter().copied().zip(self.fields.iter())
    }

    pub fn each_pair(&self, mut visit: impl FnMut(Symbol, &Value)) {
        for (name, value) in self.pairs() {
            visit(name, value);
        }
    }

    /// Follow `keys` through nested records, vectors and maps.
    ///
    /// Stops with [`Value::Null`] as soon as an intermediate value is absent
    /// or cannot be indexed. At least one key is required.
    pub fn dig<I, K>(&self, keys: I) -> Result<Value, Condition>
    where
        I: IntoIterator<Item = K>,
        K: Into<Value>,
    {
        let mut keys = keys.into_iter().map(Into::into);
        let first = keys
            .next()
            .ok_or_else(|| Condition::wrong_num_of_var_args(1, 0))?;
        let mut current = self.get(FieldKey::try_from(&first)?)?.clone();
        for key in keys {
            if current.is_null() {
                break;
            }
            current = current.dig_step(&key)?;
        }
        Ok(current)
    }

    pub fn size(&self) -> usize {
        self.fields.len()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn members(&self) -> Vec<Symbol> {
        self.record_type.members()
    }

    pub fn select(&self, mut pred: impl FnMut(&Value) -> bool) -> Vec<Value> {
        self.fields.iter().filter(|v| pred(v)).cloned().collect()
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.fields.clone()
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.fields
    }

    /// Values at `indexes`, in the order requested. Indexes past either end
    /// yield [`Value::Null`].
    pub fn values_at(&self, indexes: impl IntoIterator<Item = i64>) -> Vec<Value> {
        indexes
            .into_iter()
            .map(|index| {
                resolve_index(index, self.fields.len())
                    .map(|slot| self.fields[slot].clone())
                    .unwrap_or(Value::Null)
            })
            .collect()
    }

    pub fn eql(&self, other: &Value) -> bool {
        matches!(other, Value::Record(other) if self == other)
    }

    pub fn respond_to(&self, name: &str) -> bool {
        self.record_type.method(name).is_some()
    }

    /// Invoke a member of the record type's method table by name.
    pub fn send(&mut self, name: &str, args: &[Value]) -> Result<Value, Condition> {
        let rt = Arc::clone(&self.record_type);
        let method = rt
            .method(name)
            .ok_or_else(|| Condition::no_method(name, rt.name_or_anonymous()))?;
        tracing::trace!(record_type = %rt.name_or_anonymous(), method = name, "send");
        let method: &dyn MethodFn = &**method;
        method(self, args)
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#<struct ")?;
        if let Some(name) = self.record_type.name {
            write!(f, "{name} ")?;
        }
        for (i, (name, value)) in self.pairs().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(">")
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[builtin("[]")]
pub fn index_ref(record: &Record, key: &Value) -> Result<Value, Condition> {
    record.get(FieldKey::try_from(key)?).cloned()
}

#[builtin("[]=")]
pub fn index_set(record: &mut Record, key: &Value, value: &Value) -> Result<Value, Condition> {
    record.set(FieldKey::try_from(key)?, value.clone())?;
    Ok(value.clone())
}

#[builtin("each")]
pub fn each(record: &Record, visit: &Value) -> Result<Value, Condition> {
    let visit: &Procedure = visit.try_into()?;
    for value in record {
        visit.call(slice::from_ref(value))?;
    }
    Ok(Value::from(record.clone()))
}

#[builtin("each_pair")]
pub fn each_pair(record: &Record, visit: &Value) -> Result<Value, Condition> {
    let visit: &Procedure = visit.try_into()?;
    for (name, value) in record.pairs() {
        visit.call(&[Value::from(name), value.clone()])?;
    }
    Ok(Value::from(record.clone()))
}

#[builtin("dig")]
pub fn dig(record: &Record, key: &Value, keys: &[Value]) -> Result<Value, Condition> {
    record.dig(std::iter::once(key).chain(keys).cloned())
}

#[builtin("size", "length")]
pub fn size(record: &Record) -> Result<Value, Condition> {
    Ok(Value::Integer(record.len() as i64))
}

#[builtin("members")]
pub fn members(record: &Record) -> Result<Value, Condition> {
    Ok(Value::from(
        record.members().into_iter().map(Value::from).collect::<Vec<_>>(),
    ))
}

#[builtin("select")]
pub fn select(record: &Record, pred: &Value) -> Result<Value, Condition> {
    let pred: &Procedure = pred.try_into()?;
    let mut selected = Vec::new();
    for value in record {
        if pred.call(slice::from_ref(value))?.is_true() {
            selected.push(value.clone());
        }
    }
    Ok(Value::from(selected))
}

#[builtin("to_a")]
pub fn to_a(record: &Record) -> Result<Value, Condition> {
    Ok(Value::from(record.to_vec()))
}

#[builtin("values_at")]
pub fn values_at(record: &Record, indexes: &[Value]) -> Result<Value, Condition> {
    let indexes = indexes
        .iter()
        .map(i64::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::from(record.values_at(indexes)))
}

#[builtin("==", "eql?")]
pub fn equal(record: &Record, other: &Value) -> Result<Value, Condition> {
    Ok(Value::Boolean(record.eql(other)))
}

#[builtin("inspect")]
pub fn inspect(record: &Record) -> Result<Value, Condition> {
    Ok(Value::from(record.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> Arc<RecordType> {
        RecordType::synthesize(["left", "right"], None).unwrap()
    }

    #[test]
    fn schema_maps_names_to_slots() {
        let rt = pair();
        assert_eq!(rt.index_of("left"), Some(0));
        assert_eq!(rt.index_of("right"), Some(1));
        assert_eq!(rt.index_of("middle"), None);
        assert_eq!(rt.field_count(), 2);
    }

    #[test]
    fn accessors_and_builtins_are_installed() {
        let rt = pair();
        for name in ["left", "left=", "right", "right=", "[]", "each", "size", "length"] {
            assert!(rt.method(name).is_some(), "missing `{name}`");
        }
    }

    #[test]
    fn field_keys_from_values() {
        let left = Symbol::intern("left");
        assert_eq!(FieldKey::try_from(&Value::from(1)), Ok(FieldKey::Index(1)));
        assert_eq!(
            FieldKey::try_from(&Value::from("left")),
            Ok(FieldKey::Name(left))
        );
        assert_eq!(
            FieldKey::try_from(&Value::from(left)),
            Ok(FieldKey::Name(left))
        );
        assert_eq!(
            FieldKey::try_from(&Value::from("field_keys_from_values_absent")),
            Ok(FieldKey::Unknown("field_keys_from_values_absent".into()))
        );
        assert!(FieldKey::try_from(&Value::from(1.5)).is_err());
    }

    #[test]
    fn large_positions_stay_out_of_range() {
        assert_eq!(FieldKey::from(usize::MAX), FieldKey::Index(i64::MAX));
        let record = pair().instantiate([1, 2]).unwrap();
        assert_eq!(
            record.get(usize::MAX),
            Err(Condition::invalid_index(i64::MAX, 2))
        );
    }

    #[test]
    fn set_returns_previous_value() {
        let mut record = pair().instantiate([1, 2]).unwrap();
        assert_eq!(record.set("left", 10).unwrap(), 1);
        assert_eq!(record.get(0).unwrap(), &10);
    }

    #[test]
    fn display() {
        let record = pair().instantiate([Value::from(1), Value::from("b")]).unwrap();
        assert_eq!(record.to_string(), "#<struct left=1, right=\"b\">");
    }
}
