//! The record-type factory.

use std::sync::Arc;

use crate::{
    exceptions::Condition,
    extension::Extension,
    records::RecordType,
    registry::{Rebind, Registry},
    symbols::{Symbol, is_constant_name},
    value::Value,
};

/// Factory configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Whether record types without fields may be created.
    pub allow_empty: bool,
    pub rebind: Rebind,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            allow_empty: true,
            rebind: Rebind::Replace,
        }
    }
}

impl Options {
    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    pub fn rebind(mut self, rebind: Rebind) -> Self {
        self.rebind = rebind;
        self
    }
}

/// Creates record types and owns the registry that named ones are bound in.
///
/// Clones share the registry.
#[derive(Clone, Debug, Default)]
pub struct Factory {
    registry: Registry,
    options: Options,
}

impl Factory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            registry: Registry::new(),
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Create a record type from positional arguments.
    ///
    /// A leading string that is a valid constant name (`"Point"`) names the
    /// type, which is then bound in the registry. Every other argument is a
    /// field name, given as a string or a symbol.
    pub fn define<I, A>(
        &self,
        args: I,
        extension: Option<&Extension>,
    ) -> Result<Arc<RecordType>, Condition>
    where
        I: IntoIterator<Item = A>,
        A: Into<Value>,
    {
        let mut args = args.into_iter().map(Into::into).peekable();
        let name = match args.peek() {
            Some(Value::String(name)) if is_constant_name(name) => Some(Symbol::intern(name)),
            _ => None,
        };
        if name.is_some() {
            args.next();
        }
        let fields = args
            .map(|arg| Symbol::try_from(&arg))
            .collect::<Result<Vec<_>, _>>()?;
        self.bind_fields(name, fields, extension)
    }

    /// Create a record type, binding it under `name` if one is given.
    pub fn bind_or_return<I, S>(
        &self,
        name: Option<&str>,
        fields: I,
        extension: Option<&Extension>,
    ) -> Result<Arc<RecordType>, Condition>
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let name = name
            .map(|name| {
                if is_constant_name(name) {
                    Ok(Symbol::intern(name))
                } else {
                    Err(Condition::invalid_name(name))
                }
            })
            .transpose()?;
        self.bind_fields(name, fields.into_iter().map(Into::into).collect(), extension)
    }

    fn bind_fields(
        &self,
        name: Option<Symbol>,
        fields: Vec<Symbol>,
        extension: Option<&Extension>,
    ) -> Result<Arc<RecordType>, Condition> {
        if fields.is_empty() && !self.options.allow_empty {
            return Err(Condition::argument(
                "wrong number of arguments: at least one field is required",
            ));
        }
        let rt = RecordType::build(name, fields, extension)?;
        if let Some(name) = name {
            self.registry.bind(name, rt.clone(), self.options.rebind)?;
        }
        Ok(rt)
    }

    pub fn get(&self, name: &str) -> Option<Arc<RecordType>> {
        self.registry.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn remove(&self, name: &str) -> Option<Arc<RecordType>> {
        self.registry.remove(name)
    }

    pub fn names(&self) -> Vec<Symbol> {
        self.registry.names()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
