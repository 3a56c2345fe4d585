//! Extra members merged into a record type when it is synthesized.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    exceptions::Condition,
    proc::MethodFn,
    records::{MethodTable, Record},
    symbols::{Symbol, is_constant_name},
    value::Value,
};

/// A reusable list of method, constant and alias definitions.
///
/// Definitions are applied in the order they were declared, after the
/// accessors and builtin methods are installed, so a definition replaces any
/// generated member with the same name.
///
/// ```
/// # use record_factory::{Extension, RecordType, Value};
/// let ext = Extension::new().method("sum", |point, _| {
///     let x: i64 = point.get("x")?.try_into()?;
///     let y: i64 = point.get("y")?.try_into()?;
///     Ok(Value::from(x + y))
/// });
/// let rt = RecordType::synthesize(["x", "y"], Some(&ext)).unwrap();
/// let mut point = rt.instantiate([2, 5]).unwrap();
/// assert_eq!(point.send("sum", &[]).unwrap(), 7);
/// ```
#[derive(Clone, Default, derive_more::Debug)]
pub struct Extension {
    definitions: Vec<Definition>,
}

#[derive(Clone, derive_more::Debug)]
enum Definition {
    Method {
        name: Symbol,
        #[debug(skip)]
        body: Box<dyn MethodFn>,
    },
    Constant {
        name: Symbol,
        value: Value,
    },
    Alias {
        new: Symbol,
        old: Symbol,
    },
}

impl Extension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method<F>(mut self, name: &str, body: F) -> Self
    where
        F: Fn(&mut Record, &[Value]) -> Result<Value, Condition> + Clone + Send + Sync + 'static,
    {
        self.definitions.push(Definition::Method {
            name: Symbol::intern(name),
            body: Box::new(body),
        });
        self
    }

    /// Constant names must start with an uppercase letter.
    pub fn constant(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.definitions.push(Definition::Constant {
            name: Symbol::intern(name),
            value: value.into(),
        });
        self
    }

    /// Bind `new` to whatever `old` refers to at this point of the
    /// definition, including generated accessors and builtins.
    pub fn alias(mut self, new: &str, old: &str) -> Self {
        self.definitions.push(Definition::Alias {
            new: Symbol::intern(new),
            old: Symbol::intern(old),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub(crate) fn apply(
        &self,
        methods: &mut MethodTable,
        constants: &mut IndexMap<Symbol, Value>,
    ) -> Result<(), Condition> {
        for definition in &self.definitions {
            match definition {
                Definition::Method { name, body } => {
                    methods.insert(*name, Arc::from(body.clone()));
                }
                Definition::Constant { name, value } => {
                    if !is_constant_name(&name.to_str()) {
                        return Err(Condition::invalid_name(name));
                    }
                    constants.insert(*name, value.clone());
                }
                Definition::Alias { new, old } => {
                    let method = methods
                        .get(old)
                        .cloned()
                        .ok_or_else(|| Condition::no_method(old, "record type"))?;
                    methods.insert(*new, method);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RecordType;

    #[test]
    fn later_definitions_win() {
        let ext = Extension::new()
            .method("size", |_, _| Ok(Value::from(-1)))
            .method("size", |_, _| Ok(Value::from(-2)));
        let rt = RecordType::synthesize(["a"], Some(&ext)).unwrap();
        let mut record = rt.instantiate([0]).unwrap();
        assert_eq!(record.send("size", &[]).unwrap(), -2);
        assert_eq!(record.send("length", &[]).unwrap(), 1);
    }

    #[test]
    fn alias_sees_generated_members() {
        let ext = Extension::new().alias("first", "a").alias("count", "size");
        let rt = RecordType::synthesize(["a", "b"], Some(&ext)).unwrap();
        let mut record = rt.instantiate(["x", "y"]).unwrap();
        assert_eq!(record.send("first", &[]).unwrap(), "x");
        assert_eq!(record.send("count", &[]).unwrap(), 2);
    }

    #[test]
    fn alias_to_unknown_member() {
        let ext = Extension::new().alias("first", "nope");
        assert!(matches!(
            RecordType::synthesize(["a"], Some(&ext)),
            Err(Condition::NoMethod { .. })
        ));
    }

    #[test]
    fn constants_need_constant_names() {
        let ext = Extension::new().constant("Origin", 0);
        let rt = RecordType::synthesize(["a"], Some(&ext)).unwrap();
        assert_eq!(rt.constant("Origin"), Some(&Value::from(0)));

        let ext = Extension::new().constant("origin", 0);
        assert!(matches!(
            RecordType::synthesize(["a"], Some(&ext)),
            Err(Condition::InvalidName(_))
        ));
    }

    #[test]
    fn extensions_are_reusable() {
        let ext = Extension::new().method("twice", |record, _| {
            let a: i64 = record.get(0)?.try_into()?;
            Ok(Value::from(a * 2))
        });
        let first = RecordType::synthesize(["a"], Some(&ext)).unwrap();
        let second = RecordType::synthesize(["b", "c"], Some(&ext.clone())).unwrap();
        assert_eq!(first.instantiate([4]).unwrap().send("twice", &[]).unwrap(), 8);
        assert_eq!(second.instantiate([5, 0]).unwrap().send("twice", &[]).unwrap(), 10);
    }
}
