//! Name bindings for record types created by a [`Factory`](crate::Factory).

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::{exceptions::Condition, records::RecordType, symbols::Symbol};

/// What to do when a name is bound a second time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Rebind {
    /// Replace the previous binding and log a warning.
    #[default]
    Replace,
    /// Fail with [`Condition::AlreadyBound`].
    Reject,
}

/// A shared mapping from names to record types.
///
/// Clones share the same bindings. Binding takes the write lock for the whole
/// check-and-insert; lookups take the read lock.
#[derive(Clone, Default)]
pub struct Registry {
    types: Arc<RwLock<IndexMap<Symbol, Arc<RecordType>>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(
        &self,
        name: Symbol,
        rt: Arc<RecordType>,
        rebind: Rebind,
    ) -> Result<(), Condition> {
        let mut types = self.types.write();
        match (types.contains_key(&name), rebind) {
            (true, Rebind::Reject) => return Err(Condition::AlreadyBound(name.to_string())),
            (true, Rebind::Replace) => {
                tracing::warn!(%name, "already initialized record type, replacing it");
            }
            (false, _) => tracing::debug!(%name, "binding record type"),
        }
        types.insert(name, rt);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<RecordType>> {
        let name = Symbol::lookup(name)?;
        self.types.read().get(&name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        Symbol::lookup(name).is_some_and(|name| self.types.read().contains_key(&name))
    }

    pub fn remove(&self, name: &str) -> Option<Arc<RecordType>> {
        let name = Symbol::lookup(name)?;
        self.types.write().shift_remove(&name)
    }

    /// Bound names, in binding order.
    pub fn names(&self) -> Vec<Symbol> {
        self.types.read().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
