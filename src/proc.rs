//! Procedures and record methods.

use std::{fmt, sync::Arc};

use by_address::ByAddress;
use dyn_clone::DynClone;

use crate::{exceptions::Condition, records::Record, value::Value};

/// A member of a record type's method table. The receiver is always the
/// record the method was sent to.
pub trait MethodFn:
    DynClone + Fn(&mut Record, &[Value]) -> Result<Value, Condition> + Send + Sync
{
}

impl<F> MethodFn for F where
    F: Fn(&mut Record, &[Value]) -> Result<Value, Condition> + Clone + Send + Sync
{
}

dyn_clone::clone_trait_object!(MethodFn);

/// A shared, installed method.
pub type Method = Arc<dyn MethodFn>;

type ProcFn = dyn Fn(&[Value]) -> Result<Value, Condition> + Send + Sync;

/// A callable value, used as the block argument of `each`, `each_pair` and
/// `select` when they are sent by name.
///
/// Two procedures are equal only if they are the same allocation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Procedure(ByAddress<Arc<ProcFn>>);

impl Procedure {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Condition> + Send + Sync + 'static,
    {
        Self(ByAddress(Arc::new(func)))
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, Condition> {
        let func: &ProcFn = &**self.0;
        func(args)
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#<procedure>")
    }
}
