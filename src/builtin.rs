//! Methods installed on every synthesized record type.

use std::sync::Arc;

#[doc(hidden)]
pub use inventory;
/// Define a method in Rust and install it on every record type.
pub use record_factory_macros::builtin;

use crate::{
    exceptions::Condition,
    proc::Method,
    records::{MethodTable, Record},
    symbols::Symbol,
    value::Value,
};

type Wrapper = fn(&mut Record, &[Value]) -> Result<Value, Condition>;

#[doc(hidden)]
pub struct Builtin {
    pub name: &'static str,
    num_args: usize,
    variadic: bool,
    wrapper: Wrapper,
}

impl Builtin {
    pub const fn new(name: &'static str, num_args: usize, variadic: bool, wrapper: Wrapper) -> Self {
        Self {
            name,
            num_args,
            variadic,
            wrapper,
        }
    }

    pub(crate) fn install(&self, into: &mut MethodTable) {
        let &Builtin {
            num_args,
            variadic,
            wrapper,
            ..
        } = self;
        let method: Method = Arc::new(move |record: &mut Record, args: &[Value]| {
            check_arity(num_args, variadic, args.len())?;
            wrapper(record, args)
        });
        into.insert(Symbol::intern(self.name), method);
    }
}

inventory::collect!(Builtin);

pub(crate) fn check_arity(num_args: usize, variadic: bool, provided: usize) -> Result<(), Condition> {
    if variadic {
        if provided < num_args {
            return Err(Condition::wrong_num_of_var_args(num_args, provided));
        }
    } else if provided != num_args {
        return Err(Condition::wrong_num_of_args(num_args, provided));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity() {
        assert!(check_arity(2, false, 2).is_ok());
        assert_eq!(
            check_arity(2, false, 3),
            Err(Condition::Arity {
                expected: 2,
                provided: 3
            })
        );
        assert!(check_arity(1, true, 4).is_ok());
        assert_eq!(
            check_arity(1, true, 0),
            Err(Condition::VarArity {
                min: 1,
                provided: 0
            })
        );
    }

    #[test]
    fn every_builtin_is_collected() {
        let names: Vec<_> = inventory::iter::<Builtin>().map(|b| b.name).collect();
        for expected in [
            "[]", "[]=", "each", "each_pair", "dig", "size", "length", "members", "select",
            "to_a", "values_at", "==", "eql?",
        ] {
            assert!(names.contains(&expected), "missing builtin `{expected}`");
        }
    }
}
