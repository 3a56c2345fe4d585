//! Struct-like record types synthesized at runtime.
//!
//! A [`Factory`] turns a list of field names into a [`RecordType`]. Instances
//! of that type are [`Record`]s: one value per field, readable and writable
//! by position or by name, iterable in declaration order, and equal only to
//! records of the very same type.
//!
//! ```
//! use record_factory::Factory;
//!
//! let factory = Factory::new();
//! let point = factory.define(["Point", "x", "y"], None).unwrap();
//! let p = point.instantiate([3, 4]).unwrap();
//! assert_eq!(p.get(0).unwrap(), &3);
//! assert_eq!(p.get("y").unwrap(), &4);
//! assert_eq!(p.members(), ["x", "y"]);
//! assert!(factory.contains("Point"));
//! ```

extern crate self as record_factory;

pub mod builtin;
pub mod exceptions;
pub mod extension;
pub mod factory;
pub mod proc;
pub mod records;
pub mod registry;
pub mod symbols;
pub mod value;

pub use exceptions::Condition;
pub use extension::Extension;
pub use factory::{Factory, Options};
pub use proc::Procedure;
pub use records::{FieldKey, Record, RecordType};
pub use registry::{Rebind, Registry};
pub use symbols::Symbol;
pub use value::Value;
