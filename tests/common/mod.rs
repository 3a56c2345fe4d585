//! Scaffolding shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use record_factory::{Factory, Procedure, RecordType, Value};
use tracing_subscriber::EnvFilter;

/// Install a subscriber so `RUST_LOG=record_factory=trace` shows library
/// events in test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn point(factory: &Factory) -> Arc<RecordType> {
    factory
        .define(["Point", "x", "y"], None)
        .expect("Point should be definable")
}

/// A procedure that keeps every argument list it is called with.
pub fn recorder() -> (Procedure, Arc<Mutex<Vec<Vec<Value>>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let proc = Procedure::new({
        let calls = calls.clone();
        move |args: &[Value]| {
            calls.lock().push(args.to_vec());
            Ok(Value::Null)
        }
    });
    (proc, calls)
}

#[allow(unused_macros)]
macro_rules! assert_condition {
    ($expr:expr, $pat:pat) => {
        match $expr {
            Err($pat) => (),
            other => panic!("expected {}, got {:?}", stringify!($pat), other),
        }
    };
}

#[allow(unused_imports)]
pub(crate) use assert_condition;
