use record_factory::{Extension, Factory, Value};

use criterion::*;

fn synthesize_benchmark(c: &mut Criterion) {
    let factory = Factory::new();
    c.bench_function("define anonymous 8 fields", |b| {
        b.iter(|| {
            factory
                .define(black_box(["a", "b", "c", "d", "e", "f", "g", "h"]), None)
                .unwrap()
        })
    });
}

fn instantiate_benchmark(c: &mut Criterion) {
    let factory = Factory::new();
    let point = factory.define(["Point", "x", "y", "z"], None).unwrap();
    c.bench_function("instantiate 3 fields", |b| {
        b.iter(|| point.instantiate(black_box([1, 2, 3])).unwrap())
    });
}

fn access_benchmark(c: &mut Criterion) {
    let sum = Extension::new().method("sum", |record, _| {
        let mut total = 0;
        for value in record.iter() {
            total += i64::try_from(value)?;
        }
        Ok(Value::from(total))
    });
    let factory = Factory::new();
    let point = factory.define(["Point", "x", "y", "z"], Some(&sum)).unwrap();
    let mut p = point.instantiate([1, 2, 3]).unwrap();

    c.bench_function("get by name", |b| b.iter(|| p.get(black_box("z")).cloned()));
    c.bench_function("get by index", |b| b.iter(|| p.get(black_box(-1)).cloned()));
    c.bench_function("send sum", |b| {
        b.iter(|| p.send(black_box("sum"), &[]).unwrap())
    });
}

criterion_group!(
    benches,
    synthesize_benchmark,
    instantiate_benchmark,
    access_benchmark
);
criterion_main!(benches);
