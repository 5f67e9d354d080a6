use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lazyseq::value::{Array, Value};
use lazyseq::{equals, includes};

fn wide_object(width: usize) -> Value {
    Value::object((0..width).map(|i| {
        (
            format!("key{}", i),
            Value::array(vec![Value::from(i as i64), Value::from("payload")]),
        )
    }))
}

fn ring(len: usize) -> Value {
    let head = Array::new();
    let mut current = head.clone();
    for i in 0..len {
        let next = Array::new();
        current.push(Value::from(i as i64));
        current.push(Value::Array(next.clone()));
        current = next;
    }
    current.push(Value::Array(head.clone()));
    Value::Array(head)
}

fn bench_equals(c: &mut Criterion) {
    let mut group = c.benchmark_group("equals");

    for width in [10, 100, 1_000].iter() {
        let (a, b) = (wide_object(*width), wide_object(*width));
        group.bench_with_input(BenchmarkId::new("wide_object", width), width, |bench, _| {
            bench.iter(|| black_box(equals(&a, &b)));
        });
    }

    for len in [10, 100].iter() {
        let (a, b) = (ring(*len), ring(*len));
        group.bench_with_input(BenchmarkId::new("cyclic_ring", len), len, |bench, _| {
            bench.iter(|| black_box(equals(&a, &b)));
        });
    }

    group.finish();
}

fn bench_includes(c: &mut Criterion) {
    let list = Value::array((0..1_000).map(|i| Value::array(vec![Value::from(i as i64)])));
    let probe = Value::array(vec![Value::from(999i64)]);

    c.bench_function("includes_last_of_1000", |bench| {
        bench.iter(|| black_box(includes(&probe, &list)));
    });
}

criterion_group!(benches, bench_equals, bench_includes);
criterion_main!(benches);
