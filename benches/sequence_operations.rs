use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use futures_util::stream::{self, StreamExt};
use lazyseq::pipe::{self, PipeExt};
use lazyseq::seq::*;
use tokio::runtime::Runtime;

fn bench_sync_operations(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("sync_operations");

    for size in [1_000, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::new("map_filter", size), size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let seq = filter(
                    |x: &u64| black_box(x % 4 == 0),
                    map(|x: u64| black_box(x * 2), from_iter(0..size)),
                );
                black_box(to_array(seq).await)
            });
        });

        group.bench_with_input(BenchmarkId::new("chunk_and_scan", size), size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let seq = scan(
                    |acc: usize, batch: Vec<u64>| acc + batch.len(),
                    0,
                    chunk(100, from_iter(0..size)),
                );
                black_box(to_array(seq).await)
            });
        });

        group.bench_with_input(BenchmarkId::new("composed_pipe", size), size, |b, &size| {
            let pipeline = pipe::map(|x: u64| x + 1)
                .compose(pipe::drop_while(|x: &u64| *x < 10))
                .compose(pipe::zip(vec![7u32; 4_096]));
            b.to_async(&rt).iter(|| {
                let pipeline = pipeline.clone();
                async move { black_box(to_array(pipeline.apply(from_iter(0..size))).await) }
            });
        });
    }

    group.finish();
}

fn bench_async_operations(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("async_operations");

    for size in [1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("map_async", size), size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let seq = map_async(
                    |x: u64| async move { black_box(x * 2) },
                    from_stream(stream::iter(0..size)),
                );
                black_box(to_array(seq).await)
            });
        });

        group.bench_with_input(BenchmarkId::new("flatten_deferred", size), size, |b, &size| {
            b.to_async(&rt).iter(|| async move {
                let inners = stream::iter(0..size).map(|x: u64| from_future(async move { vec![x, x] }));
                let seq = flatten(from_stream(inners));
                black_box(to_array(seq).await)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sync_operations, bench_async_operations);
criterion_main!(benches);
