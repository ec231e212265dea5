use criterion::{black_box, criterion_group, criterion_main, Criterion};
use util::cmap::CHashMap;

fn criterion_benchmark(c: &mut Criterion) {
    let map: CHashMap<u64, u64> = CHashMap::default();

    for i in 0..10_000 {
        map.entry(i, |entry| *entry.or_insert(0) = i);
    }

    c.bench_function("cmap_get", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i = (i + 1) % 10_000;
            map.get(black_box(&i)).map(|value| *value)
        })
    });

    c.bench_function("cmap_entry_increment", |b| {
        b.iter(|| {
            map.entry(black_box(42), |entry| {
                *entry.or_insert(0) += 1;
            })
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
