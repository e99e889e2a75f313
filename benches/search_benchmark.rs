use criterion::{criterion_group, criterion_main, Criterion};
use hikelog::services::find_similar;
use std::hint::black_box;

fn benchmark_find_similar(c: &mut Criterion) {
    // A few thousand plausible usernames
    let stems = ["suz", "frank", "hiker", "trail", "ridge", "fern", "oak", "kestrel"];
    let usernames: Vec<String> = (0..5_000)
        .map(|i| format!("{}{}{}", stems[i % stems.len()], stems[(i / 7) % stems.len()], i))
        .collect();

    let mut group = c.benchmark_group("user_search");

    group.bench_function("short_query", |b| {
        b.iter(|| find_similar(black_box(usernames.as_slice()), black_box("suz")))
    });

    group.bench_function("long_query", |b| {
        b.iter(|| find_similar(black_box(usernames.as_slice()), black_box("kestrelridge12")))
    });

    group.bench_function("no_overlap", |b| {
        b.iter(|| find_similar(black_box(usernames.as_slice()), black_box("xyzq")))
    });

    group.finish();
}

criterion_group!(benches, benchmark_find_similar);
criterion_main!(benches);
