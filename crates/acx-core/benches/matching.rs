//! Benchmarks for acx construction and scanning

use acx_core::{AutomatonBuilder, PatternId};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const WORDS: &[&str] = &[
    "tracker", "analytics", "beacon", "pixel", "adserver", "doubleclick", "banner",
    "popunder", "telemetry", "metrics", "collect", "affiliate", "sponsor", "promo",
];

fn build(fold_case: bool) -> acx_core::Automaton {
    let mut builder = AutomatonBuilder::new().unwrap();
    for (idx, word) in WORDS.iter().enumerate() {
        builder
            .insert(word.as_bytes(), PatternId::new(idx as u32), fold_case)
            .unwrap();
    }
    builder.compile().unwrap()
}

fn haystack() -> Vec<u8> {
    let chunk = b"https://cdn.example.com/assets/app.js?ref=home&utm_source=newsletter ";
    let mut text = Vec::with_capacity(64 * 1024);
    while text.len() < 64 * 1024 {
        text.extend_from_slice(chunk);
    }
    text.extend_from_slice(b"/Analytics/Pixel.gif");
    text
}

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile_14_patterns", |b| b.iter(|| build(black_box(false))));
}

fn bench_compile_many(c: &mut Criterion) {
    let patterns: Vec<String> = (0..1000).map(|i| format!("pattern-{i:04}")).collect();

    c.bench_function("compile_1000_patterns", |b| {
        b.iter(|| {
            let mut builder = AutomatonBuilder::new().unwrap();
            for (idx, p) in patterns.iter().enumerate() {
                builder
                    .insert(p.as_bytes(), PatternId::new(idx as u32), false)
                    .unwrap();
            }
            builder.compile().unwrap()
        })
    });
}

fn bench_scan(c: &mut Criterion) {
    let automaton = build(false);
    let text = haystack();

    c.bench_function("scan_64k", |b| {
        b.iter(|| automaton.find_matches(black_box(&text), false).count())
    });
}

fn bench_scan_fold_case(c: &mut Criterion) {
    let automaton = build(true);
    let text = haystack();

    c.bench_function("scan_64k_fold_case", |b| {
        b.iter(|| automaton.find_matches(black_box(&text), true).count())
    });
}

fn bench_is_match(c: &mut Criterion) {
    let automaton = build(false);
    let text = haystack();

    c.bench_function("is_match_64k", |b| {
        b.iter(|| automaton.is_match(black_box(&text), false))
    });
}

criterion_group!(
    benches,
    bench_compile,
    bench_compile_many,
    bench_scan,
    bench_scan_fold_case,
    bench_is_match
);
criterion_main!(benches);
