use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use linkmark_core::{DocumentTree, OfflineFetcher, TransformConfig, Transformer, collect_candidates, parse_pseudocode};

fn bench_parse(c: &mut Criterion) {
    let small = std::fs::read_to_string("../../tests/fixtures/post.html").unwrap();
    let large = small.repeat(50);

    let mut group = c.benchmark_group("parse");

    group.bench_with_input(BenchmarkId::new("fragment", "post"), &small, |b, html| {
        b.iter(|| DocumentTree::parse_fragment(black_box(html)))
    });

    group.bench_with_input(BenchmarkId::new("fragment", "post x50"), &large, |b, html| {
        b.iter(|| DocumentTree::parse_fragment(black_box(html)))
    });

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/post.html").unwrap().repeat(50);
    let tree = DocumentTree::parse_fragment(&html);

    c.bench_function("to_html", |b| b.iter(|| black_box(&tree).to_html()));
}

fn bench_collect(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/post.html").unwrap().repeat(50);
    let tree = DocumentTree::parse_fragment(&html);
    let config = TransformConfig::default();

    c.bench_function("collect_candidates", |b| b.iter(|| collect_candidates(black_box(&tree), black_box(&config))));
}

fn bench_pseudocode(c: &mut Criterion) {
    let lines: Vec<String> = (1..=200)
        .map(|n| match n % 10 {
            0 => String::new(),
            5 => format!("    note on step {}", n),
            _ => format!("{}: do step {}", n, n),
        })
        .chain(std::iter::once("Input: data".to_string()))
        .collect();

    c.bench_function("parse_pseudocode", |b| b.iter(|| parse_pseudocode(black_box(&lines))));
}

fn bench_offline_transform(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/post.html").unwrap();
    let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();

    c.bench_function("transform_offline", |b| {
        b.iter(|| {
            let transformer = Transformer::with_fetcher(OfflineFetcher, TransformConfig::default());
            runtime.block_on(transformer.transform_html(black_box(&html)))
        })
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_serialize,
    bench_collect,
    bench_pseudocode,
    bench_offline_transform
);
criterion_main!(benches);
