use causerie::render::{render, render_with_options, RenderOptions};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn make_corpus(n_messages: usize) -> String {
    let mut out = String::new();
    for i in 0..n_messages {
        out.push_str("## Update ");
        out.push_str(&i.to_string());
        out.push('\n');
        out.push_str("Some **bold** text with `code` and a [link](https://example.com/a).\n");
        out.push_str("- first item with *emphasis*\n");
        out.push_str("- second item with ~~strikethrough~~\n");
        out.push_str("> quoted line with https://example.com/autolink\n");
        out.push('\n');
    }
    out
}

fn bench_render(c: &mut Criterion) {
    for &n in &[10usize, 100usize] {
        let corpus = make_corpus(n);

        let mut group = c.benchmark_group(format!("render_messages{n}"));
        group.throughput(Throughput::Bytes(corpus.len() as u64));

        group.bench_function(BenchmarkId::new("lenient", corpus.len()), |b| {
            b.iter(|| render(&corpus))
        });
        group.bench_function(BenchmarkId::new("strict", corpus.len()), |b| {
            b.iter(|| render_with_options(&corpus, RenderOptions::strict_links()))
        });

        group.finish();
    }

    // Worst case for the inline scanner: a long run of unmatched delimiters.
    let hostile = "*".repeat(64 * 1024);
    let mut group = c.benchmark_group("render_hostile");
    group.throughput(Throughput::Bytes(hostile.len() as u64));
    group.bench_function("unmatched_asterisks", |b| b.iter(|| render(&hostile)));
    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
