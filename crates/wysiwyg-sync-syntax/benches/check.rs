use criterion::{Criterion, criterion_group, criterion_main};
use wysiwyg_sync_syntax::{check_well_formed, inner_text, normalize_whitespace};

fn generate_editor_html(paragraphs: usize) -> String {
    let base = "<p>Paragraph with <b>bold</b>, <i>italic</i> and a <a href=\"https://example.com/?a=1&amp;b=2\">link</a>.</p>\n<ul>\n  <li>first<li>second\n</ul>\n<img src=\"photo.jpg\" alt=\"photo\">\n";
    base.repeat(paragraphs)
}

fn bench_source_checks(c: &mut Criterion) {
    let mut group = c.benchmark_group("source_checks");
    group.sample_size(10);

    let content = generate_editor_html(500);
    group.bench_function("check_well_formed", |b| {
        b.iter(|| check_well_formed(std::hint::black_box(&content)));
    });
    group.bench_function("inner_text", |b| {
        b.iter(|| inner_text(std::hint::black_box(&content)));
    });
    group.bench_function("normalize_whitespace", |b| {
        b.iter(|| normalize_whitespace(std::hint::black_box(&content)));
    });

    group.finish();
}

criterion_group!(benches, bench_source_checks);
criterion_main!(benches);
