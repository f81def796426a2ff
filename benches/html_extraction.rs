use std::hint::black_box;

use ai_page_studio::extract_html;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Build a model reply embedding a document with N sections inside prose
fn generate_reply(num_sections: usize) -> String {
    let mut body = String::new();
    for i in 0..num_sections {
        body.push_str(&format!(
            "<section id=\"s{}\"><h2>Section {}</h2><p>Generated copy for block {}.</p></section>\n",
            i, i, i
        ));
    }
    format!(
        "Sure, here is the page you asked for:\n\n<!DOCTYPE html>\n<html>\n<head><title>Bench</title></head>\n<body>\n{}</body>\n</html>\n\nLet me know if you want changes.",
        body
    )
}

fn generate_fenced_reply(num_sections: usize) -> String {
    let mut body = String::new();
    for i in 0..num_sections {
        body.push_str(&format!("<div class=\"card\">Card {}</div>\n", i));
    }
    format!("```html\n{}```", body)
}

fn bench_extract_full_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_full_document");

    for size in [10, 100, 1_000].iter() {
        let reply = generate_reply(*size);

        group.throughput(Throughput::Bytes(reply.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| extract_html(black_box(&reply)));
        });
    }

    group.finish();
}

fn bench_extract_fenced_fragment(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_fenced_fragment");

    for size in [10, 100, 1_000].iter() {
        let reply = generate_fenced_reply(*size);

        group.throughput(Throughput::Bytes(reply.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| extract_html(black_box(&reply)));
        });
    }

    group.finish();
}

fn bench_extract_miss(c: &mut Criterion) {
    let prose = "This prompt cannot be turned into a page. ".repeat(500);

    c.bench_function("extract_miss", |b| {
        b.iter(|| extract_html(black_box(&prose)));
    });
}

criterion_group!(
    benches,
    bench_extract_full_document,
    bench_extract_fenced_fragment,
    bench_extract_miss
);
criterion_main!(benches);
