//! Performance benchmarks for paper-prep
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use paper_prep::pdf::{derive_output_path, insert_blank_pages};
use qpdf::QPdf;
use std::path::Path;

fn build_document(pages: usize) -> Vec<u8> {
    let qpdf = QPdf::empty();
    for i in 0..pages {
        let page = qpdf
            .parse_object(&format!(
                "<< /Type /Page /MediaBox [0 0 612 792] /Resources << >> /Label /p{} >>",
                i
            ))
            .unwrap();
        qpdf.add_page(&page, false).unwrap();
    }
    qpdf.writer().write_to_memory().unwrap()
}

/// Benchmark blank page insertion across document sizes
fn bench_blank_pages(c: &mut Criterion) {
    let mut group = c.benchmark_group("blank_pages");

    for pages in [1usize, 12, 100] {
        let data = build_document(pages);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(pages), &data, |b, data| {
            b.iter(|| insert_blank_pages(black_box(data)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark output path derivation
fn bench_output_path(c: &mut Criterion) {
    c.bench_function("derive_output_path", |b| {
        b.iter(|| derive_output_path(black_box(Path::new("/papers/2019/smith-et-al.pdf")), "crop"));
    });
}

criterion_group!(benches, bench_blank_pages, bench_output_path);
criterion_main!(benches);
