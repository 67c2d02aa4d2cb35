//! Export benchmarks

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_core::export::pdf::{layout_book, ApproxMetrics};
use folio_core::export::{export_book, ExportContext, FORMATS};
use folio_core::types::{Book, Page};
use uuid::Uuid;

fn sample_book(pages: usize) -> Book {
    let mut book = Book::new("Benchmark", "Criterion");
    let paragraph = "<p>The quick brown fox jumps over the lazy dog. </p>".repeat(20);
    for i in 0..pages {
        book.push_page(Page::new(format!("Chapter {}", i), paragraph.clone(), None));
    }
    book
}

fn export_benchmark(c: &mut Criterion) {
    let book = sample_book(50);
    let ctx = ExportContext::fixed(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        Uuid::nil(),
    );

    for format in FORMATS {
        c.bench_function(&format!("export_{}", format), |b| {
            b.iter(|| export_book(black_box(format), black_box(&book), &ctx))
        });
    }

    c.bench_function("layout_50_pages", |b| {
        b.iter(|| layout_book(black_box(&book), &ApproxMetrics))
    });
}

criterion_group!(benches, export_benchmark);
criterion_main!(benches);
