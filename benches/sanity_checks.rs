//! Sanity check benchmarks
//!
//! Measures the brace checker on its own and the default sanity checks over
//! generated dictionaries of increasing size.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use freedict_editor::sanity;
use freedict_editor::xml::{DEFAULT_MAX_DEPTH, contains_unbalanced_braces};
use freedict_editor::{Document, XPathSession};
use std::hint::black_box;

/// A dictionary of `entries` entries, every tenth one with a stray bracket.
fn generate_dictionary(entries: usize) -> String {
    let mut xml = String::from(r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"><text><body>"#);
    for i in 0..entries {
        let orth = if i % 10 == 0 { format!("word{i}]") } else { format!("word{i}") };
        xml.push_str(&format!(
            "<entry><form><orth>{orth}</orth></form><gramGrp><pos>n</pos></gramGrp>\
             <sense><cit type=\"trans\"><quote>Wort {i}</quote></cit><note>(plural: words)</note></sense></entry>"
        ));
    }
    xml.push_str("</body></text></TEI>");
    xml
}

fn benchmark_brace_checker(c: &mut Criterion) {
    let mut group = c.benchmark_group("brace_checker");

    for len in [16, 256, 4096] {
        let text = "a (b [c] {d}) ".repeat(len / 14 + 1);
        group.bench_with_input(BenchmarkId::new("chars", len), &text, |b, text| {
            b.iter(|| contains_unbalanced_braces(black_box(text), DEFAULT_MAX_DEPTH))
        });
    }

    group.finish();
}

fn benchmark_default_checks(c: &mut Criterion) {
    let mut group = c.benchmark_group("default_sanity_checks");
    let session = XPathSession::new();
    let checks = sanity::default_checks("fd");

    for entries in [10, 100, 1000] {
        let xml = generate_dictionary(entries);
        let Ok(doc) = Document::parse(&xml) else {
            panic!("generated dictionary does not parse");
        };
        group.bench_with_input(BenchmarkId::new("entries", entries), &doc, |b, doc| {
            b.iter(|| sanity::run_checks(&session, black_box(doc), &checks, 64))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_brace_checker, benchmark_default_checks);
criterion_main!(benches);
