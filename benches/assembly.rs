//! Benchmarks for the TEI to page model pipeline.
//!
//! Run with: cargo bench

use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};

use folio::markup;
use folio::tei::{extract_segments, extract_surfaces};
use folio::{Book, ParseOptions, UnresolvedPolicy};

const HERBAL: &[u8] = include_bytes!("../tests/fixtures/herbal.xml");

/// A synthetic edition with `pages` surfaces of `lines` line zones each,
/// one aligned segment per line.
fn synthetic_document(pages: usize, lines: usize) -> String {
    let mut facsimile = String::new();
    let mut body = String::new();

    for p in 1..=pages {
        let _ = write!(
            facsimile,
            r#"<surface xml:id="facs_page_{p}"><graphic url="page_{p:04}.jpg" width="2000" height="3000"/>"#
        );
        for l in 1..=lines {
            let top = l * 40;
            let _ = write!(
                facsimile,
                r#"<zone xml:id="facs_line_{p}_{l}" type="textline" ulx="100" uly="{top}" lrx="1900" lry="{}"/>"#,
                top + 35
            );
        }
        facsimile.push_str("</surface>");

        let _ = write!(body, r##"<pb n="{p}" facs="#facs_page_{p}"/><p>"##);
        for l in 1..=lines {
            let _ = write!(
                body,
                r##"<lb facs="#facs_line_{p}_{l}"/><seg facs="#facs_line_{p}_{l}">Line {l} of page {p}</seg>"##
            );
        }
        body.push_str("</p>");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0">
<teiHeader><fileDesc><titleStmt><title>Synthetic</title></titleStmt></fileDesc></teiHeader>
<facsimile>{facsimile}</facsimile>
<text><body>{body}</body></text>
</TEI>"#
    )
}

// ============================================================================
// Whole Pipeline
// ============================================================================

fn bench_parse_fixture(c: &mut Criterion) {
    c.bench_function("parse_fixture", |b| {
        b.iter(|| Book::from_bytes(HERBAL).unwrap());
    });
}

fn bench_parse_large(c: &mut Criterion) {
    let xml = synthetic_document(300, 40);

    c.bench_function("parse_300_pages", |b| {
        b.iter(|| Book::from_bytes(xml.as_bytes()).unwrap());
    });
}

fn bench_parse_large_follow_page_break(c: &mut Criterion) {
    let xml = synthetic_document(300, 40);
    let options = ParseOptions::new().with_unresolved(UnresolvedPolicy::FollowPageBreak);

    c.bench_function("parse_300_pages_follow_page_break", |b| {
        b.iter(|| Book::from_bytes_with(xml.as_bytes(), &options).unwrap());
    });
}

// ============================================================================
// Stages
// ============================================================================

fn bench_decode(c: &mut Criterion) {
    let xml = synthetic_document(300, 40);

    c.bench_function("decode_300_pages", |b| {
        b.iter(|| markup::decode(xml.as_bytes()).unwrap());
    });
}

fn bench_extract(c: &mut Criterion) {
    let xml = synthetic_document(300, 40);
    let root = markup::decode(xml.as_bytes()).unwrap();
    let facsimile = root.child("facsimile").unwrap();
    let body = root.descend(&["text", "body"]).unwrap();
    let options = ParseOptions::default();

    c.bench_function("extract_surfaces_300_pages", |b| {
        b.iter(|| extract_surfaces(facsimile, &options, &mut Vec::new()));
    });
    c.bench_function("extract_segments_300_pages", |b| {
        b.iter(|| extract_segments(body));
    });
}

criterion_group!(
    benches,
    // Whole pipeline
    bench_parse_fixture,
    bench_parse_large,
    bench_parse_large_follow_page_break,
    // Stages
    bench_decode,
    bench_extract,
);
criterion_main!(benches);
