//! Performance benchmarks for Literate parsing.
//!
//! Measures tokenization alone and the full parse (tokenize + resolve) over
//! a synthetic document, plus the merge path of re-parsing into a graph that
//! already contains every node.
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, Criterion};
use onya_core::{
    graph::Graph,
    literate::{lex, parse, ParseOptions},
};
use std::fmt::Write;

/// Build a document with `blocks` header blocks, each carrying properties,
/// an edge to the next block's subject, and one nested annotation.
fn synthetic_document(blocks: usize) -> String {
    let mut text = String::from(
        "# @docheader\n\
         * @document: http://example.org/bench/\n\
         * @schema: https://schema.org/\n\n",
    );
    for i in 0..blocks {
        let _ = write!(
            text,
            "# node-{i} [Thing]\n\
             * name: Node number {i}\n\
             * description: A synthetic node for benchmarking\n\
             * next -> node-{}\n  * order: {i}\n\n",
            (i + 1) % blocks
        );
    }
    text
}

fn bench_tokenize(c: &mut Criterion) {
    let text = synthetic_document(100);
    c.bench_function("tokenize_100_blocks", |b| {
        b.iter(|| lex::tokenize(&text).unwrap().len());
    });
}

fn bench_parse(c: &mut Criterion) {
    let text = synthetic_document(100);
    let options = ParseOptions::default();
    c.bench_function("parse_100_blocks", |b| {
        b.iter(|| {
            let mut graph = Graph::new();
            parse(&text, &mut graph, &options).unwrap();
            graph.len()
        });
    });
}

fn bench_parse_with_provenance(c: &mut Criterion) {
    let text = synthetic_document(100);
    let options = ParseOptions {
        document_source_assertions: true,
    };
    c.bench_function("parse_100_blocks_with_provenance", |b| {
        b.iter(|| {
            let mut graph = Graph::new();
            parse(&text, &mut graph, &options).unwrap();
            graph.size()
        });
    });
}

fn bench_reparse_merge(c: &mut Criterion) {
    let text = synthetic_document(100);
    let options = ParseOptions::default();
    let mut graph = Graph::new();
    parse(&text, &mut graph, &options).unwrap();

    c.bench_function("reparse_into_populated_graph", |b| {
        b.iter(|| {
            let mut merged = graph.clone();
            let result = parse(&text, &mut merged, &options).unwrap();
            result.nodes_added.len()
        });
    });
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_parse,
    bench_parse_with_provenance,
    bench_reparse_merge
);
criterion_main!(benches);
