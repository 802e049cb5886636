//! Benchmarks for AlgoPiece models
//!
//! Measures performance of:
//! - Custom edge-list parsing
//! - Graph construction from edges
//! - Random sequence generation

use algopiece_model::{parse_edge_list, random_sequence, Edge, GraphModel, SequenceConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A ring with chords, written in the custom edge-list format.
fn edge_list(nodes: u64) -> String {
    (0..nodes)
        .flat_map(|i| {
            [
                format!("{}-{}-{}", i, (i + 1) % nodes, i % 7 + 1),
                format!("{}-{}", i, (i + nodes / 2) % nodes),
            ]
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_edge_list");

    for &nodes in &[8u64, 64, 512] {
        let text = edge_list(nodes);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &text, |b, text| {
            b.iter(|| parse_edge_list(black_box(text)))
        });
    }
    group.finish();
}

fn bench_from_edges(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_from_edges");

    for &nodes in &[8u64, 64, 512] {
        let edges: Vec<Edge> = (0..nodes)
            .map(|i| Edge::new(i, (i * 7 + 3) % nodes, i % 5 + 1))
            .collect();
        group.throughput(Throughput::Elements(edges.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &edges, |b, edges| {
            b.iter(|| GraphModel::from_edges(black_box(edges.iter().copied())))
        });
    }
    group.finish();
}

fn bench_sequence(c: &mut Criterion) {
    let config = SequenceConfig::default();
    let mut rng = StdRng::seed_from_u64(1);
    c.bench_function("random_sequence_default", |b| {
        b.iter(|| random_sequence(black_box(&config), &mut rng))
    });
}

criterion_group!(benches, bench_parse, bench_from_edges, bench_sequence);
criterion_main!(benches);
