//! All-pairs link re-thresholding through the MLP oracle.

use classforge::links::recompute_links;
use classforge::model::{Assignment, RelationType};
use classforge::oracle::{BatchNormWeights, DenseWeights, EmbeddingTable, MlpLinkOracle, MlpWeights};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EMBEDDING_DIM: usize = 32;
const HIDDEN: usize = 64;

fn dense(rng: &mut StdRng, out_dim: usize, in_dim: usize) -> DenseWeights {
    DenseWeights {
        weight: (0..out_dim)
            .map(|_| (0..in_dim).map(|_| rng.gen_range(-0.2..0.2)).collect())
            .collect(),
        bias: (0..out_dim).map(|_| rng.gen_range(-0.1..0.1)).collect(),
    }
}

fn norm(dim: usize) -> BatchNormWeights {
    BatchNormWeights {
        gamma: vec![1.0; dim],
        beta: vec![0.0; dim],
        running_mean: vec![0.0; dim],
        running_var: vec![1.0; dim],
        eps: 1e-5,
    }
}

fn oracle(rng: &mut StdRng) -> MlpLinkOracle {
    let weights = MlpWeights {
        fc1: dense(rng, HIDDEN, 2 * EMBEDDING_DIM),
        bn1: norm(HIDDEN),
        fc2: dense(rng, HIDDEN, HIDDEN),
        bn2: norm(HIDDEN),
        out: dense(rng, RelationType::ALL.len(), HIDDEN),
    };
    MlpLinkOracle::from_weights(&weights).unwrap()
}

fn link_scan_benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let oracle = oracle(&mut rng);

    let mut group = c.benchmark_group("recompute_links");
    for n in [50usize, 150, 300] {
        let rows: Vec<Vec<f32>> = (0..n)
            .map(|_| (0..EMBEDDING_DIM).map(|_| rng.gen_range(-1.0..1.0)).collect())
            .collect();
        let embeddings = EmbeddingTable::from_rows(rows).unwrap();
        let assignment = Assignment::new((0..n).map(|i| (i % 4) as u32).collect());

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                recompute_links(
                    &oracle,
                    black_box(&embeddings),
                    black_box(&assignment),
                    &RelationType::ALL,
                    0.53,
                    0.69,
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, link_scan_benchmarks);
criterion_main!(benches);
