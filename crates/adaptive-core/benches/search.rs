use std::hint::black_box;
use std::time::Duration;

use adaptive_core::board::Board;
use adaptive_core::disc::Disc;
use adaptive_core::rules::{RuleFlags, RuleOracle};
use adaptive_core::search::Search;
use adaptive_core::search::mcts::{Mcts, MctsParams};
use adaptive_core::search::node_type::NonPV;
use adaptive_core::search::time_control::Deadline;
use adaptive_core::stability::stable_discs;
use adaptive_core::transposition_table::TranspositionTable;
use adaptive_core::weights::WeightMatrix;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn far() -> Deadline {
    Deadline::after(Duration::from_secs(3600))
}

fn bench_alphabeta(c: &mut Criterion) {
    let oracle = RuleOracle::standard();
    let board = Board::standard();
    let weights = WeightMatrix::structural(&board, RuleFlags::default());
    let search = Search::new(&oracle, &weights, RuleFlags::default());

    let mut group = c.benchmark_group("alphabeta");
    group.sample_size(10);
    for depth in [3u32, 4, 5] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut tt = TranspositionTable::new();
                let result = search.search_depth::<NonPV>(&mut tt, &board, Disc::Black, black_box(depth), far());
                black_box(result)
            });
        });
    }
    group.finish();
}

fn bench_mcts(c: &mut Criterion) {
    let oracle = RuleOracle::standard();
    let board = Board::standard();
    let params = MctsParams {
        rollout_plies: 20,
        reward_scale: 50.0,
        max_iterations: Some(500),
    };

    let mut group = c.benchmark_group("mcts");
    group.sample_size(10);
    group.bench_function("500_iterations", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| {
            let result = Mcts::new(&oracle, RuleFlags::default(), params, &mut rng).search(&board, Disc::Black, far());
            black_box(result.best_move)
        });
    });
    group.finish();
}

fn bench_stability(c: &mut Criterion) {
    let board = Board::from_string(
        "XXXXXXXX\
         XOOOOOOX\
         XO----OX\
         XO-XO-OX\
         XO-OX-OX\
         XO----OX\
         XOOOOOOX\
         XXXXXXXX",
    )
    .unwrap();

    c.bench_function("stable_discs", |b| {
        b.iter(|| black_box(stable_discs(black_box(&board), Disc::Black, false)))
    });
}

criterion_group!(benches, bench_alphabeta, bench_mcts, bench_stability);
criterion_main!(benches);
