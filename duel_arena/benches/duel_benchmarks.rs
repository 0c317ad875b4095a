use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use duel_arena::{
    game::{GameState, apply_move},
    payout::{CommissionRate, compute_net_payout},
    records::{MatchRecord, aggregate_stats},
};
use std::hint::black_box;

/// Build `n` records spread over 50 users, alternating wins and draws
fn make_records(n: usize) -> Vec<MatchRecord> {
    (0..n)
        .map(|i| {
            let a = (i % 50) as i64;
            let b = ((i + 7) % 50) as i64;
            let b = if a == b { b + 50 } else { b };
            if i % 3 == 0 {
                MatchRecord::draw(a, b, 10 + i as i64)
            } else {
                MatchRecord::win(a, b, 10 + i as i64, a)
            }
        })
        .collect()
}

/// Benchmark a full nine-move drawn game
fn bench_full_game(c: &mut Criterion) {
    let cells = [0, 1, 2, 4, 3, 5, 7, 6, 8];

    c.bench_function("full_drawn_game", |b| {
        b.iter_batched(
            || GameState::new(1, 2, 1).unwrap(),
            |mut state| {
                for cell in cells {
                    let mover = state.active_participant();
                    let _ = apply_move(&mut state, mover, black_box(cell));
                }
                state
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_net_payout(c: &mut Criterion) {
    let rate = CommissionRate::default();
    c.bench_function("compute_net_payout", |b| {
        b.iter(|| compute_net_payout(black_box(12_345), rate));
    });
}

/// Benchmark stats aggregation over growing record histories
fn bench_aggregate_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_stats");
    let rate = CommissionRate::default();

    for n_records in [100, 1_000, 10_000].iter() {
        let records = make_records(*n_records);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_records", n_records)),
            &records,
            |b, records| {
                b.iter(|| aggregate_stats(records, rate));
            },
        );
    }

    group.finish();
}

criterion_group!(game_operations, bench_full_game, bench_net_payout);

criterion_group!(statistics, bench_aggregate_stats);

criterion_main!(game_operations, statistics);
