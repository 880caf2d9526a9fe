//! Benchmarks for move generation, make/unmake, search, and evaluation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use duck_chess_engine::eval::{EvalKwargs, Evaluator, MaterialMobilityEvaluator};
use duck_chess_engine::position::PositionBuilder;
use duck_chess_engine::search::{SearchContext, SearchLimits, Tree};
use duck_chess_engine::Position;

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let startpos = Position::starting();
    group.bench_function("startpos_piece_turn", |b| {
        b.iter(|| black_box(startpos.generate_moves()))
    });

    let duck_turn = PositionBuilder::starting()
        .turn(duck_chess_engine::types::Side::WhiteDuck)
        .build();
    group.bench_function("startpos_duck_turn", |b| {
        b.iter(|| black_box(duck_turn.generate_moves()))
    });

    let middlegame = Position::from_fen(
        "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
    )
    .unwrap();
    group.bench_function("middlegame", |b| {
        b.iter(|| black_box(middlegame.generate_moves()))
    });

    let kiwipete = Position::from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    )
    .unwrap();
    group.bench_function("kiwipete", |b| {
        b.iter(|| black_box(kiwipete.generate_moves()))
    });

    group.finish();
}

fn bench_make_unmake(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_unmake");

    group.bench_function("quiet_pawn_push", |b| {
        b.iter_batched(
            Position::starting,
            |mut position| {
                let mv = duck_chess_engine::types::Move::quiet(
                    duck_chess_engine::types::PieceType::Pawn,
                    duck_chess_engine::types::Square::new(1, 4),
                    duck_chess_engine::types::Square::new(2, 4),
                );
                position.make_move(mv);
                position.unmake_move();
                black_box(position.zbr)
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("duck_placement", |b| {
        b.iter_batched(
            || {
                PositionBuilder::starting()
                    .turn(duck_chess_engine::types::Side::WhiteDuck)
                    .build()
            },
            |mut position| {
                let mv = duck_chess_engine::types::Move::duck(
                    None,
                    duck_chess_engine::types::Square::new(4, 3),
                );
                position.make_move(mv);
                position.unmake_move();
                black_box(position.zbr)
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for depth in [2, 3, 4] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut position = Position::starting();
                let evaluator = MaterialMobilityEvaluator;
                let kwargs = EvalKwargs::default();
                let limits = SearchLimits::new(depth);
                let mut ctx = SearchContext::new(&evaluator, &kwargs, &limits);
                let mut tree = Tree::new();
                black_box(ctx.search_best_move(&mut position, &mut tree))
            })
        });
    }

    for depth in [2, 3] {
        group.bench_with_input(BenchmarkId::new("tactical", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut position = Position::from_fen(
                    "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4",
                )
                .unwrap();
                let evaluator = MaterialMobilityEvaluator;
                let kwargs = EvalKwargs::default();
                let limits = SearchLimits::new(depth);
                let mut ctx = SearchContext::new(&evaluator, &kwargs, &limits);
                let mut tree = Tree::new();
                black_box(ctx.search_best_move(&mut position, &mut tree))
            })
        });
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");

    let positions = [
        ("startpos", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
        (
            "middlegame",
            "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
        ),
        ("endgame", "8/5k2/8/8/8/8/5K2/4R3 w - - 0 1"),
    ];

    let evaluator = MaterialMobilityEvaluator;
    let kwargs = EvalKwargs::default();
    for (name, fen) in positions {
        let position = Position::from_fen(fen).unwrap();
        group.bench_with_input(BenchmarkId::new("position", name), &position, |b, position| {
            b.iter(|| black_box(evaluator.evaluate(position, &kwargs)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_movegen, bench_make_unmake, bench_search, bench_eval);
criterion_main!(benches);
