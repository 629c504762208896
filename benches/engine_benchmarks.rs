//! Benchmarks for move generation, search, and static evaluation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_core::engine::{Engine, EngineConfig};
use chess_core::eval::{Evaluator, MaterialEvaluator};
use chess_core::position::Position;
use chess_core::search::{search_with_defaults, SearchConfig};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const MIDDLEGAME: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let mut startpos = Position::new();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| startpos.perft(black_box(depth)))
        });
    }

    let mut kiwipete = Position::from_fen(KIWIPETE).unwrap();
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| kiwipete.perft(black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let startpos = Position::new();
    group.bench_function("startpos", |b| b.iter(|| black_box(startpos.generate_legal_moves())));

    let middlegame = Position::from_fen(MIDDLEGAME).unwrap();
    group.bench_function("middlegame", |b| b.iter(|| black_box(middlegame.generate_legal_moves())));

    let kiwipete = Position::from_fen(KIWIPETE).unwrap();
    group.bench_function("kiwipete", |b| b.iter(|| black_box(kiwipete.generate_legal_moves())));

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for depth in [3, 4, 5] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut pos = Position::new();
                let config = SearchConfig { max_depth: depth, ..SearchConfig::default() };
                search_with_defaults(&mut pos, &config)
            })
        });
    }

    for depth in [3, 4] {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut pos = Position::from_fen(KIWIPETE).unwrap();
                let config = SearchConfig { max_depth: depth, ..SearchConfig::default() };
                search_with_defaults(&mut pos, &config)
            })
        });
    }

    group.finish();
}

fn bench_engine_reuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.sample_size(10);

    group.bench_function("repeated_searches_share_tt", |b| {
        b.iter(|| {
            let mut engine = Engine::new(EngineConfig { tt_size_mb: 16, max_depth: 4, ..EngineConfig::default() });
            let mut pos = Position::new();
            for (from, to) in [("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6")] {
                let mv = pos
                    .parse_uci(&format!("{from}{to}"))
                    .expect("benchmark move must be legal");
                let mut applied = mv;
                pos.make_move(&mut applied);
                engine.record_position(&pos);
                black_box(engine.search(&mut pos, None));
            }
        })
    });

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");
    let evaluator = MaterialEvaluator;

    let positions = [
        ("startpos", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
        ("middlegame", MIDDLEGAME),
        ("endgame", "8/5k2/8/8/8/8/5K2/4R3 w - - 0 1"),
    ];

    for (name, fen) in positions {
        let pos = Position::from_fen(fen).unwrap();
        group.bench_with_input(BenchmarkId::new("position", name), &pos, |b, pos| {
            b.iter(|| black_box(evaluator.evaluate(pos)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen, bench_search, bench_engine_reuse, bench_eval);
criterion_main!(benches);
