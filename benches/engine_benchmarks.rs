//! Benchmarks for the search core's hot paths: move generation, perft,
//! static evaluation, and full searches at a handful of depths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use falcon_core::eval::{self, nnue::NnueNetwork};
use falcon_core::movegen;
use falcon_core::{Engine, Limits, Position};

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let mut startpos = Position::startpos();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| movegen::perft(&mut startpos, black_box(depth)))
        });
    }

    let mut kiwipete =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| movegen::perft(&mut kiwipete, black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let mut startpos = Position::startpos();
    group.bench_function("startpos", |b| b.iter(|| black_box(movegen::generate_legal(&mut startpos))));

    let mut middlegame =
        Position::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4").unwrap();
    group.bench_function("middlegame", |b| b.iter(|| black_box(movegen::generate_legal(&mut middlegame))));

    let mut kiwipete =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    group.bench_function("kiwipete", |b| b.iter(|| black_box(movegen::generate_legal(&mut kiwipete))));

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for depth in [3, 4, 5] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut engine = Engine::init(16).unwrap();
                engine.go_sync(Limits {
                    depth: Some(depth),
                    ..Default::default()
                })
            })
        });
    }

    for depth in [3, 4] {
        group.bench_with_input(BenchmarkId::new("tactical", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut engine = Engine::init(16).unwrap();
                engine
                    .set_position("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4", &[])
                    .unwrap();
                engine.go_sync(Limits {
                    depth: Some(depth),
                    ..Default::default()
                })
            })
        });
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");

    let positions = [
        ("startpos", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
        ("middlegame", "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4"),
        ("endgame", "8/5k2/8/8/8/8/5K2/4R3 w - - 0 1"),
    ];

    let network = NnueNetwork::zeroed();
    for (name, fen) in positions {
        let pos = Position::from_fen(fen).unwrap();
        let acc = eval::refresh_accumulator(&pos, &network);
        group.bench_with_input(BenchmarkId::new("position", name), &pos, |b, pos| {
            b.iter(|| black_box(eval::network_eval(pos, &acc, &network)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen, bench_search, bench_eval);
criterion_main!(benches);
