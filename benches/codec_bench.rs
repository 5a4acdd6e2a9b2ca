//! Benchmarks for account decoding, address derivation and quoting

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use market_adapter::accounts::{AccountRecord, Market, RaceMarket};
use market_adapter::pda::AddressDeriver;
use market_adapter::quote::PariMutuelQuoter;
use market_adapter::test_utils::fixtures;
use market_adapter::types::ProgramContext;

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for len in [16usize, 64, 200] {
        let mut market = fixtures::sample_market();
        market.question = "q".repeat(len);
        let bytes = fixtures::encode_market(&market);
        group.bench_with_input(BenchmarkId::new("market", len), &bytes, |b, bytes| {
            b.iter(|| black_box(Market::decode(black_box(bytes))))
        });
    }

    let race = fixtures::encode_race_market(&fixtures::sample_race_market());
    group.bench_function("race_market", |b| {
        b.iter(|| black_box(RaceMarket::decode(black_box(&race))))
    });

    group.finish();
}

fn bench_derive(c: &mut Criterion) {
    let deriver = AddressDeriver::new(&ProgramContext::default());
    let owner = fixtures::key(20);
    c.bench_function("derive_position", |b| {
        b.iter(|| black_box(deriver.position(black_box(42), &owner)))
    });
}

fn bench_quote(c: &mut Criterion) {
    let quoter = PariMutuelQuoter::new(250).unwrap();
    c.bench_function("quote_binary", |b| {
        b.iter(|| {
            black_box(quoter.quote_binary(
                black_box(100_000_000_000),
                black_box(100_000_000_000),
                true,
                black_box(10_000_000_000),
            ))
        })
    });
}

criterion_group!(benches, bench_decode, bench_derive, bench_quote);
criterion_main!(benches);
