use criterion::{Criterion, black_box, criterion_group, criterion_main};
use view_parser::codec::{decode, encode};
use view_parser::{NoopHandler, Parser, ParserConfig, record};
use view_parser_test_support::perf_fixtures::{
    make_blocks, make_quoted_gt_chain, make_raw_text_adversarial, make_unclosed_literals,
    make_unclosed_openers,
};

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;

fn quiet() -> Parser {
    Parser::new(ParserConfig::default().quiet())
}

fn bench_parse_small(c: &mut Criterion) {
    let input = make_blocks(SMALL_BLOCKS);
    let parser = quiet();
    c.bench_function("bench_parse_small", |b| {
        b.iter(|| {
            let _ = parser.parse(black_box(&input), &mut NoopHandler);
        });
    });
}

fn bench_parse_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    let parser = quiet();
    c.bench_function("bench_parse_large", |b| {
        b.iter(|| {
            let _ = parser.parse(black_box(&input), &mut NoopHandler);
        });
    });
}

fn bench_record_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    let parser = quiet();
    c.bench_function("bench_record_large", |b| {
        b.iter(|| {
            let stream = parser.record(black_box(&input)).expect("record");
            black_box(stream.len());
        });
    });
}

fn bench_replay_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    let stream = record(&input).expect("record");
    c.bench_function("bench_replay_large", |b| {
        b.iter(|| {
            let Ok(replayed) = black_box(&stream).replay(&mut NoopHandler);
            black_box(replayed.len());
        });
    });
}

fn bench_parse_raw_text_adversarial(c: &mut Criterion) {
    let input = make_raw_text_adversarial(512 * 1024);
    let parser = quiet();
    c.bench_function("bench_parse_raw_text_adversarial", |b| {
        b.iter(|| {
            let _ = parser.parse(black_box(&input), &mut NoopHandler);
        });
    });
}

fn bench_parse_unclosed_openers(c: &mut Criterion) {
    let input = make_unclosed_openers(20_000);
    let parser = quiet();
    c.bench_function("bench_parse_unclosed_openers", |b| {
        b.iter(|| {
            let _ = parser.parse(black_box(&input), &mut NoopHandler);
        });
    });
}

fn bench_parse_quoted_gt_chain(c: &mut Criterion) {
    let input = make_quoted_gt_chain(20_000);
    let parser = quiet();
    c.bench_function("bench_parse_quoted_gt_chain", |b| {
        b.iter(|| {
            let _ = parser.parse(black_box(&input), &mut NoopHandler);
        });
    });
}

fn bench_parse_unclosed_literals(c: &mut Criterion) {
    let input = make_unclosed_literals(20_000);
    let parser = quiet();
    c.bench_function("bench_parse_unclosed_literals", |b| {
        b.iter(|| {
            let _ = parser.parse(black_box(&input), &mut NoopHandler);
        });
    });
}

fn bench_codec_round_trip(c: &mut Criterion) {
    let names = [
        "class",
        "on:fooBar",
        "(click)",
        "{(value)}",
        "@submit",
        "model:to",
        "data-$index",
        "viewBox",
    ];
    c.bench_function("bench_codec_round_trip", |b| {
        b.iter(|| {
            for name in names {
                let encoded = encode(black_box(name));
                black_box(decode(&encoded).len());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_parse_small,
    bench_parse_large,
    bench_record_large,
    bench_replay_large,
    bench_parse_raw_text_adversarial,
    bench_parse_unclosed_openers,
    bench_parse_quoted_gt_chain,
    bench_parse_unclosed_literals,
    bench_codec_round_trip
);
criterion_main!(benches);
