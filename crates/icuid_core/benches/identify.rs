use criterion::{black_box, criterion_group, criterion_main, Criterion};

use icuid_core::{backend::ReplayCpu, *};

const COFFEE_LAKE : &str = include_str!("../tests/data/coffee_lake.txt");
const RYZEN_1700 : &str = include_str!("../tests/data/ryzen_1700.txt");

fn decode_benchmark(c: &mut Criterion) {
    let coffee_lake = deserialize(COFFEE_LAKE.split(EXPECTED_RESULTS_HEADER).next().unwrap_or_default()).unwrap();
    let ryzen = deserialize(RYZEN_1700.split(EXPECTED_RESULTS_HEADER).next().unwrap_or_default()).unwrap();

    c.bench_function("decode: coffee lake", |b| b.iter(|| decode(black_box(&coffee_lake), || 0x7)));
    c.bench_function("decode: ryzen 1700", |b| b.iter(|| decode(black_box(&ryzen), || 0x7)));

    let replay = ReplayCpu::new(coffee_lake.clone());
    c.bench_function("acquire: replayed coffee lake", |b| b.iter(|| acquire_raw_with(black_box(&replay))));
}

fn serializer_benchmark(c: &mut Criterion) {
    let raw = deserialize(RYZEN_1700.split(EXPECTED_RESULTS_HEADER).next().unwrap_or_default()).unwrap();
    let text = serialize(&raw);

    c.bench_function("serialize", |b| b.iter(|| serialize(black_box(&raw))));
    c.bench_function("deserialize", |b| b.iter(|| deserialize(black_box(&text))));
}

criterion_group!(benches, decode_benchmark, serializer_benchmark);
criterion_main!(benches);
