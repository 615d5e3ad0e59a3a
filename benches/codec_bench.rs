use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use thriftwire::reader::Reader;
use thriftwire::{from_bytes, skip, to_bytes, Field, Map, Struct, WireType, WireValue};


/// A list of records shaped like a typical RPC response.
fn sample(records: usize) -> WireValue {
    let record = |i: usize| WireValue::from(Struct::new([
        Field::new(1, WireValue::I64(i as i64)),
        Field::new(2, WireValue::from(format!("user-{}", i).as_str())),
        Field::new(3, WireValue::Double(i as f64 * 0.25)),
        Field::new(4, WireValue::Bool(i % 2 == 0)),
        Field::new(5, WireValue::Map(Map::new(WireType::Binary, WireType::I32, [
            (WireValue::from("score"), WireValue::I32(i as i32)),
            (WireValue::from("rank"), WireValue::I32(-(i as i32))),
        ]))),
    ]));
    WireValue::list(WireType::Struct, (0..records).map(record))
}

fn bench_codec(c: &mut Criterion) {
    let value = sample(1000);
    let bytes = to_bytes(&value).unwrap();

    let mut group = c.benchmark_group("binary");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("encode", |b| {
        b.iter(|| to_bytes(black_box(&value)).unwrap());
    });

    group.bench_function("decode", |b| {
        b.iter(|| from_bytes(WireType::List, black_box(&bytes)).unwrap());
    });

    group.bench_function("skip", |b| {
        b.iter(|| skip(WireType::List, Reader::new(black_box(&bytes[..]))).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
