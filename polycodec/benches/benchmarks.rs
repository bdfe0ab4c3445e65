use {
    criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput},
    polycodec::{
        binary::{self, BinaryCodec},
        codec::{self, Codec, Transcode},
        io::BinaryBuffer,
        transcoder::{
            json::JsonTranscoder,
            value::{Value, ValueTranscoder},
        },
    },
};

#[derive(Clone)]
struct Record {
    id: i64,
    score: i32,
    flag: bool,
    label: String,
    samples: Vec<i32>,
}

fn record(i: usize) -> Record {
    Record {
        id: i as i64,
        score: (i * 7) as i32,
        flag: i % 2 == 0,
        label: format!("record-{i}"),
        samples: (0..16).map(|n| (n * i) as i32).collect(),
    }
}

fn binary_record() -> impl BinaryCodec<Value = Record> {
    binary::product(
        (
            binary::field(binary::Long, |r: &Record| &r.id),
            binary::field(binary::VarInt, |r: &Record| &r.score),
            binary::field(binary::Boolean, |r: &Record| &r.flag),
            binary::field(binary::Str::new(), |r: &Record| &r.label),
            binary::field(binary::VarInt.list(), |r: &Record| &r.samples),
        ),
        |(id, score, flag, label, samples)| Record {
            id,
            score,
            flag,
            label,
            samples,
        },
    )
}

fn struct_record<D>() -> impl Transcode<D, Value = Record> {
    codec::structure(
        (
            codec::named("id", codec::Long, |r: &Record| &r.id),
            codec::named("score", codec::Int, |r: &Record| &r.score),
            codec::named("flag", codec::Bool, |r: &Record| &r.flag),
            codec::named("label", codec::Str, |r: &Record| &r.label),
            codec::named("samples", codec::Int.list(), |r: &Record| &r.samples),
        ),
        |(id, score, flag, label, samples)| Record {
            id,
            score,
            flag,
            label,
            samples,
        },
    )
}

fn bench_varint(c: &mut Criterion) {
    let mut group = c.benchmark_group("VarInt");
    group.throughput(Throughput::Elements(1));

    for value in [0, 300, i32::MAX, -1] {
        let bytes = binary::VarInt.serialize(&value).unwrap();
        group.bench_with_input(BenchmarkId::new("write", value), &value, |b, value| {
            let mut buffer = BinaryBuffer::with_capacity(5);
            b.iter(|| {
                buffer.clear();
                binary::VarInt.write(&mut buffer, black_box(value)).unwrap();
            });
        });
        group.bench_with_input(BenchmarkId::new("read", value), &bytes, |b, bytes| {
            b.iter(|| binary::VarInt.deserialize(black_box(bytes)).unwrap());
        });
    }

    group.finish();
}

fn bench_binary_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("BinaryRecords");
    let codec = binary_record().list();

    for size in [10, 100, 1_000] {
        let records: Vec<_> = (0..size).map(record).collect();
        let bytes = codec.serialize(&records).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("serialize", size), &records, |b, records| {
            b.iter(|| codec.serialize(black_box(records)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("deserialize", size), &bytes, |b, bytes| {
            b.iter(|| codec.deserialize(black_box(bytes)).unwrap());
        });
    }

    group.finish();
}

fn bench_transcoders(c: &mut Criterion) {
    let mut group = c.benchmark_group("StructRecords");
    let records: Vec<_> = (0..100).map(record).collect();
    group.throughput(Throughput::Elements(records.len() as u64));

    let value_codec = struct_record::<Value>().list();
    let value_data = value_codec.encode(&ValueTranscoder, &records).unwrap();
    group.bench_function("value/encode", |b| {
        b.iter(|| value_codec.encode(&ValueTranscoder, black_box(&records)).unwrap());
    });
    group.bench_function("value/decode", |b| {
        b.iter(|| value_codec.decode(&ValueTranscoder, black_box(&value_data)).unwrap());
    });

    let json_codec = struct_record::<serde_json::Value>().list();
    let json_data = json_codec.encode(&JsonTranscoder, &records).unwrap();
    group.bench_function("json/encode", |b| {
        b.iter(|| json_codec.encode(&JsonTranscoder, black_box(&records)).unwrap());
    });
    group.bench_function("json/decode", |b| {
        b.iter(|| json_codec.decode(&JsonTranscoder, black_box(&json_data)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_varint, bench_binary_records, bench_transcoders);
criterion_main!(benches);
