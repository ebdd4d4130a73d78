use std::hint::black_box;
use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ipcwire_transport::FrameCodec;

const SIZES: [usize; 4] = [64, 4 * 1024, 64 * 1024, 1024 * 1024];

fn bench_write_frame(c: &mut Criterion) {
    let codec = FrameCodec::default();
    let mut group = c.benchmark_group("write_frame");
    for size in SIZES {
        let payload = vec![0xABu8; size];
        let mut wire = Vec::with_capacity(size + 4);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| {
                wire.clear();
                if codec.write_frame(&mut wire, black_box(payload)).is_err() {
                    panic!("write_frame failed");
                }
            });
        });
    }
    group.finish();
}

fn bench_read_frame(c: &mut Criterion) {
    let codec = FrameCodec::default();
    let mut group = c.benchmark_group("read_frame");
    for size in SIZES {
        let Ok(wire) = codec.encode(&vec![0xCDu8; size]) else {
            panic!("encode failed");
        };
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &wire, |b, wire| {
            b.iter(|| black_box(codec.read_frame(&mut Cursor::new(wire.as_slice()))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_write_frame, bench_read_frame);
criterion_main!(benches);
