//! Command parsing throughput benchmarks.

use criterion::{Criterion, criterion_group, criterion_main};
use mctl_commander::{CommandReader, MemoryTransport};
use std::hint::black_box;

fn bench_parse(c: &mut Criterion, name: &str, line: &str) {
    let mut reader = CommandReader::new(MemoryTransport::<256>::empty());
    reader.begin();

    c.bench_function(name, |b| {
        b.iter(|| {
            reader.transport_mut().feed_str(black_box(line));
            black_box(reader.read_command())
        });
    });
}

fn bench_zero_params(c: &mut Criterion) {
    bench_parse(c, "parse_home", "HOME\n");
}

fn bench_four_params(c: &mut Criterion) {
    bench_parse(c, "parse_move_4", "move 1 -2000 2147483647 -2147483648\r\n");
}

fn bench_malformed(c: &mut Criterion) {
    bench_parse(c, "parse_malformed", "SET abc 12x -- 7\n");
}

criterion_group!(benches, bench_zero_params, bench_four_params, bench_malformed);
criterion_main!(benches);
