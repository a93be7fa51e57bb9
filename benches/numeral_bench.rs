use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fieldkit::radix::Radix;

const HEX: &'static str = "0xdead_beef_dead_beef";
const DEC: &'static str = "18_446_744_073_709_551_615";

fn hex_bench(c: &mut Criterion) {
    c.bench_function("parse_hexadecimal", |b| {
        b.iter(|| black_box(Radix::hexadecimal().parse(HEX).unwrap()))
    });
}

fn auto_bench(c: &mut Criterion) {
    c.bench_function("parse_auto_detect", |b| {
        b.iter(|| black_box(Radix::auto().parse(HEX).unwrap()))
    });
}

fn render_bench(c: &mut Criterion) {
    let val = Radix::decimal().parse(DEC).unwrap();
    c.bench_function("render_decimal", |b| {
        b.iter(|| black_box(val.to_base_string()))
    });
}

criterion_group! {
    name = numeral_benches;
    config = Criterion::default();
    targets = hex_bench, auto_bench, render_bench
}

criterion_main!(numeral_benches);
