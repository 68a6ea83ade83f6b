use bitfloat::{
    components, encode16, format_decimal, step, toggle_bit, Direction,
    Precision,
};

fn test_encode16() {
    let mut val = 0.0;
    for i in 0..1000 {
        val += encode16(i as f64 * 1.37) as f64;
    }
    black_box(val);
}

fn test_components() {
    for p in Precision::ALL {
        black_box(components(std::f64::consts::PI, p));
    }
}

fn test_format_decimal_max() {
    black_box(format_decimal(f64::MAX));
}

fn test_format_decimal_min() {
    black_box(format_decimal(5e-324));
}

fn test_step_walk() {
    let mut val = 1.0;
    for _ in 0..1000 {
        val = step(val, Precision::Single, Direction::Next);
    }
    black_box(val);
}

fn test_toggle_all_bits() {
    for i in 0..64 {
        black_box(toggle_bit(0.1, Precision::Double, i).unwrap());
    }
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("test_encode16", |b| b.iter(test_encode16));
    c.bench_function("test_components", |b| b.iter(test_components));
    c.bench_function("test_format_decimal_max", |b| {
        b.iter(test_format_decimal_max)
    });
    c.bench_function("test_format_decimal_min", |b| {
        b.iter(test_format_decimal_min)
    });
    c.bench_function("test_step_walk", |b| b.iter(test_step_walk));
    c.bench_function("test_toggle_all_bits", |b| b.iter(test_toggle_all_bits));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
