use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rangex_compiler::*;
use rangex_runtime::Encoding;

fn pad_pattern_to_length_with(prefix: &str, pad_str: &str, len: usize) -> String {
    let prefix_len = prefix.chars().count();

    if prefix_len > len {
        "".to_string()
    } else {
        prefix
            .chars()
            .chain(pad_str.chars().cycle().take(len - prefix_len))
            .collect()
    }
}

pub fn exponential_pattern_size_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern length compilation comparison");
    let pad = "ab";

    (1..10)
        .map(|exponent| 2usize.pow(exponent))
        .map(|pattern_len| (pad_pattern_to_length_with("^", pad, pattern_len), pattern_len))
        .for_each(|(pattern, sample_size)| {
            group.throughput(Throughput::Elements(sample_size as u64));
            group.bench_with_input(
                BenchmarkId::new("pattern input length of size", sample_size),
                &pattern,
                |b, pattern| {
                    b.iter(|| {
                        let res = build(pattern, Encoding::Ascii);
                        assert!(res.is_ok())
                    })
                },
            );
        })
}

criterion_group!(benches, exponential_pattern_size_comparison);
criterion_main!(benches);
