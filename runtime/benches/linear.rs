use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rangex_runtime::*;

fn pad_input_to_length_with(suffix: &str, pad_str: &str, len: usize) -> String {
    let suffix_len = suffix.chars().count();

    if suffix_len > len {
        "".to_string()
    } else {
        pad_str
            .chars()
            .cycle()
            .take(len - suffix_len)
            .chain(suffix.chars())
            .collect()
    }
}

/// A hand-assembled automaton for the literal `ab`.
fn literal_ab() -> Automaton {
    let partition = RangePartition::new(Encoding::Ascii, ['a', 'b']);
    let a = partition.locate('a').unwrap();
    let b = partition.locate('b').unwrap();

    let mut automaton = Automaton::with_partition(partition);
    let states: Vec<_> = (0..4).map(|_| automaton.add_state()).collect();
    automaton.add_edge(states[0], a, states[1]);
    automaton.add_edge(states[1], b, states[2]);
    automaton.add_empty_edge(states[2], states[3]);
    automaton.set_endpoints(states[0], states[3]);
    automaton
}

pub fn linear_input_size_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("exponential input length comparison");
    let suffix = "ab";
    let pad = "xy";
    let automaton = literal_ab();

    (1..10)
        .map(|exponent| 2usize.pow(exponent))
        .map(|input_len| (pad_input_to_length_with(suffix, pad, input_len), input_len))
        .for_each(|(input, sample_size)| {
            group.throughput(Throughput::Elements(sample_size as u64));
            group.bench_with_input(
                BenchmarkId::new("input length of size", sample_size),
                &(input, sample_size),
                |b, (input, input_size)| {
                    let chars: Vec<char> = input.chars().collect();
                    let match_start = input_size - 2;

                    b.iter(|| {
                        let res = (0..chars.len()).find_map(|start| {
                            automaton
                                .next_match(&chars, start, chars.len(), StepLimit::UNBOUNDED)
                                .map(|found| (start, found.end))
                        });
                        assert_eq!(Some((match_start, *input_size)), res);
                    })
                },
            );
        })
}

criterion_group!(benches, linear_input_size_comparison);
criterion_main!(benches);
