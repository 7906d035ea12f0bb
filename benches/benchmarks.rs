use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use xapian_spelling::corrector::{correct_word, CorrectorConfig};
use xapian_spelling::distance::{damerau_levenshtein, ExtendedEditDistance};
use xapian_spelling::facade::correct;
use xapian_spelling::keyboard::SpellingKeyboard;
use xapian_spelling::test::get_test_ngram_table;

pub fn benchmarks(c: &mut Criterion) {
    let inputs: &[&str] = &["helo", "wrold", "databse", "yrok", "benchmarking"];

    let mut group = c.benchmark_group("damerau_levenshtein");
    for input in inputs {
        let chars: Vec<char> = input.chars().collect();
        let other: Vec<char> = "benchmark".chars().collect();
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("cutoff2", format!("input {} chars", input.chars().count())),
            &chars,
            |b, chars| b.iter(|| damerau_levenshtein(black_box(chars), black_box(&other), 2)),
        );
    }
    group.finish();

    let mut group = c.benchmark_group("weighted_edit_distance");
    let keyboard = SpellingKeyboard::identity();
    for input in inputs {
        let chars: Vec<char> = input.chars().collect();
        let other: Vec<char> = "benchmark".chars().collect();
        group.bench_with_input(
            BenchmarkId::new("weighted", format!("input {} chars", input.chars().count())),
            &chars,
            |b, chars| {
                let mut eed = ExtendedEditDistance::new(keyboard.clone());
                b.iter(|| eed.edit_distance(black_box(chars), black_box(&other), 4))
            },
        );
    }
    group.finish();

    let mut group = c.benchmark_group("candidate_correction");
    for input in inputs {
        group.bench_with_input(BenchmarkId::new("correct_word", *input), input, |b, input| {
            let mut table = get_test_ngram_table();
            let config = CorrectorConfig::default();
            b.iter(|| correct_word(&mut table, &keyboard, None, black_box(input), &config))
        });
    }
    group.finish();

    let mut group = c.benchmark_group("sequence_correction");
    group.bench_function("two_token_sequence", |b| {
        let mut table = get_test_ngram_table();
        let tokens = vec!["new".to_string(), "yorj".to_string()];
        b.iter(|| correct(&mut table, &keyboard, None, black_box(&tokens), "", 3))
    });
    group.finish();
}

criterion_group!(spelling_benches, benchmarks);
criterion_main!(spelling_benches);
