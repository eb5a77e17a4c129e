//! Tokenizer and profile curation benchmarks.
//!
//! Measures segmentation throughput and trimming cost across profile sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lexibench::{Profile, Tokenizer};

const LETTERS: &[&str] = &["a", "e", "i", "o", "u", "p", "t", "k", "m", "n", "s", "l", "r"];

/// Generate a profile with single letters plus `digraphs` two-letter rules.
fn generate_profile(digraphs: usize) -> Profile {
    let mut pairs: Vec<(String, String)> = LETTERS
        .iter()
        .map(|l| (l.to_string(), l.to_string()))
        .collect();
    'outer: for first in LETTERS {
        for second in LETTERS {
            if pairs.len() >= LETTERS.len() + digraphs {
                break 'outer;
            }
            pairs.push((format!("{}{}", first, second), format!("{} {}", first, second)));
        }
    }
    Profile::from_mapping(pairs).unwrap()
}

/// Generate pseudo-random forms over the profile alphabet.
fn generate_forms(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            (0..(4 + i % 8))
                .map(|j| LETTERS[(i * 7 + j * 3) % LETTERS.len()])
                .collect()
        })
        .collect()
}

/// Benchmark tokenizing forms with profiles of various sizes.
fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    let forms = generate_forms(1_000);
    let chars: usize = forms.iter().map(|f| f.chars().count()).sum();

    for digraphs in [0, 50, 150].iter() {
        let tokenizer = Tokenizer::new(generate_profile(*digraphs));

        group.throughput(Throughput::Elements(chars as u64));
        group.bench_with_input(BenchmarkId::new("digraphs", digraphs), &forms, |b, forms| {
            b.iter(|| {
                for form in forms {
                    black_box(tokenizer.tokenize(form, "IPA").unwrap());
                }
            })
        });
    }

    group.finish();
}

/// Benchmark trimming to a fixed point.
fn bench_trim(c: &mut Criterion) {
    let mut group = c.benchmark_group("trim");

    for digraphs in [10, 50, 150].iter() {
        let profile = generate_profile(*digraphs);
        group.bench_with_input(BenchmarkId::new("digraphs", digraphs), &profile, |b, profile| {
            b.iter_with_setup(
                || profile.clone(),
                |mut profile| {
                    while profile.trim("IPA").unwrap() > 0 {}
                    black_box(profile)
                },
            )
        });
    }

    group.finish();
}

/// Benchmark counting grapheme usage over a corpus.
fn bench_augment(c: &mut Criterion) {
    let mut group = c.benchmark_group("augment");
    let profile = generate_profile(50);

    for count in [100, 1_000, 10_000].iter() {
        let forms = generate_forms(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("forms", count), &forms, |b, forms| {
            b.iter_with_setup(
                || profile.clone(),
                |mut profile| {
                    profile.augment(forms, None, "IPA", 5);
                    black_box(profile)
                },
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_trim, bench_augment);
criterion_main!(benches);
