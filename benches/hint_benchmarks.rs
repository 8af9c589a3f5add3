use criterion::{Criterion, black_box, criterion_group, criterion_main};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use vocadr::engine::hints::{compute_hints, masked_chars};
use vocadr::engine::normalize::answers_match;
use vocadr::engine::queue::{QueuePolicy, SessionQueue};
use vocadr::provider::PracticeItem;

fn make_items(count: usize) -> Vec<PracticeItem> {
    (0..count)
        .map(|i| PracticeItem {
            id: format!("item-{i}"),
            prompt: format!("prompt {i}"),
            answer: format!("answer{i:04}"),
            note: None,
        })
        .collect()
}

fn bench_hints(c: &mut Criterion) {
    let answers = [
        "chat",
        "aujourd'hui",
        "école",
        "anticonstitutionnellement",
        "mañana",
    ];

    c.bench_function("compute_hints (5 answers x 6 levels)", |b| {
        b.iter(|| {
            for answer in &answers {
                for level in 0..6 {
                    black_box(compute_hints(black_box(answer), level));
                }
            }
        })
    });

    let mask = compute_hints("anticonstitutionnellement", 0);
    c.bench_function("masked_chars (25-char answer)", |b| {
        b.iter(|| masked_chars(black_box("anticonstitutionnellement"), black_box(&mask)))
    });
}

fn bench_normalize(c: &mut Criterion) {
    // Decomposed accents force the normalizer down its slow path
    let submitted = "E\u{0301}cole maternelle franc\u{0327}aise";
    let target = "école maternelle française";

    c.bench_function("answers_match (decomposed accents)", |b| {
        b.iter(|| answers_match(black_box(submitted), black_box(target)))
    });
}

fn bench_queue_drain(c: &mut Criterion) {
    let items = make_items(500);

    c.bench_function("requeue drain (500 items, 20% misses)", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(9);
            let mut queue = SessionQueue::shuffled(items.clone(), QueuePolicy::Requeue, &mut rng);
            let mut turn = 0usize;
            while !queue.is_exhausted() {
                if turn % 5 == 0 && queue.current().is_some_and(|e| e.attempts == 0) {
                    queue.mark_incorrect();
                } else {
                    queue.mark_correct();
                }
                turn += 1;
            }
            (queue.correct_count(), queue.incorrect_count())
        })
    });
}

criterion_group!(benches, bench_hints, bench_normalize, bench_queue_drain);
criterion_main!(benches);
