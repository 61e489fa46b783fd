use article_gateway::cache::{CacheStore, KeyPolicy};
use article_gateway::test_support::sample_article;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Arc;
use std::time::Duration;

const TTL: Duration = Duration::from_secs(12 * 60 * 60);

fn urls(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("https://news.example.com/2024/03/story-{i}?ref=feed"))
        .collect()
}

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_get_hit");
    for size in [100usize, 10_000] {
        let store = CacheStore::new(size, TTL).unwrap();
        let keys = urls(size);
        for key in &keys {
            store.set(key.clone(), Arc::new(sample_article(key)));
        }
        group.bench_with_input(BenchmarkId::from_parameter(size), &keys, |b, keys| {
            let mut i = 0;
            b.iter(|| {
                i = (i + 1) % keys.len();
                black_box(store.get(keys[i].as_str()))
            });
        });
    }
    group.finish();
}

fn bench_set_with_eviction(c: &mut Criterion) {
    let store = CacheStore::new(1_000, TTL).unwrap();
    let keys = urls(5_000);
    let article = Arc::new(sample_article("https://news.example.com/"));

    c.bench_function("cache_set_evicting", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % keys.len();
            store.set(keys[i].clone(), Arc::clone(&article));
        });
    });
}

fn bench_key_policy(c: &mut Criterion) {
    let url = "HTTPS://News.Example.com/2024/03/story/?utm_source=feed&a=1#comments";
    let mut group = c.benchmark_group("cache_key");
    for policy in [KeyPolicy::Literal, KeyPolicy::Normalized] {
        group.bench_function(format!("{policy:?}"), |b| {
            b.iter(|| black_box(policy.cache_key(black_box(url))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_get_hit, bench_set_with_eviction, bench_key_policy);
criterion_main!(benches);
