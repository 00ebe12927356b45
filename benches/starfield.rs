//! Criterion benchmarks for galaxy generation and the frame pipeline.
//!
//! Run with:
//!   cargo bench
//!   cargo bench --features parallel
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use glam::Vec2;
use starfield::prelude::*;

fn make_records(n: u32) -> Vec<JourneyRecord> {
    const TOPICS: [&str; 5] = ["Array", "Hashing", "Stack", "Graph", "Dynamic Programming"];
    (1..=n)
        .map(|i| JourneyRecord {
            index: i,
            color: Rgb::from_u32(0x33_66_99 ^ i.wrapping_mul(2_654_435_761)),
            problems: vec![ProblemRecord {
                name: format!("Problem {i}"),
                link: String::new(),
                secondary_link: String::new(),
                difficulty: match i % 3 {
                    0 => Difficulty::Easy,
                    1 => Difficulty::Medium,
                    _ => Difficulty::Hard,
                },
                emojis: Vec::new(),
                notes: None,
                topics: vec![TOPICS[i as usize % TOPICS.len()].to_string()],
            }],
        })
        .collect()
}

fn bench_galaxy_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("galaxy_generate");

    for count in [5_000usize, 30_000, 100_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let params = GalaxyParams::default().with_count(count);
            b.iter(|| black_box(GalaxyCloud::generate(&params).len()));
        });
    }

    group.finish();
}

fn bench_run_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_frame");

    for stars in [100u32, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*stars as u64));
        group.bench_with_input(BenchmarkId::new("stars", stars), stars, |b, &stars| {
            let cfg = SceneConfig::default().with_galaxy_count(0).with_seed(42);
            let mut scene = match SceneState::new(make_records(stars), &cfg) {
                Ok(s) => s,
                Err(e) => panic!("bench scene: {e}"),
            };
            scene.apply_filter(FilterQuery::category("Stack"));
            let mut scheduler = FrameScheduler::new();
            let mut sink = NullSink::default();
            let mut t = 0.0f64;

            b.iter(|| {
                t += 1.0 / 60.0;
                black_box(scheduler.run_frame_at(&mut scene, t, &mut sink).wrapped)
            });
        });
    }

    group.finish();
}

fn bench_pick(c: &mut Criterion) {
    let cfg = SceneConfig::default().with_galaxy_count(0).with_seed(7);
    let mut scene = match SceneState::new(make_records(1_000), &cfg) {
        Ok(s) => s,
        Err(e) => panic!("bench scene: {e}"),
    };

    c.bench_function("pick_1000_stars", |b| {
        b.iter(|| black_box(scene.pick(Vec2::new(0.1, -0.2))));
    });
}

criterion_group!(benches, bench_galaxy_generate, bench_run_frame, bench_pick);
criterion_main!(benches);
