// Benchmark for the tick loop and the geo primitives it leans on.
// Run with: cargo bench

use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use marker_motion::geo::{bearing_deg, distance_m};
use marker_motion::{LatLng, ManualClock, MotionController, MotionOptions, NullSink, TickSource};

/// A 100-waypoint ring, ~700m between neighbors.
fn ring_path() -> Vec<LatLng> {
    (0..100)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / 100.0;
            LatLng::new(0.1 * angle.sin(), 0.1 * angle.cos())
        })
        .collect()
}

fn bench_route_replay(c: &mut Criterion) {
    let path = ring_path();
    c.bench_function("replay 100-waypoint ring at 60fps", |b| {
        b.iter(|| {
            let clock = ManualClock::new();
            let mut controller = MotionController::new(
                path.clone(),
                36_000.0,
                MotionOptions::default(),
                NullSink,
                clock.clone(),
            )
            .unwrap();
            controller.start();
            let frame = Duration::from_millis(16);
            let mut ticks = 0u32;
            while controller.is_moving() {
                clock.advance(frame);
                controller.tick(clock.now());
                ticks += 1;
            }
            assert!(controller.is_ended());
            ticks
        });
    });
}

fn bench_geo_primitives(c: &mut Criterion) {
    let path = ring_path();
    c.bench_function("haversine + bearing over 100 segments", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for pair in path.windows(2) {
                acc += distance_m(pair[0], pair[1]);
                acc += bearing_deg(pair[0], pair[1]);
            }
            acc
        });
    });
}

criterion_group!(benches, bench_route_replay, bench_geo_primitives);
criterion_main!(benches);
