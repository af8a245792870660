// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size, Vec2};
use understory_carousel::{
    AnimationDriver, CarouselConfig, CarouselKind, CarouselLayoutEngine, CarouselState,
    ExtentCalculator, FixedExtentCalculator, LayoutMetrics, LayoutWeights, ScrollAnimation,
    SpringRequest, WeightedExtentCalculator,
};

const VIEWPORT: f64 = 1280.0;
const STEPS: u32 = 240;

#[derive(Debug)]
struct NoopDriver;

impl AnimationDriver for NoopDriver {
    fn animate(&mut self, _animation: &ScrollAnimation) {}

    fn simulate(&mut self, _request: &SpringRequest) {}

    fn stop(&mut self) {}
}

/// Scroll offsets spread evenly over `[0, end)`.
fn sweep(end: f64) -> impl Iterator<Item = f64> {
    (0..STEPS).map(move |i| end * f64::from(i) / f64::from(STEPS))
}

/// Largest scroll offset for `count` items.
fn scroll_end<C: ExtentCalculator>(calc: &C, count: usize) -> f64 {
    let metrics = LayoutMetrics::new(0.0, VIEWPORT);
    (calc.scroll_extent(count, &metrics) - VIEWPORT).max(0.0)
}

fn sweep_layout<C: ExtentCalculator>(engine: &CarouselLayoutEngine<C>, count: usize, end: f64) {
    for scroll in sweep(end) {
        let outcome = engine.layout(&LayoutMetrics::new(scroll, VIEWPORT), count);
        black_box(outcome);
    }
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_carousel_layout");
    group.sample_size(50);

    for (name, table) in [
        ("hero_center", &LayoutWeights::HERO_CENTER[..]),
        ("contained", &LayoutWeights::CONTAINED[..]),
        ("contained_extended", &LayoutWeights::CONTAINED_EXTENDED[..]),
    ] {
        for &count in &[16_usize, 1_024] {
            let Ok(weights) = LayoutWeights::new(table.iter().copied()) else {
                continue;
            };
            let calc = WeightedExtentCalculator::new(weights, 0.0, true);
            let end = scroll_end(&calc, count);
            let engine = CarouselLayoutEngine::new(calc);
            group.bench_function(format!("weighted_sweep({name},n={count})"), |b| {
                b.iter(|| sweep_layout(&engine, count, end));
            });
        }
    }

    for &count in &[16_usize, 1_024] {
        let calc = FixedExtentCalculator::new(
            CarouselKind::UNCONTAINED_ITEM_EXTENT,
            CarouselKind::UNCONTAINED_SHRINK_EXTENT,
        );
        let end = scroll_end(&calc, count);
        let engine = CarouselLayoutEngine::new(calc);
        group.bench_function(format!("fixed_sweep(n={count})"), |b| {
            b.iter(|| sweep_layout(&engine, count, end));
        });
    }

    group.finish();
}

fn bench_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_carousel_state");
    group.sample_size(50);

    group.bench_function("free_scroll_drag(n=256)", |b| {
        b.iter(|| {
            let Ok(config) = CarouselConfig::builder()
                .kind(CarouselKind::Contained { extended: false })
                .free_scroll(true)
                .build()
            else {
                return;
            };
            let mut carousel = CarouselState::new(config, 256, NoopDriver);
            carousel.on_viewport_change(Size::new(VIEWPORT, 400.0));
            carousel.on_drag_start(Point::new(VIEWPORT, 200.0));
            for step in 0..STEPS {
                let x = VIEWPORT - f64::from(step) * 4.0;
                black_box(carousel.on_drag_update(Point::new(x, 200.0)));
                black_box(carousel.layout());
            }
            black_box(carousel.on_drag_end(Vec2::new(-1_500.0, 0.0)));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_layout, bench_state);
criterion_main!(benches);
