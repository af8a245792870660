// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_carousel` crate.
//!
//! These sweep the layout and gesture paths end to end: extents filling the
//! viewport, items shrinking smoothly, positions surviving resizes, and swipe
//! bounds holding at the end of the list.

use kurbo::{Point, Size, Vec2};
use understory_carousel::{
    AnimationDriver, CarouselConfig, CarouselKind, CarouselLayoutEngine, CarouselState,
    DragEndAction, ExtentCalculator, GestureToScrollBridge, HeroAlignment, ItemMetric,
    LayoutMetrics, LayoutOutcome, LayoutPlan, LayoutStatus, LayoutWeights, ScrollAnimation,
    ScrollMetrics, ScrollPositionAdapter, SnapOutcome, SnapPhysics, SpringRequest,
    WeightedExtentCalculator,
};

const EPSILON: f64 = 1e-6;

#[derive(Debug, Default)]
struct NullDriver;

impl AnimationDriver for NullDriver {
    fn animate(&mut self, _animation: &ScrollAnimation) {}

    fn simulate(&mut self, _request: &SpringRequest) {}

    fn stop(&mut self) {}
}

fn all_tables() -> [&'static [u32]; 5] {
    [
        &LayoutWeights::HERO_LEFT,
        &LayoutWeights::HERO_CENTER,
        &LayoutWeights::HERO_RIGHT,
        &LayoutWeights::CONTAINED,
        &LayoutWeights::CONTAINED_EXTENDED,
    ]
}

fn engine_plan(
    calc: &WeightedExtentCalculator,
    scroll: f64,
    viewport: f64,
    count: usize,
) -> LayoutPlan {
    CarouselLayoutEngine::new(calc.clone())
        .layout(&LayoutMetrics::new(scroll, viewport), count)
        .into_plan()
        .unwrap_or_else(|| panic!("no plan at scroll {scroll}"))
}

fn assert_contiguous(plan: &LayoutPlan) {
    for pair in plan.items().windows(2) {
        assert!(
            (pair[0].paint_end() - pair[1].paint_offset).abs() < EPSILON,
            "gap between {:?} and {:?}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn visible_extents_fill_the_viewport() {
    let viewport = 1000.0;
    let count = 20;
    for table in all_tables() {
        let weights = LayoutWeights::new(table.iter().copied()).unwrap();
        let calc = WeightedExtentCalculator::new(weights, 0.0, false);
        let slot = calc.first_child_extent(viewport);
        let end = (count - table.len() - 1) as f64 * slot;

        let mut scroll = 0.0;
        while scroll < end {
            let plan = engine_plan(&calc, scroll, viewport, count);
            let total: f64 = plan.items().iter().map(|item| item.extent).sum();
            assert!(
                (total - viewport).abs() < EPSILON,
                "{table:?} at {scroll}: extents sum to {total}"
            );
            assert!(plan.items()[0].paint_offset.abs() < EPSILON);
            assert!(plan.items().iter().all(|item| item.extent >= 0.0));
            assert_contiguous(&plan);
            assert_eq!(plan.status(), LayoutStatus::Complete);
            scroll += slot / 7.3;
        }
    }
}

#[test]
fn fully_expanding_layouts_still_end_at_the_viewport_edge() {
    let viewport = 900.0;
    let count = 12;
    for table in all_tables() {
        let weights = LayoutWeights::new(table.iter().copied()).unwrap();
        let calc = WeightedExtentCalculator::new(weights, 0.0, true);
        let slot = calc.first_child_extent(viewport);
        let end = (count - table.len() - 1) as f64 * slot;

        let mut scroll = 0.0;
        while scroll < end {
            let plan = engine_plan(&calc, scroll, viewport, count);
            let last = plan.items().last().unwrap();
            assert!(
                (last.paint_end() - viewport).abs() < EPSILON,
                "{table:?} at {scroll}: ends at {}",
                last.paint_end()
            );
            assert_contiguous(&plan);
            scroll += slot / 5.1;
        }
    }
}

#[test]
fn shrink_floor_leaves_no_gap_at_the_leading_edge() {
    let viewport = 1000.0;
    let shrink = 60.0;
    let count = 20;
    for table in all_tables() {
        let weights = LayoutWeights::new(table.iter().copied()).unwrap();
        let calc = WeightedExtentCalculator::new(weights, shrink, false);
        let slot = calc.first_child_extent(viewport);
        let end = (count - table.len() - 1) as f64 * slot;

        let mut scroll = 0.0;
        while scroll < end {
            let plan = engine_plan(&calc, scroll, viewport, count);
            let first = &plan.items()[0];
            let last = plan.items().last().unwrap();
            assert!(first.paint_offset <= EPSILON, "{table:?} at {scroll}");
            assert!(first.extent >= shrink - EPSILON, "{table:?} at {scroll}");
            assert!(first.paint_end() > 0.0, "{table:?} at {scroll}");
            assert!(last.paint_end() >= viewport - EPSILON, "{table:?} at {scroll}");
            assert_contiguous(&plan);
            assert_eq!(plan.status(), LayoutStatus::Complete);
            scroll += slot / 6.7;
        }
    }
}

#[test]
fn clipped_paint_extent_plans_only_what_is_painted() {
    let weights = LayoutWeights::new(LayoutWeights::CONTAINED).unwrap();
    let engine = CarouselLayoutEngine::new(WeightedExtentCalculator::new(weights, 0.0, false));
    let metrics = LayoutMetrics::new(250.0, 1000.0).with_remaining_paint_extent(600.0);
    for count in [10, 26, 100_000] {
        let plan = engine.layout(&metrics, count).into_plan().unwrap();
        let indices: Vec<usize> = plan.items().iter().map(|item| item.index).collect();
        assert_eq!(indices, [0, 1], "{count} items");
        assert_eq!(plan.status(), LayoutStatus::Complete);
    }
}

#[test]
fn leading_item_shrinks_monotonically_within_a_slot() {
    let viewport = 1000.0;
    for shrink in [0.0, 80.0] {
        let weights = LayoutWeights::new(LayoutWeights::CONTAINED).unwrap();
        let calc = WeightedExtentCalculator::new(weights, shrink, false);
        let slot = calc.first_child_extent(viewport);
        for k in 0..5_u32 {
            let start = f64::from(k) * slot;
            let mut previous = f64::INFINITY;
            let mut offset = 0.0;
            while offset < slot - 1.0 {
                let metrics = LayoutMetrics::new(start + offset, viewport);
                let first = calc.first_visible_index(&metrics);
                assert_eq!(first, k as isize);
                let extent = calc.item_extent(first, &metrics);
                assert!(extent <= previous + EPSILON, "grew at {}", start + offset);
                assert!(extent >= shrink - EPSILON);
                previous = extent;
                offset += 13.0;
            }
        }
    }
}

#[test]
fn boundary_positions_round_trip_through_items() {
    for viewport in [1000.0, 777.0, 333.3] {
        for metric in [
            ItemMetric::Weighted { first: 5, sum: 10 },
            ItemMetric::Weighted { first: 2, sum: 10 },
            ItemMetric::Fixed(270.0),
        ] {
            let mut position = ScrollPositionAdapter::new(metric, 0);
            position.apply_viewport_extent(viewport);
            for k in 0..12_u32 {
                let pixels = f64::from(k) * position.item_stride();
                let item = position.item_from_pixels(pixels, viewport);
                assert_eq!(item, f64::from(k));
                assert_eq!(position.pixels_from_item(item), pixels);
            }
        }
    }
}

#[test]
fn resting_boundaries_are_snap_fixed_points() {
    let physics = SnapPhysics::default();
    for k in 1..8_u32 {
        let pixels = f64::from(k) * 320.0;
        let metrics = ScrollMetrics {
            pixels,
            min_scroll_extent: 0.0,
            max_scroll_extent: 3200.0,
        };
        assert_eq!(physics.target_pixels(&metrics, 320.0, 0.0), pixels);
        assert_eq!(physics.ballistic(&metrics, 320.0, 0.0), SnapOutcome::Settled);
    }
}

#[test]
fn resize_keeps_the_same_item_in_view() {
    let mut position = ScrollPositionAdapter::new(ItemMetric::Weighted { first: 5, sum: 10 }, 0);
    position.apply_viewport_extent(1000.0);
    position.set_pixels(1250.0);

    for (viewport, pixels) in [(640.0, 800.0), (0.0, 0.0), (1280.0, 1600.0), (1280.0, 1600.0)] {
        position.apply_viewport_extent(viewport);
        assert_eq!(position.pixels(), pixels, "at viewport {viewport}");
        assert_eq!(position.current_item(), 2.5, "at viewport {viewport}");
    }
}

#[test]
fn mounted_carousel_survives_collapse_to_zero() {
    let config = CarouselConfig::builder()
        .kind(CarouselKind::Contained { extended: true })
        .build()
        .unwrap();
    let mut carousel = CarouselState::new(config, 12, NullDriver);
    carousel.on_viewport_change(Size::new(1000.0, 300.0));
    carousel.controller_mut().jump_to(1200.0).unwrap();
    let before = carousel.controller().current_item().unwrap();

    carousel.on_viewport_change(Size::new(0.0, 300.0));
    assert_eq!(carousel.layout(), LayoutOutcome::Deferred);
    carousel.on_viewport_change(Size::new(500.0, 300.0));

    assert_eq!(carousel.controller().current_item().unwrap(), before);
    assert_eq!(carousel.controller().position(), 600.0);
    assert!(matches!(carousel.layout(), LayoutOutcome::Plan(_)));
}

#[test]
fn configuration_selects_weight_tables() {
    let cases = [
        (CarouselKind::Hero(HeroAlignment::Left), Some(&[8, 2][..])),
        (CarouselKind::Hero(HeroAlignment::Center), Some(&[2, 6, 2][..])),
        (CarouselKind::Hero(HeroAlignment::Right), Some(&[2, 8][..])),
        (CarouselKind::Contained { extended: false }, Some(&[5, 4, 1][..])),
        (CarouselKind::Contained { extended: true }, Some(&[4, 3, 2, 1][..])),
        (CarouselKind::uncontained(), None),
    ];
    for (kind, expected) in cases {
        let config = CarouselConfig::builder().kind(kind).build().unwrap();
        assert_eq!(config.weights().map(LayoutWeights::as_slice), expected);
    }
}

#[test]
fn hero_center_swipe_stops_three_from_the_end() {
    let config = CarouselConfig::builder()
        .kind(CarouselKind::Hero(HeroAlignment::Center))
        .build()
        .unwrap();

    let bridge = GestureToScrollBridge::from_config(&config);
    assert_eq!(bridge.next_item(7, 10, -1000.0), None);
    assert_eq!(bridge.next_item(6, 10, -1000.0), Some(7));

    let mut carousel = CarouselState::new(config, 10, NullDriver);
    carousel.on_viewport_change(Size::new(1000.0, 400.0));
    assert_eq!(carousel.item_scrolled(), 0);
    let max = carousel.scroll_position().unwrap().max_scroll_extent();

    for expected in 1..=7 {
        carousel.on_drag_start(Point::new(700.0, 200.0));
        match carousel.on_drag_end(Vec2::new(-1000.0, 0.0)) {
            DragEndAction::Swipe(animation) => assert!(animation.target <= max),
            other => panic!("swipe {expected} did nothing: {other:?}"),
        }
        carousel.on_animation_complete();
        assert_eq!(carousel.item_scrolled(), expected);
    }

    carousel.on_drag_start(Point::new(700.0, 200.0));
    assert_eq!(
        carousel.on_drag_end(Vec2::new(-1000.0, 0.0)),
        DragEndAction::Ignored
    );
    assert_eq!(carousel.item_scrolled(), 7);

    carousel.on_drag_start(Point::new(300.0, 200.0));
    assert!(matches!(
        carousel.on_drag_end(Vec2::new(1000.0, 0.0)),
        DragEndAction::Swipe(_)
    ));
    assert_eq!(carousel.item_scrolled(), 6);
}

#[test]
fn snap_defers_at_the_extremes() {
    let physics = SnapPhysics::default();
    let at_start = ScrollMetrics {
        pixels: 0.0,
        min_scroll_extent: 0.0,
        max_scroll_extent: 2000.0,
    };
    assert_eq!(physics.ballistic(&at_start, 400.0, 0.0), SnapOutcome::Defer);
    assert_eq!(physics.ballistic(&at_start, 400.0, -250.0), SnapOutcome::Defer);

    let at_end = ScrollMetrics {
        pixels: 2000.0,
        ..at_start
    };
    assert_eq!(physics.ballistic(&at_end, 400.0, 250.0), SnapOutcome::Defer);

    let near_end = ScrollMetrics {
        pixels: 1950.0,
        ..at_start
    };
    assert!(matches!(
        physics.ballistic(&near_end, 400.0, -900.0),
        SnapOutcome::Spring(SpringRequest { to, .. }) if to == 1600.0
    ));
}

#[test]
fn uncontained_layout_compresses_edges() {
    let config = CarouselConfig::builder()
        .kind(CarouselKind::uncontained())
        .build()
        .unwrap();
    let mut carousel = CarouselState::new(config, 10, NullDriver);
    carousel.on_viewport_change(Size::new(1000.0, 300.0));
    carousel.controller_mut().jump_to(100.0).unwrap();

    let plan = carousel.layout().into_plan().unwrap();
    let extents: Vec<f64> = plan.items().iter().map(|item| item.extent).collect();
    // 270px items over 1000px leave 190px, which raises the 150px floor.
    assert_eq!(extents, [190.0, 270.0, 270.0, 270.0, 190.0]);
    assert!((plan.items()[0].paint_offset + 20.0).abs() < EPSILON);
    assert_contiguous(&plan);
    assert_eq!(carousel.tap(Point::new(200.0, 10.0)), Some(1));
}
