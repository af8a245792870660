// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag handling: one-item swipes and free-scroll drag tracking.
//!
//! ## Swipes
//!
//! In swipe mode a drag only matters when it ends. [`GestureToScrollBridge`]
//! classifies the release velocity and, if fast enough, moves the carousel
//! exactly one step forwards or backwards:
//!
//! ```
//! use understory_carousel::{CarouselConfig, CarouselKind, GestureToScrollBridge, HeroAlignment};
//!
//! let config = CarouselConfig::builder()
//!     .kind(CarouselKind::Hero(HeroAlignment::Center))
//!     .build()
//!     .unwrap();
//! let bridge = GestureToScrollBridge::from_config(&config);
//!
//! // A fast leftward release advances from item 6 to 7...
//! let step = bridge.on_drag_end(6, 10, -800.0, 600.0).unwrap();
//! assert_eq!(step.item, 7);
//! assert_eq!(step.target, 7.0 * 600.0);
//!
//! // ...but item 7 is already as far as a 3-slot hero layout goes.
//! assert!(bridge.on_drag_end(7, 10, -800.0, 600.0).is_none());
//! ```
//!
//! ## Free scrolling
//!
//! [`DragTracker`] projects pointer movement onto the main axis so the host
//! can scroll by the returned deltas.

use core::time::Duration;

use kurbo::{Point, Vec2};

use crate::{AnimationCurve, Axis, CarouselConfig, ScrollAnimation};

/// Direction of a recognized swipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Towards later items (pointer moving towards the leading edge).
    Forward,
    /// Towards earlier items.
    Backward,
}

/// One-item step produced by a swipe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeStep {
    /// Swipe direction.
    pub direction: SwipeDirection,
    /// Item counter after the step.
    pub item: usize,
    /// Scroll offset to animate to.
    pub target: f64,
    /// Transition length.
    pub duration: Duration,
    /// Easing.
    pub curve: AnimationCurve,
}

impl SwipeStep {
    /// The transition from `from` to this step's target.
    #[must_use]
    pub fn animation(&self, from: f64) -> ScrollAnimation {
        ScrollAnimation {
            from,
            target: self.target,
            duration: self.duration,
            curve: self.curve,
        }
    }
}

/// Turns drag-end velocities into one-item scroll steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureToScrollBridge {
    threshold: f64,
    bound: usize,
    duration: Duration,
    curve: AnimationCurve,
}

impl GestureToScrollBridge {
    /// Creates a bridge.
    ///
    /// Releases at or below `threshold` pixels per second are ignored.
    /// Forward steps stop `bound` items before the end of the list.
    #[must_use]
    pub fn new(threshold: f64, bound: usize, duration: Duration) -> Self {
        Self {
            threshold: threshold.max(0.0),
            bound,
            duration,
            curve: AnimationCurve::Ease,
        }
    }

    /// Bridge using a configuration's threshold, bound and scroll duration.
    #[must_use]
    pub fn from_config(config: &CarouselConfig) -> Self {
        Self::new(
            config.swipe_threshold(),
            config.swipe_bound(),
            config.scroll_animation_duration(),
        )
    }

    /// Replaces the easing curve.
    #[must_use]
    pub fn with_curve(mut self, curve: AnimationCurve) -> Self {
        self.curve = curve;
        self
    }

    /// Speed a release must exceed.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Items from the end where forward steps stop.
    #[must_use]
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Direction of a release, or `None` if it is too slow to be a swipe.
    ///
    /// Negative velocity (towards the leading edge) moves forward.
    #[must_use]
    pub fn classify(&self, velocity: f64) -> Option<SwipeDirection> {
        if velocity < -self.threshold {
            Some(SwipeDirection::Forward)
        } else if velocity > self.threshold {
            Some(SwipeDirection::Backward)
        } else {
            None
        }
    }

    /// Item counter after a release, or `None` when nothing moves.
    #[must_use]
    pub fn next_item(
        &self,
        item_scrolled: usize,
        child_count: usize,
        velocity: f64,
    ) -> Option<usize> {
        match self.classify(velocity)? {
            SwipeDirection::Forward => {
                let last = child_count.saturating_sub(self.bound);
                (item_scrolled < last).then_some(item_scrolled + 1)
            }
            SwipeDirection::Backward => item_scrolled.checked_sub(1),
        }
    }

    /// Full step for a release, with `step_extent` pixels per item.
    #[must_use]
    pub fn on_drag_end(
        &self,
        item_scrolled: usize,
        child_count: usize,
        velocity: f64,
        step_extent: f64,
    ) -> Option<SwipeStep> {
        let direction = self.classify(velocity)?;
        let item = self.next_item(item_scrolled, child_count, velocity)?;
        log::debug!("carousel swipe {direction:?}: item {item_scrolled} -> {item}");
        Some(SwipeStep {
            direction,
            item,
            target: item as f64 * step_extent,
            duration: self.duration,
            curve: self.curve,
        })
    }
}

/// Tracks a drag along the carousel's main axis.
///
/// ```
/// use kurbo::{Point, Vec2};
/// use understory_carousel::{Axis, DragTracker};
///
/// let mut drag = DragTracker::new(Axis::Horizontal);
/// drag.start(Point::new(100.0, 10.0));
/// assert_eq!(drag.update(Point::new(80.0, 40.0)), Some(-20.0));
/// assert_eq!(drag.total_offset(Point::new(60.0, 0.0)), Some(-40.0));
/// assert_eq!(drag.end(Vec2::new(-900.0, 30.0)), Some(-900.0));
/// assert!(!drag.is_dragging());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragTracker {
    axis: Axis,
    start: Option<f64>,
    last: Option<f64>,
}

impl DragTracker {
    /// Creates a tracker for `axis`.
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            start: None,
            last: None,
        }
    }

    /// Axis movement is projected onto.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Starts a drag at `pos`.
    pub fn start(&mut self, pos: Point) {
        let main = self.axis.component(pos.to_vec2());
        self.start = Some(main);
        self.last = Some(main);
    }

    /// Main-axis movement since the previous update, or `None` when idle.
    pub fn update(&mut self, pos: Point) -> Option<f64> {
        self.start?;
        let main = self.axis.component(pos.to_vec2());
        let delta = self.last.map(|last| main - last);
        self.last = Some(main);
        delta
    }

    /// Main-axis movement since the drag started.
    #[must_use]
    pub fn total_offset(&self, pos: Point) -> Option<f64> {
        self.start
            .map(|start| self.axis.component(pos.to_vec2()) - start)
    }

    /// Ends the drag, returning the main-axis release velocity.
    pub fn end(&mut self, velocity: Vec2) -> Option<f64> {
        let was_dragging = self.is_dragging();
        self.start = None;
        self.last = None;
        was_dragging.then(|| self.axis.component(velocity))
    }

    /// Abandons the drag without a release.
    pub fn cancel(&mut self) {
        self.start = None;
        self.last = None;
    }

    /// Returns `true` while a drag is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }
}
