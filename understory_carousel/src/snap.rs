// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item-aligned settling for decelerating scrolls.
//!
//! [`SnapPhysics`] only picks *where* a released scroll should come to rest.
//! Integrating the spring towards that target is the host animation driver's
//! job; the physics hands it a [`SpringRequest`].
//!
//! ```
//! use understory_carousel::{SnapOutcome, SnapPhysics, ScrollMetrics};
//!
//! let physics = SnapPhysics::default();
//! let metrics = ScrollMetrics { pixels: 130.0, min_scroll_extent: 0.0, max_scroll_extent: 900.0 };
//!
//! // A slow release snaps to the nearest 100px item boundary.
//! assert_eq!(physics.target_pixels(&metrics, 100.0, 0.0), 100.0);
//! // A fling forward continues to the next boundary.
//! assert_eq!(physics.target_pixels(&metrics, 100.0, 500.0), 200.0);
//!
//! // At the start edge, a backwards fling is left to the default overscroll.
//! let resting = ScrollMetrics { pixels: 0.0, ..metrics };
//! assert_eq!(physics.ballistic(&resting, 100.0, -50.0), SnapOutcome::Defer);
//! ```

use crate::calculator::snap_ratio;

/// Thresholds below which motion is considered settled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    /// Distances closer than this are considered equal.
    pub distance: f64,
    /// Speeds (pixels per second) below this are considered at rest.
    pub velocity: f64,
}

impl Tolerance {
    /// Tolerance scaled for a display with the given device pixel ratio.
    ///
    /// Velocities under one physical pixel per 50ms and distances under one
    /// physical pixel are treated as negligible.
    #[must_use]
    pub fn for_device_pixel_ratio(device_pixel_ratio: f64) -> Self {
        let ratio = if device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            distance: 1.0 / ratio,
            velocity: 1.0 / (0.050 * ratio),
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::for_device_pixel_ratio(1.0)
    }
}

/// Damped spring parameters forwarded to the animation driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringDescription {
    /// Mass of the simulated object.
    pub mass: f64,
    /// Spring stiffness.
    pub stiffness: f64,
    /// Damping coefficient.
    pub damping: f64,
}

impl SpringDescription {
    /// Builds a spring from a damping ratio (`1.0` is critically damped).
    #[must_use]
    pub fn with_damping_ratio(mass: f64, stiffness: f64, ratio: f64) -> Self {
        Self {
            mass,
            stiffness,
            damping: ratio * 2.0 * libm::sqrt(mass * stiffness),
        }
    }
}

impl Default for SpringDescription {
    /// A slightly over-damped spring that settles without visible bounce.
    fn default() -> Self {
        Self::with_damping_ratio(0.5, 100.0, 1.1)
    }
}

/// Snapshot of scroll position and bounds used to pick a settle target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    /// Current scroll position.
    pub pixels: f64,
    /// Smallest in-range scroll position.
    pub min_scroll_extent: f64,
    /// Largest in-range scroll position.
    pub max_scroll_extent: f64,
}

/// Spring simulation for the host animation driver to run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringRequest {
    /// Starting scroll position.
    pub from: f64,
    /// Resting scroll position.
    pub to: f64,
    /// Release velocity in pixels per second.
    pub velocity: f64,
    /// Spring parameters.
    pub spring: SpringDescription,
    /// Settling tolerance.
    pub tolerance: Tolerance,
}

/// Result of asking [`SnapPhysics`] how a released scroll should settle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnapOutcome {
    /// Already at an extremum and moving outwards (or not at all): the host's
    /// default overscroll/bounce behavior applies.
    Defer,
    /// Already resting on an item boundary; nothing to animate.
    Settled,
    /// Run this spring to reach the item boundary.
    Spring(SpringRequest),
}

/// Chooses item-aligned resting positions for released scrolls.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SnapPhysics {
    tolerance: Tolerance,
    spring: SpringDescription,
}

impl SnapPhysics {
    /// Creates snap physics with explicit tolerance and spring.
    #[must_use]
    pub fn new(tolerance: Tolerance, spring: SpringDescription) -> Self {
        Self { tolerance, spring }
    }

    /// The settling tolerance.
    #[must_use]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// The spring forwarded in [`SpringRequest`]s.
    #[must_use]
    pub fn spring(&self) -> SpringDescription {
        self.spring
    }

    /// Nearest item boundary to settle on, biased by half an item in the
    /// direction of a fast fling, clamped to the scroll range.
    ///
    /// `item_width` is the scroll distance between resting positions (see
    /// [`ExtentCalculator::item_stride`](crate::ExtentCalculator::item_stride)).
    #[must_use]
    pub fn target_pixels(&self, metrics: &ScrollMetrics, item_width: f64, velocity: f64) -> f64 {
        if item_width <= 0.0 || !item_width.is_finite() {
            return metrics.pixels;
        }
        let mut item = snap_ratio(metrics.pixels.max(0.0) / item_width);
        if velocity < -self.tolerance.velocity {
            item -= 0.5;
        } else if velocity > self.tolerance.velocity {
            item += 0.5;
        }
        let target = libm::round(item) * item_width;
        let max = metrics.max_scroll_extent.max(metrics.min_scroll_extent);
        target.clamp(metrics.min_scroll_extent, max)
    }

    /// Decides how a scroll released with `velocity` should settle.
    #[must_use]
    pub fn ballistic(
        &self,
        metrics: &ScrollMetrics,
        item_width: f64,
        velocity: f64,
    ) -> SnapOutcome {
        if (velocity <= 0.0 && metrics.pixels <= metrics.min_scroll_extent)
            || (velocity >= 0.0 && metrics.pixels >= metrics.max_scroll_extent)
        {
            return SnapOutcome::Defer;
        }

        let target = self.target_pixels(metrics, item_width, velocity);
        if target == metrics.pixels {
            return SnapOutcome::Settled;
        }
        SnapOutcome::Spring(SpringRequest {
            from: metrics.pixels,
            to: target,
            velocity,
            spring: self.spring,
            tolerance: self.tolerance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ScrollMetrics, SnapOutcome, SnapPhysics, SpringDescription, Tolerance};

    fn metrics(pixels: f64) -> ScrollMetrics {
        ScrollMetrics {
            pixels,
            min_scroll_extent: 0.0,
            max_scroll_extent: 1000.0,
        }
    }

    #[test]
    fn extremum_defers_to_overscroll() {
        let physics = SnapPhysics::default();
        assert_eq!(physics.ballistic(&metrics(0.0), 200.0, 0.0), SnapOutcome::Defer);
        assert_eq!(physics.ballistic(&metrics(-10.0), 200.0, -300.0), SnapOutcome::Defer);
        assert_eq!(physics.ballistic(&metrics(1000.0), 200.0, 0.0), SnapOutcome::Defer);
        assert_eq!(physics.ballistic(&metrics(1010.0), 200.0, 40.0), SnapOutcome::Defer);
        // Moving inwards from an edge is still snapped.
        assert!(matches!(
            physics.ballistic(&metrics(0.0), 200.0, 500.0),
            SnapOutcome::Spring(_)
        ));
    }

    #[test]
    fn resting_on_boundary_is_settled() {
        let physics = SnapPhysics::default();
        assert_eq!(physics.ballistic(&metrics(400.0), 200.0, 0.0), SnapOutcome::Settled);
        // Slow motion below tolerance does not bias the target.
        assert_eq!(physics.ballistic(&metrics(400.0), 200.0, 5.0), SnapOutcome::Settled);
    }

    #[test]
    fn fling_biases_by_half_an_item() {
        let physics = SnapPhysics::default();
        let m = metrics(420.0);
        assert_eq!(physics.target_pixels(&m, 200.0, 0.0), 400.0);
        assert_eq!(physics.target_pixels(&m, 200.0, 800.0), 600.0);
        assert_eq!(physics.target_pixels(&metrics(580.0), 200.0, -800.0), 400.0);
        match physics.ballistic(&m, 200.0, 800.0) {
            SnapOutcome::Spring(request) => {
                assert_eq!(request.from, 420.0);
                assert_eq!(request.to, 600.0);
                assert_eq!(request.velocity, 800.0);
            }
            other => panic!("expected a spring, got {other:?}"),
        }
    }

    #[test]
    fn target_never_leaves_scroll_range() {
        let physics = SnapPhysics::default();
        let m = ScrollMetrics {
            pixels: 950.0,
            min_scroll_extent: 0.0,
            max_scroll_extent: 960.0,
        };
        assert_eq!(physics.target_pixels(&m, 200.0, 900.0), 960.0);
    }

    #[test]
    fn tolerance_and_spring_defaults() {
        let tolerance = Tolerance::for_device_pixel_ratio(2.0);
        assert!((tolerance.velocity - 10.0).abs() < 1e-12);
        assert!((tolerance.distance - 0.5).abs() < 1e-12);
        assert_eq!(Tolerance::for_device_pixel_ratio(0.0), Tolerance::default());
        let spring = SpringDescription::default();
        assert!((spring.damping - 1.1 * 2.0 * libm::sqrt(50.0)).abs() < 1e-9);
    }
}
