// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Programmatic scroll control and the animation driver seam.
//!
//! A [`CarouselController`] owns the scroll position while it is attached to
//! a carousel and records at most one scroll destination at a time. The
//! owning [`CarouselState`](crate::CarouselState) forwards recorded
//! destinations to the host's [`AnimationDriver`], which reports progress
//! back through [`CarouselController::set_pixels`].

use core::time::Duration;

use crate::{AnimationCurve, ControllerError, ScrollPositionAdapter, SpringRequest};

/// A timed scroll transition for the animation driver to run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollAnimation {
    /// Scroll position when the transition was requested.
    pub from: f64,
    /// Destination scroll position.
    pub target: f64,
    /// Transition length.
    pub duration: Duration,
    /// Easing.
    pub curve: AnimationCurve,
}

/// Host-side animation runner.
///
/// The carousel never blocks on an animation. Each request supersedes any
/// animation the driver is still running; the driver reports intermediate
/// positions back to the carousel as it ticks.
pub trait AnimationDriver {
    /// Runs a timed transition, replacing any running animation.
    fn animate(&mut self, animation: &ScrollAnimation);

    /// Runs a spring simulation, replacing any running animation.
    fn simulate(&mut self, request: &SpringRequest);

    /// Stops whatever is running.
    fn stop(&mut self);
}

/// Scroll controller for one carousel.
///
/// ```
/// use core::time::Duration;
/// use understory_carousel::{
///     AnimationCurve, CarouselController, ControllerError, ItemMetric, ScrollPositionAdapter,
/// };
///
/// let mut controller = CarouselController::new();
/// assert_eq!(controller.try_position(), Err(ControllerError::Detached));
///
/// let mut position = ScrollPositionAdapter::new(ItemMetric::Fixed(100.0), 0);
/// position.apply_viewport_extent(300.0);
/// controller.attach(position);
///
/// let animation = controller
///     .animate_to(200.0, Duration::from_millis(300), AnimationCurve::Ease)
///     .unwrap();
/// assert_eq!((animation.from, animation.target), (0.0, 200.0));
///
/// // A second request overwrites the first.
/// controller.animate_to(400.0, Duration::from_millis(300), AnimationCurve::Ease).unwrap();
/// assert_eq!(controller.pending_animation().unwrap().target, 400.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CarouselController {
    position: Option<ScrollPositionAdapter>,
    pending: Option<ScrollAnimation>,
}

impl CarouselController {
    /// Creates a detached controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a scroll position is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.position.is_some()
    }

    /// Current scroll offset in pixels.
    ///
    /// Querying a detached controller is a lifecycle bug; debug builds panic
    /// and release builds return `0.0`. Use [`Self::try_position`] to handle
    /// it explicitly.
    #[must_use]
    pub fn position(&self) -> f64 {
        debug_assert!(
            self.position.is_some(),
            "CarouselController::position queried while detached"
        );
        self.try_position().unwrap_or(0.0)
    }

    /// Current scroll offset, or [`ControllerError::Detached`].
    pub fn try_position(&self) -> Result<f64, ControllerError> {
        self.position
            .as_ref()
            .map(ScrollPositionAdapter::pixels)
            .ok_or(ControllerError::Detached)
    }

    /// The attached scroll position.
    #[must_use]
    pub fn scroll_position(&self) -> Option<&ScrollPositionAdapter> {
        self.position.as_ref()
    }

    /// The attached scroll position, mutably.
    pub fn scroll_position_mut(&mut self) -> Option<&mut ScrollPositionAdapter> {
        self.position.as_mut()
    }

    /// Fractional item currently in view.
    pub fn current_item(&self) -> Result<f64, ControllerError> {
        self.position
            .as_ref()
            .map(ScrollPositionAdapter::current_item)
            .ok_or(ControllerError::Detached)
    }

    /// Records a transition to `target`, replacing any pending one.
    pub fn animate_to(
        &mut self,
        target: f64,
        duration: Duration,
        curve: AnimationCurve,
    ) -> Result<ScrollAnimation, ControllerError> {
        let from = self.try_position()?;
        let animation = ScrollAnimation {
            from,
            target,
            duration,
            curve,
        };
        if let Some(previous) = self.pending.replace(animation) {
            log::debug!(
                "carousel animation to {} superseded by {}",
                previous.target,
                target
            );
        } else {
            log::debug!("carousel animation {from} -> {target}");
        }
        Ok(animation)
    }

    /// The transition most recently requested and not yet finished.
    #[must_use]
    pub fn pending_animation(&self) -> Option<&ScrollAnimation> {
        self.pending.as_ref()
    }

    /// Forgets the pending transition, returning it.
    pub fn cancel_animation(&mut self) -> Option<ScrollAnimation> {
        self.pending.take()
    }

    /// Reports a scroll offset from a running animation or drag.
    pub fn set_pixels(&mut self, pixels: f64) -> Result<(), ControllerError> {
        let position = self.position.as_mut().ok_or(ControllerError::Detached)?;
        position.set_pixels(pixels);
        Ok(())
    }

    /// Marks the pending transition as finished and settles on its target.
    pub fn finish_animation(&mut self) -> Option<ScrollAnimation> {
        let finished = self.pending.take()?;
        if let Some(position) = self.position.as_mut() {
            position.set_pixels(finished.target);
        }
        Some(finished)
    }

    /// Jumps to `pixels`, dropping any pending transition.
    pub fn jump_to(&mut self, pixels: f64) -> Result<(), ControllerError> {
        self.set_pixels(pixels)?;
        self.pending = None;
        Ok(())
    }

    /// Takes ownership of a carousel's scroll position.
    ///
    /// Returns the previously attached position, if any.
    pub fn attach(&mut self, position: ScrollPositionAdapter) -> Option<ScrollPositionAdapter> {
        log::debug!("carousel controller attached at {}px", position.pixels());
        self.position.replace(position)
    }

    /// Releases the scroll position, dropping any pending transition.
    pub fn detach(&mut self) -> Option<ScrollPositionAdapter> {
        self.pending = None;
        let position = self.position.take();
        if position.is_some() {
            log::debug!("carousel controller detached");
        }
        position
    }
}
