// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The mounted carousel: configuration, position, gestures and animation.
//!
//! [`CarouselState`] is created when a carousel is mounted and dropped (or
//! [disposed](CarouselState::dispose)) when it is unmounted. Every host event
//! maps to one method:
//!
//! | Host event | Method |
//! |---|---|
//! | available size changed | [`CarouselState::on_viewport_change`] |
//! | layout pass | [`CarouselState::layout`] |
//! | pointer down / move / up | [`CarouselState::on_drag_start`], [`CarouselState::on_drag_update`], [`CarouselState::on_drag_end`] |
//! | animation frame / completion | [`CarouselState::on_animation_tick`], [`CarouselState::on_animation_complete`] |
//! | tap | [`CarouselState::tap`] |
//! | configuration changed | [`CarouselState::reconfigure`] |

use kurbo::{Point, Size, Vec2};

use crate::{
    ActiveCalculator, AnimationCurve, AnimationDriver, CarouselConfig, CarouselController,
    CarouselLayoutEngine, ControllerError, DragTracker, ExtentCalculator, GestureToScrollBridge,
    LayoutMetrics, LayoutOutcome, LayoutPlan, ScrollAnimation, ScrollPositionAdapter, SnapOutcome,
    SnapPhysics, SpringRequest, ViewportUpdate,
};

/// What a drag release did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEndAction {
    /// No drag was active, or the release was too slow or out of bounds.
    Ignored,
    /// A swipe moved one step; the animation was sent to the driver.
    Swipe(ScrollAnimation),
    /// Free scrolling settles on an item; the spring was sent to the driver.
    Snap(SpringRequest),
    /// Free scrolling already rests on an item.
    Settled,
    /// Free scrolling continues with the host's own fling and overscroll
    /// physics at this scroll velocity.
    Fling {
        /// Scroll velocity in pixels per second (positive moves forward).
        velocity: f64,
    },
}

/// A mounted carousel.
///
/// Owns its scroll position (through the active controller) and the host's
/// animation driver. The driver is stopped when the state is disposed or
/// dropped.
///
/// ```
/// use kurbo::{Point, Size, Vec2};
/// use understory_carousel::{
///     AnimationDriver, CarouselConfig, CarouselKind, CarouselState, DragEndAction,
///     ScrollAnimation, SpringRequest,
/// };
///
/// #[derive(Default)]
/// struct Driver {
///     last: Option<ScrollAnimation>,
/// }
///
/// impl AnimationDriver for Driver {
///     fn animate(&mut self, animation: &ScrollAnimation) {
///         self.last = Some(*animation);
///     }
///     fn simulate(&mut self, _request: &SpringRequest) {}
///     fn stop(&mut self) {
///         self.last = None;
///     }
/// }
///
/// let config = CarouselConfig::builder()
///     .kind(CarouselKind::Contained { extended: false })
///     .build()
///     .unwrap();
/// let mut carousel = CarouselState::new(config, 10, Driver::default());
/// carousel.on_viewport_change(Size::new(1000.0, 200.0));
///
/// let plan = carousel.layout().into_plan().unwrap();
/// assert_eq!(plan.len(), 3);
///
/// // A fast leftward swipe animates one step forward.
/// carousel.on_drag_start(Point::new(600.0, 100.0));
/// let action = carousel.on_drag_end(Vec2::new(-1200.0, 0.0));
/// assert!(matches!(action, DragEndAction::Swipe(animation) if animation.target == 500.0));
/// assert_eq!(carousel.driver().unwrap().last.unwrap().target, 500.0);
/// ```
#[derive(Debug)]
pub struct CarouselState<D: AnimationDriver> {
    config: CarouselConfig,
    engine: CarouselLayoutEngine<ActiveCalculator>,
    bridge: GestureToScrollBridge,
    snap: SnapPhysics,
    drag: DragTracker,
    fallback: CarouselController,
    external: Option<CarouselController>,
    driver: Option<D>,
    child_count: usize,
    item_scrolled: usize,
    plan: Option<LayoutPlan>,
}

impl<D: AnimationDriver> CarouselState<D> {
    /// Mounts a carousel showing `child_count` items.
    pub fn new(config: CarouselConfig, child_count: usize, driver: D) -> Self {
        let mut fallback = CarouselController::new();
        fallback.attach(ScrollPositionAdapter::new(
            config.item_metric(),
            config.initial_item(),
        ));
        log::debug!(
            "carousel mounted: {:?}, {child_count} items",
            config.kind()
        );
        Self {
            engine: CarouselLayoutEngine::new(config.calculator()),
            bridge: GestureToScrollBridge::from_config(&config),
            snap: SnapPhysics::default(),
            drag: DragTracker::new(config.axis()),
            config,
            fallback,
            external: None,
            driver: Some(driver),
            child_count,
            item_scrolled: 0,
            plan: None,
        }
    }

    /// Replaces the snap physics used by free scrolling with item snapping.
    #[must_use]
    pub fn with_snap_physics(mut self, snap: SnapPhysics) -> Self {
        self.snap = snap;
        self
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Number of items.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.child_count
    }

    /// Swipe counter: how many steps the carousel has been swiped forward.
    #[must_use]
    pub fn item_scrolled(&self) -> usize {
        self.item_scrolled
    }

    /// The plan of the most recent successful layout pass.
    #[must_use]
    pub fn plan(&self) -> Option<&LayoutPlan> {
        self.plan.as_ref()
    }

    /// The animation driver, until disposal.
    #[must_use]
    pub fn driver(&self) -> Option<&D> {
        self.driver.as_ref()
    }

    /// The animation driver, mutably.
    pub fn driver_mut(&mut self) -> Option<&mut D> {
        self.driver.as_mut()
    }

    /// The controller currently owning the scroll position.
    #[must_use]
    pub fn controller(&self) -> &CarouselController {
        self.external.as_ref().unwrap_or(&self.fallback)
    }

    /// The controller currently owning the scroll position, mutably.
    pub fn controller_mut(&mut self) -> &mut CarouselController {
        match &mut self.external {
            Some(controller) => controller,
            None => &mut self.fallback,
        }
    }

    /// The scroll position.
    #[must_use]
    pub fn scroll_position(&self) -> Option<&ScrollPositionAdapter> {
        self.controller().scroll_position()
    }

    /// Applies a new configuration.
    ///
    /// Any running animation is stopped. The item in view stays in view;
    /// returns the corrected scroll offset if it moved.
    pub fn reconfigure(&mut self, config: CarouselConfig) -> Option<f64> {
        if config == self.config {
            return None;
        }
        log::debug!("carousel reconfigured: {:?} -> {:?}", self.config.kind(), config.kind());
        self.stop_animation();
        self.engine.set_calculator(config.calculator());
        self.bridge = GestureToScrollBridge::from_config(&config);
        self.drag = DragTracker::new(config.axis());
        let metric = config.item_metric();
        let initial_item = config.initial_item();
        self.config = config;
        self.plan = None;

        let corrected = self
            .controller_mut()
            .scroll_position_mut()
            .and_then(|position| {
                position.set_initial_item(initial_item);
                position.set_metric(metric)
            });
        self.refresh_content_dimensions();
        self.sync_item_scrolled();
        corrected
    }

    /// Changes the number of items.
    pub fn set_child_count(&mut self, child_count: usize) {
        if self.child_count != child_count {
            self.child_count = child_count;
            self.plan = None;
            self.refresh_content_dimensions();
            self.item_scrolled = self.item_scrolled.min(child_count.saturating_sub(1));
        }
    }

    /// Applies the space the host makes available to the carousel.
    ///
    /// A running animation is retargeted so it still ends on the same item,
    /// or stopped when the viewport collapses.
    pub fn on_viewport_change(&mut self, available: Size) -> ViewportUpdate {
        let extent = self.config.main_extent(available);
        let pending = self.controller().pending_animation().copied();
        let Some(position) = self.controller_mut().scroll_position_mut() else {
            return ViewportUpdate::Unchanged;
        };
        let old_extent = position.viewport_extent();
        let update = position.apply_viewport_extent(extent);
        if let (ViewportUpdate::Corrected(_), Some(animation)) = (update, pending) {
            self.retarget_animation(animation, old_extent);
        }
        if update != ViewportUpdate::Unchanged {
            self.plan = None;
            self.refresh_content_dimensions();
            self.sync_item_scrolled();
        }
        update
    }

    /// Runs a layout pass at the current scroll position.
    ///
    /// On [`LayoutOutcome::Correction`] the position has already been moved;
    /// the host should lay out again.
    pub fn layout(&mut self) -> LayoutOutcome {
        let Some(metrics) = self.metrics() else {
            return LayoutOutcome::Deferred;
        };
        let outcome = self.engine.layout(&metrics, self.child_count);
        match &outcome {
            LayoutOutcome::Plan(plan) => {
                let max = plan.max_scroll_extent();
                if let Some(position) = self.controller_mut().scroll_position_mut() {
                    position.apply_content_dimensions(0.0, max);
                }
                self.plan = Some(plan.clone());
            }
            LayoutOutcome::Correction { scroll_offset } => {
                let offset = *scroll_offset;
                if let Some(position) = self.controller_mut().scroll_position_mut() {
                    position.set_pixels(offset);
                }
                self.plan = None;
            }
            LayoutOutcome::Deferred => {}
        }
        outcome
    }

    /// A pointer went down on the carousel.
    ///
    /// Grabbing the carousel stops any running animation.
    pub fn on_drag_start(&mut self, pos: Point) {
        self.stop_animation();
        self.drag.start(pos);
    }

    /// The pointer moved.
    ///
    /// In free-scroll mode the carousel follows the pointer and the applied
    /// scroll delta is returned. Swipe mode only reacts to the release.
    pub fn on_drag_update(&mut self, pos: Point) -> Option<f64> {
        let delta = self.drag.update(pos)?;
        if !self.config.free_scroll() {
            return None;
        }
        self.controller_mut()
            .scroll_position_mut()
            .map(|position| position.scroll_by(-delta))
    }

    /// The pointer was released with `velocity` (pixels per second).
    pub fn on_drag_end(&mut self, velocity: Vec2) -> DragEndAction {
        let Some(velocity) = self.drag.end(velocity) else {
            return DragEndAction::Ignored;
        };
        if self.config.free_scroll() {
            self.release_free_scroll(-velocity)
        } else {
            self.release_swipe(velocity)
        }
    }

    /// The pointer interaction was abandoned.
    pub fn on_drag_cancel(&mut self) {
        self.drag.cancel();
    }

    /// Reports the scroll offset of a running animation.
    pub fn on_animation_tick(&mut self, pixels: f64) {
        if let Some(position) = self.controller_mut().scroll_position_mut() {
            position.set_pixels(pixels);
        }
    }

    /// Reports that the driver finished its animation.
    pub fn on_animation_complete(&mut self) {
        if self.controller_mut().finish_animation().is_none() {
            // Springs have no recorded target; the last tick is final.
            self.sync_item_scrolled();
        }
    }

    /// Animates to the resting scroll offset of `item`.
    pub fn animate_to_item(&mut self, item: usize) -> Result<ScrollAnimation, ControllerError> {
        let target = self
            .metrics()
            .map_or(0.0, |metrics| self.engine.rest_offset(item, &metrics, self.child_count));
        let duration = self.config.scroll_animation_duration();
        let animation = self
            .controller_mut()
            .animate_to(target, duration, AnimationCurve::Ease)?;
        if let Some(driver) = self.driver.as_mut() {
            driver.animate(&animation);
        }
        Ok(animation)
    }

    /// Index of the item under `pos` (viewport coordinates) in the last plan.
    #[must_use]
    pub fn tap(&self, pos: Point) -> Option<usize> {
        let main = self.config.axis().component(pos.to_vec2());
        self.plan.as_ref()?.item_at(main)
    }

    /// Calls `on_tap` with the index of the tapped item, if any.
    pub fn tap_with(&self, pos: Point, on_tap: impl FnOnce(usize)) -> Option<usize> {
        let index = self.tap(pos)?;
        on_tap(index);
        Some(index)
    }

    /// Hands the scroll position to an external controller.
    ///
    /// Returns the previously attached external controller, detached.
    pub fn attach_controller(
        &mut self,
        mut controller: CarouselController,
    ) -> Option<CarouselController> {
        let previous = self.detach_controller();
        self.stop_animation();
        if let Some(position) = self.fallback.detach() {
            if let Some(stale) = controller.attach(position) {
                log::warn!(
                    "carousel controller was already attached at {}px; replacing",
                    stale.pixels()
                );
            }
        }
        self.external = Some(controller);
        previous
    }

    /// Takes back the scroll position from the external controller.
    ///
    /// Returns the detached controller, or `None` if none was attached.
    pub fn detach_controller(&mut self) -> Option<CarouselController> {
        if self.external.is_none() {
            return None;
        }
        self.stop_animation();
        let mut controller = self.external.take()?;
        if let Some(position) = controller.detach() {
            self.fallback.attach(position);
        }
        Some(controller)
    }

    /// Unmounts the carousel, stopping and returning the animation driver.
    pub fn dispose(mut self) -> Option<D> {
        let mut driver = self.driver.take();
        if let Some(driver) = driver.as_mut() {
            driver.stop();
        }
        log::debug!("carousel disposed");
        driver
    }

    fn release_swipe(&mut self, velocity: f64) -> DragEndAction {
        let Some(extent) = self.viewport_extent() else {
            return DragEndAction::Ignored;
        };
        let step_extent = self.config.step_extent(extent);
        let Some(step) =
            self.bridge
                .on_drag_end(self.item_scrolled, self.child_count, velocity, step_extent)
        else {
            return DragEndAction::Ignored;
        };
        // The step heuristic can overshoot the content; stop at its end.
        let target = self.scroll_position().map_or(step.target, |position| {
            step.target
                .clamp(position.min_scroll_extent(), position.max_scroll_extent())
        });
        let Ok(animation) = self
            .controller_mut()
            .animate_to(target, step.duration, step.curve)
        else {
            return DragEndAction::Ignored;
        };
        self.item_scrolled = step.item;
        if let Some(driver) = self.driver.as_mut() {
            driver.animate(&animation);
        }
        DragEndAction::Swipe(animation)
    }

    fn release_free_scroll(&mut self, velocity: f64) -> DragEndAction {
        if !self.config.item_snapping() {
            return DragEndAction::Fling { velocity };
        }
        let Some(position) = self.scroll_position() else {
            return DragEndAction::Ignored;
        };
        let stride = self
            .engine
            .calculator()
            .item_stride(position.viewport_extent().unwrap_or(0.0));
        match self.snap.ballistic(&position.scroll_metrics(), stride, velocity) {
            SnapOutcome::Defer => DragEndAction::Fling { velocity },
            SnapOutcome::Settled => DragEndAction::Settled,
            SnapOutcome::Spring(request) => {
                if let Some(driver) = self.driver.as_mut() {
                    driver.simulate(&request);
                }
                DragEndAction::Snap(request)
            }
        }
    }

    /// Moves a pending animation's target into the current viewport's pixels.
    fn retarget_animation(&mut self, animation: ScrollAnimation, old_extent: Option<f64>) {
        let target = self.scroll_position().and_then(|position| {
            let old = old_extent.filter(|old| *old > 0.0)?;
            position.viewport_extent().filter(|new| *new > 0.0)?;
            let item = position.item_from_pixels(animation.target, old);
            Some(position.pixels_from_item(item))
        });
        let Some(target) = target else {
            self.stop_animation();
            return;
        };
        let Ok(animation) = self
            .controller_mut()
            .animate_to(target, animation.duration, animation.curve)
        else {
            return;
        };
        if let Some(driver) = self.driver.as_mut() {
            driver.animate(&animation);
        }
    }

    fn stop_animation(&mut self) {
        if self.controller_mut().cancel_animation().is_some() {
            if let Some(driver) = self.driver.as_mut() {
                driver.stop();
            }
        }
    }

    fn viewport_extent(&self) -> Option<f64> {
        self.scroll_position()?
            .viewport_extent()
            .filter(|extent| *extent > 0.0)
    }

    fn metrics(&self) -> Option<LayoutMetrics> {
        let position = self.scroll_position()?;
        let extent = position.viewport_extent()?;
        Some(LayoutMetrics::new(position.pixels(), extent))
    }

    fn refresh_content_dimensions(&mut self) {
        let Some(metrics) = self.metrics() else {
            return;
        };
        let scroll_extent = self
            .engine
            .calculator()
            .scroll_extent(self.child_count, &metrics);
        let max = (scroll_extent - metrics.viewport_extent).max(0.0);
        if let Some(position) = self.controller_mut().scroll_position_mut() {
            position.apply_content_dimensions(0.0, max);
        }
    }

    /// Re-derives the swipe counter from the scroll offset.
    fn sync_item_scrolled(&mut self) {
        let Some(extent) = self.viewport_extent() else {
            return;
        };
        let step = self.config.step_extent(extent);
        if step <= 0.0 {
            return;
        }
        let pixels = self.controller().try_position().unwrap_or(0.0);
        let item = libm::round(pixels.max(0.0) / step);
        self.item_scrolled = usize::try_from(crate::calculator::to_isize(item))
            .unwrap_or(0)
            .min(self.child_count.saturating_sub(1));
    }
}

impl<D: AnimationDriver> Drop for CarouselState<D> {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.as_mut() {
            driver.stop();
        }
    }
}
