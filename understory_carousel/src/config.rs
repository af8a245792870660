// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative carousel configuration and the values derived from it.

use core::time::Duration;

use kurbo::{Size, Vec2};

use crate::{
    ActiveCalculator, ConfigError, FixedExtentCalculator, ItemMetric, LayoutWeights,
    WeightedExtentCalculator,
};

/// Main scroll axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Axis {
    /// Items are laid out left to right.
    #[default]
    Horizontal,
    /// Items are laid out top to bottom.
    Vertical,
}

impl Axis {
    /// Extent of `size` along this axis.
    #[must_use]
    pub fn main(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Extent of `size` across this axis.
    #[must_use]
    pub fn cross(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    /// Component of `v` along this axis.
    #[must_use]
    pub fn component(self, v: Vec2) -> f64 {
        match self {
            Self::Horizontal => v.x,
            Self::Vertical => v.y,
        }
    }
}

/// Placement of the large item in a hero carousel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HeroAlignment {
    /// Large item at the leading edge, one peek after it.
    Left,
    /// Large item between two peeks.
    #[default]
    Center,
    /// One peek, then the large item at the trailing edge.
    Right,
}

/// Layout variant of a carousel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CarouselKind {
    /// One large item with small peeks of its neighbors.
    Hero(HeroAlignment),
    /// Several items of decreasing size, all fully inside the viewport.
    Contained {
        /// Show four items instead of three.
        extended: bool,
    },
    /// Items of one fixed extent; the leading and trailing items compress.
    Uncontained {
        /// Nominal item extent.
        item_extent: f64,
        /// Smallest extent a compressed item may take.
        shrink_extent: f64,
    },
}

impl Default for CarouselKind {
    fn default() -> Self {
        Self::Hero(HeroAlignment::default())
    }
}

impl CarouselKind {
    /// Default uncontained item extent.
    pub const UNCONTAINED_ITEM_EXTENT: f64 = 270.0;
    /// Default uncontained shrink extent.
    pub const UNCONTAINED_SHRINK_EXTENT: f64 = 150.0;

    /// Uncontained layout with the default extents.
    #[must_use]
    pub fn uncontained() -> Self {
        Self::Uncontained {
            item_extent: Self::UNCONTAINED_ITEM_EXTENT,
            shrink_extent: Self::UNCONTAINED_SHRINK_EXTENT,
        }
    }

    /// The weight table for weighted variants; `None` for uncontained.
    #[must_use]
    pub fn weight_table(&self) -> Option<&'static [u32]> {
        let table: &'static [u32] = match self {
            Self::Hero(HeroAlignment::Left) => &LayoutWeights::HERO_LEFT,
            Self::Hero(HeroAlignment::Center) => &LayoutWeights::HERO_CENTER,
            Self::Hero(HeroAlignment::Right) => &LayoutWeights::HERO_RIGHT,
            Self::Contained { extended: false } => &LayoutWeights::CONTAINED,
            Self::Contained { extended: true } => &LayoutWeights::CONTAINED_EXTENDED,
            Self::Uncontained { .. } => return None,
        };
        Some(table)
    }

    /// How many items from the end a forward swipe must stop.
    #[must_use]
    pub fn swipe_bound(&self) -> usize {
        match self {
            Self::Hero(HeroAlignment::Left | HeroAlignment::Right) => 2,
            Self::Hero(HeroAlignment::Center) => 3,
            Self::Contained { extended: false } => 3,
            Self::Contained { extended: true } => 4,
            Self::Uncontained { .. } => 1,
        }
    }
}

/// Easing applied to animated scroll transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AnimationCurve {
    /// Constant speed.
    Linear,
    /// Standard ease (fast start, gentle finish).
    #[default]
    Ease,
    /// Accelerating.
    EaseIn,
    /// Decelerating.
    EaseOut,
    /// Accelerating then decelerating.
    EaseInOut,
}

/// Immutable carousel configuration.
///
/// Built and validated by [`CarouselConfigBuilder`]; a changed configuration
/// replaces the old one wholesale.
///
/// ```
/// use understory_carousel::{CarouselConfig, CarouselKind, HeroAlignment};
///
/// let config = CarouselConfig::builder()
///     .kind(CarouselKind::Hero(HeroAlignment::Right))
///     .build()
///     .unwrap();
/// assert_eq!(config.weights().unwrap().as_slice(), &[2, 8]);
/// assert_eq!(config.initial_item(), 1);
/// assert_eq!(config.swipe_bound(), 2);
///
/// // Validation happens once, at build time.
/// let bad = CarouselConfig::builder()
///     .kind(CarouselKind::Uncontained { item_extent: 0.0, shrink_extent: 10.0 })
///     .build();
/// assert!(bad.is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CarouselConfig {
    kind: CarouselKind,
    weights: Option<LayoutWeights>,
    axis: Axis,
    width: Option<f64>,
    height: Option<f64>,
    shrink_extent: f64,
    consume_max_weight: bool,
    border_radius: f64,
    scroll_animation_duration: Duration,
    title_fade_animation_duration: Duration,
    free_scroll: bool,
    item_snapping: bool,
    swipe_sensitivity: f64,
    platform_sensitivity_override: Option<f64>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        let kind = CarouselKind::default();
        Self {
            kind,
            weights: kind
                .weight_table()
                .and_then(|table| LayoutWeights::new(table.iter().copied()).ok()),
            axis: Axis::default(),
            width: None,
            height: None,
            shrink_extent: 0.0,
            consume_max_weight: true,
            border_radius: Self::DEFAULT_BORDER_RADIUS,
            scroll_animation_duration: Self::DEFAULT_SCROLL_ANIMATION_DURATION,
            title_fade_animation_duration: Self::DEFAULT_TITLE_FADE_DURATION,
            free_scroll: false,
            item_snapping: false,
            swipe_sensitivity: Self::DEFAULT_SWIPE_SENSITIVITY,
            platform_sensitivity_override: None,
        }
    }
}

impl CarouselConfig {
    /// Default corner radius passed through to the renderer.
    pub const DEFAULT_BORDER_RADIUS: f64 = 20.0;
    /// Default duration of swipe-triggered scroll animations.
    pub const DEFAULT_SCROLL_ANIMATION_DURATION: Duration = Duration::from_millis(500);
    /// Default duration of title fades.
    pub const DEFAULT_TITLE_FADE_DURATION: Duration = Duration::from_millis(250);
    /// Default drag-end speed (pixels per second) a swipe must exceed.
    pub const DEFAULT_SWIPE_SENSITIVITY: f64 = 300.0;

    /// Starts a builder with default values.
    #[must_use]
    pub fn builder() -> CarouselConfigBuilder {
        CarouselConfigBuilder::default()
    }

    /// Layout variant.
    #[must_use]
    pub fn kind(&self) -> CarouselKind {
        self.kind
    }

    /// Weight table for weighted variants.
    #[must_use]
    pub fn weights(&self) -> Option<&LayoutWeights> {
        self.weights.as_ref()
    }

    /// Main scroll axis.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Fixed viewport width, if any.
    #[must_use]
    pub fn width(&self) -> Option<f64> {
        self.width
    }

    /// Fixed viewport height, if any.
    #[must_use]
    pub fn height(&self) -> Option<f64> {
        self.height
    }

    /// Shrink floor of weighted variants.
    #[must_use]
    pub fn shrink_extent(&self) -> f64 {
        self.shrink_extent
    }

    /// Whether edge items of weighted variants may grow to the largest slot.
    #[must_use]
    pub fn consume_max_weight(&self) -> bool {
        self.consume_max_weight
    }

    /// Item corner radius, for the renderer.
    #[must_use]
    pub fn border_radius(&self) -> f64 {
        self.border_radius
    }

    /// Duration of swipe-triggered scroll animations.
    #[must_use]
    pub fn scroll_animation_duration(&self) -> Duration {
        self.scroll_animation_duration
    }

    /// Duration of title fades, for the renderer.
    #[must_use]
    pub fn title_fade_animation_duration(&self) -> Duration {
        self.title_fade_animation_duration
    }

    /// Whether drags scroll freely instead of stepping one item per swipe.
    #[must_use]
    pub fn free_scroll(&self) -> bool {
        self.free_scroll
    }

    /// Whether free-scroll releases settle on item boundaries.
    #[must_use]
    pub fn item_snapping(&self) -> bool {
        self.item_snapping
    }

    /// Configured swipe sensitivity.
    #[must_use]
    pub fn swipe_sensitivity(&self) -> f64 {
        self.swipe_sensitivity
    }

    /// Threshold supplied by the embedding platform, if any.
    #[must_use]
    pub fn platform_sensitivity_override(&self) -> Option<f64> {
        self.platform_sensitivity_override
    }

    /// Effective drag-end speed a swipe must exceed.
    #[must_use]
    pub fn swipe_threshold(&self) -> f64 {
        self.platform_sensitivity_override
            .unwrap_or(self.swipe_sensitivity)
    }

    /// How many items from the end a forward swipe must stop.
    #[must_use]
    pub fn swipe_bound(&self) -> usize {
        self.kind.swipe_bound()
    }

    /// Item shown on first layout: the slot of the largest weight.
    #[must_use]
    pub fn initial_item(&self) -> usize {
        self.weights
            .as_ref()
            .map_or(0, LayoutWeights::leading_count_before_max)
    }

    /// Scroll distance of one swipe step for a viewport of `viewport_extent`.
    ///
    /// Weighted variants step by a tenth of the viewport per unit of the
    /// largest weight, which is not always the distance to the next item
    /// boundary.
    #[must_use]
    pub fn step_extent(&self, viewport_extent: f64) -> f64 {
        match (&self.kind, &self.weights) {
            (CarouselKind::Uncontained { item_extent, .. }, _) => *item_extent,
            (_, Some(weights)) => f64::from(weights.max()) / 10.0 * viewport_extent,
            (_, None) => 0.0,
        }
    }

    /// The extent calculator for this configuration.
    #[must_use]
    pub fn calculator(&self) -> ActiveCalculator {
        match (&self.kind, &self.weights) {
            (
                CarouselKind::Uncontained {
                    item_extent,
                    shrink_extent,
                },
                _,
            ) => ActiveCalculator::Fixed(FixedExtentCalculator::new(*item_extent, *shrink_extent)),
            (_, Some(weights)) => ActiveCalculator::Weighted(WeightedExtentCalculator::new(
                weights.clone(),
                self.shrink_extent,
                self.consume_max_weight,
            )),
            (_, None) => ActiveCalculator::Fixed(FixedExtentCalculator::new(
                CarouselKind::UNCONTAINED_ITEM_EXTENT,
                CarouselKind::UNCONTAINED_SHRINK_EXTENT,
            )),
        }
    }

    /// How one item's scroll distance relates to the viewport.
    #[must_use]
    pub fn item_metric(&self) -> ItemMetric {
        match (&self.kind, &self.weights) {
            (CarouselKind::Uncontained { item_extent, .. }, _) => ItemMetric::Fixed(*item_extent),
            (_, Some(weights)) => ItemMetric::Weighted {
                first: weights.first(),
                sum: weights.sum(),
            },
            (_, None) => ItemMetric::Fixed(CarouselKind::UNCONTAINED_ITEM_EXTENT),
        }
    }

    /// Viewport size given the space the host makes available.
    ///
    /// Fixed width and height take precedence over `available`.
    #[must_use]
    pub fn resolve_viewport(&self, available: Size) -> Size {
        Size::new(
            self.width.unwrap_or(available.width),
            self.height.unwrap_or(available.height),
        )
    }

    /// Main-axis viewport extent given the space the host makes available.
    #[must_use]
    pub fn main_extent(&self, available: Size) -> f64 {
        self.axis.main(self.resolve_viewport(available))
    }
}

/// Builder for [`CarouselConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct CarouselConfigBuilder {
    config: CarouselConfig,
}

impl Default for CarouselConfigBuilder {
    fn default() -> Self {
        Self {
            config: CarouselConfig::default(),
        }
    }
}

impl CarouselConfigBuilder {
    /// Sets the layout variant.
    #[must_use]
    pub fn kind(mut self, kind: CarouselKind) -> Self {
        self.config.kind = kind;
        self
    }

    /// Sets the main scroll axis.
    #[must_use]
    pub fn axis(mut self, axis: Axis) -> Self {
        self.config.axis = axis;
        self
    }

    /// Fixes the viewport width instead of filling the available space.
    #[must_use]
    pub fn width(mut self, width: f64) -> Self {
        self.config.width = Some(width);
        self
    }

    /// Fixes the viewport height instead of filling the available space.
    #[must_use]
    pub fn height(mut self, height: f64) -> Self {
        self.config.height = Some(height);
        self
    }

    /// Sets the shrink floor for weighted variants.
    #[must_use]
    pub fn shrink_extent(mut self, shrink_extent: f64) -> Self {
        self.config.shrink_extent = shrink_extent;
        self
    }

    /// Lets edge items of weighted variants grow to the largest slot.
    #[must_use]
    pub fn consume_max_weight(mut self, consume: bool) -> Self {
        self.config.consume_max_weight = consume;
        self
    }

    /// Sets the item corner radius.
    #[must_use]
    pub fn border_radius(mut self, radius: f64) -> Self {
        self.config.border_radius = radius;
        self
    }

    /// Sets the swipe animation duration.
    #[must_use]
    pub fn scroll_animation_duration(mut self, duration: Duration) -> Self {
        self.config.scroll_animation_duration = duration;
        self
    }

    /// Sets the title fade duration.
    #[must_use]
    pub fn title_fade_animation_duration(mut self, duration: Duration) -> Self {
        self.config.title_fade_animation_duration = duration;
        self
    }

    /// Switches between free scrolling and one-item swipes.
    #[must_use]
    pub fn free_scroll(mut self, free_scroll: bool) -> Self {
        self.config.free_scroll = free_scroll;
        self
    }

    /// Settles free-scroll releases on item boundaries.
    #[must_use]
    pub fn item_snapping(mut self, item_snapping: bool) -> Self {
        self.config.item_snapping = item_snapping;
        self
    }

    /// Sets the drag-end speed a swipe must exceed.
    #[must_use]
    pub fn swipe_sensitivity(mut self, sensitivity: f64) -> Self {
        self.config.swipe_sensitivity = sensitivity;
        self
    }

    /// Overrides the swipe threshold for the embedding platform.
    ///
    /// Pointer-driven environments typically pass `0.0` so any release
    /// with motion counts as a swipe.
    #[must_use]
    pub fn platform_sensitivity_override(mut self, threshold: Option<f64>) -> Self {
        self.config.platform_sensitivity_override = threshold;
        self
    }

    /// Validates the configuration and derives its weight table.
    pub fn build(self) -> Result<CarouselConfig, ConfigError> {
        let mut config = self.config;

        if let CarouselKind::Uncontained {
            item_extent,
            shrink_extent,
        } = config.kind
        {
            if !item_extent.is_finite() || item_extent <= 0.0 {
                return Err(ConfigError::InvalidItemExtent(item_extent));
            }
            check_non_negative(shrink_extent, ConfigError::InvalidShrinkExtent)?;
        }
        check_non_negative(config.shrink_extent, ConfigError::InvalidShrinkExtent)?;
        check_non_negative(config.swipe_sensitivity, ConfigError::InvalidSensitivity)?;
        if let Some(threshold) = config.platform_sensitivity_override {
            check_non_negative(threshold, ConfigError::InvalidSensitivity)?;
        }
        for size in [config.width, config.height].into_iter().flatten() {
            check_non_negative(size, ConfigError::InvalidViewportSize)?;
        }

        config.weights = match config.kind.weight_table() {
            Some(table) => Some(LayoutWeights::new(table.iter().copied())?),
            None => None,
        };
        log::debug!("carousel config built: {:?}", config.kind);
        Ok(config)
    }
}

fn check_non_negative(value: f64, error: fn(f64) -> ConfigError) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(error(value))
    }
}
