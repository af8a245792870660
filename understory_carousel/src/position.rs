// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll position bookkeeping in item units.
//!
//! The carousel thinks in items while the host scrolls in pixels. When the
//! viewport is resized, the pixel offset of the item currently shown changes
//! with it; [`ScrollPositionAdapter`] converts through item space so the same
//! item stays in view, including across a collapse to zero extent.
//!
//! ```
//! use understory_carousel::{ItemMetric, ScrollPositionAdapter, ViewportUpdate};
//!
//! let mut position = ScrollPositionAdapter::new(ItemMetric::Weighted { first: 5, sum: 10 }, 0);
//! assert_eq!(position.apply_viewport_extent(1000.0), ViewportUpdate::Corrected(0.0));
//!
//! // Scroll to the third item, then halve the viewport.
//! position.set_pixels(1000.0);
//! assert_eq!(position.current_item(), 2.0);
//! assert_eq!(position.apply_viewport_extent(500.0), ViewportUpdate::Corrected(500.0));
//! assert_eq!(position.current_item(), 2.0);
//! ```

use crate::ScrollMetrics;
use crate::calculator::snap_ratio;

/// How one item's scroll distance relates to the viewport extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ItemMetric {
    /// Every item scrolls by this many pixels, independent of the viewport.
    Fixed(f64),
    /// Items scroll by `first / sum` of the viewport extent.
    Weighted {
        /// Weight of the leading slot.
        first: u32,
        /// Sum of all weights.
        sum: u32,
    },
}

impl ItemMetric {
    /// Scroll distance of one item for the given viewport extent.
    #[must_use]
    pub fn item_extent(&self, viewport_extent: f64) -> f64 {
        match *self {
            Self::Fixed(extent) => extent,
            Self::Weighted { first, sum } => {
                if sum == 0 {
                    0.0
                } else {
                    viewport_extent * f64::from(first) / f64::from(sum)
                }
            }
        }
    }
}

/// Result of [`ScrollPositionAdapter::apply_viewport_extent`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportUpdate {
    /// The extent did not change.
    Unchanged,
    /// The extent changed and the pixel offset is still valid.
    Accepted,
    /// The extent changed and the host must adopt this pixel offset.
    Corrected(f64),
}

/// Scroll position of a carousel, tracked in pixels and convertible to items.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollPositionAdapter {
    metric: ItemMetric,
    initial_item: usize,
    pixels: Option<f64>,
    viewport_extent: Option<f64>,
    cached_item: Option<f64>,
    min_scroll_extent: f64,
    max_scroll_extent: f64,
}

impl ScrollPositionAdapter {
    /// Creates a position that will show `initial_item` once the viewport is
    /// first measured.
    #[must_use]
    pub fn new(metric: ItemMetric, initial_item: usize) -> Self {
        Self {
            metric,
            initial_item,
            pixels: None,
            viewport_extent: None,
            cached_item: None,
            min_scroll_extent: 0.0,
            max_scroll_extent: 0.0,
        }
    }

    /// Item-to-pixel relation.
    #[must_use]
    pub fn metric(&self) -> ItemMetric {
        self.metric
    }

    /// Item shown before the first viewport measurement.
    #[must_use]
    pub fn initial_item(&self) -> usize {
        self.initial_item
    }

    /// Replaces the item shown at the first viewport measurement.
    ///
    /// Has no visible effect once the position holds pixels.
    pub fn set_initial_item(&mut self, initial_item: usize) {
        self.initial_item = initial_item;
    }

    /// Current pixel offset; `0.0` before the first viewport measurement.
    #[must_use]
    pub fn pixels(&self) -> f64 {
        self.pixels.unwrap_or(0.0)
    }

    /// Returns `true` once a pixel offset has been established.
    #[must_use]
    pub fn has_pixels(&self) -> bool {
        self.pixels.is_some()
    }

    /// Last applied viewport extent, if any.
    #[must_use]
    pub fn viewport_extent(&self) -> Option<f64> {
        self.viewport_extent
    }

    /// Item remembered while the viewport is collapsed to zero.
    #[must_use]
    pub fn cached_item(&self) -> Option<f64> {
        self.cached_item
    }

    /// Smallest in-range pixel offset.
    #[must_use]
    pub fn min_scroll_extent(&self) -> f64 {
        self.min_scroll_extent
    }

    /// Largest in-range pixel offset.
    #[must_use]
    pub fn max_scroll_extent(&self) -> f64 {
        self.max_scroll_extent
    }

    /// Scroll distance of one item at the current viewport extent.
    #[must_use]
    pub fn item_stride(&self) -> f64 {
        self.metric.item_extent(self.viewport_extent.unwrap_or(0.0))
    }

    /// Snapshot for [`SnapPhysics`](crate::SnapPhysics).
    #[must_use]
    pub fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            pixels: self.pixels(),
            min_scroll_extent: self.min_scroll_extent,
            max_scroll_extent: self.max_scroll_extent,
        }
    }

    /// Converts a pixel offset at `viewport_extent` to a fractional item.
    ///
    /// Values within tolerance of a whole item are snapped to it.
    #[must_use]
    pub fn item_from_pixels(&self, pixels: f64, viewport_extent: f64) -> f64 {
        let extent = self.metric.item_extent(viewport_extent);
        if extent <= 0.0 || !extent.is_finite() {
            return 0.0;
        }
        snap_ratio(pixels.max(0.0) / extent)
    }

    /// Converts a fractional item to a pixel offset at the current extent.
    #[must_use]
    pub fn pixels_from_item(&self, item: f64) -> f64 {
        item * self.item_stride()
    }

    /// The item currently in view.
    ///
    /// While no usable extent is known this is the cached or initial item.
    #[must_use]
    pub fn current_item(&self) -> f64 {
        match (self.pixels, self.viewport_extent) {
            (Some(pixels), Some(extent)) if extent > 0.0 => self.item_from_pixels(pixels, extent),
            _ => self
                .cached_item
                .unwrap_or(self.initial_item as f64),
        }
    }

    /// Applies a new viewport extent, keeping the same item in view.
    pub fn apply_viewport_extent(&mut self, viewport_extent: f64) -> ViewportUpdate {
        let old_extent = self.viewport_extent;
        if old_extent == Some(viewport_extent) {
            return ViewportUpdate::Unchanged;
        }
        self.viewport_extent = Some(viewport_extent);

        let item = match (self.pixels, old_extent) {
            (None, _) | (_, None) => self.initial_item as f64,
            (Some(_), Some(old)) if old <= 0.0 => {
                self.cached_item.unwrap_or(self.initial_item as f64)
            }
            (Some(pixels), Some(old)) => self.item_from_pixels(pixels, old),
        };
        let new_pixels = self.pixels_from_item(item);
        self.cached_item = (viewport_extent <= 0.0).then_some(item);

        if self.pixels == Some(new_pixels) {
            return ViewportUpdate::Accepted;
        }
        log::debug!(
            "carousel viewport {old_extent:?} -> {viewport_extent}: item {item} moves to {new_pixels}px"
        );
        self.pixels = Some(new_pixels);
        ViewportUpdate::Corrected(new_pixels)
    }

    /// Updates the scrollable range; returns `true` if it changed.
    pub fn apply_content_dimensions(
        &mut self,
        min_scroll_extent: f64,
        max_scroll_extent: f64,
    ) -> bool {
        let max_scroll_extent = max_scroll_extent.max(min_scroll_extent);
        if self.min_scroll_extent == min_scroll_extent
            && self.max_scroll_extent == max_scroll_extent
        {
            return false;
        }
        self.min_scroll_extent = min_scroll_extent;
        self.max_scroll_extent = max_scroll_extent;
        true
    }

    /// Sets the pixel offset verbatim, as reported by a running animation.
    pub fn set_pixels(&mut self, pixels: f64) {
        self.pixels = Some(pixels);
    }

    /// Moves by `delta` pixels, clamped to the scrollable range.
    ///
    /// Returns the distance actually moved.
    pub fn scroll_by(&mut self, delta: f64) -> f64 {
        let current = self.pixels();
        let next = (current + delta).clamp(self.min_scroll_extent, self.max_scroll_extent);
        self.pixels = Some(next);
        next - current
    }

    /// Jumps to `item` without animation and returns the new pixel offset.
    pub fn jump_to_item(&mut self, item: f64) -> f64 {
        let pixels = self.pixels_from_item(item);
        if self.viewport_extent.is_some_and(|extent| extent <= 0.0) {
            self.cached_item = Some(item);
        }
        self.pixels = Some(pixels);
        pixels
    }

    /// Replaces the item metric, keeping the current item in view.
    ///
    /// Returns the corrected pixel offset when it moved.
    pub fn set_metric(&mut self, metric: ItemMetric) -> Option<f64> {
        if self.metric == metric {
            return None;
        }
        let item = self.current_item();
        self.metric = metric;
        if self.pixels.is_none() || self.viewport_extent.is_none() {
            return None;
        }
        let pixels = self.pixels_from_item(item);
        if self.pixels == Some(pixels) {
            return None;
        }
        self.pixels = Some(pixels);
        Some(pixels)
    }

    /// Returns a snapshot of the current position for debugging.
    #[must_use]
    pub fn debug_info(&self) -> ScrollPositionDebugInfo {
        ScrollPositionDebugInfo {
            pixels: self.pixels,
            viewport_extent: self.viewport_extent,
            min_scroll_extent: self.min_scroll_extent,
            max_scroll_extent: self.max_scroll_extent,
            item: self.current_item(),
            cached_item: self.cached_item,
            initial_item: self.initial_item,
        }
    }
}

/// Debug snapshot of a [`ScrollPositionAdapter`].
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollPositionDebugInfo {
    /// Current pixel offset, if established.
    pub pixels: Option<f64>,
    /// Last applied viewport extent.
    pub viewport_extent: Option<f64>,
    /// Smallest in-range pixel offset.
    pub min_scroll_extent: f64,
    /// Largest in-range pixel offset.
    pub max_scroll_extent: f64,
    /// Fractional item currently in view.
    pub item: f64,
    /// Item remembered across a zero-extent viewport.
    pub cached_item: Option<f64>,
    /// Item shown on startup.
    pub initial_item: usize,
}
