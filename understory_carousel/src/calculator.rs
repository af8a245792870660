// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability interface shared by the carousel extent calculators.

use crate::{FixedExtentCalculator, WeightedExtentCalculator};

/// Tolerance used when deciding whether a ratio sits on an integer boundary.
///
/// Ratios closer than this to an integer are snapped to it, so scroll
/// positions that are exactly on an item boundary never flicker between two
/// first-visible indices because of rounding.
pub const PRECISION_ERROR_TOLERANCE: f64 = 1e-10;

/// Inputs of a single layout query, in main-axis pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutMetrics {
    /// Scroll offset of the viewport's leading edge.
    pub scroll_offset: f64,
    /// Main-axis extent of the viewport.
    pub viewport_extent: f64,
    /// Extent still available for painting from the scroll offset onwards.
    ///
    /// This is the viewport extent unless the host clips the carousel.
    pub remaining_paint_extent: f64,
}

impl LayoutMetrics {
    /// Metrics where the whole viewport is available for painting.
    #[must_use]
    pub fn new(scroll_offset: f64, viewport_extent: f64) -> Self {
        Self {
            scroll_offset,
            viewport_extent,
            remaining_paint_extent: viewport_extent,
        }
    }

    /// Overrides the remaining paint extent.
    #[must_use]
    pub fn with_remaining_paint_extent(mut self, remaining: f64) -> Self {
        self.remaining_paint_extent = remaining;
        self
    }

    /// Returns `true` when these metrics describe a non-degenerate viewport.
    #[must_use]
    pub fn is_layoutable(&self) -> bool {
        self.viewport_extent > 0.0
            && self.viewport_extent.is_finite()
            && self.scroll_offset.is_finite()
            && self.remaining_paint_extent.is_finite()
    }
}

/// Per-index extent and offset queries driven by a layout pass.
///
/// Indices are signed: the weighted calculator can place its first visible
/// slot before item `0` to leave lead-in space, and those virtual slots still
/// contribute extent to the running offset. Hosts only lay out indices in
/// `0..child_count`.
///
/// Implementations are pure: every answer depends only on `self` and the
/// metrics passed in.
pub trait ExtentCalculator {
    /// Index anchored at, or crossing, the viewport's leading edge.
    fn first_visible_index(&self, metrics: &LayoutMetrics) -> isize;

    /// Last index needed to fill the viewport, given `child_count` children.
    fn last_visible_index(&self, metrics: &LayoutMetrics, child_count: usize) -> isize;

    /// Main-axis extent of the item at `index`.
    fn item_extent(&self, index: isize, metrics: &LayoutMetrics) -> f64;

    /// Layout offset (in scroll coordinates) of the item at `index`.
    fn layout_offset(&self, index: isize, metrics: &LayoutMetrics) -> f64;

    /// Total scrollable extent for `child_count` children, including the
    /// viewport itself.
    fn scroll_extent(&self, child_count: usize, metrics: &LayoutMetrics) -> f64;

    /// Scroll distance between two consecutive resting item positions.
    fn item_stride(&self, viewport_extent: f64) -> f64;
}

/// The calculator selected by a carousel configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ActiveCalculator {
    /// Hero and contained layouts.
    Weighted(WeightedExtentCalculator),
    /// Uncontained layout.
    Fixed(FixedExtentCalculator),
}

impl ExtentCalculator for ActiveCalculator {
    fn first_visible_index(&self, metrics: &LayoutMetrics) -> isize {
        match self {
            Self::Weighted(c) => c.first_visible_index(metrics),
            Self::Fixed(c) => c.first_visible_index(metrics),
        }
    }

    fn last_visible_index(&self, metrics: &LayoutMetrics, child_count: usize) -> isize {
        match self {
            Self::Weighted(c) => c.last_visible_index(metrics, child_count),
            Self::Fixed(c) => c.last_visible_index(metrics, child_count),
        }
    }

    fn item_extent(&self, index: isize, metrics: &LayoutMetrics) -> f64 {
        match self {
            Self::Weighted(c) => c.item_extent(index, metrics),
            Self::Fixed(c) => c.item_extent(index, metrics),
        }
    }

    fn layout_offset(&self, index: isize, metrics: &LayoutMetrics) -> f64 {
        match self {
            Self::Weighted(c) => c.layout_offset(index, metrics),
            Self::Fixed(c) => c.layout_offset(index, metrics),
        }
    }

    fn scroll_extent(&self, child_count: usize, metrics: &LayoutMetrics) -> f64 {
        match self {
            Self::Weighted(c) => c.scroll_extent(child_count, metrics),
            Self::Fixed(c) => c.scroll_extent(child_count, metrics),
        }
    }

    fn item_stride(&self, viewport_extent: f64) -> f64 {
        match self {
            Self::Weighted(c) => c.item_stride(viewport_extent),
            Self::Fixed(c) => c.item_stride(viewport_extent),
        }
    }
}

/// Snaps `ratio` to the nearest integer when within tolerance.
pub(crate) fn snap_ratio(ratio: f64) -> f64 {
    let rounded = libm::round(ratio);
    if (ratio - rounded).abs() < PRECISION_ERROR_TOLERANCE {
        rounded
    } else {
        ratio
    }
}

/// Converts a ratio to a slot index: the nearest integer when within
/// tolerance, otherwise the floor.
pub(crate) fn slot_index(ratio: f64) -> isize {
    to_isize(libm::floor(snap_ratio(ratio)))
}

/// Converts a non-negative ratio to the index of the slot containing its end:
/// the nearest integer minus one when within tolerance, otherwise the
/// ceiling minus one.
pub(crate) fn trailing_slot_index(ratio: f64) -> isize {
    let ratio = snap_ratio(ratio);
    to_isize(libm::ceil(ratio)) - 1
}

pub(crate) fn to_isize(value: f64) -> isize {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Used only for slot indices; callers clamp the result to the child range"
    )]
    {
        value as isize
    }
}

pub(crate) fn to_f64(index: isize) -> f64 {
    index as f64
}

#[cfg(test)]
mod tests {
    use super::{LayoutMetrics, slot_index, snap_ratio, trailing_slot_index};

    #[test]
    fn slot_index_snaps_near_integers() {
        assert_eq!(slot_index(2.0), 2);
        assert_eq!(slot_index(2.999_999_999_999_9), 3);
        assert_eq!(slot_index(2.5), 2);
        assert_eq!(slot_index(-0.5), -1);
    }

    #[test]
    fn trailing_slot_index_excludes_exact_boundary() {
        assert_eq!(trailing_slot_index(3.0), 2);
        assert_eq!(trailing_slot_index(3.000_000_000_000_01), 2);
        assert_eq!(trailing_slot_index(3.2), 3);
    }

    #[test]
    fn snap_ratio_leaves_fractions_alone() {
        assert_eq!(snap_ratio(1.25), 1.25);
        assert_eq!(snap_ratio(0.999_999_999_999_99), 1.0);
    }

    #[test]
    fn metrics_reject_degenerate_viewports() {
        assert!(LayoutMetrics::new(0.0, 100.0).is_layoutable());
        assert!(!LayoutMetrics::new(0.0, 0.0).is_layoutable());
        assert!(!LayoutMetrics::new(f64::NAN, 100.0).is_layoutable());
        let clipped = LayoutMetrics::new(10.0, 100.0).with_remaining_paint_extent(40.0);
        assert_eq!(clipped.remaining_paint_extent, 40.0);
    }
}
