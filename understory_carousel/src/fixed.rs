// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-extent layout used by the uncontained carousel.

use crate::calculator::{slot_index, to_f64, trailing_slot_index};
use crate::{ExtentCalculator, LayoutMetrics};

/// Extent calculator where every item shares one nominal extent.
///
/// Only the item crossing the leading edge and the item crossing the trailing
/// edge change size: the leading item is compressed as it scrolls off, the
/// trailing item shows the part of itself that fits. Neither goes below the
/// effective minimum extent, which widens to the leftover space of the
/// viewport so the trailing item never jumps in size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedExtentCalculator {
    max_extent: f64,
    min_extent: f64,
}

impl FixedExtentCalculator {
    /// Creates a calculator with nominal `max_extent` and shrink floor `min_extent`.
    ///
    /// `min_extent` is clamped into `[0, max_extent]`.
    #[must_use]
    pub fn new(max_extent: f64, min_extent: f64) -> Self {
        // Extents are expected to be finite and positive; configurations are
        // validated before reaching here, so catch misuse in debug builds.
        debug_assert!(
            max_extent.is_finite() && max_extent > 0.0,
            "FixedExtentCalculator extent must be positive and finite; got {max_extent:?}"
        );
        let max_extent = max_extent.max(0.0);
        Self {
            max_extent,
            min_extent: min_extent.clamp(0.0, max_extent),
        }
    }

    /// Nominal item extent.
    #[must_use]
    pub const fn max_extent(&self) -> f64 {
        self.max_extent
    }

    /// Configured shrink floor.
    #[must_use]
    pub const fn min_extent(&self) -> f64 {
        self.min_extent
    }

    /// The shrink floor, widened to the space left after the last whole item.
    #[must_use]
    pub fn effective_min_extent(&self, metrics: &LayoutMetrics) -> f64 {
        if self.max_extent <= 0.0 {
            return self.min_extent;
        }
        libm::fmod(metrics.remaining_paint_extent, self.max_extent).max(self.min_extent)
    }

    fn trailing_index(&self, metrics: &LayoutMetrics) -> isize {
        if self.max_extent <= 0.0 {
            return 0;
        }
        let end = metrics.scroll_offset + metrics.remaining_paint_extent;
        trailing_slot_index(end / self.max_extent).max(0)
    }
}

impl ExtentCalculator for FixedExtentCalculator {
    fn first_visible_index(&self, metrics: &LayoutMetrics) -> isize {
        if self.max_extent <= 0.0 {
            return 0;
        }
        slot_index(metrics.scroll_offset / self.max_extent).max(0)
    }

    fn last_visible_index(&self, metrics: &LayoutMetrics, child_count: usize) -> isize {
        let first = self.first_visible_index(metrics);
        let last_child = isize::try_from(child_count).unwrap_or(isize::MAX) - 1;
        self.trailing_index(metrics).min(last_child).max(first)
    }

    fn item_extent(&self, index: isize, metrics: &LayoutMetrics) -> f64 {
        let first = self.first_visible_index(metrics);
        let effective_min = self.effective_min_extent(metrics);

        if index == first {
            let offscreen = metrics.scroll_offset - to_f64(first) * self.max_extent;
            return (self.max_extent - offscreen).max(effective_min);
        }

        if index == self.trailing_index(metrics) {
            let end = metrics.scroll_offset + metrics.remaining_paint_extent;
            return (end - self.max_extent * to_f64(index)).clamp(effective_min, self.max_extent);
        }

        self.max_extent
    }

    fn layout_offset(&self, index: isize, metrics: &LayoutMetrics) -> f64 {
        let first = self.first_visible_index(metrics);
        if index == first {
            let effective_min = self.effective_min_extent(metrics);
            if self.item_extent(index, metrics) <= effective_min {
                // Pinned at the floor: scroll off like a normal item.
                return self.max_extent * to_f64(index + 1) - effective_min;
            }
            return metrics.scroll_offset;
        }
        self.max_extent * to_f64(index)
    }

    fn scroll_extent(&self, child_count: usize, _metrics: &LayoutMetrics) -> f64 {
        self.max_extent * child_count as f64
    }

    fn item_stride(&self, _viewport_extent: f64) -> f64 {
        self.max_extent
    }
}
