// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weighted variable-extent layout used by the hero and contained carousels.
//!
//! The viewport is split into slots proportional to a [`LayoutWeights`]
//! table. Scrolling by one leading-slot extent moves every item one slot
//! towards the leading edge; in between, each item's extent is interpolated
//! between the nominal extents of the slot it is leaving and the slot it is
//! entering, so items grow and shrink continuously.
//!
//! ```
//! use understory_carousel::{ExtentCalculator, LayoutMetrics, LayoutWeights, WeightedExtentCalculator};
//!
//! let weights = LayoutWeights::new([5, 4, 1]).unwrap();
//! let calc = WeightedExtentCalculator::new(weights, 0.0, false);
//!
//! // At rest, items match their slots exactly.
//! let metrics = LayoutMetrics::new(0.0, 1000.0);
//! assert_eq!(calc.first_visible_index(&metrics), 0);
//! assert_eq!(calc.item_extent(0, &metrics), 500.0);
//! assert_eq!(calc.item_extent(1, &metrics), 400.0);
//! assert_eq!(calc.item_extent(2, &metrics), 100.0);
//!
//! // Halfway through the leading slot, item 1 is halfway between 400 and 500.
//! let metrics = LayoutMetrics::new(250.0, 1000.0);
//! assert_eq!(calc.item_extent(0, &metrics), 250.0);
//! assert_eq!(calc.item_extent(1, &metrics), 450.0);
//! ```

use crate::calculator::{PRECISION_ERROR_TOLERANCE, slot_index, to_f64};
use crate::{ExtentCalculator, LayoutMetrics, LayoutWeights};

/// Extent calculator for weight-table carousels.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedExtentCalculator {
    weights: LayoutWeights,
    shrink_extent: f64,
    allow_fully_expand: bool,
}

impl WeightedExtentCalculator {
    /// Creates a calculator.
    ///
    /// - `shrink_extent` is the smallest extent an item leaving the leading
    ///   edge may be compressed to; it is clamped to the smallest nominal slot
    ///   extent at layout time.
    /// - `allow_fully_expand` shifts the first visible index back so that the
    ///   first and last items can both occupy the largest slot.
    #[must_use]
    pub fn new(weights: LayoutWeights, shrink_extent: f64, allow_fully_expand: bool) -> Self {
        debug_assert!(
            shrink_extent.is_finite(),
            "shrink extent must be finite; got {shrink_extent:?}"
        );
        Self {
            weights,
            shrink_extent: shrink_extent.max(0.0),
            allow_fully_expand,
        }
    }

    /// The weight table.
    #[must_use]
    pub fn weights(&self) -> &LayoutWeights {
        &self.weights
    }

    /// The configured shrink extent, before clamping.
    #[must_use]
    pub fn shrink_extent(&self) -> f64 {
        self.shrink_extent
    }

    /// Whether edge items may expand to the largest slot.
    #[must_use]
    pub fn allows_fully_expand(&self) -> bool {
        self.allow_fully_expand
    }

    /// Extent of one weight unit.
    #[must_use]
    pub fn extent_unit(&self, viewport_extent: f64) -> f64 {
        viewport_extent / f64::from(self.weights.sum())
    }

    /// Nominal extent of the leading slot; also the scroll distance of one slot.
    #[must_use]
    pub fn first_child_extent(&self, viewport_extent: f64) -> f64 {
        f64::from(self.weights.first()) * self.extent_unit(viewport_extent)
    }

    /// Nominal extent of the largest slot.
    #[must_use]
    pub fn max_child_extent(&self, viewport_extent: f64) -> f64 {
        f64::from(self.weights.max()) * self.extent_unit(viewport_extent)
    }

    /// Nominal extent of the smallest slot.
    #[must_use]
    pub fn min_child_extent(&self, viewport_extent: f64) -> f64 {
        f64::from(self.weights.min()) * self.extent_unit(viewport_extent)
    }

    /// Shrink extent clamped into `[0, min_child_extent]`.
    #[must_use]
    pub fn effective_shrink_extent(&self, viewport_extent: f64) -> f64 {
        self.shrink_extent
            .clamp(0.0, self.min_child_extent(viewport_extent).max(0.0))
    }

    /// Scroll distance reserved after the last slot so the last item can reach
    /// the largest slot.
    #[must_use]
    pub fn extra_layout_offset(&self, viewport_extent: f64) -> f64 {
        if self.allow_fully_expand {
            to_f64(self.slot_count() - 1) * self.first_child_extent(viewport_extent)
        } else {
            0.0
        }
    }

    /// How far the first visible item has scrolled past the leading edge.
    #[must_use]
    pub fn first_visible_offscreen_extent(&self, metrics: &LayoutMetrics) -> f64 {
        let slot = self.first_child_extent(metrics.viewport_extent);
        metrics.scroll_offset - to_f64(self.unshifted_index(metrics)) * slot
    }

    /// On-screen portion of the first visible item.
    #[must_use]
    pub fn distance_to_leading_edge(&self, metrics: &LayoutMetrics) -> f64 {
        self.first_child_extent(metrics.viewport_extent)
            - self.first_visible_offscreen_extent(metrics)
    }

    fn slot_count(&self) -> isize {
        self.weights.len().try_into().unwrap_or(isize::MAX)
    }

    fn unshifted_index(&self, metrics: &LayoutMetrics) -> isize {
        let slot = self.first_child_extent(metrics.viewport_extent);
        if !slot.is_finite() || slot <= 0.0 {
            return 0;
        }
        slot_index(metrics.scroll_offset / slot)
    }

    /// Extent of the item `position` places after the first visible one,
    /// while it is still inside the weight window.
    fn window_extent(&self, position: usize, metrics: &LayoutMetrics) -> Option<f64> {
        let current = self.weights.get(position)?;
        let previous = self.weights.get(position.checked_sub(1)?)?;
        // Interpolate from the slot being entered back towards the slot
        // being left as the leading item scrolls off.
        let unit = self.extent_unit(metrics.viewport_extent);
        let slot = self.first_child_extent(metrics.viewport_extent);
        let progress = self.first_visible_offscreen_extent(metrics) / slot;
        let nominal = f64::from(current) * unit;
        let previous_nominal = f64::from(previous) * unit;
        Some(nominal + (previous_nominal - nominal) * progress)
    }

    /// Extent of the item `position` places after the first visible one,
    /// once it is past the weight window.
    ///
    /// The first entrant takes whatever the window leaves of the paint
    /// extent; every later one starts beyond it and sits at the floor.
    fn entrant_extent(&self, position: usize, metrics: &LayoutMetrics) -> f64 {
        let shrink = self.effective_shrink_extent(metrics.viewport_extent);
        let window = self.weights.len();
        if position == window {
            (metrics.remaining_paint_extent - self.extent_before(window, metrics)).max(shrink)
        } else {
            shrink
        }
    }

    /// Sum of the on-screen portion of the first visible item and the extents
    /// of the `position - 1` items after it.
    fn extent_before(&self, position: usize, metrics: &LayoutMetrics) -> f64 {
        let window = self.weights.len();
        let mut total = self.distance_to_leading_edge(metrics);
        for between in 1..position.min(window) {
            total += self.window_extent(between, metrics).unwrap_or(0.0);
        }
        if position > window {
            let shrink = self.effective_shrink_extent(metrics.viewport_extent);
            let floored = isize::try_from(position - window - 1).unwrap_or(isize::MAX);
            total += self.entrant_extent(window, metrics) + to_f64(floored) * shrink;
        }
        total
    }
}

impl ExtentCalculator for WeightedExtentCalculator {
    fn first_visible_index(&self, metrics: &LayoutMetrics) -> isize {
        let index = self.unshifted_index(metrics);
        if self.allow_fully_expand {
            let lead_in: isize = self
                .weights
                .leading_count_before_max()
                .try_into()
                .unwrap_or(0);
            index - lead_in
        } else {
            index
        }
    }

    fn last_visible_index(&self, metrics: &LayoutMetrics, child_count: usize) -> isize {
        let first = self.first_visible_index(metrics);
        let last_child = isize::try_from(child_count).unwrap_or(isize::MAX) - 1;
        let remaining = metrics.remaining_paint_extent;
        let tolerance = PRECISION_ERROR_TOLERANCE * metrics.viewport_extent.max(1.0);

        let mut index = first;
        let mut filled = self.distance_to_leading_edge(metrics);
        while filled < remaining - tolerance && index < last_child {
            let extent = self.item_extent(index + 1, metrics);
            if extent <= tolerance {
                break;
            }
            index += 1;
            filled += extent;
        }
        index
    }

    fn item_extent(&self, index: isize, metrics: &LayoutMetrics) -> f64 {
        let viewport = metrics.viewport_extent;
        let shrink = self.effective_shrink_extent(viewport);
        let first = self.first_visible_index(metrics);

        if index < first {
            return self.min_child_extent(viewport).max(shrink);
        }
        if index == first {
            return self.distance_to_leading_edge(metrics).max(shrink);
        }

        let position = usize::try_from(index - first).unwrap_or(usize::MAX);
        self.window_extent(position, metrics)
            .unwrap_or_else(|| self.entrant_extent(position, metrics))
    }

    fn layout_offset(&self, index: isize, metrics: &LayoutMetrics) -> f64 {
        let viewport = metrics.viewport_extent;
        let first = self.first_visible_index(metrics);
        let distance = self.distance_to_leading_edge(metrics);

        if index == first {
            let shrink = self.effective_shrink_extent(viewport);
            // Once compressed to the floor the item stops shrinking and
            // scrolls off instead.
            if distance <= shrink {
                return metrics.scroll_offset - shrink + distance;
            }
            return metrics.scroll_offset;
        }
        if index < first {
            let leading = self.layout_offset(first, metrics);
            return leading - to_f64(first - index) * self.item_extent(index, metrics);
        }
        let position = usize::try_from(index - first).unwrap_or(usize::MAX);
        metrics.scroll_offset + self.extent_before(position, metrics)
    }

    fn scroll_extent(&self, child_count: usize, metrics: &LayoutMetrics) -> f64 {
        let viewport = metrics.viewport_extent;
        let child_count = isize::try_from(child_count).unwrap_or(isize::MAX);
        let scrollable = to_f64(child_count - self.slot_count())
            * self.first_child_extent(viewport)
            + self.extra_layout_offset(viewport);
        viewport + scrollable.max(0.0)
    }

    fn item_stride(&self, viewport_extent: f64) -> f64 {
        self.first_child_extent(viewport_extent)
    }
}

#[cfg(test)]
mod tests {
    use super::WeightedExtentCalculator;
    use crate::{ExtentCalculator, LayoutMetrics, LayoutWeights};

    fn calc(weights: &[u32], shrink: f64, expand: bool) -> WeightedExtentCalculator {
        WeightedExtentCalculator::new(
            LayoutWeights::new(weights.iter().copied()).unwrap(),
            shrink,
            expand,
        )
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn resting_layout_matches_slots() {
        let calc = calc(&[5, 4, 1], 0.0, false);
        let m = LayoutMetrics::new(0.0, 1000.0);
        assert_eq!(calc.first_visible_index(&m), 0);
        assert_eq!(calc.last_visible_index(&m, 10), 2);
        assert!(approx(calc.layout_offset(0, &m), 0.0));
        assert!(approx(calc.layout_offset(1, &m), 500.0));
        assert!(approx(calc.layout_offset(2, &m), 900.0));
    }

    #[test]
    fn mid_slot_interpolates_and_fills_viewport() {
        let calc = calc(&[5, 4, 1], 0.0, false);
        let m = LayoutMetrics::new(250.0, 1000.0);
        assert!(approx(calc.item_extent(0, &m), 250.0));
        assert!(approx(calc.item_extent(1, &m), 450.0));
        assert!(approx(calc.item_extent(2, &m), 250.0));
        // Entrant beyond the weight window takes the remainder.
        assert!(approx(calc.item_extent(3, &m), 50.0));
        assert_eq!(calc.last_visible_index(&m, 10), 3);
        assert!(approx(calc.layout_offset(3, &m), 250.0 + 950.0));
    }

    #[test]
    fn boundary_offsets_snap_to_next_slot() {
        let calc = calc(&[5, 4, 1], 0.0, false);
        let m = LayoutMetrics::new(500.0 - 1e-12, 1000.0);
        assert_eq!(calc.first_visible_index(&m), 1);
        assert!(approx(calc.item_extent(1, &m), 500.0));
    }

    #[test]
    fn shrink_floor_holds_extent_and_moves_offset() {
        let calc = calc(&[5, 4, 1], 80.0, false);
        let m = LayoutMetrics::new(450.0, 1000.0);
        // 50px remain on screen, but the item stays at the 80px floor.
        assert!(approx(calc.item_extent(0, &m), 80.0));
        assert!(approx(calc.layout_offset(0, &m), 420.0));
        // The next item still starts at the leading edge's on-screen end.
        assert!(approx(calc.layout_offset(1, &m), 500.0));
    }

    #[test]
    fn shrink_is_clamped_to_smallest_slot() {
        let calc = calc(&[5, 4, 1], 500.0, false);
        assert!(approx(calc.effective_shrink_extent(1000.0), 100.0));
    }

    #[test]
    fn fully_expand_adds_lead_in_slots() {
        let calc = calc(&[2, 6, 2], 0.0, true);
        let m = LayoutMetrics::new(0.0, 1000.0);
        assert_eq!(calc.first_visible_index(&m), -1);
        assert!(approx(calc.item_extent(-1, &m), 200.0));
        assert!(approx(calc.item_extent(0, &m), 600.0));
        assert!(approx(calc.item_extent(1, &m), 200.0));
        assert!(approx(calc.layout_offset(0, &m), 200.0));
    }

    #[test]
    fn scroll_extent_reserves_room_for_full_expansion() {
        let plain = calc(&[8, 2], 0.0, false);
        let expand = calc(&[8, 2], 0.0, true);
        let m = LayoutMetrics::new(0.0, 1000.0);
        // 10 items, slot 800: plain stops when items 8 and 9 are visible.
        assert!(approx(plain.scroll_extent(10, &m), 1000.0 + 8.0 * 800.0));
        // Expanding lets item 9 reach the leading slot.
        assert!(approx(expand.scroll_extent(10, &m), 1000.0 + 9.0 * 800.0));
        // Fewer items than slots never yields negative scroll range.
        assert!(approx(plain.scroll_extent(1, &m), 1000.0));
        assert!(approx(plain.item_stride(1000.0), 800.0));
    }

    #[test]
    fn clipped_paint_extent_stops_the_fill() {
        let calc = calc(&[5, 4, 1], 0.0, false);
        let m = LayoutMetrics::new(250.0, 1000.0).with_remaining_paint_extent(600.0);
        // 250px of item 0 and 450px of item 1 already cover the 600px.
        assert_eq!(calc.last_visible_index(&m, 10_000), 1);
        // Entrants past the clipped edge get nothing.
        assert!(approx(calc.item_extent(3, &m), 0.0));
        assert!(approx(calc.item_extent(4, &m), 0.0));
        assert!(approx(calc.layout_offset(4, &m), 250.0 + 950.0));
    }

    #[test]
    fn later_entrants_sit_at_the_floor() {
        let calc = calc(&[5, 4, 1], 40.0, false);
        let m = LayoutMetrics::new(250.0, 1000.0);
        assert!(approx(calc.item_extent(3, &m), 50.0));
        assert!(approx(calc.item_extent(4, &m), 40.0));
        assert!(approx(calc.item_extent(6, &m), 40.0));
        assert!(approx(calc.layout_offset(6, &m), 250.0 + 1000.0 + 80.0));
        assert_eq!(calc.last_visible_index(&m, 100), 3);
    }

    #[test]
    fn earlier_indices_use_smallest_extent() {
        let calc = calc(&[5, 4, 1], 0.0, false);
        let m = LayoutMetrics::new(1200.0, 1000.0);
        assert_eq!(calc.first_visible_index(&m), 2);
        assert!(approx(calc.item_extent(1, &m), 100.0));
        let first_offset = calc.layout_offset(2, &m);
        assert!(approx(calc.layout_offset(1, &m), first_offset - 100.0));
    }
}
