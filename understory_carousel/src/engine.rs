// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pass carousel layout: which items are visible, how big, and where.

use kurbo::Rect;
use smallvec::SmallVec;

use crate::calculator::{PRECISION_ERROR_TOLERANCE, to_f64};
use crate::{Axis, ExtentCalculator, LayoutMetrics};

/// One visible item in a [`LayoutPlan`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlannedItem {
    /// Child index.
    pub index: usize,
    /// Main-axis extent.
    pub extent: f64,
    /// Offset in scroll coordinates.
    pub layout_offset: f64,
    /// Offset relative to the viewport's leading edge.
    pub paint_offset: f64,
}

impl PlannedItem {
    /// Paint-space end of the item.
    #[must_use]
    pub fn paint_end(&self) -> f64 {
        self.paint_offset + self.extent
    }
}

/// Whether a layout pass produced enough children to fill the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutStatus {
    /// The visible items reach the end of the paintable extent.
    #[default]
    Complete,
    /// The children ran out before the viewport was filled.
    Underflow,
}

/// The visible items of one layout pass, in index order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutPlan {
    items: SmallVec<[PlannedItem; 8]>,
    scroll_extent: f64,
    max_scroll_extent: f64,
    overflows: bool,
    status: LayoutStatus,
}

impl LayoutPlan {
    /// Visible items in index order.
    #[must_use]
    pub fn items(&self) -> &[PlannedItem] {
        &self.items
    }

    /// Number of visible items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total scrollable extent reported to the host.
    #[must_use]
    pub fn scroll_extent(&self) -> f64 {
        self.scroll_extent
    }

    /// Largest valid scroll offset.
    #[must_use]
    pub fn max_scroll_extent(&self) -> f64 {
        self.max_scroll_extent
    }

    /// Returns `true` when content extends past the viewport and must be clipped.
    #[must_use]
    pub fn overflows(&self) -> bool {
        self.overflows
    }

    /// Whether the viewport was filled.
    #[must_use]
    pub fn status(&self) -> LayoutStatus {
        self.status
    }

    /// Index of the item under a main-axis position in viewport coordinates.
    #[must_use]
    pub fn item_at(&self, position: f64) -> Option<usize> {
        self.items
            .iter()
            .find(|item| {
                item.extent > 0.0 && position >= item.paint_offset && position < item.paint_end()
            })
            .map(|item| item.index)
    }

    /// Viewport-space rectangles of the visible items.
    ///
    /// The main axis follows `axis`; every item spans `cross_extent` on the
    /// cross axis.
    pub fn item_rects(
        &self,
        axis: Axis,
        cross_extent: f64,
    ) -> impl Iterator<Item = (usize, Rect)> + '_ {
        self.items.iter().map(move |item| {
            let rect = match axis {
                Axis::Horizontal => {
                    Rect::new(item.paint_offset, 0.0, item.paint_end(), cross_extent)
                }
                Axis::Vertical => Rect::new(0.0, item.paint_offset, cross_extent, item.paint_end()),
            };
            (item.index, rect)
        })
    }

    /// Pairs each visible item with its entry in `content`.
    ///
    /// Items whose index is out of range for `content` are skipped.
    pub fn zip_items<'a, T>(
        &'a self,
        content: &'a [T],
    ) -> impl Iterator<Item = (&'a PlannedItem, &'a T)> + 'a {
        self.items
            .iter()
            .filter_map(move |item| content.get(item.index).map(|value| (item, value)))
    }
}

/// Result of a layout pass.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutOutcome {
    /// Items to paint.
    Plan(LayoutPlan),
    /// The scroll offset is past the content; lay out again at this offset.
    Correction {
        /// Offset the host should adopt.
        scroll_offset: f64,
    },
    /// The viewport cannot be laid out yet (zero or non-finite extent).
    Deferred,
}

impl LayoutOutcome {
    /// The plan, if this outcome carries one.
    #[must_use]
    pub fn plan(&self) -> Option<&LayoutPlan> {
        match self {
            Self::Plan(plan) => Some(plan),
            _ => None,
        }
    }

    /// Consumes the outcome, returning its plan if any.
    #[must_use]
    pub fn into_plan(self) -> Option<LayoutPlan> {
        match self {
            Self::Plan(plan) => Some(plan),
            _ => None,
        }
    }
}

/// Drives an [`ExtentCalculator`] through a layout pass.
///
/// The engine keeps no state between passes; every call is a pure function
/// of the calculator, the metrics and the child count.
///
/// ```
/// use understory_carousel::{
///     CarouselLayoutEngine, LayoutMetrics, LayoutStatus, LayoutWeights, WeightedExtentCalculator,
/// };
///
/// let weights = LayoutWeights::new(LayoutWeights::CONTAINED).unwrap();
/// let engine = CarouselLayoutEngine::new(WeightedExtentCalculator::new(weights, 0.0, false));
///
/// let plan = engine.layout(&LayoutMetrics::new(0.0, 1000.0), 10).into_plan().unwrap();
/// let extents: Vec<f64> = plan.items().iter().map(|item| item.extent).collect();
/// assert_eq!(extents, [500.0, 400.0, 100.0]);
/// assert_eq!(plan.status(), LayoutStatus::Complete);
/// assert_eq!(plan.item_at(650.0), Some(1));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CarouselLayoutEngine<C> {
    calculator: C,
}

impl<C: ExtentCalculator> CarouselLayoutEngine<C> {
    /// Creates an engine around `calculator`.
    pub fn new(calculator: C) -> Self {
        Self { calculator }
    }

    /// The calculator driving layout.
    pub fn calculator(&self) -> &C {
        &self.calculator
    }

    /// Replaces the calculator; the next pass uses the new one.
    pub fn set_calculator(&mut self, calculator: C) {
        self.calculator = calculator;
    }

    /// Lays out `child_count` children for `metrics`.
    pub fn layout(&self, metrics: &LayoutMetrics, child_count: usize) -> LayoutOutcome {
        if !metrics.is_layoutable() {
            log::trace!(
                "carousel layout deferred: viewport {} offset {}",
                metrics.viewport_extent,
                metrics.scroll_offset
            );
            return LayoutOutcome::Deferred;
        }

        let calc = &self.calculator;
        let viewport = metrics.viewport_extent;
        let scroll_extent = calc.scroll_extent(child_count, metrics);
        if !scroll_extent.is_finite() {
            return LayoutOutcome::Deferred;
        }
        let max_scroll_extent = (scroll_extent - viewport).max(0.0);
        let tolerance = PRECISION_ERROR_TOLERANCE * viewport.max(1.0);
        let overflows = scroll_extent > viewport + tolerance || metrics.scroll_offset > 0.0;

        if child_count == 0 {
            return LayoutOutcome::Plan(LayoutPlan {
                scroll_extent,
                max_scroll_extent,
                overflows,
                ..LayoutPlan::default()
            });
        }

        let last_child = isize::try_from(child_count).unwrap_or(isize::MAX) - 1;
        let first = calc.first_visible_index(metrics);
        if first > last_child {
            if (metrics.scroll_offset - max_scroll_extent).abs() > tolerance {
                log::warn!(
                    "carousel scroll offset {} is past the content; correcting to {}",
                    metrics.scroll_offset,
                    max_scroll_extent
                );
                return LayoutOutcome::Correction {
                    scroll_offset: max_scroll_extent,
                };
            }
            // Already at the end of a range that holds nothing visible.
            return LayoutOutcome::Plan(LayoutPlan {
                scroll_extent,
                max_scroll_extent,
                overflows,
                status: LayoutStatus::Underflow,
                ..LayoutPlan::default()
            });
        }

        let last = calc.last_visible_index(metrics, child_count);
        let start = first.max(0);
        let mut items = SmallVec::new();
        let mut offset = calc.layout_offset(start, metrics);
        for index in start..=last.min(last_child) {
            let extent = calc.item_extent(index, metrics).max(0.0);
            items.push(PlannedItem {
                index: usize::try_from(index).unwrap_or(0),
                extent,
                layout_offset: offset,
                paint_offset: offset - metrics.scroll_offset,
            });
            offset += extent;
        }

        let paint_end = metrics.scroll_offset + metrics.remaining_paint_extent;
        let status = if offset < paint_end - tolerance {
            LayoutStatus::Underflow
        } else {
            LayoutStatus::Complete
        };
        log::trace!(
            "carousel layout at {}: items {}..={} of {}, status {:?}",
            metrics.scroll_offset,
            start,
            last,
            child_count,
            status
        );

        LayoutOutcome::Plan(LayoutPlan {
            items,
            scroll_extent,
            max_scroll_extent,
            overflows,
            status,
        })
    }

    /// Scroll offset at which the item at `index` rests at the leading edge.
    ///
    /// The result is clamped to the scrollable range.
    pub fn rest_offset(&self, index: usize, metrics: &LayoutMetrics, child_count: usize) -> f64 {
        let stride = self.calculator.item_stride(metrics.viewport_extent);
        let max = (self.calculator.scroll_extent(child_count, metrics) - metrics.viewport_extent)
            .max(0.0);
        let index = isize::try_from(index).unwrap_or(isize::MAX);
        (to_f64(index) * stride).clamp(0.0, max)
    }
}
