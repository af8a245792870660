// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_carousel --heading-base-level=0

//! Understory Carousel: headless layout core for Material 3 carousels.
//!
//! A carousel shows a strip of items whose sizes change continuously as they
//! scroll: items grow while moving into the prominent slot and shrink while
//! leaving it. This crate computes those extents and offsets, decides where a
//! released drag should settle, and turns swipes into one-item scroll steps.
//! It does not paint, recognize gestures, or run animations; hosts provide
//! those and call into the core.
//!
//! The core concepts are:
//!
//! - [`LayoutWeights`]: a validated table of relative slot sizes, such as
//!   `[2, 6, 2]` for a centered hero layout.
//! - [`ExtentCalculator`]: per-index extent and offset queries, implemented by
//!   [`WeightedExtentCalculator`] (hero and contained layouts) and
//!   [`FixedExtentCalculator`] (uncontained layout).
//! - [`CarouselLayoutEngine`]: runs a calculator over the visible range and
//!   produces a [`LayoutPlan`] for the host to paint.
//! - [`SnapPhysics`] and [`GestureToScrollBridge`]: turn drag releases into
//!   item-aligned spring targets or one-item swipe animations.
//! - [`ScrollPositionAdapter`] and [`CarouselController`]: the scroll offset,
//!   kept on the same item across viewport resizes.
//! - [`CarouselConfig`] and [`CarouselState`]: the declarative configuration
//!   and the mounted carousel that ties everything together.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_carousel::{
//!     CarouselLayoutEngine, ExtentCalculator, LayoutMetrics, LayoutWeights,
//!     WeightedExtentCalculator,
//! };
//!
//! // A "contained" carousel: three items in a 5:4:1 ratio.
//! let weights = LayoutWeights::new(LayoutWeights::CONTAINED).unwrap();
//! let engine = CarouselLayoutEngine::new(WeightedExtentCalculator::new(weights, 0.0, false));
//!
//! // Half a slot into the scroll, the first item has shrunk and the fourth
//! // is peeking in. The visible items always fill the viewport.
//! let plan = engine.layout(&LayoutMetrics::new(250.0, 1000.0), 10).into_plan().unwrap();
//! let extents: Vec<f64> = plan.items().iter().map(|item| item.extent).collect();
//! assert_eq!(extents, [250.0, 450.0, 250.0, 50.0]);
//! assert_eq!(extents.iter().sum::<f64>(), 1000.0);
//!
//! // Hosts place each item at its paint offset.
//! assert_eq!(plan.items()[1].paint_offset, 250.0);
//! ```
//!
//! For a complete mounted carousel with gestures and animation, see
//! [`CarouselState`].
//!
//! All extents and offsets are main-axis logical pixels. Velocities are
//! pixels per second. This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod calculator;
mod config;
mod controller;
mod engine;
mod error;
mod fixed;
mod gesture;
mod item;
mod position;
mod snap;
mod state;
mod weighted;
mod weights;

pub use calculator::{
    ActiveCalculator, ExtentCalculator, LayoutMetrics, PRECISION_ERROR_TOLERANCE,
};
pub use config::{
    AnimationCurve, Axis, CarouselConfig, CarouselConfigBuilder, CarouselKind, HeroAlignment,
};
pub use controller::{AnimationDriver, CarouselController, ScrollAnimation};
pub use engine::{CarouselLayoutEngine, LayoutOutcome, LayoutPlan, LayoutStatus, PlannedItem};
pub use error::{ConfigError, ControllerError};
pub use fixed::FixedExtentCalculator;
pub use gesture::{DragTracker, GestureToScrollBridge, SwipeDirection, SwipeStep};
pub use item::CarouselItem;
pub use position::{ItemMetric, ScrollPositionAdapter, ScrollPositionDebugInfo, ViewportUpdate};
pub use snap::{
    ScrollMetrics, SnapOutcome, SnapPhysics, SpringDescription, SpringRequest, Tolerance,
};
pub use state::{CarouselState, DragEndAction};
pub use weighted::WeightedExtentCalculator;
pub use weights::LayoutWeights;
