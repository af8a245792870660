// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed descriptor for carousel content.

use alloc::string::String;

/// What a single carousel item shows.
///
/// The layout core never looks inside an item; hosts resolve `image` (a path,
/// URL or asset key) and paint the optional `title` over it. Any other content
/// type can be used with [`LayoutPlan::zip_items`](crate::LayoutPlan::zip_items).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CarouselItem {
    /// Reference to the image to display.
    pub image: String,
    /// Caption shown over the image, if any.
    pub title: Option<String>,
}

impl CarouselItem {
    /// An untitled item showing `image`.
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            title: None,
        }
    }

    /// Adds a caption.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
