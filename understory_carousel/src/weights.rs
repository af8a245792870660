// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validated weight tables for the weighted carousel layout.

use smallvec::SmallVec;

use crate::ConfigError;

/// Ordered table of relative item sizes.
///
/// The table length is the number of simultaneously visible items, and the
/// sum of all entries is the denominator used to split the viewport extent.
/// A table is validated on construction and then never mutated; a new
/// configuration replaces it wholesale.
///
/// ```
/// use understory_carousel::LayoutWeights;
///
/// let weights = LayoutWeights::new([2, 6, 2]).unwrap();
/// assert_eq!(weights.len(), 3);
/// assert_eq!(weights.sum(), 10);
/// assert_eq!(weights.max(), 6);
/// assert_eq!(weights.leading_count_before_max(), 1);
///
/// assert!(LayoutWeights::new([]).is_err());
/// assert!(LayoutWeights::new([3, 0]).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutWeights {
    weights: SmallVec<[u32; 4]>,
    sum: u32,
    max: u32,
    min: u32,
}

impl LayoutWeights {
    /// Hero layout with the large item on the leading edge.
    pub const HERO_LEFT: [u32; 2] = [8, 2];
    /// Hero layout with the large item centered between two peeks.
    pub const HERO_CENTER: [u32; 3] = [2, 6, 2];
    /// Hero layout with the large item on the trailing edge.
    pub const HERO_RIGHT: [u32; 2] = [2, 8];
    /// Multi-browse (contained) layout.
    pub const CONTAINED: [u32; 3] = [5, 4, 1];
    /// Multi-browse (contained) layout showing one more item.
    pub const CONTAINED_EXTENDED: [u32; 4] = [4, 3, 2, 1];

    /// Creates a weight table, rejecting empty tables and zero entries.
    pub fn new(weights: impl IntoIterator<Item = u32>) -> Result<Self, ConfigError> {
        let weights: SmallVec<[u32; 4]> = weights.into_iter().collect();
        if weights.is_empty() {
            return Err(ConfigError::EmptyWeights);
        }
        if let Some(index) = weights.iter().position(|w| *w == 0) {
            return Err(ConfigError::ZeroWeight { index });
        }
        let sum = weights.iter().sum();
        let max = weights.iter().copied().max().unwrap_or(1);
        let min = weights.iter().copied().min().unwrap_or(1);
        Ok(Self {
            weights,
            sum,
            max,
            min,
        })
    }

    /// Number of simultaneously visible slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always `false`; a validated table has at least one entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all weights.
    #[must_use]
    pub fn sum(&self) -> u32 {
        self.sum
    }

    /// Largest weight.
    #[must_use]
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Smallest weight.
    #[must_use]
    pub fn min(&self) -> u32 {
        self.min
    }

    /// Weight of the leading slot.
    #[must_use]
    pub fn first(&self) -> u32 {
        self.weights[0]
    }

    /// Weight of the slot at `position`, if any.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<u32> {
        self.weights.get(position).copied()
    }

    /// The weights as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.weights
    }

    /// Number of slots preceding the first maximum weight.
    ///
    /// This is also the slot index of the "focused" item in a resting layout.
    #[must_use]
    pub fn leading_count_before_max(&self) -> usize {
        self.weights
            .iter()
            .position(|w| *w == self.max)
            .unwrap_or(0)
    }

    /// Fraction of the viewport taken by the leading slot.
    #[must_use]
    pub fn first_fraction(&self) -> f64 {
        f64::from(self.first()) / f64::from(self.sum)
    }
}
