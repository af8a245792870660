// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for configuration and controller misuse.
//!
//! Normal layout conditions (underflow, scroll offset corrections, deferred
//! layout) are not errors; they are reported as variants of
//! [`LayoutOutcome`](crate::LayoutOutcome) and [`LayoutStatus`](crate::LayoutStatus).

use core::fmt;

/// Error returned when a carousel configuration or weight table is invalid.
///
/// Configurations are validated once, when they are built, and never
/// silently coerced afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// The weight table has no entries.
    EmptyWeights,
    /// A weight table entry is zero.
    ZeroWeight {
        /// Position of the offending entry.
        index: usize,
    },
    /// A fixed item extent is zero, negative, or not finite.
    InvalidItemExtent(f64),
    /// A shrink extent is negative or not finite.
    InvalidShrinkExtent(f64),
    /// The swipe sensitivity threshold is negative or not finite.
    InvalidSensitivity(f64),
    /// A fixed viewport width or height is negative or not finite.
    InvalidViewportSize(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWeights => f.write_str("layout weights must not be empty"),
            Self::ZeroWeight { index } => {
                write!(f, "layout weight at position {index} must be positive")
            }
            Self::InvalidItemExtent(extent) => {
                write!(f, "item extent must be positive and finite; got {extent}")
            }
            Self::InvalidShrinkExtent(extent) => {
                write!(
                    f,
                    "shrink extent must be non-negative and finite; got {extent}"
                )
            }
            Self::InvalidSensitivity(value) => {
                write!(
                    f,
                    "swipe sensitivity must be non-negative and finite; got {value}"
                )
            }
            Self::InvalidViewportSize(value) => {
                write!(
                    f,
                    "fixed viewport size must be non-negative and finite; got {value}"
                )
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// Error returned when a [`CarouselController`](crate::CarouselController)
/// is queried while no carousel is attached to it.
///
/// This always indicates a lifecycle bug in the embedding code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerError {
    /// The controller has no attached scroll position.
    Detached,
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detached => {
                f.write_str("carousel controller is not attached to a mounted carousel")
            }
        }
    }
}

impl core::error::Error for ControllerError {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{ConfigError, ControllerError};

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            ConfigError::ZeroWeight { index: 2 }.to_string(),
            "layout weight at position 2 must be positive"
        );
        assert!(
            ConfigError::InvalidItemExtent(-3.0)
                .to_string()
                .ends_with("got -3")
        );
        assert!(ControllerError::Detached.to_string().contains("not attached"));
    }
}
