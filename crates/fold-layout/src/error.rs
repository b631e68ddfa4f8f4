// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for configuration, geometry, and layout mapping.

use fixed_point::FixedPointError;
use lane_stream::StreamError;

/// Errors raised while loading a configuration, validating geometry, or
/// building folded tensors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// Configuration file or TOML problem.
    #[error("configuration: {0}")]
    Config(String),

    /// A dimension or parallelism factor is zero.
    #[error("{name} must be non-zero")]
    ZeroDimension { name: &'static str },

    /// A parallelism factor does not divide its dimension.
    #[error("{dividend_name} ({dividend}) is not divisible by {divisor_name} ({divisor})")]
    NotDivisible {
        dividend_name: &'static str,
        dividend: usize,
        divisor_name: &'static str,
        divisor: usize,
    },

    /// A dense input has the wrong element count.
    #[error("{what}: expected {expected} elements, got {got}")]
    DenseLengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// A logical or folded index is out of range.
    #[error("{what} index {index} out of range ({len} valid)")]
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// A tensor was built against a different geometry.
    #[error("tensor shape {tensor:?} does not match geometry shape {geometry:?}")]
    GeometryMismatch {
        tensor: (usize, usize, usize),
        geometry: (usize, usize, usize),
    },

    /// Invalid fixed-point format or raw value.
    #[error(transparent)]
    FixedPoint(#[from] FixedPointError),

    /// Lane geometry does not fit the word carrier.
    #[error("lane packing: {0}")]
    Stream(#[from] StreamError),
}
