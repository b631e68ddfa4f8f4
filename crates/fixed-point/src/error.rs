// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for fixed-point formats and values.

use crate::QFormat;

/// Errors from constructing or combining fixed-point values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FixedPointError {
    /// Total width outside the supported range.
    #[error("unsupported width: {width} bits (supported: 2..=32)")]
    UnsupportedWidth { width: u8 },

    /// Fractional bits leave no room for the sign bit.
    #[error("{frac} fractional bits do not fit a {width}-bit format (frac <= width - 1)")]
    FractionTooWide { width: u8, frac: u8 },

    /// A raw value lies outside the format's two's-complement range.
    #[error("raw value {raw} outside {format} range {min}..={max}")]
    RawOutOfRange {
        raw: i64,
        format: QFormat,
        min: i32,
        max: i32,
    },

    /// Two operands carry different formats.
    #[error("format mismatch: {lhs} vs {rhs}")]
    FormatMismatch { lhs: QFormat, rhs: QFormat },
}
