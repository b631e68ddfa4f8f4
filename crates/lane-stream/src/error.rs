// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for lane packing and stream protocol violations.

/// Errors from building packers, packing lanes, or violating the stream
/// read/write contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// A word must carry at least one lane.
    #[error("lane count must be non-zero")]
    NoLanes,

    /// Lane width outside the supported range.
    #[error("unsupported lane width: {width} bits (supported: 1..=32)")]
    UnsupportedLaneWidth { width: u8 },

    /// The requested lane group does not fit the word carrier.
    #[error("{lanes} lanes of {width} bits need {bits} bits, exceeding the 128-bit carrier")]
    CarrierOverflow { lanes: usize, width: u8, bits: usize },

    /// Wrong number of lane values supplied to `pack`.
    #[error("expected {expected} lane values, got {got}")]
    LaneCountMismatch { expected: usize, got: usize },

    /// A value does not fit the lane width in two's complement.
    #[error("value {value} does not fit a {width}-bit lane")]
    LaneValueOutOfRange { value: i32, width: u8 },

    /// Lane index past the end of the word.
    #[error("lane index {index} out of range for {lanes} lanes")]
    LaneIndexOutOfRange { index: usize, lanes: usize },

    /// The producer wrote more words than the stream was sized for.
    #[error("stream full: producer exceeded the agreed capacity of {capacity} words")]
    Full { capacity: usize },

    /// The consumer read past the words actually supplied.
    #[error("stream empty: consumer read past the supplied words")]
    Empty,
}
