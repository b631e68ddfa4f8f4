// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # fixed-point
//!
//! Signed fixed-point formats and scalar arithmetic with pinned rounding
//! and overflow rules.
//!
//! This crate provides:
//! - [`QFormat`] — a width/fraction format descriptor, plus the raw-domain
//!   saturate/requantize rules every downstream crate reuses.
//! - [`Fixed`] — a single scalar value carrying its format.
//! - [`FixedPointError`] — validation and mismatch errors via `thiserror`.
//!
//! # Numeric Contract
//! One set of rules, defined here and nowhere else:
//! - Narrowing from `f64` rounds to nearest, ties away from zero.
//! - Dropping fractional bits floors (arithmetic shift right).
//! - Out-of-range results saturate to the format limits; nothing wraps.

mod error;
mod format;
mod value;

pub use error::FixedPointError;
pub use format::QFormat;
pub use value::Fixed;
