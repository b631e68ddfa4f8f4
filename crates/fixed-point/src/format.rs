// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Q-format descriptors: total bit width and fractional bits.
//!
//! A [`QFormat`] fixes how a raw two's-complement integer is read as a real
//! number: `value = raw · 2^-frac`. The raw-domain rules shared by the rest
//! of the workspace live here as methods: [`QFormat::saturate`],
//! [`QFormat::requantize`], [`QFormat::add_sat`].

use serde::{Deserialize, Serialize};

use crate::FixedPointError;

/// A signed fixed-point format: `width` total bits (sign included), of
/// which `frac` are fractional.
///
/// Displays as `Q<int>.<frac>`; a 16-bit format with 8 fractional bits
/// prints as `Q8.8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFormat")]
pub struct QFormat {
    width: u8,
    frac: u8,
}

/// Unvalidated mirror, used so deserialized formats go through [`QFormat::new`].
#[derive(Deserialize)]
struct RawFormat {
    width: u8,
    frac: u8,
}

impl TryFrom<RawFormat> for QFormat {
    type Error = FixedPointError;

    fn try_from(raw: RawFormat) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.frac)
    }
}

impl QFormat {
    /// The reference hardware format: 16 bits, 8 fractional.
    pub const Q16_8: QFormat = QFormat { width: 16, frac: 8 };

    /// Creates a format, checking the width/fraction contract.
    pub fn new(width: u8, frac: u8) -> Result<Self, FixedPointError> {
        if !(2..=32).contains(&width) {
            return Err(FixedPointError::UnsupportedWidth { width });
        }
        if frac > width - 1 {
            return Err(FixedPointError::FractionTooWide { width, frac });
        }
        Ok(Self { width, frac })
    }

    /// Total bits, sign included.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Fractional bits.
    pub fn frac(&self) -> u8 {
        self.frac
    }

    /// Integer bits (sign included).
    pub fn int_bits(&self) -> u8 {
        self.width - self.frac
    }

    /// The value of one least-significant bit.
    pub fn resolution(&self) -> f64 {
        2f64.powi(-(self.frac as i32))
    }

    /// Largest representable raw value.
    pub fn max_raw(&self) -> i32 {
        ((1u64 << (self.width - 1)) - 1) as i32
    }

    /// Smallest (most negative) representable raw value.
    pub fn min_raw(&self) -> i32 {
        let magnitude = 1i64 << (self.width - 1);
        (-magnitude) as i32
    }

    /// Largest representable value.
    pub fn max_value(&self) -> f64 {
        self.max_raw() as f64 * self.resolution()
    }

    /// Smallest representable value.
    pub fn min_value(&self) -> f64 {
        self.min_raw() as f64 * self.resolution()
    }

    /// Mask covering the format's low `width` bits.
    pub fn bit_mask(&self) -> u64 {
        (1u64 << self.width) - 1
    }

    // ── Raw-domain arithmetic rules ────────────────────────────

    /// Clamps a wide intermediate into this format's raw range.
    pub fn saturate(&self, value: i64) -> i32 {
        value.clamp(self.min_raw() as i64, self.max_raw() as i64) as i32
    }

    /// Re-expresses a wide intermediate carrying `from_frac` fractional
    /// bits in this format: floor when dropping bits, exact when adding
    /// them, saturating either way.
    pub fn requantize(&self, value: i64, from_frac: u8) -> i32 {
        if from_frac >= self.frac {
            self.saturate(value >> (from_frac - self.frac))
        } else {
            let up = (self.frac - from_frac) as u32;
            if value > (i64::MAX >> up) {
                self.max_raw()
            } else if value < (i64::MIN >> up) {
                self.min_raw()
            } else {
                self.saturate(value << up)
            }
        }
    }

    /// Saturating addition in this format's raw domain.
    pub fn add_sat(&self, lhs: i32, rhs: i32) -> i32 {
        self.saturate(lhs as i64 + rhs as i64)
    }
}

impl Default for QFormat {
    fn default() -> Self {
        Self::Q16_8
    }
}

impl std::fmt::Display for QFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Q{}.{}", self.int_bits(), self.frac)
    }
}
