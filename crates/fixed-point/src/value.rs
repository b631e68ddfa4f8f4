// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Scalar fixed-point values.

use crate::{FixedPointError, QFormat};

/// A single fixed-point value: a raw two's-complement integer read through
/// a [`QFormat`].
///
/// # Example
/// ```
/// use fixed_point::{Fixed, QFormat};
///
/// let q = QFormat::Q16_8;
/// let half = Fixed::from_f64(0.5, q);
/// assert_eq!(half.raw(), 128);
/// assert_eq!(half.to_f64(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixed {
    raw: i32,
    format: QFormat,
}

impl Fixed {
    /// Zero in the given format.
    pub fn zero(format: QFormat) -> Self {
        Self { raw: 0, format }
    }

    /// Quantises an `f64`: round to nearest, ties away from zero, then
    /// saturate to the format range. NaN maps to zero.
    pub fn from_f64(value: f64, format: QFormat) -> Self {
        let scaled = (value * (1u64 << format.frac()) as f64).round();
        // `as i64` saturates at the integer limits and sends NaN to 0.
        let raw = format.saturate(scaled as i64);
        Self { raw, format }
    }

    /// Wraps a raw value, rejecting anything outside the format range.
    pub fn from_raw(raw: i32, format: QFormat) -> Result<Self, FixedPointError> {
        if raw < format.min_raw() || raw > format.max_raw() {
            return Err(FixedPointError::RawOutOfRange {
                raw: raw as i64,
                format,
                min: format.min_raw(),
                max: format.max_raw(),
            });
        }
        Ok(Self { raw, format })
    }

    /// Reads the low `width` bits of `bits` as a two's-complement value.
    pub fn from_bits(bits: u64, format: QFormat) -> Self {
        let shift = 64 - format.width() as u32;
        let raw = (((bits << shift) as i64) >> shift) as i32;
        Self { raw, format }
    }

    /// The value's two's-complement pattern, truncated to the format width.
    pub fn to_bits(&self) -> u64 {
        (self.raw as u32 as u64) & self.format.bit_mask()
    }

    /// The underlying raw integer.
    pub fn raw(&self) -> i32 {
        self.raw
    }

    /// The value's format.
    pub fn format(&self) -> QFormat {
        self.format
    }

    /// The represented real value.
    pub fn to_f64(&self) -> f64 {
        self.raw as f64 * self.format.resolution()
    }

    // ── Arithmetic ─────────────────────────────────────────────

    /// Saturating addition; operands must share a format.
    pub fn saturating_add(self, rhs: Fixed) -> Result<Fixed, FixedPointError> {
        self.check_format(rhs)?;
        Ok(Self {
            raw: self.format.add_sat(self.raw, rhs.raw),
            format: self.format,
        })
    }

    /// Saturating subtraction; operands must share a format.
    pub fn saturating_sub(self, rhs: Fixed) -> Result<Fixed, FixedPointError> {
        self.check_format(rhs)?;
        Ok(Self {
            raw: self.format.saturate(self.raw as i64 - rhs.raw as i64),
            format: self.format,
        })
    }

    /// Multiplies into `out`: the product is exact in 64 bits with
    /// `frac(lhs) + frac(rhs)` fractional bits, then floor-requantised and
    /// saturated into `out`. This is the per-MAC product rule the engine
    /// applies on raw slices.
    pub fn mul_into(self, rhs: Fixed, out: QFormat) -> Fixed {
        let wide = self.raw as i64 * rhs.raw as i64;
        let wide_frac = self.format.frac() + rhs.format.frac();
        Fixed {
            raw: out.requantize(wide, wide_frac),
            format: out,
        }
    }

    fn check_format(&self, rhs: Fixed) -> Result<(), FixedPointError> {
        if self.format != rhs.format {
            return Err(FixedPointError::FormatMismatch {
                lhs: self.format,
                rhs: rhs.format,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.to_f64(), self.format)
    }
}
