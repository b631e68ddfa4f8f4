// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Packed words and the lane packing contract.

use crate::StreamError;

/// A fixed-width bit pattern carrying several scalar lanes.
///
/// The carrier is 128 bits; how many of them are meaningful is decided by
/// the [`LanePacker`] that built the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackedWord(u128);

impl PackedWord {
    /// Width of the carrier in bits.
    pub const CARRIER_BITS: usize = 128;

    /// Wraps a raw bit pattern.
    pub fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    /// The raw bit pattern.
    pub fn bits(&self) -> u128 {
        self.0
    }
}

impl std::fmt::Display for PackedWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Packs and unpacks fixed-width scalar lanes into [`PackedWord`]s.
///
/// Lane `j` occupies bits `[j·w, (j+1)·w)` of the word, as a `w`-bit
/// two's-complement pattern. Packing and unpacking use the same ordering,
/// so `unpack(pack(v)) == v` for every in-range lane group.
///
/// # Example
/// ```
/// use lane_stream::LanePacker;
///
/// let packer = LanePacker::new(2, 16).unwrap();
/// let word = packer.pack(&[-256, 512]).unwrap();
/// assert_eq!(packer.unpack(word), vec![-256, 512]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanePacker {
    lanes: usize,
    lane_width: u8,
}

impl LanePacker {
    /// Creates a packer for `lanes` lanes of `lane_width` bits each.
    pub fn new(lanes: usize, lane_width: u8) -> Result<Self, StreamError> {
        if lanes == 0 {
            return Err(StreamError::NoLanes);
        }
        if lane_width == 0 || lane_width > 32 {
            return Err(StreamError::UnsupportedLaneWidth { width: lane_width });
        }
        let bits = lanes * lane_width as usize;
        if bits > PackedWord::CARRIER_BITS {
            return Err(StreamError::CarrierOverflow {
                lanes,
                width: lane_width,
                bits,
            });
        }
        Ok(Self { lanes, lane_width })
    }

    /// Number of lanes per word.
    pub fn lanes(&self) -> usize {
        self.lanes
    }

    /// Width of one lane in bits.
    pub fn lane_width(&self) -> u8 {
        self.lane_width
    }

    /// Meaningful bits per word.
    pub fn word_bits(&self) -> usize {
        self.lanes * self.lane_width as usize
    }

    /// Packs one value per lane into a word.
    ///
    /// Every value must fit the lane width in two's complement; nothing is
    /// silently truncated.
    pub fn pack(&self, values: &[i32]) -> Result<PackedWord, StreamError> {
        if values.len() != self.lanes {
            return Err(StreamError::LaneCountMismatch {
                expected: self.lanes,
                got: values.len(),
            });
        }
        let mut bits = 0u128;
        for (j, &value) in values.iter().enumerate() {
            if !self.fits_lane(value) {
                return Err(StreamError::LaneValueOutOfRange {
                    value,
                    width: self.lane_width,
                });
            }
            let lane = (value as u32 as u128) & self.lane_mask();
            bits |= lane << (j * self.lane_width as usize);
        }
        Ok(PackedWord(bits))
    }

    /// Unpacks every lane of a word, sign-extended.
    pub fn unpack(&self, word: PackedWord) -> Vec<i32> {
        (0..self.lanes).map(|j| self.extract(word.0, j)).collect()
    }

    /// Extracts a single lane, sign-extended.
    pub fn lane(&self, word: PackedWord, index: usize) -> Result<i32, StreamError> {
        if index >= self.lanes {
            return Err(StreamError::LaneIndexOutOfRange {
                index,
                lanes: self.lanes,
            });
        }
        Ok(self.extract(word.0, index))
    }

    fn lane_mask(&self) -> u128 {
        (1u128 << self.lane_width) - 1
    }

    fn fits_lane(&self, value: i32) -> bool {
        let half = 1i64 << (self.lane_width - 1);
        (value as i64) >= -half && (value as i64) < half
    }

    fn extract(&self, bits: u128, j: usize) -> i32 {
        let lane = ((bits >> (j * self.lane_width as usize)) & self.lane_mask()) as u64;
        let shift = 64 - self.lane_width as u32;
        (((lane << shift) as i64) >> shift) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_geometry() {
        assert!(matches!(LanePacker::new(0, 16), Err(StreamError::NoLanes)));
        assert!(matches!(
            LanePacker::new(2, 0),
            Err(StreamError::UnsupportedLaneWidth { .. })
        ));
        assert!(matches!(
            LanePacker::new(2, 33),
            Err(StreamError::UnsupportedLaneWidth { .. })
        ));
        assert!(matches!(
            LanePacker::new(5, 32),
            Err(StreamError::CarrierOverflow { bits: 160, .. })
        ));
    }

    #[test]
    fn test_carrier_boundary_is_allowed() {
        assert!(LanePacker::new(4, 32).is_ok());
        assert!(LanePacker::new(8, 16).is_ok());
    }

    #[test]
    fn test_lane_placement() {
        // Two 16-bit lanes: lane 0 in the low half-word, lane 1 above it.
        let packer = LanePacker::new(2, 16).unwrap();
        let word = packer.pack(&[0x0102, 0x0304]).unwrap();
        assert_eq!(word.bits(), 0x0304_0102);
    }

    #[test]
    fn test_pack_unpack_round_trip() {
        let packer = LanePacker::new(4, 16).unwrap();
        let values = vec![-32768, 32767, -1, 0];
        let word = packer.pack(&values).unwrap();
        assert_eq!(packer.unpack(word), values);
    }

    #[test]
    fn test_negative_lane_is_sign_extended() {
        let packer = LanePacker::new(2, 16).unwrap();
        let word = packer.pack(&[-256, 1]).unwrap();
        assert_eq!(word.bits() & 0xFFFF, 0xFF00);
        assert_eq!(packer.lane(word, 0).unwrap(), -256);
        assert_eq!(packer.lane(word, 1).unwrap(), 1);
    }

    #[test]
    fn test_single_wide_lane() {
        let packer = LanePacker::new(1, 32).unwrap();
        let word = packer.pack(&[i32::MIN]).unwrap();
        assert_eq!(packer.unpack(word), vec![i32::MIN]);
    }

    #[test]
    fn test_narrow_lanes() {
        let packer = LanePacker::new(3, 4).unwrap();
        let values = vec![-8, 7, -1];
        let word = packer.pack(&values).unwrap();
        assert_eq!(packer.unpack(word), values);
    }

    #[test]
    fn test_pack_rejects_wrong_lane_count() {
        let packer = LanePacker::new(2, 16).unwrap();
        assert!(matches!(
            packer.pack(&[1, 2, 3]),
            Err(StreamError::LaneCountMismatch {
                expected: 2,
                got: 3
            })
        ));
    }

    #[test]
    fn test_pack_rejects_oversized_value() {
        let packer = LanePacker::new(2, 8).unwrap();
        assert!(matches!(
            packer.pack(&[128, 0]),
            Err(StreamError::LaneValueOutOfRange { value: 128, .. })
        ));
        assert!(packer.pack(&[127, -128]).is_ok());
    }

    #[test]
    fn test_lane_index_bounds() {
        let packer = LanePacker::new(2, 16).unwrap();
        let word = packer.pack(&[1, 2]).unwrap();
        assert!(matches!(
            packer.lane(word, 2),
            Err(StreamError::LaneIndexOutOfRange { .. })
        ));
    }
}
