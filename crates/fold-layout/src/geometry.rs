// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Validated folded geometry and the logical↔folded index bijection.

use fixed_point::QFormat;
use lane_stream::LanePacker;

use crate::{LayerConfig, LayoutError};

/// Position of one weight inside the folded tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldedIndex {
    /// Output lane.
    pub pe: usize,
    /// Input lane.
    pub simd: usize,
    /// Fold offset along the third axis: `pe_fold · simd_folds + simd_fold`.
    pub offset: usize,
}

/// Validated layer geometry.
///
/// Carries the dimensions, parallelism factors, derived fold counts,
/// scalar formats, and the two lane packers. Only
/// [`LayerConfig::validate`] can construct one, so a `LayerGeometry` in
/// hand means the one-time configuration checks already passed:
/// `num_inputs % simd == 0`, `num_neurons % pe == 0`, and both word
/// shapes fit the 128-bit carrier.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGeometry {
    num_inputs: usize,
    num_neurons: usize,
    simd: usize,
    pe: usize,
    simd_folds: usize,
    pe_folds: usize,
    input_format: QFormat,
    weight_format: QFormat,
    bias_format: QFormat,
    output_format: QFormat,
    input_packer: LanePacker,
    output_packer: LanePacker,
}

impl LayerGeometry {
    pub(crate) fn from_config(config: &LayerConfig) -> Result<Self, LayoutError> {
        for (name, value) in [
            ("num_inputs", config.num_inputs),
            ("num_neurons", config.num_neurons),
            ("simd", config.simd),
            ("pe", config.pe),
        ] {
            if value == 0 {
                return Err(LayoutError::ZeroDimension { name });
            }
        }

        if config.num_inputs % config.simd != 0 {
            return Err(LayoutError::NotDivisible {
                dividend_name: "num_inputs",
                dividend: config.num_inputs,
                divisor_name: "simd",
                divisor: config.simd,
            });
        }
        if config.num_neurons % config.pe != 0 {
            return Err(LayoutError::NotDivisible {
                dividend_name: "num_neurons",
                dividend: config.num_neurons,
                divisor_name: "pe",
                divisor: config.pe,
            });
        }

        let input_packer = LanePacker::new(config.simd, config.input_format.width())?;
        let output_packer = LanePacker::new(config.pe, config.output_format.width())?;

        let geometry = Self {
            num_inputs: config.num_inputs,
            num_neurons: config.num_neurons,
            simd: config.simd,
            pe: config.pe,
            simd_folds: config.num_inputs / config.simd,
            pe_folds: config.num_neurons / config.pe,
            input_format: config.input_format,
            weight_format: config.weight_format,
            bias_format: config.bias_format,
            output_format: config.output_format,
            input_packer,
            output_packer,
        };
        tracing::debug!("validated {}", geometry.summary());
        Ok(geometry)
    }

    /// Length of the logical input vector.
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    /// Number of neurons.
    pub fn num_neurons(&self) -> usize {
        self.num_neurons
    }

    /// Input lanes per step.
    pub fn simd(&self) -> usize {
        self.simd
    }

    /// Output lanes per step.
    pub fn pe(&self) -> usize {
        self.pe
    }

    /// Sequential steps needed to cover all inputs (`num_inputs / simd`).
    /// Also the exact input word count per run.
    pub fn simd_folds(&self) -> usize {
        self.simd_folds
    }

    /// Sequential steps needed to cover all neurons (`num_neurons / pe`).
    /// Also the exact output word count per run.
    pub fn pe_folds(&self) -> usize {
        self.pe_folds
    }

    /// Input scalar format.
    pub fn input_format(&self) -> QFormat {
        self.input_format
    }

    /// Weight scalar format.
    pub fn weight_format(&self) -> QFormat {
        self.weight_format
    }

    /// Bias scalar format.
    pub fn bias_format(&self) -> QFormat {
        self.bias_format
    }

    /// Output scalar format (the accumulator domain).
    pub fn output_format(&self) -> QFormat {
        self.output_format
    }

    /// Packer for input words: `simd` lanes of input width.
    pub fn input_packer(&self) -> LanePacker {
        self.input_packer
    }

    /// Packer for output words: `pe` lanes of output width.
    pub fn output_packer(&self) -> LanePacker {
        self.output_packer
    }

    /// Fractional bits of a raw input·weight product.
    pub fn product_frac(&self) -> u8 {
        self.input_format.frac() + self.weight_format.frac()
    }

    /// Third-axis length of the folded weight tensor
    /// (`simd_folds · pe_folds`).
    pub fn weight_offsets(&self) -> usize {
        self.simd_folds * self.pe_folds
    }

    /// Total folded weight elements (`num_inputs · num_neurons`).
    pub fn weight_len(&self) -> usize {
        self.num_inputs * self.num_neurons
    }

    /// Total folded bias elements (`num_neurons`).
    pub fn bias_len(&self) -> usize {
        self.num_neurons
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        format!(
            "geometry: {}→{} dense, simd={} ({} folds), pe={} ({} folds), \
             formats in={} w={} b={} out={}",
            self.num_inputs,
            self.num_neurons,
            self.simd,
            self.simd_folds,
            self.pe,
            self.pe_folds,
            self.input_format,
            self.weight_format,
            self.bias_format,
            self.output_format,
        )
    }

    // ── Logical ↔ folded bijection ─────────────────────────────

    /// Folded position of `weights[neuron][input]`.
    pub fn weight_slot(&self, neuron: usize, input: usize) -> Result<FoldedIndex, LayoutError> {
        self.check_neuron(neuron)?;
        self.check_input(input)?;
        Ok(FoldedIndex {
            pe: neuron % self.pe,
            simd: input % self.simd,
            offset: (neuron / self.pe) * self.simd_folds + input / self.simd,
        })
    }

    /// Logical `(neuron, input)` of a folded slot; inverse of
    /// [`LayerGeometry::weight_slot`].
    pub fn weight_coords(&self, slot: FoldedIndex) -> Result<(usize, usize), LayoutError> {
        if slot.pe >= self.pe {
            return Err(LayoutError::IndexOutOfBounds {
                what: "pe lane",
                index: slot.pe,
                len: self.pe,
            });
        }
        if slot.simd >= self.simd {
            return Err(LayoutError::IndexOutOfBounds {
                what: "simd lane",
                index: slot.simd,
                len: self.simd,
            });
        }
        if slot.offset >= self.weight_offsets() {
            return Err(LayoutError::IndexOutOfBounds {
                what: "fold offset",
                index: slot.offset,
                len: self.weight_offsets(),
            });
        }
        let pe_fold = slot.offset / self.simd_folds;
        let simd_fold = slot.offset % self.simd_folds;
        Ok((
            pe_fold * self.pe + slot.pe,
            simd_fold * self.simd + slot.simd,
        ))
    }

    /// Folded `(pe, pe_fold)` position of `bias[neuron]`.
    pub fn bias_slot(&self, neuron: usize) -> Result<(usize, usize), LayoutError> {
        self.check_neuron(neuron)?;
        Ok((neuron % self.pe, neuron / self.pe))
    }

    /// Neuron index of a folded bias slot; inverse of
    /// [`LayerGeometry::bias_slot`].
    pub fn bias_neuron(&self, pe: usize, pe_fold: usize) -> Result<usize, LayoutError> {
        if pe >= self.pe {
            return Err(LayoutError::IndexOutOfBounds {
                what: "pe lane",
                index: pe,
                len: self.pe,
            });
        }
        if pe_fold >= self.pe_folds {
            return Err(LayoutError::IndexOutOfBounds {
                what: "pe fold",
                index: pe_fold,
                len: self.pe_folds,
            });
        }
        Ok(pe_fold * self.pe + pe)
    }

    fn check_neuron(&self, neuron: usize) -> Result<(), LayoutError> {
        if neuron >= self.num_neurons {
            return Err(LayoutError::IndexOutOfBounds {
                what: "neuron",
                index: neuron,
                len: self.num_neurons,
            });
        }
        Ok(())
    }

    fn check_input(&self, input: usize) -> Result<(), LayoutError> {
        if input >= self.num_inputs {
            return Err(LayoutError::IndexOutOfBounds {
                what: "input",
                index: input,
                len: self.num_inputs,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(num_inputs: usize, num_neurons: usize, simd: usize, pe: usize) -> LayerGeometry {
        LayerConfig {
            num_inputs,
            num_neurons,
            simd,
            pe,
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_reference_scenario_folds() {
        let g = geometry(4, 2, 2, 2);
        assert_eq!(g.simd_folds(), 2);
        assert_eq!(g.pe_folds(), 1);
        assert_eq!(g.weight_offsets(), 2);
        assert_eq!(g.weight_len(), 8);
        assert_eq!(g.input_packer().lanes(), 2);
        assert_eq!(g.output_packer().lane_width(), 16);
    }

    #[test]
    fn test_weight_slot_reference_layout() {
        // 4 inputs × 2 neurons, simd=2, pe=2: offset = pe_fold·2 + simd_fold
        // with pe_fold always 0 here.
        let g = geometry(4, 2, 2, 2);
        let slot = g.weight_slot(1, 3).unwrap();
        assert_eq!(
            slot,
            FoldedIndex {
                pe: 1,
                simd: 1,
                offset: 1
            }
        );
        let slot = g.weight_slot(0, 2).unwrap();
        assert_eq!(
            slot,
            FoldedIndex {
                pe: 0,
                simd: 0,
                offset: 1
            }
        );
    }

    #[test]
    fn test_weight_bijection_round_trip() {
        let g = geometry(6, 6, 2, 3);
        let mut seen = std::collections::HashSet::new();
        for neuron in 0..6 {
            for input in 0..6 {
                let slot = g.weight_slot(neuron, input).unwrap();
                assert!(slot.pe < 3 && slot.simd < 2 && slot.offset < g.weight_offsets());
                assert!(
                    seen.insert((slot.pe, slot.simd, slot.offset)),
                    "slot reused for ({neuron},{input})"
                );
                assert_eq!(g.weight_coords(slot).unwrap(), (neuron, input));
            }
        }
        assert_eq!(seen.len(), g.weight_len());
    }

    #[test]
    fn test_bias_bijection_round_trip() {
        let g = geometry(4, 6, 2, 3);
        for neuron in 0..6 {
            let (pe, pe_fold) = g.bias_slot(neuron).unwrap();
            assert_eq!(g.bias_neuron(pe, pe_fold).unwrap(), neuron);
        }
    }

    #[test]
    fn test_degenerate_single_fold() {
        let g = geometry(4, 2, 4, 2);
        assert_eq!(g.simd_folds(), 1);
        assert_eq!(g.pe_folds(), 1);
        // Every weight lands at offset 0.
        for neuron in 0..2 {
            for input in 0..4 {
                assert_eq!(g.weight_slot(neuron, input).unwrap().offset, 0);
            }
        }
    }

    #[test]
    fn test_degenerate_fully_sequential() {
        let g = geometry(4, 2, 1, 1);
        assert_eq!(g.simd_folds(), 4);
        assert_eq!(g.pe_folds(), 2);
        // Lanes collapse; the offset axis carries everything.
        let slot = g.weight_slot(1, 3).unwrap();
        assert_eq!((slot.pe, slot.simd), (0, 0));
        assert_eq!(slot.offset, 1 * 4 + 3);
        assert_eq!(g.weight_coords(slot).unwrap(), (1, 3));
    }

    #[test]
    fn test_out_of_range_indices() {
        let g = geometry(4, 2, 2, 2);
        assert!(g.weight_slot(2, 0).is_err());
        assert!(g.weight_slot(0, 4).is_err());
        assert!(g.bias_slot(2).is_err());
        assert!(g
            .weight_coords(FoldedIndex {
                pe: 0,
                simd: 0,
                offset: 2
            })
            .is_err());
        assert!(g.bias_neuron(0, 1).is_err());
    }

    #[test]
    fn test_summary_mentions_folds_and_formats() {
        let g = geometry(8, 4, 2, 2);
        let s = g.summary();
        assert!(s.contains("8→4"));
        assert!(s.contains("simd=2 (4 folds)"));
        assert!(s.contains("Q8.8"));
    }
}
