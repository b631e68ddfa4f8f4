// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Folded weight and bias tensors.
//!
//! Both tensors own their raw lane values and remember the folded shape
//! they were built for. Construction quantizes (dense path) or
//! range-checks (raw path); every access after that is a plain read.

use fixed_point::{Fixed, QFormat};

use crate::{FoldedIndex, LayerGeometry, LayoutError};

/// Folded weight tensor, indexed `[pe][simd][offset]`.
///
/// The offset axis interleaves the two fold loops:
/// `offset = pe_fold · simd_folds + simd_fold`. The mapping from a
/// logical `(neuron, input)` pair is [`LayerGeometry::weight_slot`].
#[derive(Debug, Clone, PartialEq)]
pub struct FoldedWeights {
    data: Vec<i32>,
    format: QFormat,
    pe: usize,
    simd: usize,
    offsets: usize,
}

impl FoldedWeights {
    /// Quantizes and folds a dense row-major weight matrix.
    ///
    /// `dense[neuron · num_inputs + input]` holds the weight applied to
    /// `input` at `neuron`. Values are quantized to the geometry's weight
    /// format (round to nearest, saturating) and placed by
    /// [`LayerGeometry::weight_slot`].
    pub fn from_dense(geometry: &LayerGeometry, dense: &[f64]) -> Result<Self, LayoutError> {
        if dense.len() != geometry.weight_len() {
            return Err(LayoutError::DenseLengthMismatch {
                what: "dense weights",
                expected: geometry.weight_len(),
                got: dense.len(),
            });
        }
        let mut tensor = Self::zeros(geometry);
        for neuron in 0..geometry.num_neurons() {
            for input in 0..geometry.num_inputs() {
                let slot = geometry.weight_slot(neuron, input)?;
                let idx = tensor.flat(slot.pe, slot.simd, slot.offset);
                let value = dense[neuron * geometry.num_inputs() + input];
                tensor.data[idx] = Fixed::from_f64(value, tensor.format).raw();
            }
        }
        tracing::debug!(elements = tensor.data.len(), "folded dense weights");
        Ok(tensor)
    }

    /// Wraps raw lane values already quantized to the geometry's weight
    /// format, flattened in `[pe][simd][offset]` order.
    ///
    /// Returns an error if the length is wrong or any value falls outside
    /// the format's raw range.
    pub fn from_raw(geometry: &LayerGeometry, data: Vec<i32>) -> Result<Self, LayoutError> {
        if data.len() != geometry.weight_len() {
            return Err(LayoutError::DenseLengthMismatch {
                what: "raw folded weights",
                expected: geometry.weight_len(),
                got: data.len(),
            });
        }
        let format = geometry.weight_format();
        for &raw in &data {
            Fixed::from_raw(raw, format)?;
        }
        Ok(Self {
            data,
            format,
            pe: geometry.pe(),
            simd: geometry.simd(),
            offsets: geometry.weight_offsets(),
        })
    }

    /// Raw lane value at `[pe][simd][offset]`.
    ///
    /// # Panics
    /// Panics if any index is outside the tensor's dimensions.
    pub fn lane_at(&self, pe: usize, simd: usize, offset: usize) -> i32 {
        assert!(
            pe < self.pe && simd < self.simd && offset < self.offsets,
            "weight index ({pe},{simd},{offset}) outside {:?}",
            self.dims()
        );
        self.data[self.flat(pe, simd, offset)]
    }

    /// Raw lane value at a folded index.
    ///
    /// # Panics
    /// Panics if the index is outside the tensor's dimensions.
    pub fn at(&self, slot: FoldedIndex) -> i32 {
        self.lane_at(slot.pe, slot.simd, slot.offset)
    }

    /// Unfolds back into a dense row-major `f64` matrix.
    pub fn to_dense(&self, geometry: &LayerGeometry) -> Result<Vec<f64>, LayoutError> {
        self.check_geometry(geometry)?;
        let mut dense = vec![0.0; geometry.weight_len()];
        for neuron in 0..geometry.num_neurons() {
            for input in 0..geometry.num_inputs() {
                let slot = geometry.weight_slot(neuron, input)?;
                dense[neuron * geometry.num_inputs() + input] =
                    self.at(slot) as f64 * self.format.resolution();
            }
        }
        Ok(dense)
    }

    /// Folded dimensions `(pe, simd, offsets)`.
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.pe, self.simd, self.offsets)
    }

    /// Scalar format of the stored lanes.
    pub fn format(&self) -> QFormat {
        self.format
    }

    fn zeros(geometry: &LayerGeometry) -> Self {
        Self {
            data: vec![0; geometry.weight_len()],
            format: geometry.weight_format(),
            pe: geometry.pe(),
            simd: geometry.simd(),
            offsets: geometry.weight_offsets(),
        }
    }

    fn flat(&self, pe: usize, simd: usize, offset: usize) -> usize {
        (pe * self.simd + simd) * self.offsets + offset
    }

    fn check_geometry(&self, geometry: &LayerGeometry) -> Result<(), LayoutError> {
        let expected = (geometry.pe(), geometry.simd(), geometry.weight_offsets());
        if self.dims() != expected {
            return Err(LayoutError::GeometryMismatch {
                tensor: self.dims(),
                geometry: expected,
            });
        }
        Ok(())
    }
}

/// Folded bias tensor, indexed `[pe][pe_fold]`.
///
/// `bias[neuron]` lands at `(neuron % pe, neuron / pe)`, the position
/// [`LayerGeometry::bias_slot`] computes.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldedBias {
    data: Vec<i32>,
    format: QFormat,
    pe: usize,
    pe_folds: usize,
}

impl FoldedBias {
    /// Quantizes and folds a dense bias vector of `num_neurons` values.
    pub fn from_dense(geometry: &LayerGeometry, dense: &[f64]) -> Result<Self, LayoutError> {
        if dense.len() != geometry.bias_len() {
            return Err(LayoutError::DenseLengthMismatch {
                what: "dense bias",
                expected: geometry.bias_len(),
                got: dense.len(),
            });
        }
        let format = geometry.bias_format();
        let mut data = vec![0; geometry.bias_len()];
        for (neuron, &value) in dense.iter().enumerate() {
            let (pe, pe_fold) = geometry.bias_slot(neuron)?;
            data[pe * geometry.pe_folds() + pe_fold] = Fixed::from_f64(value, format).raw();
        }
        tracing::debug!(elements = data.len(), "folded dense bias");
        Ok(Self {
            data,
            format,
            pe: geometry.pe(),
            pe_folds: geometry.pe_folds(),
        })
    }

    /// Wraps raw lane values already quantized to the geometry's bias
    /// format, flattened in `[pe][pe_fold]` order.
    pub fn from_raw(geometry: &LayerGeometry, data: Vec<i32>) -> Result<Self, LayoutError> {
        if data.len() != geometry.bias_len() {
            return Err(LayoutError::DenseLengthMismatch {
                what: "raw folded bias",
                expected: geometry.bias_len(),
                got: data.len(),
            });
        }
        let format = geometry.bias_format();
        for &raw in &data {
            Fixed::from_raw(raw, format)?;
        }
        Ok(Self {
            data,
            format,
            pe: geometry.pe(),
            pe_folds: geometry.pe_folds(),
        })
    }

    /// Raw lane value at `[pe][pe_fold]`.
    ///
    /// # Panics
    /// Panics if either index is outside the tensor's dimensions.
    pub fn lane_at(&self, pe: usize, pe_fold: usize) -> i32 {
        assert!(
            pe < self.pe && pe_fold < self.pe_folds,
            "bias index ({pe},{pe_fold}) outside ({}, {})",
            self.pe,
            self.pe_folds
        );
        self.data[pe * self.pe_folds + pe_fold]
    }

    /// Unfolds back into a dense `f64` vector.
    pub fn to_dense(&self, geometry: &LayerGeometry) -> Result<Vec<f64>, LayoutError> {
        self.check_geometry(geometry)?;
        let mut dense = vec![0.0; geometry.bias_len()];
        for (neuron, slot) in dense.iter_mut().enumerate() {
            let (pe, pe_fold) = geometry.bias_slot(neuron)?;
            *slot = self.lane_at(pe, pe_fold) as f64 * self.format.resolution();
        }
        Ok(dense)
    }

    /// Folded dimensions `(pe, pe_folds)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.pe, self.pe_folds)
    }

    /// Scalar format of the stored lanes.
    pub fn format(&self) -> QFormat {
        self.format
    }

    fn check_geometry(&self, geometry: &LayerGeometry) -> Result<(), LayoutError> {
        let expected = (geometry.pe(), geometry.pe_folds());
        if self.dims() != expected {
            return Err(LayoutError::GeometryMismatch {
                tensor: (self.pe, self.pe_folds, 1),
                geometry: (expected.0, expected.1, 1),
            });
        }
        Ok(())
    }
}
