// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Engine error types.

use fixed_point::QFormat;
use fold_layout::LayoutError;
use lane_stream::StreamError;

/// Errors raised while loading parameters or running the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// Geometry validation or tensor construction problem.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Weights were folded for a different geometry.
    #[error("weights shaped {tensor:?} do not fit geometry {geometry:?}")]
    WeightShape {
        tensor: (usize, usize, usize),
        geometry: (usize, usize, usize),
    },

    /// Bias was folded for a different geometry.
    #[error("bias shaped {tensor:?} does not fit geometry {geometry:?}")]
    BiasShape {
        tensor: (usize, usize),
        geometry: (usize, usize),
    },

    /// A tensor's scalar format differs from the geometry's.
    #[error("{what} format {tensor} does not match geometry format {geometry}")]
    FormatMismatch {
        what: &'static str,
        tensor: QFormat,
        geometry: QFormat,
    },

    /// The input stream ran dry before every fold was served.
    #[error("input stream exhausted after {read} of {required} words")]
    InputExhausted { read: usize, required: usize },

    /// An output word could not be emitted.
    #[error("emitting output word {emitted}: {source}")]
    OutputRejected {
        emitted: usize,
        #[source]
        source: StreamError,
    },
}
