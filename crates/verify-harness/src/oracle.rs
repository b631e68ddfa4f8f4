// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The dense `f64` reference computation.

use crate::HarnessError;

/// Computes `output[n] = Σ weights[n][i] · inputs[i] + bias[n]` in plain
/// `f64`, with `weights` row-major `[num_neurons × num_inputs]`.
///
/// This is the behavioural reference the engine is judged against; it
/// never folds, quantizes, or saturates.
pub fn dense_affine(
    weights: &[f64],
    bias: &[f64],
    inputs: &[f64],
) -> Result<Vec<f64>, HarnessError> {
    let expected = bias.len() * inputs.len();
    if weights.len() != expected {
        return Err(HarnessError::OracleShape {
            what: "weights",
            expected,
            got: weights.len(),
        });
    }

    Ok(bias
        .iter()
        .enumerate()
        .map(|(neuron, &b)| {
            let row = &weights[neuron * inputs.len()..(neuron + 1) * inputs.len()];
            row.iter().zip(inputs).map(|(w, x)| w * x).sum::<f64>() + b
        })
        .collect())
}
