// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The scenario pipeline: generate, fold, run, compare.

use crate::{
    dense_affine, HarnessError, StimulusGenerator, ToleranceViolation, VerificationReport,
};
use fc_engine::FcEngine;
use fixed_point::Fixed;
use fold_layout::{FoldedBias, FoldedWeights, LayerGeometry};
use lane_stream::WordStream;

/// Options for one verification scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyOptions {
    /// Stimulus seed.
    pub seed: u64,
    /// Half-width of the uniform stimulus range.
    pub amplitude: f64,
    /// Comparison tolerance; `None` derives the worst-case bound from
    /// the geometry.
    pub tolerance: Option<f64>,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            seed: 123,
            amplitude: 1.0,
            tolerance: None,
        }
    }
}

/// Worst-case absolute error of one engine output against the oracle,
/// for stimulus drawn from `[-amplitude, amplitude)`.
///
/// Accounts for input/weight rounding, per-product floor requantization,
/// and bias handling. The bound only holds while the true result stays
/// inside the output format's range; past that the engine saturates and
/// the oracle does not.
pub fn derived_tolerance(geometry: &LayerGeometry, amplitude: f64) -> f64 {
    let lsb_in = geometry.input_format().resolution();
    let lsb_w = geometry.weight_format().resolution();
    let lsb_b = geometry.bias_format().resolution();
    let lsb_out = geometry.output_format().resolution();
    let n = geometry.num_inputs() as f64;
    n * (amplitude * (lsb_in + lsb_w) / 2.0 + lsb_in * lsb_w / 4.0 + lsb_out)
        + lsb_b / 2.0
        + lsb_out
}

/// Runs one seeded scenario end to end and judges it.
///
/// Generates dense stimulus, computes the oracle result, folds and loads
/// the engine, streams the quantized inputs through it, and compares the
/// dequantized outputs neuron by neuron. The returned report may be a
/// failing one; use [`VerificationReport::into_result`] to turn failures
/// into errors.
pub fn run_scenario(
    geometry: &LayerGeometry,
    options: &VerifyOptions,
) -> Result<VerificationReport, HarnessError> {
    if !(options.amplitude > 0.0) {
        return Err(HarnessError::InvalidOption(format!(
            "amplitude must be positive, got {}",
            options.amplitude
        )));
    }
    let limit = geometry
        .input_format()
        .max_value()
        .min(geometry.weight_format().max_value())
        .min(geometry.bias_format().max_value());
    if options.amplitude > limit {
        return Err(HarnessError::InvalidOption(format!(
            "amplitude {} exceeds the narrowest operand format's range ({limit:.6})",
            options.amplitude
        )));
    }
    let bound = derived_tolerance(geometry, options.amplitude);
    let tolerance = options.tolerance.unwrap_or(bound);
    if tolerance < bound {
        tracing::warn!(tolerance, bound, "tolerance tighter than the quantization bound");
    }
    tracing::debug!(seed = options.seed, tolerance, "building scenario");

    let mut generator = StimulusGenerator::new(options.seed);
    let stimulus = generator.layer_stimulus(geometry, options.amplitude);
    let expected = dense_affine(&stimulus.weights, &stimulus.bias, &stimulus.inputs)?;

    let weights = FoldedWeights::from_dense(geometry, &stimulus.weights)?;
    let bias = FoldedBias::from_dense(geometry, &stimulus.bias)?;
    let engine = FcEngine::new(geometry.clone()).load(weights, bias)?;

    // Quantize and pack the inputs, one word per fold. Stream capacities
    // are exact, so a miscounted producer fails here, not inside the run.
    let mut input = WordStream::with_capacity(geometry.simd_folds());
    let packer = geometry.input_packer();
    for fold in 0..geometry.simd_folds() {
        let lanes: Vec<i32> = (0..geometry.simd())
            .map(|lane| {
                let value = stimulus.inputs[fold * geometry.simd() + lane];
                Fixed::from_f64(value, geometry.input_format()).raw()
            })
            .collect();
        let word = packer
            .pack(&lanes)
            .map_err(|source| HarnessError::Stimulus { word: fold, source })?;
        input
            .push(word)
            .map_err(|source| HarnessError::Stimulus { word: fold, source })?;
    }

    let mut output = WordStream::with_capacity(geometry.pe_folds());
    let metrics = engine.run(&mut input, &mut output)?;

    if !input.is_empty() {
        return Err(HarnessError::Protocol(format!(
            "{} input word(s) left unread",
            input.len()
        )));
    }

    // Drain, unpack, and dequantize the outputs back into dense order.
    let mut actual = vec![0.0f64; geometry.num_neurons()];
    let unpacker = geometry.output_packer();
    let scale = geometry.output_format().resolution();
    for pe_fold in 0..geometry.pe_folds() {
        let word = output.pop().map_err(|_| {
            HarnessError::Protocol(format!(
                "output stream held {} of {} words",
                pe_fold,
                geometry.pe_folds()
            ))
        })?;
        for (lane, raw) in unpacker.unpack(word).into_iter().enumerate() {
            actual[geometry.bias_neuron(lane, pe_fold)?] = raw as f64 * scale;
        }
    }

    let mut violations = Vec::new();
    let mut max_diff = 0.0f64;
    let mut diff_sum = 0.0f64;
    for (neuron, (&want, &got)) in expected.iter().zip(actual.iter()).enumerate() {
        let diff = (got - want).abs();
        tracing::trace!(neuron, want, got, diff, "compared output");
        diff_sum += diff;
        max_diff = max_diff.max(diff);
        if diff > tolerance {
            tracing::debug!(neuron, want, got, diff, "tolerance violated");
            violations.push(ToleranceViolation {
                neuron,
                expected: want,
                actual: got,
                diff,
            });
        }
    }

    let report = VerificationReport {
        seed: options.seed,
        tolerance,
        num_inputs: geometry.num_inputs(),
        num_neurons: geometry.num_neurons(),
        expected,
        actual,
        max_diff,
        avg_diff: diff_sum / geometry.num_neurons() as f64,
        violations,
        metrics,
    };
    tracing::info!("{}", report.summary());
    Ok(report)
}
