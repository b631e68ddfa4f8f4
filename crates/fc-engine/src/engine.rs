// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The folded matrix-vector engine, with loading enforced by type-state.
//!
//! ```text
//! FcEngine<Idle>
//!     │  .load()
//!     ▼
//! FcEngine<Ready>
//!     │  .run()
//!     ▼
//!   RunMetrics
//! ```
//!
//! The transition consumes the idle engine and returns a ready one, so
//! running without parameters is a compile error.

use crate::{EngineError, RunMetrics};
use fold_layout::{FoldedBias, FoldedWeights, LayerGeometry};
use lane_stream::WordStream;
use std::time::Instant;

// ── Type-state markers ─────────────────────────────────────────

/// Engine is created but holds no parameters.
#[derive(Debug)]
pub struct Idle;

/// Parameters are loaded and shape-checked; the engine can run.
#[derive(Debug)]
pub struct Ready;

/// Sealed trait for engine states.
pub trait EngineState: std::fmt::Debug {}
impl EngineState for Idle {}
impl EngineState for Ready {}

// ── Engine ─────────────────────────────────────────────────────

/// The folded fully-connected layer engine.
///
/// `S` is a type-state marker enforcing load-before-run at compile time.
/// Arithmetic follows the output format's rules: every input·weight
/// product is requantized to the output format (floor) and accumulated
/// with saturation, starting from the requantized bias.
///
/// # Example
/// ```
/// use fc_engine::FcEngine;
/// use fold_layout::{FoldedBias, FoldedWeights, LayerConfig};
/// use lane_stream::WordStream;
///
/// # fn example() -> Result<(), fc_engine::EngineError> {
/// let geometry = LayerConfig::default().validate()?;
/// let weights = FoldedWeights::from_dense(&geometry, &[0.5; 8])?;
/// let bias = FoldedBias::from_dense(&geometry, &[1.0, -1.0])?;
/// let engine = FcEngine::new(geometry.clone()).load(weights, bias)?;
///
/// let mut input = WordStream::with_capacity(geometry.simd_folds());
/// let mut output = WordStream::with_capacity(geometry.pe_folds());
/// for _ in 0..geometry.simd_folds() {
///     let word = geometry.input_packer().pack(&[256, 256]).unwrap();
///     input.push(word).unwrap();
/// }
/// let metrics = engine.run(&mut input, &mut output)?;
/// assert_eq!(metrics.words_emitted, 1);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct FcEngine<S: EngineState = Idle> {
    geometry: LayerGeometry,
    _state: std::marker::PhantomData<S>,
    // Fields populated on the Idle → Ready transition:
    weights: Option<FoldedWeights>,
    bias: Option<FoldedBias>,
}

impl<S: EngineState> FcEngine<S> {
    /// The geometry this engine was built for.
    pub fn geometry(&self) -> &LayerGeometry {
        &self.geometry
    }
}

// ── Idle → Ready ───────────────────────────────────────────────

impl FcEngine<Idle> {
    /// Creates an engine for the given validated geometry.
    pub fn new(geometry: LayerGeometry) -> Self {
        tracing::info!("engine created: {}", geometry.summary());
        Self {
            geometry,
            _state: std::marker::PhantomData,
            weights: None,
            bias: None,
        }
    }

    /// Loads folded parameters and transitions to the `Ready` state.
    ///
    /// Both tensors must have been folded for this engine's geometry;
    /// shapes and scalar formats are checked here, once, so the run loop
    /// never has to.
    pub fn load(
        self,
        weights: FoldedWeights,
        bias: FoldedBias,
    ) -> Result<FcEngine<Ready>, EngineError> {
        let g = &self.geometry;

        let expected = (g.pe(), g.simd(), g.weight_offsets());
        if weights.dims() != expected {
            return Err(EngineError::WeightShape {
                tensor: weights.dims(),
                geometry: expected,
            });
        }
        if weights.format() != g.weight_format() {
            return Err(EngineError::FormatMismatch {
                what: "weight",
                tensor: weights.format(),
                geometry: g.weight_format(),
            });
        }

        let expected = (g.pe(), g.pe_folds());
        if bias.dims() != expected {
            return Err(EngineError::BiasShape {
                tensor: bias.dims(),
                geometry: expected,
            });
        }
        if bias.format() != g.bias_format() {
            return Err(EngineError::FormatMismatch {
                what: "bias",
                tensor: bias.format(),
                geometry: g.bias_format(),
            });
        }

        tracing::info!(
            weights = g.weight_len(),
            bias = g.bias_len(),
            "parameters loaded"
        );
        Ok(FcEngine {
            geometry: self.geometry,
            _state: std::marker::PhantomData,
            weights: Some(weights),
            bias: Some(bias),
        })
    }
}

// ── Ready: run the layer ───────────────────────────────────────

impl FcEngine<Ready> {
    /// Runs one layer evaluation.
    ///
    /// Consumes exactly `simd_folds` words from `input` and emits exactly
    /// `pe_folds` words to `output`, in fold order. Each input word is
    /// read once and reused against every output fold. Accumulators start
    /// from the bias, requantized into the output format.
    ///
    /// Fails without emitting anything if the input stream runs dry, and
    /// fails mid-emit if the output stream refuses a word (for instance
    /// because a previous run was never drained).
    pub fn run(
        &self,
        input: &mut WordStream,
        output: &mut WordStream,
    ) -> Result<RunMetrics, EngineError> {
        let run_start = Instant::now();
        let g = &self.geometry;
        let weights = self.weights.as_ref().expect("weights exist in Ready state");
        let bias = self.bias.as_ref().expect("bias exists in Ready state");

        let out_format = g.output_format();
        let bias_frac = g.bias_format().frac();
        let product_frac = g.product_frac();
        let input_packer = g.input_packer();
        let output_packer = g.output_packer();

        tracing::debug!(
            simd_folds = g.simd_folds(),
            pe_folds = g.pe_folds(),
            "starting run"
        );

        // Accumulators, indexed [pe][pe_fold], seeded from the bias.
        let mut accumulator = vec![vec![0i32; g.pe_folds()]; g.pe()];
        for (pe, row) in accumulator.iter_mut().enumerate() {
            for (pe_fold, acc) in row.iter_mut().enumerate() {
                *acc = out_format.requantize(i64::from(bias.lane_at(pe, pe_fold)), bias_frac);
            }
        }

        let mut words_consumed = 0usize;
        let mut mac_count = 0u64;

        for simd_fold in 0..g.simd_folds() {
            let word = input.pop().map_err(|_| EngineError::InputExhausted {
                read: simd_fold,
                required: g.simd_folds(),
            })?;
            words_consumed += 1;
            let lanes = input_packer.unpack(word);
            tracing::trace!(simd_fold, word = %word, "consumed input word");

            for pe_fold in 0..g.pe_folds() {
                let offset = pe_fold * g.simd_folds() + simd_fold;
                for pe in 0..g.pe() {
                    let mut acc = accumulator[pe][pe_fold];
                    for (simd, &lane) in lanes.iter().enumerate() {
                        let product =
                            i64::from(lane) * i64::from(weights.lane_at(pe, simd, offset));
                        acc = out_format.add_sat(acc, out_format.requantize(product, product_frac));
                    }
                    accumulator[pe][pe_fold] = acc;
                    mac_count += g.simd() as u64;
                }
            }
        }

        let mut words_emitted = 0usize;
        let mut lanes = vec![0i32; g.pe()];
        for pe_fold in 0..g.pe_folds() {
            for (pe, lane) in lanes.iter_mut().enumerate() {
                *lane = accumulator[pe][pe_fold];
            }
            let word = output_packer
                .pack(&lanes)
                .and_then(|word| output.push(word).map(|()| word))
                .map_err(|source| EngineError::OutputRejected {
                    emitted: words_emitted,
                    source,
                })?;
            words_emitted += 1;
            tracing::trace!(pe_fold, word = %word, "emitted output word");
        }

        let metrics = RunMetrics {
            words_consumed,
            words_emitted,
            mac_count,
            elapsed: run_start.elapsed(),
        };
        tracing::debug!("{}", metrics.summary());
        Ok(metrics)
    }
}

impl<S: EngineState> std::fmt::Debug for FcEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FcEngine")
            .field("state", &std::any::type_name::<S>())
            .field("geometry", &self.geometry.summary())
            .field("has_weights", &self.weights.is_some())
            .field("has_bias", &self.bias.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixed_point::{Fixed, QFormat};
    use fold_layout::LayerConfig;
    use lane_stream::PackedWord;

    /// Folds, loads, runs, and unfolds one layer evaluation, returning
    /// raw output values in neuron order.
    fn run_raw(simd: usize, pe: usize, weights: &[f64], bias: &[f64], inputs: &[f64]) -> Vec<i32> {
        let g = LayerConfig {
            num_inputs: inputs.len(),
            num_neurons: bias.len(),
            simd,
            pe,
            ..Default::default()
        }
        .validate()
        .unwrap();
        let engine = FcEngine::new(g.clone())
            .load(
                FoldedWeights::from_dense(&g, weights).unwrap(),
                FoldedBias::from_dense(&g, bias).unwrap(),
            )
            .unwrap();

        let mut input = WordStream::with_capacity(g.simd_folds());
        for fold in 0..g.simd_folds() {
            let lanes: Vec<i32> = (0..g.simd())
                .map(|lane| Fixed::from_f64(inputs[fold * g.simd() + lane], g.input_format()).raw())
                .collect();
            input
                .push(g.input_packer().pack(&lanes).unwrap())
                .unwrap();
        }

        let mut output = WordStream::with_capacity(g.pe_folds());
        let metrics = engine.run(&mut input, &mut output).unwrap();
        assert_eq!(metrics.words_consumed, g.simd_folds());
        assert_eq!(metrics.words_emitted, g.pe_folds());
        assert!(input.is_empty());

        let mut dense = vec![0i32; bias.len()];
        for pe_fold in 0..g.pe_folds() {
            let word = output.pop().unwrap();
            for (lane, raw) in g.output_packer().unpack(word).into_iter().enumerate() {
                dense[g.bias_neuron(lane, pe_fold).unwrap()] = raw;
            }
        }
        dense
    }

    const W: [f64; 8] = [0.5, -0.25, 1.0, 2.0, -1.0, 0.75, 0.5, -0.5];
    const B: [f64; 2] = [0.5, -0.25];
    const X: [f64; 4] = [1.0, 2.0, -1.0, 0.5];

    #[test]
    fn test_reference_layer_matches_hand_computation() {
        // y0 = 0.5 - 0.5 - 1.0 + 1.0 + 0.5 = 0.5, y1 = -1.0 + 1.5 - 0.5
        // - 0.25 - 0.25 = -0.5; every product is exact in Q8.8.
        assert_eq!(run_raw(2, 2, &W, &B, &X), vec![128, -128]);
    }

    #[test]
    fn test_folding_does_not_change_results() {
        let reference = run_raw(2, 2, &W, &B, &X);
        assert_eq!(run_raw(1, 1, &W, &B, &X), reference);
        assert_eq!(run_raw(4, 1, &W, &B, &X), reference);
        assert_eq!(run_raw(1, 2, &W, &B, &X), reference);
        assert_eq!(run_raw(4, 2, &W, &B, &X), reference);
    }

    #[test]
    fn test_accumulation_saturates() {
        let weights = [100.0, 100.0, 100.0, 100.0, -100.0, -100.0, -100.0, -100.0];
        let inputs = [100.0; 4];
        let out = run_raw(2, 2, &weights, &[0.0, 0.0], &inputs);
        let format = QFormat::Q16_8;
        assert_eq!(out, vec![format.max_raw(), format.min_raw()]);
    }

    #[test]
    fn test_engine_is_reusable_across_runs() {
        let g = LayerConfig::default().validate().unwrap();
        let engine = FcEngine::new(g.clone())
            .load(
                FoldedWeights::from_dense(&g, &W).unwrap(),
                FoldedBias::from_dense(&g, &B).unwrap(),
            )
            .unwrap();

        let mut first = None;
        for _ in 0..3 {
            let mut input = WordStream::with_capacity(g.simd_folds());
            input
                .push(g.input_packer().pack(&[256, 512]).unwrap())
                .unwrap();
            input
                .push(g.input_packer().pack(&[-256, 128]).unwrap())
                .unwrap();
            let mut output = WordStream::with_capacity(g.pe_folds());
            engine.run(&mut input, &mut output).unwrap();
            let word = output.pop().unwrap();
            match first {
                None => first = Some(word),
                Some(expected) => assert_eq!(word, expected),
            }
        }
    }

    #[test]
    fn test_load_rejects_foreign_weights() {
        let g = LayerConfig::default().validate().unwrap();
        let wide = LayerConfig {
            num_inputs: 8,
            ..Default::default()
        }
        .validate()
        .unwrap();
        let result = FcEngine::new(g.clone()).load(
            FoldedWeights::from_dense(&wide, &[0.0; 16]).unwrap(),
            FoldedBias::from_dense(&g, &[0.0; 2]).unwrap(),
        );
        assert!(matches!(
            result,
            Err(EngineError::WeightShape {
                tensor: (2, 2, 4),
                geometry: (2, 2, 2),
            })
        ));
    }

    #[test]
    fn test_load_rejects_foreign_formats() {
        let g = LayerConfig::default().validate().unwrap();
        let narrow = LayerConfig {
            weight_format: QFormat::new(12, 4).unwrap(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let result = FcEngine::new(g.clone()).load(
            FoldedWeights::from_dense(&narrow, &[0.0; 8]).unwrap(),
            FoldedBias::from_dense(&g, &[0.0; 2]).unwrap(),
        );
        assert!(matches!(
            result,
            Err(EngineError::FormatMismatch { what: "weight", .. })
        ));
    }

    #[test]
    fn test_load_rejects_foreign_bias() {
        let g = LayerConfig::default().validate().unwrap();
        let tall = LayerConfig {
            num_neurons: 6,
            ..Default::default()
        }
        .validate()
        .unwrap();
        let result = FcEngine::new(g.clone()).load(
            FoldedWeights::from_dense(&g, &[0.0; 8]).unwrap(),
            FoldedBias::from_dense(&tall, &[0.0; 6]).unwrap(),
        );
        assert!(matches!(
            result,
            Err(EngineError::BiasShape {
                tensor: (2, 3),
                geometry: (2, 1),
            })
        ));
    }

    #[test]
    fn test_underfed_input_is_an_error() {
        let g = LayerConfig::default().validate().unwrap();
        let engine = FcEngine::new(g.clone())
            .load(
                FoldedWeights::from_dense(&g, &W).unwrap(),
                FoldedBias::from_dense(&g, &B).unwrap(),
            )
            .unwrap();

        let mut input = WordStream::with_capacity(g.simd_folds());
        input
            .push(g.input_packer().pack(&[256, 512]).unwrap())
            .unwrap();
        let mut output = WordStream::with_capacity(g.pe_folds());
        assert!(matches!(
            engine.run(&mut input, &mut output),
            Err(EngineError::InputExhausted {
                read: 1,
                required: 2,
            })
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn test_undrained_output_is_an_error() {
        let g = LayerConfig::default().validate().unwrap();
        let engine = FcEngine::new(g.clone())
            .load(
                FoldedWeights::from_dense(&g, &W).unwrap(),
                FoldedBias::from_dense(&g, &B).unwrap(),
            )
            .unwrap();

        let mut input = WordStream::with_capacity(g.simd_folds());
        input
            .push(g.input_packer().pack(&[256, 512]).unwrap())
            .unwrap();
        input
            .push(g.input_packer().pack(&[-256, 128]).unwrap())
            .unwrap();
        // A stale word from an undrained previous run blocks the emit.
        let mut output = WordStream::with_capacity(g.pe_folds());
        output.push(PackedWord::default()).unwrap();

        assert!(matches!(
            engine.run(&mut input, &mut output),
            Err(EngineError::OutputRejected { emitted: 0, .. })
        ));
    }

    #[test]
    fn test_debug_format() {
        let g = LayerConfig::default().validate().unwrap();
        let engine = FcEngine::new(g);
        let debug = format!("{engine:?}");
        assert!(debug.contains("FcEngine"));
        assert!(debug.contains("Idle"));
        assert!(debug.contains("has_weights: false"));
    }
}
