// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Seeded stimulus generation.
//!
//! A [`StimulusGenerator`] is a deterministic stream of uniform values:
//! the same seed always produces the same scenario, so every failing
//! report names the seed that reproduces it.

use fold_layout::LayerGeometry;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Dense stimulus for one layer scenario, drawn in this order: weights,
/// then bias, then inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStimulus {
    /// Row-major `[num_neurons × num_inputs]` weight matrix.
    pub weights: Vec<f64>,
    /// Bias vector of `num_neurons` values.
    pub bias: Vec<f64>,
    /// Input vector of `num_inputs` values.
    pub inputs: Vec<f64>,
}

/// Seeded random stimulus source.
pub struct StimulusGenerator {
    rng: ChaCha20Rng,
}

impl StimulusGenerator {
    /// Creates a generator with a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Draws `len` values uniformly from `[-amplitude, amplitude)`.
    pub fn uniform(&mut self, len: usize, amplitude: f64) -> Vec<f64> {
        (0..len)
            .map(|_| self.rng.gen_range(-amplitude..amplitude))
            .collect()
    }

    /// Draws a complete layer stimulus for the given geometry.
    pub fn layer_stimulus(&mut self, geometry: &LayerGeometry, amplitude: f64) -> LayerStimulus {
        LayerStimulus {
            weights: self.uniform(geometry.weight_len(), amplitude),
            bias: self.uniform(geometry.bias_len(), amplitude),
            inputs: self.uniform(geometry.num_inputs(), amplitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fold_layout::LayerConfig;

    #[test]
    fn test_same_seed_same_stimulus() {
        let g = LayerConfig::default().validate().unwrap();
        let a = StimulusGenerator::new(7).layer_stimulus(&g, 1.0);
        let b = StimulusGenerator::new(7).layer_stimulus(&g, 1.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let g = LayerConfig::default().validate().unwrap();
        let a = StimulusGenerator::new(7).layer_stimulus(&g, 1.0);
        let b = StimulusGenerator::new(8).layer_stimulus(&g, 1.0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_uniform_respects_amplitude() {
        let values = StimulusGenerator::new(1).uniform(1000, 0.25);
        assert_eq!(values.len(), 1000);
        assert!(values.iter().all(|v| (-0.25..0.25).contains(v)));
    }

    #[test]
    fn test_stimulus_lengths_follow_geometry() {
        let g = LayerConfig {
            num_inputs: 8,
            num_neurons: 4,
            ..Default::default()
        }
        .validate()
        .unwrap();
        let s = StimulusGenerator::new(3).layer_stimulus(&g, 1.0);
        assert_eq!(s.weights.len(), 32);
        assert_eq!(s.bias.len(), 4);
        assert_eq!(s.inputs.len(), 8);
    }
}
