// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Layer configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! num_inputs = 4
//! num_neurons = 2
//! simd = 2
//! pe = 2
//!
//! [input_format]
//! width = 16
//! frac = 8
//!
//! [weight_format]
//! width = 16
//! frac = 8
//!
//! [bias_format]
//! width = 16
//! frac = 8
//!
//! [output_format]
//! width = 16
//! frac = 8
//! ```
//!
//! Every format section is optional and defaults to Q8.8 (16 bits, 8
//! fractional), the reference hardware configuration.

use std::path::Path;

use fixed_point::QFormat;

use crate::{LayerGeometry, LayoutError};

/// Configuration for one folded dense layer.
///
/// A raw config is just data; [`LayerConfig::validate`] turns it into a
/// [`LayerGeometry`] after the one-time divisibility and word-width checks.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerConfig {
    /// Length of the logical input vector.
    pub num_inputs: usize,
    /// Number of neurons (rows of the logical weight matrix).
    pub num_neurons: usize,
    /// Input lanes processed together per step; must divide `num_inputs`.
    pub simd: usize,
    /// Output lanes processed together per step; must divide `num_neurons`.
    pub pe: usize,
    /// Input scalar format; its width is also the input stream lane width.
    #[serde(default)]
    pub input_format: QFormat,
    /// Weight scalar format.
    #[serde(default)]
    pub weight_format: QFormat,
    /// Bias scalar format.
    #[serde(default)]
    pub bias_format: QFormat,
    /// Output scalar format; also the accumulator domain, and the output
    /// stream lane width.
    #[serde(default)]
    pub output_format: QFormat,
}

impl LayerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, LayoutError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LayoutError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, LayoutError> {
        toml::from_str(toml_str)
            .map_err(|e| LayoutError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, LayoutError> {
        toml::to_string_pretty(self)
            .map_err(|e| LayoutError::Config(format!("TOML serialise error: {e}")))
    }

    /// Runs the one-time configuration checks and derives the folded
    /// geometry. Every violation is fatal; no tensor can be built from a
    /// config that never validated.
    pub fn validate(&self) -> Result<LayerGeometry, LayoutError> {
        LayerGeometry::from_config(self)
    }
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            num_inputs: 4,
            num_neurons: 2,
            simd: 2,
            pe: 2,
            input_format: QFormat::Q16_8,
            weight_format: QFormat::Q16_8,
            bias_format: QFormat::Q16_8,
            output_format: QFormat::Q16_8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_reference_scenario() {
        let c = LayerConfig::default();
        assert_eq!(c.num_inputs, 4);
        assert_eq!(c.num_neurons, 2);
        assert_eq!(c.simd, 2);
        assert_eq!(c.pe, 2);
        assert_eq!(c.input_format, QFormat::Q16_8);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_from_toml_with_defaulted_formats() {
        let toml = r#"
num_inputs = 8
num_neurons = 4
simd = 4
pe = 2
"#;
        let c = LayerConfig::from_toml(toml).unwrap();
        assert_eq!(c.num_inputs, 8);
        assert_eq!(c.weight_format, QFormat::Q16_8);
        let g = c.validate().unwrap();
        assert_eq!(g.simd_folds(), 2);
        assert_eq!(g.pe_folds(), 2);
    }

    #[test]
    fn test_from_toml_with_explicit_formats() {
        let toml = r#"
num_inputs = 4
num_neurons = 2
simd = 2
pe = 2

[input_format]
width = 8
frac = 4

[output_format]
width = 24
frac = 12
"#;
        let c = LayerConfig::from_toml(toml).unwrap();
        assert_eq!(c.input_format, QFormat::new(8, 4).unwrap());
        assert_eq!(c.output_format, QFormat::new(24, 12).unwrap());
        assert_eq!(c.bias_format, QFormat::Q16_8);
    }

    #[test]
    fn test_from_toml_rejects_bad_format() {
        let toml = r#"
num_inputs = 4
num_neurons = 2
simd = 2
pe = 2

[input_format]
width = 16
frac = 16
"#;
        assert!(matches!(
            LayerConfig::from_toml(toml),
            Err(LayoutError::Config(_))
        ));
    }

    #[test]
    fn test_to_toml_round_trip() {
        let c = LayerConfig {
            num_inputs: 16,
            num_neurons: 8,
            simd: 4,
            pe: 4,
            input_format: QFormat::new(12, 6).unwrap(),
            ..Default::default()
        };
        let toml = c.to_toml().unwrap();
        let back = LayerConfig::from_toml(&toml).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_rejects_simd_not_dividing_inputs() {
        let c = LayerConfig {
            num_inputs: 7,
            simd: 2,
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(LayoutError::NotDivisible {
                dividend: 7,
                divisor: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_pe_not_dividing_neurons() {
        let c = LayerConfig {
            num_neurons: 3,
            pe: 2,
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(LayoutError::NotDivisible {
                dividend: 3,
                divisor: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        for (name, config) in [
            ("num_inputs", LayerConfig { num_inputs: 0, ..Default::default() }),
            ("num_neurons", LayerConfig { num_neurons: 0, ..Default::default() }),
            ("simd", LayerConfig { simd: 0, ..Default::default() }),
            ("pe", LayerConfig { pe: 0, ..Default::default() }),
        ] {
            assert!(
                matches!(config.validate(), Err(LayoutError::ZeroDimension { .. })),
                "expected zero-dimension rejection for {name}"
            );
        }
    }

    #[test]
    fn test_rejects_words_wider_than_carrier() {
        // 8 input lanes of 32 bits each would need a 256-bit word.
        let c = LayerConfig {
            num_inputs: 8,
            simd: 8,
            input_format: QFormat::new(32, 16).unwrap(),
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(LayoutError::Stream(_))));
    }
}
