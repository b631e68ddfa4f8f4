// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Verification reports.
//!
//! A [`VerificationReport`] carries everything needed to reproduce and
//! judge one scenario: the seed, the tolerance in force, both output
//! vectors, and the per-neuron violations if any.

use crate::HarnessError;
use fc_engine::RunMetrics;

/// One output scalar that missed the tolerance.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToleranceViolation {
    /// Neuron index in dense order.
    pub neuron: usize,
    /// Oracle output.
    pub expected: f64,
    /// Engine output, dequantized.
    pub actual: f64,
    /// Absolute difference.
    pub diff: f64,
}

/// Outcome of one verified scenario.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VerificationReport {
    /// Seed that produced the stimulus.
    pub seed: u64,
    /// Tolerance the outputs were judged against.
    pub tolerance: f64,
    /// Dense input count of the scenario.
    pub num_inputs: usize,
    /// Neuron count of the scenario.
    pub num_neurons: usize,
    /// Oracle outputs in dense order.
    pub expected: Vec<f64>,
    /// Engine outputs in dense order, dequantized.
    pub actual: Vec<f64>,
    /// Largest absolute difference across neurons.
    pub max_diff: f64,
    /// Mean absolute difference across neurons.
    pub avg_diff: f64,
    /// Outputs that missed the tolerance.
    pub violations: Vec<ToleranceViolation>,
    /// Stream and arithmetic metrics of the engine run.
    pub metrics: RunMetrics,
}

impl VerificationReport {
    /// Whether every output met the tolerance.
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Verification {}: {}x{} layer, seed {}, max diff {:.6} (tolerance {:.6}), \
             avg diff {:.6}, {} violation(s)",
            if self.passed() { "PASS" } else { "FAIL" },
            self.num_inputs,
            self.num_neurons,
            self.seed,
            self.max_diff,
            self.tolerance,
            self.avg_diff,
            self.violations.len(),
        )
    }

    /// Converts a failing report into an error, keeping a passing one.
    pub fn into_result(self) -> Result<Self, HarnessError> {
        if self.passed() {
            Ok(self)
        } else {
            Err(HarnessError::Verification(self.summary()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn report(violations: Vec<ToleranceViolation>) -> VerificationReport {
        VerificationReport {
            seed: 123,
            tolerance: 0.05,
            num_inputs: 4,
            num_neurons: 2,
            expected: vec![0.5, -0.5],
            actual: vec![0.5, -0.5],
            max_diff: 0.0,
            avg_diff: 0.0,
            violations,
            metrics: RunMetrics {
                words_consumed: 2,
                words_emitted: 1,
                mac_count: 8,
                elapsed: Duration::ZERO,
            },
        }
    }

    #[test]
    fn test_clean_report_passes() {
        let r = report(Vec::new());
        assert!(r.passed());
        assert!(r.summary().contains("PASS"));
        assert!(r.into_result().is_ok());
    }

    #[test]
    fn test_violations_fail_the_report() {
        let r = report(vec![ToleranceViolation {
            neuron: 1,
            expected: -0.5,
            actual: 0.5,
            diff: 1.0,
        }]);
        assert!(!r.passed());
        assert!(r.summary().contains("FAIL"));
        assert!(matches!(
            r.into_result(),
            Err(HarnessError::Verification(_))
        ));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let r = report(Vec::new());
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"seed\":123"));
        assert!(json.contains("\"words_consumed\":2"));
    }
}
