// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-run engine metrics.
//!
//! [`RunMetrics`] records the stream traffic and arithmetic volume of a
//! single run. The word counts double as a protocol check: a correct run
//! always consumes `simd_folds` words and emits `pe_folds`.

use std::time::Duration;

/// Metrics for one complete engine run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunMetrics {
    /// Input words read from the stream.
    pub words_consumed: usize,
    /// Output words pushed to the stream.
    pub words_emitted: usize,
    /// Multiply-accumulate operations performed.
    pub mac_count: u64,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl RunMetrics {
    /// MAC throughput in operations per second.
    pub fn macs_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 || self.mac_count == 0 {
            return 0.0;
        }
        self.mac_count as f64 / secs
    }

    /// Human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Run: {} words in, {} words out, {} MACs in {:.3}ms ({:.2} MMAC/s)",
            self.words_consumed,
            self.words_emitted,
            self.mac_count,
            self.elapsed.as_secs_f64() * 1000.0,
            self.macs_per_second() / 1e6,
        )
    }
}
