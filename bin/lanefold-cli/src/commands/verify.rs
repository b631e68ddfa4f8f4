// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `lanefold verify` command: one seeded scenario against the oracle.
//!
//! Walks the full pipeline:
//! ```text
//! stimulus → quantize/fold → FcEngine::run → dequantize → compare
//! ```

use std::path::PathBuf;
use verify_harness::{run_scenario, VerifyOptions};

pub fn execute(
    config: Option<PathBuf>,
    seed: u64,
    amplitude: f64,
    tolerance: Option<f64>,
    report_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            lanefold · Oracle Verification            ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let config = super::load_config(&config)?;

    println!("  Scenario:");
    println!("   Layer:     {}→{}", config.num_inputs, config.num_neurons);
    println!("   Lanes:     simd={} pe={}", config.simd, config.pe);
    println!("   Seed:      {seed}");
    println!("   Amplitude: {amplitude}");
    match tolerance {
        Some(t) => println!("   Tolerance: {t} (explicit)"),
        None => println!("   Tolerance: derived from geometry"),
    }
    println!();

    // ── Pipeline ───────────────────────────────────────────────
    println!("  [1/3] Validating geometry...");
    let geometry = config.validate()?;
    println!("        {}", geometry.summary());
    println!();

    println!("  [2/3] Running the folded engine against the oracle...");
    let options = VerifyOptions {
        seed,
        amplitude,
        tolerance,
    };
    let report = run_scenario(&geometry, &options)?;
    println!("        {}", report.metrics.summary());
    println!();

    println!("  [3/3] Judging outputs...");
    println!();

    // ── Per-Neuron Detail ──────────────────────────────────────
    println!(
        "  {:<8} {:>14} {:>14} {:>12}",
        "Neuron", "Oracle", "Engine", "Diff",
    );
    println!("  {}", "-".repeat(52));
    let shown = report.num_neurons.min(16);
    for neuron in 0..shown {
        let expected = report.expected[neuron];
        let actual = report.actual[neuron];
        let diff = (actual - expected).abs();
        let marker = if diff > report.tolerance { "  *" } else { "" };
        println!(
            "  {:<8} {:>14.6} {:>14.6} {:>12.6}{marker}",
            neuron, expected, actual, diff,
        );
    }
    if report.num_neurons > shown {
        println!("  ... ({} more)", report.num_neurons - shown);
    }
    println!();
    println!("  {}", report.summary());
    println!();

    if let Some(path) = report_path {
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        println!("  Report written to {}", path.display());
        println!();
    }

    match report.into_result() {
        Ok(_) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
