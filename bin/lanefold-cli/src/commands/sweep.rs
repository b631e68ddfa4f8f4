// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `lanefold sweep` command: verify many consecutive seeds.
//!
//! Runs the oracle comparison across a block of seeds and prints a
//! per-seed table plus how close the worst case came to the derived
//! error bound.

use std::path::PathBuf;
use verify_harness::{derived_tolerance, run_scenario, VerifyOptions};

pub fn execute(config: Option<PathBuf>, runs: u64, seed: u64, amplitude: f64) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║                 lanefold · Seed Sweep                ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let config = super::load_config(&config)?;
    let geometry = config.validate()?;
    let bound = derived_tolerance(&geometry, amplitude);

    println!("  {}", geometry.summary());
    println!("  Seeds: {seed}..{}, amplitude {amplitude}", seed + runs);
    println!("  Derived tolerance: {bound:.6}");
    println!();

    // ── Results Table ──────────────────────────────────────────
    println!(
        "  {:<10} {:>12} {:>12} {:>12} {:>8}",
        "Seed", "Max Diff", "Avg Diff", "Violations", "Result",
    );
    println!("  {}", "-".repeat(58));

    let mut failures = 0u64;
    let mut worst: Option<(u64, f64)> = None;

    for s in seed..seed + runs {
        let options = VerifyOptions {
            seed: s,
            amplitude,
            tolerance: None,
        };
        let report = run_scenario(&geometry, &options)?;

        println!(
            "  {:<10} {:>12.6} {:>12.6} {:>12} {:>8}",
            s,
            report.max_diff,
            report.avg_diff,
            report.violations.len(),
            if report.passed() { "PASS" } else { "FAIL" },
        );

        if !report.passed() {
            failures += 1;
        }
        if worst.map_or(true, |(_, diff)| report.max_diff > diff) {
            worst = Some((s, report.max_diff));
        }
    }
    println!();

    // ── Summary ────────────────────────────────────────────────
    println!("  Summary");
    println!("   Scenarios:    {runs}");
    println!("   Passed:       {}", runs - failures);
    println!("   Failed:       {failures}");
    if let Some((worst_seed, worst_diff)) = worst {
        println!(
            "   Worst case:   seed {worst_seed}, max diff {worst_diff:.6} ({:.1}% of bound)",
            worst_diff / bound * 100.0,
        );
    }
    println!();

    if failures > 0 {
        anyhow::bail!("{failures} of {runs} scenarios failed verification");
    }
    Ok(())
}
