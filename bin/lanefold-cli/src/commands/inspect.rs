// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `lanefold inspect` command: display a layer's folded geometry.
//!
//! Validates the configuration and prints the derived fold counts, word
//! shapes, per-operand formats, and the worst-case error bound, without
//! running anything.

use std::path::PathBuf;
use verify_harness::derived_tolerance;

pub fn execute(config: Option<PathBuf>) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            lanefold · Geometry Inspector             ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let config = super::load_config(&config)?;
    let geometry = config.validate()?;

    // ── Folding ────────────────────────────────────────────────
    println!("  Folding");
    println!("   Inputs:         {}", geometry.num_inputs());
    println!("   Neurons:        {}", geometry.num_neurons());
    println!(
        "   Input lanes:    {} ({} folds)",
        geometry.simd(),
        geometry.simd_folds(),
    );
    println!(
        "   Output lanes:   {} ({} folds)",
        geometry.pe(),
        geometry.pe_folds(),
    );
    println!("   Weight lanes:   {}", geometry.weight_len());
    println!("   Bias lanes:     {}", geometry.bias_len());
    println!("   MACs per run:   {}", geometry.weight_len());
    println!();

    // ── Words ──────────────────────────────────────────────────
    println!("  Words per run");
    println!(
        "   Input:   {} word(s) of {} bits ({} lanes x {} bits, carrier 128)",
        geometry.simd_folds(),
        geometry.input_packer().word_bits(),
        geometry.simd(),
        geometry.input_format().width(),
    );
    println!(
        "   Output:  {} word(s) of {} bits ({} lanes x {} bits, carrier 128)",
        geometry.pe_folds(),
        geometry.output_packer().word_bits(),
        geometry.pe(),
        geometry.output_format().width(),
    );
    println!();

    // ── Formats ────────────────────────────────────────────────
    println!(
        "  {:<10} {:<8} {:>6} {:>6} {:>14} {:>14} {:>14}",
        "Operand", "Format", "Width", "Frac", "Resolution", "Min", "Max",
    );
    println!("  {}", "-".repeat(78));
    let operands = [
        ("input", geometry.input_format()),
        ("weight", geometry.weight_format()),
        ("bias", geometry.bias_format()),
        ("output", geometry.output_format()),
    ];
    for (name, format) in operands {
        println!(
            "  {:<10} {:<8} {:>6} {:>6} {:>14.9} {:>14.6} {:>14.6}",
            name,
            format.to_string(),
            format.width(),
            format.frac(),
            format.resolution(),
            format.min_value(),
            format.max_value(),
        );
    }
    println!();

    // ── Error Bound ────────────────────────────────────────────
    println!("  Verification");
    println!(
        "   Derived tolerance at amplitude 1.0: {:.6}",
        derived_tolerance(&geometry, 1.0),
    );
    println!("   (worst-case quantization error of one output scalar)");
    println!();

    Ok(())
}
