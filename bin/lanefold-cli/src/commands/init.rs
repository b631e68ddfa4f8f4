// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `lanefold init` command: write a starter configuration file.

use fold_layout::LayerConfig;
use std::path::PathBuf;

pub fn execute(output: PathBuf, force: bool) -> anyhow::Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "'{}' already exists (use --force to overwrite)",
            output.display()
        );
    }

    let config = LayerConfig::default();
    let toml = config.to_toml()?;
    std::fs::write(&output, toml)?;

    println!("Wrote reference layer configuration to '{}'.", output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit the dimensions, lane counts, and formats.");
    println!("  2. Check the folded geometry:  lanefold inspect --config {}", output.display());
    println!("  3. Verify against the oracle:  lanefold verify --config {}", output.display());

    Ok(())
}
