// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # lanefold
//!
//! Command-line interface for the lanefold folded-layer toolkit.
//!
//! ## Usage
//! ```bash
//! # Verify the engine against the oracle for one seeded scenario
//! lanefold verify --config layer.toml --seed 123
//!
//! # Sweep many consecutive seeds
//! lanefold sweep --config layer.toml --runs 50
//!
//! # Inspect a layer configuration: folds, words, formats, tolerance
//! lanefold inspect --config layer.toml
//!
//! # Write a starter configuration file
//! lanefold init --output layer.toml
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lanefold",
    about = "Folded affine layer engine with oracle-backed verification",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify one seeded scenario against the dense f64 oracle.
    Verify {
        /// Path to a layer TOML file (defaults to the reference layer).
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Stimulus seed.
        #[arg(short, long, default_value_t = 123)]
        seed: u64,

        /// Half-width of the uniform stimulus range.
        #[arg(short, long, default_value_t = 1.0)]
        amplitude: f64,

        /// Comparison tolerance (defaults to the derived worst-case bound).
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Write the full report as JSON to this path.
        #[arg(long)]
        report: Option<std::path::PathBuf>,
    },

    /// Run many consecutive seeds and summarise the results.
    Sweep {
        /// Path to a layer TOML file (defaults to the reference layer).
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Number of scenarios to run.
        #[arg(short, long, default_value_t = 20)]
        runs: u64,

        /// First seed of the sweep.
        #[arg(short, long, default_value_t = 1)]
        seed: u64,

        /// Half-width of the uniform stimulus range.
        #[arg(short, long, default_value_t = 1.0)]
        amplitude: f64,
    },

    /// Inspect a layer configuration: geometry, words, formats, tolerance.
    Inspect {
        /// Path to a layer TOML file (defaults to the reference layer).
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,
    },

    /// Write a starter layer configuration file.
    Init {
        /// Destination path.
        #[arg(short, long, default_value = "lanefold.toml")]
        output: std::path::PathBuf,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Verify {
            config,
            seed,
            amplitude,
            tolerance,
            report,
        } => commands::verify::execute(config, seed, amplitude, tolerance, report),
        Commands::Sweep {
            config,
            runs,
            seed,
            amplitude,
        } => commands::sweep::execute(config, runs, seed, amplitude),
        Commands::Inspect { config } => commands::inspect::execute(config),
        Commands::Init { output, force } => commands::init::execute(output, force),
    }
}
