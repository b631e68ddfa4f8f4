// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! CLI command implementations.

pub mod init;
pub mod inspect;
pub mod sweep;
pub mod verify;

use fold_layout::LayerConfig;
use std::path::PathBuf;

/// Initializes the tracing subscriber from the `-v` count.
///
/// `RUST_LOG` takes precedence when set, so targeted filters still work.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Loads a layer configuration, falling back to the reference layer.
pub(crate) fn load_config(path: &Option<PathBuf>) -> anyhow::Result<LayerConfig> {
    match path {
        Some(p) => {
            tracing::debug!("loading layer config from '{}'", p.display());
            LayerConfig::from_file(p)
                .map_err(|e| anyhow::anyhow!("loading '{}': {e}", p.display()))
        }
        None => {
            tracing::debug!("no config given, using the reference layer");
            Ok(LayerConfig::default())
        }
    }
}
