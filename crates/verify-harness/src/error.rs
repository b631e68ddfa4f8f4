// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Harness error types.

use fc_engine::EngineError;
use fold_layout::LayoutError;
use lane_stream::StreamError;

/// Errors raised while building, running, or judging a scenario.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HarnessError {
    /// Geometry validation or folding problem.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// The engine rejected the scenario.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A scenario option is unusable.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// An oracle operand has the wrong element count.
    #[error("oracle {what}: expected {expected} elements, got {got}")]
    OracleShape {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Packing the stimulus into input words failed.
    #[error("packing stimulus word {word}: {source}")]
    Stimulus {
        word: usize,
        #[source]
        source: StreamError,
    },

    /// The streams ended a run in an unexpected state.
    #[error("stream protocol violated: {0}")]
    Protocol(String),

    /// The engine's outputs exceeded the tolerance.
    #[error("verification failed: {0}")]
    Verification(String),
}
