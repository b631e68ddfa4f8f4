// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # verify-harness
//!
//! End-to-end verification of the folded engine against a dense `f64`
//! oracle. One scenario is:
//!
//! ```text
//! seed ──► StimulusGenerator ──► dense weights / bias / inputs
//!                │                        │
//!                │                        ├──► dense_affine (oracle, f64)
//!                │                        │
//!                ▼                        ▼
//!        quantize + fold ──► FcEngine::run ──► unpack + dequantize
//!                                                      │
//!                               compare ◄──────────────┘
//!                                  │
//!                                  ▼
//!                         VerificationReport
//! ```
//!
//! The comparison tolerance defaults to a worst-case quantization error
//! bound derived from the geometry, so a passing report means the engine
//! is exactly as wrong as fixed-point arithmetic is allowed to be.

mod error;
mod generator;
mod oracle;
mod pipeline;
mod report;

pub use error::HarnessError;
pub use generator::{LayerStimulus, StimulusGenerator};
pub use oracle::dense_affine;
pub use pipeline::{derived_tolerance, run_scenario, VerifyOptions};
pub use report::{ToleranceViolation, VerificationReport};
