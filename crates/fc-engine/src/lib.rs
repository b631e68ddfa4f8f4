// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # fc-engine
//!
//! The folded fully-connected layer engine. It computes
//! `output = W · input + bias` over packed word streams, touching only
//! `simd × pe` scalars per step the way a folded hardware datapath would.
//!
//! The engine takes:
//! - A validated `LayerGeometry` from `fold-layout`.
//! - Folded `FoldedWeights` / `FoldedBias` tensors.
//! - Two `WordStream`s from `lane-stream` for input and output words.
//!
//! # Execution Schedule
//! One run consumes exactly `simd_folds` input words and emits exactly
//! `pe_folds` output words:
//! ```text
//! for simd_fold:                  ← one input word per iteration
//!     for pe_fold:
//!         for pe:
//!             for simd:           ← simd × pe MACs per step
//!                 acc[pe][pe_fold] += w · x
//! for pe_fold:                    ← one output word per iteration
//!     emit pack(acc[0..pe][pe_fold])
//! ```
//! Each input word is read once and reused against every `pe_fold`, so
//! streams never rewind.
//!
//! # Type-State Pipeline
//! Loading is compile-time ordered:
//! ```text
//! FcEngine<Idle> → FcEngine<Ready>
//! ```
//! You cannot run an engine that has no parameters loaded.

mod engine;
mod error;
mod metrics;

pub use engine::{EngineState, FcEngine, Idle, Ready};
pub use error::EngineError;
pub use metrics::RunMetrics;
