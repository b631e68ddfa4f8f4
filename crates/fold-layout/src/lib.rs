// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # fold-layout
//!
//! Layer configuration, validated folded geometry, and the layout mapper
//! that reorders dense weights and biases into the lane-addressed tensors
//! the compute engine consumes.
//!
//! ```text
//! LayerConfig ──validate()──► LayerGeometry
//!                                  │
//!      dense W [neuron][input] ────┼──► FoldedWeights [pe][simd][offset]
//!      dense b [neuron]       ────┴──► FoldedBias    [pe][pe_fold]
//! ```
//!
//! This crate provides:
//! - [`LayerConfig`] — serde TOML configuration with the reference
//!   scenario as its default.
//! - [`LayerGeometry`] — dimensions, parallelism factors, fold counts, and
//!   the `(neuron, input) ↔ (pe, simd, offset)` bijection. Only
//!   [`LayerConfig::validate`] can build one, so holding a geometry means
//!   the divisibility and word-width checks already passed.
//! - [`FoldedWeights`] / [`FoldedBias`] — fully-populated folded tensors
//!   produced by pure, deterministic mapping from dense `f64` values.

mod config;
mod error;
mod geometry;
mod tensors;

pub use config::LayerConfig;
pub use error::LayoutError;
pub use geometry::{FoldedIndex, LayerGeometry};
pub use tensors::{FoldedBias, FoldedWeights};
