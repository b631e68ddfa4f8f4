// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # lane-stream
//!
//! Packed multi-lane words and the strict bounded FIFO streams that carry
//! them between a producer and the compute engine.
//!
//! ```text
//! scalars ──► LanePacker::pack ──► PackedWord ──► WordStream ──► consumer
//!    ▲                                                              │
//!    └──────────────── LanePacker::unpack ◄────────────────────────┘
//! ```
//!
//! This crate provides:
//! - [`PackedWord`] — a 128-bit carrier holding several fixed-width lanes.
//! - [`LanePacker`] — the order-specified pack/unpack contract: lane `j`
//!   occupies bits `[j·w, (j+1)·w)`, stored as two's complement and
//!   sign-extended on extraction. No raw memory reinterpretation anywhere.
//! - [`WordStream`] — a fixed-capacity FIFO where overfilling and
//!   over-reading are hard errors, not blocking states.

mod error;
mod stream;
mod word;

pub use error::StreamError;
pub use stream::WordStream;
pub use word::{LanePacker, PackedWord};
