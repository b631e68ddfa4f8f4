// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Strict bounded FIFO of packed words.

use std::collections::VecDeque;

use crate::{PackedWord, StreamError};

/// A fixed-capacity, ordered word channel.
///
/// Both sides of a folded run agree on exact word counts up front, so a
/// `push` beyond capacity or a `pop` from an empty stream is a protocol
/// violation by the caller, not a condition to wait out.
#[derive(Debug, Clone)]
pub struct WordStream {
    queue: VecDeque<PackedWord>,
    capacity: usize,
}

impl WordStream {
    /// Creates an empty stream sized for exactly `capacity` words.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a word, failing once the agreed capacity is reached.
    pub fn push(&mut self, word: PackedWord) -> Result<(), StreamError> {
        if self.queue.len() == self.capacity {
            return Err(StreamError::Full {
                capacity: self.capacity,
            });
        }
        self.queue.push_back(word);
        tracing::trace!(len = self.queue.len(), capacity = self.capacity, "word pushed");
        Ok(())
    }

    /// Removes the oldest word, failing when none remain.
    pub fn pop(&mut self) -> Result<PackedWord, StreamError> {
        let word = self.queue.pop_front().ok_or(StreamError::Empty)?;
        tracing::trace!(len = self.queue.len(), "word popped");
        Ok(word)
    }

    /// Words currently queued.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// True when the agreed capacity is reached.
    pub fn is_full(&self) -> bool {
        self.queue.len() == self.capacity
    }

    /// The agreed word capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
