// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Per-column bucket and sign draws.
//!
//! The draw for a column is a pure function of the seed and the column's
//! logical index. Batch, streaming, and distributed execution therefore see
//! identical draws for the same data, no matter the arrival order or the
//! partitioning.

use crate::hash::MurmurHash3X64128;
use crate::value::SketchValue;

/// The sign applied to a column before it is added to its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Add the column as-is.
    Plus,
    /// Add the negated column.
    Minus,
}

impl Sign {
    /// Applies this sign to a single element.
    #[inline]
    pub fn apply<V: SketchValue>(self, value: V) -> V {
        match self {
            Sign::Plus => value,
            Sign::Minus => value.neg(),
        }
    }
}

/// The bucket and sign drawn for one logical column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnAssignment {
    bucket: usize,
    sign: Sign,
}

impl ColumnAssignment {
    /// Returns the sketch column this draw hashes into.
    pub fn bucket(&self) -> usize {
        self.bucket
    }

    /// Returns the sign applied to the input column.
    pub fn sign(&self) -> Sign {
        self.sign
    }
}

/// Draws the assignment for one logical column index.
///
/// The 128-bit hash of the index supplies the bucket from one word and the
/// sign from the other, so bucket and sign are independent.
///
/// # Example
/// ```
/// # use countsketch::assignment_for;
/// let first = assignment_for(9001, 17, 32);
/// let second = assignment_for(9001, 17, 32);
/// assert_eq!(first, second);
/// assert!(first.bucket() < 32);
/// ```
pub fn assignment_for(seed: u64, index: u64, width: usize) -> ColumnAssignment {
    debug_assert!(width > 0, "width must be at least 1");
    let (h1, h2) = MurmurHash3X64128::hash_u64(index, seed);
    let bucket = (h1 % width as u64) as usize;
    let sign = if h2 & 1 == 0 { Sign::Plus } else { Sign::Minus };
    ColumnAssignment { bucket, sign }
}

/// Materializes the draws for logical indexes `0..num_columns`.
pub fn assign_columns(num_columns: usize, width: usize, seed: u64) -> Vec<ColumnAssignment> {
    (0..num_columns as u64)
        .map(|index| assignment_for(seed, index, width))
        .collect()
}

/// A cursor over consecutive column draws.
///
/// Holds only the seed and the next logical index, so streaming consumers
/// use constant memory regardless of how many columns they feed.
#[derive(Debug, Clone)]
pub struct AssignmentStream {
    seed: u64,
    width: usize,
    next_index: u64,
}

impl AssignmentStream {
    /// Creates a cursor positioned at logical index 0.
    pub fn new(width: usize, seed: u64) -> Self {
        Self {
            seed,
            width,
            next_index: 0,
        }
    }

    /// Returns the sketch width draws are taken against.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the seed draws are taken under.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the logical index the next in-order draw will use.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Draws at an explicit logical index without moving the cursor.
    pub fn at(&self, index: u64) -> ColumnAssignment {
        assignment_for(self.seed, index, self.width)
    }

    /// Draws at the cursor position and advances it.
    pub fn next_assignment(&mut self) -> ColumnAssignment {
        let assignment = self.at(self.next_index);
        self.next_index += 1;
        assignment
    }
}
