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

//! Count Sketch matrix compression.
//!
//! # Overview
//!
//! The Count Sketch is a randomized linear map that compresses an `m x n`
//! matrix `A` into an `m x s` sketch `C` with `s` much smaller than `n`.
//! Each input column is hashed to one of the `s` sketch columns and added
//! there with a random sign, so a sketch column is a signed sum of the
//! input columns landing in its bucket. The map touches every input
//! element once and needs `O(m * s)` working memory.
//!
//! Compression preserves geometry in expectation: for every row `i`,
//! `E[||C_i||^2] = ||A_i||^2`, and the relative variance of the estimate
//! is at most `2 / s`.
//!
//! Three drivers share the same transform:
//! * [`BatchSketcher`] sketches a resident matrix in one call.
//! * [`StreamingSketcher`] folds in one column at a time with memory
//!   independent of the column count.
//! * [`DistributedSketcher`] sketches partitions in isolation and merges
//!   the partial results; see the [`distributed`] module.
//!
//! The draw for a column is a pure function of the seed and the column's
//! logical index, so the three strategies agree on the same data: given
//! equal seeds, a streaming pass in logical order reproduces the batch
//! sketch bit for bit, and any partitioning reproduces it up to the
//! floating-point rounding of reordered sums.
//!
//! # Accuracy
//!
//! The variance bound `2 / s` turns into a width recipe through
//! Chebyshev's inequality: [`suggest_width`] returns the smallest `s` that
//! keeps each squared row norm within relative error `epsilon` with
//! probability at least `1 - delta`. Averaging several sketches under
//! independent seeds tightens the estimate further without changing the
//! transform.
//!
//! # Background
//!
//! The sketch originates in ["Finding Frequent Items in Data
//! Streams"](https://doi.org/10.1007/3-540-45465-9_59) by Moses Charikar,
//! Kevin Chen, and Martin Farach-Colton (2002). Its use as a subspace
//! embedding for matrix computations follows ["Low Rank Approximation and
//! Regression in Input Sparsity Time"](https://arxiv.org/abs/1207.6365)
//! by Kenneth Clarkson and David Woodruff (2013).
//!
//! # Examples
//!
//! ```
//! # use countsketch::BatchSketcher;
//! # use countsketch::DenseMatrix;
//! # use countsketch::StreamingSketcher;
//! let matrix = DenseMatrix::from_columns(2, vec![
//!     vec![1.0, 2.0],
//!     vec![3.0, 4.0],
//!     vec![5.0, 6.0],
//! ]).unwrap();
//!
//! let batch = BatchSketcher::with_seed(4, 11).unwrap();
//! let sketch = batch.sketch(&matrix).unwrap();
//!
//! let mut stream = StreamingSketcher::with_seed(2, 4, 11).unwrap();
//! for col in 0..matrix.num_cols() {
//!     stream.update(matrix.column(col)).unwrap();
//! }
//! assert_eq!(sketch, stream.finalize().unwrap());
//! ```

mod accumulator;
mod assignment;
mod batch;
mod codec;
pub mod distributed;
pub mod error;
mod hash;
mod matrix;
mod streaming;
mod value;

pub use self::accumulator::SketchAccumulator;
pub use self::assignment::AssignmentStream;
pub use self::assignment::ColumnAssignment;
pub use self::assignment::Sign;
pub use self::assignment::assign_columns;
pub use self::assignment::assignment_for;
pub use self::batch::BatchSketcher;
pub use self::distributed::ColumnPartition;
pub use self::distributed::DistributedSketcher;
pub use self::distributed::PartialSketch;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::matrix::DenseMatrix;
pub use self::streaming::StreamingSketcher;
pub use self::value::SketchValue;

/// Suggests the smallest sketch width that keeps every squared row norm
/// within relative error `epsilon` with probability at least `1 - delta`,
/// by Chebyshev's inequality on the `2 / s` variance bound.
///
/// # Panics
/// Panics unless `epsilon` and `delta` both lie in (0, 1).
///
/// # Example
/// ```
/// # use countsketch::suggest_width;
/// assert_eq!(suggest_width(0.1, 0.05), 4000);
/// assert_eq!(suggest_width(0.5, 0.5), 16);
/// ```
pub fn suggest_width(epsilon: f64, delta: f64) -> usize {
    assert!(epsilon > 0.0 && epsilon < 1.0, "epsilon must be in (0, 1)");
    assert!(delta > 0.0 && delta < 1.0, "delta must be in (0, 1)");
    (2.0 / (epsilon * epsilon * delta)).ceil() as usize
}
