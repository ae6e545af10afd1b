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

//! One-pass sketching of a fully materialized matrix.

use crate::accumulator::SketchAccumulator;
use crate::assignment::assign_columns;
use crate::error::Error;
use crate::matrix::DenseMatrix;
use crate::value::SketchValue;

/// Sketches a resident matrix in a single pass over its columns.
///
/// The sketcher itself holds only the width and the seed; `sketch` can be
/// called any number of times, on matrices of any shape, and never mutates
/// its input. Equal seeds produce equal draws, so two sketchers built with
/// [`BatchSketcher::with_seed`] and the same parameters are interchangeable.
///
/// # Example
/// ```
/// # use countsketch::BatchSketcher;
/// # use countsketch::DenseMatrix;
/// let matrix = DenseMatrix::from_columns(2, vec![
///     vec![1.0, 2.0],
///     vec![3.0, 4.0],
///     vec![5.0, 6.0],
/// ]).unwrap();
/// let sketcher = BatchSketcher::with_seed(2, 42).unwrap();
/// let sketch = sketcher.sketch(&matrix).unwrap();
/// assert_eq!(sketch.num_rows(), 2);
/// assert_eq!(sketch.num_cols(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct BatchSketcher {
    width: usize,
    seed: u64,
}

impl BatchSketcher {
    /// Creates a sketcher with a seed drawn from OS entropy.
    ///
    /// Read the seed back with [`BatchSketcher::seed`] to reproduce the
    /// draws elsewhere.
    ///
    /// # Errors
    /// Returns an `InvalidParameter` error when `width` is out of range.
    pub fn new(width: usize) -> Result<Self, Error> {
        Self::with_seed(width, rand::random())
    }

    /// Creates a sketcher with an explicit seed.
    ///
    /// # Errors
    /// Returns an `InvalidParameter` error when `width` is out of range.
    pub fn with_seed(width: usize, seed: u64) -> Result<Self, Error> {
        if width == 0 {
            return Err(Error::invalid_parameter("width must be at least 1"));
        }
        if width > u32::MAX as usize {
            return Err(Error::invalid_parameter("width must fit in 32 bits"));
        }
        Ok(Self { width, seed })
    }

    /// Returns the sketch width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the seed used for column draws.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Computes the sketch of `matrix`, preserving the row count and
    /// compressing the columns down to the sketch width.
    ///
    /// A matrix with no columns yields the all-zero sketch.
    ///
    /// # Errors
    /// Returns an `InvalidParameter` error when the matrix has zero rows.
    pub fn sketch<V: SketchValue>(&self, matrix: &DenseMatrix<V>) -> Result<DenseMatrix<V>, Error> {
        let mut accumulator = SketchAccumulator::new(matrix.num_rows(), self.width)?;
        let assignments = assign_columns(matrix.num_cols(), self.width, self.seed);
        for (col, assignment) in assignments.into_iter().enumerate() {
            accumulator.add(matrix.column(col), assignment)?;
        }
        Ok(accumulator.into_matrix())
    }
}
