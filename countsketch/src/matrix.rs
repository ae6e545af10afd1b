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

//! Dense column-major matrix buffer.

use crate::error::Error;
use crate::value::SketchValue;

/// A dense matrix stored in column-major order.
///
/// Sketch inputs and outputs both use this layout; a column is a contiguous
/// slice, which is the access pattern of every accumulation loop.
///
/// # Example
/// ```
/// # use countsketch::DenseMatrix;
/// let matrix = DenseMatrix::from_columns(2, vec![
///     vec![1.0, 2.0],
///     vec![3.0, 4.0],
/// ]).unwrap();
/// assert_eq!(matrix.num_rows(), 2);
/// assert_eq!(matrix.num_cols(), 2);
/// assert_eq!(matrix.column(1), &[3.0, 4.0]);
/// assert_eq!(matrix.get(0, 1), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<V> {
    num_rows: usize,
    num_cols: usize,
    data: Vec<V>,
}

impl<V: SketchValue> DenseMatrix<V> {
    /// Creates an all-zero matrix.
    pub fn zeros(num_rows: usize, num_cols: usize) -> Self {
        Self {
            num_rows,
            num_cols,
            data: vec![V::ZERO; num_rows * num_cols],
        }
    }

    /// Builds a matrix from owned columns.
    ///
    /// `num_rows` disambiguates the zero-column case.
    ///
    /// # Errors
    /// Returns a `ShapeMismatch` error when a column's length differs from
    /// `num_rows`.
    pub fn from_columns(num_rows: usize, columns: Vec<Vec<V>>) -> Result<Self, Error> {
        let num_cols = columns.len();
        let mut data = Vec::with_capacity(num_rows * num_cols);
        for (index, column) in columns.into_iter().enumerate() {
            if column.len() != num_rows {
                return Err(Error::shape_mismatch(format!(
                    "column {} has length {}, expected {}",
                    index,
                    column.len(),
                    num_rows
                )));
            }
            data.extend_from_slice(&column);
        }
        Ok(Self {
            num_rows,
            num_cols,
            data,
        })
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the number of columns.
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Returns column `col` as a contiguous slice.
    ///
    /// # Panics
    /// Panics if `col` is out of bounds.
    pub fn column(&self, col: usize) -> &[V] {
        assert!(col < self.num_cols, "column index out of bounds");
        &self.data[col * self.num_rows..(col + 1) * self.num_rows]
    }

    /// Returns the value at (`row`, `col`).
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> V {
        assert!(row < self.num_rows, "row index out of bounds");
        assert!(col < self.num_cols, "column index out of bounds");
        self.data[col * self.num_rows + row]
    }

    pub(crate) fn column_mut(&mut self, col: usize) -> &mut [V] {
        &mut self.data[col * self.num_rows..(col + 1) * self.num_rows]
    }

    pub(crate) fn as_slice(&self) -> &[V] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [V] {
        &mut self.data
    }

    pub(crate) fn from_raw(num_rows: usize, num_cols: usize, data: Vec<V>) -> Self {
        debug_assert_eq!(data.len(), num_rows * num_cols);
        Self {
            num_rows,
            num_cols,
            data,
        }
    }
}
