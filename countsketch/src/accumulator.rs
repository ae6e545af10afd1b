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

//! Running bucket sums shared by all sketching strategies.

use crate::assignment::ColumnAssignment;
use crate::assignment::Sign;
use crate::error::Error;
use crate::matrix::DenseMatrix;
use crate::value::SketchValue;

/// A mutable buffer of bucket sums with one row per input row and one
/// column per bucket.
///
/// Additions are elementwise, so they commute and associate: any arrival
/// order and any partition-and-merge schedule over the same columns lands
/// on the same sums, up to floating-point rounding of the sums themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct SketchAccumulator<V> {
    buckets: DenseMatrix<V>,
    columns_added: u64,
}

impl<V: SketchValue> SketchAccumulator<V> {
    /// Creates an all-zero accumulator with `num_rows` rows and `width`
    /// buckets.
    ///
    /// Dimensions are capped at `u32::MAX` so serialized images can carry
    /// them in 32 bits.
    ///
    /// # Errors
    /// Returns an `InvalidParameter` error when either dimension is zero or
    /// exceeds the cap.
    pub fn new(num_rows: usize, width: usize) -> Result<Self, Error> {
        if num_rows == 0 {
            return Err(Error::invalid_parameter("num_rows must be at least 1"));
        }
        if width == 0 {
            return Err(Error::invalid_parameter("width must be at least 1"));
        }
        if num_rows > u32::MAX as usize {
            return Err(Error::invalid_parameter("num_rows must fit in 32 bits"));
        }
        if width > u32::MAX as usize {
            return Err(Error::invalid_parameter("width must fit in 32 bits"));
        }
        Ok(Self {
            buckets: DenseMatrix::zeros(num_rows, width),
            columns_added: 0,
        })
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.buckets.num_rows()
    }

    /// Returns the number of buckets.
    pub fn width(&self) -> usize {
        self.buckets.num_cols()
    }

    /// Returns the number of columns folded in, including those of merged
    /// accumulators.
    pub fn columns_added(&self) -> u64 {
        self.columns_added
    }

    /// Adds a signed column into its bucket.
    ///
    /// # Errors
    /// Returns a `ShapeMismatch` error when the column length differs from
    /// the row count or the drawn bucket is out of range for this width.
    pub fn add(&mut self, column: &[V], assignment: ColumnAssignment) -> Result<(), Error> {
        if column.len() != self.num_rows() {
            return Err(Error::shape_mismatch(format!(
                "column length {} does not match row count {}",
                column.len(),
                self.num_rows()
            )));
        }
        if assignment.bucket() >= self.width() {
            return Err(Error::shape_mismatch(format!(
                "bucket {} out of range for width {}",
                assignment.bucket(),
                self.width()
            )));
        }
        let bucket = self.buckets.column_mut(assignment.bucket());
        match assignment.sign() {
            Sign::Plus => {
                for (slot, &value) in bucket.iter_mut().zip(column) {
                    *slot = slot.add(value);
                }
            }
            Sign::Minus => {
                for (slot, &value) in bucket.iter_mut().zip(column) {
                    *slot = slot.add(value.neg());
                }
            }
        }
        self.columns_added += 1;
        Ok(())
    }

    /// Merges another accumulator of identical shape into this one.
    ///
    /// # Errors
    /// Returns a `ShapeMismatch` error when the shapes disagree.
    pub fn merge(&mut self, other: &Self) -> Result<(), Error> {
        if self.num_rows() != other.num_rows() || self.width() != other.width() {
            return Err(Error::shape_mismatch(format!(
                "cannot merge {}x{} accumulator into {}x{}",
                other.num_rows(),
                other.width(),
                self.num_rows(),
                self.width()
            )));
        }
        let into = self.buckets.as_mut_slice();
        for (slot, &value) in into.iter_mut().zip(other.buckets.as_slice()) {
            *slot = slot.add(value);
        }
        self.columns_added += other.columns_added;
        Ok(())
    }

    /// Returns a read-only view of the current sums.
    pub fn as_matrix(&self) -> &DenseMatrix<V> {
        &self.buckets
    }

    /// Consumes the accumulator, yielding the sketch matrix.
    pub fn into_matrix(self) -> DenseMatrix<V> {
        self.buckets
    }

    pub(crate) fn from_parts(buckets: DenseMatrix<V>, columns_added: u64) -> Self {
        Self {
            buckets,
            columns_added,
        }
    }
}
