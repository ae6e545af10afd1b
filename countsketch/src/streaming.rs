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

//! Column-at-a-time sketching with memory independent of the column count.

use log::debug;

use crate::accumulator::SketchAccumulator;
use crate::assignment::AssignmentStream;
use crate::error::Error;
use crate::matrix::DenseMatrix;
use crate::value::SketchValue;

/// Sketches a sequence of columns one at a time.
///
/// The sketcher holds the bucket sums and a draw cursor and nothing else,
/// so memory stays at O(rows * width) however many columns are fed. Columns
/// fed with [`StreamingSketcher::update`] take consecutive logical indexes
/// starting at 0; [`StreamingSketcher::update_at`] accepts them out of
/// order under explicit indexes.
///
/// [`StreamingSketcher::finalize`] closes the stream and hands back the
/// sketch. Any later call on the sketcher reports an `InvalidState` error.
///
/// # Example
/// ```
/// # use countsketch::StreamingSketcher;
/// let mut sketcher = StreamingSketcher::with_seed(2, 4, 7).unwrap();
/// sketcher.update(&[1.0, 0.0]).unwrap();
/// sketcher.update(&[0.0, 1.0]).unwrap();
/// let sketch = sketcher.finalize().unwrap();
/// assert_eq!(sketch.num_rows(), 2);
/// assert_eq!(sketch.num_cols(), 4);
/// assert!(sketcher.finalize().is_err());
/// ```
#[derive(Debug)]
pub struct StreamingSketcher<V> {
    assignments: AssignmentStream,
    accumulator: Option<SketchAccumulator<V>>,
    num_rows: usize,
    columns_consumed: u64,
}

impl<V: SketchValue> StreamingSketcher<V> {
    /// Creates a sketcher with a seed drawn from OS entropy.
    ///
    /// # Errors
    /// Returns an `InvalidParameter` error when either dimension is out of
    /// range.
    pub fn new(num_rows: usize, width: usize) -> Result<Self, Error> {
        Self::with_seed(num_rows, width, rand::random())
    }

    /// Creates a sketcher with an explicit seed.
    ///
    /// # Errors
    /// Returns an `InvalidParameter` error when either dimension is out of
    /// range.
    pub fn with_seed(num_rows: usize, width: usize, seed: u64) -> Result<Self, Error> {
        let accumulator = SketchAccumulator::new(num_rows, width)?;
        Ok(Self {
            assignments: AssignmentStream::new(width, seed),
            accumulator: Some(accumulator),
            num_rows,
            columns_consumed: 0,
        })
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the sketch width.
    pub fn width(&self) -> usize {
        self.assignments.width()
    }

    /// Returns the seed used for column draws.
    pub fn seed(&self) -> u64 {
        self.assignments.seed()
    }

    /// Returns the number of columns folded in so far.
    pub fn columns_consumed(&self) -> u64 {
        self.columns_consumed
    }

    /// Returns true once the stream has been finalized.
    pub fn is_finalized(&self) -> bool {
        self.accumulator.is_none()
    }

    /// Folds in the next column in logical order.
    ///
    /// # Errors
    /// Returns an `InvalidState` error after `finalize`, or a
    /// `ShapeMismatch` error when the column length differs from the row
    /// count. A rejected column does not advance the draw cursor.
    pub fn update(&mut self, column: &[V]) -> Result<(), Error> {
        let Some(accumulator) = self.accumulator.as_mut() else {
            return Err(Error::invalid_state("update on a finalized sketcher"));
        };
        if column.len() != self.num_rows {
            return Err(Error::shape_mismatch(format!(
                "column length {} does not match row count {}",
                column.len(),
                self.num_rows
            )));
        }
        let assignment = self.assignments.next_assignment();
        accumulator.add(column, assignment)?;
        self.columns_consumed += 1;
        Ok(())
    }

    /// Folds in the column owning logical index `index`, for feeds that
    /// deliver columns out of order. Does not move the in-order cursor.
    ///
    /// # Errors
    /// Returns an `InvalidState` error after `finalize`, or a
    /// `ShapeMismatch` error when the column length differs from the row
    /// count.
    pub fn update_at(&mut self, index: u64, column: &[V]) -> Result<(), Error> {
        let Some(accumulator) = self.accumulator.as_mut() else {
            return Err(Error::invalid_state("update on a finalized sketcher"));
        };
        if column.len() != self.num_rows {
            return Err(Error::shape_mismatch(format!(
                "column length {} does not match row count {}",
                column.len(),
                self.num_rows
            )));
        }
        let assignment = self.assignments.at(index);
        accumulator.add(column, assignment)?;
        self.columns_consumed += 1;
        Ok(())
    }

    /// Closes the stream and returns the finished sketch.
    ///
    /// # Errors
    /// Returns an `InvalidState` error when the stream was already
    /// finalized.
    pub fn finalize(&mut self) -> Result<DenseMatrix<V>, Error> {
        match self.accumulator.take() {
            Some(accumulator) => {
                debug!(
                    "finalized streaming sketch after {} columns",
                    self.columns_consumed
                );
                Ok(accumulator.into_matrix())
            }
            None => Err(Error::invalid_state("finalize on a finalized sketcher")),
        }
    }
}
