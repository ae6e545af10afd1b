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

//! Distributed sketcher implementation.

use std::collections::BTreeSet;
use std::ops::Range;

use log::debug;
use rayon::prelude::*;

use crate::accumulator::SketchAccumulator;
use crate::assignment::assignment_for;
use crate::distributed::serialization;
use crate::error::Error;
use crate::matrix::DenseMatrix;
use crate::value::SketchValue;

/// A caller-defined slice of the input columns.
///
/// Each column carries its global logical index, so draws do not depend on
/// how the columns were split across partitions. Indexes may arrive in any
/// order; an empty partition is legal and contributes nothing.
#[derive(Debug, Clone)]
pub struct ColumnPartition<V> {
    partition_id: u32,
    columns: Vec<(u64, Vec<V>)>,
}

impl<V: SketchValue> ColumnPartition<V> {
    /// Creates an empty partition with the given id.
    pub fn new(partition_id: u32) -> Self {
        Self {
            partition_id,
            columns: Vec::new(),
        }
    }

    /// Builds a partition from a contiguous column range of a matrix, using
    /// the matrix column positions as logical indexes.
    ///
    /// # Errors
    /// Returns an `InvalidParameter` error when the range does not lie
    /// within the matrix.
    pub fn from_matrix_range(
        matrix: &DenseMatrix<V>,
        partition_id: u32,
        range: Range<usize>,
    ) -> Result<Self, Error> {
        if range.end > matrix.num_cols() || range.start > range.end {
            return Err(Error::invalid_parameter(format!(
                "column range {:?} out of bounds for {} columns",
                range,
                matrix.num_cols()
            )));
        }
        let mut partition = Self::new(partition_id);
        for col in range {
            partition.push(col as u64, matrix.column(col).to_vec());
        }
        Ok(partition)
    }

    /// Appends a column under its global logical index.
    pub fn push(&mut self, index: u64, column: Vec<V>) {
        self.columns.push((index, column));
    }

    /// Returns the partition id.
    pub fn partition_id(&self) -> u32 {
        self.partition_id
    }

    /// Returns the number of columns held.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns true when the partition holds no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// The result of sketching one partition: the unit that crosses the
/// combine boundary.
///
/// A partial sketch is a full rows-by-width buffer regardless of how many
/// columns its partition held, tagged with the partition id and the seed it
/// was drawn under.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialSketch<V> {
    partition_id: u32,
    seed: u64,
    accumulator: SketchAccumulator<V>,
}

impl<V: SketchValue> PartialSketch<V> {
    /// Returns the id of the partition this partial came from.
    pub fn partition_id(&self) -> u32 {
        self.partition_id
    }

    /// Returns the seed the draws were taken under.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.accumulator.num_rows()
    }

    /// Returns the sketch width.
    pub fn width(&self) -> usize {
        self.accumulator.width()
    }

    /// Returns the number of columns the partition contributed.
    pub fn columns_added(&self) -> u64 {
        self.accumulator.columns_added()
    }

    /// Returns true when the partition contributed no columns.
    pub fn is_empty(&self) -> bool {
        self.accumulator.columns_added() == 0
    }

    /// Returns the partition-local bucket sums.
    pub fn accumulator(&self) -> &SketchAccumulator<V> {
        &self.accumulator
    }

    /// Serializes this partial sketch to a byte image.
    ///
    /// An empty partial serializes to its preamble alone; the buffer of an
    /// empty partition is all zeros and is reconstructed on read.
    pub fn serialize(&self) -> Vec<u8> {
        serialization::write_image(self)
    }

    /// Deserializes a partial sketch from a byte image.
    ///
    /// # Errors
    /// Returns an `InvalidData` error when the image is truncated, carries
    /// an unknown version or family, or encodes elements out of range for
    /// `V`.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        serialization::read_image(bytes)
    }

    pub(crate) fn from_parts(
        partition_id: u32,
        seed: u64,
        accumulator: SketchAccumulator<V>,
    ) -> Self {
        Self {
            partition_id,
            seed,
            accumulator,
        }
    }
}

/// Drives partition-local sketching and the global combine.
///
/// The sketcher itself is a seed plus the output dimensions; it holds no
/// matrix data. [`DistributedSketcher::local_sketch`] and
/// [`DistributedSketcher::combine`] are the two halves a cluster scheduler
/// calls on its own executors, and [`DistributedSketcher::sketch`] runs the
/// whole pipeline on a local thread pool.
#[derive(Debug, Clone)]
pub struct DistributedSketcher {
    num_rows: usize,
    width: usize,
    seed: u64,
}

impl DistributedSketcher {
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
            num_rows,
            width,
            seed,
        })
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the sketch width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the seed used for column draws.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sketches one partition in isolation.
    ///
    /// The result depends only on the partition's contents and this
    /// sketcher's parameters, so a retried or speculatively re-executed
    /// partition produces an identical partial.
    ///
    /// # Errors
    /// Returns a `ShapeMismatch` error when a column's length differs from
    /// the row count.
    pub fn local_sketch<V: SketchValue>(
        &self,
        partition: &ColumnPartition<V>,
    ) -> Result<PartialSketch<V>, Error> {
        let mut accumulator = SketchAccumulator::new(self.num_rows, self.width)?;
        for (index, column) in &partition.columns {
            let assignment = assignment_for(self.seed, *index, self.width);
            accumulator.add(column, assignment)?;
        }
        debug!(
            "partition {} folded {} columns",
            partition.partition_id,
            partition.num_columns()
        );
        Ok(PartialSketch::from_parts(
            partition.partition_id,
            self.seed,
            accumulator,
        ))
    }

    /// Merges partition results into the final sketch.
    ///
    /// `expected` declares the complete set of partition ids; each must
    /// appear exactly once among `partials`. Partials are merged in the
    /// order given, so a fixed input order yields a bitwise-deterministic
    /// result. An empty `expected` set is legal and yields the all-zero
    /// sketch, the result of sketching a matrix with no columns.
    ///
    /// # Errors
    /// Returns an `InvalidParameter` error when `expected` repeats an id,
    /// when a partial's id was never declared, or when a partial was drawn
    /// under a different seed; a `DuplicatePartition` error when a
    /// partition reports twice; an `IncompletePartitionSet` error when a
    /// declared partition never reports; and a `ShapeMismatch` error when a
    /// partial's dimensions disagree with this sketcher.
    pub fn combine<V: SketchValue>(
        &self,
        partials: &[PartialSketch<V>],
        expected: &[u32],
    ) -> Result<DenseMatrix<V>, Error> {
        let mut expected_set = BTreeSet::new();
        for &id in expected {
            if !expected_set.insert(id) {
                return Err(Error::invalid_parameter(format!(
                    "expected partition ids must be unique; {id} repeats"
                )));
            }
        }

        let mut merged = SketchAccumulator::new(self.num_rows, self.width)?;
        let mut seen = BTreeSet::new();
        for partial in partials {
            let id = partial.partition_id;
            if !expected_set.contains(&id) {
                return Err(Error::invalid_parameter(format!(
                    "partition id {id} is not in the expected set"
                )));
            }
            if !seen.insert(id) {
                return Err(Error::duplicate_partition(format!(
                    "partition {id} merged more than once"
                )));
            }
            if partial.seed != self.seed {
                return Err(Error::invalid_parameter(format!(
                    "partition {id} was drawn under seed {} instead of {}",
                    partial.seed, self.seed
                )));
            }
            merged.merge(&partial.accumulator)?;
        }

        if seen.len() != expected_set.len() {
            let missing: Vec<u32> = expected_set.difference(&seen).copied().collect();
            return Err(Error::incomplete_partition_set(format!(
                "missing partition results: {missing:?}"
            )));
        }

        debug!(
            "combined {} partition results into a {}x{} sketch",
            partials.len(),
            self.num_rows,
            self.width
        );
        Ok(merged.into_matrix())
    }

    /// Runs the full pipeline on a local thread pool: partitions are
    /// sketched in parallel, then merged in the order given.
    ///
    /// # Errors
    /// Returns a `DuplicatePartition` error when two partitions share an
    /// id, plus any error `local_sketch` or `combine` reports.
    pub fn sketch<V: SketchValue>(
        &self,
        partitions: &[ColumnPartition<V>],
    ) -> Result<DenseMatrix<V>, Error> {
        let mut expected = Vec::with_capacity(partitions.len());
        for partition in partitions {
            if expected.contains(&partition.partition_id) {
                return Err(Error::duplicate_partition(format!(
                    "partition id {} supplied more than once",
                    partition.partition_id
                )));
            }
            expected.push(partition.partition_id);
        }

        let partials = partitions
            .par_iter()
            .map(|partition| self.local_sketch(partition))
            .collect::<Result<Vec<_>, Error>>()?;
        self.combine(&partials, &expected)
    }
}
